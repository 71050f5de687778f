use scalable_state::{inject, Action, CombinedReducer, InjectFragment, KeyPath, Reducer, Value};
use serde_json::json;

fn dispatch(reducer: &impl Reducer, state: Option<Value>, fragments: Vec<Value>) -> Value {
    reducer.reduce(state, &Action::new("action").with_fragments(fragments))
}

#[test]
fn has_the_inject_type_and_an_empty_initial_state() {
    let family = inject();
    assert_eq!(family.fragment_type(), "inject");
    assert_eq!(*family.initial_state(), json!({}));
}

#[test]
fn sets_values_at_the_given_key_path() {
    let family = inject();
    let state = dispatch(&family, None, vec![family.fragment(["value"], 10)]);
    let state = dispatch(&family, Some(state), vec![family.fragment(["deep", "value"], 13)]);

    assert_eq!(family.make_select_value(["value"], Value::Null).select(&state), Value::from(10));
    assert_eq!(
        family.make_select_value(["deep", "value"], Value::Null).select(&state),
        Value::from(13)
    );
    assert_eq!(state, json!({"value": 10, "deep": {"value": 13}}));
}

#[test]
fn returns_the_default_for_missing_paths() {
    let family = inject();
    let state = dispatch(&family, None, vec![family.fragment("deep.value", 13)]);

    let select_default = family.make_select_value(["unexisting", "path"], "default");
    assert_eq!(select_default.select(&state), Value::from("default"));

    // stepping through a scalar is a missing path too
    let through_scalar = family.make_select_value("deep.value.inner", "default");
    assert_eq!(through_scalar.select(&state), Value::from("default"));
}

#[test]
fn overwrites_scalars_on_the_way_down() {
    let family = inject();
    let state = dispatch(
        &family,
        None,
        vec![family.fragment("a", 1), family.fragment("a.b", 2)],
    );
    assert_eq!(state, json!({"a": {"b": 2}}));
}

#[test]
fn previous_snapshots_are_never_modified() {
    let family = inject();
    let before = dispatch(&family, None, vec![family.fragment("keep.x", 1), family.fragment("v", 1)]);
    let after = dispatch(&family, Some(before.clone()), vec![family.fragment("v", 2)]);

    assert_eq!(before, json!({"keep": {"x": 1}, "v": 1}));
    assert_eq!(after, json!({"keep": {"x": 1}, "v": 2}));
    assert!(after["keep"].same(&before["keep"]));
}

#[test]
fn isolates_slices_mounted_at_other_key_paths() {
    let family = inject();
    family.set_key_path(["custom"]);
    let reducer = CombinedReducer::new().with("custom", family.clone());

    let state = dispatch(&reducer, None, vec![family.make_fragment(InjectFragment::new(["value"], 3))]);

    assert_eq!(state, json!({"custom": {"value": 3}}));
    assert!(KeyPath::from(["value"]).resolve(&state).is_none());
    assert_eq!(
        family.make_select_value(["value"], Value::Null).select(&state),
        Value::from(3)
    );
}

#[test]
fn selector_arguments_can_pick_the_path() {
    let family = inject();
    family.set_key_path("store");
    let reducer = CombinedReducer::new().with("store", family.clone());
    let state = dispatch(
        &reducer,
        None,
        vec![
            family.fragment("current", "b"),
            family.fragment("a", "first"),
            family.fragment("b", "second"),
        ],
    );

    let select_current = family.make_select_value("current", Value::Null);
    let select_pointed = family.make_select_value(select_current, "none");

    assert_eq!(select_pointed.select(&state), Value::from("second"));
}

#[test]
fn writes_through_arrays_by_index() {
    let family = inject();
    let state = dispatch(&family, None, vec![family.fragment("list", json!([1]))]);
    let state = dispatch(&family, Some(state), vec![family.fragment("list.250", "far")]);

    let list = state["list"].as_array().unwrap();
    assert_eq!(list.len(), 251);
    assert_eq!(list[0], Value::from(1));
    assert!(list[1..250].iter().all(Value::is_null));
    assert_eq!(family.make_select_value("list.250", Value::Null).select(&state), Value::from("far"));
}

#[test]
fn huge_indexes_through_arrays_become_object_keys() {
    let family = inject();
    let state = dispatch(&family, None, vec![family.fragment("list", json!([1]))]);
    let raw_index = Value::from(json!({
        "type": "inject", "keyPath": ["other", 1u64 << 40], "value": 2
    }));
    let state = dispatch(
        &family,
        Some(state),
        vec![family.fragment("list.18446744073709551615", "far"), raw_index],
    );

    assert_eq!(
        state,
        json!({
            "list": {"0": 1, "18446744073709551615": "far"},
            "other": {"1099511627776": 2}
        })
    );
    assert_eq!(
        family.make_select_value("list.18446744073709551615", Value::Null).select(&state),
        Value::from("far")
    );
}
