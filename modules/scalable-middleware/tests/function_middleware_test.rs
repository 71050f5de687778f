mod common;

use std::sync::Arc;

use common::MemoryStore;
use scalable_middleware::{FunctionMiddleware, Middleware};
use scalable_state::{reducer_fn, Action, Meta, Payload, Value};

/// State is the last immediate payload the reducer saw.
fn store() -> MemoryStore {
    let reducer = reducer_fn(|state, action: &Action| {
        action
            .payload
            .as_value()
            .cloned()
            .or(state)
            .unwrap_or_default()
    });
    let middlewares: Vec<Arc<dyn Middleware>> = vec![Arc::new(FunctionMiddleware)];
    MemoryStore::new(reducer, middlewares)
}

fn int(values: &[Value], index: usize) -> i64 {
    values.get(index).and_then(Value::as_i64).unwrap_or_default()
}

#[test]
fn ignores_non_callable_payloads() {
    let store = store();
    store.dispatch(Action::new("noFnAction").with_payload(Value::from("sample")));

    assert_eq!(store.state(), Value::from("sample"));
    assert_eq!(store.reduced().len(), 1);
}

#[test]
fn executes_callable_payloads() {
    let store = store();
    store.dispatch(Action::new("fnAction").with_payload(Payload::callable(|_, _| Payload::immediate("hi!"))));

    let reduced = store.last_reduced().unwrap();
    assert_eq!(reduced.action_type, "fnAction");
    assert_eq!(reduced.payload.as_value(), Some(&Value::from("hi!")));
}

#[test]
fn passes_action_parameters() {
    let store = store();
    let action = Action::new("fnAction")
        .with_meta(Meta::new().with_action_parameters(vec![Value::from(3), Value::from(7)]))
        .with_payload(Payload::callable(|params, _| {
            Payload::immediate(int(params, 0) + int(params, 1))
        }));

    store.dispatch(action);

    let reduced = store.last_reduced().unwrap();
    assert_eq!(reduced.payload.as_value(), Some(&Value::from(10)));
    assert_eq!(
        reduced.meta.action_parameters,
        Some(vec![Value::from(3), Value::from(7)])
    );
}

#[test]
fn passes_the_current_state() {
    let store = store();
    let reverse = || {
        Action::new("fnAction").with_payload(Payload::callable(|_, state| {
            Payload::immediate(state.as_str().unwrap_or_default().chars().rev().collect::<String>())
        }))
    };

    store.dispatch(Action::new("noFnAction").with_payload(Value::from("bye!")));
    store.dispatch(reverse());
    assert_eq!(store.state(), Value::from("!eyb"));

    store.dispatch(reverse());
    assert_eq!(store.state(), Value::from("bye!"));
}

#[test]
fn combines_parameters_with_state() {
    let store = store();
    store.dispatch(Action::new("setBase").with_payload(Value::from(2)));

    store.dispatch(
        Action::new("calculatePow")
            .with_meta(Meta::new().with_action_parameters(vec![Value::from(3)]))
            .with_payload(Payload::callable(|params, state| {
                let base = state.as_i64().unwrap_or_default();
                Payload::immediate(base.pow(int(params, 0) as u32))
            })),
    );

    assert_eq!(store.state(), Value::from(8));
}
