//! The `entity` family: normalized, paginated, grouped collections.
//!
//! Slice layout, per entity name:
//!
//! ```text
//! { "<name>": { "elements": [ {id, ..}, .. ],
//!               "groups": { "<group>": [ [ids of page 0], [ids of page 1], .. ] } } }
//! ```
//!
//! Elements are stored once, in first-seen order, and merged field by field
//! when they arrive again. Pages only hold ids. A page that was dispatched
//! without elements is stored as `[]`; a page never dispatched is a hole
//! (`null`) or past the end of the group. Pages above [`MAX_ARRAY_INDEX`] are
//! rejected.

use std::sync::Arc;

use tracing::warn;

use crate::action::Action;
use crate::fragment::{define_action_fragment, ActionFragment, FragmentDefinition};
use crate::key_path::MAX_ARRAY_INDEX;
use crate::selector::{SelectArg, Selector};
use crate::value::{Map, Value, NULL};

pub const ENTITY_TYPE: &str = "entity";
pub const DEFAULT_GROUP: &str = "default";

/// One page of elements for one entity name and group.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFragment {
    pub name: String,
    /// `None` and an empty list both record an empty page.
    pub elements: Option<Vec<Value>>,
    pub page: usize,
    pub group: String,
}

impl EntityFragment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: None,
            page: 0,
            group: DEFAULT_GROUP.to_string(),
        }
    }

    pub fn with_elements<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.elements = Some(elements.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Entity;

impl FragmentDefinition for Entity {
    type Fragment = EntityFragment;

    fn fragment_type(&self) -> &str {
        ENTITY_TYPE
    }

    fn initial_state(&self) -> Value {
        Value::empty_object()
    }

    fn encode(&self, fragment: EntityFragment) -> Map {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(fragment.name));
        if let Some(elements) = fragment.elements {
            fields.insert("elements".into(), Value::from(elements));
        }
        fields.insert("page".into(), Value::from(fragment.page));
        fields.insert("group".into(), Value::from(fragment.group));
        fields
    }

    fn decode(&self, raw: &Value) -> Option<EntityFragment> {
        let name = raw.get("name")?.as_str()?.to_string();
        let page = match &raw["page"] {
            Value::Null => 0,
            page => usize::try_from(page.as_u64()?)
                .ok()
                .filter(|page| *page <= MAX_ARRAY_INDEX)?,
        };
        let group = match &raw["group"] {
            Value::Null => DEFAULT_GROUP.to_string(),
            group => group.as_str()?.to_string(),
        };
        Some(EntityFragment {
            name,
            elements: raw["elements"].as_array().map(<[Value]>::to_vec),
            page,
            group,
        })
    }

    fn reduce(&self, state: Value, _action: &Action, fragment: EntityFragment) -> Value {
        let EntityFragment {
            name,
            elements,
            page,
            group,
        } = fragment;
        if page > MAX_ARRAY_INDEX {
            warn!(name = %name, page, "Entity page out of range, skipped");
            return state;
        }
        let elements = elements.unwrap_or_default();

        update_object(state, |entities| {
            let collection = entities.remove(&name).unwrap_or_default();
            let collection = update_object(collection, |collection| {
                let mut ids = Vec::with_capacity(elements.len());
                let stored = collection.remove("elements").unwrap_or_default();
                let stored = if elements.is_empty() {
                    Value::Array(stored.into_array_or_empty())
                } else {
                    update_array(stored, |stored| {
                        for element in elements {
                            ids.push(upsert(stored, element));
                        }
                    })
                };
                collection.insert("elements".into(), stored);

                let groups = collection.remove("groups").unwrap_or_default();
                let groups = update_object(groups, |groups| {
                    let pages = groups.remove(&group).unwrap_or_default();
                    let pages = update_array(pages, |pages| {
                        if pages.len() <= page {
                            pages.resize(page.saturating_add(1), Value::Null);
                        }
                        pages[page] = Value::from(ids);
                    });
                    groups.insert(group, pages);
                });
                collection.insert("groups".into(), groups);
            });
            entities.insert(name, collection);
        })
    }

    /// `args`: `[name, page = 0, group = "default"]`. Returns the stored
    /// elements whose id is on the page, in storage order.
    fn select(&self, state: &Value, args: &[Value]) -> Value {
        let arg = |index: usize| args.get(index).unwrap_or(&NULL);
        let Some(name) = arg(0).as_str() else {
            return Value::empty_array();
        };
        let page = match arg(1) {
            Value::Null => Some(0),
            page => page.as_u64().and_then(|p| usize::try_from(p).ok()),
        };
        let group = match arg(2) {
            Value::Null => Some(DEFAULT_GROUP),
            group => group.as_str(),
        };
        let (Some(page), Some(group)) = (page, group) else {
            return Value::empty_array();
        };

        let collection = &state[name];
        let ids = collection["groups"][group][page].as_array().unwrap_or_default();
        collection["elements"]
            .as_array()
            .unwrap_or_default()
            .iter()
            .filter(|element| ids.iter().any(|id| same_id(id, &element["id"])))
            .cloned()
            .collect()
    }
}

/// Insert `element`, or merge it into the stored element with the same id.
/// Returns the id.
fn upsert(stored: &mut Vec<Value>, element: Value) -> Value {
    let id = element["id"].clone();
    match stored.iter().position(|existing| same_id(&existing["id"], &id)) {
        Some(index) => {
            let existing = std::mem::take(&mut stored[index]);
            stored[index] = merge(existing, element);
        }
        None => stored.push(element),
    }
    id
}

/// Numbers match by numeric value, so `1` and `1.0` are one id.
fn same_id(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

/// Incoming fields override existing ones; fields only on `existing` stay.
fn merge(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Object(mut base), Value::Object(fields)) => {
            let base_fields = Arc::make_mut(&mut base);
            for (key, value) in fields.iter() {
                base_fields.insert(key.clone(), value.clone());
            }
            Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}

fn update_object(value: Value, f: impl FnOnce(&mut Map)) -> Value {
    let mut map = value.into_object_or_empty();
    f(Arc::make_mut(&mut map));
    Value::Object(map)
}

fn update_array(value: Value, f: impl FnOnce(&mut Vec<Value>)) -> Value {
    let mut items = value.into_array_or_empty();
    f(Arc::make_mut(&mut items));
    Value::Array(items)
}

pub type EntityFamily = ActionFragment<Entity>;

/// A fresh entity family mounted at the root.
pub fn entity() -> EntityFamily {
    define_action_fragment(Entity)
}

impl ActionFragment<Entity> {
    /// Selector for one page of one group. Each argument may be a literal or
    /// a selector.
    pub fn make_select_page(
        &self,
        name: impl Into<SelectArg>,
        page: impl Into<SelectArg>,
        group: impl Into<SelectArg>,
    ) -> Selector {
        self.make_select([name.into(), page.into(), group.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_fills_defaults() {
        let raw = Value::from(json!({"type": "entity", "name": "Tweet"}));
        let fragment = Entity.decode(&raw).unwrap();
        assert_eq!(fragment, EntityFragment::new("Tweet"));
    }

    #[test]
    fn decode_skips_unusable_pages() {
        let raw = Value::from(json!({"type": "entity", "name": "Tweet", "page": -1}));
        assert!(Entity.decode(&raw).is_none());
        let raw = Value::from(json!({"type": "entity", "page": 0}));
        assert!(Entity.decode(&raw).is_none());
    }

    #[test]
    fn merge_keeps_fields_missing_from_incoming() {
        let merged = merge(
            Value::from(json!({"id": 1, "text": "hi!", "author": "Joe"})),
            Value::from(json!({"id": 1, "img": true})),
        );
        assert_eq!(merged, json!({"id": 1, "text": "hi!", "author": "Joe", "img": true}));
    }

    #[test]
    fn pages_past_the_end_are_padded() {
        let fragment = EntityFragment::new("Post")
            .with_elements([json!({"id": 1})])
            .with_page(2);
        let state = Entity.reduce(Value::empty_object(), &Action::new("a"), fragment);
        assert_eq!(state["Post"]["groups"]["default"], json!([null, null, [1]]));
    }

    #[test]
    fn decode_rejects_pages_past_the_limit() {
        let raw = Value::from(json!({"type": "entity", "name": "Post", "page": u64::MAX}));
        assert!(Entity.decode(&raw).is_none());
        let raw = Value::from(json!({"type": "entity", "name": "Post", "page": 1u64 << 40}));
        assert!(Entity.decode(&raw).is_none());
        let raw = Value::from(json!({"type": "entity", "name": "Post", "page": MAX_ARRAY_INDEX}));
        assert_eq!(Entity.decode(&raw).map(|fragment| fragment.page), Some(MAX_ARRAY_INDEX));
    }

    #[test]
    fn reduce_leaves_state_alone_for_out_of_range_pages() {
        let state = Value::from(json!({"Post": {"elements": [], "groups": {}}}));
        let fragment = EntityFragment::new("Post")
            .with_elements([json!({"id": 1})])
            .with_page(usize::MAX);
        let next = Entity.reduce(state.clone(), &Action::new("a"), fragment);
        assert!(next.same(&state));
    }

    #[test]
    fn integral_float_ids_match_integer_ids() {
        let mut stored = vec![Value::from(json!({"id": 1, "text": "hi"}))];
        upsert(&mut stored, Value::from(json!({"id": 1.0, "seen": true})));
        assert_eq!(stored, vec![Value::from(json!({"id": 1.0, "text": "hi", "seen": true}))]);

        let state = Value::from(json!({
            "Post": {"elements": [{"id": 2.0}], "groups": {"default": [[2]]}}
        }));
        assert_eq!(Entity.select(&state, &[Value::from("Post")]), json!([{"id": 2.0}]));
        assert!(!same_id(&Value::from(1), &Value::from("1")));
    }

    #[test]
    fn selector_defaults_page_and_group() {
        let state = Value::from(json!({
            "Post": {"elements": [{"id": 1}, {"id": 2}], "groups": {"default": [[2]]}}
        }));
        assert_eq!(Entity.select(&state, &[Value::from("Post")]), json!([{"id": 2}]));
        assert_eq!(Entity.select(&state, &[Value::from("Missing")]), json!([]));
        assert_eq!(
            Entity.select(&state, &[Value::from("Post"), Value::from(4)]),
            json!([])
        );
    }
}
