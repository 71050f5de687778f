//! The `inject` family: an arbitrarily deep keyed value store.

use crate::action::Action;
use crate::fragment::{define_action_fragment, ActionFragment, FragmentDefinition};
use crate::key_path::KeyPath;
use crate::selector::{SelectArg, Selector};
use crate::value::{Map, Value};

pub const INJECT_TYPE: &str = "inject";

/// Store `value` at `key_path` inside the inject slice.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectFragment {
    pub key_path: KeyPath,
    pub value: Value,
}

impl InjectFragment {
    pub fn new(key_path: impl Into<KeyPath>, value: impl Into<Value>) -> Self {
        Self {
            key_path: key_path.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Inject;

impl FragmentDefinition for Inject {
    type Fragment = InjectFragment;

    fn fragment_type(&self) -> &str {
        INJECT_TYPE
    }

    fn initial_state(&self) -> Value {
        Value::empty_object()
    }

    fn encode(&self, fragment: InjectFragment) -> Map {
        let mut fields = Map::new();
        fields.insert("keyPath".into(), fragment.key_path.to_value());
        fields.insert("value".into(), fragment.value);
        fields
    }

    fn decode(&self, raw: &Value) -> Option<InjectFragment> {
        Some(InjectFragment {
            key_path: KeyPath::from_value(raw.get("keyPath")?)?,
            value: raw["value"].clone(),
        })
    }

    fn reduce(&self, state: Value, _action: &Action, fragment: InjectFragment) -> Value {
        fragment.key_path.assoc(state, fragment.value)
    }

    /// `args`: `[key_path, default]`. Missing, null and unreadable paths all
    /// yield the default.
    fn select(&self, state: &Value, args: &[Value]) -> Value {
        let default = args.get(1).cloned().unwrap_or_default();
        args.first()
            .and_then(KeyPath::from_value)
            .and_then(|key_path| key_path.resolve(state))
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or(default)
    }
}

pub type InjectFamily = ActionFragment<Inject>;

/// A fresh inject family mounted at the root.
pub fn inject() -> InjectFamily {
    define_action_fragment(Inject)
}

impl ActionFragment<Inject> {
    /// Raw fragment storing `value` at `key_path`.
    pub fn fragment(&self, key_path: impl Into<KeyPath>, value: impl Into<Value>) -> Value {
        self.make_fragment(InjectFragment::new(key_path, value))
    }

    /// Selector for the value at `key_path`, or `default` when nothing is
    /// stored there.
    pub fn make_select_value(
        &self,
        key_path: impl Into<SelectArg>,
        default: impl Into<SelectArg>,
    ) -> Selector {
        self.make_select([key_path.into(), default.into()])
    }
}
