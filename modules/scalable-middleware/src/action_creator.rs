use std::fmt;

use scalable_state::{Action, Meta, Payload, Value};

/// Builds actions of one type from call arguments.
///
/// Every action gets a copy of the meta template with the arguments stored
/// in `action_parameters`, and a clone of the payload template. Callable
/// payloads read those arguments when the function middleware runs them.
#[derive(Debug, Clone)]
pub struct ActionCreator {
    action_type: String,
    meta: Meta,
    payload: Payload,
}

/// An action creator with the given meta and payload templates.
pub fn make_action_creator(
    action_type: impl Into<String>,
    meta: Meta,
    payload: impl Into<Payload>,
) -> ActionCreator {
    ActionCreator {
        action_type: action_type.into(),
        meta,
        payload: payload.into(),
    }
}

impl ActionCreator {
    /// Empty meta, empty object payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        make_action_creator(action_type, Meta::new(), Value::empty_object())
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn create<I>(&self, args: I) -> Action
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let parameters = args.into_iter().map(Into::into).collect();
        Action::new(self.action_type.clone())
            .with_meta(self.meta.clone().with_action_parameters(parameters))
            .with_payload(self.payload.clone())
    }
}

impl fmt::Display for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.action_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sets_type_meta_and_payload() {
        let set_stuff = make_action_creator(
            "set-stuff",
            Meta::new().with("name", "1"),
            Value::from(json!({"name": "2"})),
        );

        let action = set_stuff.create(Vec::<Value>::new());

        assert_eq!(action.action_type, "set-stuff");
        assert_eq!(action.meta.get("name"), Some(&Value::from("1")));
        assert_eq!(action.payload.as_value().unwrap()["name"], Value::from("2"));
    }

    #[test]
    fn arguments_land_in_action_parameters() {
        let set_value = ActionCreator::new("set-value");

        assert_eq!(
            serde_json::to_value(&set_value.create(Vec::<Value>::new()).meta).unwrap(),
            json!({"actionParameters": []})
        );
        assert_eq!(
            set_value.create([1]).meta.action_parameters,
            Some(vec![Value::from(1)])
        );
        assert_eq!(
            set_value.create([2, 3]).meta.action_parameters,
            Some(vec![Value::from(2), Value::from(3)])
        );
    }

    #[test]
    fn displays_as_the_action_type() {
        assert_eq!(ActionCreator::new("dummy").to_string(), "dummy");
    }

    #[test]
    fn default_payload_is_an_empty_object() {
        let action = ActionCreator::new("x").create(Vec::<Value>::new());
        assert_eq!(*action.payload.as_value().unwrap(), json!({}));
    }
}
