//! Action fragments: typed sub-payloads multiplexed inside one action.
//!
//! A family is defined once by implementing [`FragmentDefinition`] and
//! passing it to [`define_action_fragment`]. The resulting [`ActionFragment`]
//! reduces only the fragments tagged with its own type, builds memoized
//! selectors over its slice, and locates that slice through a key path that
//! can be changed at any time.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::action::Action;
use crate::key_path::KeyPath;
use crate::reducer::Reducer;
use crate::selector::{SelectArg, Selector};
use crate::value::{Map, Value};

/// The type tag of a raw fragment, if it has one.
pub fn fragment_type(fragment: &Value) -> Option<&str> {
    fragment.get("type")?.as_str()
}

/// What a fragment family does with its fragments.
///
/// `reduce` and `select` must be pure. `reduce` receives the slice by value;
/// containers it shares with older snapshots are copied on write, so it can
/// never change state a reader already holds.
pub trait FragmentDefinition: Send + Sync + 'static {
    /// The typed fragment this family builds and consumes.
    type Fragment;

    /// The tag stored under `type` in every fragment of this family.
    fn fragment_type(&self) -> &str;

    fn initial_state(&self) -> Value;

    /// Fields of the raw fragment, without the `type` tag.
    fn encode(&self, fragment: Self::Fragment) -> Map;

    /// Read a raw fragment already known to carry this family's tag.
    /// `None` skips the fragment.
    fn decode(&self, raw: &Value) -> Option<Self::Fragment>;

    fn reduce(&self, state: Value, action: &Action, fragment: Self::Fragment) -> Value;

    fn select(&self, state: &Value, args: &[Value]) -> Value;
}

struct Family<D> {
    definition: D,
    initial_state: Value,
    key_path: ArcSwap<KeyPath>,
}

impl<D: FragmentDefinition> Family<D> {
    fn sub_state(&self, root: &Value) -> Value {
        self.key_path
            .load()
            .resolve(root)
            .cloned()
            .unwrap_or_default()
    }
}

/// A fragment family instance. Cheap to clone; clones share the key path.
pub struct ActionFragment<D: FragmentDefinition> {
    inner: Arc<Family<D>>,
}

impl<D: FragmentDefinition> Clone for ActionFragment<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Build a family instance from its definition. The key path starts at the
/// root.
pub fn define_action_fragment<D: FragmentDefinition>(definition: D) -> ActionFragment<D> {
    let initial_state = definition.initial_state();
    ActionFragment {
        inner: Arc::new(Family {
            definition,
            initial_state,
            key_path: ArcSwap::from_pointee(KeyPath::root()),
        }),
    }
}

impl<D: FragmentDefinition> ActionFragment<D> {
    pub fn fragment_type(&self) -> &str {
        self.inner.definition.fragment_type()
    }

    /// The slice a reducer starts from. Every call returns the same value.
    pub fn initial_state(&self) -> &Value {
        &self.inner.initial_state
    }

    /// Build a raw fragment tagged with this family's type.
    pub fn make_fragment(&self, fragment: D::Fragment) -> Value {
        let mut fields = self.inner.definition.encode(fragment);
        fields.insert("type".into(), Value::from(self.fragment_type()));
        Value::from(fields)
    }

    /// Fold this family's reducer over the action's matching fragments.
    ///
    /// Returns `state` itself (not a copy) when the action carries no
    /// fragments array.
    pub fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        let state = state.unwrap_or_else(|| self.inner.initial_state.clone());
        let Some(fragments) = action.fragments() else {
            return state;
        };

        let definition = &self.inner.definition;
        let family_type = definition.fragment_type();
        let mut folded = 0usize;
        let next = fragments
            .iter()
            .filter(|raw| fragment_type(raw) == Some(family_type))
            .fold(state, |state, raw| match definition.decode(raw) {
                Some(fragment) => {
                    folded += 1;
                    definition.reduce(state, action, fragment)
                }
                None => {
                    warn!(
                        fragment_type = family_type,
                        action_type = %action.action_type,
                        "Skipping fragment with unreadable fields"
                    );
                    state
                }
            });

        if folded > 0 {
            debug!(
                fragment_type = family_type,
                action_type = %action.action_type,
                folded,
                "Reduced fragments"
            );
        }
        next
    }

    /// Build a memoized selector over this family's slice.
    ///
    /// Literal arguments are passed through as they are. Selector arguments
    /// are evaluated against the root state on every call and their results
    /// substituted in place. The family's selector reruns only when the
    /// slice or one of the selector arguments changed.
    pub fn make_select<I, A>(&self, args: I) -> Selector
    where
        I: IntoIterator<Item = A>,
        A: Into<SelectArg>,
    {
        let args: Vec<SelectArg> = args.into_iter().map(Into::into).collect();

        let family = Arc::clone(&self.inner);
        let mut inputs = vec![Selector::new(move |root| family.sub_state(root))];
        inputs.extend(args.iter().filter_map(SelectArg::as_selector).cloned());

        let family = Arc::clone(&self.inner);
        Selector::memoized(inputs, move |resolved| {
            let Some((sub_state, selected)) = resolved.split_first() else {
                return Value::Null;
            };
            let mut selected = selected.iter();
            let processed: Vec<Value> = args
                .iter()
                .map(|arg| match arg {
                    SelectArg::Literal(value) => value.clone(),
                    SelectArg::Selector(_) => selected.next().cloned().unwrap_or_default(),
                })
                .collect();
            family.definition.select(sub_state, &processed)
        })
    }

    /// Relocate this family's slice. Affects every selector of the family
    /// from its next call on; stored data is not moved.
    pub fn set_key_path(&self, key_path: impl Into<KeyPath>) {
        let key_path = key_path.into();
        debug!(
            fragment_type = self.fragment_type(),
            key_path = %key_path,
            "Key path set"
        );
        self.inner.key_path.store(Arc::new(key_path));
    }

    pub fn key_path(&self) -> KeyPath {
        self.inner.key_path.load().as_ref().clone()
    }

    /// This family's slice inside `root`, or `None` if nothing is mounted
    /// at the current key path.
    pub fn select_state<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.inner.key_path.load().resolve(root)
    }
}

impl<D: FragmentDefinition> Reducer for ActionFragment<D> {
    fn reduce(&self, state: Option<Value>, action: &Action) -> Value {
        ActionFragment::reduce(self, state, action)
    }
}
