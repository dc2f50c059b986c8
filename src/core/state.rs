//! State identifiers and ordered state sets.
//!
//! A state is an opaque, comparable identifier. Equality is by value. One
//! reserved value per state type may act as a wildcard, which matches any
//! state when it appears in a transition's source set.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug, Display};

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into spawned transition tasks
/// - `PartialEq`: transition matching compares states by value
/// - `Debug`: states appear in diagnostics
/// - `Send + Sync + 'static`: states cross task boundaries
///
/// # Example
///
/// ```rust
/// use statewright::core::State;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum TaskState {
///     Any,
///     Pending,
///     Running,
///     Complete,
/// }
///
/// impl State for TaskState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Any => "*",
///             Self::Pending => "Pending",
///             Self::Running => "Running",
///             Self::Complete => "Complete",
///         }
///     }
///
///     fn is_wildcard(&self) -> bool {
///         matches!(self, Self::Any)
///     }
/// }
///
/// assert!(TaskState::Any.is_wildcard());
/// assert_eq!(TaskState::Running.name(), "Running");
/// ```
pub trait State: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Get the state's name for display, logging and graph export.
    fn name(&self) -> &str;

    /// Check if this is the reserved "any state" value.
    ///
    /// A wildcard is only meaningful in a transition's source set. It never
    /// matches as a destination.
    ///
    /// Default implementation returns `false`.
    fn is_wildcard(&self) -> bool {
        false
    }
}

/// String-backed state for machines whose states are not known at compile time.
///
/// ```rust
/// use statewright::core::{DefaultState, State};
///
/// const PAID: DefaultState = DefaultState::from_static("Paid");
///
/// assert_eq!(PAID, DefaultState::from("Paid".to_string()));
/// assert!(DefaultState::ANY.is_wildcard());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultState(Cow<'static, str>);

impl DefaultState {
    /// The wildcard value, `"*"`.
    pub const ANY: DefaultState = DefaultState(Cow::Borrowed("*"));

    /// Build a state from a string literal, usable in `const` items.
    pub const fn from_static(name: &'static str) -> Self {
        DefaultState(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl State for DefaultState {
    fn name(&self) -> &str {
        &self.0
    }

    fn is_wildcard(&self) -> bool {
        *self == Self::ANY
    }
}

impl Display for DefaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for DefaultState {
    fn from(name: &'static str) -> Self {
        DefaultState::from_static(name)
    }
}

impl From<String> for DefaultState {
    fn from(name: String) -> Self {
        DefaultState(Cow::Owned(name))
    }
}

/// Ordered collection of states.
///
/// Order is preserved for display and graph export. It carries no matching
/// priority.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct States<S>(Vec<S>);

impl<S: State> States<S> {
    pub fn new() -> Self {
        States(Vec::new())
    }

    /// Membership by value equality.
    pub fn contains(&self, state: &S) -> bool {
        self.0.iter().any(|s| s == state)
    }

    /// Whether any member is the wildcard value.
    pub fn has_wildcard(&self) -> bool {
        self.0.iter().any(State::is_wildcard)
    }

    pub fn push(&mut self, state: S) {
        self.0.push(state);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.0
    }
}

impl<S: State> Default for States<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<Vec<S>> for States<S> {
    fn from(states: Vec<S>) -> Self {
        States(states)
    }
}

impl<S, const N: usize> From<[S; N]> for States<S> {
    fn from(states: [S; N]) -> Self {
        States(states.into())
    }
}

impl<S> FromIterator<S> for States<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        States(iter.into_iter().collect())
    }
}

impl<S> IntoIterator for States<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, S> IntoIterator for &'a States<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug)]
    enum TestState {
        Any,
        Initial,
        Processing,
        Complete,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Any => "*",
                Self::Initial => "Initial",
                Self::Processing => "Processing",
                Self::Complete => "Complete",
            }
        }

        fn is_wildcard(&self) -> bool {
            matches!(self, Self::Any)
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Initial.name(), "Initial");
        assert_eq!(TestState::Processing.name(), "Processing");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn is_wildcard_defaults_to_false() {
        #[derive(Clone, PartialEq, Debug)]
        struct Plain;

        impl State for Plain {
            fn name(&self) -> &str {
                "Plain"
            }
        }

        assert!(!Plain.is_wildcard());
    }

    #[test]
    fn default_state_compares_by_value() {
        let borrowed = DefaultState::from_static("State1");
        let owned = DefaultState::from("State1".to_string());

        assert_eq!(borrowed, owned);
        assert_ne!(borrowed, DefaultState::from("State2"));
    }

    #[test]
    fn default_state_wildcard() {
        assert!(DefaultState::ANY.is_wildcard());
        assert!(DefaultState::from("*".to_string()).is_wildcard());
        assert!(!DefaultState::from("State1").is_wildcard());
    }

    #[test]
    fn default_state_serializes_as_plain_string() {
        let state = DefaultState::from("Paid");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"Paid\"");

        let deserialized: DefaultState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn states_contains_by_value() {
        let states = States::from([TestState::Initial, TestState::Processing]);

        assert!(states.contains(&TestState::Initial));
        assert!(states.contains(&TestState::Processing));
        assert!(!states.contains(&TestState::Complete));
        assert!(!states.has_wildcard());
    }

    #[test]
    fn states_detects_wildcard() {
        let states = States::from([TestState::Initial, TestState::Any]);

        assert!(states.has_wildcard());
        // membership stays exact, the wildcard is answered separately
        assert!(!states.contains(&TestState::Complete));
    }

    #[test]
    fn states_preserve_order() {
        let states: States<TestState> =
            vec![TestState::Complete, TestState::Initial].into_iter().collect();

        let names: Vec<&str> = states.iter().map(State::name).collect();
        assert_eq!(names, vec!["Complete", "Initial"]);
        assert_eq!(states.len(), 2);
    }
}
