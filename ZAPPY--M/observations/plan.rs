use std::{fmt, slice};

use serde::{Deserialize, Serialize};

/// Single parenthesised plan step, e.g. `(stack b1 b2)`.
///
/// The token is opaque: nothing beyond its outer parentheses is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(String);

impl Action {
    /// Wraps a raw token without validation.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrowed token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordered action sequence in execution order. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plan {
    actions: Vec<Action>,
}

impl Plan {
    /// Builds a plan from already-ordered actions.
    #[must_use]
    pub const fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan holds no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions as a slice.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Iterates actions in order.
    pub fn iter(&self) -> slice::Iter<'_, Action> {
        self.actions.iter()
    }

    /// Returns `true` when every action of `self` appears in `other` in the
    /// same relative order.
    #[must_use]
    pub fn is_subsequence_of(&self, other: &Self) -> bool {
        let mut remaining = other.iter();
        self.iter()
            .all(|action| remaining.any(|candidate| candidate == action))
    }
}

impl FromIterator<Action> for Plan {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Action;
    type IntoIter = slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(tokens: &[&str]) -> Plan {
        tokens.iter().copied().map(Action::from).collect()
    }

    #[test]
    fn subsequence_respects_order() {
        let full = plan(&["(a)", "(b)", "(c)", "(b)"]);
        assert!(plan(&["(a)", "(c)"]).is_subsequence_of(&full));
        assert!(plan(&["(b)", "(b)"]).is_subsequence_of(&full));
        assert!(Plan::default().is_subsequence_of(&full));
        assert!(!plan(&["(c)", "(a)"]).is_subsequence_of(&full));
        assert!(!plan(&["(d)"]).is_subsequence_of(&full));
    }

    #[test]
    fn serializes_as_plain_token_list() {
        let value = serde_json::to_value(plan(&["(move a b)"])).unwrap();
        assert_eq!(value, serde_json::json!(["(move a b)"]));
    }
}
