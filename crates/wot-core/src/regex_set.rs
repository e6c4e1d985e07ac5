use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope restriction attached to a trust signature.
///
/// An empty set is a wildcard. A non-empty set matches a user-id if any of
/// its expressions finds a match anywhere in it. Expressions that fail to
/// compile never match.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RegexSet {
    expressions: Vec<String>,
    compiled: Vec<Option<Regex>>,
}

impl RegexSet {
    /// The wildcard set.
    pub fn wildcard() -> Self {
        Self::default()
    }

    pub fn new<I, S>(expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expressions: Vec<String> = expressions.into_iter().map(Into::into).collect();
        let compiled = expressions
            .iter()
            .map(|expr| match Regex::new(expr) {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!(expression = %expr, error = %e, "ignoring invalid trust regex");
                    None
                }
            })
            .collect();
        Self {
            expressions,
            compiled,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn matches(&self, user_id: &str) -> bool {
        if self.is_wildcard() {
            return true;
        }
        self.compiled
            .iter()
            .flatten()
            .any(|re| re.is_match(user_id))
    }
}

impl PartialEq for RegexSet {
    fn eq(&self, other: &Self) -> bool {
        self.expressions == other.expressions
    }
}

impl Eq for RegexSet {}

impl fmt::Debug for RegexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegexSet").field(&self.expressions).finish()
    }
}

impl From<Vec<String>> for RegexSet {
    fn from(expressions: Vec<String>) -> Self {
        Self::new(expressions)
    }
}

impl From<RegexSet> for Vec<String> {
    fn from(set: RegexSet) -> Self {
        set.expressions
    }
}
