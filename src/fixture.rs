//! Fixture document loading and data model.
//!
//! A fixture document is a YAML mapping from action name to an ordered
//! sequence of expected calls:
//!
//! ```yaml
//! start:
//!   - cmd: kubectl scale -n bl01t statefulset/bl01t-ea-test-01 --replicas=1
//!     rsp: statefulset.apps/bl01t-ea-test-01 scaled
//! attach:
//!   - cmd: kubectl -it -n bl01t attach statefulset/bl01t-ea-test-01
//!     rsp: true
//! ```
//!
//! `cmd` is a pattern (literal or regex, see [`crate::matcher`]); `rsp` is
//! the canned response. Order is significant on both levels: actions keep
//! document order, and rules are consumed first-in-first-matched.

use std::path::Path;

use serde::Deserialize;

use crate::error::MockError;

/// A canned response for one intercepted call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Captured stdout text.
    Text(String),
    /// `true`: the call succeeds with no textual output (interactive
    /// attach/exec sessions). `false`: the call fails like a non-zero exit.
    Flag(bool),
    /// Structured payload (nested YAML) for code under test that parses
    /// command output itself.
    Structured(serde_yaml::Value),
}

impl Response {
    fn classify(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(text) => Response::Text(text),
            serde_yaml::Value::Bool(flag) => Response::Flag(flag),
            other => Response::Structured(other),
        }
    }
}

/// One expected call: the pattern the actual command must satisfy and the
/// response handed back in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRule {
    pub pattern: String,
    pub response: Response,
}

/// On-disk shape of a single rule entry.
#[derive(Debug, Deserialize)]
struct RawRule {
    cmd: String,
    rsp: serde_yaml::Value,
}

/// An ordered, immutable table of actions and their expected call
/// sequences. Loaded once per test; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct FixtureDocument {
    actions: Vec<(String, Vec<CallRule>)>,
}

impl FixtureDocument {
    /// Parse a fixture document from YAML text.
    ///
    /// # Errors
    ///
    /// [`MockError::MalformedFixture`] when the document is not a mapping
    /// of sequences, an entry lacks `cmd` or `rsp`, or an action name
    /// repeats.
    pub fn from_yaml(source: &str) -> Result<Self, MockError> {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(source).map_err(|err| {
            MockError::MalformedFixture(format!("document is not a mapping of sequences: {err}"))
        })?;

        let mut actions: Vec<(String, Vec<CallRule>)> = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let serde_yaml::Value::String(name) = key else {
                return Err(MockError::MalformedFixture(
                    "action names must be strings".to_owned(),
                ));
            };
            if actions.iter().any(|(existing, _)| *existing == name) {
                return Err(MockError::MalformedFixture(format!(
                    "duplicate action '{name}'"
                )));
            }
            let raw: Vec<RawRule> = serde_yaml::from_value(value)
                .map_err(|err| MockError::MalformedFixture(format!("action '{name}': {err}")))?;
            let rules = raw
                .into_iter()
                .map(|rule| CallRule {
                    pattern: rule.cmd,
                    response: Response::classify(rule.rsp),
                })
                .collect();
            actions.push((name, rules));
        }
        Ok(Self { actions })
    }

    /// Load a fixture document from a YAML file.
    ///
    /// # Errors
    ///
    /// [`MockError::MalformedFixture`] when the file cannot be read or its
    /// content fails [`Self::from_yaml`].
    pub fn from_path(path: &Path) -> Result<Self, MockError> {
        let source = std::fs::read_to_string(path)
            .map_err(|err| MockError::MalformedFixture(format!("{}: {err}", path.display())))?;
        Self::from_yaml(&source)
    }

    /// The expected call sequence for `action`, in fixture order.
    #[must_use]
    pub fn sequence(&self, action: &str) -> Option<&[CallRule]> {
        self.actions
            .iter()
            .find(|(name, _)| name == action)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Action names in document order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }

    /// Number of actions in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
