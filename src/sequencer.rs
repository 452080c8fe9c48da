//! Per-action call cursor.
//!
//! Rules are consumed strictly in fixture order, never searched: the k-th
//! intercepted call for an action consumes exactly the k-th rule. The
//! cursor also records every actual command it sees, so a failing test can
//! show the full call history.

use crate::error::MockError;
use crate::fixture::{CallRule, FixtureDocument};

/// Runtime cursor for a single action.
///
/// Armed on first use, advanced by each intercepted call, and terminal
/// once every rule is spent: any further call fails with
/// [`MockError::SequenceExhausted`].
#[derive(Debug, Default)]
pub struct CallContext {
    seen: Vec<String>,
}

impl CallContext {
    /// Number of calls consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.seen.len()
    }

    /// Actual command strings, in call order.
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.seen
    }
}

/// Return the rule at the cursor for `action` and advance by one,
/// recording `actual` in the call history.
///
/// # Errors
///
/// [`MockError::UnknownAction`] when the document has no such action;
/// [`MockError::SequenceExhausted`] when every rule is already consumed.
pub fn next_rule<'doc>(
    doc: &'doc FixtureDocument,
    action: &str,
    ctx: &mut CallContext,
    actual: &str,
) -> Result<&'doc CallRule, MockError> {
    let rules = doc
        .sequence(action)
        .ok_or_else(|| MockError::UnknownAction(action.to_owned()))?;
    let index = ctx.seen.len();
    let Some(rule) = rules.get(index) else {
        return Err(MockError::SequenceExhausted {
            action: action.to_owned(),
            consumed: index,
            actual: actual.to_owned(),
        });
    };
    ctx.seen.push(actual.to_owned());
    Ok(rule)
}
