//! The mock façade substituted for real command execution.
//!
//! One dispatcher serves one test invocation: it owns the immutable
//! fixture document and a per-action cursor table. Cursors live behind a
//! `Mutex` only so the command seam can take `&self`; there is no sharing
//! across tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::MockError;
use crate::fixture::{FixtureDocument, Response};
use crate::matcher::{self, MatchOptions};
use crate::runner::MockRunner;
use crate::sequencer::{self, CallContext};

pub struct MockDispatcher {
    doc: FixtureDocument,
    options: MatchOptions,
    contexts: Mutex<HashMap<String, CallContext>>,
}

impl MockDispatcher {
    #[must_use]
    pub fn new(doc: FixtureDocument) -> Self {
        Self::with_options(doc, MatchOptions::default())
    }

    #[must_use]
    pub fn with_options(doc: FixtureDocument, options: MatchOptions) -> Self {
        Self {
            doc,
            options,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Consume the next rule for `action`, check `actual` against its
    /// pattern, and return the canned response.
    ///
    /// # Errors
    ///
    /// [`MockError::UnknownAction`] for an action the document does not
    /// define; [`MockError::SequenceExhausted`] once the action's rules
    /// are spent; [`MockError::UnexpectedCommand`] when `actual` does not
    /// match the next pattern; [`MockError::InvalidPattern`] when the
    /// pattern itself is broken.
    pub fn intercept(&self, action: &str, actual: &str) -> Result<Response, MockError> {
        let mut contexts = self.contexts.lock().unwrap_or_else(PoisonError::into_inner);
        let ctx = contexts.entry(action.to_owned()).or_default();
        let index = ctx.consumed();
        let rule = sequencer::next_rule(&self.doc, action, ctx, actual)?;
        if !matcher::matches(&rule.pattern, actual, &self.options)? {
            return Err(MockError::UnexpectedCommand {
                action: action.to_owned(),
                index,
                expected: rule.pattern.clone(),
                actual: actual.to_owned(),
            });
        }
        Ok(rule.response.clone())
    }

    /// Bind `action` to the command seam.
    #[must_use]
    pub fn runner(&self, action: impl Into<String>) -> MockRunner<'_> {
        MockRunner::new(self, action.into())
    }

    /// Number of rules consumed for `action` so far.
    #[must_use]
    pub fn consumed(&self, action: &str) -> usize {
        let contexts = self.contexts.lock().unwrap_or_else(PoisonError::into_inner);
        contexts.get(action).map_or(0, CallContext::consumed)
    }

    /// Actual commands intercepted for `action`, in call order.
    #[must_use]
    pub fn calls(&self, action: &str) -> Vec<String> {
        let contexts = self.contexts.lock().unwrap_or_else(PoisonError::into_inner);
        contexts
            .get(action)
            .map(|ctx| ctx.calls().to_vec())
            .unwrap_or_default()
    }

    /// Assert that every rule of every action was consumed.
    ///
    /// Call at the end of a test to catch code under test that silently
    /// skipped an expected command.
    ///
    /// # Errors
    ///
    /// [`MockError::PendingCalls`] for the first action, in document
    /// order, that still has unconsumed rules.
    pub fn verify_exhausted(&self) -> Result<(), MockError> {
        let contexts = self.contexts.lock().unwrap_or_else(PoisonError::into_inner);
        for action in self.doc.actions() {
            let sequence = self.doc.sequence(action).unwrap_or_default();
            let consumed = contexts.get(action).map_or(0, CallContext::consumed);
            if consumed < sequence.len() {
                return Err(MockError::PendingCalls {
                    action: action.to_owned(),
                    remaining: sequence.len() - consumed,
                    next: sequence[consumed].pattern.clone(),
                });
            }
        }
        Ok(())
    }

    /// The loaded fixture document.
    #[must_use]
    pub fn document(&self) -> &FixtureDocument {
        &self.doc
    }
}
