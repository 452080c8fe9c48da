//! Typed errors for fixture loading and mock dispatch.
//!
//! Every variant is fatal to the enclosing test: none are retried, and the
//! dispatch variants carry the action name, call index, expected pattern,
//! and actual command so a failure is diagnosable from the message alone.
//! All types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator at the command seam.

use thiserror::Error;

/// Errors surfaced by the mock layer.
#[derive(Debug, Error)]
pub enum MockError {
    /// The fixture document does not have the mapping-of-sequences shape,
    /// or an entry lacks a required field.
    #[error("malformed fixture: {0}")]
    MalformedFixture(String),

    /// The requested action has no entry in the fixture document.
    #[error("unknown action '{0}': not present in the fixture document")]
    UnknownAction(String),

    /// The code under test made more calls than the fixture anticipated.
    #[error(
        "action '{action}': fixture exhausted after {consumed} call(s), \
         no rule left for command: {actual}"
    )]
    SequenceExhausted {
        action: String,
        consumed: usize,
        actual: String,
    },

    /// The actual command did not match the next expected pattern.
    #[error(
        "action '{action}' call #{index}: command mismatch\n  expected: {expected}\n  actual:   {actual}"
    )]
    UnexpectedCommand {
        action: String,
        index: usize,
        expected: String,
        actual: String,
    },

    /// A fixture pattern is neither an exact literal match for the command
    /// nor a valid regular expression.
    #[error("pattern '{pattern}' is not a valid regex")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A `rsp: false` rule: the mocked command fails the way a real
    /// non-zero exit would.
    #[error("action '{action}': command failed (simulated): {command}")]
    CommandFailed { action: String, command: String },

    /// `verify_exhausted` found rules the code under test never consumed.
    #[error(
        "action '{action}': {remaining} fixture rule(s) never consumed, next expected: {next}"
    )]
    PendingCalls {
        action: String,
        remaining: usize,
        next: String,
    },
}
