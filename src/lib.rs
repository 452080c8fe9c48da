//! Fixture-driven mocking for external command execution.
//!
//! Deployment tooling shells out constantly, and testing it against a
//! live cluster is slow and flaky. This crate replays YAML fixture tables
//! instead: each named action carries an ordered list of expected
//! commands and canned responses, and the [`MockDispatcher`] checks every
//! call the code under test makes for pattern and order before handing
//! the response back.
//!
//! ```
//! use shellmock::{FixtureDocument, MockDispatcher, Response};
//!
//! # fn main() -> Result<(), shellmock::MockError> {
//! let doc = FixtureDocument::from_yaml(
//!     "start:\n  - cmd: kubectl scale -n bl01t statefulset/bl01t-ea-test-01 --replicas=1\n    rsp: statefulset.apps/bl01t-ea-test-01 scaled\n",
//! )?;
//! let mock = MockDispatcher::new(doc);
//! let response = mock.intercept(
//!     "start",
//!     "kubectl scale -n bl01t statefulset/bl01t-ea-test-01 --replicas=1",
//! )?;
//! assert_eq!(
//!     response,
//!     Response::Text("statefulset.apps/bl01t-ea-test-01 scaled".into())
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Code under test talks to the [`CommandRunner`] seam; production wires in
//! [`ShellRunner`], tests wire in [`MockDispatcher::runner`].

pub mod dispatcher;
pub mod error;
pub mod fixture;
pub mod matcher;
pub mod runner;
pub mod sequencer;

pub use dispatcher::MockDispatcher;
pub use error::MockError;
pub use fixture::{CallRule, FixtureDocument, Response};
pub use matcher::MatchOptions;
pub use runner::{CommandRunner, MockRunner, RunnerConfig, ShellRunner};
