//! Domain error types.
//!
//! Lookups that fail inside the core are reported with these variants so
//! callers can downcast an `anyhow::Error` and tell a missing test apart from
//! an I/O failure in the storage adapter.

use thiserror::Error;
use uuid::Uuid;

use crate::model::TestId;

/// Errors raised by the traitmark core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested test id is not in the catalog.
    #[error("test not found: {0}")]
    TestNotFound(TestId),

    /// An answer sheet refers to a question the test does not have.
    #[error("test '{test_id}' has no question '{question_id}'")]
    UnknownQuestion { test_id: TestId, question_id: String },

    /// An answer sheet selects an option index the question does not offer.
    #[error("question '{question_id}' has {available} options, index {index} is out of range")]
    OptionOutOfRange {
        question_id: String,
        index: usize,
        available: usize,
    },

    /// No respondent with this id has been registered.
    #[error("respondent not found: {0}")]
    RespondentNotFound(Uuid),
}

impl CoreError {
    /// Returns `true` if this error reports a missing test or respondent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::TestNotFound(_) | CoreError::RespondentNotFound(_)
        )
    }
}
