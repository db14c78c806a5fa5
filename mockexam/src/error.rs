// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Mock-test error types

use rusoto_core::RusotoError;
use std::error;
use std::fmt::{Display, Formatter};
use std::result;

/// Result type for operations that could result in an [MockExamError]
pub type Result<T> = result::Result<T, MockExamError>;

/// Mock-test error
#[derive(Debug)]
pub enum MockExamError {
    /// Error returned when the requested question type is not one of the
    /// recognized categories. This is the only error the caller gets to see.
    InvalidCategory(String),
    /// Error returned when a category has no index record.
    IndexNotFound(String),
    /// Error returned when the index record of a category lists no question.
    NoQuestionsAvailable(String),
    /// Error returned when the index attribute is not a list of sort keys.
    MalformedIndex(String),
    /// Error returned when a sort key listed in the index does not resolve to
    /// a question record.
    QuestionRecordMissing {
        /// The partition the index belongs to.
        category: String,
        /// The sort key drawn from the index.
        id:       String,
    },
    /// Error returned when the authorizer context carries no caller identity.
    MissingCallerIdentity,
    /// Error returned when the function is not configured properly.
    Config(String),
    /// Error returned when an item cannot be converted between DynamoDB
    /// attribute values and JSON.
    Serialization(String),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned when accessing the storage service fails.
    Storage(String),
    /// Error returned as a consequence of an error in the service.
    /// This error should not happen in normal usage.
    Internal(String),
}

impl MockExamError {
    /// Returns true if the error was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MockExamError::InvalidCategory(_))
    }
}

impl From<serde_json::Error> for MockExamError {
    fn from(e: serde_json::Error) -> Self {
        MockExamError::SerdeJson(e)
    }
}

impl<E: error::Error + 'static> From<RusotoError<E>> for MockExamError {
    fn from(e: RusotoError<E>) -> Self {
        MockExamError::Storage(e.to_string())
    }
}

impl Display for MockExamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            MockExamError::InvalidCategory(ref desc) => {
                write!(f, "Invalid question type: {:?}", desc)
            }
            MockExamError::IndexNotFound(ref desc) => {
                write!(f, "Index not found for {}", desc)
            }
            MockExamError::NoQuestionsAvailable(ref desc) => {
                write!(f, "No questions found for {}", desc)
            }
            MockExamError::MalformedIndex(ref desc) => {
                write!(f, "Malformed index for {}", desc)
            }
            MockExamError::QuestionRecordMissing {
                ref category,
                ref id,
            } => write!(
                f,
                "Question {} is listed in the index of {} but does not exist",
                id, category
            ),
            MockExamError::MissingCallerIdentity => {
                write!(f, "No caller identity in the authorizer context")
            }
            MockExamError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            MockExamError::Serialization(ref desc) => {
                write!(f, "Serialization error: {}", desc)
            }
            MockExamError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            MockExamError::Storage(ref desc) => write!(f, "Storage error: {}", desc),
            MockExamError::Internal(ref desc) => write!(
                f,
                "Internal error: {}. This was likely caused by a bug in the service's \
                    code and we would welcome that you file an bug report in our issue tracker",
                desc
            ),
        }
    }
}

impl error::Error for MockExamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_category_is_a_client_error() {
        assert!(MockExamError::InvalidCategory("essay".to_owned()).is_client_error());
        for e in [
            MockExamError::IndexNotFound("speaking".to_owned()),
            MockExamError::NoQuestionsAvailable("writing".to_owned()),
            MockExamError::MissingCallerIdentity,
            MockExamError::Storage("timeout".to_owned()),
        ] {
            assert!(!e.is_client_error(), "{}", e);
        }
    }

    #[test]
    fn error_context() {
        assert_eq!(
            "No questions found for writing",
            MockExamError::NoQuestionsAvailable("writing".to_owned()).to_string()
        );
        assert_eq!(
            "Question q9 is listed in the index of listening but does not exist",
            MockExamError::QuestionRecordMissing {
                category: "listening".to_owned(),
                id:       "q9".to_owned(),
            }
            .to_string()
        );
    }
}
