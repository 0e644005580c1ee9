//! Solution import error types

use super::dto::{MissingDependency, ValidationResult};
use crate::api::ApiError;
use crate::lro::PollError;
use thiserror::Error;

/// Errors from solution operations.
///
/// Rejections carry every sub-error the service reported, in the order
/// it reported them, so a failed import can be fixed in one pass
/// instead of one error at a time.
#[derive(Error, Debug)]
pub enum SolutionError {
    #[error("staging rejected with status '{status}':{}", stage_detail(.missing_dependencies, .validation_results))]
    StageRejected {
        status: String,
        missing_dependencies: Vec<MissingDependency>,
        validation_results: Vec<ValidationResult>,
    },

    #[error("import validation failed with status '{status}':{}", message_detail(.error_messages))]
    ImportValidationFailed {
        status: String,
        error_messages: Vec<String>,
    },

    #[error("solution '{0}' not found")]
    NotFound(String),

    #[error("solution content is empty")]
    EmptyContent,

    #[error("invalid deployment settings: {0}")]
    Settings(String),

    #[error("solution import did not complete before the deadline")]
    DeadlineExceeded,

    #[error("solution import was cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn stage_detail(
    missing_dependencies: &[MissingDependency],
    validation_results: &[ValidationResult],
) -> String {
    let mut detail = String::new();
    for dependency in missing_dependencies {
        detail.push_str(&format!(
            "\n  missing dependency: {} '{}' required by {} '{}' (solution '{}')",
            dependency.required_component_type,
            dependency.required_component_display_name,
            dependency.component_type,
            dependency.component_display_name,
            dependency.required_solution_name,
        ));
    }
    for result in validation_results {
        detail.push_str(&format!(
            "\n  {} [{}]: {}",
            result.solution_validation_result_type, result.error_code, result.message,
        ));
    }
    detail
}

fn message_detail(error_messages: &[String]) -> String {
    let mut detail = String::new();
    for message in error_messages {
        detail.push_str("\n  ");
        detail.push_str(message);
    }
    detail
}

impl SolutionError {
    /// Whether retrying the whole operation could succeed.
    ///
    /// Semantic rejections are permanent: resending the same content
    /// reproduces them. Transport faults and exhausted time bounds are
    /// worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            SolutionError::StageRejected { .. }
            | SolutionError::ImportValidationFailed { .. }
            | SolutionError::NotFound(_)
            | SolutionError::EmptyContent
            | SolutionError::Settings(_) => false,
            SolutionError::DeadlineExceeded | SolutionError::Cancelled => true,
            SolutionError::Api(e) => e.is_retryable(),
        }
    }
}

impl From<PollError<ApiError>> for SolutionError {
    fn from(err: PollError<ApiError>) -> Self {
        match err {
            PollError::Fetch(e) => SolutionError::Api(e),
            PollError::DeadlineExceeded => SolutionError::DeadlineExceeded,
            PollError::Cancelled => SolutionError::Cancelled,
        }
    }
}
