use super::eligibility::EligibilityReason;
use super::repository::StoreError;

/// Why an actor was refused. Wrong-role and non-owner refusals are reported
/// distinctly so callers can fix the right thing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForbiddenReason {
    #[error("actor is not a registered {0}")]
    WrongRole(&'static str),
    #[error("recruiter does not own this job")]
    NotJobOwner,
    #[error("student does not own this application")]
    NotApplicationOwner,
    #[error("officer belongs to a different college than the student")]
    CrossCollege,
    #[error("student is not eligible: {}", summarize(.0))]
    Ineligible(Vec<EligibilityReason>),
}

fn summarize(reasons: &[EligibilityReason]) -> String {
    reasons
        .iter()
        .map(EligibilityReason::summary)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Malformed inputs rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFault {
    #[error("CTC minimum {min} must be strictly below maximum {max}")]
    CtcRange { min: u32, max: u32 },
    #[error("application deadline must be strictly in the future")]
    DeadlineNotFuture,
    #[error("rejection reason must not be empty")]
    EmptyRejectionReason,
    #[error("interview details are required when scheduling an interview")]
    MissingInterviewDetails,
    #[error("status '{0}' cannot be reached through advance")]
    NotAdvanceTarget(&'static str),
}

/// Engine error taxonomy. Every transition failure maps onto one of these;
/// nothing propagates to the boundary as a generic fault.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("forbidden: {0}")]
    Forbidden(#[from] ForbiddenReason),
    #[error("invalid transition for {entity}: {current} -> {attempted}")]
    InvalidTransition {
        entity: &'static str,
        current: String,
        attempted: String,
    },
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFault),
    #[error("an active application already exists for this student and job")]
    Conflict,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("store unavailable: {0}")]
    Store(String),
}

impl From<StoreError> for PlacementError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateApplication => Self::Conflict,
            StoreError::NotFound => Self::NotFound("record"),
            StoreError::Unavailable(message) => Self::Store(message),
        }
    }
}
