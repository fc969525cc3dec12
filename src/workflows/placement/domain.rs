use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for recruiter accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterId(pub String);

/// Identifier wrapper for Training & Placement officers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TnpId(pub String);

/// Identifier wrapper for colleges; students and officers reference one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollegeId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Whether a student has been placed through an accepted application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Placed,
    NotPlaced,
}

/// Student record as the engine sees it. `is_verified` may only be written by
/// the verification gate; `placement_status` flips to `Placed` only when an
/// application reaches `Accepted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub active: bool,
    pub course: String,
    pub college: CollegeId,
    pub cgpa: f32,
    pub backlogs: u8,
    pub year_of_completion: u16,
    pub registration_number: String,
    pub tenth_marks: Option<f32>,
    pub twelfth_marks: Option<f32>,
    pub last_semester_marksheet: Option<String>,
    pub profile_avatar: Option<String>,
    pub area_of_interest: Option<String>,
    pub is_verified: bool,
    pub verified_by: Option<TnpId>,
    pub verification_note: Option<String>,
    pub placement_status: PlacementStatus,
}

/// Recruiter account; implicitly trusted, no verification gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recruiter {
    pub id: RecruiterId,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub active: bool,
    pub company_name: String,
    pub industry: String,
    pub designation: String,
}

/// Training & Placement officer; privileged for job review and verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TnpOfficer {
    pub id: TnpId,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub active: bool,
    pub college: CollegeId,
    pub designation: String,
    pub employee_id: String,
}

/// Advertised compensation range; `min` must stay strictly below `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtcRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

/// Optional screening criteria a recruiter attaches to a posting. Unset
/// criteria do not constrain applicants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cgpa: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_courses: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_backlogs: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_completion_years: Option<BTreeSet<u16>>,
}

/// Posting review status controlled by TnP officers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Approved,
    Rejected,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
        }
    }
}

/// A job posting. `application_count` is owned by the consistency coordinator;
/// nothing else writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub recruiter: RecruiterId,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub ctc: CtcRange,
    pub eligibility: EligibilityCriteria,
    pub application_deadline: DateTime<Utc>,
    pub status: JobStatus,
    pub is_active: bool,
    pub application_count: u32,
    pub posted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<TnpId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Inbound payload for creating a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: String,
    pub ctc: CtcRange,
    #[serde(default)]
    pub eligibility: EligibilityCriteria,
    pub application_deadline: DateTime<Utc>,
}

/// Partial update for a posting. Only set fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctc: Option<CtcRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl JobPatch {
    /// True when the patch flips the active flag and nothing else. Deactivation
    /// is the one edit allowed on an approved posting with applicants.
    pub fn is_activation_only(&self) -> bool {
        self.is_active.is_some()
            && self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.ctc.is_none()
            && self.eligibility.is_none()
            && self.application_deadline.is_none()
    }
}

/// Status of a single student's application to a single posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    Shortlisted,
    InterviewScheduled,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::InterviewScheduled => "interview_scheduled",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Position on the forward ladder; `Rejected` and `Withdrawn` sit outside it.
    const fn ladder_rank(self) -> Option<u8> {
        match self {
            ApplicationStatus::Applied => Some(0),
            ApplicationStatus::UnderReview => Some(1),
            ApplicationStatus::Shortlisted => Some(2),
            ApplicationStatus::InterviewScheduled => Some(3),
            ApplicationStatus::Accepted => Some(4),
            ApplicationStatus::Rejected | ApplicationStatus::Withdrawn => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted
                | ApplicationStatus::Rejected
                | ApplicationStatus::Withdrawn
        )
    }

    /// Withdrawn applications leave the counted set; everything else stays in it.
    pub const fn counts_toward_job(self) -> bool {
        !matches!(self, ApplicationStatus::Withdrawn)
    }

    /// Forward-only ladder moves. Skipping rungs is allowed; going back is not.
    pub fn can_advance_to(self, next: ApplicationStatus) -> bool {
        match (self.ladder_rank(), next.ladder_rank()) {
            (Some(current), Some(target)) => target > current,
            _ => false,
        }
    }

    /// Students lose unilateral withdrawal once the recruiter moves past review.
    pub const fn can_withdraw(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Applied | ApplicationStatus::UnderReview
        )
    }
}

/// Delivery mode for a scheduled interview round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    Online,
    Offline,
}

/// Scheduling details captured when an application moves to `InterviewScheduled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub scheduled_at: DateTime<Utc>,
    pub mode: InterviewMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub round: u8,
}

/// Opaque pointer to the uploaded resume artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRef {
    pub file_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub storage_path: String,
}

/// An application is never physically deleted; withdrawal and rejection are
/// terminal statuses so the audit history survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub student: StudentId,
    pub status: ApplicationStatus,
    pub resume: ResumeRef,
    pub applied_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<RecruiterId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview: Option<InterviewDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
