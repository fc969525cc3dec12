//! Placement workflow engine.
//!
//! Connects students, recruiters, and placement officers around two
//! workflows: job posting review and application processing. The eligibility
//! evaluator gates entry into the application state machine, the verification
//! gate owns the student trust flag, and the consistency coordinator keeps
//! application counts and the one-active-application-per-pair rule intact
//! under concurrent writes.

pub mod applications;
pub mod coordinator;
pub mod domain;
pub mod eligibility;
pub mod error;
pub mod jobs;
pub mod memory;
pub mod repository;
pub mod router;
pub mod verification;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use applications::{AnnotatedJob, ApplicationLifecycle};
pub use coordinator::{ApplyReceipt, ConsistencyCoordinator};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, CollegeId, CtcRange, EligibilityCriteria,
    InterviewDetails, InterviewMode, Job, JobDraft, JobId, JobPatch, JobStatus, PlacementStatus,
    Recruiter, RecruiterId, ResumeRef, StudentId, StudentProfile, TnpId, TnpOfficer,
};
pub use eligibility::{EligibilityReason, EligibilityReport};
pub use error::{ForbiddenReason, PlacementError, ValidationFault};
pub use jobs::JobLifecycle;
pub use memory::{InMemoryPlacementStore, RecordingNotifier, TracingNotifier};
pub use repository::{
    NotificationPublisher, NotifyError, PlacementNotice, PlacementStore, StoreError, StoreTx,
};
pub use router::placement_router;
pub use verification::{
    ProfileField, StudentProfileUpdate, VerificationGate, VerificationService,
};

/// Bundle of the three store-backed services sharing one store and notifier.
pub struct PlacementEngine<S, N> {
    pub jobs: JobLifecycle<S, N>,
    pub applications: ApplicationLifecycle<S, N>,
    pub verification: VerificationService<S>,
}

impl<S, N> PlacementEngine<S, N>
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        let coordinator = ConsistencyCoordinator::new(Arc::clone(&store));
        Self {
            jobs: JobLifecycle::new(coordinator.clone(), Arc::clone(&notifier)),
            applications: ApplicationLifecycle::new(coordinator, notifier),
            verification: VerificationService::new(store),
        }
    }
}
