//! In-memory store used by the service binary, the demo command, and tests.
//!
//! A single mutex serializes transactions, which gives `transact` the
//! serializable-unit guarantee the coordinator relies on. Units must finish
//! all reads and checks before their first write; there is no rollback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{
    Application, ApplicationId, Job, JobId, Recruiter, RecruiterId, StudentId, StudentProfile,
    TnpId, TnpOfficer,
};
use super::repository::{
    NotificationPublisher, NotifyError, PlacementNotice, PlacementStore, StoreError, StoreTx,
};

#[derive(Default)]
struct StoreState {
    students: HashMap<StudentId, StudentProfile>,
    recruiters: HashMap<RecruiterId, Recruiter>,
    tnps: HashMap<TnpId, TnpOfficer>,
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    job_seq: u64,
    application_seq: u64,
}

impl StoreTx for StoreState {
    fn student(&self, id: &StudentId) -> Option<StudentProfile> {
        self.students.get(id).cloned()
    }

    fn put_student(&mut self, student: StudentProfile) {
        self.students.insert(student.id.clone(), student);
    }

    fn recruiter(&self, id: &RecruiterId) -> Option<Recruiter> {
        self.recruiters.get(id).cloned()
    }

    fn put_recruiter(&mut self, recruiter: Recruiter) {
        self.recruiters.insert(recruiter.id.clone(), recruiter);
    }

    fn tnp(&self, id: &TnpId) -> Option<TnpOfficer> {
        self.tnps.get(id).cloned()
    }

    fn put_tnp(&mut self, officer: TnpOfficer) {
        self.tnps.insert(officer.id.clone(), officer);
    }

    fn job(&self, id: &JobId) -> Option<Job> {
        self.jobs.get(id).cloned()
    }

    fn put_job(&mut self, job: Job) {
        self.jobs.insert(job.id.clone(), job);
    }

    fn remove_job(&mut self, id: &JobId) {
        self.jobs.remove(id);
    }

    fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        jobs
    }

    fn next_job_id(&mut self) -> JobId {
        self.job_seq += 1;
        JobId(format!("job-{:06}", self.job_seq))
    }

    fn application(&self, id: &ApplicationId) -> Option<Application> {
        self.applications.get(id).cloned()
    }

    fn insert_application(&mut self, application: Application) -> Result<Application, StoreError> {
        if self
            .active_application(&application.student, &application.job)
            .is_some()
        {
            return Err(StoreError::DuplicateApplication);
        }
        self.applications
            .insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn put_application(&mut self, application: Application) {
        self.applications.insert(application.id.clone(), application);
    }

    fn active_application(&self, student: &StudentId, job: &JobId) -> Option<Application> {
        self.applications
            .values()
            .find(|application| {
                application.student == *student
                    && application.job == *job
                    && application.status.counts_toward_job()
            })
            .cloned()
    }

    fn applications_for_job(&self, job: &JobId) -> Vec<Application> {
        self.applications
            .values()
            .filter(|application| application.job == *job)
            .cloned()
            .collect()
    }

    fn next_application_id(&mut self) -> ApplicationId {
        self.application_seq += 1;
        ApplicationId(format!("app-{:06}", self.application_seq))
    }
}

/// Mutex-backed store satisfying the serializable-unit contract.
#[derive(Default)]
pub struct InMemoryPlacementStore {
    state: Mutex<StoreState>,
}

impl InMemoryPlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_student(&self, student: StudentProfile) {
        let mut guard = self.state.lock().expect("store mutex poisoned");
        guard.put_student(student);
    }

    pub fn seed_recruiter(&self, recruiter: Recruiter) {
        let mut guard = self.state.lock().expect("store mutex poisoned");
        guard.put_recruiter(recruiter);
    }

    pub fn seed_tnp(&self, officer: TnpOfficer) {
        let mut guard = self.state.lock().expect("store mutex poisoned");
        guard.put_tnp(officer);
    }
}

impl PlacementStore for InMemoryPlacementStore {
    fn transact<T, E, F>(&self, unit: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E>,
    {
        let mut guard = self.state.lock().expect("store mutex poisoned");
        unit(&mut *guard)
    }
}

/// Publisher that logs notices instead of delivering them; the default for
/// the service binary until a real transport is wired in.
#[derive(Default, Clone)]
pub struct TracingNotifier;

impl NotificationPublisher for TracingNotifier {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NotifyError> {
        tracing::info!(template = %notice.template, details = ?notice.details, "placement notice");
        Ok(())
    }
}

/// Publisher that records every notice for assertions.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<PlacementNotice>>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<PlacementNotice> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationPublisher for RecordingNotifier {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}
