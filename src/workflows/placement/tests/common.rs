use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::workflows::placement::{
    CollegeId, CtcRange, EligibilityCriteria, InMemoryPlacementStore, Job, JobDraft,
    PlacementEngine, PlacementStatus, Recruiter, RecruiterId, RecordingNotifier, ResumeRef,
    StudentId, StudentProfile, TnpId, TnpOfficer,
};

pub(super) type TestEngine = PlacementEngine<InMemoryPlacementStore, RecordingNotifier>;

/// Deterministic clock for engine-level tests.
pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Router tests go through handlers that read the wall clock, so their
/// deadlines must be future relative to it.
pub(super) fn future_deadline() -> DateTime<Utc> {
    Utc::now() + Duration::days(30)
}

pub(super) fn college() -> CollegeId {
    CollegeId("clg-kmit".to_string())
}

pub(super) fn other_college() -> CollegeId {
    CollegeId("clg-vnr".to_string())
}

pub(super) fn recruiter_id() -> RecruiterId {
    RecruiterId("rec-acme".to_string())
}

pub(super) fn other_recruiter_id() -> RecruiterId {
    RecruiterId("rec-globex".to_string())
}

pub(super) fn officer_id() -> TnpId {
    TnpId("tnp-kmit".to_string())
}

pub(super) fn other_officer_id() -> TnpId {
    TnpId("tnp-vnr".to_string())
}

pub(super) fn student_id() -> StudentId {
    StudentId("stu-asha".to_string())
}

pub(super) fn second_student_id() -> StudentId {
    StudentId("stu-vikram".to_string())
}

pub(super) fn recruiter(id: RecruiterId) -> Recruiter {
    Recruiter {
        id,
        full_name: "Priya Nair".to_string(),
        email: "priya@acme.example".to_string(),
        mobile: "9000000001".to_string(),
        active: true,
        company_name: "Acme Systems".to_string(),
        industry: "Software".to_string(),
        designation: "Talent Lead".to_string(),
    }
}

pub(super) fn officer(id: TnpId, college: CollegeId) -> TnpOfficer {
    TnpOfficer {
        id,
        full_name: "R. Sharma".to_string(),
        email: "tnp@kmit.example".to_string(),
        mobile: "9000000002".to_string(),
        active: true,
        college,
        designation: "Placement Officer".to_string(),
        employee_id: "EMP-104".to_string(),
    }
}

pub(super) fn verified_student(id: StudentId, cgpa: f32) -> StudentProfile {
    StudentProfile {
        id,
        full_name: "Asha Verma".to_string(),
        email: "asha@kmit.example".to_string(),
        mobile: "9000000003".to_string(),
        active: true,
        course: "B.Tech CSE".to_string(),
        college: college(),
        cgpa,
        backlogs: 0,
        year_of_completion: 2026,
        registration_number: "KMIT2026-042".to_string(),
        tenth_marks: Some(91.0),
        twelfth_marks: Some(88.5),
        last_semester_marksheet: None,
        profile_avatar: None,
        area_of_interest: Some("Backend systems".to_string()),
        is_verified: true,
        verified_by: Some(officer_id()),
        verification_note: Some("Documents reviewed".to_string()),
        placement_status: PlacementStatus::NotPlaced,
    }
}

pub(super) fn resume() -> ResumeRef {
    ResumeRef {
        file_name: "asha-verma.pdf".to_string(),
        size_bytes: 182_044,
        mime_type: "application/pdf".to_string(),
        storage_path: "resumes/stu-asha/asha-verma.pdf".to_string(),
    }
}

pub(super) fn draft(deadline: DateTime<Utc>) -> JobDraft {
    JobDraft {
        title: "Graduate Software Engineer".to_string(),
        description: "Backend services team".to_string(),
        company: "Acme Systems".to_string(),
        location: "Hyderabad".to_string(),
        ctc: CtcRange {
            min: 600_000,
            max: 1_000_000,
            currency: "INR".to_string(),
        },
        eligibility: EligibilityCriteria::default(),
        application_deadline: deadline,
    }
}

pub(super) fn build_engine() -> (
    Arc<TestEngine>,
    Arc<InMemoryPlacementStore>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(InMemoryPlacementStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Arc::new(PlacementEngine::new(store.clone(), notifier.clone()));
    (engine, store, notifier)
}

/// Engine with the standard cast seeded: two recruiters, two officers from
/// different colleges, and two verified students.
pub(super) fn seeded_engine() -> (
    Arc<TestEngine>,
    Arc<InMemoryPlacementStore>,
    Arc<RecordingNotifier>,
) {
    let (engine, store, notifier) = build_engine();
    store.seed_recruiter(recruiter(recruiter_id()));
    store.seed_recruiter(recruiter(other_recruiter_id()));
    store.seed_tnp(officer(officer_id(), college()));
    store.seed_tnp(officer(other_officer_id(), other_college()));
    store.seed_student(verified_student(student_id(), 8.2));
    store.seed_student(verified_student(second_student_id(), 6.5));
    (engine, store, notifier)
}

/// Create a posting as the standard recruiter and approve it as the standard
/// officer.
pub(super) fn approved_job(engine: &TestEngine, deadline: DateTime<Utc>) -> Job {
    let job = engine
        .jobs
        .create(&recruiter_id(), draft(deadline), deadline - Duration::days(14))
        .expect("job created");
    engine
        .jobs
        .approve(&officer_id(), &job.id, None)
        .expect("job approved")
}
