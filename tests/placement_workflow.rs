//! Integration scenarios for the placement workflow engine.
//!
//! Exercises the public engine facade and HTTP router end to end: posting
//! review, eligibility gating, the application ladder, and verification
//! revocation, without reaching into private modules.

mod common {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};

    use placement_engine::workflows::placement::{
        CollegeId, CtcRange, EligibilityCriteria, InMemoryPlacementStore, Job, JobDraft,
        PlacementEngine, PlacementStatus, Recruiter, RecruiterId, RecordingNotifier, ResumeRef,
        StudentId, StudentProfile, TnpId, TnpOfficer,
    };

    pub(super) type Engine = PlacementEngine<InMemoryPlacementStore, RecordingNotifier>;

    pub(super) fn deadline() -> DateTime<Utc> {
        Utc::now() + Duration::days(21)
    }

    pub(super) fn recruiter_id() -> RecruiterId {
        RecruiterId("rec-acme".to_string())
    }

    pub(super) fn officer_id() -> TnpId {
        TnpId("tnp-kmit".to_string())
    }

    pub(super) fn student_id() -> StudentId {
        StudentId("stu-asha".to_string())
    }

    pub(super) fn draft() -> JobDraft {
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
            eligibility: EligibilityCriteria {
                min_cgpa: Some(7.0),
                ..EligibilityCriteria::default()
            },
            application_deadline: deadline(),
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

    pub(super) fn build_engine() -> (Arc<Engine>, Arc<RecordingNotifier>) {
        let store = Arc::new(InMemoryPlacementStore::new());
        let notifier = Arc::new(RecordingNotifier::default());

        store.seed_recruiter(Recruiter {
            id: recruiter_id(),
            full_name: "Priya Nair".to_string(),
            email: "priya@acme.example".to_string(),
            mobile: "9000000001".to_string(),
            active: true,
            company_name: "Acme Systems".to_string(),
            industry: "Software".to_string(),
            designation: "Talent Lead".to_string(),
        });
        store.seed_tnp(TnpOfficer {
            id: officer_id(),
            full_name: "R. Sharma".to_string(),
            email: "tnp@kmit.example".to_string(),
            mobile: "9000000002".to_string(),
            active: true,
            college: CollegeId("clg-kmit".to_string()),
            designation: "Placement Officer".to_string(),
            employee_id: "EMP-104".to_string(),
        });
        store.seed_student(StudentProfile {
            id: student_id(),
            full_name: "Asha Verma".to_string(),
            email: "asha@kmit.example".to_string(),
            mobile: "9000000003".to_string(),
            active: true,
            course: "B.Tech CSE".to_string(),
            college: CollegeId("clg-kmit".to_string()),
            cgpa: 8.2,
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
        });

        (Arc::new(PlacementEngine::new(store, notifier.clone())), notifier)
    }

    /// Post a job as the recruiter and approve it as the officer.
    pub(super) fn reviewed_job(engine: &Engine) -> Job {
        let job = engine
            .jobs
            .create(&recruiter_id(), draft(), Utc::now())
            .expect("job created");
        engine
            .jobs
            .approve(&officer_id(), &job.id, Some("Terms verified".to_string()))
            .expect("job approved")
    }
}

mod workflow {
    use chrono::{Duration, Utc};

    use placement_engine::workflows::placement::{
        ApplicationStatus, EligibilityReason, ForbiddenReason, InterviewDetails, InterviewMode,
        PlacementError, StudentProfileUpdate,
    };

    use super::common::*;

    #[test]
    fn posting_to_acceptance_runs_the_full_ladder() {
        let (engine, notifier) = build_engine();
        let job = reviewed_job(&engine);

        let receipt = engine
            .applications
            .apply(&student_id(), &job.id, resume(), Utc::now())
            .expect("application accepted");
        assert!(receipt.created);
        assert_eq!(engine.jobs.get(&job.id).expect("job").application_count, 1);

        let application = engine
            .applications
            .advance(
                &recruiter_id(),
                &receipt.application.id,
                ApplicationStatus::Shortlisted,
                Some("Strong profile".to_string()),
                None,
                Utc::now(),
            )
            .expect("shortlisted");
        let application = engine
            .applications
            .advance(
                &recruiter_id(),
                &application.id,
                ApplicationStatus::InterviewScheduled,
                None,
                Some(InterviewDetails {
                    scheduled_at: Utc::now() + Duration::days(3),
                    mode: InterviewMode::Online,
                    link: Some("https://meet.acme.example/asha".to_string()),
                    venue: None,
                    instructions: None,
                    round: 1,
                }),
                Utc::now(),
            )
            .expect("interview scheduled");
        let application = engine
            .applications
            .advance(
                &recruiter_id(),
                &application.id,
                ApplicationStatus::Accepted,
                Some("Offer extended".to_string()),
                None,
                Utc::now(),
            )
            .expect("accepted");

        assert_eq!(application.status, ApplicationStatus::Accepted);
        let templates: Vec<_> = notifier
            .events()
            .into_iter()
            .map(|notice| notice.template)
            .collect();
        assert!(templates.contains(&"job_approved".to_string()));
        assert!(templates.contains(&"application_submitted".to_string()));
        assert!(templates.contains(&"application_status_changed".to_string()));
    }

    #[test]
    fn sensitive_profile_edit_revokes_trust_and_blocks_reapplication() {
        let (engine, _) = build_engine();
        let job = reviewed_job(&engine);

        engine
            .verification
            .update_profile(
                &student_id(),
                &StudentProfileUpdate {
                    cgpa: Some(9.1),
                    ..StudentProfileUpdate::default()
                },
            )
            .expect("profile updated");

        let result = engine
            .applications
            .apply(&student_id(), &job.id, resume(), Utc::now());
        match result {
            Err(PlacementError::Forbidden(ForbiddenReason::Ineligible(reasons))) => {
                assert_eq!(reasons, vec![EligibilityReason::Unverified]);
            }
            other => panic!("expected unverified refusal, got {other:?}"),
        }

        // Re-verification restores access.
        engine
            .verification
            .set_verified(&officer_id(), &student_id(), true, None)
            .expect("re-verified");
        let receipt = engine
            .applications
            .apply(&student_id(), &job.id, resume(), Utc::now())
            .expect("application accepted");
        assert!(receipt.created);
    }

    #[test]
    fn withdrawal_frees_the_pair_and_the_count() {
        let (engine, _) = build_engine();
        let job = reviewed_job(&engine);

        let receipt = engine
            .applications
            .apply(&student_id(), &job.id, resume(), Utc::now())
            .expect("applied");
        engine
            .applications
            .withdraw(&student_id(), &receipt.application.id)
            .expect("withdrawn");
        assert_eq!(engine.jobs.get(&job.id).expect("job").application_count, 0);

        let again = engine
            .applications
            .apply(&student_id(), &job.id, resume(), Utc::now())
            .expect("re-applied");
        assert!(again.created);
        assert_ne!(again.application.id, receipt.application.id);
    }
}

mod routing {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use placement_engine::workflows::placement::placement_router;

    use super::common::*;

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn apply_route_round_trips_the_full_story() {
        let (engine, _) = build_engine();
        let job = reviewed_job(&engine);
        let router = placement_router(engine);

        let payload = json!({
            "student_id": student_id().0,
            "job_id": job.id.0,
            "resume": {
                "file_name": "asha-verma.pdf",
                "size_bytes": 182044,
                "mime_type": "application/pdf",
                "storage_path": "resumes/stu-asha/asha-verma.pdf",
            },
        });
        let request = Request::post("/api/v1/applications")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
            .expect("request");

        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::CREATED);
        let application = read_json_body(response).await;
        assert_eq!(application.get("status"), Some(&json!("applied")));

        let application_id = application
            .get("id")
            .and_then(Value::as_str)
            .expect("application id")
            .to_string();
        let fetched = router
            .oneshot(
                Request::get(format!("/api/v1/applications/{application_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");
        assert_eq!(fetched.status(), StatusCode::OK);
        let fetched = read_json_body(fetched).await;
        assert_eq!(fetched.get("student"), Some(&json!(student_id().0)));
    }

    #[tokio::test]
    async fn eligible_jobs_route_annotates_each_posting() {
        let (engine, _) = build_engine();
        let job = reviewed_job(&engine);
        let router = placement_router(engine);

        let response = router
            .oneshot(
                Request::get(format!("/api/v1/students/{}/jobs", student_id().0))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let listings = read_json_body(response).await;
        let listings = listings.as_array().expect("array body");
        assert_eq!(listings.len(), 1);
        assert_eq!(
            listings[0].pointer("/job/id"),
            Some(&json!(job.id.0))
        );
        assert_eq!(
            listings[0].pointer("/eligibility/eligible"),
            Some(&json!(true))
        );
    }
}
