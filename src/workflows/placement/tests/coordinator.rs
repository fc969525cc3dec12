use std::sync::Arc;
use std::thread;

use chrono::Duration;

use super::common::*;
use crate::workflows::placement::{
    Application, ApplicationId, ApplicationStatus, PlacementStore, StoreError,
};

#[test]
fn concurrent_applies_create_exactly_one_application() {
    let (engine, store, _) = seeded_engine();
    let job = approved_job(&engine, fixed_now() + Duration::days(14));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let job_id = job.id.clone();
            thread::spawn(move || {
                engine
                    .applications
                    .apply(&student_id(), &job_id, resume(), fixed_now())
            })
        })
        .collect();

    let receipts: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread").expect("apply"))
        .collect();

    let created = receipts.iter().filter(|receipt| receipt.created).count();
    assert_eq!(created, 1);
    let ids: std::collections::HashSet<_> = receipts
        .iter()
        .map(|receipt| receipt.application.id.clone())
        .collect();
    assert_eq!(ids.len(), 1);

    assert_eq!(engine.jobs.get(&job.id).expect("job").application_count, 1);
    let stored = store
        .applications_for_job(&job.id)
        .expect("store read");
    assert_eq!(stored.len(), 1);
}

#[test]
fn count_tracks_the_non_withdrawn_set_through_churn() {
    let (engine, store, _) = seeded_engine();
    let job = approved_job(&engine, fixed_now() + Duration::days(14));

    let first = engine
        .applications
        .apply(&student_id(), &job.id, resume(), fixed_now())
        .expect("first apply");
    engine
        .applications
        .apply(&second_student_id(), &job.id, resume(), fixed_now())
        .expect("second apply");
    engine
        .applications
        .withdraw(&student_id(), &first.application.id)
        .expect("withdraw");
    engine
        .applications
        .apply(&student_id(), &job.id, resume(), fixed_now())
        .expect("re-apply");

    let job = engine.jobs.get(&job.id).expect("job");
    let non_withdrawn = store
        .applications_for_job(&job.id)
        .expect("store read")
        .into_iter()
        .filter(|application| application.status.counts_toward_job())
        .count();
    assert_eq!(job.application_count as usize, non_withdrawn);
    assert_eq!(job.application_count, 2);
}

#[test]
fn rejection_does_not_shrink_the_counted_set() {
    let (engine, store, _) = seeded_engine();
    let job = approved_job(&engine, fixed_now() + Duration::days(14));
    let receipt = engine
        .applications
        .apply(&student_id(), &job.id, resume(), fixed_now())
        .expect("applied");

    engine
        .applications
        .reject(
            &recruiter_id(),
            &receipt.application.id,
            "Position filled",
            fixed_now(),
        )
        .expect("rejected");

    let job = engine.jobs.get(&job.id).expect("job");
    let non_withdrawn = store
        .applications_for_job(&job.id)
        .expect("store read")
        .into_iter()
        .filter(|application| application.status.counts_toward_job())
        .count();
    assert_eq!(job.application_count as usize, non_withdrawn);
    assert_eq!(job.application_count, 1);
}

#[test]
fn store_refuses_a_second_active_insert_for_the_pair() {
    // Backstop below the coordinator: the unique index itself.
    let (engine, store, _) = seeded_engine();
    let job = approved_job(&engine, fixed_now() + Duration::days(14));
    engine
        .applications
        .apply(&student_id(), &job.id, resume(), fixed_now())
        .expect("applied");

    let result: Result<Application, StoreError> = store.transact(|tx| {
        tx.insert_application(Application {
            id: ApplicationId("app-999999".to_string()),
            job: job.id.clone(),
            student: student_id(),
            status: ApplicationStatus::Applied,
            resume: resume(),
            applied_at: fixed_now(),
            reviewed_at: None,
            reviewed_by: None,
            interview: None,
            recruiter_notes: None,
            rejection_reason: None,
        })
    });

    assert_eq!(result, Err(StoreError::DuplicateApplication));
}

#[test]
fn sequence_ids_are_monotonic_per_kind() {
    let (engine, _, _) = seeded_engine();
    let first = approved_job(&engine, fixed_now() + Duration::days(14));
    let second = approved_job(&engine, fixed_now() + Duration::days(14));
    assert!(second.id.0 > first.id.0);

    let a = engine
        .applications
        .apply(&student_id(), &first.id, resume(), fixed_now())
        .expect("applied");
    let b = engine
        .applications
        .apply(&student_id(), &second.id, resume(), fixed_now())
        .expect("applied");
    assert!(b.application.id.0 > a.application.id.0);
}
