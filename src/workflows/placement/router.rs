use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicationId, ApplicationStatus, InterviewDetails, JobDraft, JobId, JobPatch, RecruiterId,
    ResumeRef, StudentId, TnpId,
};
use super::error::PlacementError;
use super::repository::{NotificationPublisher, PlacementStore};
use super::verification::StudentProfileUpdate;
use super::PlacementEngine;

/// Router builder exposing the placement workflow operations.
pub fn placement_router<S, N>(engine: Arc<PlacementEngine<S, N>>) -> Router
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(create_job_handler::<S, N>))
        .route(
            "/api/v1/jobs/:job_id",
            get(get_job_handler::<S, N>)
                .patch(edit_job_handler::<S, N>)
                .delete(delete_job_handler::<S, N>),
        )
        .route(
            "/api/v1/jobs/:job_id/approve",
            post(approve_job_handler::<S, N>),
        )
        .route(
            "/api/v1/jobs/:job_id/reject",
            post(reject_job_handler::<S, N>),
        )
        .route("/api/v1/applications", post(apply_handler::<S, N>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id/advance",
            post(advance_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id/withdraw",
            post(withdraw_handler::<S, N>),
        )
        .route(
            "/api/v1/applications/:application_id/reject",
            post(reject_application_handler::<S, N>),
        )
        .route(
            "/api/v1/students/:student_id/verification",
            post(set_verification_handler::<S, N>),
        )
        .route(
            "/api/v1/students/:student_id/profile",
            patch(update_profile_handler::<S, N>),
        )
        .route(
            "/api/v1/students/:student_id/eligibility/:job_id",
            get(eligibility_handler::<S, N>),
        )
        .route(
            "/api/v1/students/:student_id/jobs",
            get(eligible_jobs_handler::<S, N>),
        )
        .with_state(engine)
}

fn error_response(error: PlacementError) -> Response {
    let status = match &error {
        PlacementError::Forbidden(_) => StatusCode::FORBIDDEN,
        PlacementError::NotFound(_) => StatusCode::NOT_FOUND,
        PlacementError::InvalidTransition { .. } | PlacementError::Conflict => {
            StatusCode::CONFLICT
        }
        PlacementError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PlacementError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
struct CreateJobRequest {
    recruiter_id: String,
    #[serde(flatten)]
    draft: JobDraft,
}

async fn create_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    axum::Json(request): axum::Json<CreateJobRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let recruiter = RecruiterId(request.recruiter_id);
    match engine.jobs.create(&recruiter, request.draft, Utc::now()) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn get_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    match engine.jobs.get(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct EditJobRequest {
    recruiter_id: String,
    #[serde(flatten)]
    patch: JobPatch,
}

async fn edit_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<EditJobRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let recruiter = RecruiterId(request.recruiter_id);
    match engine
        .jobs
        .edit(&recruiter, &JobId(job_id), request.patch, Utc::now())
    {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct ActorQuery {
    recruiter_id: String,
}

async fn delete_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(job_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let recruiter = RecruiterId(query.recruiter_id);
    match engine.jobs.delete(&recruiter, &JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct ApproveJobRequest {
    tnp_id: String,
    #[serde(default)]
    notes: Option<String>,
}

async fn approve_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<ApproveJobRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let officer = TnpId(request.tnp_id);
    match engine.jobs.approve(&officer, &JobId(job_id), request.notes) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct RejectJobRequest {
    tnp_id: String,
    reason: String,
}

async fn reject_job_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(job_id): Path<String>,
    axum::Json(request): axum::Json<RejectJobRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let officer = TnpId(request.tnp_id);
    match engine
        .jobs
        .reject(&officer, &JobId(job_id), &request.reason)
    {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct ApplyRequest {
    student_id: String,
    job_id: String,
    resume: ResumeRef,
}

async fn apply_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let student = StudentId(request.student_id);
    let job = JobId(request.job_id);
    match engine
        .applications
        .apply(&student, &job, request.resume, Utc::now())
    {
        Ok(receipt) => {
            let status = if receipt.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(receipt.application)).into_response()
        }
        Err(error) => error_response(error),
    }
}

async fn get_application_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    match engine.applications.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct AdvanceRequest {
    recruiter_id: String,
    status: ApplicationStatus,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    interview: Option<InterviewDetails>,
}

async fn advance_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<AdvanceRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let recruiter = RecruiterId(request.recruiter_id);
    match engine.applications.advance(
        &recruiter,
        &ApplicationId(application_id),
        request.status,
        request.notes,
        request.interview,
        Utc::now(),
    ) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct WithdrawRequest {
    student_id: String,
}

async fn withdraw_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<WithdrawRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let student = StudentId(request.student_id);
    match engine
        .applications
        .withdraw(&student, &ApplicationId(application_id))
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct RejectApplicationRequest {
    recruiter_id: String,
    reason: String,
}

async fn reject_application_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<RejectApplicationRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let recruiter = RecruiterId(request.recruiter_id);
    match engine.applications.reject(
        &recruiter,
        &ApplicationId(application_id),
        &request.reason,
        Utc::now(),
    ) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
struct VerificationRequest {
    tnp_id: String,
    verified: bool,
    #[serde(default)]
    note: Option<String>,
}

async fn set_verification_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(student_id): Path<String>,
    axum::Json(request): axum::Json<VerificationRequest>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    let officer = TnpId(request.tnp_id);
    match engine.verification.set_verified(
        &officer,
        &StudentId(student_id),
        request.verified,
        request.note,
    ) {
        Ok(student) => (StatusCode::OK, axum::Json(student)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn update_profile_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(student_id): Path<String>,
    axum::Json(update): axum::Json<StudentProfileUpdate>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    match engine
        .verification
        .update_profile(&StudentId(student_id), &update)
    {
        Ok(student) => (StatusCode::OK, axum::Json(student)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn eligibility_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path((student_id, job_id)): Path<(String, String)>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    match engine.applications.eligibility(
        &StudentId(student_id),
        &JobId(job_id),
        Utc::now(),
    ) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn eligible_jobs_handler<S, N>(
    State(engine): State<Arc<PlacementEngine<S, N>>>,
    Path(student_id): Path<String>,
) -> Response
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    match engine
        .applications
        .eligible_jobs(&StudentId(student_id), Utc::now())
    {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(error) => error_response(error),
    }
}
