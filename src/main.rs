use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use placement_engine::config::AppConfig;
use placement_engine::error::AppError;
use placement_engine::telemetry;
use placement_engine::workflows::placement::{
    ApplicationStatus, CollegeId, CtcRange, EligibilityCriteria, InMemoryPlacementStore,
    InterviewDetails, InterviewMode, JobDraft, PlacementEngine, PlacementStatus, Recruiter,
    RecruiterId, ResumeRef, StudentId, StudentProfile, TnpId, TnpOfficer, TracingNotifier,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Placement Workflow Engine",
    about = "Run the campus placement coordination service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a scripted end-to-end placement scenario against an in-memory store
    Demo,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo => run_demo(),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let store = Arc::new(InMemoryPlacementStore::new());
    let notifier = Arc::new(TracingNotifier);
    let engine = Arc::new(PlacementEngine::new(store, notifier));

    let app = placement_engine::workflows::placement::placement_router(engine)
        .merge(
            Router::new()
                .route("/health", get(healthcheck))
                .route("/ready", get(readiness_endpoint))
                .route("/metrics", get(metrics_endpoint))
                .with_state(state),
        )
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement workflow engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn run_demo() -> Result<(), AppError> {
    let store = Arc::new(InMemoryPlacementStore::new());
    let notifier = Arc::new(TracingNotifier);

    let college = CollegeId("clg-kmit".to_string());
    let recruiter_id = RecruiterId("rec-acme".to_string());
    let tnp_id = TnpId("tnp-kmit".to_string());
    let student_id = StudentId("stu-asha".to_string());

    store.seed_recruiter(Recruiter {
        id: recruiter_id.clone(),
        full_name: "Priya Nair".to_string(),
        email: "priya@acme.example".to_string(),
        mobile: "9000000001".to_string(),
        active: true,
        company_name: "Acme Systems".to_string(),
        industry: "Software".to_string(),
        designation: "Talent Lead".to_string(),
    });
    store.seed_tnp(TnpOfficer {
        id: tnp_id.clone(),
        full_name: "R. Sharma".to_string(),
        email: "tnp@kmit.example".to_string(),
        mobile: "9000000002".to_string(),
        active: true,
        college: college.clone(),
        designation: "Placement Officer".to_string(),
        employee_id: "EMP-104".to_string(),
    });
    store.seed_student(StudentProfile {
        id: student_id.clone(),
        full_name: "Asha Verma".to_string(),
        email: "asha@kmit.example".to_string(),
        mobile: "9000000003".to_string(),
        active: true,
        course: "B.Tech CSE".to_string(),
        college,
        cgpa: 8.2,
        backlogs: 0,
        year_of_completion: 2026,
        registration_number: "KMIT2026-042".to_string(),
        tenth_marks: Some(91.0),
        twelfth_marks: Some(88.5),
        last_semester_marksheet: None,
        profile_avatar: None,
        area_of_interest: Some("Backend systems".to_string()),
        is_verified: false,
        verified_by: None,
        verification_note: None,
        placement_status: PlacementStatus::NotPlaced,
    });

    let engine = PlacementEngine::new(store, notifier);
    let now = Utc::now();

    println!("Placement workflow demo");

    let job = engine.jobs.create(
        &recruiter_id,
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
            application_deadline: now + Duration::days(14),
        },
        now,
    )?;
    println!("- job {} posted ({})", job.id.0, job.status.label());

    let report = engine
        .applications
        .eligibility(&student_id, &job.id, now)?;
    println!(
        "- eligibility before review: eligible={} reasons={}",
        report.eligible,
        report
            .reasons
            .iter()
            .map(|reason| reason.summary())
            .collect::<Vec<_>>()
            .join("; ")
    );

    let job = engine
        .jobs
        .approve(&tnp_id, &job.id, Some("Verified terms".to_string()))?;
    println!("- job approved by {}", tnp_id.0);

    engine
        .verification
        .set_verified(&tnp_id, &student_id, true, Some("Documents reviewed".to_string()))?;
    println!("- student verified");

    let resume = ResumeRef {
        file_name: "asha-verma.pdf".to_string(),
        size_bytes: 182_044,
        mime_type: "application/pdf".to_string(),
        storage_path: "resumes/stu-asha/asha-verma.pdf".to_string(),
    };
    let receipt = engine
        .applications
        .apply(&student_id, &job.id, resume.clone(), now)?;
    println!(
        "- applied: {} (created={})",
        receipt.application.id.0, receipt.created
    );

    let repeat = engine.applications.apply(&student_id, &job.id, resume, now)?;
    println!("- repeat apply collapsed to existing (created={})", repeat.created);

    engine.applications.advance(
        &recruiter_id,
        &receipt.application.id,
        ApplicationStatus::Shortlisted,
        Some("Strong profile".to_string()),
        None,
        now,
    )?;
    engine.applications.advance(
        &recruiter_id,
        &receipt.application.id,
        ApplicationStatus::InterviewScheduled,
        None,
        Some(InterviewDetails {
            scheduled_at: now + Duration::days(3),
            mode: InterviewMode::Online,
            link: Some("https://meet.example/acme-r1".to_string()),
            venue: None,
            instructions: Some("Bring college ID".to_string()),
            round: 1,
        }),
        now,
    )?;
    let accepted = engine.applications.advance(
        &recruiter_id,
        &receipt.application.id,
        ApplicationStatus::Accepted,
        Some("Offer extended".to_string()),
        None,
        now,
    )?;
    println!("- application finished as {}", accepted.status.label());

    let job = engine.jobs.get(&job.id)?;
    println!("- job {} now has {} application(s)", job.id.0, job.application_count);

    Ok(())
}
