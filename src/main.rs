use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use gallerize_scoring::config::AppConfig;
use gallerize_scoring::error::AppError;
use gallerize_scoring::telemetry;
use gallerize_scoring::workflows::tagging::{
    answer_router, AnswerEvaluation, AnswerOutcome, AnswerScorer, AnswerScoringService,
    AnswerSubmission, MemoryTagStats, MemoryUserDirectory, SubmissionGuard, TrialAnswer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Gallerize Answer Scorer",
    about = "Score crowd-sourced image-tagging answers and maintain tagger trust weights",
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
    /// Score a single submission offline and print the breakdown
    Score(ScoreArgs),
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

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Path to a JSON file containing an answer submission
    #[arg(long)]
    submission: PathBuf,
    /// Current trust weight to score against
    #[arg(long, default_value_t = 1.0)]
    weight: f64,
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
        Command::Score(args) => run_score(args),
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
        metrics: Arc::new(prometheus_handle),
    };

    let stats = Arc::new(MemoryTagStats::default());
    let users = Arc::new(MemoryUserDirectory::with_fallback_weight(1.0));
    let service = Arc::new(AnswerScoringService::new(
        stats,
        users,
        config.scoring.clone(),
    ));

    let app = answer_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(prometheus_layer)
        .layer(Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "answer scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let raw = std::fs::read(&args.submission)?;
    let submission: AnswerSubmission = serde_json::from_slice(&raw)?;

    let answer = SubmissionGuard::default().answer_from_submission(submission)?;
    let scorer = AnswerScorer::new(config.scoring);
    let evaluation = scorer.score(&answer, args.weight)?;

    render_evaluation(&answer, &evaluation, args.weight);
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
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

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn render_evaluation(answer: &TrialAnswer, evaluation: &AnswerEvaluation, weight: f64) {
    println!("Answer scoring");
    println!("User: {}", answer.user_id.0);
    println!("Target concept: {}", answer.target_concept);
    println!(
        "Shown: {} images ({} invalid), tagged: {}",
        answer.shown_images.len(),
        answer.invalid_shown_count,
        answer.tagged_images.len()
    );

    match evaluation.outcome {
        AnswerOutcome::Reward(amount) => println!("\nOutcome: reward {amount}"),
        AnswerOutcome::Penalty(factor) => println!("\nOutcome: penalty factor {factor:.4}"),
    }

    match evaluation.updated_weight {
        Some(updated) => println!("Trust weight: {weight:.4} -> {updated:.4}"),
        None => println!("Trust weight: {weight:.4} (unchanged)"),
    }

    match evaluation.concept_to_bump.as_deref() {
        Some(concept) => println!("\nConcept display bump: {concept}"),
        None => println!("\nConcept display bump: none (no distractor shown)"),
    }

    if evaluation.images_to_bump.is_empty() {
        println!("Image display bumps: none");
    } else {
        println!("Image display bumps:");
        for id in &evaluation.images_to_bump {
            println!("- {}", id.0);
        }
    }

    if !evaluation.components.is_empty() {
        println!("\nPenalty breakdown");
        for component in &evaluation.components {
            println!(
                "- {:?}: {:+.4} ({})",
                component.source, component.amount, component.notes
            );
        }
    }
}
