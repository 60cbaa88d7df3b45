use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AnswerEntry, Answers};
use super::lead::{LeadPublisher, LeadSubmission};
use super::narrator::Narrator;
use super::repository::{SessionId, SessionRepository, SessionRepositoryError};
use super::service::{FunnelServiceError, QuizFunnelService};

type SharedService<R, N, L> = Arc<QuizFunnelService<R, N, L>>;

/// Router builder exposing the quiz, scoring and lead-capture endpoints.
pub fn quiz_router<R, N, L>(service: SharedService<R, N, L>) -> Router
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    Router::new()
        .route("/api/v1/quiz/questions", get(questions_handler::<R, N, L>))
        .route("/api/v1/quiz/score", post(score_handler::<R, N, L>))
        .route(
            "/api/v1/quiz/sessions",
            post(create_session_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id",
            get(session_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/start",
            post(start_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/answers",
            post(answer_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/back",
            post(back_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/restart",
            post(restart_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/diagnose",
            post(diagnose_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/result",
            get(result_handler::<R, N, L>),
        )
        .route(
            "/api/v1/quiz/sessions/:session_id/lead",
            post(lead_handler::<R, N, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    pub(crate) answers: Vec<AnswerEntry>,
}

pub(crate) async fn questions_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    let bank = service.bank();
    let payload = json!({
        "questions": bank.questions(),
        "options": bank.scale().options(),
        "unsure_value": bank.scale().sentinel(),
        "questions_per_category": bank.questions_per_category(),
        "category_max": bank.category_max(),
        "max_total": bank.max_total(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn score_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    let answers = Answers::from_entries(request.answers);
    let outcome = service.score(&answers);
    (StatusCode::OK, Json(outcome)).into_response()
}

pub(crate) async fn create_session_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.create_session(Utc::now()) {
        Ok(record) => (StatusCode::CREATED, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.start(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn answer_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
    Json(entry): Json<AnswerEntry>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.answer(&SessionId(session_id), entry.question_id, entry.value) {
        Ok(record) => (StatusCode::OK, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn back_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.back(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn restart_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.restart(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view(service.bank()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn diagnose_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.diagnose(&SessionId(session_id), Utc::now()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn result_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.result(&SessionId(session_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<R, N, L>(
    State(service): State<SharedService<R, N, L>>,
    Path(session_id): Path<String>,
    Json(submission): Json<LeadSubmission>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Narrator + 'static,
    L: LeadPublisher + 'static,
{
    match service.capture_lead(&SessionId(session_id), submission, Utc::now()) {
        Ok(lead) => (StatusCode::ACCEPTED, Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: FunnelServiceError) -> Response {
    let status = match &err {
        FunnelServiceError::Repository(SessionRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        FunnelServiceError::Repository(SessionRepositoryError::Conflict)
        | FunnelServiceError::ResultNotReady { .. } => StatusCode::CONFLICT,
        FunnelServiceError::Transition(_) | FunnelServiceError::Lead(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        FunnelServiceError::Repository(SessionRepositoryError::Unavailable(_))
        | FunnelServiceError::LeadDelivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
