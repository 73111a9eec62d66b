mod config;
mod error;
mod rate_limit;
mod sessions;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use prayaas_agents::{
    AdvisorAgent, PolicyAnalysis, ProfileInput, ProfileOptions, RecommendationReport,
};
use prayaas_core::{Topic, UserProfile, SUGGESTED_QUESTIONS};
use prayaas_observability::{AppMetrics, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use crate::config::AppConfig;
pub use crate::error::ApiError;
pub use crate::sessions::{SessionStore, SessionView};

use crate::rate_limit::ClientRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub agent: AdvisorAgent,
    pub metrics: Arc<AppMetrics>,
    pub sessions: SessionStore,
    pub api_key: Arc<str>,
    pub limiter: ClientRateLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    active_sessions: usize,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecommendRequest {
    profile: ProfileInput,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    policy_name: String,
    #[serde(default)]
    profile: ProfileInput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartSessionRequest {
    profile: ProfileInput,
}

#[derive(Debug, Serialize)]
struct StartSessionResponse {
    #[serde(flatten)]
    session: SessionView,
    suggested_questions: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    session_id: String,
    text: String,
    profile: Option<ProfileInput>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    session_id: String,
    topic: Topic,
    reply_text: String,
    turn_count: usize,
}

pub fn build_app(config: &AppConfig) -> Router {
    let metrics = AppMetrics::shared();
    let agent = AdvisorAgent::with_reference_catalog(metrics.clone())
        .with_max_turns(config.max_session_turns);

    let state = ApiState {
        agent,
        metrics,
        sessions: SessionStore::new(config.session_ttl),
        api_key: Arc::from(config.api_key.as_str()),
        limiter: ClientRateLimiter::new(config.rate_limit_window, config.rate_limit_max),
        allowed_origins: Arc::new(config.allowed_origins.clone()),
    };

    build_router(state)
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/profile/options", get(profile_options))
        .route("/v1/recommendations", post(recommendations))
        .route("/v1/policy/analyze", post(analyze_policy))
        .route("/v1/chat/sessions", post(start_session))
        .route("/v1/chat/sessions/:session_id", get(session_detail))
        .route("/v1/chat", post(chat))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(32 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        active_sessions: state.sessions.len(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn profile_options() -> Json<ProfileOptions> {
    Json(ProfileOptions::catalog())
}

async fn recommendations(
    State(state): State<ApiState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationReport>, ApiError> {
    let profile = UserProfile::try_from(request.profile)?;
    Ok(Json(state.agent.recommend(&profile)))
}

async fn analyze_policy(
    State(state): State<ApiState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<PolicyAnalysis>, ApiError> {
    let profile = UserProfile::try_from(request.profile)?;
    let analysis = state
        .agent
        .analyze_policy(&profile, &request.policy_name)?;
    Ok(Json(analysis))
}

async fn start_session(
    State(state): State<ApiState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = UserProfile::try_from(request.profile)?;
    let session = state.agent.start_conversation();
    let view = state.sessions.insert(session, profile);

    let payload = StartSessionResponse {
        session: view,
        suggested_questions: &SUGGESTED_QUESTIONS,
    };
    Ok((StatusCode::CREATED, Json(payload)))
}

async fn session_detail(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(state.sessions.view(&session_id)?))
}

async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let started = Instant::now();
    state.metrics.inc_request();

    let profile = request
        .profile
        .map(UserProfile::try_from)
        .transpose()?;

    // The session lock is released while the answer is composed; the session stays
    // in AwaitingResponse so a concurrent question on it gets 409.
    let pending = state
        .sessions
        .submit(&request.session_id, &request.text, profile)?;
    let (topic, reply_text) = state
        .agent
        .answer(&pending.profile, &request.text, &pending.history);

    let turn_count = state.sessions.with_session(&request.session_id, |session| {
        state.agent.record_reply(session, reply_text.clone())?;
        Ok(session.turns().len())
    })?;
    state.metrics.observe_latency(started.elapsed());
    info!(session_id = %request.session_id, topic = ?topic, "chat reply sent");

    Ok(Json(ChatResponse {
        session_id: request.session_id,
        topic,
        reply_text,
        turn_count,
    }))
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if header_key != &*state.api_key {
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let client = request_client(&request);
    if !state.limiter.allow(&client) {
        return ApiError::RateLimited.into_response();
    }

    next.run(request).await
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'; base-uri 'none'"),
    );

    response
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health" | "/v1/profile/options")
}

fn request_client(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "local".to_string())
}
