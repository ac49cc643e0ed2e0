use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;

use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{error, info};

use crate::AppState;
use crate::config::AppConfig;
use crate::session::SessionResponse;
use crate::tavus::{CreateConversationRequest, TavusClient};
use crate::ui;

/// Requests larger than this are rejected with 413.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let tavus = TavusClient::with_base_url(
        config.tavus.api_key.clone().unwrap_or_default(),
        &config.tavus.base_url,
    )?;

    info!(
        name: "tavus.config.loaded",
        base_url = %tavus.base_url(),
        persona_id = ?config.tavus.persona_id(),
        replica_id = ?config.tavus.replica_id(),
        documents = config.tavus.document_ids.len(),
        "Tavus configuration loaded"
    );

    let state = AppState {
        tavus: Arc::new(tavus),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    // A very large timeout stands in for "off" so the layer stack keeps one type.
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.resilience.request_timeout_secs)
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/start", post(start_session))
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// Conversation parameters for a `/start` call.
pub fn conversation_request(
    config: &AppConfig,
    persona_id: &str,
    replica_id: &str,
) -> CreateConversationRequest {
    let conversation = &config.conversation;
    CreateConversationRequest::new(persona_id, replica_id)
        .conversation_name(conversation.name.as_str())
        .custom_greeting(conversation.custom_greeting.as_str())
        .conversational_context(conversation.context.as_str())
        .document_ids(config.tavus.document_ids.clone())
        .document_retrieval_strategy(conversation.retrieval_strategy)
        .require_auth(config.tavus.require_auth)
        .max_participants(conversation.max_participants)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Launch page.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(ui::index_page(&state.config.tavus))
}

/// POST /start - Create a conversation and return its URL.
async fn start_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    info!(name: "session.start.requested", "Session start requested");

    let Some(persona_id) = state.config.tavus.persona_id() else {
        return failure("Missing PERSONA_ID in env");
    };
    let Some(replica_id) = state.config.tavus.replica_id() else {
        return failure("Missing REPLICA_ID in env");
    };

    let request = conversation_request(&state.config, persona_id, replica_id);
    info!(
        name: "session.start.payload",
        "Payload preview (app layer):\n{}",
        request.preview()
    );

    match state.tavus.create_conversation(&request).await {
        Ok(result) => {
            info!(
                name: "session.start.ready",
                conversation_id = %result.conversation_id,
                status = %result.status,
                "Conversation created"
            );
            (
                StatusCode::OK,
                Json(SessionResponse::ready(
                    result.conversation_id,
                    result.conversation_url,
                    result.status,
                )),
            )
        }
        Err(e) => failure(e.to_string()),
    }
}

fn failure(message: impl Into<String>) -> (StatusCode, Json<SessionResponse>) {
    let message = message.into();
    error!(name: "session.start.failed", error = %message, "Session start failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SessionResponse::failed(message)),
    )
}
