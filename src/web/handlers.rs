//! HTTP request handlers

use super::state::AppState;
use crate::conversation::Message;
use crate::search::Attempt;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub messages: Vec<Message>,
}

/// Query parameters for the search debug endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search debug response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub source: Option<String>,
    pub raw_chars: usize,
    pub summary: String,
    pub attempts: Vec<Attempt>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub instance_name: String,
    pub messages: usize,
    pub sources: Vec<String>,
    pub mode: crate::config::SearchMode,
    pub model: String,
}

/// Service info
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.instance_name(),
        "version": crate::VERSION,
        "endpoints": ["/health", "/chat", "/history", "/clear", "/stats", "/search"]
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Run one conversation turn
pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    let mut history = state.history.lock().await;
    let reply = state.step.respond(&mut history, &request.message).await;
    info!("Conversation has {} messages", history.len());

    Json(ChatResponse {
        reply,
        messages: history.clone(),
    })
    .into_response()
}

pub async fn history(State(state): State<AppState>) -> impl IntoResponse {
    let history = state.history.lock().await;
    Json(history.clone())
}

/// Clear the conversation
pub async fn clear(State(state): State<AppState>) -> impl IntoResponse {
    state.history.lock().await.clear();
    info!("Conversation cleared");
    StatusCode::NO_CONTENT
}

pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let messages = state.history.lock().await.len();
    let orchestrator = state.step.orchestrator();

    Json(StatsResponse {
        instance_name: state.instance_name().to_string(),
        messages,
        sources: orchestrator
            .source_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        mode: orchestrator.mode(),
        model: state.settings.llm.model.clone(),
    })
}

/// Search and condense without calling the model
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "missing query parameter q" })),
            )
                .into_response()
        }
    };

    let outcome = state.step.orchestrator().search_detailed(&query).await;
    let summary = state.step.extractor().condense(&outcome.text);

    Json(SearchResponse {
        query: query.trim().to_string(),
        source: outcome.source,
        raw_chars: outcome.text.chars().count(),
        summary,
        attempts: outcome.attempts,
    })
    .into_response()
}
