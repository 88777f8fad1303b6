//! Funding assistant chat endpoint.

use axum::Json;
use fb_core::assistant::{self, Attachment, Topic};
use serde::{Deserialize, Serialize};

/// One user message, optionally with attached files.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    #[serde(default, alias = "input")]
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AttachmentEcho {
    pub name: String,
    pub size: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ChatResponse {
    pub topic: Topic,
    pub reply: String,
    pub attachments: Vec<AttachmentEcho>,
    pub timestamp: String,
}

/// POST /api/chat
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse)
    )
)]
pub async fn chat(Json(payload): Json<ChatRequest>) -> Json<ChatResponse> {
    let (topic, reply) = assistant::reply(&payload.message, &payload.attachments);
    tracing::debug!(?topic, attachments = payload.attachments.len(), "assistant reply");

    let attachments = payload
        .attachments
        .into_iter()
        .map(|a| AttachmentEcho {
            size: assistant::format_size(a.size),
            name: a.name,
        })
        .collect();

    Json(ChatResponse {
        topic,
        reply,
        attachments,
        timestamp: fb_core::time::now(),
    })
}
