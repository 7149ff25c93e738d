use axum::{
    routing::{get, post},
    Router,
    Json,
    extract::{DefaultBodyLimit, Multipart, State},
    extract::multipart::MultipartError,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;

pub use error::ApiError;

use crate::claims::{DocumentStore, ExtractionPipeline, QuestionAnswering, UploadedDocument};
use crate::config::ServiceConfig;
use crate::providers::CompletionProvider;

#[derive(Clone)]
pub struct AppState {
    extraction: Arc<ExtractionPipeline>,
    qa: Arc<QuestionAnswering>,
}

impl AppState {
    /// Wires both pipelines to one provider and one shared store.
    pub fn new(provider: Arc<dyn CompletionProvider>, store: Arc<DocumentStore>) -> Self {
        Self {
            extraction: Arc::new(ExtractionPipeline::new(Arc::clone(&provider), Arc::clone(&store))),
            qa: Arc::new(QuestionAnswering::new(provider, store)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub document_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub document_id: String,
    pub extracted: Value,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create and configure the API router
pub fn create_api(state: AppState, config: &ServiceConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/ask", post(ask_handler))
        .route("/alive", get(health_check))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn multipart_error(error: MultipartError) -> ApiError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(error.body_text())
    } else {
        ApiError::Unprocessable(format!("Invalid multipart body: {}", error.body_text()))
    }
}

async fn extract_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ExtractResponse> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some(UploadedDocument::new(filename, bytes.to_vec()));
    }

    let upload = upload.ok_or_else(|| ApiError::Unprocessable("Missing `file` field".to_string()))?;

    let extraction = state
        .extraction
        .extract(upload)
        .await
        .map_err(ApiError::from_extraction)?;

    Ok(Json(ExtractResponse {
        document_id: extraction.document_id,
        extracted: extraction.structured,
    }))
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> ApiResult<AskResponse> {
    let answer = state
        .qa
        .ask(&request.document_id, &request.question)
        .await
        .map_err(ApiError::from_question)?;

    Ok(Json(AskResponse { answer }))
}

async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Service is alive".to_string(),
    })
}
