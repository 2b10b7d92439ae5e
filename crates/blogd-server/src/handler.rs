use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use blogd_protocol::{
    CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    FindBlogRequest, FindBlogResponse, FrameCodec, HealthResponse, ListBlogsRequest,
    UpdateBlogRequest, UpdateBlogResponse, LIST_CONTENT_TYPE,
};

use crate::config::ServerConfig;
use crate::error::ServiceResult;
use crate::service::BlogService;
use crate::stream;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: BlogService,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(service: BlogService, config: ServerConfig) -> Self {
        Self { service, config: Arc::new(config) }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "name": "blogd",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": blogd_protocol::PROTOCOL_VERSION,
        "database": state.config.database,
        "collection": state.service.store().collection(),
    }))
}

pub async fn create_blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> ServiceResult<Json<CreateBlogResponse>> {
    let Json(req) = payload?;
    state.service.create_blog(req).await.map(Json)
}

pub async fn find_blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<FindBlogRequest>, JsonRejection>,
) -> ServiceResult<Json<FindBlogResponse>> {
    let Json(req) = payload?;
    state.service.find_blog(req).await.map(Json)
}

pub async fn update_blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> ServiceResult<Json<UpdateBlogResponse>> {
    let Json(req) = payload?;
    state.service.update_blog(req).await.map(Json)
}

pub async fn delete_blog_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeleteBlogRequest>, JsonRejection>,
) -> ServiceResult<Json<DeleteBlogResponse>> {
    let Json(req) = payload?;
    state.service.delete_blog(req).await.map(Json)
}

/// Stream every blog as newline-delimited frames.
///
/// The request carries no parameters, so any body is ignored.
pub async fn list_blogs_handler(State(state): State<AppState>) -> ServiceResult<Response> {
    let cursor = state.service.list_blogs(ListBlogsRequest::default()).await?;
    let rx = stream::spawn_emitter(cursor, state.config.stream_buffer);

    let frames = futures::stream::unfold(rx, |mut rx| async move {
        let frame = rx.recv().await?;
        Some((FrameCodec::encode(&frame), rx))
    });
    let body = Body::from_stream(frames);
    Ok(([(header::CONTENT_TYPE, LIST_CONTENT_TYPE)], body).into_response())
}
