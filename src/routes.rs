//! HTTP 接口层
//!
//! 只做请求/响应编组，业务逻辑都在 services

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::ExamStore;
use crate::models::{
    ExamPaper, ExamRequest, ExamResult, MarkRequest, ProcessExamRequest, StudentResponseRecord,
};
use crate::services::{ExamService, LlmService, MarkingService, ResultService};

/// 应用状态：各业务服务的克隆句柄
#[derive(Clone)]
pub struct AppState {
    pub exam_service: ExamService,
    pub marking_service: MarkingService,
    pub result_service: ResultService,
}

impl AppState {
    /// 按配置组装各层服务
    pub fn new(config: &Config, store: ExamStore) -> Self {
        let llm = LlmService::new(config);
        let exam_service = ExamService::new(llm.clone(), store.clone());
        let marking_service = MarkingService::new(llm, store.clone());
        let result_service =
            ResultService::new(marking_service.clone(), store, config.max_concurrent_marking);

        Self {
            exam_service,
            marking_service,
            result_service,
        }
    }
}

/// 查卷的查询参数
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub role: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
}

pub fn create_router(config: &Config, store: ExamStore) -> Router {
    let state = AppState::new(config, store);

    Router::new()
        .route("/generate_exam_questions", post(generate_exam_questions))
        .route("/get_exam_questions", get(get_exam_questions))
        .route("/mark_student_response", post(mark_student_response))
        .route("/process_exam_responses", post(process_exam_responses))
        .route("/health", get(health))
        .with_state(state)
}

async fn generate_exam_questions(
    State(state): State<AppState>,
    Json(request): Json<ExamRequest>,
) -> Result<Json<ExamPaper>, AppError> {
    let paper = state.exam_service.generate(&request).await?;
    Ok(Json(paper))
}

async fn get_exam_questions(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<ExamPaper>, AppError> {
    let paper = state
        .exam_service
        .lookup(
            &query.role,
            query.student_id.as_deref(),
            query.class_id.as_deref(),
        )
        .await?;
    Ok(Json(paper))
}

async fn mark_student_response(
    State(state): State<AppState>,
    Json(request): Json<MarkRequest>,
) -> Result<Json<StudentResponseRecord>, AppError> {
    let record = state.marking_service.mark(&request).await?;
    Ok(Json(record))
}

async fn process_exam_responses(
    State(state): State<AppState>,
    Json(request): Json<ProcessExamRequest>,
) -> Result<Json<ExamResult>, AppError> {
    let result = state.result_service.process(&request).await?;
    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
