use axum::{
    Router,
    body::{Body, Bytes},
    extract::{
        DefaultBodyLimit, Multipart, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::{HeaderValue, Request},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, info};
use uuid::Uuid;

use crate::{
    config::ServiceConfig,
    error::{ApiError, DocumentError, ONLY_PDF_MESSAGE},
    llm::{GenerationParams, GroqGateway, LlmGateway},
    models::{
        ChatRequest, ChatResponse, DailyRoutineResponse, MedicalHistoryRequest,
        MedicalHistoryResponse, OnboardingResponses, UploadPdfResponse,
    },
    tasks::{
        analyze_medical_history, assemble_history, assemble_onboarding, extract_text_blocking,
        generate_daily_routine_report, respond, translate_document,
    },
};

type ApiResult<T> = Result<Json<T>, ApiError>;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn LlmGateway>,
    pub params: GenerationParams,
}

pub fn create_app(config: &ServiceConfig) -> Router {
    let gateway = GroqGateway::new(config.base_url.clone(), config.api_key.clone());
    let app_state = AppState {
        gateway: Arc::new(gateway),
        params: GenerationParams::new(config.model.clone()),
    };
    build_router(app_state, config.max_upload_bytes)
}

pub fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route(
            "/upload_pdf/",
            post(upload_pdf).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/generate-daily-routine", post(generate_daily_routine))
        .route("/analyze-medical-history", post(generate_medical_history_report))
        .route("/chat", post(chat))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Tag each request with a correlation id and run it inside a span carrying it.
async fn correlation_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Default)]
struct UploadForm {
    language: Option<String>,
    file_name: Option<String>,
    file: Option<UploadedFile>,
}

struct UploadedFile {
    content_type: Option<String>,
    bytes: Bytes,
}

async fn upload_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<UploadPdfResponse> {
    // Without a multipart body there is no file to accept.
    let multipart = multipart.map_err(|_| ApiError::Validation(ONLY_PDF_MESSAGE.to_string()))?;

    process_upload(&state, multipart)
        .await
        .map(Json)
        .map_err(ApiError::into_upload_error)
}

async fn process_upload(
    state: &AppState,
    multipart: Multipart,
) -> Result<UploadPdfResponse, ApiError> {
    let form = read_upload_form(multipart).await?;

    let file = form
        .file
        .filter(|file| file.content_type.as_deref() == Some(PDF_CONTENT_TYPE))
        .ok_or_else(|| ApiError::Validation(ONLY_PDF_MESSAGE.to_string()))?;

    info!(
        file_name = ?form.file_name,
        language = ?form.language,
        bytes = file.bytes.len(),
        "Processing uploaded PDF"
    );

    let extracted_text = extract_text_blocking(file.bytes.to_vec()).await?;
    // lopdf ends each text object with '\n', so a textless page is not strictly empty
    if extracted_text.trim().is_empty() {
        return Err(DocumentError::NoText.into());
    }

    let llm_output = translate_document(
        state.gateway.as_ref(),
        &state.params,
        &extracted_text,
        form.language.as_deref(),
    )
    .await?;

    Ok(UploadPdfResponse {
        message: "File processed successfully.".to_string(),
        llm_output,
        language: form.language,
        file_name: form.file_name,
    })
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("language") => form.language = Some(field.text().await?),
            Some("file_name") => form.file_name = Some(field.text().await?),
            Some("file") => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile {
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn generate_daily_routine(
    State(state): State<AppState>,
    payload: Result<Json<OnboardingResponses>, JsonRejection>,
) -> ApiResult<DailyRoutineResponse> {
    let Json(onboarding_data) = payload?;
    info!(
        responses = onboarding_data.responses.len(),
        "Generating daily routine"
    );

    let user_data = assemble_onboarding(&onboarding_data);
    let report =
        generate_daily_routine_report(state.gateway.as_ref(), &state.params, &user_data).await?;

    Ok(Json(DailyRoutineResponse {
        status: "success".to_string(),
        daily_routine_report: report,
    }))
}

async fn generate_medical_history_report(
    State(state): State<AppState>,
    payload: Result<Json<MedicalHistoryRequest>, JsonRejection>,
) -> ApiResult<MedicalHistoryResponse> {
    let Json(history_data) = payload?;
    info!(
        analyses = history_data.analysis_list.len(),
        "Analyzing medical history"
    );

    let patient_data = assemble_history(&history_data);
    let report =
        analyze_medical_history(state.gateway.as_ref(), &state.params, &patient_data).await?;

    Ok(Json(MedicalHistoryResponse {
        status: "success".to_string(),
        medical_history_report: report,
    }))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatResponse> {
    let Json(request) = payload?;
    let response = respond(state.gateway.as_ref(), &state.params, request.messages).await?;
    Ok(Json(ChatResponse { response }))
}
