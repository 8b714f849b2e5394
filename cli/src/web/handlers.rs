use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, extract::rejection::JsonRejection};
use medcrew_core::report::{DOCX_FILENAME, download_link, encode_base64, generate_docx};
use medcrew_core::{CarePlan, PatientIntake};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::web::AppState;
use crate::web::error::WebError;
use crate::web::page::{self, FormValues, Notice};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagnoseInput {
    pub symptoms: String,
    pub medical_history: String,
}

#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub diagnosis: String,
    pub treatment: String,
    pub tests: String,
    pub markdown: String,
    pub filename: &'static str,
    pub docx_base64: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub model: String,
}

struct Report {
    plan: CarePlan,
    markdown: String,
    docx: Vec<u8>,
}

async fn produce_report(state: &AppState, input: &DiagnoseInput) -> Result<Report, WebError> {
    let intake = PatientIntake::new(&input.symptoms, &input.medical_history)?;

    let started = Instant::now();
    let plan = state.service.run(&intake).await.map_err(WebError::Diagnosis)?;
    let markdown = plan.to_markdown();
    let docx = generate_docx(&markdown).map_err(WebError::Report)?;

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        docx_bytes = docx.len(),
        "Diagnosis report ready"
    );

    Ok(Report {
        plan,
        markdown,
        docx,
    })
}

/// `GET /`
pub async fn index() -> Html<String> {
    Html(page::render_form(&FormValues::default(), None))
}

/// `POST /diagnose` from the browser form.
pub async fn diagnose_form(
    State(state): State<AppState>,
    Form(input): Form<DiagnoseInput>,
) -> (StatusCode, Html<String>) {
    let values = FormValues {
        symptoms: &input.symptoms,
        medical_history: &input.medical_history,
    };

    match produce_report(&state, &input).await {
        Ok(report) => {
            let link = download_link(&report.docx, DOCX_FILENAME);
            (
                StatusCode::OK,
                Html(page::render_result(&values, &report.plan, &link)),
            )
        }
        Err(err) => {
            let notice = match &err {
                WebError::InvalidInput(e) => Notice::Warning(e.to_string()),
                other => {
                    tracing::error!("{}", other);
                    Notice::Error(other.to_string())
                }
            };
            (err.status(), Html(page::render_form(&values, Some(&notice))))
        }
    }
}

/// `POST /api/diagnose`
pub async fn diagnose_api(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseInput>, JsonRejection>,
) -> Result<Json<DiagnoseResponse>, WebError> {
    // A malformed body is treated like an empty form.
    let input = payload.map(|Json(input)| input).unwrap_or_default();
    let report = produce_report(&state, &input).await?;

    Ok(Json(DiagnoseResponse {
        diagnosis: report.plan.diagnosis,
        treatment: report.plan.treatment,
        tests: report.plan.tests,
        markdown: report.markdown,
        filename: DOCX_FILENAME,
        docx_base64: encode_base64(&report.docx),
    }))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: medcrew_core::VERSION,
        provider: state.service.provider_name().to_string(),
        model: state.model.clone(),
    })
}
