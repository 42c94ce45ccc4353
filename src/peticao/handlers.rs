//! HTTP handlers for the generation endpoints.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use utoipa::ToSchema;

use crate::ErrorResponse;

use super::generator::PeticaoGenerator;
use super::model::PeticaoRequest;
use super::PeticaoError;

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_MIME: &str = "application/pdf";

/// Shared application state: the generator with its preloaded template.
pub struct AppState {
    pub generator: PeticaoGenerator,
}

/// Response of the combined DOCX + PDF endpoint.
#[derive(Serialize, ToSchema)]
pub struct BothResponse {
    pub docx_filename: String,
    /// Base64-encoded DOCX bytes.
    pub docx_base64: String,
    pub pdf_filename: String,
    /// Base64-encoded PDF bytes.
    pub pdf_base64: String,
}

fn reference_date() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

fn attachment(mime: &str, filename: String, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(bytes)
}

fn generation_failure(err: &PeticaoError) -> HttpResponse {
    log::error!("petition generation failed: {err}");
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&err.to_string()))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Petition Service",
    post,
    path = "/generate/docx",
    request_body = PeticaoRequest,
    responses(
        (status = 200, description = "Filled petition DOCX, as an attachment"),
        (status = 500, description = "Template rendering failed", body = ErrorResponse)
    )
)]
pub async fn generate_docx(
    req: web::Json<PeticaoRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.generator.generate_docx(&req, reference_date()) {
        Ok(doc) => attachment(DOCX_MIME, doc.filename, doc.bytes),
        Err(err) => generation_failure(&err),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Petition Service",
    post,
    path = "/generate/pdf",
    request_body = PeticaoRequest,
    responses(
        (status = 200, description = "Filled petition converted to PDF, as an attachment"),
        (status = 500, description = "Rendering or conversion failed", body = ErrorResponse)
    )
)]
pub async fn generate_pdf(
    req: web::Json<PeticaoRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    match data.generator.generate_pdf(&req, reference_date()).await {
        Ok(doc) => attachment(PDF_MIME, doc.filename, doc.bytes),
        Err(err) => generation_failure(&err),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Petition Service",
    post,
    path = "/generate/both",
    request_body = PeticaoRequest,
    responses(
        (status = 200, description = "Both artifacts, base64-encoded", body = BothResponse),
        (status = 500, description = "Rendering or conversion failed", body = ErrorResponse)
    )
)]
pub async fn generate_both(
    req: web::Json<PeticaoRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    // All or nothing: a conversion failure discards the rendered DOCX too.
    match data.generator.generate_both(&req, reference_date()).await {
        Ok((docx, pdf)) => HttpResponse::Ok().json(BothResponse {
            docx_base64: BASE64.encode(&docx.bytes),
            docx_filename: docx.filename,
            pdf_base64: BASE64.encode(&pdf.bytes),
            pdf_filename: pdf.filename,
        }),
        Err(err) => generation_failure(&err),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Petition Service",
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
