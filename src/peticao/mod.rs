//! Petition drafting core - turns structured case data into a filled DOCX
//! petition and, optionally, a PDF rendered by LibreOffice.
//!
//! The pipeline is: free-text extraction (`extractor`) and per-contract
//! amortization (`amortization`) feed the flat template context (`context`),
//! which is merged into the DOCX template (`renderer`) and optionally
//! converted to a fixed layout (`convert`). `migrate` is an offline, one-shot
//! tag-syntax rewriter for the template artifact itself.

pub mod amortization;
pub mod common;
pub mod context;
pub mod convert;
pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod migrate;
pub mod model;
pub mod renderer;
pub mod session;

pub use amortization::{recompute, Totals};
pub use context::{Context, ContextValue};
pub use generator::PeticaoGenerator;
pub use model::{Claimant, Contract, PeticaoRequest, Respondent, Situacao};
pub use renderer::DocxTemplate;

use thiserror::Error;

/// Internal path of the markup entry inside the DOCX package.
pub const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Errors raised while filling the DOCX template.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read petition template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("template is not a valid DOCX package: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("template package has no {DOCUMENT_ENTRY} entry")]
    MissingDocumentEntry,
    #[error("document markup is not valid UTF-8")]
    Encoding(#[source] std::string::FromUtf8Error),
    #[error("conditional block for '{0}' is never closed")]
    UnterminatedConditional(String),
    #[error("malformed template tag near '{0}'")]
    MalformedTag(String),
    #[error("failed to rebuild the filled package: {0}")]
    Rebuild(#[source] std::io::Error),
}

/// Errors raised while converting the rendered DOCX to PDF.
///
/// Kept separate from [`RenderError`] so callers can tell a broken template
/// apart from a broken converter installation.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
    #[error("failed to stage document for conversion: {0}")]
    Stage(#[source] std::io::Error),
    #[error("could not launch document converter '{bin}': {source}")]
    Launch {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("document conversion did not finish within {0:?}")]
    Timeout(std::time::Duration),
    #[error("document converter exited with status {status}: {stderr}")]
    ConverterFailed { status: i32, stderr: String },
    #[error("document converter reported success but produced no output file")]
    MissingOutput,
    #[error("failed to read converted document: {0}")]
    ReadOutput(#[source] std::io::Error),
}

/// Any failure of the generation pipeline, surfaced to the caller as one
/// human-readable message. Nothing in here is retried internally.
#[derive(Debug, Error)]
pub enum PeticaoError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}
