//! Fixed-layout (PDF) conversion via LibreOffice.
//!
//! Each invocation gets an exclusive scratch directory so concurrent
//! conversions never collide on the converter's output naming. The directory
//! is a [`tempfile::TempDir`], so it is removed on every exit path - success,
//! converter failure and timeout alike - when the guard drops.

use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use super::ConvertError;

/// Upper bound on one conversion. LibreOffice is CPU- and I/O-bound and
/// varies a lot with document size.
pub const CONVERT_TIMEOUT_SECS: u64 = 90;

const DEFAULT_BIN: &str = "libreoffice";

fn soffice_bin() -> String {
    std::env::var("SOFFICE_BIN").unwrap_or_else(|_| DEFAULT_BIN.to_string())
}

/// Convert a rendered DOCX to PDF. `filename` must carry the `.docx`
/// extension; the converter derives its output name from it.
pub async fn convert_to_pdf(docx: &[u8], filename: &str) -> Result<Vec<u8>, ConvertError> {
    convert_with(
        &soffice_bin(),
        docx,
        filename,
        Duration::from_secs(CONVERT_TIMEOUT_SECS),
    )
    .await
}

async fn convert_with(
    bin: &str,
    docx: &[u8],
    filename: &str,
    limit: Duration,
) -> Result<Vec<u8>, ConvertError> {
    let scratch = tempfile::Builder::new()
        .prefix("peticao-pdf-")
        .tempdir()
        .map_err(ConvertError::Scratch)?;
    let docx_path = scratch.path().join(filename);
    tokio::fs::write(&docx_path, docx)
        .await
        .map_err(ConvertError::Stage)?;

    let run = Command::new(bin)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(scratch.path())
        .arg(&docx_path)
        .kill_on_drop(true)
        .output();

    let output = match timeout(limit, run).await {
        Ok(result) => result.map_err(|e| ConvertError::Launch {
            bin: bin.to_string(),
            source: e,
        })?,
        // Dropping the future kills the converter; the scratch guard cleans
        // up whatever it managed to write.
        Err(_) => return Err(ConvertError::Timeout(limit)),
    };

    if !output.status.success() {
        return Err(ConvertError::ConverterFailed {
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let pdf_path = docx_path.with_extension("pdf");
    if !pdf_path.is_file() {
        return Err(ConvertError::MissingOutput);
    }
    tokio::fs::read(&pdf_path)
        .await
        .map_err(ConvertError::ReadOutput)
}
