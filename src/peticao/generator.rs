//! End-to-end petition generation: extraction, amortization, context
//! assembly, template fill and optional PDF conversion, in that order.

use chrono::NaiveDate;

use super::amortization::{recompute, Totals};
use super::common::output_filename;
use super::context::{assemble, Context, Jurisdiction};
use super::convert::convert_to_pdf;
use super::extractor::parse_claimant_text;
use super::model::PeticaoRequest;
use super::renderer::DocxTemplate;
use super::{GeneratedDocument, PeticaoError, RenderError};

/// Default template location, overridable through `TEMPLATE_PATH`.
const DEFAULT_TEMPLATE: &str = "templates/template_peticaoconsig.docx";

/// Stateless generator holding the loaded petition template.
#[derive(Debug, Clone)]
pub struct PeticaoGenerator {
    template: DocxTemplate,
}

impl PeticaoGenerator {
    /// Load the template from `TEMPLATE_PATH` (or the default location).
    pub fn from_env() -> Result<Self, RenderError> {
        let path = std::env::var("TEMPLATE_PATH").unwrap_or_else(|_| DEFAULT_TEMPLATE.to_string());
        Ok(PeticaoGenerator {
            template: DocxTemplate::load(path)?,
        })
    }

    pub fn new(template: DocxTemplate) -> Self {
        PeticaoGenerator { template }
    }

    /// Run extraction, amortization and assembly for one request.
    pub fn build_context(&self, request: &PeticaoRequest, reference: NaiveDate) -> Context {
        let claimant = parse_claimant_text(&request.texto_autora);
        let contracts = recompute(&request.contratos, reference);
        let totals = Totals::compute(&contracts);
        let jurisdiction = Jurisdiction {
            uf: request.uf.clone(),
            cidade: request.cidade.clone(),
            tipo_orgao: request.tipo_orgao.clone(),
        };
        assemble(
            &jurisdiction,
            &claimant,
            &request.re,
            &contracts,
            &totals,
            reference,
        )
    }

    /// Render the petition DOCX for one request.
    pub fn generate_docx(
        &self,
        request: &PeticaoRequest,
        reference: NaiveDate,
    ) -> Result<GeneratedDocument, PeticaoError> {
        let claimant = parse_claimant_text(&request.texto_autora);
        let ctx = self.build_context(request, reference);
        let bytes = self.template.render(&ctx)?;
        let filename = output_filename(
            claimant.nome_completo.as_deref().unwrap_or(""),
            request.re.nome_empresa.as_deref().unwrap_or(""),
            "docx",
        );
        log::info!("rendered petition DOCX '{filename}' ({} bytes)", bytes.len());
        Ok(GeneratedDocument { filename, bytes })
    }

    /// Render the petition and convert it to PDF.
    pub async fn generate_pdf(
        &self,
        request: &PeticaoRequest,
        reference: NaiveDate,
    ) -> Result<GeneratedDocument, PeticaoError> {
        let docx = self.generate_docx(request, reference)?;
        let pdf = convert_to_pdf(&docx.bytes, &docx.filename).await?;
        let filename = docx.filename.trim_end_matches(".docx").to_string() + ".pdf";
        log::info!("converted petition to PDF '{filename}' ({} bytes)", pdf.len());
        Ok(GeneratedDocument {
            filename,
            bytes: pdf,
        })
    }

    /// Render and convert in one shot. Fails entirely when either artifact
    /// does; a partial result is never returned.
    pub async fn generate_both(
        &self,
        request: &PeticaoRequest,
        reference: NaiveDate,
    ) -> Result<(GeneratedDocument, GeneratedDocument), PeticaoError> {
        let docx = self.generate_docx(request, reference)?;
        let pdf_bytes = convert_to_pdf(&docx.bytes, &docx.filename).await?;
        let pdf = GeneratedDocument {
            filename: docx.filename.trim_end_matches(".docx").to_string() + ".pdf",
            bytes: pdf_bytes,
        };
        Ok((docx, pdf))
    }
}
