//! DOCX template rendering.
//!
//! A DOCX file is a ZIP package whose visible text lives in
//! `word/document.xml`. Rendering rewrites that one entry, replacing
//! `{%IDENT%}` variable tags with context values and resolving
//! `{% if IDENT %} … {% endif %}` conditional blocks, and repacks the archive
//! with every other entry untouched so styles, headers and numbering survive
//! as-is.

use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::context::Context;
use super::{RenderError, DOCUMENT_ENTRY};

/// Conditional open/close tokens; capture 1 is the identifier of an open.
pub(super) static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*(?:if\s+([A-Za-z0-9_]+)|endif)\s*%\}").unwrap());

/// Variable tokens; capture 1 is the identifier.
pub(super) static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*([A-Za-z0-9_]+)\s*%\}").unwrap());

/// A petition template loaded into memory.
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    bytes: Vec<u8>,
}

impl DocxTemplate {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        DocxTemplate { bytes }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(RenderError::TemplateIo)?;
        Ok(DocxTemplate { bytes })
    }

    /// Fill every tag in the template from the context and return the new
    /// package bytes. Absent keys render as empty strings.
    pub fn render(&self, ctx: &Context) -> Result<Vec<u8>, RenderError> {
        rewrite_document_entry(&self.bytes, |xml| fill_markup(&xml, ctx))
    }
}

/// Rewrite the markup entry of a DOCX package through `rewrite`, copying all
/// other entries verbatim into a fresh archive. Shared by the renderer and
/// the offline syntax migrator.
pub fn rewrite_document_entry(
    package: &[u8],
    rewrite: impl FnOnce(String) -> Result<String, RenderError>,
) -> Result<Vec<u8>, RenderError> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;

    let mut entries: Vec<(String, bool, Vec<u8>)> = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        let is_dir = file.is_dir();
        let mut data = Vec::new();
        if !is_dir {
            file.read_to_end(&mut data)
                .map_err(|e| RenderError::Archive(zip::result::ZipError::Io(e)))?;
        }
        entries.push((name, is_dir, data));
    }

    let document = entries
        .iter_mut()
        .find(|(name, _, _)| name == DOCUMENT_ENTRY)
        .ok_or(RenderError::MissingDocumentEntry)?;
    let xml = String::from_utf8(std::mem::take(&mut document.2)).map_err(RenderError::Encoding)?;
    document.2 = rewrite(xml)?.into_bytes();

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, is_dir, data) in entries {
        if is_dir {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            writer.write_all(&data).map_err(RenderError::Rebuild)?;
        }
    }
    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Resolve conditionals, then substitute variables, then reject leftovers.
fn fill_markup(xml: &str, ctx: &Context) -> Result<String, RenderError> {
    let expanded = expand_conditionals(xml, ctx)?;
    let filled = substitute_variables(&expanded, ctx)?;
    if let Some(pos) = filled.find("{%") {
        return Err(RenderError::MalformedTag(snippet(&filled[pos..])));
    }
    Ok(filled)
}

/// Resolve `{% if IDENT %} … {% endif %}` blocks: content is kept verbatim
/// (paragraph structure included) when the context value is truthy and
/// dropped entirely otherwise. Blocks may nest; an open without a close is a
/// template error, as is a stray `{% endif %}`.
fn expand_conditionals(xml: &str, ctx: &Context) -> Result<String, RenderError> {
    let mut out = String::with_capacity(xml.len());
    // Stack of open blocks: (identifier, contents suppressed).
    let mut stack: Vec<(String, bool)> = Vec::new();
    let mut pos = 0;

    for caps in TAG_RE.captures_iter(xml) {
        let m = caps.get(0).unwrap();
        let suppressed = stack.last().map(|(_, s)| *s).unwrap_or(false);
        if !suppressed {
            out.push_str(&xml[pos..m.start()]);
        }
        pos = m.end();

        match caps.get(1) {
            Some(ident) => {
                let truthy = ctx
                    .get(ident.as_str())
                    .map(|v| v.is_truthy())
                    .unwrap_or(false);
                stack.push((ident.as_str().to_string(), suppressed || !truthy));
            }
            None => {
                if stack.pop().is_none() {
                    return Err(RenderError::MalformedTag(snippet(m.as_str())));
                }
            }
        }
    }

    if let Some((ident, _)) = stack.pop() {
        return Err(RenderError::UnterminatedConditional(ident));
    }
    out.push_str(&xml[pos..]);
    Ok(out)
}

/// Replace `{%IDENT%}` tags with the context value (XML-escaped), or with an
/// empty string when the key is absent.
fn substitute_variables(xml: &str, ctx: &Context) -> Result<String, RenderError> {
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;
    for caps in VAR_RE.captures_iter(xml) {
        let m = caps.get(0).unwrap();
        let ident = &caps[1];
        // Bare keywords surviving the conditional pass mean a broken block.
        if ident == "if" || ident == "endif" {
            return Err(RenderError::MalformedTag(snippet(m.as_str())));
        }
        out.push_str(&xml[pos..m.start()]);
        if let Some(value) = ctx.get(ident) {
            out.push_str(&xml_escape(&value.render()));
        }
        pos = m.end();
    }
    out.push_str(&xml[pos..]);
    Ok(out)
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn snippet(text: &str) -> String {
    text.chars().take(40).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peticao::context::ContextValue;

    /// Build a minimal DOCX-shaped package around the given document markup.
    fn docx_with_markup(markup: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer.start_file("[Content_Types].xml", options).unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer.start_file(DOCUMENT_ENTRY, options).unwrap();
        writer.write_all(markup.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn document_markup(package: &[u8]) -> String {
        let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
        let mut entry = archive.by_name(DOCUMENT_ENTRY).unwrap();
        let mut markup = String::new();
        entry.read_to_string(&mut markup).unwrap();
        markup
    }

    fn ctx(pairs: &[(&str, &str)]) -> Context {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), ContextValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn fills_variable_tags() {
        let template = DocxTemplate::from_bytes(docx_with_markup(
            "<w:p>Autora: {%NOME_COMPLETO%}, CPF {% CPF %}</w:p>",
        ));
        let out = template
            .render(&ctx(&[("NOME_COMPLETO", "MARIA"), ("CPF", "123")]))
            .unwrap();
        assert_eq!(document_markup(&out), "<w:p>Autora: MARIA, CPF 123</w:p>");
    }

    #[test]
    fn absent_keys_render_empty() {
        let template =
            DocxTemplate::from_bytes(docx_with_markup("<w:p>[{%DESCONHECIDO%}]</w:p>"));
        let out = template.render(&Context::new()).unwrap();
        assert_eq!(document_markup(&out), "<w:p>[]</w:p>");
    }

    #[test]
    fn conditional_blocks_follow_truthiness() {
        let markup = "A{% if HAS_ATIVO %}B{%VALOR%}C{% endif %}D";
        let template = DocxTemplate::from_bytes(docx_with_markup(markup));

        let shown = template
            .render(&ctx(&[("HAS_ATIVO", "SIM"), ("VALOR", "x")]))
            .unwrap();
        assert_eq!(document_markup(&shown), "ABxCD");

        let hidden = template.render(&ctx(&[("HAS_ATIVO", "NÃO")])).unwrap();
        assert_eq!(document_markup(&hidden), "AD");
    }

    #[test]
    fn empty_context_blanks_tags_and_drops_conditionals() {
        let markup = "<w:p>{%A%}</w:p>{% if FLAG %}<w:p>hide</w:p>{% endif %}<w:p>{%B%}</w:p>";
        let template = DocxTemplate::from_bytes(docx_with_markup(markup));
        let out = template.render(&Context::new()).unwrap();
        assert_eq!(document_markup(&out), "<w:p></w:p><w:p></w:p>");
    }

    #[test]
    fn values_are_xml_escaped() {
        let template = DocxTemplate::from_bytes(docx_with_markup("{%EMPRESA%}"));
        let out = template.render(&ctx(&[("EMPRESA", "A & B <C>")])).unwrap();
        assert_eq!(document_markup(&out), "A &amp; B &lt;C&gt;");
    }

    #[test]
    fn unterminated_conditional_is_a_render_error() {
        let template =
            DocxTemplate::from_bytes(docx_with_markup("{% if HAS_ATIVO %}never closed"));
        let err = template.render(&ctx(&[("HAS_ATIVO", "SIM")])).unwrap_err();
        assert!(matches!(err, RenderError::UnterminatedConditional(id) if id == "HAS_ATIVO"));
    }

    #[test]
    fn stray_endif_is_a_render_error() {
        let template = DocxTemplate::from_bytes(docx_with_markup("text {% endif %}"));
        let err = template.render(&Context::new()).unwrap_err();
        assert!(matches!(err, RenderError::MalformedTag(_)));
    }

    #[test]
    fn unclosed_variable_tag_is_a_render_error() {
        let template = DocxTemplate::from_bytes(docx_with_markup("broken {%NOME"));
        let err = template.render(&Context::new()).unwrap_err();
        assert!(matches!(err, RenderError::MalformedTag(_)));
    }

    #[test]
    fn package_without_document_entry_is_rejected() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = DocxTemplate::from_bytes(bytes)
            .render(&Context::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingDocumentEntry));
    }

    #[test]
    fn garbage_bytes_are_not_an_archive() {
        let err = DocxTemplate::from_bytes(b"not a zip".to_vec())
            .render(&Context::new())
            .unwrap_err();
        assert!(matches!(err, RenderError::Archive(_)));
    }

    #[test]
    fn other_entries_survive_untouched() {
        let out = DocxTemplate::from_bytes(docx_with_markup("{%X%}"))
            .render(&Context::new())
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(out.as_slice())).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert_eq!(types, "<Types/>");
    }
}
