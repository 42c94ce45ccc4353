//! Offline template tag-syntax migration.
//!
//! Rewrites a template's Jinja-style tags (`{% if X %}…{% endif %}`,
//! `{%VAR%}`) into the single-brace block convention (`{#X}…{/X}`, `{VAR}`).
//! Conditional tokens are rewritten before variable tokens; the other order
//! would match `if`/`endif` tokens as plain variables.
//!
//! The two conventions are not symmetric, so running the migration twice
//! corrupts the template. Treat it as a one-shot transform against a template
//! artifact, never as part of the request path.

use std::path::Path;

use super::renderer::{rewrite_document_entry, TAG_RE, VAR_RE};
use super::RenderError;

/// Migrate one template file, writing the converted package to `output`.
pub fn migrate_file(input: &Path, output: &Path) -> Result<(), RenderError> {
    let package = std::fs::read(input).map_err(RenderError::TemplateIo)?;
    let converted = rewrite_document_entry(&package, |xml| migrate_markup(&xml))?;
    std::fs::write(output, converted).map_err(RenderError::Rebuild)?;
    Ok(())
}

/// Rewrite the tag syntax of one markup document.
///
/// Conditional open/close pairs become block tokens keyed by the identifier
/// of the matching open; unbalanced conditionals are rejected rather than
/// silently producing a template the renderer cannot parse.
pub fn migrate_markup(xml: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(xml.len());
    let mut stack: Vec<String> = Vec::new();
    let mut pos = 0;
    for caps in TAG_RE.captures_iter(xml) {
        let m = caps.get(0).unwrap();
        out.push_str(&xml[pos..m.start()]);
        pos = m.end();
        match caps.get(1) {
            Some(ident) => {
                out.push_str(&format!("{{#{}}}", ident.as_str()));
                stack.push(ident.as_str().to_string());
            }
            None => {
                let ident = stack
                    .pop()
                    .ok_or_else(|| RenderError::MalformedTag(m.as_str().to_string()))?;
                out.push_str(&format!("{{/{ident}}}"));
            }
        }
    }
    if let Some(ident) = stack.pop() {
        return Err(RenderError::UnterminatedConditional(ident));
    }
    out.push_str(&xml[pos..]);

    // Variables only after every conditional token is gone.
    Ok(VAR_RE.replace_all(&out, "{${1}}").into_owned())
}
