//! One-shot template tag-syntax migration.
//!
//! Rewrites a petition template's Jinja-style tags into the single-brace
//! block convention. The two conventions are not symmetric, so run this
//! exactly once per template; the input file is left untouched and the
//! converted copy is written next to it (or to the given output path).
//!
//! Usage: `migrate-template <template.docx> [output.docx]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};

use peticao_server::peticao::migrate::migrate_file;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(output) => {
            log::info!("template converted, written to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<PathBuf> {
    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: migrate-template <template.docx> [output.docx]");
    };
    let output = match args.next() {
        Some(path) => PathBuf::from(path),
        None => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("template");
            input.with_file_name(format!("{stem}_migrado.docx"))
        }
    };

    if output == input {
        bail!("output path must differ from the input; the migration is not repeatable in place");
    }

    migrate_file(&input, &output)
        .with_context(|| format!("failed to migrate {}", input.display()))?;
    Ok(output)
}
