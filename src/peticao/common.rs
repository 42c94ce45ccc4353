//! Shared helpers: Brazilian money formatting, Portuguese month names and
//! output filename derivation.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing corporate suffix (and everything after it) in a company name.
static CORPORATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(S\.?A\.?|LTDA\.?|S/A)\b.*$").unwrap());

static NON_FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Portuguese month names, indexed by `month0`.
pub const MESES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format a value as Brazilian currency, e.g. `7407.36` -> `"R$ 7.407,36"`.
///
/// Dot thousands separator, comma decimal separator, rounded to cents.
pub fn format_money_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let (int, frac) = (cents / 100, cents % 100);

    let digits = int.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {sign}{grouped},{frac:02}")
}

/// Derive the output artifact name from the claimant's full name and the
/// respondent's corporate name:
/// `01_Peticao_Inicial_{First}_{Last}_x_{Org}.{ext}`.
///
/// Uses the first and last name tokens and strips trailing corporate suffixes
/// (S.A., LTDA, S/A) from the organization.
pub fn output_filename(nome_completo: &str, nome_empresa: &str, extension: &str) -> String {
    let tokens: Vec<&str> = nome_completo.split_whitespace().collect();
    let nome = match tokens.as_slice() {
        [] => "Autor".to_string(),
        [only] => (*only).to_string(),
        [first, .., last] => format!("{first}_{last}"),
    };

    let filename = format!(
        "01_Peticao_Inicial_{nome}_x_{}.{extension}",
        short_company_name(nome_empresa)
    );
    sanitize_filename::sanitize(filename)
}

/// Normalize a corporate name for use in a filename: drop the corporate
/// suffix and everything after it, strip punctuation, join with underscores.
fn short_company_name(nome_empresa: &str) -> String {
    let trimmed = CORPORATE_SUFFIX_RE.replace(nome_empresa, "");
    let cleaned = NON_FILENAME_RE.replace_all(&trimmed, "");
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        "Banco".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_money_with_brazilian_separators() {
        assert_eq!(format_money_brl(7407.36), "R$ 7.407,36");
        assert_eq!(format_money_brl(22222.08), "R$ 22.222,08");
        assert_eq!(format_money_brl(0.0), "R$ 0,00");
        assert_eq!(format_money_brl(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_money_brl(999.9), "R$ 999,90");
    }

    #[test]
    fn filename_uses_first_and_last_name_and_strips_suffix() {
        assert_eq!(
            output_filename("Maria Da Silva Santos", "Banco Exemplo S.A.", "docx"),
            "01_Peticao_Inicial_Maria_Santos_x_Banco_Exemplo.docx"
        );
    }

    #[test]
    fn filename_handles_short_and_empty_names() {
        assert_eq!(
            output_filename("Madonna", "Financeira Alfa LTDA.", "pdf"),
            "01_Peticao_Inicial_Madonna_x_Financeira_Alfa.pdf"
        );
        assert_eq!(
            output_filename("", "", "docx"),
            "01_Peticao_Inicial_Autor_x_Banco.docx"
        );
    }

    #[test]
    fn company_suffix_variants_are_stripped() {
        assert_eq!(short_company_name("BANCO BRADESCO S/A"), "BANCO_BRADESCO");
        assert_eq!(short_company_name("Banco do Brasil SA"), "Banco_do_Brasil");
        assert_eq!(
            short_company_name("ITAÚ UNIBANCO S.A. - CONGLOMERADO"),
            "ITAÚ_UNIBANCO"
        );
    }
}
