//! Intake text extraction.
//!
//! The claimant pastes a loosely structured block of `label: value` lines
//! from the intake form. Extraction never fails: lines without a colon,
//! unknown labels and malformed composites simply leave the matching field
//! absent.

use super::model::Claimant;

/// Parse the intake form text into claimant fields.
///
/// Only the first colon on a line separates label from value, so values may
/// themselves contain colons. Labels are matched by case-sensitive substring
/// containment to tolerate punctuation variance in the pasted form.
pub fn parse_claimant_text(text: &str) -> Claimant {
    let mut claimant = Claimant::default();

    for line in text.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if label.contains("Nome completo") {
            claimant.nome_completo = Some(value.to_string());
        } else if label.contains("Nacionalidade") {
            claimant.nacionalidade = Some(value.to_string());
        } else if label.contains("Data de nascimento") {
            claimant.data_nascimento = Some(value.to_string());
        } else if label.contains("Estado civil") {
            claimant.estado_civil = Some(value.to_string());
        } else if label.contains("Profissão") {
            claimant.profissao = Some(value.to_string());
        } else if label.contains("RG") {
            // "NUMERO - ESTADO UF": number before the dash, issuing state after,
            // with the literal word ESTADO dropped.
            match value.split_once('-') {
                Some((numero, estado)) => {
                    claimant.rg = non_empty(numero);
                    claimant.rg_estado = non_empty(&estado.replace("ESTADO", ""));
                }
                None => claimant.rg = Some(value.to_string()),
            }
        } else if label.contains("CPF") {
            claimant.cpf = Some(value.to_string());
        } else if label.contains("ENDEREÇO COMPLETO") {
            // "STREET, NUMBER nº, COMPLEMENT complemento"
            let parts: Vec<&str> = value.split(',').collect();
            claimant.logradouro = parts.first().and_then(|p| non_empty(p));
            claimant.numero = parts.get(1).and_then(|p| non_empty(&p.replace("nº", "")));
            claimant.complemento = parts
                .get(2)
                .and_then(|p| non_empty(&p.replace("complemento", "")));
        } else if label.contains("Bairro") {
            claimant.bairro = Some(value.to_string());
        } else if label.contains("CEP") {
            claimant.cep = Some(value.to_string());
        } else if label.contains("CIDADE") {
            // "CITY, UF ESTADO"
            let parts: Vec<&str> = value.split(',').collect();
            claimant.cidade = parts.first().and_then(|p| non_empty(p));
            claimant.uf = parts.get(1).and_then(|p| non_empty(&p.replace("ESTADO", "")));
        } else if label.contains("WhatsApp") {
            claimant.whatsapp = Some(value.to_string());
        } else if label.contains("E-mail") {
            claimant.email = Some(value.to_string());
        }
    }

    claimant
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = "\
Nome completo: Maria Da Silva Santos
Nacionalidade: brasileira
Data de nascimento: 01/02/1960
Estado civil: viúva
Profissão: aposentada
RG: 12345678 - ESTADO SP
CPF: 123.456.789-00
ENDEREÇO COMPLETO: Rua das Flores, 100 nº, Casa 2 complemento
Bairro: Centro
CEP: 01000-000
CIDADE: São Paulo, SP ESTADO
WhatsApp: (11) 99999-0000
E-mail: maria@example.com";

    #[test]
    fn extracts_all_labeled_fields() {
        let c = parse_claimant_text(FORM);
        assert_eq!(c.nome_completo.as_deref(), Some("Maria Da Silva Santos"));
        assert_eq!(c.nacionalidade.as_deref(), Some("brasileira"));
        assert_eq!(c.rg.as_deref(), Some("12345678"));
        assert_eq!(c.rg_estado.as_deref(), Some("SP"));
        assert_eq!(c.cpf.as_deref(), Some("123.456.789-00"));
        assert_eq!(c.logradouro.as_deref(), Some("Rua das Flores"));
        assert_eq!(c.numero.as_deref(), Some("100"));
        assert_eq!(c.complemento.as_deref(), Some("Casa 2"));
        assert_eq!(c.cidade.as_deref(), Some("São Paulo"));
        assert_eq!(c.uf.as_deref(), Some("SP"));
        assert_eq!(c.whatsapp.as_deref(), Some("(11) 99999-0000"));
        assert_eq!(c.email.as_deref(), Some("maria@example.com"));
    }

    #[test]
    fn value_may_contain_colons() {
        let c = parse_claimant_text("Nome completo: Dr.: José");
        assert_eq!(c.nome_completo.as_deref(), Some("Dr.: José"));
    }

    #[test]
    fn malformed_input_degrades_to_absent_fields() {
        let c = parse_claimant_text("no colon here\nUnknown label: x\n\nRG:\n");
        assert_eq!(c, Claimant::default());
    }

    #[test]
    fn rg_without_dash_keeps_whole_value() {
        let c = parse_claimant_text("RG: 987654321");
        assert_eq!(c.rg.as_deref(), Some("987654321"));
        assert_eq!(c.rg_estado, None);
    }

    #[test]
    fn extraction_is_idempotent_over_reserialized_text() {
        let first = parse_claimant_text(FORM);
        let reserialized = format!(
            "Nome completo: {}\nNacionalidade: {}\nCPF: {}\nBairro: {}\nCEP: {}",
            first.nome_completo.as_deref().unwrap(),
            first.nacionalidade.as_deref().unwrap(),
            first.cpf.as_deref().unwrap(),
            first.bairro.as_deref().unwrap(),
            first.cep.as_deref().unwrap(),
        );
        let second = parse_claimant_text(&reserialized);
        assert_eq!(second.nome_completo, first.nome_completo);
        assert_eq!(second.nacionalidade, first.nacionalidade);
        assert_eq!(second.cpf, first.cpf);
        assert_eq!(second.bairro, first.bairro);
        assert_eq!(second.cep, first.cep);
    }
}
