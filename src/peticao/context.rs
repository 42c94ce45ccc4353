//! Template-fill context assembly.
//!
//! Merges claimant fields, the respondent lookup result, jurisdiction data
//! and the computed contract amounts into one flat string-keyed map. The map
//! is the sole interface handed to the renderer: absent keys render as empty
//! strings, monetary keys come in a formatted and a raw numeric flavor.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::amortization::Totals;
use super::common::{format_money_brl, MESES};
use super::model::{Claimant, Contract, Respondent};

/// Action title used when at least one contract is still active (adds the
/// injunction request for suspending the discounts).
const NOME_ACAO_COM_TUTELA: &str = "AÇÃO DECLARATÓRIA DE NULIDADE CONTRATUAL C/C REPETIÇÃO DE \
     INDÉBITO E DANOS MORAIS COM PEDIDO DE TUTELA ANTECIPADA";
const NOME_ACAO_SEM_TUTELA: &str =
    "AÇÃO DECLARATÓRIA DE NULIDADE CONTRATUAL C/C REPETIÇÃO DE INDÉBITO E DANOS MORAIS";

/// A single context value: template tags render either plain text or a raw
/// number (the `_FLOAT` counterparts of the monetary keys).
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Text(String),
    Number(f64),
}

impl ContextValue {
    pub fn render(&self) -> String {
        match self {
            ContextValue::Text(s) => s.clone(),
            ContextValue::Number(n) => n.to_string(),
        }
    }

    /// Conditional-block truthiness: non-empty and not a recognized "no"
    /// token; numbers are truthy unless zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            ContextValue::Text(s) => {
                let normalized = s.trim().to_uppercase();
                !matches!(normalized.as_str(), "" | "NÃO" | "NAO" | "NO" | "FALSE")
            }
            ContextValue::Number(n) => *n != 0.0,
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Text(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Text(s)
    }
}

impl From<f64> for ContextValue {
    fn from(n: f64) -> Self {
        ContextValue::Number(n)
    }
}

/// The flat field map consumed by the template renderer.
pub type Context = BTreeMap<String, ContextValue>;

/// Jurisdiction header of the petition.
#[derive(Debug, Clone, Default)]
pub struct Jurisdiction {
    pub uf: String,
    pub cidade: String,
    pub tipo_orgao: String,
}

/// Assemble the full template context.
///
/// `contracts` must already carry computed `pago`/`apagar` (see
/// [`crate::peticao::amortization::recompute`]); `totals` must have been
/// derived from the same list.
pub fn assemble(
    jurisdiction: &Jurisdiction,
    claimant: &Claimant,
    respondent: &Respondent,
    contracts: &[Contract],
    totals: &Totals,
    reference: NaiveDate,
) -> Context {
    let mut ctx = Context::new();

    // Header fields are printed upper-case in the petition.
    set_upper(&mut ctx, "CIDADE", &jurisdiction.cidade);
    set_upper(&mut ctx, "ESTADO", &jurisdiction.uf);
    set_upper(&mut ctx, "TIPO_ORGAO", &jurisdiction.tipo_orgao);

    set_opt_upper(&mut ctx, "NOME_COMPLETO", &claimant.nome_completo);
    set_opt(&mut ctx, "NACIONALIDADE", &claimant.nacionalidade);
    set_opt(&mut ctx, "DATA_NASCIMENTO", &claimant.data_nascimento);
    set_opt(&mut ctx, "ESTADO_CIVIL", &claimant.estado_civil);
    set_opt(&mut ctx, "PROFISSAO", &claimant.profissao);
    set_opt(&mut ctx, "RG", &claimant.rg);
    set_opt(&mut ctx, "RG_ESTADO", &claimant.rg_estado);
    set_opt(&mut ctx, "CPF", &claimant.cpf);
    set_opt(&mut ctx, "LOG", &claimant.logradouro);
    set_opt(&mut ctx, "N", &claimant.numero);
    set_opt(&mut ctx, "COMPL", &claimant.complemento);
    set_opt(&mut ctx, "BAIRRO", &claimant.bairro);
    set_opt(&mut ctx, "CEP", &claimant.cep);
    set_opt(&mut ctx, "CIDADE_AUTORA", &claimant.cidade);
    set_opt(&mut ctx, "UF_AUTORA", &claimant.uf);
    set_opt(&mut ctx, "WHATS", &claimant.whatsapp);
    set_opt(&mut ctx, "EMAIL", &claimant.email);

    set_opt_upper(&mut ctx, "NOME_EMPRESA", &respondent.nome_empresa);
    set_opt(&mut ctx, "LOG_RE", &respondent.logradouro);
    set_opt(&mut ctx, "N_RE", &respondent.numero);
    set_opt(&mut ctx, "COMPL_RE", &respondent.complemento);
    set_opt(&mut ctx, "BAIRRO_RE", &respondent.bairro);
    set_opt(&mut ctx, "CIDADE_RE", &respondent.cidade);
    set_opt(&mut ctx, "UF_RE", &respondent.uf);
    set_opt(&mut ctx, "CEP_RE", &respondent.cep);

    for (idx, contract) in contracts.iter().enumerate() {
        let n = idx + 1;
        ctx.insert(format!("CT{n}_NUMERO"), contract.numero.as_str().into());
        ctx.insert(format!("CT{n}_INICIO_MM"), contract.inicio_mm.as_str().into());
        ctx.insert(format!("CT{n}_INICIO_AA"), contract.inicio_aa.as_str().into());
        ctx.insert(format!("CT{n}_FIM_MM"), contract.fim_mm.as_str().into());
        ctx.insert(format!("CT{n}_FIM_AA"), contract.fim_aa.as_str().into());
        ctx.insert(format!("CT{n}_SITUACAO"), contract.situacao.as_str().into());
        ctx.insert(format!("CT{n}_PARCELA"), contract.parcela.as_str().into());
        ctx.insert(format!("CT{n}_PAGO"), format_money_brl(contract.pago).into());
        ctx.insert(format!("CT{n}_APAGAR"), format_money_brl(contract.apagar).into());
        ctx.insert(format!("CT{n}_PAGO_FLOAT"), contract.pago.into());
        ctx.insert(format!("CT{n}_APAGAR_FLOAT"), contract.apagar.into());
        ctx.insert(format!("CT{n}_COPIA"), contract.copia.as_str().into());
    }

    ctx.insert(
        "CONTRATOS_TEXTO".into(),
        contracts_summary(contracts).into(),
    );

    ctx.insert(
        "VALOR_PAGO_INDEVIDO".into(),
        format_money_brl(totals.total_pago).into(),
    );
    ctx.insert(
        "VALOR_INDEVIDO_DOBRO".into(),
        format_money_brl(totals.total_dobro).into(),
    );
    ctx.insert("VALOR_CAUSA".into(), format_money_brl(totals.valor_causa).into());
    ctx.insert("VALOR_PAGO_INDEVIDO_FLOAT".into(), totals.total_pago.into());
    ctx.insert("VALOR_INDEVIDO_DOBRO_FLOAT".into(), totals.total_dobro.into());
    ctx.insert("VALOR_CAUSA_FLOAT".into(), totals.valor_causa.into());

    let sim_nao = if totals.has_ativo { "SIM" } else { "NÃO" };
    ctx.insert("HAS_ATIVO".into(), sim_nao.into());
    ctx.insert("MOSTRAR_TUTELA".into(), sim_nao.into());
    ctx.insert(
        "NOME_ACAO".into(),
        if totals.has_ativo {
            NOME_ACAO_COM_TUTELA.into()
        } else {
            NOME_ACAO_SEM_TUTELA.into()
        },
    );

    ctx.insert("DIA".into(), reference.day().to_string().into());
    ctx.insert(
        "MES_EXTENSO".into(),
        MESES[reference.month0() as usize].into(),
    );
    ctx.insert("ANO".into(), reference.year().to_string().into());

    ctx
}

/// One formatted summary line per contract, for the body of the petition.
fn contracts_summary(contracts: &[Contract]) -> String {
    if contracts.is_empty() {
        return "Nenhum contrato informado.".to_string();
    }
    contracts
        .iter()
        .map(|c| {
            format!(
                "Contrato nº {} | Início: {}/{} | Fim: {}/{} | Situação: {} | \
                 Parcela: {} | Pago: {} | A Pagar: {} | Cópia: {}",
                c.numero,
                c.inicio_mm,
                c.inicio_aa,
                c.fim_mm,
                c.fim_aa,
                c.situacao.as_str(),
                c.parcela,
                format_money_brl(c.pago),
                format_money_brl(c.apagar),
                c.copia.as_str(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn set_upper(ctx: &mut Context, key: &str, value: &str) {
    if !value.is_empty() {
        ctx.insert(key.to_string(), value.to_uppercase().into());
    }
}

fn set_opt(ctx: &mut Context, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        ctx.insert(key.to_string(), v.as_str().into());
    }
}

fn set_opt_upper(ctx: &mut Context, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        ctx.insert(key.to_string(), v.to_uppercase().into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peticao::amortization::recompute;
    use crate::peticao::model::{Copia, Contract, Situacao};

    fn sample_contract() -> Contract {
        Contract {
            id: 1,
            numero: "555-1".into(),
            inicio_mm: "01".into(),
            inicio_aa: "24".into(),
            fim_mm: "12".into(),
            fim_aa: "25".into(),
            situacao: Situacao::Ativo,
            parcela: "1.234,56".into(),
            pago: 0.0,
            apagar: 0.0,
            copia: Copia::Nao,
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn assembled() -> Context {
        let contracts = recompute(&[sample_contract()], reference());
        let totals = Totals::compute(&contracts);
        let claimant = Claimant {
            nome_completo: Some("Maria Da Silva Santos".into()),
            cpf: Some("123.456.789-00".into()),
            ..Claimant::default()
        };
        let respondent = Respondent {
            nome_empresa: Some("Banco Exemplo S.A.".into()),
            ..Respondent::default()
        };
        let jurisdiction = Jurisdiction {
            uf: "sp".into(),
            cidade: "São Paulo".into(),
            tipo_orgao: "da Vara Cível".into(),
        };
        assemble(
            &jurisdiction,
            &claimant,
            &respondent,
            &contracts,
            &totals,
            reference(),
        )
    }

    #[test]
    fn header_and_party_names_are_uppercased() {
        let ctx = assembled();
        assert_eq!(ctx["ESTADO"], ContextValue::Text("SP".into()));
        assert_eq!(ctx["CIDADE"], ContextValue::Text("SÃO PAULO".into()));
        assert_eq!(ctx["TIPO_ORGAO"], ContextValue::Text("DA VARA CÍVEL".into()));
        assert_eq!(
            ctx["NOME_COMPLETO"],
            ContextValue::Text("MARIA DA SILVA SANTOS".into())
        );
        assert_eq!(
            ctx["NOME_EMPRESA"],
            ContextValue::Text("BANCO EXEMPLO S.A.".into())
        );
    }

    #[test]
    fn contract_keys_use_positional_naming() {
        let ctx = assembled();
        assert_eq!(ctx["CT1_NUMERO"], ContextValue::Text("555-1".into()));
        assert_eq!(ctx["CT1_PAGO"], ContextValue::Text("R$ 7.407,36".into()));
        assert_eq!(ctx["CT1_APAGAR"], ContextValue::Text("R$ 22.222,08".into()));
        match &ctx["CT1_PAGO_FLOAT"] {
            ContextValue::Number(n) => assert!((n - 7407.36).abs() < 1e-9),
            other => panic!("expected a number, got {other:?}"),
        }
        assert_eq!(ctx["CT1_COPIA"], ContextValue::Text("NÃO".into()));
    }

    #[test]
    fn aggregates_and_action_title_follow_active_status() {
        let ctx = assembled();
        assert_eq!(
            ctx["VALOR_INDEVIDO_DOBRO"],
            ContextValue::Text("R$ 14.814,72".into())
        );
        assert_eq!(
            ctx["VALOR_CAUSA"],
            ContextValue::Text("R$ 37.036,80".into())
        );
        assert_eq!(ctx["HAS_ATIVO"], ContextValue::Text("SIM".into()));
        assert!(ctx["NOME_ACAO"].render().contains("TUTELA ANTECIPADA"));
    }

    #[test]
    fn date_fields_come_from_the_reference_date() {
        let ctx = assembled();
        assert_eq!(ctx["DIA"], ContextValue::Text("15".into()));
        assert_eq!(ctx["MES_EXTENSO"], ContextValue::Text("junho".into()));
        assert_eq!(ctx["ANO"], ContextValue::Text("2024".into()));
    }

    #[test]
    fn absent_claimant_fields_are_not_inserted() {
        let ctx = assembled();
        assert!(!ctx.contains_key("EMAIL"));
        assert!(!ctx.contains_key("BAIRRO"));
    }

    #[test]
    fn truthiness_rejects_no_tokens() {
        assert!(ContextValue::Text("SIM".into()).is_truthy());
        assert!(!ContextValue::Text("NÃO".into()).is_truthy());
        assert!(!ContextValue::Text("nao".into()).is_truthy());
        assert!(!ContextValue::Text("  ".into()).is_truthy());
        assert!(!ContextValue::Number(0.0).is_truthy());
        assert!(ContextValue::Number(12.5).is_truthy());
    }

    #[test]
    fn empty_contract_list_yields_placeholder_summary() {
        let totals = Totals::compute(&[]);
        let ctx = assemble(
            &Jurisdiction::default(),
            &Claimant::default(),
            &Respondent::default(),
            &[],
            &totals,
            reference(),
        );
        assert_eq!(
            ctx["CONTRATOS_TEXTO"],
            ContextValue::Text("Nenhum contrato informado.".into())
        );
        assert_eq!(ctx["HAS_ATIVO"], ContextValue::Text("NÃO".into()));
    }
}
