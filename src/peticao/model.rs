//! Case data model: contracts under review, claimant and respondent details,
//! and the generation request body.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Review status of a contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Situacao {
    /// Still being discounted from the claimant's benefit.
    #[serde(rename = "ATIVO")]
    Ativo,
    /// Fully paid off.
    #[default]
    #[serde(rename = "QUITADO")]
    Quitado,
}

impl Situacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            Situacao::Ativo => "ATIVO",
            Situacao::Quitado => "QUITADO",
        }
    }
}

/// Whether a copy of the contract was requested from the respondent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Copia {
    #[default]
    #[serde(rename = "SIM")]
    Sim,
    #[serde(rename = "NÃO", alias = "NAO")]
    Nao,
}

impl Copia {
    pub fn as_str(&self) -> &'static str {
        match self {
            Copia::Sim => "SIM",
            Copia::Nao => "NÃO",
        }
    }
}

/// One loan contract being reviewed for overpayment.
///
/// `pago` and `apagar` are derived: [`crate::peticao::amortization::recompute`]
/// overwrites them from the period, status and installment fields. They are
/// never edited directly and stay at their previous value (zero for a fresh
/// row) when the period or installment is missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    #[serde(default)]
    pub id: u32,
    /// Contract number as printed on the statement (free text).
    #[serde(default)]
    pub numero: String,
    /// First discounted month, "MM".
    #[serde(default)]
    pub inicio_mm: String,
    /// First discounted month, two-digit year "AA".
    #[serde(default)]
    pub inicio_aa: String,
    /// Last contracted month, "MM".
    #[serde(default)]
    pub fim_mm: String,
    /// Last contracted month, two-digit year "AA".
    #[serde(default)]
    pub fim_aa: String,
    #[serde(default)]
    pub situacao: Situacao,
    /// Monthly installment as a localized money string, e.g. "R$ 1.234,56".
    #[serde(default)]
    pub parcela: String,
    /// Derived: amount already paid up to the reference date.
    #[serde(default)]
    pub pago: f64,
    /// Derived: amount still owed on an active contract.
    #[serde(default)]
    pub apagar: f64,
    #[serde(default)]
    pub copia: Copia,
}

/// Field-by-field patch for a contract row. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ContractUpdate {
    pub numero: Option<String>,
    pub inicio_mm: Option<String>,
    pub inicio_aa: Option<String>,
    pub fim_mm: Option<String>,
    pub fim_aa: Option<String>,
    pub situacao: Option<Situacao>,
    pub parcela: Option<String>,
    pub copia: Option<Copia>,
}

/// Claimant details extracted from the intake form text.
///
/// Every field is optional: the extractor degrades to `None` for anything the
/// text does not carry, and the renderer prints absent fields as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claimant {
    pub nome_completo: Option<String>,
    pub nacionalidade: Option<String>,
    pub data_nascimento: Option<String>,
    pub estado_civil: Option<String>,
    pub profissao: Option<String>,
    pub rg: Option<String>,
    pub rg_estado: Option<String>,
    pub cpf: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cep: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
}

/// Respondent (financial institution) details, normally the raw result of a
/// company-registry lookup. Serde aliases accept the registry's own field
/// names so the lookup payload can be forwarded untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Respondent {
    #[serde(default, alias = "razao_social")]
    pub nome_empresa: Option<String>,
    #[serde(default, alias = "logradouro")]
    pub logradouro: Option<String>,
    #[serde(default, alias = "numero")]
    pub numero: Option<String>,
    #[serde(default, alias = "complemento")]
    pub complemento: Option<String>,
    #[serde(default, alias = "bairro")]
    pub bairro: Option<String>,
    #[serde(default, alias = "municipio")]
    pub cidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
}

/// Body of the generation endpoints: jurisdiction header, the raw claimant
/// intake text, the respondent lookup result and the reviewed contracts.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PeticaoRequest {
    /// State (UF) the petition is addressed to.
    #[serde(default)]
    pub uf: String,
    /// City the petition is addressed to.
    #[serde(default)]
    pub cidade: String,
    /// Court type, e.g. "DA VARA CÍVEL".
    #[serde(default)]
    pub tipo_orgao: String,
    /// Intake form text, one `label: value` fact per line.
    #[serde(default)]
    pub texto_autora: String,
    #[serde(default)]
    pub re: Respondent,
    #[serde(default)]
    pub contratos: Vec<Contract>,
}
