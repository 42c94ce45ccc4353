//! Per-contract payment amortization.
//!
//! Derived amounts are recomputed in one pass by an explicit pure function
//! rather than by change detection: callers invoke [`recompute`] once after
//! every mutation of the contract list, and aggregates are always rebuilt in
//! full from the list via [`Totals::compute`].

use chrono::{Datelike, NaiveDate};

use super::model::{Contract, Situacao};

/// Aggregate monetary totals over the whole contract list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Σ paid over all contracts.
    pub total_pago: f64,
    /// 2 × total paid (repetição de indébito em dobro).
    pub total_dobro: f64,
    /// Total doubled plus outstanding amounts on active contracts.
    pub valor_causa: f64,
    /// True iff any contract is still active.
    pub has_ativo: bool,
}

impl Totals {
    /// Recompute all aggregates from scratch. Call after [`recompute`].
    pub fn compute(contracts: &[Contract]) -> Self {
        let total_pago: f64 = contracts.iter().map(|c| c.pago).sum();
        let restante_ativo: f64 = contracts
            .iter()
            .filter(|c| c.situacao == Situacao::Ativo)
            .map(|c| c.apagar)
            .sum();
        let total_dobro = 2.0 * total_pago;
        Totals {
            total_pago,
            total_dobro,
            valor_causa: total_dobro + restante_ativo,
            has_ativo: contracts.iter().any(|c| c.situacao == Situacao::Ativo),
        }
    }
}

/// Parse a localized money string ("R$ 1.234,56") into a plain value.
///
/// Strips the currency symbol and thousands separators and converts the
/// decimal comma. Returns `None` unless the result is a finite, non-negative
/// number.
pub fn parse_money_brl(raw: &str) -> Option<f64> {
    let cleaned = raw
        .replace("R$", "")
        .replace('.', "")
        .replace(',', ".")
        .trim()
        .to_string();
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Populate `pago`/`apagar` on every contract for the given reference date.
///
/// A contract whose installment or any of the four period fields is missing
/// or malformed is returned unchanged (derived fields keep their previous
/// value). The function is pure: inputs are never mutated, so there is no
/// recomputation loop to re-trigger.
pub fn recompute(contracts: &[Contract], reference: NaiveDate) -> Vec<Contract> {
    contracts
        .iter()
        .cloned()
        .map(|mut contract| {
            let Some(parcela) = parse_money_brl(&contract.parcela) else {
                return contract;
            };
            let Some((inicio_ano, inicio_mes)) =
                parse_month_year(&contract.inicio_mm, &contract.inicio_aa)
            else {
                return contract;
            };
            let Some((fim_ano, fim_mes)) = parse_month_year(&contract.fim_mm, &contract.fim_aa)
            else {
                return contract;
            };

            // Inclusive month counts: a contract running 01/24..12/25 spans 24.
            let meses_contrato =
                (fim_ano - inicio_ano) * 12 + (fim_mes as i32 - inicio_mes as i32) + 1;
            let decorridos = (reference.year() - inicio_ano) * 12
                + (reference.month() as i32 - inicio_mes as i32)
                + 1;
            let meses_pagos = decorridos.clamp(0, meses_contrato.max(0));
            let meses_restantes = (meses_contrato - meses_pagos).max(0);

            contract.pago = parcela * meses_pagos as f64;
            contract.apagar = if contract.situacao == Situacao::Ativo && meses_restantes > 0 {
                parcela * meses_restantes as f64
            } else {
                0.0
            };
            contract
        })
        .collect()
}

/// Expand "MM" + two-digit "AA" into `(year, month)`, with years mapped to
/// 2000+AA. `None` when either part is absent or out of range.
fn parse_month_year(mm: &str, aa: &str) -> Option<(i32, u32)> {
    let month: u32 = mm.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let year: i32 = aa.trim().parse().ok()?;
    if !(0..=99).contains(&year) {
        return None;
    }
    Some((2000 + year, month))
}
