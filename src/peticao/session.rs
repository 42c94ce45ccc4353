//! In-memory contract list for one drafting session.
//!
//! Rows get stable, monotonically assigned ids and are mutated field by
//! field. Derived amounts and aggregates are rebuilt exactly once per
//! mutation by calling into the pure amortization functions; nothing here is
//! persisted.

use chrono::NaiveDate;

use super::amortization::{recompute, Totals};
use super::model::{Contract, ContractUpdate};

/// Contract rows under review plus the reference date they are evaluated at.
#[derive(Debug, Clone)]
pub struct CaseSession {
    contracts: Vec<Contract>,
    next_id: u32,
    reference: NaiveDate,
}

impl CaseSession {
    pub fn new(reference: NaiveDate) -> Self {
        CaseSession {
            contracts: Vec::new(),
            next_id: 1,
            reference,
        }
    }

    /// Append an empty row and return its id.
    pub fn add_contract(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.contracts.push(Contract {
            id,
            ..Contract::default()
        });
        id
    }

    /// Apply a field patch to one row. Returns false when the id is unknown.
    /// Derived fields are recomputed afterwards, whatever was touched.
    pub fn update_contract(&mut self, id: u32, patch: ContractUpdate) -> bool {
        let Some(contract) = self.contracts.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        if let Some(numero) = patch.numero {
            contract.numero = numero;
        }
        if let Some(inicio_mm) = patch.inicio_mm {
            contract.inicio_mm = inicio_mm;
        }
        if let Some(inicio_aa) = patch.inicio_aa {
            contract.inicio_aa = inicio_aa;
        }
        if let Some(fim_mm) = patch.fim_mm {
            contract.fim_mm = fim_mm;
        }
        if let Some(fim_aa) = patch.fim_aa {
            contract.fim_aa = fim_aa;
        }
        if let Some(situacao) = patch.situacao {
            contract.situacao = situacao;
        }
        if let Some(parcela) = patch.parcela {
            contract.parcela = parcela;
        }
        if let Some(copia) = patch.copia {
            contract.copia = copia;
        }
        self.refresh();
        true
    }

    /// Remove a row by id. Returns false when the id is unknown.
    pub fn remove_contract(&mut self, id: u32) -> bool {
        let before = self.contracts.len();
        self.contracts.retain(|c| c.id != id);
        let removed = self.contracts.len() != before;
        if removed {
            self.refresh();
        }
        removed
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// Aggregates over the current list, always computed in full.
    pub fn totals(&self) -> Totals {
        Totals::compute(&self.contracts)
    }

    fn refresh(&mut self) {
        self.contracts = recompute(&self.contracts, self.reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peticao::model::Situacao;

    fn session() -> CaseSession {
        CaseSession::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn ids_are_monotonic_even_after_removal() {
        let mut s = session();
        let a = s.add_contract();
        let b = s.add_contract();
        assert!(s.remove_contract(a));
        let c = s.add_contract();
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn update_recomputes_derived_fields() {
        let mut s = session();
        let id = s.add_contract();
        assert!(s.update_contract(
            id,
            ContractUpdate {
                inicio_mm: Some("01".into()),
                inicio_aa: Some("24".into()),
                fim_mm: Some("12".into()),
                fim_aa: Some("25".into()),
                situacao: Some(Situacao::Ativo),
                parcela: Some("1.234,56".into()),
                ..ContractUpdate::default()
            }
        ));
        let ct = &s.contracts()[0];
        assert!((ct.pago - 7407.36).abs() < 1e-9);
        assert!((ct.apagar - 22222.08).abs() < 1e-9);
        assert!(s.totals().has_ativo);
    }

    #[test]
    fn removal_refreshes_totals() {
        let mut s = session();
        let id = s.add_contract();
        s.update_contract(
            id,
            ContractUpdate {
                inicio_mm: Some("01".into()),
                inicio_aa: Some("24".into()),
                fim_mm: Some("12".into()),
                fim_aa: Some("25".into()),
                parcela: Some("100,00".into()),
                ..ContractUpdate::default()
            },
        );
        assert!(s.totals().total_pago > 0.0);
        assert!(s.remove_contract(id));
        assert_eq!(s.totals(), Totals::default());
        assert!(!s.remove_contract(id));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut s = session();
        assert!(!s.update_contract(99, ContractUpdate::default()));
    }
}
