//! Ancillary bank and import charges on the shipment value.

use serde::{Deserialize, Serialize};

use super::entities::{BankCharges, ChargeFormula, OtherCharges};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub name: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeSummary {
    pub bank_total: f64,
    pub other_total: f64,
    pub lines: Vec<ChargeLine>,
}

impl ChargeFormula {
    /// Amount due on `base_value` (already in the target currency).
    pub fn apply(&self, base_value: f64) -> f64 {
        match self {
            Self::Flat { amount } => *amount,
            Self::Proportional {
                rate,
                unit,
                minimum,
                maximum,
            } => {
                let amount = (base_value * rate / unit.divisor()).max(*minimum);
                match maximum {
                    Some(cap) => amount.min(*cap),
                    None => amount,
                }
            }
        }
    }
}

impl BankCharges {
    pub fn lines(&self, base_value: f64) -> [ChargeLine; 4] {
        [
            line("Bank opening cable", &self.opening_cable, base_value),
            line("Bank acceptance", &self.acceptance, base_value),
            line("Bank payment", &self.payment, base_value),
            line("Bank cable", &self.cable, base_value),
        ]
    }

    pub fn total(&self, base_value: f64) -> f64 {
        self.lines(base_value).iter().map(|l| l.amount).sum()
    }
}

impl OtherCharges {
    pub fn lines(&self, base_value: f64) -> [ChargeLine; 4] {
        [
            line("Import inspection", &self.import_inspection, base_value),
            line("Import customs", &self.import_customs, base_value),
            line("Import forwarder", &self.import_forwarder, base_value),
            line("EXW overseas", &self.exw_overseas, base_value),
        ]
    }

    pub fn total(&self, base_value: f64) -> f64 {
        self.lines(base_value).iter().map(|l| l.amount).sum()
    }
}

pub fn aggregate_charges(
    base_value: f64,
    bank: &BankCharges,
    other: &OtherCharges,
) -> ChargeSummary {
    let bank_lines = bank.lines(base_value);
    let other_lines = other.lines(base_value);

    ChargeSummary {
        bank_total: bank_lines.iter().map(|l| l.amount).sum(),
        other_total: other_lines.iter().map(|l| l.amount).sum(),
        lines: bank_lines.into_iter().chain(other_lines).collect(),
    }
}

fn line(name: &str, formula: &ChargeFormula, base_value: f64) -> ChargeLine {
    ChargeLine {
        name: name.to_string(),
        amount: formula.apply(base_value),
    }
}
