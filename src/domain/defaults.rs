//! Built-in rate tables, used when no catalog file is configured.

use indexmap::IndexMap;

use super::entities::{
    AirRates, BankCharges, ChargeFormula, ContainerSpec, LclRates, OtherCharges, RateCatalog,
    WeightBracket,
};

pub const DEFAULT_EXCHANGE_RATE: f64 = 85.667_787_78;

pub fn default_containers() -> IndexMap<String, ContainerSpec> {
    [
        ContainerSpec::new("20' GP", 33.0, 25_000.0, 165.0, false),
        ContainerSpec::new("40' GP", 67.0, 29_000.0, 330.0, false),
        ContainerSpec::new("40' HC", 76.0, 29_000.0, 330.0, false),
        ContainerSpec::new("20' RF", 27.0, 21_000.0, 183.0, true),
        ContainerSpec::new("40' RF", 58.0, 26_000.0, 383.0, true),
        ContainerSpec::new("40' RH", 66.0, 26_000.0, 383.0, true),
    ]
    .into_iter()
    .map(|spec| (spec.type_id.clone(), spec))
    .collect()
}

pub fn default_air_brackets() -> Vec<WeightBracket> {
    [
        (45.0, 1.05),
        (100.0, 0.93),
        (300.0, 0.88),
        (500.0, 0.88),
        (1000.0, 0.82),
        (999_999.0, 0.82),
    ]
    .into_iter()
    .map(|(upper_bound_kg, rate_per_kg)| WeightBracket {
        upper_bound_kg,
        rate_per_kg,
    })
    .collect()
}

impl Default for LclRates {
    fn default() -> Self {
        Self {
            per_cbm: 7.5,
            per_ton: 12.8,
            minimum: 0.0,
        }
    }
}

impl Default for AirRates {
    fn default() -> Self {
        Self {
            minimum: 17.0,
            brackets: default_air_brackets(),
        }
    }
}

impl Default for BankCharges {
    fn default() -> Self {
        Self {
            opening_cable: ChargeFormula::flat(26.99),
            acceptance: ChargeFormula::percent(1.0, 13.49, Some(67.47)),
            payment: ChargeFormula::percent(1.25, 13.49, None),
            cable: ChargeFormula::flat(26.99),
        }
    }
}

impl Default for OtherCharges {
    fn default() -> Self {
        Self {
            import_inspection: ChargeFormula::percent(0.08, 8.1, None),
            import_customs: ChargeFormula::flat(13.49),
            import_forwarder: ChargeFormula::percent(0.25, 67.47, None),
            exw_overseas: ChargeFormula::percent(1.0, 134.94, None),
        }
    }
}

impl Default for RateCatalog {
    fn default() -> Self {
        Self {
            containers: default_containers(),
            lcl: LclRates::default(),
            air: AirRates::default(),
            bank_charges: BankCharges::default(),
            other_charges: OtherCharges::default(),
            exchange_rate: DEFAULT_EXCHANGE_RATE,
        }
    }
}
