use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::charges::ChargeLine;

/// Identifier for container types in the rate catalog (e.g. `"40' HC"`).
pub type ContainerTypeId = String;

/// Capacity and flat freight rate for one FCL container type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub type_id: ContainerTypeId,
    /// Payload limit in kg.
    pub max_weight: f64,
    /// Usable volume in CBM.
    pub max_volume: f64,
    pub cost: f64,
    #[serde(default)]
    pub is_reefer: bool,
}

impl ContainerSpec {
    pub fn new(type_id: &str, max_volume: f64, max_weight: f64, cost: f64, is_reefer: bool) -> Self {
        Self {
            type_id: type_id.to_string(),
            max_weight,
            max_volume,
            cost,
            is_reefer,
        }
    }

    /// Cost per CBM of capacity; the optimizer's branch order.
    pub fn cost_per_volume(&self) -> f64 {
        self.cost / self.max_volume
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LclRates {
    pub per_cbm: f64,
    pub per_ton: f64,
    #[serde(default)]
    pub minimum: f64,
}

/// Air freight rate band. `upper_bound_kg` is exclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightBracket {
    pub upper_bound_kg: f64,
    pub rate_per_kg: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AirRates {
    pub minimum: f64,
    /// Ascending by `upper_bound_kg`; the last band doubles as "everything above".
    pub brackets: Vec<WeightBracket>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    #[default]
    Percent,
    PerMille,
}

impl RateUnit {
    pub fn divisor(&self) -> f64 {
        match self {
            Self::Percent => 100.0,
            Self::PerMille => 1000.0,
        }
    }
}

/// Shape of a single ancillary fee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChargeFormula {
    Flat {
        amount: f64,
    },
    Proportional {
        rate: f64,
        #[serde(default)]
        unit: RateUnit,
        #[serde(default)]
        minimum: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
    },
}

impl ChargeFormula {
    pub fn flat(amount: f64) -> Self {
        Self::Flat { amount }
    }

    pub fn percent(rate: f64, minimum: f64, maximum: Option<f64>) -> Self {
        Self::Proportional {
            rate,
            unit: RateUnit::Percent,
            minimum,
            maximum,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankCharges {
    pub opening_cable: ChargeFormula,
    pub acceptance: ChargeFormula,
    pub payment: ChargeFormula,
    pub cable: ChargeFormula,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtherCharges {
    pub import_inspection: ChargeFormula,
    pub import_customs: ChargeFormula,
    pub import_forwarder: ChargeFormula,
    pub exw_overseas: ChargeFormula,
}

/// Read-only rate tables shared by every calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateCatalog {
    /// FCL container types in catalog order.
    pub containers: IndexMap<ContainerTypeId, ContainerSpec>,
    pub lcl: LclRates,
    pub air: AirRates,
    pub bank_charges: BankCharges,
    pub other_charges: OtherCharges,
    /// Local currency units per 100 units of foreign currency.
    pub exchange_rate: f64,
}

impl RateCatalog {
    pub fn container(&self, type_id: &str) -> Option<&ContainerSpec> {
        self.containers.get(type_id)
    }

    /// Container types whose reefer flag matches, in catalog order.
    pub fn admissible_containers(&self, reefer: bool) -> Vec<&ContainerSpec> {
        self.containers
            .values()
            .filter(|spec| spec.is_reefer == reefer)
            .collect()
    }

    pub fn to_local_currency(&self, foreign_value: f64) -> f64 {
        foreign_value * self.exchange_rate / 100.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMode {
    #[default]
    Sea,
    Air,
}

impl TransportMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sea => "Sea",
            Self::Air => "Air",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadType {
    #[default]
    Fcl,
    Lcl,
}

impl LoadType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fcl => "FCL",
            Self::Lcl => "LCL",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub gross_weight_kg: f64,
    pub volume_cbm: f64,
    pub mode: TransportMode,
    pub load_type: LoadType,
    #[serde(default)]
    pub chosen_container_type: Option<ContainerTypeId>,
    #[serde(default)]
    pub reefer_required: bool,
    #[serde(default)]
    pub foreign_value: f64,
    pub quantity: u64,
}

impl Default for ShipmentRequest {
    fn default() -> Self {
        Self {
            gross_weight_kg: 0.0,
            volume_cbm: 0.0,
            mode: TransportMode::Sea,
            load_type: LoadType::Fcl,
            chosen_container_type: None,
            reefer_required: false,
            foreign_value: 0.0,
            quantity: 1,
        }
    }
}

/// A multiset of container types with its aggregate capacity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerCombination {
    pub counts: IndexMap<ContainerTypeId, u64>,
    pub total_cost: f64,
    pub total_volume: f64,
    pub total_weight: f64,
    pub feasible: bool,
}

impl ContainerCombination {
    pub fn empty(feasible: bool) -> Self {
        Self {
            feasible,
            ..Self::default()
        }
    }

    pub fn container_count(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn count_of(&self, type_id: &str) -> u64 {
        self.counts.get(type_id).copied().unwrap_or(0)
    }

    pub fn covers(&self, required_volume: f64, required_weight: f64) -> bool {
        self.total_volume >= required_volume && self.total_weight >= required_weight
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub chargeable_weight: f64,
    pub freight_cost: f64,
    /// Declared foreign value converted with the catalog exchange rate.
    pub local_value: f64,
    pub bank_charges: f64,
    pub other_charges: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    /// Bank lines first, then the other import charges.
    pub charge_lines: Vec<ChargeLine>,
    pub combination: Option<ContainerCombination>,
}
