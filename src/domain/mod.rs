//! Freight pricing, ancillary charges and container optimization live here.

pub mod charges;
pub mod defaults;
pub mod engine;
pub mod entities;
pub mod error;
pub mod freight;
pub mod optimizer;

pub use charges::{aggregate_charges, ChargeLine, ChargeSummary};
pub use engine::{compute_cost, optimal_containers};
pub use entities::{
    AirRates, BankCharges, ChargeFormula, ContainerCombination, ContainerSpec, ContainerTypeId,
    CostResult, LclRates, LoadType, OtherCharges, RateCatalog, RateUnit, ShipmentRequest,
    TransportMode, WeightBracket,
};
pub use error::FreightError;
pub use freight::{chargeable_weight, price_air, price_sea};
pub use optimizer::optimize;
