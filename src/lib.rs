//! Sea/air freight cost calculation with a minimum-cost FCL container optimizer.

pub mod domain;
pub mod infra;
pub mod util;

pub use domain::{
    compute_cost, optimal_containers, ContainerCombination, CostResult, FreightError,
    RateCatalog, ShipmentRequest,
};
