//! Landed cost for one shipment: freight, optional container optimization,
//! ancillary charges and the converted goods value.

use super::{
    charges::aggregate_charges,
    entities::{
        ContainerCombination, CostResult, LoadType, RateCatalog, ShipmentRequest, TransportMode,
    },
    error::FreightError,
    freight::{chargeable_weight, price_air, price_sea},
    optimizer::optimize,
};

/// Cheapest mix of containers matching the reefer requirement.
pub fn optimal_containers(
    required_volume: f64,
    required_weight: f64,
    catalog: &RateCatalog,
    reefer_required: bool,
) -> Result<ContainerCombination, FreightError> {
    let admissible = catalog.admissible_containers(reefer_required);
    if admissible.is_empty() {
        return Err(FreightError::EmptyContainerCatalog {
            reefer: reefer_required,
        });
    }

    optimize(required_volume, required_weight, &admissible)
}

pub fn compute_cost(
    request: &ShipmentRequest,
    catalog: &RateCatalog,
    optimize_containers: bool,
) -> Result<CostResult, FreightError> {
    validate(request)?;

    let mut combination = None;
    let freight_cost = match (request.mode, request.load_type) {
        (TransportMode::Air, _) => price_air(request, catalog),
        (TransportMode::Sea, LoadType::Fcl) if optimize_containers => {
            let mix = optimal_containers(
                request.volume_cbm,
                request.gross_weight_kg,
                catalog,
                request.reefer_required,
            )?;
            if !mix.feasible {
                log::warn!("container mix is a best-effort fallback, not a covering load");
            }
            let cost = mix.total_cost;
            combination = Some(mix);
            cost
        }
        (TransportMode::Sea, _) => price_sea(request, catalog)?,
    };

    let local_value = catalog.to_local_currency(request.foreign_value);
    let charges = aggregate_charges(local_value, &catalog.bank_charges, &catalog.other_charges);
    let total_cost = freight_cost + charges.bank_total + charges.other_total + local_value;

    log::debug!(
        "{} {} shipment: freight {:.2}, bank {:.2}, other {:.2}, value {:.2}",
        request.mode.label(),
        request.load_type.label(),
        freight_cost,
        charges.bank_total,
        charges.other_total,
        local_value
    );

    Ok(CostResult {
        chargeable_weight: chargeable_weight(
            request.gross_weight_kg,
            request.volume_cbm,
            request.mode,
        ),
        freight_cost,
        local_value,
        bank_charges: charges.bank_total,
        other_charges: charges.other_total,
        total_cost,
        unit_cost: total_cost / request.quantity as f64,
        charge_lines: charges.lines,
        combination,
    })
}

fn validate(request: &ShipmentRequest) -> Result<(), FreightError> {
    let fields = [
        ("gross weight", request.gross_weight_kg),
        ("volume", request.volume_cbm),
        ("foreign value", request.foreign_value),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(FreightError::InvalidShipmentValues(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }

    if request.quantity == 0 {
        return Err(FreightError::InvalidQuantity);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ChargeFormula;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// Catalog without ancillary fees so totals isolate the freight part.
    fn freight_only_catalog() -> RateCatalog {
        let mut catalog = RateCatalog::default();
        let zero = ChargeFormula::flat(0.0);
        catalog.bank_charges.opening_cable = zero.clone();
        catalog.bank_charges.acceptance = zero.clone();
        catalog.bank_charges.payment = zero.clone();
        catalog.bank_charges.cable = zero.clone();
        catalog.other_charges.import_inspection = zero.clone();
        catalog.other_charges.import_customs = zero.clone();
        catalog.other_charges.import_forwarder = zero.clone();
        catalog.other_charges.exw_overseas = zero;
        catalog
    }

    fn fcl(container: &str, gross_weight_kg: f64, volume_cbm: f64) -> ShipmentRequest {
        ShipmentRequest {
            gross_weight_kg,
            volume_cbm,
            chosen_container_type: Some(container.to_string()),
            ..ShipmentRequest::default()
        }
    }

    #[test]
    fn fcl_without_optimization_prices_chosen_container() {
        let catalog = freight_only_catalog();
        let result = compute_cost(&fcl("20' GP", 9200.0, 20.0), &catalog, false).unwrap();
        assert_eq!(result.freight_cost, 165.0);
        assert_eq!(result.total_cost, 165.0);
        assert_eq!(result.unit_cost, 165.0);
        assert!(result.combination.is_none());
    }

    #[test]
    fn fcl_with_optimization_surfaces_combination() {
        let catalog = freight_only_catalog();
        let result = compute_cost(&fcl("20' GP", 50_000.0, 100.0), &catalog, true).unwrap();
        let mix = result.combination.expect("optimized FCL carries a combination");
        assert!(mix.feasible);
        assert_eq!(result.freight_cost, 495.0);
        assert_eq!(mix.total_cost, result.freight_cost);
    }

    #[test]
    fn optimization_ignores_chosen_container() {
        let catalog = freight_only_catalog();
        let mut request = fcl("no such box", 15_000.0, 20.0);
        request.reefer_required = true;
        let result = compute_cost(&request, &catalog, true).unwrap();
        assert_eq!(result.freight_cost, 183.0);
        assert_eq!(result.combination.unwrap().count_of("20' RF"), 1);
    }

    #[test]
    fn lcl_ignores_optimization_flag() {
        let catalog = freight_only_catalog();
        let request = ShipmentRequest {
            gross_weight_kg: 15_000.0,
            volume_cbm: 10.0,
            load_type: LoadType::Lcl,
            ..ShipmentRequest::default()
        };
        let result = compute_cost(&request, &catalog, true).unwrap();
        assert!(approx(result.freight_cost, 192.0));
        assert!(result.combination.is_none());
    }

    #[test]
    fn air_reports_chargeable_weight() {
        let catalog = freight_only_catalog();
        let request = ShipmentRequest {
            gross_weight_kg: 100.0,
            volume_cbm: 1.0,
            mode: TransportMode::Air,
            load_type: LoadType::Lcl,
            ..ShipmentRequest::default()
        };
        let result = compute_cost(&request, &catalog, true).unwrap();
        assert_eq!(result.chargeable_weight, 167.0);
        assert!(approx(result.freight_cost, 146.96));
    }

    #[test]
    fn total_includes_charges_and_converted_value() {
        let mut catalog = RateCatalog::default();
        catalog.exchange_rate = 700.0;
        let mut request = fcl("40' GP", 18_000.0, 50.0);
        request.foreign_value = 10_000.0;
        request.quantity = 4;

        let result = compute_cost(&request, &catalog, false).unwrap();
        assert!(approx(result.local_value, 70_000.0));
        // opening 26.99 + acceptance capped 67.47 + payment 875 + cable 26.99
        assert!(approx(result.bank_charges, 996.45));
        // inspection 56 + customs 13.49 + forwarder 175 + exw 700
        assert!(approx(result.other_charges, 944.49));
        let expected = 330.0 + 996.45 + 944.49 + 70_000.0;
        assert!(approx(result.total_cost, expected));
        assert!(approx(result.unit_cost, expected / 4.0));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let catalog = RateCatalog::default();
        let mut request = fcl("20' GP", 1000.0, 5.0);
        request.quantity = 0;
        assert_eq!(
            compute_cost(&request, &catalog, false),
            Err(FreightError::InvalidQuantity)
        );
    }

    #[test]
    fn negative_or_non_finite_values_are_rejected() {
        let catalog = RateCatalog::default();
        for request in [
            fcl("20' GP", -1.0, 5.0),
            fcl("20' GP", 1000.0, f64::NAN),
            ShipmentRequest {
                foreign_value: -10.0,
                ..fcl("20' GP", 1000.0, 5.0)
            },
        ] {
            assert!(matches!(
                compute_cost(&request, &catalog, false),
                Err(FreightError::InvalidShipmentValues(_))
            ));
        }
    }

    #[test]
    fn unknown_container_surfaces_error() {
        let catalog = RateCatalog::default();
        assert_eq!(
            compute_cost(&fcl("53' HC", 1000.0, 5.0), &catalog, false),
            Err(FreightError::UnknownContainerType("53' HC".to_string()))
        );
    }

    #[test]
    fn huge_fcl_is_priced_per_container() {
        let catalog = freight_only_catalog();
        let request = fcl("40' HC", 0.0, 1e12);
        let result = compute_cost(&request, &catalog, true).unwrap();
        let mix = result.combination.unwrap();
        assert!(mix.feasible);
        assert_eq!(mix.count_of("40' HC"), 13_157_894_737);
        assert_eq!(result.freight_cost, 4_342_105_263_210.0);
    }

    #[test]
    fn optimizer_rejects_unusable_requirements() {
        let catalog = RateCatalog::default();
        for (volume, weight) in [(f64::NAN, 0.0), (0.0, f64::INFINITY), (1e18, 0.0)] {
            assert!(matches!(
                optimal_containers(volume, weight, &catalog, false),
                Err(FreightError::InvalidShipmentValues(_))
            ));
        }
    }

    #[test]
    fn missing_reefer_fleet_is_a_configuration_error() {
        let mut catalog = RateCatalog::default();
        catalog.containers.retain(|_, spec| !spec.is_reefer);
        assert_eq!(
            optimal_containers(20.0, 15_000.0, &catalog, true),
            Err(FreightError::EmptyContainerCatalog { reefer: true })
        );
    }
}
