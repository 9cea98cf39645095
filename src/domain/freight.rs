//! Freight pricing for a single shipment: sea FCL (one container), sea LCL and air.

use super::{
    entities::{LoadType, RateCatalog, ShipmentRequest, TransportMode, WeightBracket},
    error::FreightError,
};

/// Volumetric weight convention for air freight: 1 CBM counts as 167 kg.
pub const VOLUMETRIC_KG_PER_CBM: f64 = 167.0;

pub fn chargeable_weight(gross_weight_kg: f64, volume_cbm: f64, mode: TransportMode) -> f64 {
    match mode {
        TransportMode::Air => gross_weight_kg.max(volume_cbm * VOLUMETRIC_KG_PER_CBM),
        // LCL prices weight and volume independently.
        TransportMode::Sea => gross_weight_kg,
    }
}

pub fn price_sea(request: &ShipmentRequest, catalog: &RateCatalog) -> Result<f64, FreightError> {
    match request.load_type {
        LoadType::Fcl => {
            let type_id = request
                .chosen_container_type
                .as_deref()
                .ok_or(FreightError::ContainerTypeRequired)?;
            let spec = catalog
                .container(type_id)
                .ok_or_else(|| FreightError::UnknownContainerType(type_id.to_string()))?;
            Ok(spec.cost)
        }
        LoadType::Lcl => {
            let weight_tons = request.gross_weight_kg / 1000.0;
            let by_weight = weight_tons * catalog.lcl.per_ton;
            let by_volume = request.volume_cbm * catalog.lcl.per_cbm;
            Ok(by_weight.max(by_volume).max(catalog.lcl.minimum))
        }
    }
}

pub fn price_air(request: &ShipmentRequest, catalog: &RateCatalog) -> f64 {
    let weight = chargeable_weight(
        request.gross_weight_kg,
        request.volume_cbm,
        TransportMode::Air,
    );
    let Some(rate) = bracket_rate(&catalog.air.brackets, weight) else {
        return catalog.air.minimum;
    };

    (weight * rate).max(catalog.air.minimum)
}

/// Rate of the first band whose upper bound lies strictly above `weight`,
/// else the last band's rate. `None` only for an empty table.
pub fn bracket_rate(brackets: &[WeightBracket], weight: f64) -> Option<f64> {
    brackets
        .iter()
        .find(|bracket| weight < bracket.upper_bound_kg)
        .or_else(|| brackets.last())
        .map(|bracket| bracket.rate_per_kg)
}
