//! Minimum-cost FCL container mix for a required volume and weight.
//!
//! The search is a bulk-plus-remainder heuristic: for every admissible type
//! acting as the bulk filler, most of the requirement is covered with repeated
//! units of that type, leaving a residual of at most a few large containers.
//! The residual is solved exactly with a bounded branch-and-bound, and the
//! cheapest bulk + residual mix over all bulk choices wins.
//!
//! The residual search places at most [`RESIDUAL_DEPTH_CAP`] containers. When
//! the true optimum needs more containers in the remainder the result is still
//! feasible but may cost more than the global optimum.

use indexmap::IndexMap;

use super::entities::{ContainerCombination, ContainerSpec};
use super::error::FreightError;

/// Containers the residual search may place on top of the bulk fill.
pub const RESIDUAL_DEPTH_CAP: u32 = 15;

/// Largest-container units held back from the bulk fill for the exact search.
pub const BULK_BUFFER_UNITS: f64 = 5.0;

/// Largest container count that converts to `f64` without rounding.
pub const MAX_CONTAINER_COUNT: u64 = 1 << 53;

/// Orders admissible types by cost per CBM, keeping catalog order on ties.
pub fn branch_order<'a>(admissible: &[&'a ContainerSpec]) -> Vec<&'a ContainerSpec> {
    let mut ordered = admissible.to_vec();
    ordered.sort_by(|a, b| a.cost_per_volume().total_cmp(&b.cost_per_volume()));
    ordered
}

/// Cheapest combination of `admissible` containers covering both requirements.
///
/// Requirements at or below zero count as already met; non-finite ones are
/// rejected. An empty admissible set yields an infeasible, empty combination;
/// a search that finds nothing yields one unit of the largest container marked
/// infeasible.
pub fn optimize(
    required_volume: f64,
    required_weight: f64,
    admissible: &[&ContainerSpec],
) -> Result<ContainerCombination, FreightError> {
    for (name, value) in [("volume", required_volume), ("weight", required_weight)] {
        if !value.is_finite() {
            return Err(FreightError::InvalidShipmentValues(format!(
                "required {name} must be a finite number, got {value}"
            )));
        }
    }

    if admissible.is_empty() {
        return Ok(ContainerCombination::empty(false));
    }

    let required_volume = required_volume.max(0.0);
    let required_weight = required_weight.max(0.0);
    if required_volume <= 0.0 && required_weight <= 0.0 {
        return Ok(ContainerCombination::empty(true));
    }

    let types = branch_order(admissible);
    let volume_buffer = BULK_BUFFER_UNITS * types.iter().map(|t| t.max_volume).fold(0.0, f64::max);
    let weight_buffer = BULK_BUFFER_UNITS * types.iter().map(|t| t.max_weight).fold(0.0, f64::max);

    let mut best: Option<Candidate> = None;
    let mut searched_without_bulk = false;
    let mut oversized_bulk = false;
    let mut nodes = 0_u64;

    for (bulk_index, bulk) in types.iter().enumerate() {
        let Some(bulk_count) = bulk_units(
            required_volume - volume_buffer,
            required_weight - weight_buffer,
            bulk,
        ) else {
            oversized_bulk = true;
            continue;
        };
        if bulk_count == 0 {
            // Every zero-bulk choice runs the same residual search.
            if searched_without_bulk {
                continue;
            }
            searched_without_bulk = true;
        }

        let bulk_volume = bulk_count as f64 * bulk.max_volume;
        let bulk_weight = bulk_count as f64 * bulk.max_weight;
        let bulk_cost = bulk_count as f64 * bulk.cost;

        let mut search = ResidualSearch::new(
            &types,
            (required_volume - bulk_volume).max(0.0),
            (required_weight - bulk_weight).max(0.0),
        );
        search.explore(0, 0, Fill::default());
        nodes += search.nodes;

        let Some(residual) = search.best else {
            continue;
        };

        let cost = bulk_cost + residual.fill.cost;
        if best.as_ref().map(|b| cost < b.cost).unwrap_or(true) {
            let mut counts = residual.counts;
            counts[bulk_index] = counts[bulk_index]
                .checked_add(bulk_count)
                .ok_or_else(|| too_many_containers(required_volume, required_weight))?;
            best = Some(Candidate {
                counts,
                cost,
                volume: bulk_volume + residual.fill.volume,
                weight: bulk_weight + residual.fill.weight,
            });
        }
    }

    log::debug!(
        "container search: {:.2} CBM / {:.0} kg over {} types, {} nodes",
        required_volume,
        required_weight,
        types.len(),
        nodes
    );

    if best.is_none() && oversized_bulk {
        return Err(too_many_containers(required_volume, required_weight));
    }

    Ok(match best {
        Some(candidate) => candidate.into_combination(&types),
        None => {
            log::warn!(
                "no container mix covers {:.2} CBM / {:.0} kg, falling back to the largest container",
                required_volume,
                required_weight
            );
            largest_container_fallback(&types)
        }
    })
}

/// Bulk units of `bulk` needed before the residual search takes over. The
/// tighter of the two capacity bounds decides. `None` when the count exceeds
/// [`MAX_CONTAINER_COUNT`].
fn bulk_units(volume_to_fill: f64, weight_to_fill: f64, bulk: &ContainerSpec) -> Option<u64> {
    let by_volume = (volume_to_fill / bulk.max_volume).floor();
    let by_weight = (weight_to_fill / bulk.max_weight).floor();
    let units = by_volume.max(by_weight).max(0.0);
    if units.is_finite() && units <= MAX_CONTAINER_COUNT as f64 {
        Some(units as u64)
    } else {
        None
    }
}

fn too_many_containers(required_volume: f64, required_weight: f64) -> FreightError {
    FreightError::InvalidShipmentValues(format!(
        "{required_volume} CBM / {required_weight} kg needs more than {MAX_CONTAINER_COUNT} containers"
    ))
}

fn largest_container_fallback(types: &[&ContainerSpec]) -> ContainerCombination {
    let mut largest: Option<&ContainerSpec> = None;
    for spec in types.iter().copied() {
        if largest.map(|l| spec.max_volume > l.max_volume).unwrap_or(true) {
            largest = Some(spec);
        }
    }

    let Some(spec) = largest else {
        return ContainerCombination::empty(false);
    };

    let mut counts = IndexMap::new();
    counts.insert(spec.type_id.clone(), 1);
    ContainerCombination {
        counts,
        total_cost: spec.cost,
        total_volume: spec.max_volume,
        total_weight: spec.max_weight,
        feasible: false,
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Fill {
    cost: f64,
    volume: f64,
    weight: f64,
}

impl Fill {
    fn add(self, spec: &ContainerSpec) -> Self {
        Self {
            cost: self.cost + spec.cost,
            volume: self.volume + spec.max_volume,
            weight: self.weight + spec.max_weight,
        }
    }
}

struct Residual {
    counts: Vec<u64>,
    fill: Fill,
}

struct Candidate {
    counts: Vec<u64>,
    cost: f64,
    volume: f64,
    weight: f64,
}

impl Candidate {
    fn into_combination(self, types: &[&ContainerSpec]) -> ContainerCombination {
        let counts = types
            .iter()
            .zip(self.counts)
            .filter(|(_, count)| *count > 0)
            .map(|(spec, count)| (spec.type_id.clone(), count))
            .collect();

        ContainerCombination {
            counts,
            total_cost: self.cost,
            total_volume: self.volume,
            total_weight: self.weight,
            feasible: true,
        }
    }
}

/// Exact branch-and-bound over the residual requirement. Owns its own
/// best-so-far so concurrent optimizations never share state.
struct ResidualSearch<'a> {
    types: &'a [&'a ContainerSpec],
    required_volume: f64,
    required_weight: f64,
    counts: Vec<u64>,
    best: Option<Residual>,
    nodes: u64,
}

impl<'a> ResidualSearch<'a> {
    fn new(types: &'a [&'a ContainerSpec], required_volume: f64, required_weight: f64) -> Self {
        Self {
            types,
            required_volume,
            required_weight,
            counts: vec![0; types.len()],
            best: None,
            nodes: 0,
        }
    }

    fn explore(&mut self, start: usize, placed: u32, fill: Fill) {
        self.nodes += 1;

        if fill.volume >= self.required_volume && fill.weight >= self.required_weight {
            if self.best.as_ref().map(|b| fill.cost < b.fill.cost).unwrap_or(true) {
                self.best = Some(Residual {
                    counts: self.counts.clone(),
                    fill,
                });
            }
            return;
        }

        if self
            .best
            .as_ref()
            .map(|b| fill.cost >= b.fill.cost)
            .unwrap_or(false)
        {
            return;
        }

        if placed >= RESIDUAL_DEPTH_CAP {
            return;
        }

        // Non-decreasing type index: each multiset is visited once.
        for index in start..self.types.len() {
            let spec = self.types[index];
            self.counts[index] += 1;
            self.explore(index, placed + 1, fill.add(spec));
            self.counts[index] -= 1;
        }
    }
}
