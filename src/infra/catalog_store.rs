//! Rate catalog loading from a JSON file in the user's config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::domain::{ChargeFormula, RateCatalog};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "FreightCostCalculator";
const APP_NAME: &str = "FreightCostCalculator";

const CATALOG_FILENAME: &str = "rates.json";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Serde(#[from] SerdeError),
    #[error("invalid rate catalog: {0}")]
    Invalid(String),
}

/// `<config dir>/rates.json`, if the platform has a config directory.
pub fn default_catalog_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CATALOG_FILENAME))
}

pub fn load_catalog(path: &Path) -> Result<RateCatalog, CatalogError> {
    let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_catalog(&data)?;
    log::info!(
        "loaded rate catalog from {} ({} container types)",
        path.display(),
        catalog.containers.len()
    );
    Ok(catalog)
}

pub fn parse_catalog(data: &str) -> Result<RateCatalog, CatalogError> {
    let catalog: RateCatalog = serde_json::from_str(data)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// An explicit path must load. Without one, the config-dir catalog is used
/// when present, otherwise the built-in rates.
pub fn load_or_default(path: Option<&Path>) -> Result<RateCatalog, CatalogError> {
    if let Some(path) = path {
        return load_catalog(path);
    }

    match default_catalog_path() {
        Some(path) if path.exists() => load_catalog(&path),
        Some(path) => {
            log::info!(
                "no rate catalog at {}, using built-in rates",
                path.display()
            );
            Ok(RateCatalog::default())
        }
        None => {
            log::info!("no config directory, using built-in rates");
            Ok(RateCatalog::default())
        }
    }
}

pub fn validate_catalog(catalog: &RateCatalog) -> Result<(), CatalogError> {
    for (key, spec) in &catalog.containers {
        if key != &spec.type_id {
            return Err(invalid(format!(
                "container entry {key} carries type_id {}",
                spec.type_id
            )));
        }
        if !(spec.max_volume > 0.0 && spec.max_volume.is_finite()) {
            return Err(invalid(format!("{key}: max_volume must be positive")));
        }
        if !(spec.max_weight > 0.0 && spec.max_weight.is_finite()) {
            return Err(invalid(format!("{key}: max_weight must be positive")));
        }
        if !non_negative(spec.cost) {
            return Err(invalid(format!("{key}: cost must not be negative")));
        }
    }

    let lcl = &catalog.lcl;
    if !(non_negative(lcl.per_cbm) && non_negative(lcl.per_ton) && non_negative(lcl.minimum)) {
        return Err(invalid("LCL rates must not be negative".to_string()));
    }

    if !non_negative(catalog.air.minimum) {
        return Err(invalid("air minimum must not be negative".to_string()));
    }
    let mut previous_bound = f64::NEG_INFINITY;
    for bracket in &catalog.air.brackets {
        if !(bracket.upper_bound_kg > previous_bound) {
            return Err(invalid(format!(
                "air brackets must ascend, {} follows {}",
                bracket.upper_bound_kg, previous_bound
            )));
        }
        if !non_negative(bracket.rate_per_kg) {
            return Err(invalid(format!(
                "air bracket {} has a negative rate",
                bracket.upper_bound_kg
            )));
        }
        previous_bound = bracket.upper_bound_kg;
    }

    if !(catalog.exchange_rate > 0.0 && catalog.exchange_rate.is_finite()) {
        return Err(invalid("exchange rate must be positive".to_string()));
    }

    let bank = &catalog.bank_charges;
    let other = &catalog.other_charges;
    for line in bank.lines(0.0).iter().chain(other.lines(0.0).iter()) {
        if !non_negative(line.amount) {
            return Err(invalid(format!("{} must not be negative", line.name)));
        }
    }
    for formula in [
        &bank.opening_cable,
        &bank.acceptance,
        &bank.payment,
        &bank.cable,
        &other.import_inspection,
        &other.import_customs,
        &other.import_forwarder,
        &other.exw_overseas,
    ] {
        if let ChargeFormula::Proportional {
            rate,
            minimum,
            maximum,
            ..
        } = formula
        {
            if !non_negative(*rate) {
                return Err(invalid("charge rates must not be negative".to_string()));
            }
            if maximum.map(|cap| cap < *minimum).unwrap_or(false) {
                return Err(invalid("charge maximum is below its minimum".to_string()));
            }
        }
    }

    Ok(())
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn invalid(reason: String) -> CatalogError {
    CatalogError::Invalid(reason)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::{ContainerSpec, RateUnit};

    #[test]
    fn default_catalog_round_trips_through_file() {
        let catalog = RateCatalog::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string_pretty(&catalog).unwrap().as_bytes())
            .unwrap();

        let loaded = load_catalog(file.path()).unwrap();
        assert_eq!(loaded, catalog);
        let order: Vec<_> = loaded.containers.keys().map(String::as_str).collect();
        assert_eq!(
            order,
            vec!["20' GP", "40' GP", "40' HC", "20' RF", "40' RF", "40' RH"]
        );
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rates.json");
        assert!(matches!(
            load_or_default(Some(missing.as_path())),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_catalog("{ \"containers\": [}"),
            Err(CatalogError::Serde(_))
        ));
    }

    #[test]
    fn charge_units_are_read_from_config() {
        let mut catalog = RateCatalog::default();
        catalog.bank_charges.acceptance = ChargeFormula::Proportional {
            rate: 1.0,
            unit: RateUnit::PerMille,
            minimum: 13.49,
            maximum: Some(67.47),
        };
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"per_mille\""));

        let parsed = parse_catalog(&json).unwrap();
        assert_eq!(parsed.bank_charges.acceptance, catalog.bank_charges.acceptance);
    }

    #[test]
    fn proportional_unit_defaults_to_percent() {
        let formula: ChargeFormula =
            serde_json::from_str(r#"{ "kind": "proportional", "rate": 0.25, "minimum": 67.47 }"#)
                .unwrap();
        assert_eq!(formula, ChargeFormula::percent(0.25, 67.47, None));
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let mut catalog = RateCatalog::default();
        catalog.containers.insert(
            "flat rack".to_string(),
            ContainerSpec::new("flat rack", 0.0, 30_000.0, 400.0, false),
        );
        assert!(matches!(
            validate_catalog(&catalog),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_mismatched_key() {
        let mut catalog = RateCatalog::default();
        catalog.containers.insert(
            "45' HC".to_string(),
            ContainerSpec::new("40' HC", 86.0, 29_000.0, 400.0, false),
        );
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn rejects_descending_brackets() {
        let mut catalog = RateCatalog::default();
        catalog.air.brackets.swap(0, 1);
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn rejects_non_positive_exchange_rate() {
        let mut catalog = RateCatalog::default();
        catalog.exchange_rate = 0.0;
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn rejects_cap_below_floor() {
        let mut catalog = RateCatalog::default();
        catalog.other_charges.exw_overseas = ChargeFormula::percent(1.0, 134.94, Some(100.0));
        assert!(validate_catalog(&catalog).is_err());
    }

    #[test]
    fn shipped_example_matches_built_in_rates() {
        let catalog = parse_catalog(include_str!("../../config/rates.example.json")).unwrap();
        assert_eq!(catalog, RateCatalog::default());
    }
}
