//! # Shipment Commands
//!
//! Container catalog and allocation. A command that does not name a
//! container uses `[shipment] default_container` from the config.

use procura_core::{allocate, AllocationResult, ContainerTypeProfile};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::QuotationState;

pub fn list_containers() -> Vec<ContainerTypeProfile> {
    ContainerTypeProfile::catalog()
}

/// Allocates an explicit volume (m³) and weight (kg).
pub fn allocate_shipment(
    config: &AppConfig,
    total_volume: f64,
    total_weight: f64,
    container: Option<&str>,
) -> Result<AllocationResult, ApiError> {
    let profile = config.container_profile(container)?;
    debug!(total_volume, total_weight, container = %profile.code, "allocate_shipment command");
    Ok(allocate(total_volume, total_weight, &profile))
}

/// Allocates the grand totals of the open quotation.
pub fn allocate_quotation(
    config: &AppConfig,
    quotation: &QuotationState,
    container: Option<&str>,
) -> Result<AllocationResult, ApiError> {
    let profile = config.container_profile(container)?;
    debug!(container = %profile.code, "allocate_quotation command");
    Ok(quotation.with_quotation(|q| q.allocate(&profile)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_default_container_from_config() {
        let mut config = AppConfig::default();
        config.shipment.default_container = "40HC".to_string();

        let result = allocate_shipment(&config, 100.0, 5_000.0, None).unwrap();
        assert_eq!(result.profile.code, "40HC");
        assert_eq!(result.containers_needed(), 2);

        let result = allocate_shipment(&config, 100.0, 5_000.0, Some("20gp")).unwrap();
        assert_eq!(result.containers_needed(), 4);
    }

    #[test]
    fn test_unknown_container() {
        let err = allocate_shipment(&AppConfig::default(), 1.0, 1.0, Some("45FT")).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_catalog() {
        let codes: Vec<_> = list_containers().into_iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["20GP", "40GP", "40HC"]);
    }
}
