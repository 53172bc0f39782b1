//! # Container Allocator
//!
//! Splits a consignment across containers of one type, volume first.
//!
//! ## Algorithm (sequential greedy, volume-driven)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  containers_needed = ceil(total_volume / volume_capacity)              │
//! │                                                                         │
//! │  remaining = total_volume                                              │
//! │  for each container i:                                                 │
//! │      assigned_volume = min(remaining, volume_capacity)                 │
//! │      assigned_weight = total_weight × assigned_volume / total_volume   │
//! │      remaining      -= assigned_volume                                 │
//! │                                                                         │
//! │  Example: 50 m³ into 20GP (33.2 m³)                                    │
//! │                                                                         │
//! │   ┌────────────────────┐  ┌────────────────────┐                       │
//! │   │████████████████████│  │██████████          │                       │
//! │   │ #0  33.2 m³  100%  │  │ #1  16.8 m³  50.6% │ ◄── active            │
//! │   └────────────────────┘  └────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weight is not bin-packed. It follows volume on the assumption that cargo
//! density is uniform across the consignment, and fullness is decided by
//! volume alone. When weight by itself would need more containers than
//! volume does, the result carries a `WeightExceedsCapacity` warning; the
//! container count is left unchanged.
//!
//! A count above [`MAX_CONTAINERS`] is reported with a `TooManyContainers`
//! warning and no per-container breakdown.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::math::{checked_ratio, non_negative, ratio_or_zero};
use crate::types::ContainerTypeProfile;
use crate::warning::EngineWarning;
use crate::MAX_CONTAINERS;

/// Fill state of one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContainerFill {
    pub index: usize,
    pub volume_filled_percent: f64,
    pub weight_filled_percent: f64,
    pub volume_assigned: f64,
    pub weight_assigned: f64,
    /// `volume_filled_percent >= 100`.
    pub is_full: bool,
}

/// Output of [`allocate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AllocationResult {
    pub profile: ContainerTypeProfile,
    pub containers: Vec<ContainerFill>,

    /// First container that is not full, or the last one if all are full.
    /// `None` when nothing needs shipping.
    pub active_container_index: Option<usize>,

    /// Containers weight alone would require. Informational only.
    pub containers_by_weight: u64,

    pub warnings: Vec<EngineWarning>,
}

impl AllocationResult {
    pub fn containers_needed(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn active_container(&self) -> Option<&ContainerFill> {
        self.active_container_index
            .and_then(|i| self.containers.get(i))
    }

    /// Sum of assigned volume; equals the input volume within float tolerance.
    pub fn total_volume_assigned(&self) -> f64 {
        self.containers.iter().map(|c| c.volume_assigned).sum()
    }
}

/// Whole containers needed for `amount` at `capacity` each (0 if unguarded).
///
/// Saturates at `u64::MAX` for counts too large to represent.
fn containers_for(amount: f64, capacity: f64) -> u64 {
    checked_ratio(amount, capacity)
        .map(|n| n.ceil() as u64)
        .unwrap_or(0)
}

/// Allocates cargo volume and weight across containers of `profile`.
///
/// Pure and deterministic: identical inputs always partition volume the same
/// way in the same order. Non-positive volume, or a profile with no usable
/// volume capacity, yields an empty result.
pub fn allocate(
    total_volume: f64,
    total_weight: f64,
    profile: &ContainerTypeProfile,
) -> AllocationResult {
    let total_volume = non_negative(total_volume);
    let total_weight = non_negative(total_weight);
    let capacity = profile.volume_capacity;

    let containers_needed = if total_volume > 0.0 {
        containers_for(total_volume, capacity)
    } else {
        0
    };
    let containers_by_weight = containers_for(total_weight, profile.weight_capacity);

    let mut warnings = Vec::new();
    let mut containers = Vec::new();

    if containers_needed > MAX_CONTAINERS {
        warn!(
            containers_needed,
            max = MAX_CONTAINERS,
            container = %profile.code,
            "Consignment exceeds the container limit"
        );
        warnings.push(EngineWarning::TooManyContainers {
            containers_needed,
            max: MAX_CONTAINERS,
        });
    } else {
        let mut remaining = total_volume;
        for index in 0..containers_needed as usize {
            let volume_assigned = remaining.max(0.0).min(capacity);
            let volume_filled_percent = ratio_or_zero(volume_assigned, capacity) * 100.0;
            let weight_assigned = total_weight * ratio_or_zero(volume_assigned, total_volume);
            let weight_filled_percent =
                ratio_or_zero(weight_assigned, profile.weight_capacity) * 100.0;

            containers.push(ContainerFill {
                index,
                volume_filled_percent,
                weight_filled_percent,
                volume_assigned,
                weight_assigned,
                is_full: volume_filled_percent >= 100.0,
            });

            remaining -= volume_assigned;
        }
    }

    let active_container_index = containers
        .iter()
        .find(|c| !c.is_full)
        .or_else(|| containers.last())
        .map(|c| c.index);

    if containers_by_weight > containers_needed {
        warn!(
            containers_by_weight,
            containers_by_volume = containers_needed,
            container = %profile.code,
            "Cargo weight exceeds volume-based container allocation"
        );
        warnings.push(EngineWarning::WeightExceedsCapacity {
            containers_by_weight,
            containers_by_volume: containers_needed,
        });
    }

    debug!(
        total_volume,
        total_weight,
        containers = containers.len(),
        container = %profile.code,
        "Allocated shipment"
    );

    AllocationResult {
        profile: profile.clone(),
        containers,
        active_container_index,
        containers_by_weight,
        warnings,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn profile(volume: f64, weight: f64) -> ContainerTypeProfile {
        ContainerTypeProfile::new("TEST", "Test Box", volume, weight)
    }

    #[test]
    fn test_two_container_scenario() {
        let result = allocate(50.0, 10_000.0, &ContainerTypeProfile::twenty_foot());

        assert_eq!(result.containers_needed(), 2);

        let first = &result.containers[0];
        assert!((first.volume_assigned - 33.2).abs() < EPS);
        assert!((first.volume_filled_percent - 100.0).abs() < EPS);
        assert!(first.is_full);

        let second = &result.containers[1];
        assert!((second.volume_assigned - 16.8).abs() < 1e-6);
        assert!((second.volume_filled_percent - 50.602_409_638_554_2).abs() < 1e-6);
        assert!(!second.is_full);

        assert_eq!(result.active_container_index, Some(1));
    }

    #[test]
    fn test_zero_volume_is_empty() {
        let result = allocate(0.0, 500.0, &profile(10.0, 1000.0));
        assert!(result.is_empty());
        assert_eq!(result.active_container_index, None);
        assert!(result.active_container().is_none());
    }

    #[test]
    fn test_negative_volume_is_empty() {
        assert!(allocate(-3.0, 0.0, &profile(10.0, 1000.0)).is_empty());
    }

    #[test]
    fn test_exact_capacity_is_one_full_container() {
        let result = allocate(33.2, 1000.0, &ContainerTypeProfile::twenty_foot());

        assert_eq!(result.containers_needed(), 1);
        assert_eq!(result.containers[0].volume_filled_percent, 100.0);
        assert!(result.containers[0].is_full);
        // All full: the last container is active
        assert_eq!(result.active_container_index, Some(0));
    }

    #[test]
    fn test_volume_round_trips() {
        for total in [0.5, 10.0, 33.2, 50.0, 99.9, 250.75, 1234.5] {
            let result = allocate(total, 100.0, &ContainerTypeProfile::twenty_foot());
            assert!((result.total_volume_assigned() - total).abs() < 1e-6);
        }
    }

    #[test]
    fn test_weight_follows_volume_share() {
        let result = allocate(15.0, 3000.0, &profile(10.0, 5000.0));

        assert_eq!(result.containers_needed(), 2);
        assert!((result.containers[0].weight_assigned - 2000.0).abs() < EPS);
        assert!((result.containers[1].weight_assigned - 1000.0).abs() < EPS);
        assert!((result.containers[0].weight_filled_percent - 40.0).abs() < EPS);

        let weight_sum: f64 = result.containers.iter().map(|c| c.weight_assigned).sum();
        assert!((weight_sum - 3000.0).abs() < EPS);
    }

    #[test]
    fn test_heavy_cargo_is_flagged_not_reallocated() {
        // 5 m³ of steel weighing 60 t: one container by volume, three by weight
        let result = allocate(5.0, 60_000.0, &ContainerTypeProfile::twenty_foot());

        assert_eq!(result.containers_needed(), 1);
        assert_eq!(result.containers_by_weight, 3);
        assert_eq!(
            result.warnings,
            vec![EngineWarning::WeightExceedsCapacity {
                containers_by_weight: 3,
                containers_by_volume: 1,
            }]
        );
    }

    #[test]
    fn test_guarded_capacities() {
        assert!(allocate(10.0, 10.0, &profile(0.0, 100.0)).is_empty());

        let no_weight_cap = allocate(5.0, 100.0, &profile(10.0, 0.0));
        assert_eq!(no_weight_cap.containers[0].weight_filled_percent, 0.0);
        assert_eq!(no_weight_cap.containers_by_weight, 0);
    }

    #[test]
    fn test_huge_volume_is_capped() {
        let result = allocate(1e30, 1.0, &ContainerTypeProfile::twenty_foot());

        assert!(result.is_empty());
        assert_eq!(result.active_container_index, None);
        assert!(matches!(
            result.warnings.as_slice(),
            [EngineWarning::TooManyContainers { max: MAX_CONTAINERS, containers_needed }]
                if *containers_needed > MAX_CONTAINERS
        ));
    }

    #[test]
    fn test_count_at_cap_is_laid_out() {
        let result = allocate(MAX_CONTAINERS as f64, 0.0, &profile(1.0, 1000.0));
        assert_eq!(result.containers_needed(), MAX_CONTAINERS as usize);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let p = ContainerTypeProfile::forty_foot();
        assert_eq!(allocate(180.3, 42_000.0, &p), allocate(180.3, 42_000.0, &p));
    }
}
