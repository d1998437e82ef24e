//! Two-tier warehouse allocation policy.
//!
//! Planning is pure: given the exit type, the requirement and the Hunucma
//! stock on hand, it decides how many loose units leave Hunucma and how many
//! sealed boxes leave Zelma. Zelma's own level never enters the plan; its
//! ledger absorbs overdraw as backorder.

use serde::{Deserialize, Serialize};

use mayab_core::{DomainError, DomainResult};
use mayab_parties::ExitType;
use mayab_products::boxes_needed;

/// Decided deduction split for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub hunucma_units: i64,
    pub zelma_boxes: i64,
}

/// Decide the deduction split for `required_units` of a product.
///
/// - `Pickup` / `NormalExit`: everything comes from Zelma, as
///   `ceil(required / units_per_box)` boxes.
/// - `FirstExit`: Hunucma covers what it can; any remainder converts to
///   Zelma boxes with the same ceiling rule.
pub fn plan(
    exit: ExitType,
    required_units: i64,
    hunucma_available: i64,
    units_per_box: i64,
) -> DomainResult<Allocation> {
    if required_units <= 0 {
        return Err(DomainError::validation("required_units", "must be positive"));
    }

    let allocation = match exit {
        ExitType::Pickup | ExitType::NormalExit => Allocation {
            hunucma_units: 0,
            zelma_boxes: boxes_needed(required_units, units_per_box),
        },
        ExitType::FirstExit => {
            let available = hunucma_available.max(0);
            if available >= required_units {
                Allocation {
                    hunucma_units: required_units,
                    zelma_boxes: 0,
                }
            } else {
                Allocation {
                    hunucma_units: available,
                    zelma_boxes: boxes_needed(required_units - available, units_per_box),
                }
            }
        }
    };

    Ok(allocation)
}

/// Advisory availability check used at confirmation time.
///
/// A requirement is coverable when Hunucma alone holds enough units, or
/// Zelma alone holds enough whole boxes. Missing ledger rows enter as zero.
pub fn covers(
    required_units: i64,
    hunucma_available: i64,
    zelma_boxes_available: i64,
    units_per_box: i64,
) -> bool {
    hunucma_available >= required_units
        || zelma_boxes_available >= boxes_needed(required_units, units_per_box)
}
