//! Property-based testing strategies.

use proptest::prelude::*;
use tactic_core::geometry::GridPoint;

/// Arbitrary disk radius, including fractional values.
pub fn radius() -> impl Strategy<Value = f32> {
    (0u32..160).prop_map(|tenths| tenths as f32 / 10.0)
}

/// Whole-number disk radius, as a float.
///
/// True disks centered on a cell are only produced for whole radii, so
/// symmetry properties use this strategy.
pub fn whole_radius() -> impl Strategy<Value = f32> {
    (0u32..12).prop_map(|r| r as f32)
}

/// Arbitrary grid point in a modest coordinate range.
pub fn grid_point() -> impl Strategy<Value = GridPoint> {
    (-64i32..64, -64i32..64).prop_map(|(x, y)| GridPoint::new(x, y))
}
