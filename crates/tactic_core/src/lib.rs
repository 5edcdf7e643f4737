//! # Tactic Core
//!
//! Spatial-reasoning and tech-dependency primitives for the bot.
//!
//! This crate contains **only** pure, deterministic logic:
//! - No game API calls
//! - No IO
//! - No randomness
//!
//! The higher-level decision layers (placement, build-order planning,
//! target prioritization) consume these primitives; nothing in here
//! decides *what* to build or *where* to place anything.
//!
//! ## Crate Structure
//!
//! - [`geometry`] - Continuous 2D math (projection, circle intersections)
//! - [`raster`] - Shape rasterization onto a bounded grid, disk-offset cache
//! - [`compare`] - Multi-key comparator composition
//! - [`tech`] - Tech tables and transitive requirement resolution
//! - [`combat`] - Unit value and effective-DPS evaluation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod combat;
pub mod compare;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod tech;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{can_attack, unit_value, CombatUnit, DangerMap, DpsOverrides};
    pub use crate::compare::{combine_comparers, Comparer};
    pub use crate::error::{CoreError, Result};
    pub use crate::geometry::{GridPoint, PlanePoint};
    pub use crate::raster::{disk_offsets, structure_cells, GridShape};
    pub use crate::tech::{BuildInfo, BuildableItem, TechTree, UnitTypeId, UpgradeId};
}
