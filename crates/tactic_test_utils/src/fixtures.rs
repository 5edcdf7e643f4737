//! Test fixtures and helpers.
//!
//! A small pre-built tech tree and unit configurations for consistent
//! testing across crates.

use tactic_core::combat::{CombatUnit, DangerMap};
use tactic_core::geometry::PlanePoint;
use tactic_core::tech::{BuildInfo, TechTree, UnitTypeId, UpgradeId};

/// Headquarters structure.
pub const HQ: UnitTypeId = UnitTypeId::new(1);
/// Worker unit, trained at the [`HQ`].
pub const WORKER: UnitTypeId = UnitTypeId::new(2);
/// Infantry production structure, built by a [`WORKER`].
pub const BARRACKS: UnitTypeId = UnitTypeId::new(3);
/// Basic infantry unit, trained at the [`BARRACKS`].
pub const MARINE: UnitTypeId = UnitTypeId::new(4);
/// Vehicle production structure, requires a [`BARRACKS`].
pub const FACTORY: UnitTypeId = UnitTypeId::new(5);
/// Siege vehicle, trained at the [`FACTORY`].
pub const TANK: UnitTypeId = UnitTypeId::new(6);
/// Research structure attached to the [`BARRACKS`].
pub const TECH_LAB: UnitTypeId = UnitTypeId::new(7);
/// Infantry upgrade researched at the [`TECH_LAB`].
pub const STIM: UpgradeId = UpgradeId::new(101);

/// A small but realistic tech tree:
///
/// - `WORKER` trained at the `HQ`
/// - `BARRACKS` built by a `WORKER`
/// - `MARINE` trained at the `BARRACKS`
/// - `FACTORY` built by a `WORKER`, requires a `BARRACKS`
/// - `TANK` trained at the `FACTORY`, requires a `TECH_LAB`
/// - `TECH_LAB` built by a `WORKER`, requires a `BARRACKS`
/// - `STIM` researched at the `TECH_LAB`
#[must_use]
pub fn fixture_tech_tree() -> TechTree {
    TechTree::new()
        .with_unit(WORKER, HQ, BuildInfo::none())
        .with_unit(BARRACKS, WORKER, BuildInfo::none())
        .with_unit(MARINE, BARRACKS, BuildInfo::none())
        .with_unit(FACTORY, WORKER, BuildInfo::requiring_building(BARRACKS))
        .with_unit(TANK, FACTORY, BuildInfo::requiring_building(TECH_LAB))
        .with_unit(TECH_LAB, WORKER, BuildInfo::requiring_building(BARRACKS))
        .with_upgrade(STIM, TECH_LAB, BuildInfo::none())
}

/// A versatile ranged attacker at the given position.
#[must_use]
pub fn marine(position: PlanePoint) -> CombatUnit {
    CombatUnit {
        health: 45.0,
        ground_dps: 9.8,
        air_dps: 9.8,
        can_attack_ground: true,
        can_attack_air: true,
        ..CombatUnit::new(MARINE, position)
    }
}

/// A ground-only attacker with shields at the given position.
#[must_use]
pub fn tank(position: PlanePoint) -> CombatUnit {
    CombatUnit {
        health: 175.0,
        ground_dps: 18.7,
        can_attack_ground: true,
        ..CombatUnit::new(TANK, position)
    }
}

/// A cloaked, unrevealed unit at the given position.
#[must_use]
pub fn cloaked_unit(position: PlanePoint) -> CombatUnit {
    CombatUnit {
        health: 140.0,
        is_cloaked: true,
        is_flying: true,
        ..CombatUnit::new(UnitTypeId::new(20), position)
    }
}

/// A uniform danger map with one hot cell at `(x, y)`.
#[must_use]
pub fn danger_map_with_hotspot(width: usize, height: usize, x: usize, y: usize) -> DangerMap {
    let mut map = DangerMap::new(width, height);
    map.set(x, y, 2.0);
    map
}
