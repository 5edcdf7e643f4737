//! Unit combat-worthiness evaluation.
//!
//! Pure functions over a read-only view of unit state: whether an
//! attacker can engage a target, a danger-weighted unit value, and the
//! effective damage-per-second of a matchup. Target prioritization
//! composes these with [`crate::compare::combine_comparers`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::{GridPoint, PlanePoint};
use crate::tech::UnitTypeId;

/// Read-only combat view of a unit, fed in from the game state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatUnit {
    /// Type identifier, used for DPS overrides.
    pub type_id: UnitTypeId,
    /// Current position.
    pub position: PlanePoint,
    /// Current health.
    pub health: f32,
    /// Current shield.
    pub shield: f32,
    /// Damage per second against ground targets.
    pub ground_dps: f32,
    /// Damage per second against air targets.
    pub air_dps: f32,
    /// Whether the unit has a ground-capable weapon.
    pub can_attack_ground: bool,
    /// Whether the unit has an air-capable weapon.
    pub can_attack_air: bool,
    /// Whether the unit is cloaked.
    pub is_cloaked: bool,
    /// Whether a cloaked/burrowed unit is revealed by detection.
    pub is_revealed: bool,
    /// Whether the unit is airborne.
    pub is_flying: bool,
    /// Whether the unit is burrowed.
    pub is_burrowed: bool,
}

impl CombatUnit {
    /// Create a unit with neutral stats at a position.
    ///
    /// Tests and callers fill in the relevant fields with struct-update
    /// syntax.
    #[must_use]
    pub const fn new(type_id: UnitTypeId, position: PlanePoint) -> Self {
        Self {
            type_id,
            position,
            health: 0.0,
            shield: 0.0,
            ground_dps: 0.0,
            air_dps: 0.0,
            can_attack_ground: false,
            can_attack_air: false,
            is_cloaked: false,
            is_revealed: false,
            is_flying: false,
            is_burrowed: false,
        }
    }
}

/// Per-cell danger exponents used to weight unit value by positional
/// risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerMap {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl DangerMap {
    /// Neutral exponent: value is weighted linearly in `health + shield`.
    pub const NEUTRAL: f32 = 1.0;

    /// Create a danger map with every cell at the neutral exponent.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Self::NEUTRAL; width * height],
        }
    }

    /// Map width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Map height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Set the exponent for a cell. Returns `false` if out of bounds.
    pub fn set(&mut self, x: usize, y: usize, exponent: f32) -> bool {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = exponent;
            true
        } else {
            false
        }
    }

    /// Exponent at a rounded grid position.
    ///
    /// Out-of-bounds positions read as [`Self::NEUTRAL`].
    #[must_use]
    pub fn exponent_at(&self, cell: GridPoint) -> f32 {
        if cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
        {
            self.cells[cell.y as usize * self.width + cell.x as usize]
        } else {
            Self::NEUTRAL
        }
    }
}

/// Whether `attacker` can engage `target` at all.
///
/// A cloaked target that is not revealed cannot be engaged. Otherwise
/// the attacker needs a weapon matching the target's domain: air for
/// flying targets, ground for everything else.
#[must_use]
pub fn can_attack(attacker: &CombatUnit, target: &CombatUnit) -> bool {
    if target.is_cloaked && !target.is_revealed {
        false
    } else if target.is_flying {
        attacker.can_attack_air
    } else {
        attacker.can_attack_ground
    }
}

/// Danger-weighted combat value of a unit.
///
/// `(health + shield) ^ danger[rounded position] * max(ground_dps, air_dps)`:
/// survivability weighted exponentially by local risk, scaled by the
/// unit's best damage output.
#[must_use]
pub fn unit_value(unit: &CombatUnit, danger: &DangerMap) -> f32 {
    let exponent = danger.exponent_at(unit.position.rounded());
    (unit.health + unit.shield).powf(exponent) * unit.ground_dps.max(unit.air_dps)
}

/// Static override table for units whose effective DPS is not well
/// modeled by raw weapon stats (area damage, defensive structures).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DpsOverrides {
    overrides: HashMap<UnitTypeId, f32>,
}

impl DpsOverrides {
    /// Create an empty override table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed DPS value for a unit type.
    #[must_use]
    pub fn with_override(mut self, type_id: UnitTypeId, dps: f32) -> Self {
        self.overrides.insert(type_id, dps);
        self
    }

    /// Load an override table from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataParse`] if the text is not a valid
    /// override table.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| CoreError::DataParse(e.to_string()))
    }

    /// Effective damage per second of `attacker` against `target`.
    ///
    /// The override table wins if the attacker's type has an entry;
    /// otherwise 0 if the attacker cannot engage the target, otherwise
    /// the air or ground DPS matching the target's domain.
    #[must_use]
    pub fn calculate_dps(&self, attacker: &CombatUnit, target: &CombatUnit) -> f32 {
        if let Some(dps) = self.overrides.get(&attacker.type_id) {
            return *dps;
        }
        if !can_attack(attacker, target) {
            return 0.0;
        }
        if target.is_flying {
            attacker.air_dps
        } else {
            attacker.ground_dps
        }
    }
}
