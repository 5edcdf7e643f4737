//! Tech tables and transitive requirement resolution.
//!
//! The build-order planner asks "what does producing this item
//! transitively require?". The answer comes from two static tables,
//! fully populated at startup and read-only afterwards: one mapping a
//! producible unit to its valid producers plus per-producer build
//! metadata, and one mapping an upgrade to its single researcher plus
//! research metadata. [`TechTree::requirements_of`] walks those tables
//! lazily in a defined pre-order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Unique identifier for producible unit and structure types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitTypeId(pub u32);

impl UnitTypeId {
    /// Create a new unit type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for upgrade types.
///
/// Upgrades live in a namespace disjoint from [`UnitTypeId`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UpgradeId(pub u32);

impl UpgradeId {
    /// Create a new upgrade ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// An entity participating in the prerequisite graph: either a
/// producible unit/structure or an upgrade.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum BuildableItem {
    /// A producible unit or structure type.
    Unit(UnitTypeId),
    /// An upgrade type.
    Upgrade(UpgradeId),
}

impl From<UnitTypeId> for BuildableItem {
    fn from(id: UnitTypeId) -> Self {
        Self::Unit(id)
    }
}

impl From<UpgradeId> for BuildableItem {
    fn from(id: UpgradeId) -> Self {
        Self::Upgrade(id)
    }
}

/// Per-producer build metadata: the explicit extra requirements for
/// producing one item from one producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Structure that must exist before production can start.
    #[serde(default)]
    pub required_building: Option<UnitTypeId>,
    /// Upgrade that must be researched before production can start.
    #[serde(default)]
    pub required_upgrade: Option<UpgradeId>,
}

impl BuildInfo {
    /// Build info with no extra requirements.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            required_building: None,
            required_upgrade: None,
        }
    }

    /// Build info requiring an existing structure.
    #[must_use]
    pub const fn requiring_building(building: UnitTypeId) -> Self {
        Self {
            required_building: Some(building),
            required_upgrade: None,
        }
    }

    /// Build info requiring a prior upgrade.
    #[must_use]
    pub const fn requiring_upgrade(upgrade: UpgradeId) -> Self {
        Self {
            required_building: None,
            required_upgrade: Some(upgrade),
        }
    }

    /// The non-null direct requirements, building first.
    fn requirements(self) -> impl Iterator<Item = BuildableItem> {
        self.required_building
            .map(BuildableItem::Unit)
            .into_iter()
            .chain(self.required_upgrade.map(BuildableItem::Upgrade))
    }
}

/// Static prerequisite tables over [`BuildableItem`] nodes.
///
/// The tables describe a directed graph that is acyclic in well-formed
/// data; the traversal still guards against cycles instead of trusting
/// that externally (see [`TechTree::requirements_of`]).
///
/// # Example RON
///
/// ```ron
/// TechTree(
///     trained_from: { 4: [3] },
///     train_info: { 3: { 4: (required_building: Some(7)) } },
///     researched_from: { 101: 7 },
///     research_info: { 7: { 101: () } },
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechTree {
    /// Producible unit -> valid producer types.
    #[serde(default)]
    trained_from: HashMap<UnitTypeId, Vec<UnitTypeId>>,
    /// Producer -> produced unit -> build metadata.
    #[serde(default)]
    train_info: HashMap<UnitTypeId, HashMap<UnitTypeId, BuildInfo>>,
    /// Upgrade -> its single researcher type.
    #[serde(default)]
    researched_from: HashMap<UpgradeId, UnitTypeId>,
    /// Researcher -> upgrade -> research metadata.
    #[serde(default)]
    research_info: HashMap<UnitTypeId, HashMap<UpgradeId, BuildInfo>>,
}

impl TechTree {
    /// Create an empty tech tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer for a unit along with its build metadata.
    ///
    /// Call repeatedly to register multiple producers for one unit.
    #[must_use]
    pub fn with_unit(mut self, unit: UnitTypeId, trainer: UnitTypeId, info: BuildInfo) -> Self {
        self.trained_from.entry(unit).or_default().push(trainer);
        self.train_info.entry(trainer).or_default().insert(unit, info);
        self
    }

    /// Register the researcher for an upgrade along with its research
    /// metadata.
    #[must_use]
    pub fn with_upgrade(
        mut self,
        upgrade: UpgradeId,
        researcher: UnitTypeId,
        info: BuildInfo,
    ) -> Self {
        self.researched_from.insert(upgrade, researcher);
        self.research_info
            .entry(researcher)
            .or_default()
            .insert(upgrade, info);
        self
    }

    /// Load a tech tree from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataParse`] if the text is not a valid
    /// tech-tree description.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| CoreError::DataParse(e.to_string()))
    }

    /// Check that every reference in the tables resolves.
    ///
    /// Verifies that each unit has at least one producer, that build
    /// metadata exists for the producer that would be selected, and
    /// that every required building/upgrade has its own table entry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DataParse`] describing the first dangling
    /// reference found.
    pub fn validate(&self) -> Result<()> {
        for (unit, trainers) in &self.trained_from {
            if trainers.is_empty() {
                return Err(CoreError::DataParse(format!(
                    "unit {unit:?} has an empty producer list"
                )));
            }
            let (_, info) = self
                .unit_expansion(*unit)
                .ok_or_else(|| CoreError::DataParse(format!("unit {unit:?} is unresolvable")))?;
            self.validate_info(BuildableItem::Unit(*unit), info)?;
        }
        for (upgrade, researcher) in &self.researched_from {
            let info = self
                .research_info
                .get(researcher)
                .and_then(|per_upgrade| per_upgrade.get(upgrade))
                .copied()
                .ok_or_else(|| {
                    CoreError::DataParse(format!(
                        "upgrade {upgrade:?} has no research info under {researcher:?}"
                    ))
                })?;
            self.validate_info(BuildableItem::Upgrade(*upgrade), info)?;
        }
        Ok(())
    }

    // Producers themselves are only yielded, never expanded, so a leaf
    // producer without its own table entries is fine here.
    fn validate_info(&self, item: BuildableItem, info: BuildInfo) -> Result<()> {
        if let Some(building) = info.required_building {
            if !self.trained_from.contains_key(&building) {
                return Err(CoreError::DataParse(format!(
                    "{item:?} requires building {building:?} which has no producer entry"
                )));
            }
        }
        if let Some(upgrade) = info.required_upgrade {
            if !self.researched_from.contains_key(&upgrade) {
                return Err(CoreError::DataParse(format!(
                    "{item:?} requires upgrade {upgrade:?} which has no researcher entry"
                )));
            }
        }
        Ok(())
    }

    /// Lazily yield the transitive prerequisite closure of `item`.
    ///
    /// Traversal order (depth-first, pre-order): the producer comes
    /// first, then each direct requirement immediately followed by its
    /// own transitive closure. For a unit with multiple producers the
    /// one with the smallest raw id is selected, keeping the walk
    /// reproducible. An upgrade's single researcher is yielded first
    /// with no selection needed.
    ///
    /// The walk does **not** deduplicate: a requirement shared by two
    /// branches is yielded once per path. Callers wanting a unique
    /// build order collect into a set themselves. A cycle in the
    /// tables (malformed data) is detected via the current traversal
    /// path, logged, and skipped instead of recursing forever.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownItem`] if `item` has no table entry.
    pub fn requirements_of(&self, item: impl Into<BuildableItem>) -> Result<Requirements<'_>> {
        let item = item.into();
        let known = match item {
            BuildableItem::Unit(unit) => self.trained_from.contains_key(&unit),
            BuildableItem::Upgrade(upgrade) => self.researched_from.contains_key(&upgrade),
        };
        if !known {
            return Err(CoreError::UnknownItem(item));
        }
        Ok(Requirements {
            tree: self,
            stack: vec![Step::Expand(item)],
            path: HashSet::new(),
        })
    }

    /// Producer and build metadata used when expanding `item`.
    fn expansion_of(&self, item: BuildableItem) -> Option<(UnitTypeId, BuildInfo)> {
        match item {
            BuildableItem::Unit(unit) => {
                let trainer = self.selected_trainer(unit)?;
                Some((trainer, self.unit_info(unit, trainer)))
            }
            BuildableItem::Upgrade(upgrade) => {
                let researcher = self.researched_from.get(&upgrade).copied()?;
                let info = self
                    .research_info
                    .get(&researcher)
                    .and_then(|per_upgrade| per_upgrade.get(&upgrade))
                    .copied()
                    .unwrap_or_else(|| {
                        tracing::warn!(?upgrade, ?researcher, "missing research info");
                        BuildInfo::none()
                    });
                Some((researcher, info))
            }
        }
    }

    /// The deterministically selected producer: smallest raw id.
    fn selected_trainer(&self, unit: UnitTypeId) -> Option<UnitTypeId> {
        self.trained_from
            .get(&unit)?
            .iter()
            .copied()
            .min_by_key(|t| t.0)
    }

    fn unit_expansion(&self, unit: UnitTypeId) -> Option<(UnitTypeId, BuildInfo)> {
        let trainer = self.selected_trainer(unit)?;
        self.train_info
            .get(&trainer)
            .and_then(|per_unit| per_unit.get(&unit))
            .copied()
            .map(|info| (trainer, info))
    }

    fn unit_info(&self, unit: UnitTypeId, trainer: UnitTypeId) -> BuildInfo {
        self.train_info
            .get(&trainer)
            .and_then(|per_unit| per_unit.get(&unit))
            .copied()
            .unwrap_or_else(|| {
                tracing::warn!(?unit, ?trainer, "missing train info");
                BuildInfo::none()
            })
    }
}

/// One pending action in the requirement walk.
enum Step {
    /// Yield this item to the caller.
    Emit(BuildableItem),
    /// Look up this item and push its producer and requirements.
    Expand(BuildableItem),
    /// This item's subtree is done; drop it from the traversal path.
    Leave(BuildableItem),
}

/// Lazy iterator over a transitive prerequisite closure.
///
/// Finite for acyclic tables; not restartable. Produced by
/// [`TechTree::requirements_of`].
pub struct Requirements<'a> {
    tree: &'a TechTree,
    stack: Vec<Step>,
    /// Items on the current depth-first path; stops cyclic re-expansion.
    path: HashSet<BuildableItem>,
}

impl Iterator for Requirements<'_> {
    type Item = BuildableItem;

    fn next(&mut self) -> Option<BuildableItem> {
        while let Some(step) = self.stack.pop() {
            match step {
                Step::Emit(item) => return Some(item),
                Step::Leave(item) => {
                    self.path.remove(&item);
                }
                Step::Expand(item) => {
                    if !self.path.insert(item) {
                        tracing::warn!(?item, "cycle in tech tables, skipping re-expansion");
                        continue;
                    }
                    self.stack.push(Step::Leave(item));
                    let Some((producer, info)) = self.tree.expansion_of(item) else {
                        tracing::warn!(?item, "dangling tech table reference");
                        continue;
                    };
                    // Push requirements in reverse so they pop in
                    // declaration order, each followed by its closure.
                    let requirements: Vec<_> = info.requirements().collect();
                    for requirement in requirements.into_iter().rev() {
                        self.stack.push(Step::Expand(requirement));
                        self.stack.push(Step::Emit(requirement));
                    }
                    self.stack.push(Step::Emit(BuildableItem::Unit(producer)));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKER: UnitTypeId = UnitTypeId::new(2);
    const BARRACKS: UnitTypeId = UnitTypeId::new(3);
    const MARINE: UnitTypeId = UnitTypeId::new(4);
    const TANK: UnitTypeId = UnitTypeId::new(5);
    const FACTORY: UnitTypeId = UnitTypeId::new(6);
    const TECH_LAB: UnitTypeId = UnitTypeId::new(7);
    const ARMORY: UnitTypeId = UnitTypeId::new(8);
    const STIM: UpgradeId = UpgradeId::new(101);

    fn units(items: &[UnitTypeId]) -> Vec<BuildableItem> {
        items.iter().copied().map(BuildableItem::Unit).collect()
    }

    #[test]
    fn test_unit_with_no_extra_requirements_yields_only_producer() {
        let tree = TechTree::new().with_unit(MARINE, BARRACKS, BuildInfo::none());
        let result: Vec<_> = tree.requirements_of(MARINE).unwrap().collect();
        assert_eq!(result, units(&[BARRACKS]));
    }

    #[test]
    fn test_required_building_is_followed_by_its_closure() {
        let tree = TechTree::new()
            .with_unit(TANK, FACTORY, BuildInfo::requiring_building(ARMORY))
            .with_unit(ARMORY, WORKER, BuildInfo::none());
        let result: Vec<_> = tree.requirements_of(TANK).unwrap().collect();
        assert_eq!(result, units(&[FACTORY, ARMORY, WORKER]));
    }

    #[test]
    fn test_upgrade_yields_researcher_then_requirements() {
        let tree = TechTree::new()
            .with_upgrade(STIM, TECH_LAB, BuildInfo::requiring_building(BARRACKS))
            .with_unit(BARRACKS, WORKER, BuildInfo::none());
        let result: Vec<_> = tree.requirements_of(STIM).unwrap().collect();
        assert_eq!(result, units(&[TECH_LAB, BARRACKS, WORKER]));
    }

    #[test]
    fn test_building_requirement_precedes_upgrade_requirement() {
        let tree = TechTree::new()
            .with_unit(
                TANK,
                FACTORY,
                BuildInfo {
                    required_building: Some(ARMORY),
                    required_upgrade: Some(STIM),
                },
            )
            .with_unit(ARMORY, WORKER, BuildInfo::none())
            .with_upgrade(STIM, TECH_LAB, BuildInfo::none());
        let result: Vec<_> = tree.requirements_of(TANK).unwrap().collect();
        assert_eq!(
            result,
            vec![
                BuildableItem::Unit(FACTORY),
                BuildableItem::Unit(ARMORY),
                BuildableItem::Unit(WORKER),
                BuildableItem::Upgrade(STIM),
                BuildableItem::Unit(TECH_LAB),
            ]
        );
    }

    #[test]
    fn test_producer_tie_break_picks_smallest_id() {
        let tree = TechTree::new()
            .with_unit(MARINE, ARMORY, BuildInfo::none())
            .with_unit(MARINE, BARRACKS, BuildInfo::none());
        let result: Vec<_> = tree.requirements_of(MARINE).unwrap().collect();
        assert_eq!(result, units(&[BARRACKS]));
    }

    #[test]
    fn test_shared_ancestor_is_yielded_once_per_path() {
        // Both the required building and the required upgrade lead back
        // to BARRACKS; the walk must not deduplicate across branches.
        let tree = TechTree::new()
            .with_unit(
                MARINE,
                BARRACKS,
                BuildInfo {
                    required_building: Some(TECH_LAB),
                    required_upgrade: Some(STIM),
                },
            )
            .with_unit(TECH_LAB, BARRACKS, BuildInfo::none())
            .with_upgrade(STIM, TECH_LAB, BuildInfo::requiring_building(TECH_LAB));
        let result: Vec<_> = tree.requirements_of(MARINE).unwrap().collect();
        assert_eq!(
            result,
            vec![
                BuildableItem::Unit(BARRACKS),
                BuildableItem::Unit(TECH_LAB),
                BuildableItem::Unit(BARRACKS),
                BuildableItem::Upgrade(STIM),
                BuildableItem::Unit(TECH_LAB),
                BuildableItem::Unit(TECH_LAB),
                BuildableItem::Unit(BARRACKS),
            ]
        );
    }

    #[test]
    fn test_cyclic_tables_terminate() {
        // Malformed data: two units requiring each other.
        let tree = TechTree::new()
            .with_unit(MARINE, BARRACKS, BuildInfo::requiring_building(TANK))
            .with_unit(TANK, FACTORY, BuildInfo::requiring_building(MARINE));
        let result: Vec<_> = tree.requirements_of(MARINE).unwrap().collect();
        assert_eq!(result, units(&[BARRACKS, TANK, FACTORY, MARINE]));
    }

    #[test]
    fn test_unknown_item_is_an_error() {
        let tree = TechTree::new();
        assert_eq!(
            tree.requirements_of(MARINE).map(|_| ()),
            Err(CoreError::UnknownItem(BuildableItem::Unit(MARINE)))
        );
        assert_eq!(
            tree.requirements_of(STIM).map(|_| ()),
            Err(CoreError::UnknownItem(BuildableItem::Upgrade(STIM)))
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_tables() {
        let tree = TechTree::new()
            .with_unit(TANK, FACTORY, BuildInfo::requiring_building(ARMORY))
            .with_unit(ARMORY, WORKER, BuildInfo::none())
            .with_upgrade(STIM, TECH_LAB, BuildInfo::none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_building() {
        let tree = TechTree::new().with_unit(TANK, FACTORY, BuildInfo::requiring_building(ARMORY));
        assert!(matches!(tree.validate(), Err(CoreError::DataParse(_))));
    }

    #[test]
    fn test_from_ron_str() {
        let tree = TechTree::from_ron_str(
            r#"(
                trained_from: { 4: [3] },
                train_info: { 3: { 4: (required_building: Some(7)) } },
                researched_from: {},
                research_info: {},
            )"#,
        )
        .unwrap();
        let result: Vec<_> = tree.requirements_of(MARINE).unwrap().take(2).collect();
        assert_eq!(result, units(&[BARRACKS, TECH_LAB]));
    }

    #[test]
    fn test_from_ron_str_rejects_garbage() {
        assert!(matches!(
            TechTree::from_ron_str("not a tech tree"),
            Err(CoreError::DataParse(_))
        ));
    }
}
