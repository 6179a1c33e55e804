//! Static task and fix-action data, validated once at load.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::simulation::SimulationKind;
use crate::widgets::WidgetKind;

/// Catalogue JSON compiled into the crate.
pub const BUILTIN_CATALOGUE: &str = include_str!("../assets/data/catalogue.json");

/// How hard a task is before any barrier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: &'static [Self] = &[Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A short interactive challenge, optionally made harder by barriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub prompt: String,
    pub insight: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub affected_by: SmallVec<[SimulationKind; 4]>,
    #[serde(default)]
    pub widget: WidgetKind,
}

impl Task {
    #[must_use]
    pub fn is_affected_by(&self, sim: SimulationKind) -> bool {
        self.affected_by.contains(&sim)
    }
}

/// A remedy the player can apply; each targets exactly one barrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAction {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub target: SimulationKind,
}

/// Mapping from each barrier to the id of the fix action that remedies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CorrectFixTable(BTreeMap<SimulationKind, String>);

impl CorrectFixTable {
    #[must_use]
    pub fn new(entries: BTreeMap<SimulationKind, String>) -> Self {
        Self(entries)
    }

    /// The correct fix id for `sim`; always `None` for `SimulationKind::None`.
    #[must_use]
    pub fn correct_fix_for(&self, sim: SimulationKind) -> Option<&str> {
        if sim.is_none() {
            return None;
        }
        self.0.get(&sim).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SimulationKind, &str)> {
        self.0.iter().map(|(sim, id)| (*sim, id.as_str()))
    }
}

/// Data integrity defects found while loading a catalogue.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("catalogue JSON is malformed: {0}")]
    Malformed(String),
    #[error("catalogue contains no tasks")]
    Empty,
    #[error("duplicate task id '{0}'")]
    DuplicateTask(String),
    #[error("duplicate fix action id '{0}'")]
    DuplicateFixAction(String),
    #[error("task '{task}' lists invalid barrier '{barrier}'")]
    InvalidBarrier {
        task: String,
        barrier: SimulationKind,
    },
    #[error("fix action '{0}' must target a barrier, not 'none'")]
    UntargetedFixAction(String),
    #[error("correct-fix table maps 'none' to '{0}'")]
    NoneHasFix(String),
    #[error("no correct fix registered for {0}")]
    MissingCorrectFix(SimulationKind),
    #[error("correct fix for {sim} names unknown action '{fix_id}'")]
    UnknownFixReference { sim: SimulationKind, fix_id: String },
    #[error("correct fix for {sim} is '{fix_id}', which targets {target}")]
    InconsistentTarget {
        sim: SimulationKind,
        fix_id: String,
        target: SimulationKind,
    },
}

/// Raw on-disk shape of a catalogue, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogueData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub fix_actions: Vec<FixAction>,
    #[serde(default)]
    pub correct_fixes: CorrectFixTable,
}

/// Validated, immutable task and fix-action catalogue.
///
/// Holds at least one task, and its correct-fix table covers every barrier
/// with an action whose target matches the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalogue {
    tasks: Vec<Task>,
    fix_actions: Vec<FixAction>,
    correct_fixes: CorrectFixTable,
}

impl Catalogue {
    /// Load the catalogue compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data fails validation.
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_json(BUILTIN_CATALOGUE)
    }

    /// Parse and validate a catalogue from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the data is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let data: CatalogueData =
            serde_json::from_str(json).map_err(|err| CatalogueError::Malformed(err.to_string()))?;
        Self::from_data(data)
    }

    /// Validate pre-parsed catalogue data.
    ///
    /// # Errors
    ///
    /// Returns the first integrity defect found.
    pub fn from_data(data: CatalogueData) -> Result<Self, CatalogueError> {
        validate_tasks(&data.tasks)?;
        validate_fix_actions(&data.fix_actions)?;
        validate_correct_fixes(&data.correct_fixes, &data.fix_actions)?;
        log::info!(
            "catalogue loaded: {} tasks, {} fix actions",
            data.tasks.len(),
            data.fix_actions.len()
        );
        Ok(Self {
            tasks: data.tasks,
            fix_actions: data.fix_actions,
            correct_fixes: data.correct_fixes,
        })
    }

    #[must_use]
    pub fn list_tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn list_fix_actions(&self) -> &[FixAction] {
        &self.fix_actions
    }

    #[must_use]
    pub const fn correct_fixes(&self) -> &CorrectFixTable {
        &self.correct_fixes
    }

    #[must_use]
    pub fn correct_fix_for(&self, sim: SimulationKind) -> Option<&str> {
        self.correct_fixes.correct_fix_for(sim)
    }

    /// The fix action that remedies `sim`, if any.
    #[must_use]
    pub fn correct_fix_action(&self, sim: SimulationKind) -> Option<&FixAction> {
        self.correct_fix_for(sim).and_then(|id| self.fix_action(id))
    }

    /// First task in catalogue order; the starting task of every session.
    #[must_use]
    pub fn first_task(&self) -> &Task {
        // Non-empty by construction.
        &self.tasks[0]
    }

    #[must_use]
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    #[must_use]
    pub fn fix_action(&self, id: &str) -> Option<&FixAction> {
        self.fix_actions.iter().find(|action| action.id == id)
    }
}

fn validate_tasks(tasks: &[Task]) -> Result<(), CatalogueError> {
    if tasks.is_empty() {
        return Err(CatalogueError::Empty);
    }
    let mut seen = HashSet::new();
    for task in tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(CatalogueError::DuplicateTask(task.id.clone()));
        }
        let mut barriers = HashSet::new();
        for barrier in &task.affected_by {
            if barrier.is_none() || !barriers.insert(*barrier) {
                return Err(CatalogueError::InvalidBarrier {
                    task: task.id.clone(),
                    barrier: *barrier,
                });
            }
        }
    }
    Ok(())
}

fn validate_fix_actions(actions: &[FixAction]) -> Result<(), CatalogueError> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.id.as_str()) {
            return Err(CatalogueError::DuplicateFixAction(action.id.clone()));
        }
        if action.target.is_none() {
            return Err(CatalogueError::UntargetedFixAction(action.id.clone()));
        }
    }
    Ok(())
}

fn validate_correct_fixes(
    table: &CorrectFixTable,
    actions: &[FixAction],
) -> Result<(), CatalogueError> {
    if let Some(id) = table.0.get(&SimulationKind::None) {
        return Err(CatalogueError::NoneHasFix(id.clone()));
    }
    for &sim in SimulationKind::BARRIERS {
        let fix_id = table
            .correct_fix_for(sim)
            .ok_or(CatalogueError::MissingCorrectFix(sim))?;
        let action = actions
            .iter()
            .find(|action| action.id == fix_id)
            .ok_or_else(|| CatalogueError::UnknownFixReference {
                sim,
                fix_id: fix_id.to_string(),
            })?;
        if action.target != sim {
            return Err(CatalogueError::InconsistentTarget {
                sim,
                fix_id: fix_id.to_string(),
                target: action.target,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin_data() -> CatalogueData {
        serde_json::from_str(BUILTIN_CATALOGUE).unwrap()
    }

    #[test]
    fn builtin_catalogue_is_consistent() {
        let catalogue = Catalogue::builtin().unwrap();
        assert_eq!(catalogue.list_tasks().len(), 7);
        assert_eq!(catalogue.list_fix_actions().len(), 7);
        assert_eq!(catalogue.first_task().id, "color-buttons");
        for &sim in SimulationKind::BARRIERS {
            let action = catalogue.correct_fix_action(sim).unwrap();
            assert_eq!(action.target, sim);
        }
        assert!(catalogue.correct_fix_for(SimulationKind::None).is_none());
    }

    #[test]
    fn lookups_by_id() {
        let catalogue = Catalogue::builtin().unwrap();
        assert_eq!(
            catalogue.fix_action("labels").map(|a| a.target),
            Some(SimulationKind::ColorBlind)
        );
        assert!(catalogue.fix_action("duct-tape").is_none());
        let task = catalogue.task("dropdown-menu").unwrap();
        assert_eq!(task.difficulty, Difficulty::Medium);
        assert!(task.is_affected_by(SimulationKind::ZoomedUI));
        assert!(!task.is_affected_by(SimulationKind::ColorBlind));
    }

    #[test]
    fn empty_catalogue_is_rejected() {
        let mut data = builtin_data();
        data.tasks.clear();
        assert_eq!(Catalogue::from_data(data), Err(CatalogueError::Empty));
    }

    #[test]
    fn inconsistent_table_is_rejected() {
        let mut data = builtin_data();
        let mut entries: BTreeMap<_, _> = data
            .correct_fixes
            .iter()
            .map(|(sim, id)| (sim, id.to_string()))
            .collect();
        entries.insert(SimulationKind::ColorBlind, "font-size".to_string());
        data.correct_fixes = CorrectFixTable::new(entries);
        assert_eq!(
            Catalogue::from_data(data),
            Err(CatalogueError::InconsistentTarget {
                sim: SimulationKind::ColorBlind,
                fix_id: "font-size".to_string(),
                target: SimulationKind::BlurredVision,
            })
        );
    }

    #[test]
    fn missing_and_dangling_entries_are_rejected() {
        let mut data = builtin_data();
        let mut entries: BTreeMap<_, _> = data
            .correct_fixes
            .iter()
            .map(|(sim, id)| (sim, id.to_string()))
            .collect();
        entries.remove(&SimulationKind::ScreenReader);
        data.correct_fixes = CorrectFixTable::new(entries.clone());
        assert_eq!(
            Catalogue::from_data(data.clone()),
            Err(CatalogueError::MissingCorrectFix(SimulationKind::ScreenReader))
        );

        entries.insert(SimulationKind::ScreenReader, "aria".to_string());
        data.correct_fixes = CorrectFixTable::new(entries.clone());
        assert!(matches!(
            Catalogue::from_data(data.clone()),
            Err(CatalogueError::UnknownFixReference { .. })
        ));

        entries.insert(SimulationKind::ScreenReader, "screen-reader".to_string());
        entries.insert(SimulationKind::None, "labels".to_string());
        data.correct_fixes = CorrectFixTable::new(entries);
        assert_eq!(
            Catalogue::from_data(data),
            Err(CatalogueError::NoneHasFix("labels".to_string()))
        );
    }

    #[test]
    fn duplicate_ids_and_bad_barriers_are_rejected() {
        let mut data = builtin_data();
        let dup = data.tasks[0].clone();
        data.tasks.push(dup);
        assert_eq!(
            Catalogue::from_data(data),
            Err(CatalogueError::DuplicateTask("color-buttons".to_string()))
        );

        let mut data = builtin_data();
        data.tasks[1].affected_by.push(SimulationKind::BlurredVision);
        assert!(matches!(
            Catalogue::from_data(data),
            Err(CatalogueError::InvalidBarrier { .. })
        ));

        let mut data = builtin_data();
        data.fix_actions[0].target = SimulationKind::None;
        assert_eq!(
            Catalogue::from_data(data),
            Err(CatalogueError::UntargetedFixAction("labels".to_string()))
        );
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        assert!(matches!(
            Catalogue::from_json("{ \"tasks\": 3 }"),
            Err(CatalogueError::Malformed(_))
        ));
    }
}
