//! Editable Grid
//!
//! Per-cell `Viewing` / `Editing` state machine over the registry rows.
//!
//! Each row owns one `RowEditContext` (its edit form). Cells are short-lived
//! `EditableCell` handles borrowed from that context, so an edit in one row
//! never touches another row's state, and a commit in one cell leaves the
//! sibling cells of the same row alone.

use std::collections::HashMap;

use serde::Serialize;

use super::registry::RiskRegistry;
use crate::models::{Category, Column, Probability, RiskRow, RiskRowPatch};

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellState {
    Viewing,
    Editing {
        draft: String,
        error: Option<FieldError>,
    },
}

/// Field-level validation failure, shown next to the cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("{} is required.", .column.title())]
    Required { column: Column },
    #[error("'{value}' is not a valid {}.", .column.title())]
    InvalidChoice { column: Column, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("column '{}' is not editable", .0.title())]
    NotEditable(Column),
    #[error("row '{0}' not found")]
    RowNotFound(String),
    #[error("cell is not being edited")]
    NotEditing,
}

/// Result of the commit path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Registry updated, cell back to `Viewing`
    Committed(RiskRow),
    /// Validation failed, cell stays `Editing`
    Rejected(FieldError),
}

/// One in-flight edit, as listed in workspace snapshots
#[derive(Debug, Clone, Serialize)]
pub struct OpenEdit {
    pub key: String,
    pub column: Column,
    pub draft: String,
    pub error: Option<FieldError>,
}

#[derive(Debug, Clone)]
struct CellEdit {
    draft: String,
    error: Option<FieldError>,
}

// ============================================================================
// ROW CONTEXT / CELL HANDLE
// ============================================================================

/// Edit form shared by every cell of one row. Holds at most one in-flight value per cell.
#[derive(Debug, Clone)]
pub struct RowEditContext {
    key: String,
    cells: HashMap<Column, CellEdit>,
}

impl RowEditContext {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            cells: HashMap::new(),
        }
    }

    pub fn cell(&mut self, column: Column) -> EditableCell<'_> {
        EditableCell { form: self, column }
    }

    pub fn state(&self, column: Column) -> CellState {
        match self.cells.get(&column) {
            Some(edit) => CellState::Editing {
                draft: edit.draft.clone(),
                error: edit.error.clone(),
            },
            None => CellState::Viewing,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.cells.is_empty()
    }
}

pub struct EditableCell<'a> {
    form: &'a mut RowEditContext,
    column: Column,
}

impl EditableCell<'_> {
    pub fn state(&self) -> CellState {
        self.form.state(self.column)
    }

    /// Viewing -> Editing, pre-filled with the row's current value.
    /// Activating a cell that is already editing keeps its draft.
    pub fn activate(&mut self, row: &RiskRow) -> Result<CellState, GridError> {
        if !self.column.is_editable() {
            return Err(GridError::NotEditable(self.column));
        }
        let current = row.value(self.column).ok_or(GridError::NotEditable(self.column))?;

        self.form.cells.entry(self.column).or_insert_with(|| CellEdit {
            draft: current,
            error: None,
        });
        Ok(self.state())
    }

    /// Replace the in-flight value
    pub fn input(&mut self, value: impl Into<String>) -> Result<CellState, GridError> {
        let edit = self.form.cells.get_mut(&self.column).ok_or(GridError::NotEditing)?;
        edit.draft = value.into();
        Ok(self.state())
    }

    /// Editing -> Viewing on a valid value; stays Editing with a field error otherwise.
    pub fn commit(&mut self, registry: &mut RiskRegistry) -> Result<CommitOutcome, GridError> {
        let edit = self.form.cells.get_mut(&self.column).ok_or(GridError::NotEditing)?;

        let patch = match validate(self.column, &edit.draft) {
            Ok(patch) => patch,
            Err(error) => {
                tracing::debug!(key = %self.form.key, column = ?self.column, %error, "Cell commit rejected");
                edit.error = Some(error.clone());
                return Ok(CommitOutcome::Rejected(error));
            }
        };

        self.form.cells.remove(&self.column);
        let key = self.form.key.clone();
        registry.update(&key, patch);

        registry
            .get(&key)
            .cloned()
            .map(CommitOutcome::Committed)
            .ok_or(GridError::RowNotFound(key))
    }
}

/// Presence check, then typed parsing for the enumerated columns
fn validate(column: Column, value: &str) -> Result<RiskRowPatch, FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required { column });
    }
    let invalid = || FieldError::InvalidChoice {
        column,
        value: value.to_string(),
    };

    let mut patch = RiskRowPatch::default();
    match column {
        Column::Activo => patch.activo = Some(value.to_string()),
        Column::Riesgo => patch.riesgo = Some(value.to_string()),
        Column::Impacto => patch.impacto = Some(value.to_string()),
        Column::Probabilidad => patch.probabilidad = Some(value.parse::<Probability>().map_err(|_| invalid())?),
        Column::Categoria => patch.categoria = Some(value.parse::<Category>().map_err(|_| invalid())?),
        Column::Tratamiento => patch.tratamiento = Some(value.to_string()),
        Column::Operation => return Err(invalid()),
    }
    Ok(patch)
}

// ============================================================================
// GRID
// ============================================================================

/// All row edit contexts, keyed by row key
#[derive(Debug, Clone, Default)]
pub struct EditableGrid {
    rows: HashMap<String, RowEditContext>,
}

impl EditableGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell_state(&self, key: &str, column: Column) -> CellState {
        self.rows
            .get(key)
            .map(|form| form.state(column))
            .unwrap_or(CellState::Viewing)
    }

    pub fn activate(&mut self, registry: &RiskRegistry, key: &str, column: Column) -> Result<CellState, GridError> {
        let row = registry.get(key).ok_or_else(|| GridError::RowNotFound(key.to_string()))?;
        let form = self
            .rows
            .entry(key.to_string())
            .or_insert_with(|| RowEditContext::new(key));
        form.cell(column).activate(row)
    }

    pub fn input(&mut self, key: &str, column: Column, value: impl Into<String>) -> Result<CellState, GridError> {
        let form = self.rows.get_mut(key).ok_or(GridError::NotEditing)?;
        form.cell(column).input(value)
    }

    pub fn commit(&mut self, registry: &mut RiskRegistry, key: &str, column: Column) -> Result<CommitOutcome, GridError> {
        let form = self.rows.get_mut(key).ok_or(GridError::NotEditing)?;
        let outcome = form.cell(column).commit(registry);
        if form.is_idle() {
            self.rows.remove(key);
        }
        if let Err(GridError::RowNotFound(_)) = &outcome {
            self.rows.remove(key);
        }
        outcome
    }

    /// Drop edit state of a deleted row
    pub fn forget_row(&mut self, key: &str) {
        self.rows.remove(key);
    }

    pub fn open_edits(&self) -> Vec<OpenEdit> {
        let mut edits: Vec<OpenEdit> = self
            .rows
            .values()
            .flat_map(|form| {
                form.cells.iter().map(|(column, edit)| OpenEdit {
                    key: form.key.clone(),
                    column: *column,
                    draft: edit.draft.clone(),
                    error: edit.error.clone(),
                })
            })
            .collect();
        edits.sort_by(|a, b| {
            let a_key = a.key.parse::<u64>().unwrap_or(u64::MAX);
            let b_key = b.key.parse::<u64>().unwrap_or(u64::MAX);
            a_key
                .cmp(&b_key)
                .then_with(|| column_index(a.column).cmp(&column_index(b.column)))
        });
        edits
    }
}

fn column_index(column: Column) -> usize {
    Column::ALL.iter().position(|c| *c == column).unwrap_or(usize::MAX)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::inference::profiles::classify;

    fn setup() -> (RiskRegistry, EditableGrid) {
        let mut registry = RiskRegistry::new();
        registry.create(classify("Servidor de Correo"), "Servidor de Correo");
        registry.create(classify("API Transacciones"), "API Transacciones");
        (registry, EditableGrid::new())
    }

    #[test]
    fn test_activate_prefills_current_value() {
        let (registry, mut grid) = setup();

        let state = grid.activate(&registry, "1", Column::Activo).unwrap();

        assert_eq!(
            state,
            CellState::Editing {
                draft: "Servidor de Correo".to_string(),
                error: None,
            }
        );
        assert_eq!(grid.cell_state("1", Column::Riesgo), CellState::Viewing);
    }

    #[test]
    fn test_operation_column_never_edits() {
        let (registry, mut grid) = setup();

        let result = grid.activate(&registry, "1", Column::Operation);

        assert_eq!(result, Err(GridError::NotEditable(Column::Operation)));
        assert_eq!(grid.cell_state("1", Column::Operation), CellState::Viewing);
    }

    #[test]
    fn test_commit_updates_registry_and_returns_to_viewing() {
        let (mut registry, mut grid) = setup();
        grid.activate(&registry, "1", Column::Tratamiento).unwrap();
        grid.input("1", Column::Tratamiento, "A.8.1.1 - Inventario de activos").unwrap();

        let outcome = grid.commit(&mut registry, "1", Column::Tratamiento).unwrap();

        let CommitOutcome::Committed(row) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(row.tratamiento, "A.8.1.1 - Inventario de activos");
        assert_eq!(registry.get("1").unwrap().tratamiento, "A.8.1.1 - Inventario de activos");
        assert_eq!(grid.cell_state("1", Column::Tratamiento), CellState::Viewing);
        assert!(grid.open_edits().is_empty());
    }

    #[test]
    fn test_empty_value_stays_editing_with_error() {
        let (mut registry, mut grid) = setup();
        let before = registry.list();
        grid.activate(&registry, "2", Column::Riesgo).unwrap();
        grid.input("2", Column::Riesgo, "").unwrap();

        let outcome = grid.commit(&mut registry, "2", Column::Riesgo).unwrap();

        let expected = FieldError::Required { column: Column::Riesgo };
        assert_eq!(outcome, CommitOutcome::Rejected(expected.clone()));
        assert_eq!(expected.to_string(), "Riesgo is required.");
        assert_eq!(
            grid.cell_state("2", Column::Riesgo),
            CellState::Editing {
                draft: String::new(),
                error: Some(expected),
            }
        );
        assert_eq!(registry.list(), before);
    }

    #[test]
    fn test_enumerated_column_rejects_unknown_value() {
        let (mut registry, mut grid) = setup();
        grid.activate(&registry, "1", Column::Categoria).unwrap();
        grid.input("1", Column::Categoria, "Severo").unwrap();

        let outcome = grid.commit(&mut registry, "1", Column::Categoria).unwrap();
        assert!(matches!(outcome, CommitOutcome::Rejected(FieldError::InvalidChoice { .. })));

        grid.input("1", Column::Categoria, "Critico").unwrap();
        let outcome = grid.commit(&mut registry, "1", Column::Categoria).unwrap();
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert_eq!(registry.get("1").unwrap().categoria, Category::Critico);
    }

    #[test]
    fn test_commit_leaves_sibling_cells_editing() {
        let (mut registry, mut grid) = setup();
        grid.activate(&registry, "1", Column::Activo).unwrap();
        grid.activate(&registry, "1", Column::Impacto).unwrap();
        grid.activate(&registry, "2", Column::Activo).unwrap();
        grid.input("1", Column::Activo, "Servidor SMTP").unwrap();

        grid.commit(&mut registry, "1", Column::Activo).unwrap();

        assert_eq!(grid.cell_state("1", Column::Activo), CellState::Viewing);
        assert!(matches!(grid.cell_state("1", Column::Impacto), CellState::Editing { .. }));
        assert!(matches!(grid.cell_state("2", Column::Activo), CellState::Editing { .. }));
        assert_eq!(registry.get("2").unwrap().activo, "API Transacciones");
        assert_eq!(registry.get("1").unwrap().activo, "Servidor SMTP");
    }

    #[test]
    fn test_reactivate_keeps_draft() {
        let (registry, mut grid) = setup();
        grid.activate(&registry, "1", Column::Riesgo).unwrap();
        grid.input("1", Column::Riesgo, "draft").unwrap();

        let state = grid.activate(&registry, "1", Column::Riesgo).unwrap();

        assert_eq!(
            state,
            CellState::Editing {
                draft: "draft".to_string(),
                error: None,
            }
        );
    }

    #[test]
    fn test_commit_without_edit_is_rejected() {
        let (mut registry, mut grid) = setup();
        assert_eq!(
            grid.commit(&mut registry, "1", Column::Activo),
            Err(GridError::NotEditing)
        );
    }

    #[test]
    fn test_activate_missing_row() {
        let (registry, mut grid) = setup();
        assert_eq!(
            grid.activate(&registry, "9", Column::Activo),
            Err(GridError::RowNotFound("9".to_string()))
        );
    }

    #[test]
    fn test_commit_after_row_deleted_drops_context() {
        let (mut registry, mut grid) = setup();
        grid.activate(&registry, "1", Column::Activo).unwrap();
        registry.delete("1");

        let result = grid.commit(&mut registry, "1", Column::Activo);

        assert_eq!(result, Err(GridError::RowNotFound("1".to_string())));
        assert!(grid.open_edits().is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_open_edits_sorted_by_row_then_column() {
        let (registry, mut grid) = setup();
        grid.activate(&registry, "2", Column::Activo).unwrap();
        grid.activate(&registry, "1", Column::Tratamiento).unwrap();
        grid.activate(&registry, "1", Column::Riesgo).unwrap();

        let edits: Vec<(String, Column)> = grid
            .open_edits()
            .into_iter()
            .map(|e| (e.key, e.column))
            .collect();

        assert_eq!(
            edits,
            vec![
                ("1".to_string(), Column::Riesgo),
                ("1".to_string(), Column::Tratamiento),
                ("2".to_string(), Column::Activo),
            ]
        );
    }
}
