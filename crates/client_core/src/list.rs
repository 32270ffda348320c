//! Sans-IO state machine behind the listing table. Load outcomes replace the
//! row set wholesale; deletes go through an explicit per-row
//! pending-confirmation step before the owning view dispatches the call, so
//! the whole lifecycle is testable without a real modal.

use std::collections::HashMap;

use shared::domain::{UserId, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAction {
    #[default]
    Idle,
    PendingConfirmation,
    Deleting,
}

pub struct ListController {
    phase: ListPhase,
    rows: Vec<UserRecord>,
    row_actions: HashMap<UserId, RowAction>,
    delete_error: Option<String>,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new()
    }
}

impl ListController {
    pub fn new() -> Self {
        Self {
            phase: ListPhase::Loading,
            rows: Vec::new(),
            row_actions: HashMap::new(),
            delete_error: None,
        }
    }

    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    pub fn rows(&self) -> &[UserRecord] {
        &self.rows
    }

    pub fn row_action(&self, id: UserId) -> RowAction {
        self.row_actions.get(&id).copied().unwrap_or_default()
    }

    /// Delete failure surfaced above the (unchanged) table.
    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    /// The row currently awaiting confirmation, if any.
    pub fn pending_delete(&self) -> Option<UserId> {
        self.row_actions
            .iter()
            .find(|(_, action)| **action == RowAction::PendingConfirmation)
            .map(|(id, _)| *id)
    }

    pub fn begin_load(&mut self) {
        self.phase = ListPhase::Loading;
        self.rows.clear();
        self.row_actions.clear();
        self.delete_error = None;
    }

    /// Replaces the sequence wholesale and clears any previous error.
    pub fn load_succeeded(&mut self, rows: Vec<UserRecord>) {
        self.phase = ListPhase::Loaded;
        self.rows = rows;
        self.row_actions.clear();
        self.delete_error = None;
    }

    /// A dedicated error view replaces the table; stale rows are never shown.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.phase = ListPhase::Failed(message.into());
        self.rows.clear();
        self.row_actions.clear();
    }

    /// Marks a row as awaiting confirmation. Only one step in the guard for
    /// an irrevocable action; no network call happens yet.
    pub fn request_delete(&mut self, id: UserId) -> bool {
        if self.phase != ListPhase::Loaded {
            return false;
        }
        if !self.rows.iter().any(|row| row.id == id) {
            return false;
        }
        if self.row_action(id) != RowAction::Idle {
            return false;
        }
        self.delete_error = None;
        self.row_actions.insert(id, RowAction::PendingConfirmation);
        true
    }

    pub fn cancel_delete(&mut self, id: UserId) {
        if self.row_action(id) == RowAction::PendingConfirmation {
            self.row_actions.remove(&id);
        }
    }

    /// Confirmation given: the row's action control is disabled and shows a
    /// busy indicator while the caller issues the network call. Other rows
    /// stay interactive; deletes are not globally serialized.
    pub fn confirm_delete(&mut self, id: UserId) -> bool {
        if self.row_action(id) != RowAction::PendingConfirmation {
            return false;
        }
        self.row_actions.insert(id, RowAction::Deleting);
        true
    }

    /// Prunes the identifier in place; remaining order is untouched and no
    /// re-fetch happens.
    pub fn delete_succeeded(&mut self, id: UserId) {
        self.rows.retain(|row| row.id != id);
        self.row_actions.remove(&id);
    }

    /// The sequence is left untouched; the failed row returns to its normal
    /// interactive state.
    pub fn delete_failed(&mut self, id: UserId, message: impl Into<String>) {
        self.row_actions.remove(&id);
        self.delete_error = Some(message.into());
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
