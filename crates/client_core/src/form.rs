//! Sans-IO state machine behind the create and edit forms. The owning view
//! dispatches the network call when `begin_submit` yields a draft and feeds
//! the outcome back through the `submit_*` transitions.

use shared::{
    domain::{UserId, UserRecord},
    protocol::{UserDraft, UserField},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Success(String),
    Error(String),
}

/// What the view should do after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitSuccess {
    /// Create: the form stays mounted with every field cleared.
    Reset,
    /// Edit: local state is discarded and the view navigates to the list.
    NavigateToList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    AlreadySubmitting,
    MissingFields(Vec<UserField>),
}

pub struct FormController {
    mode: FormMode,
    draft: UserDraft,
    phase: FormPhase,
    status: FormStatus,
}

impl FormController {
    pub fn new_create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: UserDraft::default(),
            phase: FormPhase::Editing,
            status: FormStatus::Idle,
        }
    }

    /// Seeds an edit form from a resolved record, exactly once. Later edits
    /// never re-sync from the server.
    pub fn for_edit(record: &UserRecord) -> Self {
        Self {
            mode: FormMode::Edit(record.id),
            draft: UserDraft::from(record),
            phase: FormPhase::Editing,
            status: FormStatus::Idle,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Replaces exactly one field's value. Ignored while a submission is in
    /// flight (the inputs are disabled then).
    pub fn set_field(&mut self, field: UserField, value: impl Into<String>) {
        if self.phase == FormPhase::Editing {
            self.draft.set(field, value);
        }
    }

    /// Mutable access for the GUI's immediate-mode text widgets, which edit
    /// the draft in place. Returns `None` while submitting.
    pub fn draft_mut(&mut self) -> Option<&mut UserDraft> {
        match self.phase {
            FormPhase::Editing => Some(&mut self.draft),
            FormPhase::Submitting => None,
        }
    }

    /// Validates required-ness and transitions to submitting. Nothing is
    /// dispatched when fields are missing; the entered values stay put.
    pub fn begin_submit(&mut self) -> Result<UserDraft, SubmitBlocked> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitBlocked::AlreadySubmitting);
        }
        let missing = self.draft.missing_fields();
        if !missing.is_empty() {
            self.status = FormStatus::Error(format!("{} is required.", missing[0].label()));
            return Err(SubmitBlocked::MissingFields(missing));
        }
        self.phase = FormPhase::Submitting;
        self.status = FormStatus::Idle;
        Ok(self.draft.clone())
    }

    pub fn submit_succeeded(&mut self) -> SubmitSuccess {
        self.phase = FormPhase::Editing;
        match self.mode {
            FormMode::Create => {
                self.draft = UserDraft::default();
                self.status = FormStatus::Success("User created successfully!".to_string());
                SubmitSuccess::Reset
            }
            FormMode::Edit(_) => {
                self.status = FormStatus::Idle;
                SubmitSuccess::NavigateToList
            }
        }
    }

    /// The create endpoint answered `{success: false}`. Entered values are
    /// kept.
    pub fn submit_rejected(&mut self) {
        self.phase = FormPhase::Editing;
        self.status = FormStatus::Error("Failed to create user.".to_string());
    }

    /// Transport or server failure. Entered values are kept and the message
    /// is surfaced verbatim behind a fixed prefix.
    pub fn submit_failed(&mut self, message: &str) {
        self.phase = FormPhase::Editing;
        self.status = FormStatus::Error(format!("Error: {message}"));
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
