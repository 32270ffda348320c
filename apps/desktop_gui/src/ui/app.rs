//! Application shell: route state, backend event intake, and the three
//! screens (listing table, create form, edit form).

use std::time::Duration;

use client_core::{
    form::{FormController, FormMode, FormStatus, SubmitSuccess},
    list::{ListController, ListPhase, RowAction},
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::UserId,
    protocol::{UserDraft, UserField},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const INTRO_PREVIEW_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Create,
    Edit(UserId),
}

enum EditState {
    Resolving(UserId),
    NotFound(UserId),
    Ready(FormController),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Debug, Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn intro_preview(intro: &str) -> String {
    let mut chars = intro.chars();
    let preview: String = chars.by_ref().take(INTRO_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{preview}…")
    } else {
        preview
    }
}

/// What a form screen asked for this frame; applied after rendering so the
/// borrow of the form state has ended.
enum EditViewAction {
    Submit(UserId, UserDraft),
    BackToList,
}

pub struct DirectoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    route: Route,
    list: ListController,
    create_form: FormController,
    edit: Option<EditState>,

    status: String,
    status_banner: Option<StatusBanner>,
}

impl DirectoryApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            route: Route::List,
            list: ListController::new(),
            create_form: FormController::new_create(),
            edit: None,
            status: "Starting...".to_string(),
            status_banner: None,
        };
        // The list screen mounts first; kick off its load.
        dispatch_backend_command(&app.cmd_tx, BackendCommand::FetchUsers, &mut app.status);
        app
    }

    fn navigate(&mut self, route: Route) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::CancelActiveFetch,
            &mut self.status,
        );
        match route {
            Route::List => {
                self.edit = None;
                self.list.begin_load();
                dispatch_backend_command(&self.cmd_tx, BackendCommand::FetchUsers, &mut self.status);
            }
            Route::Create => {
                self.edit = None;
                self.create_form = FormController::new_create();
            }
            Route::Edit(id) => {
                self.edit = Some(EditState::Resolving(id));
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::FetchUser { id },
                    &mut self.status,
                );
            }
        }
        self.route = route;
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::UsersLoaded(rows) => {
                    if self.route == Route::List {
                        self.list.load_succeeded(rows);
                        self.status = "Users loaded".to_string();
                    }
                }
                UiEvent::UsersLoadFailed(message) => {
                    if self.route == Route::List {
                        let err = UiError::from_message(UiErrorContext::LoadUsers, message);
                        self.status =
                            format!("{} error: {}", err_label(err.category()), err.message());
                        self.list.load_failed(err.message().to_string());
                    }
                }
                UiEvent::UserResolved(record) => {
                    if self.route == Route::Edit(record.id)
                        && matches!(self.edit, Some(EditState::Resolving(_)))
                    {
                        self.edit = Some(EditState::Ready(FormController::for_edit(&record)));
                    }
                }
                UiEvent::UserResolutionFailed { id, message } => {
                    if self.route == Route::Edit(id)
                        && matches!(self.edit, Some(EditState::Resolving(_)))
                    {
                        let err = UiError::from_message(UiErrorContext::ResolveUser, message);
                        self.status =
                            format!("{} error: {}", err_label(err.category()), err.message());
                        self.edit = Some(EditState::NotFound(id));
                    }
                }
                UiEvent::CreateFinished { success } => {
                    if self.create_form.is_submitting() {
                        if success {
                            self.create_form.submit_succeeded();
                            self.status = "User created successfully!".to_string();
                        } else {
                            self.create_form.submit_rejected();
                            self.status = "Failed to create user.".to_string();
                        }
                    }
                }
                UiEvent::CreateFailed(message) => {
                    if self.create_form.is_submitting() {
                        let err = UiError::from_message(UiErrorContext::CreateUser, message);
                        self.create_form.submit_failed(err.message());
                        self.status =
                            format!("{} error: {}", err_label(err.category()), err.message());
                    }
                }
                UiEvent::UpdateFinished { id } => {
                    let finished = matches!(
                        self.edit.as_ref(),
                        Some(EditState::Ready(form))
                            if form.mode() == FormMode::Edit(id) && form.is_submitting()
                    );
                    if finished {
                        if let Some(EditState::Ready(form)) = self.edit.as_mut() {
                            if form.submit_succeeded() == SubmitSuccess::NavigateToList {
                                self.status = "User updated successfully!".to_string();
                                self.navigate(Route::List);
                            }
                        }
                    }
                }
                UiEvent::UpdateFailed { id, message } => {
                    if let Some(EditState::Ready(form)) = self.edit.as_mut() {
                        if form.mode() == FormMode::Edit(id) && form.is_submitting() {
                            form.submit_failed(&message);
                            self.status = "Failed to update user. Please try again.".to_string();
                        }
                    }
                }
                UiEvent::DeleteFinished { id } => {
                    self.list.delete_succeeded(id);
                    self.status = "User deleted successfully".to_string();
                }
                UiEvent::DeleteFailed { id, message } => {
                    self.list.delete_failed(id, message);
                    self.status = "Failed to delete user. Please try again.".to_string();
                }
                UiEvent::BackendFailed(err) => {
                    self.status = format!("{} error: {}", err_label(err.category()), err.message());
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: self.status.clone(),
                    });
                }
            }
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let text_color = match banner.severity {
                StatusBannerSeverity::Error => egui::Color32::LIGHT_RED,
            };
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(text_color));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                });
            });
        }
    }

    fn show_nav_bar(&mut self, ui: &mut egui::Ui) {
        let mut target: Option<Route> = None;
        ui.horizontal(|ui| {
            ui.heading("User Directory");
            ui.separator();
            if ui
                .selectable_label(self.route == Route::List, "Users")
                .clicked()
                && self.route != Route::List
            {
                target = Some(Route::List);
            }
            if ui
                .selectable_label(self.route == Route::Create, "New User")
                .clicked()
                && self.route != Route::Create
            {
                target = Some(Route::Create);
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
        if let Some(route) = target {
            self.navigate(route);
        }
    }

    fn show_list_view(&mut self, ui: &mut egui::Ui) {
        match self.list.phase().clone() {
            ListPhase::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.spinner();
                    ui.label("Loading users…");
                });
            }
            ListPhase::Failed(message) => {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!("Error: {message}"))
                            .color(egui::Color32::LIGHT_RED),
                    );
                    if ui.button("Try Again").clicked() {
                        self.list.begin_load();
                        dispatch_backend_command(
                            &self.cmd_tx,
                            BackendCommand::FetchUsers,
                            &mut self.status,
                        );
                    }
                });
            }
            ListPhase::Loaded => {
                if let Some(message) = self.list.delete_error().map(str::to_string) {
                    ui.label(
                        egui::RichText::new(format!("Error: {message}"))
                            .color(egui::Color32::LIGHT_RED),
                    );
                    ui.add_space(6.0);
                }

                if self.list.rows().is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(48.0);
                        ui.weak("No users found");
                    });
                    return;
                }

                let rows = self.list.rows().to_vec();
                let mut requested_delete: Option<UserId> = None;
                let mut open_edit: Option<UserId> = None;

                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("users_table")
                        .striped(true)
                        .num_columns(6)
                        .spacing([18.0, 8.0])
                        .show(ui, |ui| {
                            for header in
                                ["ID", "Username", "Telephone", "Address", "Introduction", "Actions"]
                            {
                                ui.label(egui::RichText::new(header).strong());
                            }
                            ui.end_row();

                            for row in &rows {
                                ui.label(row.id.to_string());
                                ui.label(&row.name);
                                ui.label(&row.tel);
                                ui.label(&row.address);
                                ui.label(intro_preview(&row.intro))
                                    .on_hover_text(&row.intro);
                                ui.horizontal(|ui| {
                                    match self.list.row_action(row.id) {
                                        RowAction::Deleting => {
                                            ui.add_enabled(
                                                false,
                                                egui::Button::new("Deleting…"),
                                            );
                                            ui.spinner();
                                        }
                                        action => {
                                            let interactive = action == RowAction::Idle;
                                            if ui
                                                .add_enabled(
                                                    interactive,
                                                    egui::Button::new("Delete"),
                                                )
                                                .clicked()
                                            {
                                                requested_delete = Some(row.id);
                                            }
                                            if ui
                                                .add_enabled(interactive, egui::Button::new("Edit"))
                                                .clicked()
                                            {
                                                open_edit = Some(row.id);
                                            }
                                        }
                                    }
                                });
                                ui.end_row();
                            }
                        });
                });

                if let Some(id) = requested_delete {
                    self.list.request_delete(id);
                }
                if let Some(id) = open_edit {
                    self.navigate(Route::Edit(id));
                }
            }
        }
    }

    fn show_create_view(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create User");
        ui.add_space(8.0);
        form_status(ui, self.create_form.status());
        form_fields(ui, &mut self.create_form);

        let submitting = self.create_form.is_submitting();
        let label = if submitting { "Submitting…" } else { "Submit" };
        if ui
            .add_enabled(!submitting, egui::Button::new(label))
            .clicked()
        {
            if let Ok(draft) = self.create_form.begin_submit() {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::CreateUser { draft },
                    &mut self.status,
                );
            }
        }
    }

    fn show_edit_view(&mut self, ui: &mut egui::Ui) {
        let mut action: Option<EditViewAction> = None;

        match self.edit.as_mut() {
            None => {
                action = Some(EditViewAction::BackToList);
            }
            Some(EditState::Resolving(_)) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.spinner();
                    ui.label("Loading user…");
                });
            }
            Some(EditState::NotFound(id)) => {
                ui.heading("User not found");
                ui.label(format!("No user with id {id} exists."));
                ui.add_space(8.0);
                if ui.button("Back to users").clicked() {
                    action = Some(EditViewAction::BackToList);
                }
            }
            Some(EditState::Ready(form)) => {
                ui.heading("Edit User");
                ui.add_space(8.0);
                form_status(ui, form.status());
                form_fields(ui, form);

                let submitting = form.is_submitting();
                let label = if submitting { "Updating…" } else { "Update User" };
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!submitting, egui::Button::new(label))
                        .clicked()
                    {
                        if let (Ok(draft), FormMode::Edit(id)) =
                            (form.begin_submit(), form.mode())
                        {
                            action = Some(EditViewAction::Submit(id, draft));
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(EditViewAction::BackToList);
                    }
                });
            }
        }

        match action {
            Some(EditViewAction::Submit(id, draft)) => {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::UpdateUser { id, draft },
                    &mut self.status,
                );
            }
            Some(EditViewAction::BackToList) => {
                self.navigate(Route::List);
            }
            None => {}
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(id) = self.list.pending_delete() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Confirm deletion")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Are you sure you want to delete this user?");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed && self.list.confirm_delete(id) {
            dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::DeleteUser { id },
                &mut self.status,
            );
        } else if cancelled {
            self.list.cancel_delete(id);
        }
    }
}

fn form_status(ui: &mut egui::Ui, status: &FormStatus) {
    let (text, color) = match status {
        FormStatus::Idle => return,
        FormStatus::Success(message) => (message.clone(), egui::Color32::LIGHT_GREEN),
        FormStatus::Error(message) => (message.clone(), egui::Color32::LIGHT_RED),
    };
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(egui::RichText::new(text).color(color));
    });
    ui.add_space(6.0);
}

fn form_fields(ui: &mut egui::Ui, form: &mut FormController) {
    if form.is_submitting() {
        let mut frozen = form.draft().clone();
        render_draft_fields(ui, &mut frozen, false);
    } else if let Some(draft) = form.draft_mut() {
        render_draft_fields(ui, draft, true);
    }
}

fn render_draft_fields(ui: &mut egui::Ui, draft: &mut UserDraft, enabled: bool) {
    for field in UserField::ALL {
        ui.label(egui::RichText::new(field.label()).strong());
        let binding = draft.get_mut(field);
        let widget = match field {
            UserField::Intro => egui::TextEdit::multiline(binding).desired_rows(4),
            _ => egui::TextEdit::singleline(binding),
        };
        ui.add_enabled(enabled, widget.desired_width(f32::INFINITY));
        ui.add_space(4.0);
    }
}

impl eframe::App for DirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_nav_bar(ui);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            match self.route {
                Route::List => self.show_list_view(ui),
                Route::Create => self.show_create_view(ui),
                Route::Edit(_) => self.show_edit_view(ui),
            }
        });

        self.show_delete_confirmation(ctx);

        // Backend events arrive from another thread; poll for them even when
        // no input is happening.
        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
