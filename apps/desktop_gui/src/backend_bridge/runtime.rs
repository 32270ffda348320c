//! Backend worker: a dedicated thread owning a tokio runtime and the HTTP
//! adapter. Commands arrive over the crossbeam queue; each request runs as
//! its own task so deletes stay concurrent and a superseded fetch can be
//! aborted when the user navigates away.

use std::{sync::Arc, thread};

use client_core::{config, DirectoryClient, UserDirectory};
use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = config::load_settings();
            info!(api_base_url = %settings.api_base_url, "backend worker ready");
            let directory: Arc<dyn UserDirectory> =
                Arc::new(DirectoryClient::from_settings(&settings));
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.api_base_url
            )));
            run_worker(directory, cmd_rx, ui_tx).await;
        });
    });
}

async fn run_worker(
    directory: Arc<dyn UserDirectory>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    let mut active_fetch: Option<JoinHandle<()>> = None;
    while let Ok(cmd) = cmd_rx.recv() {
        handle_command(&directory, cmd, &ui_tx, &mut active_fetch);
    }
    abort_active_fetch(&mut active_fetch);
}

fn abort_active_fetch(active_fetch: &mut Option<JoinHandle<()>>) {
    if let Some(task) = active_fetch.take() {
        task.abort();
    }
}

/// Dispatches one command. Fetches replace (and abort) the previous fetch;
/// mutating requests run detached to completion, each completion event
/// carrying the identifier it belongs to.
fn handle_command(
    directory: &Arc<dyn UserDirectory>,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
    active_fetch: &mut Option<JoinHandle<()>>,
) {
    match cmd {
        BackendCommand::FetchUsers => {
            abort_active_fetch(active_fetch);
            let directory = Arc::clone(directory);
            let tx = ui_tx.clone();
            *active_fetch = Some(tokio::spawn(async move {
                match directory.list_users().await {
                    Ok(users) => {
                        let _ = tx.try_send(UiEvent::UsersLoaded(users));
                    }
                    Err(err) => {
                        error!("list users failed: {err}");
                        let _ = tx.try_send(UiEvent::UsersLoadFailed(err.to_string()));
                    }
                }
            }));
        }
        BackendCommand::FetchUser { id } => {
            abort_active_fetch(active_fetch);
            let directory = Arc::clone(directory);
            let tx = ui_tx.clone();
            *active_fetch = Some(tokio::spawn(async move {
                match directory.user_by_id(id).await {
                    Ok(record) => {
                        let _ = tx.try_send(UiEvent::UserResolved(record));
                    }
                    Err(err) => {
                        error!(user_id = id.0, "resolve user failed: {err}");
                        let _ = tx.try_send(UiEvent::UserResolutionFailed {
                            id,
                            message: err.to_string(),
                        });
                    }
                }
            }));
        }
        BackendCommand::CreateUser { draft } => {
            let directory = Arc::clone(directory);
            let tx = ui_tx.clone();
            tokio::spawn(async move {
                match directory.create_user(&draft).await {
                    Ok(response) => {
                        let _ = tx.try_send(UiEvent::CreateFinished {
                            success: response.success,
                        });
                    }
                    Err(err) => {
                        error!("create user failed: {err}");
                        let _ = tx.try_send(UiEvent::CreateFailed(err.to_string()));
                    }
                }
            });
        }
        BackendCommand::UpdateUser { id, draft } => {
            let directory = Arc::clone(directory);
            let tx = ui_tx.clone();
            tokio::spawn(async move {
                match directory.update_user(id, &draft).await {
                    Ok(()) => {
                        let _ = tx.try_send(UiEvent::UpdateFinished { id });
                    }
                    Err(err) => {
                        error!(user_id = id.0, "update user failed: {err}");
                        let _ = tx.try_send(UiEvent::UpdateFailed {
                            id,
                            message: err.to_string(),
                        });
                    }
                }
            });
        }
        BackendCommand::DeleteUser { id } => {
            let directory = Arc::clone(directory);
            let tx = ui_tx.clone();
            tokio::spawn(async move {
                match directory.delete_user(id).await {
                    Ok(()) => {
                        let _ = tx.try_send(UiEvent::DeleteFinished { id });
                    }
                    Err(err) => {
                        error!(user_id = id.0, "delete user failed: {err}");
                        let _ = tx.try_send(UiEvent::DeleteFailed {
                            id,
                            message: err.to_string(),
                        });
                    }
                }
            });
        }
        BackendCommand::CancelActiveFetch => {
            abort_active_fetch(active_fetch);
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
