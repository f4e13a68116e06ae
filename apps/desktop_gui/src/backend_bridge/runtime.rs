//! Backend worker: owns the list controller and runs UI commands one at a time
//! on its own tokio runtime.

use std::thread;

use anyhow::Context;
use client_core::{
    save_draft, IssueApi, IssueClient, IssueListController, Operation, OperationError,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::runtime::Runtime;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    api_base: String,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let (runtime, client) = match build_backend(&api_base) {
            Ok(parts) => parts,
            Err(err) => {
                tracing::error!("backend worker startup failure: {err:#}");
                send_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("{err:#}"),
                    )),
                );
                return;
            }
        };
        tracing::info!(api_base = client.base_url(), "backend worker started");

        runtime.block_on(async move {
            let mut controller = IssueListController::new(client);
            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&mut controller, cmd, &ui_tx).await;
            }
            tracing::info!("ui command channel closed; backend worker exiting");
        });
    });
}

fn build_backend(api_base: &str) -> anyhow::Result<(Runtime, IssueClient)> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;
    let client = IssueClient::new(api_base).context("failed to configure issue service client")?;
    Ok((runtime, client))
}

pub async fn handle_command<A: IssueApi>(
    controller: &mut IssueListController<A>,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    tracing::debug!(command = cmd.name(), "handling backend command");
    match cmd {
        BackendCommand::Refresh => {
            let result = controller.refresh().await;
            publish_list(controller, result, ui_tx);
        }
        BackendCommand::Query(action) => match controller.apply(action).await {
            Ok(false) => {}
            Ok(true) => publish_list(controller, Ok(()), ui_tx),
            Err(err) => publish_list(controller, Err(err), ui_tx),
        },
        BackendCommand::SaveIssue { draft } => match save_draft(controller.api(), &draft).await {
            Ok(issue) => {
                send_event(ui_tx, UiEvent::IssueSaved(issue));
                let result = controller.issue_saved().await;
                publish_list(controller, result, ui_tx);
            }
            Err(err) => send_event(ui_tx, UiEvent::Error(err.into())),
        },
        BackendCommand::DeleteIssue { issue_id } => {
            let result = controller.delete_issue(issue_id).await;
            let deleted = match &result {
                Ok(()) => true,
                Err(err) => err.operation != Operation::DeleteIssue,
            };
            if deleted {
                send_event(ui_tx, UiEvent::IssueDeleted(issue_id));
            }
            publish_list(controller, result, ui_tx);
        }
    }
}

/// Sends the controller's current page, followed by the failure if the
/// operation that produced it did not succeed.
fn publish_list<A: IssueApi>(
    controller: &IssueListController<A>,
    result: Result<(), OperationError>,
    ui_tx: &Sender<UiEvent>,
) {
    send_event(ui_tx, UiEvent::ListUpdated(controller.view()));
    if let Err(err) = result {
        send_event(ui_tx, UiEvent::Error(err.into()));
    }
}

fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => tracing::warn!("ui event queue is full; dropping event"),
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event receiver dropped");
        }
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
