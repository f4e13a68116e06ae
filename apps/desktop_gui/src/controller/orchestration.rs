//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. Returns `false` and fills `status`
/// when the command could not be queued.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker is not running; restart the app".to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_commands_in_order() {
        let (tx, rx) = bounded(4);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status));
        assert!(status.is_empty());
        assert_eq!(rx.try_recv().expect("command"), BackendCommand::Refresh);
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status));
        assert!(!dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status));
        assert!(status.contains("full"));

        drop(rx);
        assert!(!dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status));
        assert!(status.contains("not running"));
    }
}
