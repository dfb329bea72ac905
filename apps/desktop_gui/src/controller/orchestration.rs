//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Demo backend disconnected; restart the app".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use shared::domain::ShapeName;

    #[test]
    fn queues_commands_in_order() {
        let (tx, rx) = bounded(4);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::SelectShape(ShapeName::Circle), &mut status);
        dispatch_backend_command(&tx, BackendCommand::Analyze, &mut status);
        assert!(status.is_empty());
        assert_eq!(rx.try_recv().unwrap(), BackendCommand::SelectShape(ShapeName::Circle));
        assert_eq!(rx.try_recv().unwrap(), BackendCommand::Analyze);
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::Reset, &mut status);
        dispatch_backend_command(&tx, BackendCommand::Reset, &mut status);
        assert!(status.contains("full"));

        drop(rx);
        dispatch_backend_command(&tx, BackendCommand::CompareAll, &mut status);
        assert!(status.contains("disconnected"));
    }
}
