//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use demo_core::{AnalyzeOutcome, DemoController, Document};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub type GuiController = DemoController<Document>;

pub fn launch(
    controller: Arc<GuiController>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            if let Err(err) = controller.init() {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    err.to_string(),
                )));
                return;
            }
            let _ = ui_tx.try_send(UiEvent::Info("Select a shape to begin".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&controller, cmd, &ui_tx);
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn handle_command(controller: &Arc<GuiController>, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    match cmd {
        BackendCommand::SelectShape(shape) => match controller.select_shape(shape) {
            Ok(true) => {
                let _ = ui_tx.try_send(UiEvent::ShapeSelected(shape));
            }
            Ok(false) => {}
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Selection,
                    err.to_string(),
                )));
            }
        },
        BackendCommand::Analyze => {
            // Runs on a worker so resets and selections keep flowing (and get
            // rejected) while the sequences play.
            let controller = Arc::clone(controller);
            let ui_tx = ui_tx.clone();
            tokio::spawn(async move {
                let outcome = controller.analyze().await;
                if let AnalyzeOutcome::Failed(message) = &outcome {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::Analysis,
                        message.clone(),
                    )));
                }
                let _ = ui_tx.try_send(UiEvent::AnalysisFinished(outcome));
            });
        }
        BackendCommand::Reset => match controller.reset() {
            Ok(true) => {
                let _ = ui_tx.try_send(UiEvent::Info("Demo reset".to_string()));
            }
            Ok(false) => {
                let _ = ui_tx.try_send(UiEvent::Info(
                    "Reset is unavailable while an analysis is running".to_string(),
                ));
            }
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Reset,
                    err.to_string(),
                )));
            }
        },
        BackendCommand::CompareAll => {
            if let Some(notice) = controller.compare_all() {
                let _ = ui_tx.try_send(UiEvent::Notice(notice.to_string()));
            }
        }
    }
}
