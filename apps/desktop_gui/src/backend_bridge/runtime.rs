//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{screen::execute, CustomerApi, HttpCustomerApi, MissingCustomerApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, server_url: String) {
    thread::spawn(move || run_backend_worker(cmd_rx, ui_tx, server_url));
}

fn connect(server_url: &str, ui_tx: &Sender<UiEvent>) -> Arc<dyn CustomerApi> {
    match HttpCustomerApi::new(server_url) {
        Ok(api) => {
            tracing::info!(server_url = api.server_url(), "customer api configured");
            let _ = ui_tx.try_send(UiEvent::Connected {
                server_url: api.server_url().to_string(),
            });
            Arc::new(api)
        }
        Err(err) => {
            tracing::error!("cannot use server url: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                UiErrorContext::BackendStartup,
                &err,
            )));
            Arc::new(MissingCustomerApi::new(err.to_string()))
        }
    }
}

fn run_backend_worker(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, server_url: String) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::backend_startup(format!(
                "backend worker startup failure: failed to build runtime: {err}"
            ))));
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    runtime.block_on(async move {
        let mut api = connect(&server_url, &ui_tx);

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Execute(request) => {
                    let api = Arc::clone(&api);
                    let ui_tx = ui_tx.clone();
                    let name = request.label();
                    // Requests overlap; stale list responses are dropped by the screen.
                    tokio::spawn(async move {
                        let completion = execute(api.as_ref(), request).await;
                        if ui_tx.try_send(UiEvent::Completed(completion)).is_err() {
                            tracing::warn!(command = name, "ui event queue unavailable; completion dropped");
                        }
                    });
                }
                BackendCommand::Reconnect { server_url } => {
                    api = connect(&server_url, &ui_tx);
                }
            }
        }
        tracing::debug!("ui command queue closed; backend worker exiting");
    });
}
