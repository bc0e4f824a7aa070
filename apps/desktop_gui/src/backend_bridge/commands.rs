//! Backend commands queued from UI to backend worker.

use client_core::ScreenRequest;

#[derive(Debug)]
pub enum BackendCommand {
    Execute(ScreenRequest),
    Reconnect { server_url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Execute(request) => request.label(),
            BackendCommand::Reconnect { .. } => "reconnect",
        }
    }
}
