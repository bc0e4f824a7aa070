mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{CustomersApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "customers-desktop", about = "Customer management desktop client")]
struct Args {
    /// Base URL of the customer API; overrides customers.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// tracing filter, e.g. `info` or `client_core=debug`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(filter) = args.log {
        settings.log_filter = filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.server_url.clone());

    let startup = StartupConfig {
        server_url: settings.server_url,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Customers")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Customers",
        options,
        Box::new(|_cc| Ok(Box::new(CustomersApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
}
