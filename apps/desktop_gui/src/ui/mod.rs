//! UI layer for desktop GUI: app shell and widgets.

pub mod app;
pub mod widgets;

pub use app::{CustomersApp, StartupConfig};
