//! Backend bridge: command queue from the UI thread to the worker runtime.

pub mod commands;
pub mod runtime;
