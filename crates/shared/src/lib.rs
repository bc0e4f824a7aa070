//! Types shared by every customer client: domain records, wire shapes of the
//! customer API, and its error body.

pub mod domain;
pub mod error;
pub mod protocol;
