use serde::{Deserialize, Serialize};

use crate::domain::{Customer, SortField};

/// Rows per page requested by every client surface.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query string of `GET /customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    pub desc: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListCustomersQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: None,
            desc: true,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Body of a successful list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total: u64,
}

impl CustomerPage {
    pub fn empty() -> Self {
        Self {
            customers: Vec::new(),
            total: 0,
        }
    }
}

/// Body of create and update requests. Updates always carry both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
}
