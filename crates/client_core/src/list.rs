//! Query/list controller: owns the list query parameters and the last
//! fetched page. It performs no I/O; every parameter change hands back the
//! [`ListRequest`] to run, and [`CustomerListController::apply`] folds the
//! response in.

use std::fmt;

use shared::{
    domain::{Customer, SortField, SortOrder},
    protocol::{CustomerPage, ListCustomersQuery, DEFAULT_PAGE_SIZE},
};
use tracing::debug;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: None,
            order: SortOrder::Descending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn to_request(&self) -> ListCustomersQuery {
        ListCustomersQuery {
            search: self.search.clone(),
            sort_by: self.sort_by,
            desc: self.order.is_descending(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Tag of an issued list request. Later requests carry larger values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub seq: RequestSeq,
    pub query: ListCustomersQuery,
}

/// What [`CustomerListController::apply`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListApply {
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    Failed,
}

#[derive(Debug, Default)]
pub struct CustomerListController {
    query: QueryState,
    customers: Vec<Customer>,
    total: u64,
    last_issued: Option<RequestSeq>,
    last_settled: Option<RequestSeq>,
    last_error: Option<String>,
}

impl CustomerListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        crate::pagination::total_pages(self.total, self.query.page_size)
    }

    pub fn is_loading(&self) -> bool {
        self.last_issued.is_some() && self.last_issued != self.last_settled
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether `seq` is the most recently issued request, i.e. the only one
    /// whose response [`apply`](Self::apply) will accept.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        self.last_issued == Some(seq)
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// The page is not reset when the filter changes.
    pub fn set_search(&mut self, text: impl Into<String>) -> Option<ListRequest> {
        let text = text.into();
        if self.query.search == text {
            return None;
        }
        self.query.search = text;
        Some(self.refresh())
    }

    pub fn set_sort_by(&mut self, field: SortField) -> Option<ListRequest> {
        if self.query.sort_by == Some(field) {
            return None;
        }
        self.query.sort_by = Some(field);
        Some(self.refresh())
    }

    pub fn set_sort_direction(&mut self, desc: bool) -> Option<ListRequest> {
        self.set_sort_order(SortOrder::from_desc(desc))
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> Option<ListRequest> {
        if self.query.order == order {
            return None;
        }
        self.query.order = order;
        Some(self.refresh())
    }

    pub fn set_page(&mut self, page: u32) -> Option<ListRequest> {
        let page = page.max(1);
        if self.query.page == page {
            return None;
        }
        self.query.page = page;
        Some(self.refresh())
    }

    /// Issues a fetch for the current query, superseding any request still in
    /// flight.
    pub fn refresh(&mut self) -> ListRequest {
        let seq = RequestSeq(self.last_issued.map_or(1, |seq| seq.0 + 1));
        self.last_issued = Some(seq);
        ListRequest {
            seq,
            query: self.query.to_request(),
        }
    }

    pub fn apply(&mut self, seq: RequestSeq, result: Result<CustomerPage, ClientError>) -> ListApply {
        if !self.is_latest(seq) {
            debug!(%seq, latest = ?self.last_issued, "dropping stale customer list response");
            return ListApply::Stale;
        }
        self.last_settled = Some(seq);

        match result {
            Ok(page) => {
                self.customers = page.customers;
                self.total = page.total;
                self.last_error = None;
                ListApply::Applied
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                ListApply::Failed
            }
        }
    }
}
