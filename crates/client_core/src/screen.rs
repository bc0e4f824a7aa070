//! Customer screen: composes the list and edit-session controllers with the
//! mutation actions. Intents go in through [`CustomerScreen::handle`], the
//! returned [`ScreenRequest`] is run by the caller (a bridge thread or
//! [`CustomerScreen::settle`]) and its [`ScreenCompletion`] comes back through
//! [`CustomerScreen::complete`].

use shared::{
    domain::{Customer, CustomerId, SortField, SortOrder},
    protocol::CustomerPage,
};
use tracing::{debug, info, warn};

use crate::{
    edit::{EditSessionController, SaveRequest},
    error::ClientError,
    list::{CustomerListController, ListApply, ListRequest, QueryState, RequestSeq},
    CustomerApi,
};

pub const RESET_PROMPT: &str =
    "Reset all data to seed dataset? This will delete current customers.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenRequest {
    List(ListRequest),
    Save(SaveRequest),
    Delete { id: CustomerId },
    Reset,
}

impl ScreenRequest {
    pub fn label(&self) -> &'static str {
        match self {
            ScreenRequest::List(_) => "list",
            ScreenRequest::Save(SaveRequest::Create(_)) => "create",
            ScreenRequest::Save(SaveRequest::Update { .. }) => "update",
            ScreenRequest::Delete { .. } => "delete",
            ScreenRequest::Reset => "reset",
        }
    }
}

#[derive(Debug)]
pub enum ScreenCompletion {
    Listed {
        seq: RequestSeq,
        result: Result<CustomerPage, ClientError>,
    },
    Saved(Result<Customer, ClientError>),
    Deleted {
        id: CustomerId,
        result: Result<(), ClientError>,
    },
    Reset(Result<(), ClientError>),
}

impl ScreenCompletion {
    /// Completion for a request that never reached the API.
    pub fn failed(request: ScreenRequest, err: ClientError) -> Self {
        match request {
            ScreenRequest::List(ListRequest { seq, .. }) => ScreenCompletion::Listed {
                seq,
                result: Err(err),
            },
            ScreenRequest::Save(_) => ScreenCompletion::Saved(Err(err)),
            ScreenRequest::Delete { id } => ScreenCompletion::Deleted {
                id,
                result: Err(err),
            },
            ScreenRequest::Reset => ScreenCompletion::Reset(Err(err)),
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            ScreenCompletion::Listed { result, .. } => result.as_ref().err(),
            ScreenCompletion::Saved(result) => result.as_ref().err(),
            ScreenCompletion::Deleted { result, .. } => result.as_ref().err(),
            ScreenCompletion::Reset(result) => result.as_ref().err(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenIntent {
    Search(String),
    SortBy(SortField),
    SortOrder(SortOrder),
    Page(u32),
    Refresh,
    OpenAdd,
    OpenEdit(Customer),
    CloseModal,
    Save,
    Delete(CustomerId),
    RequestReset,
    CancelReset,
    ConfirmReset,
    DismissError,
}

#[derive(Debug, Default)]
pub struct CustomerScreen {
    list: CustomerListController,
    edit: EditSessionController,
    confirming_reset: bool,
    last_error: Option<String>,
}

impl CustomerScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: QueryState) -> Self {
        Self {
            list: CustomerListController::with_query(query),
            ..Self::default()
        }
    }

    pub fn list(&self) -> &CustomerListController {
        &self.list
    }

    pub fn edit(&self) -> &EditSessionController {
        &self.edit
    }

    pub fn edit_mut(&mut self) -> &mut EditSessionController {
        &mut self.edit
    }

    pub fn is_confirming_reset(&self) -> bool {
        self.confirming_reset
    }

    /// Latest mutation failure, else the latest list failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref().or_else(|| self.list.last_error())
    }

    pub fn handle(&mut self, intent: ScreenIntent) -> Option<ScreenRequest> {
        match intent {
            ScreenIntent::Search(text) => self.set_search(text),
            ScreenIntent::SortBy(field) => self.set_sort_by(field),
            ScreenIntent::SortOrder(order) => self.set_sort_order(order),
            ScreenIntent::Page(page) => self.set_page(page),
            ScreenIntent::Refresh => Some(self.refresh()),
            ScreenIntent::OpenAdd => {
                self.open_add_modal();
                None
            }
            ScreenIntent::OpenEdit(customer) => {
                self.open_edit_modal(customer);
                None
            }
            ScreenIntent::CloseModal => {
                self.close_modal();
                None
            }
            ScreenIntent::Save => self.save(),
            ScreenIntent::Delete(id) => Some(self.delete(id)),
            ScreenIntent::RequestReset => {
                self.request_reset();
                None
            }
            ScreenIntent::CancelReset => {
                self.cancel_reset();
                None
            }
            ScreenIntent::ConfirmReset => self.confirm_reset(),
            ScreenIntent::DismissError => {
                self.dismiss_error();
                None
            }
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) -> Option<ScreenRequest> {
        self.list.set_search(text).map(ScreenRequest::List)
    }

    pub fn set_sort_by(&mut self, field: SortField) -> Option<ScreenRequest> {
        self.list.set_sort_by(field).map(ScreenRequest::List)
    }

    pub fn set_sort_direction(&mut self, desc: bool) -> Option<ScreenRequest> {
        self.list.set_sort_direction(desc).map(ScreenRequest::List)
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> Option<ScreenRequest> {
        self.list.set_sort_order(order).map(ScreenRequest::List)
    }

    pub fn set_page(&mut self, page: u32) -> Option<ScreenRequest> {
        self.list.set_page(page).map(ScreenRequest::List)
    }

    pub fn refresh(&mut self) -> ScreenRequest {
        ScreenRequest::List(self.list.refresh())
    }

    pub fn open_add_modal(&mut self) {
        self.edit.open_add_modal();
    }

    pub fn open_edit_modal(&mut self, customer: Customer) {
        self.edit.open_edit_modal(customer);
    }

    pub fn close_modal(&mut self) {
        self.edit.close_modal();
    }

    pub fn save(&mut self) -> Option<ScreenRequest> {
        self.edit.submit().map(ScreenRequest::Save)
    }

    pub fn delete(&mut self, id: CustomerId) -> ScreenRequest {
        ScreenRequest::Delete { id }
    }

    pub fn request_reset(&mut self) {
        self.confirming_reset = true;
    }

    pub fn cancel_reset(&mut self) {
        self.confirming_reset = false;
    }

    /// Issues the reset only while the confirmation prompt is showing.
    pub fn confirm_reset(&mut self) -> Option<ScreenRequest> {
        if !std::mem::take(&mut self.confirming_reset) {
            return None;
        }
        Some(ScreenRequest::Reset)
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
        self.list.clear_error();
    }

    /// Folds a finished request back in. Successful mutations return the list
    /// refresh that should follow them.
    pub fn complete(&mut self, completion: ScreenCompletion) -> Option<ScreenRequest> {
        match completion {
            ScreenCompletion::Listed { seq, result } => {
                if self.list.apply(seq, result) == ListApply::Failed {
                    warn!(%seq, "customer list fetch failed");
                }
                None
            }
            ScreenCompletion::Saved(Ok(customer)) => {
                debug!(customer_id = %customer.id, "customer saved");
                self.edit.save_succeeded();
                self.last_error = None;
                Some(self.refresh())
            }
            ScreenCompletion::Saved(Err(err)) => {
                let message = err.to_string();
                self.edit.save_failed(message.clone());
                self.last_error = Some(message);
                None
            }
            ScreenCompletion::Deleted { id, result: Ok(()) } => {
                debug!(customer_id = %id, "customer deleted");
                self.last_error = None;
                Some(self.refresh())
            }
            ScreenCompletion::Deleted { id, result: Err(err) } => {
                warn!(customer_id = %id, "delete failed: {err}");
                self.last_error = Some(err.to_string());
                None
            }
            ScreenCompletion::Reset(Ok(())) => {
                info!("customer data reset to seed");
                self.last_error = None;
                Some(self.refresh())
            }
            ScreenCompletion::Reset(Err(err)) => {
                warn!("reset failed: {err}");
                self.last_error = Some(err.to_string());
                None
            }
        }
    }

    /// Runs `request` and every follow-up it produces, one at a time.
    pub async fn settle(&mut self, api: &dyn CustomerApi, request: ScreenRequest) {
        let mut next = Some(request);
        while let Some(request) = next {
            let completion = execute(api, request).await;
            next = self.complete(completion);
        }
    }
}

pub async fn execute(api: &dyn CustomerApi, request: ScreenRequest) -> ScreenCompletion {
    match request {
        ScreenRequest::List(ListRequest { seq, query }) => ScreenCompletion::Listed {
            seq,
            result: api.list_customers(&query).await,
        },
        ScreenRequest::Save(SaveRequest::Create(draft)) => {
            ScreenCompletion::Saved(api.create_customer(&draft).await)
        }
        ScreenRequest::Save(SaveRequest::Update { id, draft }) => {
            ScreenCompletion::Saved(api.update_customer(id, &draft).await)
        }
        ScreenRequest::Delete { id } => ScreenCompletion::Deleted {
            id,
            result: api.delete_customer(id).await,
        },
        ScreenRequest::Reset => ScreenCompletion::Reset(api.reset_customers().await),
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
