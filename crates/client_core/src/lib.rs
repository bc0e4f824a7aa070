//! Client library for the remote customer API: transport, the list and
//! edit-session controllers, and the screen that composes them.

use async_trait::async_trait;
use shared::{
    domain::{Customer, CustomerId},
    protocol::{CustomerDraft, CustomerPage, ListCustomersQuery},
};

pub mod config;
pub mod edit;
pub mod error;
pub mod list;
pub mod pagination;
pub mod screen;
pub mod transport;

pub use config::ClientSettings;
pub use edit::{CustomerForm, EditMode, EditSessionController, FieldErrors, SaveRequest};
pub use error::ClientError;
pub use list::{CustomerListController, ListApply, ListRequest, QueryState, RequestSeq};
pub use screen::{CustomerScreen, ScreenCompletion, ScreenIntent, ScreenRequest};
pub use transport::HttpCustomerApi;

/// The five operations of the remote customer API.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list_customers(&self, query: &ListCustomersQuery) -> Result<CustomerPage, ClientError>;
    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ClientError>;
    async fn update_customer(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, ClientError>;
    async fn delete_customer(&self, id: CustomerId) -> Result<(), ClientError>;
    /// Replaces the whole dataset with the server's seed data.
    async fn reset_customers(&self) -> Result<(), ClientError>;
}

/// Stand-in used when no usable server URL is configured; every call fails.
pub struct MissingCustomerApi {
    reason: String,
}

impl MissingCustomerApi {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> ClientError {
        ClientError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl CustomerApi for MissingCustomerApi {
    async fn list_customers(&self, _query: &ListCustomersQuery) -> Result<CustomerPage, ClientError> {
        Err(self.unavailable())
    }

    async fn create_customer(&self, _draft: &CustomerDraft) -> Result<Customer, ClientError> {
        Err(self.unavailable())
    }

    async fn update_customer(
        &self,
        _id: CustomerId,
        _draft: &CustomerDraft,
    ) -> Result<Customer, ClientError> {
        Err(self.unavailable())
    }

    async fn delete_customer(&self, _id: CustomerId) -> Result<(), ClientError> {
        Err(self.unavailable())
    }

    async fn reset_customers(&self) -> Result<(), ClientError> {
        Err(self.unavailable())
    }
}
