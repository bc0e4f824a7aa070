//! reqwest-backed implementation of [`CustomerApi`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Customer, CustomerId},
    error::ApiError,
    protocol::{CustomerDraft, CustomerPage, ListCustomersQuery},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::ClientError, CustomerApi};

pub struct HttpCustomerApi {
    http: Client,
    server_url: String,
}

impl HttpCustomerApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            server_url: normalize_server_url(server_url)?,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.server_url)
    }
}

/// Validates `raw` as an http(s) URL and strips trailing slashes so paths can
/// be appended with a single `/`.
pub fn normalize_server_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|err| ClientError::InvalidServerUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidServerUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn check_status(endpoint: &str, res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => (Some(api_error.code), api_error.message),
        Err(_) if !body.trim().is_empty() => (None, body.trim().to_string()),
        Err(_) => (
            None,
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        ),
    };
    warn!(endpoint, status = status.as_u16(), "customer api error: {message}");
    Err(ClientError::Api {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        code,
        message,
    })
}

async fn decode_json<T: DeserializeOwned>(endpoint: &str, res: Response) -> Result<T, ClientError> {
    res.json::<T>().await.map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn transport_error(endpoint: &str) -> impl FnOnce(reqwest::Error) -> ClientError + '_ {
    move |source| ClientError::Transport {
        endpoint: endpoint.to_string(),
        source,
    }
}

#[async_trait]
impl CustomerApi for HttpCustomerApi {
    async fn list_customers(&self, query: &ListCustomersQuery) -> Result<CustomerPage, ClientError> {
        let endpoint = "GET /customers";
        debug!(
            search = %query.search,
            sort_by = ?query.sort_by,
            desc = query.desc,
            page = query.page,
            page_size = query.page_size,
            "listing customers"
        );
        let res = self
            .http
            .get(self.url("customers"))
            .query(query)
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        let res = check_status(endpoint, res).await?;
        decode_json(endpoint, res).await
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        let endpoint = "POST /customers";
        let res = self
            .http
            .post(self.url("customers"))
            .json(draft)
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        let res = check_status(endpoint, res).await?;
        let created: Customer = decode_json(endpoint, res).await?;
        debug!(customer_id = %created.id, "created customer");
        Ok(created)
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, ClientError> {
        let endpoint = format!("PUT /customers/{id}");
        let res = self
            .http
            .put(self.url(&format!("customers/{id}")))
            .json(draft)
            .send()
            .await
            .map_err(transport_error(&endpoint))?;
        let res = check_status(&endpoint, res).await?;
        let updated: Customer = decode_json(&endpoint, res).await?;
        debug!(customer_id = %updated.id, "updated customer");
        Ok(updated)
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), ClientError> {
        let endpoint = format!("DELETE /customers/{id}");
        let res = self
            .http
            .delete(self.url(&format!("customers/{id}")))
            .send()
            .await
            .map_err(transport_error(&endpoint))?;
        check_status(&endpoint, res).await?;
        debug!(customer_id = %id, "deleted customer");
        Ok(())
    }

    async fn reset_customers(&self) -> Result<(), ClientError> {
        let endpoint = "POST /customers/reset";
        let res = self
            .http
            .post(self.url("customers/reset"))
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        check_status(endpoint, res).await?;
        debug!("customer dataset reset to seed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
