use async_trait::async_trait;
use shared::{
    error::ErrorCode,
    protocol::{CustomerDraft, ListCustomersQuery},
};
use tokio::sync::Mutex;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List(ListCustomersQuery),
    Create(CustomerDraft),
    Update(CustomerId, CustomerDraft),
    Delete(CustomerId),
    Reset,
}

fn seed() -> Vec<Customer> {
    (1..=23)
        .map(|id| Customer {
            id: CustomerId(id),
            name: format!("Customer {id:02}"),
            email: format!("customer{id:02}@example.com"),
        })
        .collect()
}

/// In-memory customer API that records every call it receives.
struct FakeCustomerApi {
    customers: Mutex<Vec<Customer>>,
    calls: Mutex<Vec<Call>>,
    fail_mutations: bool,
}

impl FakeCustomerApi {
    fn seeded() -> Self {
        Self {
            customers: Mutex::new(seed()),
            calls: Mutex::new(Vec::new()),
            fail_mutations: false,
        }
    }

    fn failing_mutations() -> Self {
        Self {
            fail_mutations: true,
            ..Self::seeded()
        }
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    fn rejected(&self, endpoint: &str) -> Result<(), ClientError> {
        if self.fail_mutations {
            return Err(ClientError::Api {
                endpoint: endpoint.to_string(),
                status: 500,
                code: Some(ErrorCode::Internal),
                message: "database offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerApi for FakeCustomerApi {
    async fn list_customers(&self, query: &ListCustomersQuery) -> Result<CustomerPage, ClientError> {
        self.calls.lock().await.push(Call::List(query.clone()));
        let needle = query.search.to_lowercase();
        let mut matched: Vec<Customer> = self
            .customers
            .lock()
            .await
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        match query.sort_by {
            Some(SortField::Name) => matched.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(SortField::Email) => matched.sort_by(|a, b| a.email.cmp(&b.email)),
            None => matched.sort_by_key(|c| c.id),
        }
        if query.desc {
            matched.reverse();
        }
        let total = matched.len() as u64;
        let skip = ((query.page.max(1) - 1) * query.page_size) as usize;
        let customers = matched
            .into_iter()
            .skip(skip)
            .take(query.page_size as usize)
            .collect();
        Ok(CustomerPage { customers, total })
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
        self.calls.lock().await.push(Call::Create(draft.clone()));
        self.rejected("POST /customers")?;
        let mut customers = self.customers.lock().await;
        let next = customers.iter().map(|c| c.id.0).max().unwrap_or(0) + 1;
        let created = Customer {
            id: CustomerId(next),
            name: draft.name.clone(),
            email: draft.email.clone(),
        };
        customers.push(created.clone());
        Ok(created)
    }

    async fn update_customer(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, ClientError> {
        self.calls.lock().await.push(Call::Update(id, draft.clone()));
        self.rejected(&format!("PUT /customers/{id}"))?;
        let mut customers = self.customers.lock().await;
        let Some(customer) = customers.iter_mut().find(|c| c.id == id) else {
            return Err(ClientError::api(format!("PUT /customers/{id}"), 404, "not found"));
        };
        customer.name = draft.name.clone();
        customer.email = draft.email.clone();
        Ok(customer.clone())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), ClientError> {
        self.calls.lock().await.push(Call::Delete(id));
        self.rejected(&format!("DELETE /customers/{id}"))?;
        self.customers.lock().await.retain(|c| c.id != id);
        Ok(())
    }

    async fn reset_customers(&self) -> Result<(), ClientError> {
        self.calls.lock().await.push(Call::Reset);
        self.rejected("POST /customers/reset")?;
        *self.customers.lock().await = seed();
        Ok(())
    }
}

async fn loaded_screen(api: &FakeCustomerApi) -> CustomerScreen {
    let mut screen = CustomerScreen::new();
    let request = screen.refresh();
    screen.settle(api, request).await;
    api.clear_calls().await;
    screen
}

fn ids(screen: &CustomerScreen) -> Vec<i64> {
    screen.list().customers().iter().map(|c| c.id.0).collect()
}

#[tokio::test]
async fn refresh_requests_current_tuple_and_replaces_records() {
    let api = FakeCustomerApi::seeded();
    let mut screen = CustomerScreen::new();

    let request = screen.refresh();
    screen.settle(&api, request).await;

    assert_eq!(api.calls().await, vec![Call::List(ListCustomersQuery::default())]);
    assert_eq!(screen.list().customers().len(), 10);
    assert_eq!(screen.list().total(), 23);
    assert_eq!(ids(&screen)[0], 23);
}

#[tokio::test]
async fn refreshing_twice_shows_identical_results() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    let before = screen.list().customers().to_vec();

    let request = screen.refresh();
    screen.settle(&api, request).await;

    assert_eq!(screen.list().customers(), before.as_slice());
    assert_eq!(screen.list().total(), 23);
}

#[tokio::test]
async fn third_page_of_twenty_three_shows_three_records() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    assert_eq!(screen.list().customers().len(), 10);

    let request = screen.set_page(3).expect("page changed");
    screen.settle(&api, request).await;

    let calls = api.calls().await;
    assert!(matches!(&calls[..], [Call::List(q)] if q.page == 3));
    assert_eq!(screen.list().customers().len(), 3);
    assert_eq!(screen.list().total(), 23);
    assert_eq!(screen.list().total_pages(), 3);
}

#[tokio::test]
async fn add_then_save_creates_and_refreshes() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;

    screen.handle(ScreenIntent::OpenAdd);
    let form = screen.edit_mut().form_mut();
    form.name = "Dana".to_string();
    form.email = "dana@example.com".to_string();
    let request = screen.handle(ScreenIntent::Save).expect("save request");
    screen.settle(&api, request).await;

    let calls = api.calls().await;
    assert_eq!(
        calls,
        vec![
            Call::Create(CustomerDraft {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
            }),
            Call::List(ListCustomersQuery::default()),
        ]
    );
    assert!(!calls.iter().any(|c| matches!(c, Call::Update(..))));
    assert!(!screen.edit().is_open());
    assert_eq!(screen.list().total(), 24);
    assert_eq!(ids(&screen)[0], 24);
}

#[tokio::test]
async fn edit_then_save_updates_target_with_modified_fields() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    let target = screen.list().customers()[2].clone();

    screen.open_edit_modal(target.clone());
    screen.edit_mut().form_mut().email = "renamed@example.com".to_string();
    let request = screen.save().expect("save request");
    screen.settle(&api, request).await;

    let calls = api.calls().await;
    assert_eq!(
        calls[0],
        Call::Update(
            target.id,
            CustomerDraft {
                name: target.name.clone(),
                email: "renamed@example.com".to_string(),
            }
        )
    );
    assert!(matches!(calls[1], Call::List(_)));
    let shown = screen
        .list()
        .customers()
        .iter()
        .find(|c| c.id == target.id)
        .expect("still listed");
    assert_eq!(shown.email, "renamed@example.com");
}

#[tokio::test]
async fn saving_blank_fields_issues_nothing_and_keeps_dialog_open() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;

    screen.open_add_modal();
    screen.edit_mut().form_mut().email = "only@example.com".to_string();
    assert_eq!(screen.save(), None);

    let first = screen.list().customers()[0].clone();
    screen.open_edit_modal(first);
    screen.edit_mut().form_mut().email = "  ".to_string();
    assert_eq!(screen.save(), None);

    assert!(screen.edit().is_open());
    assert_eq!(
        screen.edit().errors().email.as_deref(),
        Some("Please enter email")
    );
    assert!(api.calls().await.is_empty());
}

#[tokio::test]
async fn delete_refreshes_with_unchanged_query() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    screen.set_sort_by(SortField::Name);
    screen.set_sort_direction(false);
    let request = screen.set_search("customer").expect("search changed");
    screen.settle(&api, request).await;
    api.clear_calls().await;
    let query = screen.list().query().to_request();

    let request = screen.handle(ScreenIntent::Delete(CustomerId(5))).expect("delete");
    screen.settle(&api, request).await;

    assert_eq!(
        api.calls().await,
        vec![Call::Delete(CustomerId(5)), Call::List(query)]
    );
    assert_eq!(screen.list().total(), 22);
    assert!(!ids(&screen).contains(&5));
}

#[tokio::test]
async fn confirmed_reset_refreshes_with_current_search() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    let request = screen.set_search("customer1").expect("search changed");
    screen.settle(&api, request).await;
    let request = screen.delete(CustomerId(11));
    screen.settle(&api, request).await;
    api.clear_calls().await;

    screen.handle(ScreenIntent::RequestReset);
    assert!(screen.is_confirming_reset());
    let request = screen.handle(ScreenIntent::ConfirmReset).expect("reset");
    screen.settle(&api, request).await;

    let calls = api.calls().await;
    assert_eq!(calls[0], Call::Reset);
    assert!(matches!(&calls[1], Call::List(q) if q.search == "customer1"));
    assert_eq!(calls.len(), 2);
    assert!(!screen.is_confirming_reset());
    assert!(ids(&screen).contains(&11));
}

#[test]
fn reset_without_confirmation_issues_nothing() {
    let mut screen = CustomerScreen::new();
    assert_eq!(screen.handle(ScreenIntent::ConfirmReset), None);

    screen.request_reset();
    screen.cancel_reset();
    assert_eq!(screen.confirm_reset(), None);
    assert!(!screen.is_confirming_reset());
}

#[tokio::test]
async fn failed_mutation_records_error_without_refresh() {
    let api = FakeCustomerApi::failing_mutations();
    let mut screen = loaded_screen(&api).await;

    let request = screen.delete(CustomerId(3));
    screen.settle(&api, request).await;
    assert_eq!(api.calls().await, vec![Call::Delete(CustomerId(3))]);
    assert_eq!(
        screen.last_error(),
        Some("DELETE /customers/3 returned 500: database offline")
    );

    screen.open_add_modal();
    screen.edit_mut().form_mut().name = "Eve".to_string();
    screen.edit_mut().form_mut().email = "eve@example.com".to_string();
    let request = screen.save().expect("save request");
    screen.settle(&api, request).await;
    assert!(screen.edit().is_open());
    assert_eq!(
        screen.edit().save_error(),
        Some("POST /customers returned 500: database offline")
    );
    assert_eq!(api.calls().await.len(), 2);

    screen.handle(ScreenIntent::DismissError);
    assert_eq!(screen.last_error(), None);
}

#[tokio::test]
async fn superseded_list_response_is_discarded() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;

    let slow = screen
        .handle(ScreenIntent::SortBy(SortField::Email))
        .expect("sort changed");
    let fast = screen
        .handle(ScreenIntent::Page(2))
        .expect("page changed");

    let slow_done = execute(&api, slow).await;
    let fast_done = execute(&api, fast).await;
    assert_eq!(screen.complete(fast_done), None);
    let shown = ids(&screen);
    assert_eq!(screen.complete(slow_done), None);

    assert_eq!(ids(&screen), shown);
    assert_eq!(screen.list().query().page, 2);
}

#[test]
fn unchanged_intents_issue_no_request() {
    let mut screen = CustomerScreen::new();
    assert_eq!(screen.handle(ScreenIntent::Search(String::new())), None);
    assert_eq!(screen.handle(ScreenIntent::SortOrder(SortOrder::Descending)), None);
    assert_eq!(screen.handle(ScreenIntent::Page(1)), None);
    assert!(matches!(
        screen.handle(ScreenIntent::SortOrder(SortOrder::Ascending)),
        Some(ScreenRequest::List(request)) if !request.query.desc
    ));
}

#[tokio::test]
async fn list_failure_keeps_records_and_surfaces_error() {
    let api = FakeCustomerApi::seeded();
    let mut screen = loaded_screen(&api).await;
    let before = ids(&screen);

    let ScreenRequest::List(request) = screen.refresh() else {
        panic!("refresh must list");
    };
    screen.complete(ScreenCompletion::Listed {
        seq: request.seq,
        result: Err(ClientError::Unavailable("no server configured".into())),
    });

    assert_eq!(ids(&screen), before);
    assert_eq!(
        screen.last_error(),
        Some("customer api is unavailable: no server configured")
    );
}
