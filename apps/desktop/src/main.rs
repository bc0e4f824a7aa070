mod output;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings, CustomerApi, CustomerScreen, FieldErrors, HttpCustomerApi, QueryState,
    ScreenRequest,
};
use shared::domain::{Customer, CustomerId, SortField, SortOrder};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "customers", about = "Manage customers through the customer API")]
struct Cli {
    /// Base URL of the customer API; overrides customers.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// tracing filter, e.g. `warn` or `client_core=debug`.
    #[arg(long, global = true)]
    log: Option<String>,
    /// Print the resulting page as JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show one page of customers.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        sort_by: Option<SortField>,
        #[arg(long)]
        ascending: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Delete {
        id: i64,
    },
    /// Replace every customer with the server's seed data.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

fn describe(errors: &FieldErrors) -> String {
    [errors.name.as_deref(), errors.email.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("; ")
}

fn submit_form(screen: &mut CustomerScreen) -> Result<ScreenRequest> {
    screen
        .save()
        .ok_or_else(|| anyhow!("{}", describe(screen.edit().errors())))
}

/// Runs one command and its follow-up refresh. The returned screen holds the
/// page to print.
async fn run(command: Command, api: &dyn CustomerApi) -> Result<CustomerScreen> {
    let mut screen = CustomerScreen::new();
    let request = match command {
        Command::List {
            search,
            sort_by,
            ascending,
            page,
        } => {
            screen = CustomerScreen::with_query(QueryState {
                search,
                sort_by,
                order: if ascending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
                page: page.max(1),
                ..QueryState::default()
            });
            screen.refresh()
        }
        Command::Add { name, email } => {
            screen.open_add_modal();
            let form = screen.edit_mut().form_mut();
            form.name = name;
            form.email = email;
            submit_form(&mut screen)?
        }
        Command::Update { id, name, email } => {
            screen.open_edit_modal(Customer {
                id: CustomerId(id),
                name,
                email,
            });
            submit_form(&mut screen)?
        }
        Command::Delete { id } => screen.delete(CustomerId(id)),
        Command::Reset { yes } => {
            if yes {
                screen.request_reset();
            }
            screen
                .confirm_reset()
                .context("refusing to reset all customers without --yes")?
        }
    };

    tracing::debug!(request = request.label(), "running command");
    screen.settle(api, request).await;
    if let Some(err) = screen.last_error() {
        bail!("{err}");
    }
    Ok(screen)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(filter) = cli.log {
        settings.log_filter = filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let api = HttpCustomerApi::new(&settings.server_url)
        .context("failed to configure customer api client")?;
    let screen = run(cli.command, &api).await?;

    if cli.json {
        println!("{}", output::render_json(&screen)?);
    } else {
        print!("{}", output::render_page(&screen));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use client_core::ClientError;
    use shared::protocol::{CustomerDraft, CustomerPage, ListCustomersQuery};
    use std::sync::Mutex;

    use super::*;

    /// Records calls and serves a fixed single-customer page.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<String>>,
        reject_deletes: bool,
    }

    impl RecordingApi {
        fn record(&self, call: String) {
            self.calls.lock().expect("calls lock").push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl CustomerApi for RecordingApi {
        async fn list_customers(
            &self,
            query: &ListCustomersQuery,
        ) -> Result<CustomerPage, ClientError> {
            self.record(format!(
                "list search={} sort={:?} desc={} page={}",
                query.search, query.sort_by, query.desc, query.page
            ));
            Ok(CustomerPage {
                customers: vec![Customer {
                    id: CustomerId(1),
                    name: "Ann".into(),
                    email: "ann@example.com".into(),
                }],
                total: 1,
            })
        }

        async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ClientError> {
            self.record(format!("create {} {}", draft.name, draft.email));
            Ok(Customer {
                id: CustomerId(2),
                name: draft.name.clone(),
                email: draft.email.clone(),
            })
        }

        async fn update_customer(
            &self,
            id: CustomerId,
            draft: &CustomerDraft,
        ) -> Result<Customer, ClientError> {
            self.record(format!("update {id} {} {}", draft.name, draft.email));
            Ok(Customer {
                id,
                name: draft.name.clone(),
                email: draft.email.clone(),
            })
        }

        async fn delete_customer(&self, id: CustomerId) -> Result<(), ClientError> {
            self.record(format!("delete {id}"));
            if self.reject_deletes {
                return Err(ClientError::api(
                    format!("DELETE /customers/{id}"),
                    404,
                    format!("customer {id} not found"),
                ));
            }
            Ok(())
        }

        async fn reset_customers(&self) -> Result<(), ClientError> {
            self.record("reset".to_string());
            Ok(())
        }
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "customers", "list", "--search", "ann", "--sort-by", "email", "--ascending",
            "--page", "3",
        ])
        .expect("parse");
        assert_eq!(
            cli.command,
            Command::List {
                search: "ann".into(),
                sort_by: Some(SortField::Email),
                ascending: true,
                page: 3,
            }
        );
        assert!(Cli::try_parse_from(["customers", "list", "--sort-by", "phone"]).is_err());
    }

    #[tokio::test]
    async fn list_requests_the_given_query() {
        let api = RecordingApi::default();
        let screen = run(
            Command::List {
                search: "ann".into(),
                sort_by: Some(SortField::Name),
                ascending: true,
                page: 2,
            },
            &api,
        )
        .await
        .expect("list");
        assert_eq!(
            api.calls(),
            vec!["list search=ann sort=Some(Name) desc=false page=2"]
        );
        assert_eq!(screen.list().total(), 1);
    }

    #[tokio::test]
    async fn add_creates_then_refreshes() {
        let api = RecordingApi::default();
        run(
            Command::Add {
                name: " Bo ".into(),
                email: "bo@example.com".into(),
            },
            &api,
        )
        .await
        .expect("add");
        assert_eq!(
            api.calls(),
            vec![
                "create Bo bo@example.com",
                "list search= sort=None desc=true page=1"
            ]
        );
    }

    #[tokio::test]
    async fn update_targets_given_id() {
        let api = RecordingApi::default();
        run(
            Command::Update {
                id: 9,
                name: "Cy".into(),
                email: "cy@example.com".into(),
            },
            &api,
        )
        .await
        .expect("update");
        assert_eq!(api.calls()[0], "update 9 Cy cy@example.com");
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_before_any_request() {
        let api = RecordingApi::default();
        let err = run(
            Command::Add {
                name: "  ".into(),
                email: String::new(),
            },
            &api,
        )
        .await
        .expect_err("must fail");
        assert_eq!(err.to_string(), "Please enter name; Please enter email");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn reset_requires_confirmation_flag() {
        let api = RecordingApi::default();
        let err = run(Command::Reset { yes: false }, &api)
            .await
            .expect_err("must refuse");
        assert!(err.to_string().contains("--yes"));
        assert!(api.calls().is_empty());

        run(Command::Reset { yes: true }, &api).await.expect("reset");
        assert_eq!(api.calls()[0], "reset");
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn failed_delete_surfaces_api_error() {
        let api = RecordingApi {
            reject_deletes: true,
            ..RecordingApi::default()
        };
        let err = run(Command::Delete { id: 4 }, &api)
            .await
            .expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "DELETE /customers/4 returned 404: customer 4 not found"
        );
        assert_eq!(api.calls(), vec!["delete 4"]);
    }
}
