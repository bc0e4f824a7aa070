use client_core::{pagination::page_summary, CustomerScreen};
use shared::{domain::Customer, protocol::CustomerPage};

pub fn render_table(customers: &[Customer]) -> String {
    if customers.is_empty() {
        return "No customers found\n".to_string();
    }

    let width = |header: &str, cell: fn(&Customer) -> String| {
        customers
            .iter()
            .map(|c| cell(c).chars().count())
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0)
    };
    let id_w = width("ID", |c| c.id.to_string());
    let name_w = width("Name", |c| c.name.clone());

    let mut out = format!("{:<id_w$}  {:<name_w$}  Email\n", "ID", "Name");
    for customer in customers {
        out.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {}\n",
            customer.id.0, customer.name, customer.email
        ));
    }
    out
}

/// Table of the current page followed by the page summary line.
pub fn render_page(screen: &CustomerScreen) -> String {
    let list = screen.list();
    let mut out = render_table(list.customers());
    out.push_str(&page_summary(list.query().page, list.total_pages(), list.total()));
    out.push('\n');
    out
}

pub fn render_json(screen: &CustomerScreen) -> serde_json::Result<String> {
    let list = screen.list();
    serde_json::to_string_pretty(&CustomerPage {
        customers: list.customers().to_vec(),
        total: list.total(),
    })
}
