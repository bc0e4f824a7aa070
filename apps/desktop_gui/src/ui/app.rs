use client_core::{
    screen::RESET_PROMPT, ClientError, CustomerScreen, ScreenCompletion, ScreenIntent,
    ScreenRequest,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{SortField, SortOrder};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::widgets::{field_with_action, labeled_field, page_strip};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
}

const BANNER_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);
const BANNER_STROKE: egui::Color32 = egui::Color32::from_rgb(175, 96, 96);

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn context_label(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "Startup",
        UiErrorContext::List => "Loading customers",
        UiErrorContext::Save => "Saving customer",
        UiErrorContext::Delete => "Deleting customer",
        UiErrorContext::Reset => "Resetting data",
    }
}

pub struct CustomersApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    screen: CustomerScreen,
    search_input: String,
    server_url: String,
    server_url_draft: String,
    settings_open: bool,
    status: String,
    status_banner: Option<String>,
}

impl CustomersApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            screen: CustomerScreen::new(),
            search_input: String::new(),
            server_url_draft: startup.server_url.clone(),
            server_url: startup.server_url,
            settings_open: false,
            status: "Loading customers...".to_string(),
            status_banner: None,
        };
        app.submit(ScreenIntent::Refresh);
        app
    }

    fn submit(&mut self, intent: ScreenIntent) {
        if matches!(intent, ScreenIntent::DismissError) {
            self.status_banner = None;
        }
        if let Some(request) = self.screen.handle(intent) {
            self.dispatch(request);
        }
    }

    fn dispatch(&mut self, request: ScreenRequest) {
        let cmd = BackendCommand::Execute(request);
        if let Err(BackendCommand::Execute(request)) =
            dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status)
        {
            // Settle the request locally so loading and error state stay consistent.
            let err = ClientError::Unavailable(self.status.clone());
            self.on_completed(ScreenCompletion::failed(request, err));
        }
    }

    fn on_completed(&mut self, completion: ScreenCompletion) {
        // Superseded list responses are dropped by the screen, errors included.
        let superseded = matches!(
            &completion,
            ScreenCompletion::Listed { seq, .. } if !self.screen.list().is_latest(*seq)
        );
        if !superseded {
            if let Some(err) = UiError::from_completion(&completion) {
                self.show_error(&err);
            }
        }
        if let Some(follow_up) = self.screen.complete(completion) {
            self.dispatch(follow_up);
        } else if self.status_banner.is_none() && !self.screen.list().is_loading() {
            let list = self.screen.list();
            self.status = format!("Showing {} of {} customers", list.customers().len(), list.total());
        }
    }

    fn show_error(&mut self, err: &UiError) {
        self.status = format!(
            "{} failed ({} error): {}",
            context_label(err.context()),
            err_label(err.category()),
            err.message()
        );
        // Save failures are shown inside the dialog while it stays open.
        if err.context() == UiErrorContext::Save && self.screen.edit().is_open() {
            return;
        }
        self.status_banner = Some(self.status.clone());
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Connected { server_url } => {
                    self.status = format!("Connected to {server_url}");
                    self.server_url = server_url;
                }
                UiEvent::Completed(completion) => self.on_completed(completion),
                UiEvent::Error(err) => self.show_error(&err),
            }
        }
    }

    fn reconnect(&mut self) {
        let server_url = self.server_url_draft.trim().to_string();
        if server_url.is_empty() {
            self.status_banner = Some("Please enter a server URL.".to_string());
            return;
        }
        if dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Reconnect { server_url },
            &mut self.status,
        )
        .is_ok()
        {
            self.settings_open = false;
            self.submit(ScreenIntent::Refresh);
        }
    }

    /// The search text is sent as typed.
    fn search_intent(&self) -> ScreenIntent {
        ScreenIntent::Search(self.search_input.clone())
    }

    fn show_toolbar(&mut self, ctx: &egui::Context, intents: &mut Vec<ScreenIntent>) {
        egui::TopBottomPanel::top("customers_toolbar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Customers");
                ui.separator();

                if field_with_action(
                    ui,
                    "customer_search",
                    &mut self.search_input,
                    "Search by name or email",
                    220.0,
                    "Search",
                ) {
                    intents.push(self.search_intent());
                }

                let query = self.screen.list().query();
                let mut sort_by = query.sort_by;
                egui::ComboBox::from_id_salt("customer_sort_by")
                    .selected_text(sort_by.map_or("Sort by", SortField::label))
                    .show_ui(ui, |ui| {
                        for field in SortField::ALL {
                            ui.selectable_value(&mut sort_by, Some(field), field.label());
                        }
                    });
                if let Some(field) = sort_by.filter(|field| Some(*field) != query.sort_by) {
                    intents.push(ScreenIntent::SortBy(field));
                }

                let mut order = query.order;
                egui::ComboBox::from_id_salt("customer_sort_order")
                    .selected_text(order.label())
                    .show_ui(ui, |ui| {
                        for option in SortOrder::ALL {
                            ui.selectable_value(&mut order, option, option.label());
                        }
                    });
                if order != query.order {
                    intents.push(ScreenIntent::SortOrder(order));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Server").clicked() {
                        self.server_url_draft = self.server_url.clone();
                        self.settings_open = true;
                    }
                    if ui.button("Reset Data").clicked() {
                        intents.push(ScreenIntent::RequestReset);
                    }
                    if ui.button("Add Customer").clicked() {
                        intents.push(ScreenIntent::OpenAdd);
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_footer(&self, ctx: &egui::Context, intents: &mut Vec<ScreenIntent>) {
        egui::TopBottomPanel::bottom("customers_footer").show(ctx, |ui| {
            ui.add_space(4.0);
            let list = self.screen.list();
            let page = list.query().page;
            ui.horizontal(|ui| {
                if let Some(picked) = page_strip(ui, page, list.total_pages()) {
                    intents.push(ScreenIntent::Page(picked));
                }
                ui.separator();
                ui.label(client_core::pagination::page_summary(
                    page,
                    list.total_pages(),
                    list.total(),
                ));
            });
            ui.horizontal(|ui| {
                if list.is_loading() {
                    ui.spinner();
                }
                ui.small(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(&self.server_url);
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_banner(&self, ui: &mut egui::Ui, intents: &mut Vec<ScreenIntent>) {
        let Some(banner) = &self.status_banner else {
            return;
        };
        egui::Frame::NONE
            .fill(BANNER_FILL)
            .stroke(egui::Stroke::new(1.0, BANNER_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(banner).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            intents.push(ScreenIntent::DismissError);
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_table(&self, ui: &mut egui::Ui, intents: &mut Vec<ScreenIntent>) {
        let customers = self.screen.list().customers();
        if customers.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.weak(if self.screen.list().is_loading() {
                    "Loading customers..."
                } else {
                    "No customers found"
                });
            });
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("customers_table_scroll")
            .show(ui, |ui| {
                egui::Grid::new("customers_table")
                    .striped(true)
                    .num_columns(4)
                    .min_col_width(60.0)
                    .spacing([24.0, 8.0])
                    .show(ui, |ui| {
                        for header in ["ID", "Name", "Email", "Actions"] {
                            ui.label(egui::RichText::new(header).strong());
                        }
                        ui.end_row();

                        for customer in customers {
                            ui.label(customer.id.to_string());
                            ui.label(&customer.name);
                            ui.label(&customer.email);
                            ui.horizontal(|ui| {
                                if ui.small_button("Edit").clicked() {
                                    intents.push(ScreenIntent::OpenEdit(customer.clone()));
                                }
                                if ui.small_button("Delete").clicked() {
                                    intents.push(ScreenIntent::Delete(customer.id));
                                }
                            });
                            ui.end_row();
                        }
                    });
            });
    }

    fn show_customer_dialog(&mut self, ctx: &egui::Context, intents: &mut Vec<ScreenIntent>) {
        if !self.screen.edit().is_open() {
            return;
        }
        let title = self.screen.edit().title();
        let errors = self.screen.edit().errors().clone();
        let save_error = self.screen.edit().save_error().map(str::to_string);
        let form = self.screen.edit_mut().form_mut();

        let mut open = true;
        egui::Window::new(title)
            .id(egui::Id::new("customer_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .open(&mut open)
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                labeled_field(ui, "customer_name", "Name", &mut form.name, errors.name.as_deref());
                ui.add_space(6.0);
                labeled_field(
                    ui,
                    "customer_email",
                    "Email",
                    &mut form.email,
                    errors.email.as_deref(),
                );
                if let Some(save_error) = &save_error {
                    ui.add_space(6.0);
                    ui.colored_label(ui.visuals().error_fg_color, save_error);
                }
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        intents.push(ScreenIntent::Save);
                    }
                    if ui.button("Cancel").clicked() {
                        intents.push(ScreenIntent::CloseModal);
                    }
                });
            });
        if !open {
            intents.push(ScreenIntent::CloseModal);
        }
    }

    fn show_reset_confirmation(&self, ctx: &egui::Context, intents: &mut Vec<ScreenIntent>) {
        if !self.screen.is_confirming_reset() {
            return;
        }
        egui::Window::new("Reset data")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(RESET_PROMPT);
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        intents.push(ScreenIntent::ConfirmReset);
                    }
                    if ui.button("Cancel").clicked() {
                        intents.push(ScreenIntent::CancelReset);
                    }
                });
            });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }
        let mut settings_open = self.settings_open;
        let mut reconnect = false;
        egui::Window::new("Server")
            .collapsible(false)
            .resizable(false)
            .open(&mut settings_open)
            .show(ctx, |ui| {
                ui.label("Customer API base URL");
                ui.horizontal(|ui| {
                    reconnect = field_with_action(
                        ui,
                        "server_url",
                        &mut self.server_url_draft,
                        "http://127.0.0.1:8080",
                        280.0,
                        "Reconnect",
                    );
                });
            });
        self.settings_open = settings_open;
        if reconnect {
            self.reconnect();
        }
    }
}

impl eframe::App for CustomersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut intents = Vec::new();
        self.show_toolbar(ctx, &mut intents);
        self.show_footer(ctx, &mut intents);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui, &mut intents);
            self.show_table(ui, &mut intents);
        });
        self.show_customer_dialog(ctx, &mut intents);
        self.show_reset_confirmation(ctx, &mut intents);
        self.show_settings_window(ctx);

        for intent in intents {
            self.submit(intent);
        }

        if self.screen.list().is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
