//! Edit-session controller: whether the create/edit dialog is open, which
//! customer it targets, and the form values bound to it.

use shared::{
    domain::{Customer, CustomerId},
    protocol::CustomerDraft,
};
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, message = "Please enter name"))]
    pub name: String,
    #[validate(length(min = 1, message = "Please enter email"))]
    pub email: String,
}

impl CustomerForm {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// Checks required fields and returns the request body. Whitespace-only
    /// values count as missing.
    pub fn to_draft(&self) -> Result<CustomerDraft, FieldErrors> {
        let form = self.trimmed();
        form.validate().map_err(|err| FieldErrors::from_validation(&err))?;
        Ok(CustomerDraft {
            name: form.name,
            email: form.email,
        })
    }
}

/// Inline messages shown under the form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields = Self::default();
        for (field, errs) in errors.field_errors() {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is required"));
            match &*field {
                "name" => fields.name = Some(message),
                "email" => fields.email = Some(message),
                _ => {}
            }
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Closed,
    Creating,
    Editing(Customer),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(CustomerDraft),
    Update { id: CustomerId, draft: CustomerDraft },
}

#[derive(Debug, Default)]
pub struct EditSessionController {
    open: bool,
    target: Option<Customer>,
    form: CustomerForm,
    errors: FieldErrors,
    save_error: Option<String>,
}

impl EditSessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_add_modal(&mut self) {
        self.target = None;
        self.form = CustomerForm::default();
        self.errors = FieldErrors::default();
        self.save_error = None;
        self.open = true;
    }

    pub fn open_edit_modal(&mut self, customer: Customer) {
        self.form = CustomerForm::from_customer(&customer);
        self.target = Some(customer);
        self.errors = FieldErrors::default();
        self.save_error = None;
        self.open = true;
    }

    /// Keeps the target; the next open call replaces it.
    pub fn close_modal(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> EditMode {
        match (self.open, &self.target) {
            (false, _) => EditMode::Closed,
            (true, None) => EditMode::Creating,
            (true, Some(customer)) => EditMode::Editing(customer.clone()),
        }
    }

    pub fn target(&self) -> Option<&Customer> {
        self.target.as_ref()
    }

    pub fn title(&self) -> &'static str {
        if self.target.is_some() {
            "Edit Customer"
        } else {
            "Add Customer"
        }
    }

    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CustomerForm {
        &mut self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Validates the form and picks create or update from the target. On
    /// validation failure nothing is returned and the dialog stays open.
    pub fn submit(&mut self) -> Option<SaveRequest> {
        if !self.open {
            return None;
        }
        match self.form.to_draft() {
            Ok(draft) => {
                self.errors = FieldErrors::default();
                self.save_error = None;
                Some(match &self.target {
                    Some(customer) => SaveRequest::Update {
                        id: customer.id,
                        draft,
                    },
                    None => SaveRequest::Create(draft),
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn save_succeeded(&mut self) {
        self.save_error = None;
        self.close_modal();
    }

    pub fn save_failed(&mut self, message: impl Into<String>) {
        self.save_error = Some(message.into());
    }
}
