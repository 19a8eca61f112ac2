//! Ticket delivery by email: recipient validation and `mailto:` composition.

use crate::common::PanelError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

/// Characters `encodeURIComponent` leaves alone; mail clients expect this set
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Loose `local@domain.tld` check. Surrounding whitespace is ignored.
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && EMAIL_SHAPE.is_match(value)
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, URI_COMPONENT).to_string()
}

/// Build the `mailto:` URI carrying the ticket verbatim in the body.
pub fn compose_mailto(recipient: &str, ticket: &str, app_name: &str) -> String {
    let subject = format!("{app_name} ticket");
    let body = format!("Here is my {app_name} ticket:\n\n{ticket}\n");

    format!(
        "mailto:{}?subject={}&body={}",
        encode(recipient.trim()),
        encode(&subject),
        encode(&body)
    )
}

/// State of the "send ticket by email" dialog
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmailDialog {
    open: bool,
    recipient: String,
    error: Option<String>,
}

impl EmailDialog {
    pub fn open(&mut self) {
        self.error = None;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Inline validation message, if the last submit was rejected
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Editing the address clears a pending validation message
    pub fn set_recipient(&mut self, value: impl Into<String>) {
        self.recipient = value.into();
        self.error = None;
    }

    /// Validate the recipient and build the URI to hand off.
    ///
    /// An invalid address sets the inline error and keeps the dialog open.
    pub fn submit(&mut self, ticket: &str, app_name: &str) -> Result<String, PanelError> {
        let recipient = self.recipient.trim();
        if !is_valid_email(recipient) {
            self.error = Some(PanelError::InvalidRecipient.to_string());
            return Err(PanelError::InvalidRecipient);
        }

        Ok(compose_mailto(recipient, ticket, app_name))
    }
}
