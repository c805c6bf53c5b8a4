// src/contact.rs
//! Field-presence validation for the contact form. Nothing is sent anywhere;
//! the outcome is the toast the page shows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: &'static str,
    pub description: &'static str,
}

pub const MISSING_FIELDS: Toast = Toast {
    title: "Missing fields",
    description: "Please fill in your name, email, and message.",
};

pub const MESSAGE_SENT: Toast = Toast {
    title: "Message sent",
    description: "Thanks for reaching out — I’ll reply within 24 hours.",
};

/// Raw form input, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// A form whose fields are all present, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContactError {
    #[error("missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl ContactError {
    pub fn toast(&self) -> Toast {
        match self {
            ContactError::MissingFields(_) => MISSING_FIELDS,
        }
    }
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactSubmission, ContactError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        let missing: Vec<&'static str> = [("name", name), ("email", email), ("message", message)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(ContactError::MissingFields(missing));
        }

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    /// Validate and pick the toast to show.
    pub fn submit(&self) -> Toast {
        match self.validate() {
            Ok(_) => MESSAGE_SENT,
            Err(e) => e.toast(),
        }
    }
}
