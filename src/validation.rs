//! Field rules for the add and edit forms.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AdminError, Result};
use crate::types::{NewUser, User};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// The four fields both forms edit.
#[derive(Debug, Clone, Copy)]
pub struct UserForm<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

impl<'a> From<&'a NewUser> for UserForm<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            phone: &user.phone,
        }
    }
}

impl<'a> From<&'a User> for UserForm<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            phone: &user.phone,
        }
    }
}

/// Every rule violation, in field order.
pub fn validate(form: UserForm<'_>) -> Vec<String> {
    let mut messages = Vec::new();

    check_min_len(&mut messages, "First Name", form.first_name, 4);
    check_min_len(&mut messages, "Last Name", form.last_name, 4);

    let email = form.email.trim();
    if email.is_empty() {
        messages.push("Email is required".to_string());
    } else if !EMAIL_RE.is_match(email) {
        messages.push("Invalid email".to_string());
    }

    check_min_len(&mut messages, "Phone", form.phone, 4);

    messages
}

pub fn ensure_valid(form: UserForm<'_>) -> Result<()> {
    let messages = validate(form);
    if messages.is_empty() {
        Ok(())
    } else {
        Err(AdminError::InvalidForm { messages })
    }
}

fn check_min_len(messages: &mut Vec<String>, label: &str, value: &str, min: usize) {
    let value = value.trim();
    if value.is_empty() {
        messages.push(format!("{label} is required"));
    } else if value.chars().count() < min {
        messages.push(format!("{label} must be at least {min} characters"));
    }
}
