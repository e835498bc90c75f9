use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Field-level errors keyed by form field name. BTreeMap keeps the JSON
/// output in a stable order.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

// Permissive single-@ structural check, not full RFC validation.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

// Optional leading +, optional parenthesized groups, digits and separators.
static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\+]?[(]?[0-9]{1,4}[)]?[-\s\.]?[(]?[0-9]{1,4}[)]?[-\s\.]?[0-9]{1,9}$").unwrap()
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_REGEX.is_match(&compact)
}

/// Pitch reference URLs must be absolute http(s).
pub fn is_valid_pitch_url(raw: &str) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Validates the waitlist form. Every invalid field is reported at once so
/// the page can render all errors together; nothing here touches the store.
pub fn validate_waitlist(full_name: &str, email: &str, phone: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if full_name.trim().is_empty() {
        errors.insert("fullName", "Full name is required");
    }
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }
    // the waitlist flow only requires a non-empty phone
    if phone.trim().is_empty() {
        errors.insert("phone", "Phone number is required");
    }
    errors
}

/// Validates the pitch form, same all-at-once contract.
pub fn validate_pitch(
    name: &str,
    email: &str,
    phone: &str,
    title: &str,
    description: &str,
    url: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if name.trim().chars().count() < 2 {
        errors.insert("name", "Name must be at least 2 characters long");
    }
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }
    let phone = phone.trim();
    if phone.is_empty() {
        errors.insert("phone", "Phone number is required");
    } else if !is_valid_phone(phone) {
        errors.insert("phone", "Please enter a valid phone number");
    }
    if title.trim().chars().count() < 3 {
        errors.insert("title", "Pitch title must be at least 3 characters long");
    }
    if description.trim().chars().count() < 10 {
        errors.insert(
            "description",
            "Pitch description must be at least 10 characters long",
        );
    }
    let url = url.trim();
    if url.is_empty() {
        errors.insert("url", "Pitch URL is required");
    } else if !is_valid_pitch_url(url) {
        errors.insert(
            "url",
            "Please enter a valid URL (must start with http:// or https://)",
        );
    }
    errors
}
