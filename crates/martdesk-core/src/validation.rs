//! Client-side form checks. A failing form never reaches the network.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::EmployeeForm;

/// Some non-space text, `@`, more text, a dot, more text. Unanchored.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email regex"));

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Loose email shape check.
pub fn looks_like_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

pub fn validate_employee(form: &EmployeeForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if form.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if form.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !looks_like_email(&form.email) {
        errors.add("email", "Email is invalid");
    }
    if form.phone.trim().is_empty() {
        errors.add("phone", "Phone is required");
    }
    errors.into_result()
}

/// Parse and check a stock adjustment against the product's current stock.
/// Returns the parsed amount.
pub fn validate_adjustment(input: &str, current_stock: i64) -> Result<f64, FieldErrors> {
    let mut errors = FieldErrors::new();
    let amount = match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => {
            errors.add("adjustment", "Please enter a valid non-zero adjustment amount");
            return Err(errors);
        }
    };

    if current_stock as f64 + amount < 0.0 {
        errors.add(
            "adjustment",
            format!(
                "Adjustment would result in negative stock. Current stock: {}",
                current_stock
            ),
        );
        return Err(errors);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("a@b.com"));
        assert!(looks_like_email("first.last@shop.example.org"));
        assert!(looks_like_email("x@y@z.io"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.com"));
        assert!(!looks_like_email("a@.com"));
        assert!(!looks_like_email("a@b."));
        assert!(!looks_like_email("plainaddress"));
    }

    #[test]
    fn test_validate_employee_collects_all_fields() {
        let errors = validate_employee(&EmployeeForm::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone is required"));
    }

    #[test]
    fn test_validate_employee_bad_email() {
        let form = EmployeeForm {
            name: "Rosa".to_string(),
            email: "rosa-at-shop".to_string(),
            phone: "555-0100".to_string(),
            role: Role::Employee,
            department: String::new(),
        };
        let errors = validate_employee(&form).unwrap_err();
        assert_eq!(errors.to_string(), "Email is invalid");
    }

    #[test]
    fn test_validate_adjustment() {
        assert_eq!(validate_adjustment("5", 0).unwrap(), 5.0);
        assert_eq!(validate_adjustment(" -3 ", 3).unwrap(), -3.0);
        assert!(validate_adjustment("0", 10).is_err());
        assert!(validate_adjustment("abc", 10).is_err());

        let errors = validate_adjustment("-11", 10).unwrap_err();
        assert_eq!(
            errors.get("adjustment"),
            Some("Adjustment would result in negative stock. Current stock: 10")
        );
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("a@b.com", "pw").is_ok());
        let errors = validate_login("  ", "").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
