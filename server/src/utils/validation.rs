use crate::utils::error::{AppError, FieldError};

/// Collects field errors so a request reports every bad field at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blank and at most `max_len` characters.
    pub fn required(&mut self, field: &'static str, value: &str, max_len: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(field, "is required"));
        } else {
            self.max_len(field, value, max_len);
        }
        self
    }

    pub fn optional(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        max_len: usize,
    ) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max_len);
        }
        self
    }

    pub fn check(&mut self, ok: bool, field: &'static str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(std::mem::take(&mut self.errors)))
        }
    }

    fn max_len(&mut self, field: &'static str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.errors.push(FieldError::new(
                field,
                format!("must be at most {} characters", max_len),
            ));
        }
    }
}

/// Trims and drops empty strings.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
