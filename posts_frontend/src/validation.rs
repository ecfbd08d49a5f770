use std::fmt;

use thiserror::Error;

use crate::models::PostFormData;

pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MAX_CHARS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Title,
    Body,
}

impl PostField {
    pub const ALL: [PostField; 2] = [PostField::Title, PostField::Body];

    pub fn label(&self) -> &'static str {
        match self {
            PostField::Title => "Title",
            PostField::Body => "Content",
        }
    }

    fn rules(&self) -> &'static [Rule] {
        match self {
            PostField::Title => &[Rule::Required, Rule::MaxChars(TITLE_MAX_CHARS)],
            PostField::Body => &[Rule::Required, Rule::MaxChars(BODY_MAX_CHARS)],
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostField::Title => write!(f, "title"),
            PostField::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Non-empty after trimming.
    Required,
    MaxChars(usize),
}

impl Rule {
    fn check(&self, field: PostField, trimmed: &str) -> Result<(), FieldError> {
        let message = match *self {
            Rule::Required if trimmed.is_empty() => format!("{} is required", field.label()),
            Rule::MaxChars(max) if trimmed.chars().count() > max => {
                format!("{} must be at most {max} characters", field.label())
            }
            _ => return Ok(()),
        };
        Err(FieldError { field, message })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: PostField,
    pub message: String,
}

/// Checks one field, stopping at the first failing rule.
pub fn validate_field(field: PostField, value: &str) -> Result<(), FieldError> {
    let trimmed = value.trim();
    field
        .rules()
        .iter()
        .try_for_each(|rule| rule.check(field, trimmed))
}

/// Checks the whole form; returns every field that fails.
pub fn validate(form: &PostFormData) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = PostField::ALL
        .iter()
        .filter_map(|field| {
            let value = match field {
                PostField::Title => &form.title,
                PostField::Body => &form.body,
            };
            validate_field(*field, value).err()
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
