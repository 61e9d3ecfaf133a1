//! Validation errors as delivered by the server for display

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An error attached to one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationError {
    Struct(StructBlockValidationError),
    List(ListBlockValidationError),
    Field(FieldValidationError),
}

/// Errors of a struct block, keyed by child name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructBlockValidationError {
    #[serde(rename = "blockErrors")]
    pub block_errors: IndexMap<String, Vec<ValidationError>>,
}

/// Errors of a list block, one optional entry per item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlockValidationError {
    #[serde(rename = "blockErrors")]
    pub block_errors: Vec<Option<Vec<ValidationError>>>,
}

/// Plain error messages for a leaf field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn message(message: &str) -> Self {
        ValidationError::Field(FieldValidationError {
            messages: vec![message.to_string()],
        })
    }

    /// Struct error with the given per-child errors
    pub fn for_struct<I, S>(block_errors: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<ValidationError>)>,
        S: Into<String>,
    {
        ValidationError::Struct(StructBlockValidationError {
            block_errors: block_errors
                .into_iter()
                .map(|(name, errors)| (name.into(), errors))
                .collect(),
        })
    }

    /// Messages that a leaf field can show directly
    pub fn messages(&self) -> &[String] {
        match self {
            ValidationError::Field(field) => &field.messages,
            ValidationError::Struct(_) | ValidationError::List(_) => &[],
        }
    }
}
