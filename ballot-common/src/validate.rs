//! Required-field validation
//!
//! Every mutation builds a [`Record`] from its input and runs it through
//! [`check_required`] before touching the database. Read paths never do.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Required fields for creating a candidate
pub const CANDIDATE_REQUIRED: &[&str] = &["first_name", "last_name", "industry_connected"];

/// Required fields for changing a candidate's party
pub const PARTY_ASSIGNMENT_REQUIRED: &[&str] = &["party_id"];

/// Required fields for creating a party
pub const PARTY_REQUIRED: &[&str] = &["name"];

/// Required fields for casting a vote
pub const VOTE_REQUIRED: &[&str] = &["voter_id", "candidate_id"];

/// A primitive field value as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// A text value counts as blank when only whitespace remains after trimming
    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Flag(_) | FieldValue::Integer(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Field name to optional value. A key mapped to `None` was sent without a value.
pub type Record = HashMap<String, Option<FieldValue>>;

/// Outcome of a required-field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ok,
    /// One message per failing field, in declared order
    Errors(Vec<String>),
}

impl Validation {
    /// Convert into a `Result`, mapping failures to [`Error::Validation`]
    pub fn into_result(self) -> Result<()> {
        match self {
            Validation::Ok => Ok(()),
            Validation::Errors(messages) => Err(Error::Validation(messages)),
        }
    }
}

/// Check that every name in `required` is present with a non-blank value
pub fn check_required(record: &Record, required: &[&str]) -> Validation {
    let errors: Vec<String> = required
        .iter()
        .filter(|name| match record.get(**name) {
            Some(Some(value)) => value.is_blank(),
            Some(None) | None => true,
        })
        .map(|name| format!("No {} specified.", name))
        .collect();

    if errors.is_empty() {
        Validation::Ok
    } else {
        Validation::Errors(errors)
    }
}

/// Types that can present themselves as a [`Record`] for validation
pub trait Fields {
    /// Field names this input must carry
    const REQUIRED: &'static [&'static str];

    fn record(&self) -> Record;

    fn validate(&self) -> Result<()> {
        check_required(&self.record(), Self::REQUIRED).into_result()
    }
}

/// Insert an optional typed value into a record under `name`
pub(crate) fn put<T: Into<FieldValue>>(record: &mut Record, name: &str, value: Option<T>) {
    record.insert(name.to_string(), value.map(Into::into));
}
