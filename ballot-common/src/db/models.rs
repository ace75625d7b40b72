//! Database models and typed operation inputs

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::validate::{
    put, Fields, FieldValue, Record, CANDIDATE_REQUIRED, PARTY_ASSIGNMENT_REQUIRED,
    PARTY_REQUIRED, VOTE_REQUIRED,
};
use crate::{Error, Result};

/// Candidate row joined with its party's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub industry_connected: bool,
    pub party_id: Option<i64>,
    /// `None` when unaffiliated or when `party_id` no longer matches a party
    pub party_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One line of the vote tally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TallyRow {
    /// Candidate id
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub industry_connected: bool,
    pub party_id: Option<i64>,
    pub party_name: Option<String>,
    pub count: i64,
}

/// Result of an insert: generated id plus the echoed input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inserted<T> {
    pub id: i64,
    pub data: T,
}

/// Result of an update or delete. Zero `changes` means no row matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Changed {
    pub changes: u64,
}

impl Changed {
    pub fn matched(&self) -> bool {
        self.changes > 0
    }
}

// ============================================================================
// Operation inputs
// ============================================================================

/// Caller-supplied candidate fields, not yet validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateInput {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub industry_connected: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub party_id: Option<i64>,
}

/// Validated candidate ready for insert
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub industry_connected: bool,
    pub party_id: Option<i64>,
}

impl Fields for CandidateInput {
    const REQUIRED: &'static [&'static str] = CANDIDATE_REQUIRED;

    fn record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "first_name", self.first_name.clone());
        put(&mut record, "last_name", self.last_name.clone());
        put(&mut record, "industry_connected", self.industry_connected);
        put(&mut record, "party_id", self.party_id);
        record
    }
}

impl CandidateInput {
    pub fn into_new(self) -> Result<NewCandidate> {
        self.validate()?;
        Ok(NewCandidate {
            first_name: required(self.first_name, "first_name")?,
            last_name: required(self.last_name, "last_name")?,
            industry_connected: required(self.industry_connected, "industry_connected")?,
            party_id: self.party_id,
        })
    }
}

/// Caller-supplied party change for a candidate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyAssignment {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub party_id: Option<i64>,
}

impl Fields for PartyAssignment {
    const REQUIRED: &'static [&'static str] = PARTY_ASSIGNMENT_REQUIRED;

    fn record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "party_id", self.party_id);
        record
    }
}

impl PartyAssignment {
    pub fn into_party_id(self) -> Result<i64> {
        self.validate()?;
        required(self.party_id, "party_id")
    }
}

/// Caller-supplied party fields, not yet validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewParty {
    pub name: String,
    pub description: Option<String>,
}

impl Fields for PartyInput {
    const REQUIRED: &'static [&'static str] = PARTY_REQUIRED;

    fn record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "name", self.name.clone());
        put(&mut record, "description", self.description.clone());
        record
    }
}

impl PartyInput {
    pub fn into_new(self) -> Result<NewParty> {
        self.validate()?;
        Ok(NewParty {
            name: required(self.name, "name")?,
            description: self.description,
        })
    }
}

/// Caller-supplied ballot, not yet validated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteInput {
    #[serde(default, deserialize_with = "deserialize_identifier")]
    pub voter_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub candidate_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewVote {
    pub voter_id: String,
    pub candidate_id: i64,
}

impl Fields for VoteInput {
    const REQUIRED: &'static [&'static str] = VOTE_REQUIRED;

    fn record(&self) -> Record {
        let mut record = Record::new();
        put(&mut record, "voter_id", self.voter_id.clone());
        put(&mut record, "candidate_id", self.candidate_id);
        record
    }
}

impl VoteInput {
    pub fn new(voter_id: impl Into<String>, candidate_id: i64) -> Self {
        Self {
            voter_id: Some(voter_id.into()),
            candidate_id: Some(candidate_id),
        }
    }

    pub fn into_new(self) -> Result<NewVote> {
        self.validate()?;
        Ok(NewVote {
            voter_id: required(self.voter_id, "voter_id")?,
            candidate_id: required(self.candidate_id, "candidate_id")?,
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| Error::Validation(vec![format!("No {} specified.", name)]))
}

// ============================================================================
// Lenient field decoding
//
// Form posts deliver every value as text. Blank text decodes to `None` so the
// validator reports the field as missing rather than the decoder rejecting it.
// ============================================================================

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FieldValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FieldValue::Flag(flag)) => Ok(Some(flag)),
        Some(FieldValue::Integer(0)) => Ok(Some(false)),
        Some(FieldValue::Integer(1)) => Ok(Some(true)),
        Some(FieldValue::Text(text)) => match text.trim() {
            "" => Ok(None),
            "0" | "false" => Ok(Some(false)),
            "1" | "true" => Ok(Some(true)),
            other => Err(D::Error::custom(format!("invalid flag value: {}", other))),
        },
        Some(FieldValue::Integer(other)) => {
            Err(D::Error::custom(format!("invalid flag value: {}", other)))
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FieldValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FieldValue::Integer(id)) => Ok(Some(id)),
        Some(FieldValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(FieldValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id: {}", text))),
        Some(FieldValue::Flag(flag)) => Err(D::Error::custom(format!("invalid id: {}", flag))),
    }
}

fn deserialize_identifier<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FieldValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FieldValue::Text(text)) => Ok(Some(text)),
        Some(FieldValue::Integer(id)) => Ok(Some(id.to_string())),
        Some(FieldValue::Flag(flag)) => {
            Err(D::Error::custom(format!("invalid identifier: {}", flag)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_input_accepts_numeric_flag() {
        let input: CandidateInput = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"Byron","industry_connected":1,"party_id":"2"}"#,
        )
        .unwrap();

        let new = input.into_new().unwrap();

        assert!(new.industry_connected);
        assert_eq!(new.party_id, Some(2));
    }

    #[test]
    fn test_blank_flag_reported_as_missing() {
        let input: CandidateInput = serde_json::from_str(
            r#"{"first_name":"Ada","last_name":"","industry_connected":""}"#,
        )
        .unwrap();

        let err = input.into_new().unwrap_err();

        assert_eq!(
            err.validation_messages().unwrap(),
            &[
                "No last_name specified.".to_string(),
                "No industry_connected specified.".to_string(),
            ]
        );
    }

    #[test]
    fn test_vote_input_integer_voter_id() {
        let input: VoteInput =
            serde_json::from_str(r#"{"voter_id": 42, "candidate_id": 3}"#).unwrap();

        let vote = input.into_new().unwrap();

        assert_eq!(vote.voter_id, "42");
        assert_eq!(vote.candidate_id, 3);
    }

    #[test]
    fn test_party_assignment_missing() {
        let err = PartyAssignment::default().into_party_id().unwrap_err();

        assert!(matches!(err, Error::Validation(ref m) if m == &["No party_id specified."]));
    }

    #[test]
    fn test_invalid_flag_rejected_by_decoder() {
        let result: std::result::Result<CandidateInput, _> =
            serde_json::from_str(r#"{"industry_connected": "maybe"}"#);

        assert!(result.is_err());
    }
}
