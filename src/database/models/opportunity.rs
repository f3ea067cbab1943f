use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{optional_text, overlay_optional, overlay_text, required_text, Document, Meta, UserSummary};
use crate::error::ApiError;
use crate::types::RecordId;

pub const DEFAULT_LOCATION: &str = "Remote";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpportunityKind {
    Job,
    Internship,
    Freelance,
    Hackathon,
}

impl FromStr for OpportunityKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Job" => Ok(OpportunityKind::Job),
            "Internship" => Ok(OpportunityKind::Internship),
            "Freelance" => Ok(OpportunityKind::Freelance),
            "Hackathon" => Ok(OpportunityKind::Hackathon),
            other => Err(ApiError::field_error(
                "type",
                format!(
                    "`{}` is not a valid type (expected Job, Internship, Freelance or Hackathon)",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(flatten)]
    pub meta: Meta,
    pub poster: RecordId,
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub location: String,
}

impl Opportunity {
    pub fn from_input(input: OpportunityInput, poster: RecordId) -> Result<Self, ApiError> {
        let kind = required_text("type", input.kind)?.parse::<OpportunityKind>()?;
        Ok(Self {
            meta: Meta::new(),
            poster,
            title: required_text("title", input.title)?,
            company: required_text("company", input.company)?,
            kind,
            description: required_text("description", input.description)?,
            link: optional_text(input.link),
            location: optional_text(input.location).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        })
    }

    pub fn apply(&mut self, input: OpportunityInput) -> Result<(), ApiError> {
        let kind = optional_text(input.kind).map(|k| k.parse::<OpportunityKind>()).transpose()?;
        overlay_text(&mut self.title, input.title);
        overlay_text(&mut self.company, input.company);
        overlay_text(&mut self.description, input.description);
        overlay_optional(&mut self.link, input.link);
        overlay_text(&mut self.location, input.location);
        if let Some(kind) = kind {
            self.kind = kind;
        }
        Ok(())
    }
}

impl Document for Opportunity {
    const COLLECTION: &'static str = "opportunities";
    const LABEL: &'static str = "opportunity";
    const TITLE: &'static str = "Opportunity";

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityInput {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityView {
    pub id: RecordId,
    pub poster: Option<UserSummary>,
    pub title: String,
    pub company: String,
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub description: String,
    pub link: Option<String>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: &str) -> OpportunityInput {
        OpportunityInput {
            title: Some("Rust engineer".into()),
            company: Some("Ferrous".into()),
            kind: Some(kind.into()),
            description: Some("Write Rust".into()),
            ..Default::default()
        }
    }

    #[test]
    fn location_defaults_to_remote() {
        let opp = Opportunity::from_input(input("Job"), RecordId::new()).unwrap();
        assert_eq!(opp.location, DEFAULT_LOCATION);
        assert_eq!(opp.kind, OpportunityKind::Job);
    }

    #[test]
    fn unknown_type_is_a_validation_error() {
        let err = Opportunity::from_input(input("Volunteer"), RecordId::new()).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors, .. } => {
                assert!(field_errors.unwrap().contains_key("type"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn type_is_the_wire_name() {
        let opp = Opportunity::from_input(input("Hackathon"), RecordId::new()).unwrap();
        let value = serde_json::to_value(&opp).unwrap();
        assert_eq!(value["type"], "Hackathon");
    }
}
