use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, overlay_list, overlay_optional, overlay_text, required_text, Document, Meta, UserSummary};
use crate::error::ApiError;
use crate::types::RecordId;

pub const DEFAULT_RANK: &str = "Unranked";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub leader: RecordId,
    #[serde(default)]
    pub members: Vec<RecordId>,
    /// Role labels the team is recruiting for ("Frontend", "DevOps")
    #[serde(default)]
    pub looking_for: Vec<String>,
    pub rank: String,
}

impl Team {
    pub const SEARCH_FIELDS: &'static [&'static str] = &["name", "description"];

    pub fn from_input(input: TeamInput, leader: RecordId) -> Result<Self, ApiError> {
        Ok(Self {
            meta: Meta::new(),
            name: required_text("name", input.name)?,
            description: optional_text(input.description),
            leader,
            members: vec![leader],
            looking_for: input.looking_for.unwrap_or_default(),
            rank: optional_text(input.rank).unwrap_or_else(|| DEFAULT_RANK.to_string()),
        })
    }

    pub fn apply(&mut self, input: TeamInput) {
        overlay_text(&mut self.name, input.name);
        overlay_optional(&mut self.description, input.description);
        overlay_list(&mut self.looking_for, input.looking_for);
        overlay_text(&mut self.rank, input.rank);
    }
}

impl Document for Team {
    const COLLECTION: &'static str = "teams";
    const LABEL: &'static str = "team";
    const TITLE: &'static str = "Team";

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub looking_for: Option<Vec<String>>,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub leader: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub looking_for: Vec<String>,
    pub rank: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_joins_and_rank_defaults() {
        let leader = RecordId::new();
        let team = Team::from_input(
            TeamInput { name: Some("Rustaceans".into()), ..Default::default() },
            leader,
        )
        .unwrap();
        assert_eq!(team.members, vec![leader]);
        assert_eq!(team.rank, DEFAULT_RANK);
        assert!(team.looking_for.is_empty());
    }

    #[test]
    fn name_is_required() {
        let err = Team::from_input(TeamInput::default(), RecordId::new()).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
    }

    #[test]
    fn looking_for_uses_camel_case_on_the_wire() {
        let input: TeamInput =
            serde_json::from_str(r#"{"name":"x","lookingFor":["DevOps"],"ignored":1}"#).unwrap();
        assert_eq!(input.looking_for, Some(vec!["DevOps".to_string()]));
    }
}
