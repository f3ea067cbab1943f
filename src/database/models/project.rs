use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{optional_text, overlay_list, overlay_optional, overlay_text, required_text, Document, Meta, UserSummary};
use crate::error::ApiError;
use crate::types::RecordId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Building,
    Live,
    Hiring,
}

impl FromStr for ProjectStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Building" => Ok(ProjectStatus::Building),
            "Live" => Ok(ProjectStatus::Live),
            "Hiring" => Ok(ProjectStatus::Hiring),
            other => Err(ApiError::field_error(
                "status",
                format!("`{}` is not a valid status (expected Building, Live or Hiring)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(flatten)]
    pub meta: Meta,
    pub owner: RecordId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub members: Vec<RecordId>,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Project {
    pub const SEARCH_FIELDS: &'static [&'static str] = &["title", "description", "tags"];

    /// The owner starts out as the only member
    pub fn from_input(input: ProjectInput, owner: RecordId) -> Result<Self, ApiError> {
        let status = match optional_text(input.status) {
            Some(s) => s.parse::<ProjectStatus>()?,
            None => ProjectStatus::default(),
        };
        Ok(Self {
            meta: Meta::new(),
            owner,
            title: required_text("title", input.title)?,
            description: required_text("description", input.description)?,
            tags: input.tags.unwrap_or_default(),
            link: optional_text(input.link),
            image: optional_text(input.image),
            members: vec![owner],
            status,
        })
    }

    /// Validates before touching any field so a bad status leaves the record as it was
    pub fn apply(&mut self, input: ProjectInput) -> Result<(), ApiError> {
        let status = optional_text(input.status).map(|s| s.parse::<ProjectStatus>()).transpose()?;
        overlay_text(&mut self.title, input.title);
        overlay_text(&mut self.description, input.description);
        overlay_list(&mut self.tags, input.tags);
        overlay_optional(&mut self.link, input.link);
        overlay_optional(&mut self.image, input.image);
        if let Some(status) = status {
            self.status = status;
        }
        Ok(())
    }
}

impl Document for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "project";
    const TITLE: &'static str = "Project";

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: RecordId,
    pub owner: Option<UserSummary>,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub link: Option<String>,
    pub image: Option<String>,
    pub members: Vec<UserSummary>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> ProjectInput {
        ProjectInput {
            title: Some(title.into()),
            description: Some("a thing".into()),
            ..Default::default()
        }
    }

    #[test]
    fn owner_is_first_member_and_status_defaults() {
        let owner = RecordId::new();
        let project = Project::from_input(input("nexguild"), owner).unwrap();
        assert_eq!(project.members, vec![owner]);
        assert_eq!(project.status, ProjectStatus::Building);
    }

    #[test]
    fn unknown_status_is_rejected_without_side_effects() {
        let mut project = Project::from_input(input("nexguild"), RecordId::new()).unwrap();
        let err = project
            .apply(ProjectInput {
                title: Some("renamed".into()),
                status: Some("Abandoned".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::ValidationError { .. }));
        assert_eq!(project.title, "nexguild");
    }

    #[test]
    fn status_serializes_as_label() {
        let value = serde_json::to_value(ProjectStatus::Hiring).unwrap();
        assert_eq!(value, "Hiring");
    }
}
