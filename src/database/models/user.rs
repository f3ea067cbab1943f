use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{overlay_list, overlay_optional, overlay_text, Document, Meta};
use crate::types::RecordId;

pub const DEFAULT_ROLE: &str = "Developer";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    pub meta: Meta,
    pub name: String,
    /// Stored trimmed and lowercased
    pub email: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub badges: Vec<String>,
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

impl User {
    pub fn new(name: String, email: &str, password_hash: String) -> Self {
        Self {
            meta: Meta::new(),
            name,
            email: normalize_email(email),
            password_hash,
            google_id: None,
            github_id: None,
            avatar: String::new(),
            bio: String::new(),
            skills: Vec::new(),
            role: default_role(),
            github: None,
            linkedin: None,
            xp: 0,
            badges: Vec::new(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.meta.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.meta.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            skills: self.skills.clone(),
            role: self.role.clone(),
            github: self.github.clone(),
            linkedin: self.linkedin.clone(),
            xp: self.xp,
            badges: self.badges.clone(),
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }

    /// Merge a profile edit; blank fields leave the stored value alone
    pub fn apply_profile(&mut self, input: ProfileInput) {
        overlay_text(&mut self.name, input.name);
        overlay_text(&mut self.avatar, input.avatar);
        overlay_text(&mut self.bio, input.bio);
        overlay_text(&mut self.role, input.role);
        overlay_list(&mut self.skills, input.skills);
        overlay_optional(&mut self.github, input.github);
        overlay_optional(&mut self.linkedin, input.linkedin);
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "user";
    const TITLE: &'static str = "User";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shallow projection embedded wherever another record references a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

/// Everything a user may see about their own account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub role: String,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub xp: i64,
    pub badges: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
    pub skills: Option<Vec<String>>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}
