use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    errors::PersistenceWarning,
    models::{ChannelId, MessageBinding, MessageId, RoleId},
};

// --- Request Payloads ---
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReactionRolePayload {
    #[serde(with = "serde_str")]
    pub channel_id: ChannelId,
    #[validate(length(min = 1, max = 2000, message = "Must be between 1 to 2000 characters."))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMappingPayload {
    #[validate(length(min = 1, max = 100, message = "Must be between 1 to 100 characters."))]
    pub emoji: String,
    #[serde(with = "serde_str")]
    pub role_id: RoleId,
}

// --- Response Bodies ---
#[derive(Debug, Serialize, Deserialize)]
pub struct MappingView {
    pub emoji: String,
    #[serde(with = "serde_str")]
    pub role_id: RoleId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BindingView {
    #[serde(with = "serde_str")]
    pub message_id: MessageId,
    #[serde(with = "serde_str")]
    pub channel_id: ChannelId,
    pub mappings: Vec<MappingView>,
}

impl From<(MessageId, MessageBinding)> for BindingView {
    fn from((message_id, binding): (MessageId, MessageBinding)) -> Self {
        BindingView {
            message_id,
            channel_id: binding.channel_id,
            mappings: binding
                .emoji_map
                .into_iter()
                .map(|(emoji, role_id)| MappingView {
                    emoji: emoji.to_string(),
                    role_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub bindings: Vec<BindingView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReactionRoleResponse {
    #[serde(with = "serde_str")]
    pub message_id: MessageId,
    #[serde(with = "serde_str")]
    pub channel_id: ChannelId,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddMappingResponse {
    #[serde(with = "serde_str")]
    pub message_id: MessageId,
    pub emoji: String,
    #[serde(with = "serde_str")]
    pub role_id: RoleId,
    pub previous_role_id: Option<String>,
    pub seed_reaction_error: Option<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveMappingResponse {
    #[serde(with = "serde_str")]
    pub message_id: MessageId,
    pub emoji: String,
    #[serde(with = "serde_str")]
    pub role_id: RoleId,
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub bindings: usize,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

pub fn warning_text(warning: Option<PersistenceWarning>) -> Option<String> {
    warning.map(|w| w.to_string())
}
