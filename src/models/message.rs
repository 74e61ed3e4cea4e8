use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(with = "serde_str")]
    pub id: MessageId,
    #[serde(with = "serde_str")]
    pub channel_id: ChannelId,
    #[serde(default)]
    pub content: String,
}
