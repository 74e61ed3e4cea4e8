//! The chat platform as seen by the core: the handful of calls needed to
//! post reaction-role messages and hand out roles.

pub mod discord;
#[cfg(test)]
pub mod mock;

use std::{future::Future, time::Duration};

use async_trait::async_trait;

use crate::{
    errors::PlatformError,
    models::{Channel, ChannelId, EmojiKey, Guild, GuildId, GuildMember, Message, MessageId, Role, UserId},
};

pub use discord::DiscordClient;

pub const GRANT_REASON: &str = "Reaction role assigned";
pub const REVOKE_REASON: &str = "Reaction role removed";

/// Grant and revoke must be idempotent on the platform side: the dispatcher
/// issues them without checking current membership.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<Message, PlatformError>;

    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<Message, PlatformError>;

    async fn fetch_channel(&self, channel_id: ChannelId) -> Result<Channel, PlatformError>;

    /// Places the bot's own reaction on a message.
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> Result<(), PlatformError>;

    async fn fetch_guild(&self, guild_id: GuildId) -> Result<Option<Guild>, PlatformError>;

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<GuildMember>, PlatformError>;

    async fn grant_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError>;

    async fn revoke_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError>;
}

/// Bounds a platform call. A hung call turns into `PlatformError::Timeout`.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, PlatformError>
where
    F: Future<Output = Result<T, PlatformError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(PlatformError::Timeout(limit)))
}
