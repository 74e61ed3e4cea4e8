//! Operator commands: create a reaction-role message, add or remove an
//! emoji mapping, list what is configured.
//!
//! Authorization happens before these are reached. Persistence always
//! completes before or after a platform call, never around one.

use std::{sync::Arc, time::Duration};

use crate::{
    errors::{AppError, PersistenceWarning, PlatformError, RegistryError},
    models::{ChannelId, EmojiKey, MessageBinding, MessageId, RoleId},
    platform::{PlatformClient, with_timeout},
    registry::{Committed, Registry},
};

#[derive(Debug)]
pub struct CreateReport {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub warning: Option<PersistenceWarning>,
}

#[derive(Debug)]
pub struct AddReport {
    pub previous_role: Option<RoleId>,
    /// Set when the seed reaction could not be placed. The mapping stands.
    pub seed_error: Option<PlatformError>,
    pub warning: Option<PersistenceWarning>,
}

#[derive(Debug)]
pub struct RemoveReport {
    pub role_id: RoleId,
    pub warning: Option<PersistenceWarning>,
}

pub struct Operator {
    registry: Arc<Registry>,
    platform: Arc<dyn PlatformClient>,
    call_timeout: Duration,
    reaction_delay: Duration,
}

impl Operator {
    pub fn new(
        registry: Arc<Registry>,
        platform: Arc<dyn PlatformClient>,
        call_timeout: Duration,
        reaction_delay: Duration,
    ) -> Self {
        Self {
            registry,
            platform,
            call_timeout,
            reaction_delay,
        }
    }

    /// Posts `content` to the channel and binds the new message.
    pub async fn create(&self, channel_id: ChannelId, content: &str) -> Result<CreateReport, AppError> {
        let message = self
            .call(self.platform.send_message(channel_id, content))
            .await?;

        let Committed { value, warning } = self.registry.create_binding(message.channel_id, message.id).await?;
        tracing::info!("Created reaction-role message {} in channel {}", message.id, value.channel_id);

        Ok(CreateReport {
            message_id: message.id,
            channel_id: value.channel_id,
            warning,
        })
    }

    /// Maps `emoji` to `role_id` on a bound message, then seeds the reaction
    /// so members have something to click.
    pub async fn add(&self, message_id: MessageId, emoji: EmojiKey, role_id: RoleId) -> Result<AddReport, AppError> {
        let binding = self
            .registry
            .binding(message_id)
            .await
            .ok_or(RegistryError::UnknownMessage(message_id))?;

        // The message must still exist, and the role must belong to its
        // guild, before anything is written.
        self.call(self.platform.fetch_message(binding.channel_id, message_id))
            .await?;
        self.ensure_role(binding.channel_id, role_id).await?;

        let Committed { value, warning } = self
            .registry
            .add_mapping(message_id, emoji.clone(), role_id)
            .await?;
        tracing::info!("Mapped {} to role {} on message {}", emoji, role_id, message_id);

        let seed_error = match self
            .call(self.platform.add_reaction(binding.channel_id, message_id, &emoji))
            .await
        {
            Ok(()) => {
                tokio::time::sleep(self.reaction_delay).await;
                None
            }
            Err(e) => {
                tracing::warn!("Could not add reaction {} to message {}: {}", emoji, message_id, e);
                Some(e)
            }
        };

        Ok(AddReport {
            previous_role: value,
            seed_error,
            warning,
        })
    }

    pub async fn remove(&self, message_id: MessageId, emoji: &EmojiKey) -> Result<RemoveReport, AppError> {
        let Committed { value, warning } = self.registry.remove_mapping(message_id, emoji).await?;
        tracing::info!("Removed mapping {} from message {}", emoji, message_id);

        Ok(RemoveReport {
            role_id: value,
            warning,
        })
    }

    pub async fn list(&self) -> Vec<(MessageId, MessageBinding)> {
        self.registry.list_bindings().await
    }

    pub async fn get(&self, message_id: MessageId) -> Result<MessageBinding, AppError> {
        self.registry
            .binding(message_id)
            .await
            .ok_or_else(|| RegistryError::UnknownMessage(message_id).into())
    }

    async fn ensure_role(&self, channel_id: ChannelId, role_id: RoleId) -> Result<(), AppError> {
        let channel = self.call(self.platform.fetch_channel(channel_id)).await?;
        let guild = match channel.guild_id {
            Some(guild_id) => self.call(self.platform.fetch_guild(guild_id)).await?,
            None => None,
        };

        match guild {
            Some(guild) if guild.get_role(role_id).is_some() => Ok(()),
            _ => Err(AppError::UnknownRole(role_id)),
        }
    }

    async fn call<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, PlatformError>>,
    ) -> Result<T, PlatformError> {
        with_timeout(self.call_timeout, call).await
    }
}
