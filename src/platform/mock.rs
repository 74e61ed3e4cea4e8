//! Recording in-memory platform for tests.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;

use super::PlatformClient;
use crate::{
    errors::PlatformError,
    models::{Channel, ChannelId, EmojiKey, Guild, GuildId, GuildMember, Message, MessageId, Role, RoleId, UserId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendMessage(ChannelId, String),
    FetchMessage(ChannelId, MessageId),
    FetchChannel(ChannelId),
    AddReaction(ChannelId, MessageId, EmojiKey),
    FetchGuild(GuildId),
    FetchMember(GuildId, UserId),
    Grant { user: UserId, role: RoleId, reason: String },
    Revoke { user: UserId, role: RoleId, reason: String },
}

/// Which call should fail, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    SendMessage,
    FetchMessage,
    FetchChannel,
    AddReaction,
    FetchGuild,
    FetchMember,
    Grant,
    Revoke,
}

#[derive(Debug, Clone, Copy)]
pub enum FaultKind {
    Unavailable,
    PermissionDenied,
    /// Never answers; exercises caller timeouts.
    Hang,
}

#[derive(Default)]
pub struct MockPlatform {
    calls: Mutex<Vec<Call>>,
    guilds: Mutex<HashMap<GuildId, Guild>>,
    members: Mutex<HashMap<(GuildId, UserId), GuildMember>>,
    messages: Mutex<HashMap<MessageId, Message>>,
    channels: Mutex<HashMap<ChannelId, Channel>>,
    faults: Mutex<HashMap<Fault, FaultKind>>,
    next_message_id: AtomicU64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicU64::new(1000),
            ..Self::default()
        }
    }

    /// Guild 9 with roles 42 and 43, member 7, and message 100 in its
    /// channel 5.
    pub fn with_scenario() -> Self {
        let platform = Self::new();
        platform.add_guild(GuildId(9), &[42, 43]);
        platform.add_channel(ChannelId(5), Some(GuildId(9)));
        platform.add_member(GuildId(9), UserId(7));
        platform.add_message(ChannelId(5), MessageId(100));
        platform
    }

    pub fn add_guild(&self, guild_id: GuildId, role_ids: &[u64]) {
        let roles = role_ids
            .iter()
            .map(|id| Role {
                id: RoleId(*id),
                name: format!("role-{id}"),
                position: 1,
                managed: false,
            })
            .collect();
        self.guilds.lock().unwrap().insert(
            guild_id,
            Guild {
                id: guild_id,
                name: format!("guild-{guild_id}"),
                roles,
            },
        );
    }

    pub fn add_member(&self, guild_id: GuildId, user_id: UserId) {
        self.members.lock().unwrap().insert(
            (guild_id, user_id),
            GuildMember {
                guild_id,
                user_id,
                nick: None,
                roles: Vec::new(),
            },
        );
    }

    pub fn add_channel(&self, channel_id: ChannelId, guild_id: Option<GuildId>) {
        self.channels.lock().unwrap().insert(
            channel_id,
            Channel {
                id: channel_id,
                guild_id,
            },
        );
    }

    pub fn add_message(&self, channel_id: ChannelId, message_id: MessageId) {
        self.messages.lock().unwrap().insert(
            message_id,
            Message {
                id: message_id,
                channel_id,
                content: String::new(),
            },
        );
    }

    pub fn fail(&self, fault: Fault, kind: FaultKind) {
        self.faults.lock().unwrap().insert(fault, kind);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn role_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Grant { .. } | Call::Revoke { .. }))
            .collect()
    }

    pub fn member_roles(&self, guild_id: GuildId, user_id: UserId) -> Vec<RoleId> {
        self.members
            .lock()
            .unwrap()
            .get(&(guild_id, user_id))
            .map(|member| member.roles.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn check(&self, fault: Fault) -> Result<(), PlatformError> {
        let kind = self.faults.lock().unwrap().get(&fault).copied();
        match kind {
            None => Ok(()),
            Some(FaultKind::Unavailable) => Err(PlatformError::Unavailable("503: mock outage".into())),
            Some(FaultKind::PermissionDenied) => Err(PlatformError::PermissionDenied("Missing Permissions".into())),
            Some(FaultKind::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(PlatformError::Unavailable("hung call resumed".into()))
            }
        }
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<Message, PlatformError> {
        self.record(Call::SendMessage(channel_id, content.to_string()));
        self.check(Fault::SendMessage).await?;
        let id = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        let message = Message {
            id,
            channel_id,
            content: content.to_string(),
        };
        self.messages.lock().unwrap().insert(id, message.clone());
        Ok(message)
    }

    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<Message, PlatformError> {
        self.record(Call::FetchMessage(channel_id, message_id));
        self.check(Fault::FetchMessage).await?;
        self.messages
            .lock()
            .unwrap()
            .get(&message_id)
            .filter(|message| message.channel_id == channel_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound("Unknown Message".into()))
    }

    async fn fetch_channel(&self, channel_id: ChannelId) -> Result<Channel, PlatformError> {
        self.record(Call::FetchChannel(channel_id));
        self.check(Fault::FetchChannel).await?;
        self.channels
            .lock()
            .unwrap()
            .get(&channel_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound("Unknown Channel".into()))
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> Result<(), PlatformError> {
        self.record(Call::AddReaction(channel_id, message_id, emoji.clone()));
        self.check(Fault::AddReaction).await
    }

    async fn fetch_guild(&self, guild_id: GuildId) -> Result<Option<Guild>, PlatformError> {
        self.record(Call::FetchGuild(guild_id));
        self.check(Fault::FetchGuild).await?;
        Ok(self.guilds.lock().unwrap().get(&guild_id).cloned())
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<GuildMember>, PlatformError> {
        self.record(Call::FetchMember(guild_id, user_id));
        self.check(Fault::FetchMember).await?;
        Ok(self.members.lock().unwrap().get(&(guild_id, user_id)).cloned())
    }

    // Repeat grants and revokes are accepted silently, like the real API.
    async fn grant_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError> {
        self.record(Call::Grant {
            user: member.user_id,
            role: role.id,
            reason: reason.to_string(),
        });
        self.check(Fault::Grant).await?;
        if let Some(stored) = self.members.lock().unwrap().get_mut(&(member.guild_id, member.user_id)) {
            if !stored.roles.contains(&role.id) {
                stored.roles.push(role.id);
            }
        }
        Ok(())
    }

    async fn revoke_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError> {
        self.record(Call::Revoke {
            user: member.user_id,
            role: role.id,
            reason: reason.to_string(),
        });
        self.check(Fault::Revoke).await?;
        if let Some(stored) = self.members.lock().unwrap().get_mut(&(member.guild_id, member.user_id)) {
            stored.roles.retain(|id| *id != role.id);
        }
        Ok(())
    }
}
