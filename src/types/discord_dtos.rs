use serde::{Deserialize, Serialize};

use crate::models::{
    ChannelId, GuildId, GuildMember, MessageId, PartialEmoji, ReactionKind, ReactionSignal, RoleId, UserId,
    ids::optional_snowflake,
};

#[derive(Debug, Clone, Deserialize)]
pub struct UserObject {
    #[serde(with = "serde_str")]
    pub id: UserId,
}

/// Guild member object as returned by the REST API and embedded in
/// reaction-add dispatches.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberObject {
    pub user: Option<UserObject>,
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl MemberObject {
    /// `fallback_user` covers payloads that omit the nested user object.
    pub fn into_member(self, guild_id: GuildId, fallback_user: UserId) -> GuildMember {
        GuildMember {
            guild_id,
            user_id: self.user.map(|user| user.id).unwrap_or(fallback_user),
            nick: self.nick,
            roles: self
                .roles
                .iter()
                .filter_map(|raw| raw.parse::<RoleId>().ok())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateMessageBody<'a> {
    pub content: &'a str,
}

/// Payload of `MESSAGE_REACTION_ADD` / `MESSAGE_REACTION_REMOVE`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEventData {
    #[serde(with = "serde_str")]
    pub user_id: UserId,
    #[serde(with = "serde_str")]
    pub channel_id: ChannelId,
    #[serde(with = "serde_str")]
    pub message_id: MessageId,
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub guild_id: Option<GuildId>,
    pub member: Option<MemberObject>,
    pub emoji: PartialEmoji,
}

/// A gateway dispatch as forwarded by the gateway bridge: `t` is the event
/// name, `d` its data.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayDispatch {
    pub t: Option<String>,
    #[serde(default)]
    pub d: serde_json::Value,
}

impl GatewayDispatch {
    /// Decodes reaction events into signals. Other events, and reactions
    /// whose emoji cannot be keyed, yield `None`.
    pub fn into_signal(self) -> Result<Option<ReactionSignal>, serde_json::Error> {
        let kind = match self.t.as_deref() {
            Some("MESSAGE_REACTION_ADD") => ReactionKind::Add,
            Some("MESSAGE_REACTION_REMOVE") => ReactionKind::Remove,
            _ => return Ok(None),
        };
        let data: ReactionEventData = serde_json::from_value(self.d)?;
        let Some(emoji) = data.emoji.key() else {
            return Ok(None);
        };

        // Removals never embed member data.
        let member = match (kind, data.guild_id, data.member) {
            (ReactionKind::Add, Some(guild_id), Some(member)) => Some(member.into_member(guild_id, data.user_id)),
            _ => None,
        };

        Ok(Some(ReactionSignal {
            kind,
            message_id: data.message_id,
            channel_id: data.channel_id,
            guild_id: data.guild_id,
            user_id: data.user_id,
            emoji,
            member,
        }))
    }
}
