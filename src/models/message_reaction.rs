use super::{
    emoji::EmojiKey,
    guild_member::GuildMember,
    ids::{ChannelId, GuildId, MessageId, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Add,
    Remove,
}

/// A user added or removed a reaction somewhere the bot can see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSignal {
    pub kind: ReactionKind,
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    /// `None` for reactions in direct messages.
    pub guild_id: Option<GuildId>,
    pub user_id: UserId,
    pub emoji: EmojiKey,
    /// Only ever present on additions.
    pub member: Option<GuildMember>,
}
