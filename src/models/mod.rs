pub mod binding;
pub mod channel;
pub mod emoji;
pub mod guild;
pub mod guild_member;
pub mod ids;
pub mod message;
pub mod message_reaction;
pub mod role;

// Re-exports for convenience
pub use binding::{BindingTable, MessageBinding};
pub use channel::Channel;
pub use emoji::{EmojiKey, PartialEmoji};
pub use guild::Guild;
pub use guild_member::GuildMember;
pub use ids::{ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};
pub use message::Message;
pub use message_reaction::{ReactionKind, ReactionSignal};
pub use role::Role;
