use serde::Deserialize;

use super::ids::{ChannelId, GuildId, optional_snowflake};

/// The part of a channel the bot needs: which guild it belongs to. Direct
/// message channels have none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    #[serde(with = "serde_str")]
    pub id: ChannelId,
    #[serde(default, deserialize_with = "optional_snowflake")]
    pub guild_id: Option<GuildId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_guild_and_direct_message_channels() {
        let text: Channel = serde_json::from_str(r#"{"id":"5","type":0,"guild_id":"9","name":"roles"}"#).unwrap();
        assert_eq!(text.guild_id, Some(GuildId(9)));

        let dm: Channel = serde_json::from_str(r#"{"id":"6","type":1}"#).unwrap();
        assert_eq!(dm.id, ChannelId(6));
        assert_eq!(dm.guild_id, None);
    }
}
