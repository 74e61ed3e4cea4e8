use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    emoji::EmojiKey,
    ids::{ChannelId, MessageId, RoleId},
};

/// All reaction-role bindings keyed by the bound message.
///
/// Serializes to the persisted layout directly:
/// `{ "<message_id>": { "channel_id": <int>, "map": { "<emoji>": <role_id> } } }`.
pub type BindingTable = BTreeMap<MessageId, MessageBinding>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBinding {
    pub channel_id: ChannelId,
    #[serde(rename = "map", default)]
    pub emoji_map: BTreeMap<EmojiKey, RoleId>,
}

impl MessageBinding {
    pub fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            emoji_map: BTreeMap::new(),
        }
    }

    pub fn role_for(&self, emoji: &str) -> Option<RoleId> {
        self.emoji_map.get(emoji).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_uses_persisted_layout() {
        let mut binding = MessageBinding::new(ChannelId(5));
        binding.emoji_map.insert(EmojiKey::new("✅"), RoleId(42));
        let mut table = BindingTable::new();
        table.insert(MessageId(100), binding);

        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "100": { "channel_id": 5, "map": { "✅": 42 } } })
        );
    }

    #[test]
    fn reads_file_written_by_earlier_versions() {
        let raw = r#"{
          "1200433287654998016": {
            "channel_id": 1100000000000000001,
            "map": { "<:party:123>": 1100000000000000042, "🎮": 7 }
          },
          "1200433287654998017": { "channel_id": 9, "map": {} }
        }"#;
        let table: BindingTable = serde_json::from_str(raw).unwrap();
        assert_eq!(table.len(), 2);

        let binding = &table[&MessageId(1200433287654998016)];
        assert_eq!(binding.channel_id, ChannelId(1100000000000000001));
        assert_eq!(binding.role_for("<:party:123>"), Some(RoleId(1100000000000000042)));
        assert_eq!(binding.role_for("🎮"), Some(RoleId(7)));
        assert_eq!(binding.role_for("🎲"), None);
        assert!(table[&MessageId(1200433287654998017)].emoji_map.is_empty());
    }
}
