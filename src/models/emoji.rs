use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use super::ids::EmojiId;

/// Canonical string form of an emoji, used as the mapping key.
///
/// Unicode emoji are the sequence itself (`✅`). Custom emoji use the same
/// mention form operators paste into chat: `<:name:id>`, or `<a:name:id>`
/// when animated. Comparison is plain, case-sensitive string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiKey(String);

impl EmojiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for emoji typed by an operator. Surrounding whitespace is
    /// dropped; nothing is left for a blank input.
    pub fn from_input(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a custom emoji key into `(name, id)`. `None` for unicode emoji.
    pub fn custom_parts(&self) -> Option<(&str, &str)> {
        let inner = self.0.strip_prefix('<')?.strip_suffix('>')?;
        let inner = inner.strip_prefix("a:").or_else(|| inner.strip_prefix(':'))?;
        let (name, id) = inner.rsplit_once(':')?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((name, id))
    }

    /// The form the reaction REST endpoints expect, before percent-encoding:
    /// `name:id` for custom emoji, the unicode sequence otherwise.
    pub fn reaction_param(&self) -> String {
        match self.custom_parts() {
            Some((name, id)) => format!("{name}:{id}"),
            None => self.0.clone(),
        }
    }
}

impl Borrow<str> for EmojiKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmojiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Emoji as it arrives inside a reaction event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialEmoji {
    #[serde(default, with = "serde_str_opt")]
    pub id: Option<EmojiId>,
    pub name: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

impl PartialEmoji {
    pub fn key(&self) -> Option<EmojiKey> {
        match (self.id, self.name.as_deref()) {
            (Some(id), name) => {
                // Deleted custom emoji come through without a name.
                let name = name.unwrap_or("_");
                let prefix = if self.animated { "a" } else { "" };
                Some(EmojiKey(format!("<{prefix}:{name}:{id}>")))
            }
            (None, Some(name)) if !name.is_empty() => Some(EmojiKey(name.to_owned())),
            (None, _) => None,
        }
    }
}

// Gateway payloads carry the emoji id as a nullable string.
mod serde_str_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::ids::EmojiId;

    pub fn serialize<S: Serializer>(id: &Option<EmojiId>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<EmojiId>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| raw.parse().map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_input_is_trimmed_and_never_blank() {
        assert_eq!(EmojiKey::from_input("  ✅ ").unwrap().as_str(), "✅");
        assert_eq!(EmojiKey::from_input("<:party:123>\n").unwrap().as_str(), "<:party:123>");
        assert!(EmojiKey::from_input("").is_none());
        assert!(EmojiKey::from_input(" \t ").is_none());
    }

    #[test]
    fn unicode_key_is_the_sequence_itself() {
        let emoji = PartialEmoji {
            id: None,
            name: Some("✅".into()),
            animated: false,
        };
        let key = emoji.key().unwrap();
        assert_eq!(key.as_str(), "✅");
        assert_eq!(key.custom_parts(), None);
        assert_eq!(key.reaction_param(), "✅");
    }

    #[test]
    fn custom_keys_use_mention_form() {
        let still = PartialEmoji {
            id: Some(EmojiId(123)),
            name: Some("party".into()),
            animated: false,
        };
        let animated = PartialEmoji {
            animated: true,
            ..still.clone()
        };
        assert_eq!(still.key().unwrap().as_str(), "<:party:123>");
        assert_eq!(animated.key().unwrap().as_str(), "<a:party:123>");
        assert_eq!(animated.key().unwrap().reaction_param(), "party:123");
    }

    #[test]
    fn emoji_without_name_or_id_has_no_key() {
        let emoji = PartialEmoji {
            id: None,
            name: None,
            animated: false,
        };
        assert!(emoji.key().is_none());
    }

    #[test]
    fn malformed_mentions_are_treated_as_plain_strings() {
        assert_eq!(EmojiKey::new("<:party:abc>").custom_parts(), None);
        assert_eq!(EmojiKey::new(":party:").reaction_param(), ":party:");
    }

    #[test]
    fn deserializes_gateway_emoji() {
        let emoji: PartialEmoji =
            serde_json::from_str(r#"{"id":"987","name":"wave","animated":true}"#).unwrap();
        assert_eq!(emoji.key().unwrap().as_str(), "<a:wave:987>");

        let emoji: PartialEmoji = serde_json::from_str(r#"{"id":null,"name":"👍"}"#).unwrap();
        assert_eq!(emoji.key().unwrap().as_str(), "👍");
    }
}
