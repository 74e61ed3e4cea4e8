use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

// Snowflake newtypes. Serialized as bare integers so they line up with the
// persisted table; the HTTP DTOs wrap them with `serde_str` instead.
macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Identifies a chat message; the key of the binding table.
    MessageId
);
snowflake_id!(ChannelId);
snowflake_id!(GuildId);
snowflake_id!(RoleId);
snowflake_id!(UserId);
snowflake_id!(
    /// Only custom emoji carry an id; unicode emoji are identified by name.
    EmojiId
);

/// Reads a nullable snowflake string, as the REST and gateway payloads send
/// optional ids.
pub fn optional_snowflake<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| raw.parse().map_err(serde::de::Error::custom))
        .transpose()
}
