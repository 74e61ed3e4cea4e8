use serde::{Deserialize, Serialize};

use super::ids::{GuildId, RoleId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMember {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
}
