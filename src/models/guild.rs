use serde::{Deserialize, Serialize};

use super::{
    ids::{GuildId, RoleId},
    role::Role,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    #[serde(with = "serde_str")]
    pub id: GuildId,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Guild {
    pub fn get_role(&self, role_id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|role| role.id == role_id)
    }
}
