use serde::{Deserialize, Serialize};

use super::ids::RoleId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(with = "serde_str")]
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub managed: bool,
}
