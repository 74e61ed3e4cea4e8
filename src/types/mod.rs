pub mod discord_dtos;
pub mod reaction_role_dtos;

pub use discord_dtos::GatewayDispatch;
pub use reaction_role_dtos::{
    AddMappingPayload, AddMappingResponse, BindingView, CreateReactionRolePayload,
    CreateReactionRoleResponse, HealthResponse, ListResponse, RemoveMappingResponse,
};
