use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    auth::ApiAuthorized,
    errors::AppError,
    extractors::{ApiPath, ValidatedJson},
    models::{EmojiKey, MessageId},
    operator::Operator,
    types::{
        AddMappingPayload, AddMappingResponse, BindingView, CreateReactionRolePayload,
        CreateReactionRoleResponse, ListResponse, RemoveMappingResponse,
        reaction_role_dtos::warning_text,
    },
};

pub async fn create_reaction_role(
    _auth: ApiAuthorized,
    State(operator): State<Arc<Operator>>,
    ValidatedJson(payload): ValidatedJson<CreateReactionRolePayload>,
) -> Result<(StatusCode, Json<CreateReactionRoleResponse>), AppError> {
    let report = operator.create(payload.channel_id, &payload.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReactionRoleResponse {
            message_id: report.message_id,
            channel_id: report.channel_id,
            warning: warning_text(report.warning),
        }),
    ))
}

pub async fn list_reaction_roles(
    _auth: ApiAuthorized,
    State(operator): State<Arc<Operator>>,
) -> Json<ListResponse> {
    let bindings = operator
        .list()
        .await
        .into_iter()
        .map(BindingView::from)
        .collect();

    Json(ListResponse { bindings })
}

pub async fn get_reaction_role(
    _auth: ApiAuthorized,
    State(operator): State<Arc<Operator>>,
    ApiPath(message_id): ApiPath<MessageId>,
) -> Result<Json<BindingView>, AppError> {
    let binding = operator.get(message_id).await?;
    Ok(Json(BindingView::from((message_id, binding))))
}

pub async fn add_mapping(
    _auth: ApiAuthorized,
    State(operator): State<Arc<Operator>>,
    ApiPath(message_id): ApiPath<MessageId>,
    ValidatedJson(payload): ValidatedJson<AddMappingPayload>,
) -> Result<Json<AddMappingResponse>, AppError> {
    let emoji = EmojiKey::from_input(&payload.emoji).ok_or(AppError::BlankEmoji)?;
    let report = operator.add(message_id, emoji.clone(), payload.role_id).await?;

    Ok(Json(AddMappingResponse {
        message_id,
        emoji: emoji.to_string(),
        role_id: payload.role_id,
        previous_role_id: report.previous_role.map(|id| id.to_string()),
        seed_reaction_error: report.seed_error.map(|e| e.to_string()),
        warning: warning_text(report.warning),
    }))
}

pub async fn remove_mapping(
    _auth: ApiAuthorized,
    State(operator): State<Arc<Operator>>,
    ApiPath((message_id, emoji)): ApiPath<(MessageId, String)>,
) -> Result<Json<RemoveMappingResponse>, AppError> {
    let emoji = EmojiKey::from_input(&emoji).ok_or(AppError::BlankEmoji)?;
    let report = operator.remove(message_id, &emoji).await?;

    Ok(Json(RemoveMappingResponse {
        message_id,
        emoji: emoji.to_string(),
        role_id: report.role_id,
        warning: warning_text(report.warning),
    }))
}
