use std::path::PathBuf;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::{EmojiKey, MessageId, RoleId};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ErrorDetails {
    pub code: i64,
    pub message: String,
    pub details: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResponseError {
    pub error: ErrorDetails,
}

/// Operator-input errors raised by the binding registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Message {0} already has a reaction-role binding.")]
    DuplicateBinding(MessageId),
    #[error("Message {0} has no reaction-role binding.")]
    UnknownMessage(MessageId),
    #[error("Message {message_id} has no mapping for {emoji}.")]
    UnknownMapping {
        message_id: MessageId,
        emoji: EmojiKey,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize binding table: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Persisted table at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("Save task did not complete: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A mutation was applied in memory but could not be written to disk.
#[derive(Debug, Error)]
#[error("Change applied but not persisted: {0}")]
pub struct PersistenceWarning(#[from] pub StoreError);

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform unavailable: {0}")]
    Unavailable(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Platform call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid or missing API token provided.")]
    InvalidToken,
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Platform call failed: {0}")]
    Platform(#[from] PlatformError),
    #[error("Role {0} does not exist in the message's guild.")]
    UnknownRole(RoleId),
    #[error("Emoji must not be blank.")]
    BlankEmoji,
    #[error("Reaction dispatcher is not running.")]
    DispatcherUnavailable,
    #[error("Invalid gateway event: {0}.")]
    InvalidEvent(serde_json::Error),
    #[error("Invalid JSON body: {0}.")]
    JsonRejection(#[from] JsonRejection),
    #[error("Invalid path parameters: {0}.")]
    PathRejection(#[from] PathRejection),
    #[error("Invalid JSON body: {0}.")]
    InvalidJson(#[from] ValidationErrors),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, client_message, internal_details) = match &self {
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "API token is invalid.",
                self.to_string(),
            ),
            AppError::Registry(RegistryError::DuplicateBinding(_)) => (
                StatusCode::CONFLICT,
                "This message is already a reaction-role message.",
                self.to_string(),
            ),
            AppError::Registry(RegistryError::UnknownMessage(_)) => (
                StatusCode::NOT_FOUND,
                "Message ID does not exist. Create the reaction-role message first.",
                self.to_string(),
            ),
            AppError::Registry(RegistryError::UnknownMapping { .. }) => (
                StatusCode::NOT_FOUND,
                "Mapping does not exist.",
                self.to_string(),
            ),
            AppError::Platform(PlatformError::PermissionDenied(_)) => (
                StatusCode::FORBIDDEN,
                "The bot lacks permission for this action.",
                self.to_string(),
            ),
            AppError::Platform(PlatformError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                "The chat platform could not find that resource.",
                self.to_string(),
            ),
            AppError::Platform(PlatformError::Timeout(_)) => (
                StatusCode::GATEWAY_TIMEOUT,
                "The chat platform did not answer in time.",
                self.to_string(),
            ),
            AppError::Platform(_) => (
                StatusCode::BAD_GATEWAY,
                "The chat platform request failed.",
                self.to_string(),
            ),
            AppError::UnknownRole(_) => (
                StatusCode::NOT_FOUND,
                "Role does not exist in this server.",
                self.to_string(),
            ),
            AppError::BlankEmoji => (
                StatusCode::BAD_REQUEST,
                "Emoji must not be blank.",
                self.to_string(),
            ),
            AppError::DispatcherUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Reaction events cannot be accepted right now.",
                self.to_string(),
            ),
            AppError::InvalidEvent(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Reaction event is missing required fields.",
                format!("Gateway event decoding error: {}", e),
            ),
            AppError::InvalidJson(e) => (
                StatusCode::BAD_REQUEST,
                "Invalid form body.",
                format!("Invalid body provided (validation): {}.", e),
            ),

            // Extractor Rejection Mappings
            AppError::JsonRejection(e) => match e {
                JsonRejection::MissingJsonContentType(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "Content-Type header must be application/json.",
                    e.to_string(),
                ),
                JsonRejection::JsonSyntaxError(_) => (
                    StatusCode::BAD_REQUEST,
                    "Malformed JSON in request body.",
                    e.to_string(),
                ),
                JsonRejection::JsonDataError(e) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Request body is valid JSON but has incorrect fields.",
                    format!("JSON deserialization error: {}", e),
                ),
                _ => (
                    StatusCode::BAD_REQUEST,
                    "Invalid JSON request.",
                    e.to_string(),
                ),
            },
            AppError::PathRejection(e) => (
                StatusCode::BAD_REQUEST,
                "Invalid path parameters.",
                e.to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::warn!("{}", internal_details);
        }

        let error_body = Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": client_message,
                "details": internal_details,
            }
        }));

        (status, error_body).into_response()
    }
}
