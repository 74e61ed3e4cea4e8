use axum::{extract::State, http::StatusCode};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{
    auth::ApiAuthorized,
    errors::AppError,
    extractors::ApiJson,
    models::ReactionSignal,
    types::GatewayDispatch,
};

/// Accepts a gateway dispatch from the bridge and queues reaction events for
/// the dispatcher. Anything that is not a reaction event is acknowledged and
/// dropped. A full queue is answered with 503 at once so the bridge can
/// retry; the request never waits for space.
pub async fn ingest_gateway_event(
    _auth: ApiAuthorized,
    State(signals): State<mpsc::Sender<ReactionSignal>>,
    ApiJson(dispatch): ApiJson<GatewayDispatch>,
) -> Result<StatusCode, AppError> {
    let Some(signal) = dispatch.into_signal().map_err(AppError::InvalidEvent)? else {
        return Ok(StatusCode::ACCEPTED);
    };

    signals.try_send(signal).map_err(|e| match e {
        TrySendError::Full(signal) => {
            tracing::warn!(
                "Reaction queue full; rejected {:?} of {} on message {}",
                signal.kind,
                signal.emoji,
                signal.message_id
            );
            AppError::DispatcherUnavailable
        }
        TrySendError::Closed(_) => AppError::DispatcherUnavailable,
    })?;

    Ok(StatusCode::ACCEPTED)
}
