use std::sync::Arc;

use axum::extract::FromRef;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::{models::ReactionSignal, operator::Operator, registry::Registry};

#[derive(Clone)]
pub struct AppState {
    pub operator: Arc<Operator>,
    pub registry: Arc<Registry>,
    pub signals: mpsc::Sender<ReactionSignal>,
    pub api_token: Option<Arc<str>>,
    pub started_at: DateTime<Utc>,
}

impl FromRef<AppState> for Arc<Operator> {
    fn from_ref(state: &AppState) -> Self {
        state.operator.clone()
    }
}

impl FromRef<AppState> for mpsc::Sender<ReactionSignal> {
    fn from_ref(state: &AppState) -> Self {
        state.signals.clone()
    }
}
