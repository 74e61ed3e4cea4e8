//! Applies live reaction signals to member roles.
//!
//! Every signal ends in an [`Outcome`]. Outcomes are logged here and never
//! propagated: one failed grant must not stop the next event from being
//! processed.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    errors::PlatformError,
    models::{GuildMember, ReactionKind, ReactionSignal, Role, RoleId, UserId},
    platform::{GRANT_REASON, PlatformClient, REVOKE_REASON, with_timeout},
    registry::Registry,
};

#[derive(Debug)]
pub enum Outcome {
    Applied {
        kind: ReactionKind,
        user_id: UserId,
        role_id: RoleId,
    },
    Skipped(SkipReason),
    Failed(PlatformError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The message has no binding, or the emoji is not mapped on it.
    Unmapped,
    /// Reaction outside a guild, e.g. in a direct message.
    NoGuild,
    GuildUnavailable,
    RoleMissing,
    MemberUnresolved,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Unmapped => "not a reaction-role reaction",
            SkipReason::NoGuild => "reaction outside a guild",
            SkipReason::GuildUnavailable => "guild unavailable",
            SkipReason::RoleMissing => "role no longer exists",
            SkipReason::MemberUnresolved => "member could not be resolved",
        };
        f.write_str(reason)
    }
}

pub struct Dispatcher {
    registry: Arc<Registry>,
    platform: Arc<dyn PlatformClient>,
    call_timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, platform: Arc<dyn PlatformClient>, call_timeout: Duration) -> Self {
        Self {
            registry,
            platform,
            call_timeout,
        }
    }

    /// Drains the signal queue, handling each signal on its own task so a
    /// slow platform call never holds up intake.
    pub fn spawn(self: Arc<Self>, mut signals: mpsc::Receiver<ReactionSignal>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                let dispatcher = self.clone();
                tokio::spawn(async move {
                    dispatcher.dispatch(signal).await;
                });
            }
            tracing::info!("Reaction signal queue closed, dispatcher stopping");
        })
    }

    pub async fn dispatch(&self, signal: ReactionSignal) -> Outcome {
        let outcome = match signal.kind {
            ReactionKind::Add => self.on_reaction_add(&signal).await,
            ReactionKind::Remove => self.on_reaction_remove(&signal).await,
        };
        log_outcome(&signal, &outcome);
        outcome
    }

    pub async fn on_reaction_add(&self, signal: &ReactionSignal) -> Outcome {
        let (member_hint, role) = match self.resolve(signal).await {
            Ok(resolved) => resolved,
            Err(reason) => return Outcome::Skipped(reason),
        };

        let member = match member_hint {
            Some(member) => member,
            None => match self.fetch_member(signal).await {
                Some(member) => member,
                None => return Outcome::Skipped(SkipReason::MemberUnresolved),
            },
        };

        match self
            .call(self.platform.grant_role(&member, &role, GRANT_REASON))
            .await
        {
            Ok(()) => Outcome::Applied {
                kind: ReactionKind::Add,
                user_id: member.user_id,
                role_id: role.id,
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Removal signals never carry member data, so the member is always
    /// fetched.
    pub async fn on_reaction_remove(&self, signal: &ReactionSignal) -> Outcome {
        let role = match self.resolve(signal).await {
            Ok((_, role)) => role,
            Err(reason) => return Outcome::Skipped(reason),
        };

        let Some(member) = self.fetch_member(signal).await else {
            return Outcome::Skipped(SkipReason::MemberUnresolved);
        };

        match self
            .call(self.platform.revoke_role(&member, &role, REVOKE_REASON))
            .await
        {
            Ok(()) => Outcome::Applied {
                kind: ReactionKind::Remove,
                user_id: member.user_id,
                role_id: role.id,
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    // Binding lookup, then guild and role. Returns any member data embedded
    // in the signal along with the role to apply.
    async fn resolve(&self, signal: &ReactionSignal) -> Result<(Option<GuildMember>, Role), SkipReason> {
        let role_id = self
            .registry
            .lookup(signal.message_id, signal.emoji.as_str())
            .await
            .ok_or(SkipReason::Unmapped)?;
        let guild_id = signal.guild_id.ok_or(SkipReason::NoGuild)?;

        let guild = match self.call(self.platform.fetch_guild(guild_id)).await {
            Ok(Some(guild)) => guild,
            Ok(None) => return Err(SkipReason::GuildUnavailable),
            Err(e) => {
                tracing::debug!("Could not fetch guild {}: {}", guild_id, e);
                return Err(SkipReason::GuildUnavailable);
            }
        };
        let role = guild.get_role(role_id).cloned().ok_or(SkipReason::RoleMissing)?;

        let member = signal
            .member
            .clone()
            .filter(|member| member.user_id == signal.user_id && member.guild_id == guild_id);
        Ok((member, role))
    }

    async fn fetch_member(&self, signal: &ReactionSignal) -> Option<GuildMember> {
        let guild_id = signal.guild_id?;
        match self.call(self.platform.fetch_member(guild_id, signal.user_id)).await {
            Ok(member) => member,
            Err(e) => {
                tracing::debug!("Could not fetch member {} in {}: {}", signal.user_id, guild_id, e);
                None
            }
        }
    }

    async fn call<T, F>(&self, call: F) -> Result<T, PlatformError>
    where
        F: Future<Output = Result<T, PlatformError>>,
    {
        with_timeout(self.call_timeout, call).await
    }
}

fn log_outcome(signal: &ReactionSignal, outcome: &Outcome) {
    match outcome {
        Outcome::Applied {
            kind: ReactionKind::Add,
            user_id,
            role_id,
        } => tracing::info!("Assigned role {} to user {} via message {}", role_id, user_id, signal.message_id),
        Outcome::Applied {
            kind: ReactionKind::Remove,
            user_id,
            role_id,
        } => tracing::info!("Removed role {} from user {} via message {}", role_id, user_id, signal.message_id),
        Outcome::Skipped(SkipReason::Unmapped) => {
            tracing::trace!("Ignored {} on message {}", signal.emoji, signal.message_id)
        }
        Outcome::Skipped(reason) => tracing::debug!(
            "Skipped {:?} of {} on message {} by user {}: {}",
            signal.kind,
            signal.emoji,
            signal.message_id,
            signal.user_id,
            reason
        ),
        Outcome::Failed(e) => tracing::warn!(
            "Failed to {} role for user {} via message {}: {}",
            match signal.kind {
                ReactionKind::Add => "add",
                ReactionKind::Remove => "remove",
            },
            signal.user_id,
            signal.message_id,
            e
        ),
    }
}
