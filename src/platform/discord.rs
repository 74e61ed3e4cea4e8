use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, header};

use super::PlatformClient;
use crate::{
    errors::PlatformError,
    models::{Channel, ChannelId, EmojiKey, Guild, GuildId, GuildMember, Message, MessageId, Role, UserId},
    types::discord_dtos::{CreateMessageBody, MemberObject},
};

const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

/// Discord REST API client authenticated as a bot.
#[derive(Clone)]
pub struct DiscordClient {
    http: Client,
    base: Url,
    token: String,
}

impl DiscordClient {
    pub fn new(token: &str, api_base: &str, timeout: Duration) -> Result<Self, PlatformError> {
        let base = Url::parse(api_base)
            .map_err(|e| PlatformError::Unavailable(format!("Invalid API base {api_base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(PlatformError::Unavailable(format!("Invalid API base {api_base}")));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("DiscordBot (reactrole, ", env!("CARGO_PKG_VERSION"), ")"))
            .build()?;

        Ok(Self {
            http,
            base,
            token: token.to_string(),
        })
    }

    /// Appends percent-encoded path segments to the API base.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(segments))
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    async fn member_role(
        &self,
        method: Method,
        member: &GuildMember,
        role: &Role,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let guild_id = member.guild_id.to_string();
        let user_id = member.user_id.to_string();
        let role_id = role.id.to_string();
        let request = self
            .request(method, &["guilds", &guild_id, "members", &user_id, "roles", &role_id])
            .header(AUDIT_LOG_REASON, encode_reason(reason));
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl PlatformClient for DiscordClient {
    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<Message, PlatformError> {
        let channel_id = channel_id.to_string();
        let request = self
            .request(Method::POST, &["channels", &channel_id, "messages"])
            .json(&CreateMessageBody { content });
        Ok(self.send(request).await?.json().await?)
    }

    async fn fetch_message(&self, channel_id: ChannelId, message_id: MessageId) -> Result<Message, PlatformError> {
        let channel_id = channel_id.to_string();
        let message_id = message_id.to_string();
        let request = self.request(Method::GET, &["channels", &channel_id, "messages", &message_id]);
        Ok(self.send(request).await?.json().await?)
    }

    async fn fetch_channel(&self, channel_id: ChannelId) -> Result<Channel, PlatformError> {
        let channel_id = channel_id.to_string();
        Ok(self.send(self.request(Method::GET, &["channels", &channel_id])).await?.json().await?)
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &EmojiKey,
    ) -> Result<(), PlatformError> {
        let channel_id = channel_id.to_string();
        let message_id = message_id.to_string();
        let emoji = emoji.reaction_param();
        let request = self.request(
            Method::PUT,
            &["channels", &channel_id, "messages", &message_id, "reactions", &emoji, "@me"],
        );
        self.send(request).await?;
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: GuildId) -> Result<Option<Guild>, PlatformError> {
        let id = guild_id.to_string();
        match self.send(self.request(Method::GET, &["guilds", &id])).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_member(&self, guild_id: GuildId, user_id: UserId) -> Result<Option<GuildMember>, PlatformError> {
        let guild = guild_id.to_string();
        let user = user_id.to_string();
        match self.send(self.request(Method::GET, &["guilds", &guild, "members", &user])).await {
            Ok(response) => {
                let member: MemberObject = response.json().await?;
                Ok(Some(member.into_member(guild_id, user_id)))
            }
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn grant_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError> {
        self.member_role(Method::PUT, member, role, reason).await
    }

    async fn revoke_role(&self, member: &GuildMember, role: &Role, reason: &str) -> Result<(), PlatformError> {
        self.member_role(Method::DELETE, member, role, reason).await
    }
}

fn status_error(status: StatusCode, body: String) -> PlatformError {
    match status {
        StatusCode::FORBIDDEN => PlatformError::PermissionDenied(body),
        StatusCode::NOT_FOUND => PlatformError::NotFound(body),
        _ => PlatformError::Unavailable(format!("{status}: {body}")),
    }
}

// The audit-log header carries URL-encoded UTF-8.
fn encode_reason(reason: &str) -> String {
    urlencoding::encode(reason).into_owned()
}
