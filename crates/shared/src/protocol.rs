use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ChannelId, EmoteChangeType, EmoteId, EmoteProvider, HistoryId, RewardId, RewardType};

/// Emote history record as the backend emits it: Go-style PascalCase field
/// names, timestamps as ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEmoteHistoryRecord {
    #[serde(rename = "CreatedAt")]
    pub created_at: String,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: String,
    #[serde(rename = "DeletedAt")]
    pub deleted_at: Option<String>,
    #[serde(rename = "ID")]
    pub id: HistoryId,
    #[serde(rename = "ChannelTwitchID")]
    pub channel_twitch_id: ChannelId,
    #[serde(rename = "Type")]
    pub provider: EmoteProvider,
    #[serde(rename = "ChangeType")]
    pub change_type: EmoteChangeType,
    #[serde(rename = "EmoteID")]
    pub emote_id: EmoteId,
    #[serde(rename = "Blocked")]
    pub blocked: bool,
}

/// In-memory form of a history record, timestamps parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmoteHistoryEntry {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub id: HistoryId,
    pub channel_twitch_id: ChannelId,
    pub provider: EmoteProvider,
    pub change_type: EmoteChangeType,
    pub emote_id: EmoteId,
    pub blocked: bool,
}

#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("invalid timestamp '{value}' in {field}: {source}")]
    Timestamp {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, RecordParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| RecordParseError::Timestamp {
            field,
            value: value.to_string(),
            source,
        })
}

impl TryFrom<RawEmoteHistoryRecord> for EmoteHistoryEntry {
    type Error = RecordParseError;

    fn try_from(raw: RawEmoteHistoryRecord) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp("CreatedAt", &raw.created_at)?;

        Ok(Self {
            created_at,
            // UpdatedAt and DeletedAt intentionally track the CreatedAt wire
            // value rather than their own fields; see DESIGN.md before
            // switching them over.
            updated_at: created_at,
            deleted_at: Some(created_at),
            id: raw.id,
            channel_twitch_id: raw.channel_twitch_id,
            provider: raw.provider,
            change_type: raw.change_type,
            emote_id: raw.emote_id,
            blocked: raw.blocked,
        })
    }
}

/// Query for one page of emote history. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub channel: Option<ChannelId>,
    pub page: u32,
    pub added_only: bool,
}

/// Channel-point reward configuration as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RewardConfig {
    #[serde(rename = "OwnerTwitchID")]
    pub owner_twitch_id: ChannelId,
    #[serde(rename = "Type")]
    pub reward_type: RewardType,
    #[serde(rename = "RewardID", default, skip_serializing_if = "Option::is_none")]
    pub reward_id: Option<RewardId>,
    pub approve_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub prompt: String,
    pub cost: u32,
    pub background_color: String,
    pub is_max_per_stream_enabled: bool,
    pub max_per_stream: u32,
    pub is_user_input_required: bool,
    pub is_max_per_user_per_stream_enabled: bool,
    pub max_per_user_per_stream: u32,
    pub is_global_cooldown_enabled: bool,
    pub global_cooldown_seconds: u32,
    pub should_redemptions_skip_request_queue: bool,
    pub enabled: bool,
    /// Free-form per-type options blob, e.g. the managed slot count.
    pub additional_options: String,
}
