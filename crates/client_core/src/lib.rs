use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::{ChannelId, EmoteId},
    error::ApiError,
    protocol::{EmoteHistoryEntry, HistoryQuery, RawEmoteHistoryRecord},
};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

pub mod rewards;

/// Items per history page; a full page is the only "has more" signal the
/// backend gives us.
pub const PAGE_SIZE: usize = 20;

const EMOTE_HISTORY_ENDPOINT: &str = "/api/emotehistory";

/// Ambient request context every dashboard API call carries: base URL, the
/// channel being managed on behalf of, and the session token. Passed
/// explicitly instead of read from any global store.
#[derive(Debug, Clone)]
pub struct ApiContext {
    base_url: String,
    managing: Option<ChannelId>,
    session_token: Option<String>,
}

impl ApiContext {
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("api base url must be http(s), got '{base_url}'"));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            managing: None,
            session_token: None,
        })
    }

    pub fn with_managing(mut self, channel: ChannelId) -> Self {
        self.managing = Some(channel);
        self
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = &self.session_token {
            request = request.bearer_auth(token);
        }
        if let Some(managing) = &self.managing {
            request = request.query(&[("managing", managing.as_str())]);
        }
        request
    }
}

/// Maps non-2xx responses to the backend's structured error body when it
/// sends one, or a bare status error otherwise.
async fn error_for_api_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    match response.json::<ApiError>().await {
        Ok(body) => Err(anyhow::Error::new(body)),
        Err(_) => Err(anyhow!("request failed with status {status}")),
    }
}

#[async_trait]
pub trait EmoteHistoryApi: Send + Sync {
    async fn fetch_page(&self, query: &HistoryQuery) -> Result<Vec<RawEmoteHistoryRecord>>;
    async fn delete_entry(&self, emote_id: &EmoteId) -> Result<()>;
    async fn block_entry(&self, emote_id: &EmoteId) -> Result<()>;
}

pub struct HttpEmoteHistoryApi {
    http: Client,
    context: ApiContext,
}

impl HttpEmoteHistoryApi {
    pub fn new(context: ApiContext) -> Self {
        Self {
            http: Client::new(),
            context,
        }
    }
}

#[async_trait]
impl EmoteHistoryApi for HttpEmoteHistoryApi {
    async fn fetch_page(&self, query: &HistoryQuery) -> Result<Vec<RawEmoteHistoryRecord>> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(channel) = &query.channel {
            pairs.push(("channel", channel.0.clone()));
        }
        pairs.push(("page", query.page.to_string()));
        if query.added_only {
            pairs.push(("added", "1".to_string()));
        }

        let request = self.context.apply(
            self.http
                .get(self.context.endpoint(EMOTE_HISTORY_ENDPOINT))
                .query(&pairs),
        );
        let records = error_for_api_status(request.send().await?)
            .await?
            .json()
            .await?;
        Ok(records)
    }

    async fn delete_entry(&self, emote_id: &EmoteId) -> Result<()> {
        let request = self.context.apply(
            self.http
                .delete(self.context.endpoint(EMOTE_HISTORY_ENDPOINT))
                .query(&[("emoteId", emote_id.as_str())]),
        );
        error_for_api_status(request.send().await?).await?;
        Ok(())
    }

    async fn block_entry(&self, emote_id: &EmoteId) -> Result<()> {
        let request = self.context.apply(
            self.http
                .patch(self.context.endpoint(EMOTE_HISTORY_ENDPOINT))
                .query(&[("emoteId", emote_id.as_str())]),
        );
        error_for_api_status(request.send().await?).await?;
        Ok(())
    }
}

/// Point-in-time view of the controller, handed out instead of a positional
/// tuple.
#[derive(Debug, Clone)]
pub struct HistoryView {
    pub items: Vec<EmoteHistoryEntry>,
    pub page: u32,
    pub loading: bool,
}

struct ControllerState {
    page: u32,
    items: Vec<EmoteHistoryEntry>,
    loading: bool,
    added_only: bool,
    channel: Option<ChannelId>,
    // Bumped whenever page, filter, or channel changes; a fetch dispatched
    // under an older epoch must not apply its response.
    fetch_epoch: u64,
}

/// Fetches, paginates, and mutates a channel's emote history.
///
/// All state lives behind one mutex that is never held across a network
/// await; concurrent fetches are serialized only at the apply step, where
/// stale responses are dropped by epoch comparison.
pub struct EmoteHistoryController {
    api: Arc<dyn EmoteHistoryApi>,
    inner: Mutex<ControllerState>,
}

impl EmoteHistoryController {
    pub fn new(api: Arc<dyn EmoteHistoryApi>, added_only: bool, channel: Option<ChannelId>) -> Self {
        Self {
            api,
            inner: Mutex::new(ControllerState {
                page: 1,
                items: Vec::new(),
                loading: false,
                added_only,
                channel,
                fetch_epoch: 0,
            }),
        }
    }

    /// Fetches the current page and applies the response unless the page
    /// moved on while the request was in flight. A stale response is dropped
    /// silently; every other failure propagates.
    pub async fn fetch(&self) -> Result<()> {
        let (epoch, query) = {
            let mut state = self.inner.lock().await;
            state.loading = true;
            (
                state.fetch_epoch,
                HistoryQuery {
                    channel: state.channel.clone(),
                    page: state.page,
                    added_only: state.added_only,
                },
            )
        };

        let records = self.api.fetch_page(&query).await?;

        let mut state = self.inner.lock().await;
        if state.fetch_epoch != epoch {
            debug!(
                stale_page = query.page,
                current_page = state.page,
                "discarding stale emote history response"
            );
            return Ok(());
        }

        let entries = records
            .into_iter()
            .map(EmoteHistoryEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        state.items = entries;
        state.loading = false;
        Ok(())
    }

    /// Advances to the next page and re-fetches. A partial current page means
    /// end-of-list, so this is a no-op then; returns whether it advanced.
    pub async fn next_page(&self) -> Result<bool> {
        {
            let mut state = self.inner.lock().await;
            if state.items.len() != PAGE_SIZE {
                return Ok(false);
            }
            state.page += 1;
            state.fetch_epoch += 1;
        }
        self.fetch().await?;
        Ok(true)
    }

    /// Steps back one page and re-fetches; no-op on page 1.
    pub async fn prev_page(&self) -> Result<bool> {
        {
            let mut state = self.inner.lock().await;
            if state.page <= 1 {
                return Ok(false);
            }
            state.page -= 1;
            state.fetch_epoch += 1;
        }
        self.fetch().await?;
        Ok(true)
    }

    /// Deletes the history entry for `emote_id`, then re-fetches the current
    /// page. The item is never removed locally first.
    pub async fn remove(&self, emote_id: &EmoteId) -> Result<()> {
        self.inner.lock().await.loading = true;
        self.api.delete_entry(emote_id).await?;
        self.fetch().await
    }

    /// Flags the history entry for `emote_id` as blocked, then re-fetches.
    pub async fn block(&self, emote_id: &EmoteId) -> Result<()> {
        self.inner.lock().await.loading = true;
        self.api.block_entry(emote_id).await?;
        self.fetch().await
    }

    /// Switches between "added only" and the full history. A real change
    /// resets pagination to page 1 and triggers exactly one fetch.
    pub async fn set_added_filter(&self, added_only: bool) -> Result<()> {
        {
            let mut state = self.inner.lock().await;
            if state.added_only == added_only {
                return Ok(());
            }
            state.added_only = added_only;
            state.page = 1;
            state.fetch_epoch += 1;
        }
        self.fetch().await
    }

    /// Retargets the controller at another channel and re-fetches. The page
    /// number is kept, matching how the dashboard behaves on a management
    /// switch.
    pub async fn set_channel(&self, channel: Option<ChannelId>) -> Result<()> {
        {
            let mut state = self.inner.lock().await;
            if state.channel == channel {
                return Ok(());
            }
            state.channel = channel;
            state.fetch_epoch += 1;
        }
        self.fetch().await
    }

    pub async fn snapshot(&self) -> HistoryView {
        let state = self.inner.lock().await;
        HistoryView {
            items: state.items.clone(),
            page: state.page,
            loading: state.loading,
        }
    }

    pub async fn page(&self) -> u32 {
        self.inner.lock().await.page
    }

    pub async fn loading(&self) -> bool {
        self.inner.lock().await.loading
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
