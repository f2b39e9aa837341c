use anyhow::Result;
use reqwest::Client;
use shared::{
    domain::{ChannelId, RewardType},
    protocol::RewardConfig,
};

use crate::{error_for_api_status, ApiContext};

const REWARD_ENDPOINT: &str = "/api/reward";

/// Client for the channel-point reward configuration endpoints backing the
/// dashboard's reward forms.
pub struct RewardClient {
    http: Client,
    context: ApiContext,
}

impl RewardClient {
    pub fn new(context: ApiContext) -> Self {
        Self {
            http: Client::new(),
            context,
        }
    }

    pub async fn list(&self, channel: &ChannelId) -> Result<Vec<RewardConfig>> {
        let request = self.context.apply(
            self.http
                .get(self.context.endpoint(REWARD_ENDPOINT))
                .query(&[("channel", channel.as_str())]),
        );
        let configs = error_for_api_status(request.send().await?)
            .await?
            .json()
            .await?;
        Ok(configs)
    }

    /// Creates or replaces the reward configuration of `config.reward_type`
    /// for the channel.
    pub async fn save(&self, channel: &ChannelId, config: &RewardConfig) -> Result<()> {
        let request = self.context.apply(
            self.http
                .post(self.context.endpoint(REWARD_ENDPOINT))
                .query(&[
                    ("channel", channel.as_str()),
                    ("type", config.reward_type.as_str()),
                ])
                .json(config),
        );
        error_for_api_status(request.send().await?).await?;
        Ok(())
    }

    pub async fn delete(&self, channel: &ChannelId, reward_type: RewardType) -> Result<()> {
        let request = self.context.apply(
            self.http
                .delete(self.context.endpoint(REWARD_ENDPOINT))
                .query(&[
                    ("channel", channel.as_str()),
                    ("type", reward_type.as_str()),
                ]),
        );
        error_for_api_status(request.send().await?).await?;
        Ok(())
    }
}
