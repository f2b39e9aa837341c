use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{rewards::RewardClient, ApiContext, EmoteHistoryController, HttpEmoteHistoryApi};
use shared::domain::{ChannelId, EmoteId, RewardType};

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "emotedash",
    about = "Emote history and reward management against a dashboard backend"
)]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Channel to operate on; defaults to the configured managed channel.
    #[arg(long)]
    channel: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists one page of the channel's emote history.
    History {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only records that added an emote.
        #[arg(long)]
        added: bool,
    },
    /// Deletes the history record for an emote.
    Remove { emote_id: String },
    /// Flags the history record for an emote as blocked.
    Block { emote_id: String },
    /// Lists the channel's reward configurations as JSON.
    Rewards,
    /// Deletes a reward configuration (bttv or seventv).
    DeleteReward { reward_type: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let settings = config::load_settings();

    let base_url = cli.api_base_url.unwrap_or_else(|| settings.api_base_url.clone());
    let mut context = ApiContext::new(&base_url)?;
    if let Some(managing) = &settings.managing {
        context = context.with_managing(ChannelId::new(managing.clone()));
    }
    if let Some(token) = &settings.session_token {
        context = context.with_session_token(token.clone());
    }

    let channel = cli
        .channel
        .or_else(|| settings.managing.clone())
        .map(ChannelId::new);

    match cli.command {
        Command::History { page, added } => {
            let api = Arc::new(HttpEmoteHistoryApi::new(context));
            let controller = EmoteHistoryController::new(api, added, channel);
            controller.fetch().await?;
            while controller.page().await < page {
                if !controller.next_page().await? {
                    break;
                }
            }

            let view = controller.snapshot().await;
            println!("page {} ({} records)", view.page, view.items.len());
            for item in &view.items {
                println!(
                    "{}  {:<7} {:<14} {}{}",
                    item.created_at.to_rfc3339(),
                    item.provider.as_str(),
                    item.change_type.as_str(),
                    item.emote_id,
                    if item.blocked { "  [blocked]" } else { "" }
                );
            }
        }
        Command::Remove { emote_id } => {
            let api = Arc::new(HttpEmoteHistoryApi::new(context));
            let controller = EmoteHistoryController::new(api, false, channel);
            controller.fetch().await?;
            controller.remove(&EmoteId::new(emote_id)).await?;
            println!(
                "removed; page now holds {} records",
                controller.snapshot().await.items.len()
            );
        }
        Command::Block { emote_id } => {
            let api = Arc::new(HttpEmoteHistoryApi::new(context));
            let controller = EmoteHistoryController::new(api, false, channel);
            controller.fetch().await?;
            controller.block(&EmoteId::new(emote_id)).await?;
            println!("blocked");
        }
        Command::Rewards => {
            let channel = require_channel(channel)?;
            let client = RewardClient::new(context);
            let rewards = client.list(&channel).await?;
            println!("{}", serde_json::to_string_pretty(&rewards)?);
        }
        Command::DeleteReward { reward_type } => {
            let channel = require_channel(channel)?;
            let reward_type = parse_reward_type(&reward_type)?;
            let client = RewardClient::new(context);
            client.delete(&channel, reward_type).await?;
            println!("deleted {} reward", reward_type.as_str());
        }
    }

    Ok(())
}

fn require_channel(channel: Option<ChannelId>) -> Result<ChannelId> {
    channel.ok_or_else(|| anyhow!("pass --channel or configure a managed channel"))
}

fn parse_reward_type(value: &str) -> Result<RewardType> {
    if value.eq_ignore_ascii_case("bttv") {
        Ok(RewardType::Bttv)
    } else if value.eq_ignore_ascii_case("seventv") {
        Ok(RewardType::Seventv)
    } else {
        Err(anyhow!("unknown reward type '{value}', expected bttv or seventv"))
    }
}
