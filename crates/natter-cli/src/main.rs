//! `natter`, a command-line client for the Natter chat server.
//!
//! # Usage
//!
//! ```text
//! natter register alice s3cret
//! natter --user-id 1 send --channel 2 "hello"
//! natter history --channel 2 --follow
//! natter --config ~/.config/natter/config.toml channels
//! ```

mod client;
mod history;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use client::ApiClient;
use history::Cursor;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "natter", about = "Command-line client for the Natter chat server")]
struct Args {
  /// Path to a TOML config file (url, user_id).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the natter server (default: http://localhost:8080).
  #[arg(long, env = "NATTER_URL")]
  url: Option<String>,

  /// User ID to post as; overrides the config file.
  #[arg(long, env = "NATTER_USER_ID")]
  user_id: Option<i64>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a user and print its ID.
  Register { username: String, password: String },
  /// Check credentials and print the matching user ID.
  Login { username: String, password: String },
  /// List all channels.
  Channels,
  /// Create a channel and print its ID.
  CreateChannel { name: String },
  /// Post a message to a channel.
  Send {
    #[arg(long)]
    channel: i64,
    text:    String,
  },
  /// Print a channel's messages, oldest first.
  History {
    #[arg(long)]
    channel:  i64,
    /// Only show messages with an ID greater than this.
    #[arg(long, default_value_t = 0)]
    after:    i64,
    /// Page size used while walking the channel; at most the server's `max_page_size`.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(i64).range(1..))]
    limit:    i64,
    /// Keep polling for new messages.
    #[arg(long)]
    follow:   bool,
    /// Seconds between polls with `--follow`.
    #[arg(long, default_value_t = 2)]
    interval: u64,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  user_id: Option<i64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8080".to_string());
  let user_id = args.user_id.or(file_cfg.user_id);

  let client = ApiClient::new(base_url)?;
  tracing::debug!(?user_id, "client ready");

  match args.command {
    Command::Register { username, password } => {
      let id = client.register(&username, &password).await?;
      println!("registered {username} as user {id}");
    }
    Command::Login { username, password } => {
      let id = client.login(&username, &password).await?;
      println!("{id}");
    }
    Command::Channels => {
      for channel in client.list_channels().await? {
        println!("{}\t{}", channel.id, channel.name);
      }
    }
    Command::CreateChannel { name } => {
      let id = client.create_channel(&name).await?;
      println!("created channel {name} with id {id}");
    }
    Command::Send { channel, text } => {
      let user_id = user_id.ok_or_else(|| anyhow!("--user-id (or user_id in the config file) is required to send"))?;
      let id = client.send_message(channel, user_id, &text).await?;
      println!("{id}");
    }
    Command::History { channel, after, limit, follow, interval } => {
      let mut cursor = Cursor { channel_id: channel, after_id: after, limit };
      let mut print  = |m: &client::Message| println!("{}", history::format_line(m));
      if follow {
        history::follow(&client, &mut cursor, Duration::from_secs(interval), &mut print).await?;
      } else {
        history::drain(&client, &mut cursor, &mut print).await?;
      }
    }
  }

  Ok(())
}
