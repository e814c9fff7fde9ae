use anyhow::Result;
use clap::Args;
use peerate_core::config::PeerateConfig;
use peerate_core::session::Credential;

use super::utils::stored_usecase;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Session ID printed by `create`
    pub session_id: String,

    /// Participant token; omit to view as admin
    #[arg(long)]
    pub token: Option<String>,
}

pub async fn run(args: ShowArgs, config: PeerateConfig) -> Result<()> {
    let (usecase, broadcaster) = stored_usecase(&config).await?;
    let (connection, _rx) = broadcaster.connect().await;

    let credential = match args.token {
        Some(token) => Credential::Token(token),
        None => Credential::Admin,
    };
    let snapshot = usecase
        .join_session(&args.session_id, &connection, &credential)
        .await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
