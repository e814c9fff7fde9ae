use anyhow::Result;
use clap::Args;
use peerate_application::CreatedSession;
use peerate_core::config::PeerateConfig;
use peerate_core::session::CreateSessionRequest;

use super::utils::{split_list, stored_usecase};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Participant names (repeat the flag or separate with commas)
    #[arg(short, long = "participant", required = true)]
    pub participants: Vec<String>,

    /// Topics to rate (repeat the flag or separate with commas)
    #[arg(short, long = "topic", required = true)]
    pub topics: Vec<String>,

    /// Countdown in seconds; falls back to `default_timer_seconds`
    #[arg(long)]
    pub timer: Option<u64>,

    /// Reveal only private per-player aggregates
    #[arg(long)]
    pub anonymous: bool,

    /// Reveal the ledger to everyone once all players submitted
    #[arg(long)]
    pub game: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CreateArgs {
    pub fn into_request(self, config: &PeerateConfig) -> CreateSessionRequest {
        CreateSessionRequest {
            participants: split_list(&self.participants),
            timer_seconds: self.timer.or(config.default_timer_seconds),
            is_anonymous: self.anonymous,
            is_game_mode: self.game,
            topics: split_list(&self.topics),
        }
    }
}

pub async fn run(args: CreateArgs, config: PeerateConfig) -> Result<()> {
    let json = args.json;
    let request = args.into_request(&config);
    let (usecase, _) = stored_usecase(&config).await?;

    let created = usecase.create_session(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        print_created(&created);
    }
    Ok(())
}

fn print_created(created: &CreatedSession) {
    println!("Session {}", created.session_id);
    println!();
    for link in &created.participant_links {
        println!("  {:<16} {}", link.participant, link.link);
    }
    println!();
    println!("  {:<16} {}", "(admin)", created.admin_link);
}
