use anyhow::{Context, Result};
use clap::Args;
use peerate_application::SessionUseCase;
use peerate_core::config::PeerateConfig;
use peerate_core::session::{CreateSessionRequest, Credential, RatingSubmission, RatingValue};
use peerate_infrastructure::{ChannelBroadcaster, InMemorySessionRepository, OutboundReceiver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::utils::split_list;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Participant names (repeat the flag or separate with commas)
    #[arg(short, long = "participant", default_value = "alice,bob,carol,dave")]
    pub participants: Vec<String>,

    /// Topics to rate (repeat the flag or separate with commas)
    #[arg(short, long = "topic", default_value = "communication")]
    pub topics: Vec<String>,

    /// Countdown in seconds
    #[arg(long, default_value_t = 3)]
    pub timer: u64,

    /// Participants who never submit and get skipped when the countdown expires
    #[arg(long)]
    pub abstain: Vec<String>,

    #[arg(long)]
    pub anonymous: bool,

    #[arg(long)]
    pub game: bool,

    /// Seed for the random scores
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn run(args: SimulateArgs, config: PeerateConfig) -> Result<()> {
    let abstaining = split_list(&args.abstain);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let broadcaster = Arc::new(ChannelBroadcaster::new());
    let usecase = Arc::new(SessionUseCase::new(
        Arc::new(InMemorySessionRepository::new()),
        broadcaster.clone(),
        config.clone(),
    ));

    let created = usecase
        .create_session(CreateSessionRequest {
            participants: split_list(&args.participants),
            timer_seconds: Some(args.timer),
            is_anonymous: args.anonymous,
            is_game_mode: args.game,
            topics: split_list(&args.topics),
        })
        .await?;
    let session_id = created.session_id.clone();
    tracing::info!(session_id = %session_id, "simulation started");

    let mut inboxes: Vec<(String, OutboundReceiver)> = Vec::new();
    for link in &created.participant_links {
        let (connection, rx) = broadcaster.connect().await;
        usecase
            .join_session(&session_id, &connection, &Credential::Token(link.token.clone()))
            .await?;
        inboxes.push((link.participant.clone(), rx));
    }
    let (admin, admin_rx) = broadcaster.connect().await;
    usecase
        .join_session(&session_id, &admin, &Credential::Admin)
        .await?;
    inboxes.push(("(admin)".to_string(), admin_rx));

    usecase.start_timer(&session_id).await?;

    let names: Vec<String> = created
        .participant_links
        .iter()
        .map(|link| link.participant.clone())
        .collect();
    let topics = split_list(&args.topics);
    for rater in names.iter().filter(|name| !abstaining.contains(name)) {
        let submission = random_submission(&mut rng, &config, rater, &names, &topics);
        usecase
            .submit_ratings(&session_id, rater, &submission)
            .await
            .with_context(|| format!("Submission of {rater} was rejected"))?;
    }

    if usecase.timer_pending(&session_id) {
        tracing::info!(seconds = args.timer, "waiting for the countdown");
        tokio::time::sleep(Duration::from_secs(args.timer) + Duration::from_millis(250)).await;
    }

    for (viewer, mut rx) in inboxes {
        println!("== {viewer}");
        while let Ok(message) = rx.try_recv() {
            println!("  {:<16} {}", message.event, message.payload);
        }
    }
    Ok(())
}

fn random_submission(
    rng: &mut impl Rng,
    config: &PeerateConfig,
    rater: &str,
    names: &[String],
    topics: &[String],
) -> RatingSubmission {
    let mut submission = RatingSubmission::new();
    for target in names.iter().filter(|name| name.as_str() != rater) {
        let per_topic: BTreeMap<String, RatingValue> = topics
            .iter()
            .map(|topic| {
                let score = rng.gen_range(config.rating.range());
                (topic.clone(), RatingValue::Score(score))
            })
            .collect();
        submission.insert(target.clone(), per_topic);
    }
    submission
}
