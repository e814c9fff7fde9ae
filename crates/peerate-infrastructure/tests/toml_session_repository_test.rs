use peerate_core::config::PeerateConfig;
use peerate_core::session::{
    CreateSessionRequest, Rating, RatingValue, Session, SessionPhase, SessionRepository,
};
use peerate_infrastructure::TomlSessionRepository;
use tempfile::TempDir;

fn new_session(anonymous: bool) -> Session {
    CreateSessionRequest {
        participants: ["alice", "bob", "carol", "dave"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        timer_seconds: Some(30),
        is_anonymous: anonymous,
        is_game_mode: false,
        topics: vec!["clarity".into(), "pace".into()],
    }
    .into_session(&PeerateConfig::default())
    .unwrap()
}

#[tokio::test]
async fn test_round_trip_preserves_ledger_and_timer() {
    let temp_dir = TempDir::new().unwrap();
    let repo = TomlSessionRepository::new(temp_dir.path()).await.unwrap();

    let mut session = new_session(true);
    repo.create(&session).await.unwrap();

    session.arm_timer(chrono::Utc::now());
    session.ratings.submit(
        "alice",
        vec![
            Rating {
                rater: "alice".into(),
                target: "bob".into(),
                topic: "clarity".into(),
                value: RatingValue::Score(7),
            },
            Rating {
                rater: "alice".into(),
                target: "bob".into(),
                topic: "pace".into(),
                value: RatingValue::Skipped,
            },
        ],
    );
    repo.save(&session).await.unwrap();

    let loaded = repo.find_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded, session);
    assert_eq!(loaded.phase, SessionPhase::Active);
    assert!(loaded.is_current_timer(session.timer_started_at.unwrap()));
}

#[tokio::test]
async fn test_create_twice_conflicts() {
    let temp_dir = TempDir::new().unwrap();
    let repo = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
    let session = new_session(false);

    repo.create(&session).await.unwrap();
    let err = repo.create(&session).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let repo = TomlSessionRepository::new(temp_dir.path()).await.unwrap();

    assert!(repo.find_by_id("missing-id").await.unwrap().is_none());
    assert!(repo.find_by_id("../escape").await.unwrap().is_none());
    assert!(repo.find_by_id("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sessions_are_stored_as_toml_files() {
    let temp_dir = TempDir::new().unwrap();
    let repo = TomlSessionRepository::new(temp_dir.path()).await.unwrap();
    let session = new_session(false);
    repo.create(&session).await.unwrap();

    let path = repo.sessions_dir().join(format!("{}.toml", session.id));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("mode = \"public\""));
    assert!(content.contains("[tokens]"));
}
