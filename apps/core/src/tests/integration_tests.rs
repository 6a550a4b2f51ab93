//! Integration Tests
//!
//! End-to-end conversations: profile file on disk, scripted supervisor,
//! display events.

use crate::actors::messages::TurnEvent;
use crate::actors::supervisor::SupervisorHandle;
use crate::config::{AppConfig, ResponseMode};
use crate::models::{PortfolioProfile, Role, TurnStatus};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Writes a profile file based on the sample with a different owner.
fn profile_file(name: &str) -> NamedTempFile {
    let mut profile = PortfolioProfile::default();
    profile.name = name.to_string();
    profile.skills.frontend = vec!["Svelte".to_string(), "Elm".to_string()];

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(serde_json::to_string_pretty(&profile).unwrap().as_bytes())
        .unwrap();
    file
}

fn scripted_config(profile: &NamedTempFile) -> AppConfig {
    AppConfig {
        mode: ResponseMode::Scripted,
        profile_path: Some(profile.path().to_path_buf()),
        reveal_delay: Duration::ZERO,
        ..AppConfig::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_scripted_conversation_from_profile_file() {
    let file = profile_file("Sam Rivera");
    let config = scripted_config(&file);
    let profile = PortfolioProfile::load_or_default(config.profile_path.as_deref()).unwrap();
    let supervisor = SupervisorHandle::new(&config, profile, None);

    let welcome = supervisor.transcript().await.unwrap();
    assert_eq!(welcome.len(), 1);
    assert!(welcome[0].content.contains("Sam Rivera"));

    let skills = supervisor
        .send_message("What are your skills?".to_string())
        .await
        .unwrap();
    assert_eq!(skills.quick_replies.len(), 3);

    // Pick "Frontend Skills" the way the terminal does: by its value.
    let frontend_value = skills.quick_replies[0].value.clone();
    let frontend = supervisor.send_message(frontend_value).await.unwrap();
    assert!(frontend.content.contains("Svelte, Elm"));
    assert!(!frontend.content.contains("React.js"));

    let transcript = supervisor.transcript().await.unwrap();
    let roles: Vec<Role> = transcript.iter().map(|t| t.role).collect();
    assert_eq!(
        roles,
        vec![Role::Assistant, Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert!(transcript.iter().all(|t| t.status == TurnStatus::Complete));

    let context = supervisor.context().await.unwrap();
    assert_eq!(context.questions_asked, 2);
    assert!(context.mentioned_skills.contains("Elm"));
}

#[tokio::test]
async fn test_turns_are_processed_one_at_a_time() {
    let file = profile_file("Sam Rivera");
    let config = scripted_config(&file);
    let profile = PortfolioProfile::load_or_default(config.profile_path.as_deref()).unwrap();
    let supervisor = SupervisorHandle::new(&config, profile, None);

    let inputs = ["skills", "contact", "Who are you?", "banana", "Show me your projects"];
    let handles: Vec<_> = inputs
        .iter()
        .map(|input| {
            let supervisor = supervisor.clone();
            let input = input.to_string();
            tokio::spawn(async move { supervisor.send_message(input).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let transcript = supervisor.transcript().await.unwrap();
    assert_eq!(transcript.len(), 1 + inputs.len() * 2);
    // Strict alternation after the welcome: no reply was interleaved.
    for pair in transcript[1..].chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Assistant);
        assert!(!pair[1].is_pending());
    }
    assert_eq!(supervisor.context().await.unwrap().questions_asked, 5);
}

#[tokio::test]
async fn test_reveal_events_end_with_full_reply() {
    let file = profile_file("Sam Rivera");
    let config = AppConfig {
        reveal_delay: Duration::from_millis(1),
        ..scripted_config(&file)
    };
    let profile = PortfolioProfile::load(file.path()).unwrap();
    let (tx, mut rx) = mpsc::channel(1024);
    let supervisor = SupervisorHandle::new(&config, profile, Some(tx));

    let turn = supervisor.send_message("contact".to_string()).await.unwrap();

    let mut last_partial = None;
    let mut completed = None;
    while let Ok(event) = rx.try_recv() {
        match event {
            TurnEvent::Token { partial, .. } => last_partial = Some(partial),
            TurnEvent::Completed { content, .. } => completed = Some(content),
            _ => {}
        }
    }
    assert_eq!(last_partial.as_deref(), Some(turn.content.as_str()));
    assert_eq!(completed.as_deref(), Some(turn.content.as_str()));
}

#[tokio::test]
async fn test_remote_mode_without_key_degrades_visibly() {
    let config = AppConfig {
        mode: ResponseMode::Remote,
        reveal_delay: Duration::ZERO,
        ..AppConfig::default()
    };
    assert!(config.completion.api_key.is_none());

    let supervisor = SupervisorHandle::new(&config, PortfolioProfile::default(), None);
    let turn = supervisor.send_message("Who are you?".to_string()).await.unwrap();

    assert!(turn.content.contains("not configured"));
    assert!(turn.quick_replies.iter().any(|q| q.value == "Start over"));
}
