//! Word-by-word reveal of an already composed reply.
//!
//! Purely cosmetic. The reply is complete before the first frame is sent and
//! the transcript is updated in one step regardless of what happens here.

use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::actors::messages::TurnEvent;

/// Cursor appended to every frame except the last.
pub const CURSOR: char = '▋';

/// Progressive frames of `content`, one per space-separated word.
pub fn word_frames(content: &str) -> Vec<String> {
    let words: Vec<&str> = content.split(' ').collect();
    let mut frames = Vec::with_capacity(words.len());
    let mut shown = String::new();

    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            shown.push(' ');
        }
        shown.push_str(word);
        if i + 1 == words.len() {
            frames.push(shown.clone());
        } else {
            frames.push(format!("{}{}", shown, CURSOR));
        }
    }
    frames
}

/// Sends each frame of `content` as a [`TurnEvent::Token`], pausing `delay`
/// between frames. Stops quietly when the receiver is gone.
pub async fn stream_words(
    turn_id: Uuid,
    content: &str,
    delay: Duration,
    events: &mpsc::Sender<TurnEvent>,
) {
    for frame in word_frames(content) {
        if events
            .send(TurnEvent::Token {
                turn_id,
                partial: frame,
            })
            .await
            .is_err()
        {
            return;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
