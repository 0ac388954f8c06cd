use axum::http::HeaderMap;
use board::{
    Point, Viewport,
    constants::{ADMIN_HEADER, MAX_MESSAGE_CHARS},
    models::{Note, Tree, TreeType},
};
use futures_util::{StreamExt, stream};
use tracing::warn;

use crate::{
    error::AppError::{self, MalformedPayload},
    state::State,
};

pub fn check_message(message: &str) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(MalformedPayload("message is empty"));
    }

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(MalformedPayload("message is too long"));
    }

    Ok(())
}

/// Trimmed, non-empty text for comments, tree names and keys.
pub fn required_text(text: &str, field: &'static str) -> Result<String, AppError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(MalformedPayload(field));
    }

    Ok(trimmed.to_string())
}

pub fn check_click(viewport: &Viewport, click: Point) -> Result<(), AppError> {
    if viewport.is_degenerate() {
        return Err(AppError::DegenerateViewport);
    }

    if !viewport.contains_tree(click) {
        return Err(AppError::OutsideTree);
    }

    Ok(())
}

pub fn is_member(trees: &[Tree], tree_id: u64) -> bool {
    trees.iter().any(|tree| tree.tree_id == tree_id)
}

pub fn first_public(trees: Vec<Tree>) -> Option<Tree> {
    trees
        .into_iter()
        .find(|tree| tree.tree_type == TreeType::Public)
}

pub fn admin_id(headers: &HeaderMap) -> Result<u64, AppError> {
    headers
        .get(ADMIN_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(AppError::Unidentified)
}

/// Like counts in note order. A count that can't be fetched shows as zero.
pub async fn like_counts(state: &State, notes: &[Note]) -> Vec<u64> {
    let note_ids: Vec<u64> = notes.iter().map(|note| note.note_id).collect();

    stream::iter(note_ids)
        .map(|note_id| async move {
            state.remote.like_count(note_id).await.unwrap_or_else(|e| {
                warn!("Like count for note {note_id} unavailable: {e}");
                0
            })
        })
        .buffered(state.config.like_fetch_concurrency)
        .collect()
        .await
}
