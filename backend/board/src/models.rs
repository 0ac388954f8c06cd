//! # Board Resources
//!
//! JSON shapes exchanged with the note-board API. Field names follow the API (snake_case),
//! except `likeCount` which the API spells in camelCase.
//!
//! Flags such as `is_hidden` come back as `0`/`1` from the database layer, sometimes as
//! strings, so they go through [`flag`]. Coordinates written by older clients can be
//! fractional pixels, so they go through [`coordinate`].
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

use crate::canvas::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TreeType {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub tree_id: u64,
    pub tree_name: String,
    pub tree_type: TreeType,
    #[serde(default)]
    pub tree_key: Option<String>,
    #[serde(default)]
    pub owner_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTree {
    pub owner_id: u64,
    pub tree_name: String,
    pub tree_type: TreeType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTree {
    pub user_id: u64,
    #[serde(default)]
    pub tree_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: u64,
    pub message: String,
    #[serde(default, alias = "x", deserialize_with = "coordinate")]
    pub pos_x: Option<i64>,
    #[serde(default, alias = "y", deserialize_with = "coordinate")]
    pub pos_y: Option<i64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default, deserialize_with = "flag")]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: u64,
    pub message: String,
    pub pos_x: i64,
    pub pos_y: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreatedNote {
    pub note_id: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    #[serde(rename = "likeCount", default)]
    pub like_count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeRequest {
    pub user_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: u64,
    #[serde(default)]
    pub note_id: Option<u64>,
    #[serde(default)]
    pub author: Option<String>,
    pub content: String,
    #[serde(default, deserialize_with = "flag")]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub user_id: u64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub user_id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLog {
    #[serde(default)]
    pub actiontime: Option<String>,
    #[serde(default)]
    pub admin_id: Option<u64>,
    pub action: String,
    #[serde(default)]
    pub target_note: Option<u64>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub note_id: Option<u64>,
}

/// Moderation applied to a note or a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moderation {
    Show,
    Hide,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sanction {
    Block,
    Unblock,
}

impl Moderation {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "show" => Some(Moderation::Show),
            "hide" => Some(Moderation::Hide),
            "delete" => Some(Moderation::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Moderation::Show => "show",
            Moderation::Hide => "hide",
            Moderation::Delete => "delete",
        }
    }
}

impl Sanction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "block" => Some(Sanction::Block),
            "unblock" => Some(Sanction::Unblock),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sanction::Block => "block",
            Sanction::Unblock => "unblock",
        }
    }
}

impl fmt::Display for Moderation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Sanction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A note positioned for one particular canvas size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNote {
    pub note_id: u64,
    pub message: String,
    pub author: Option<String>,
    pub pos_x: Option<i64>,
    pub pos_y: Option<i64>,
    pub x: f64,
    pub y: f64,
    pub likes: u64,
}

impl PlacedNote {
    pub fn place(note: Note, viewport: &Viewport, likes: u64) -> Self {
        let point = viewport.place(note.pos_x, note.pos_y);

        Self {
            note_id: note.note_id,
            message: note.message,
            author: note.author,
            pos_x: note.pos_x,
            pos_y: note.pos_y,
            x: point.x,
            y: point.y,
            likes,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn rounded(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

/// Integers as-is, fractional pixels rounded, numeric strings parsed. Anything else is missing.
pub fn coordinate<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCoordinate>::deserialize(deserializer)?;

    Ok(match raw {
        Some(RawCoordinate::Int(value)) => Some(value),
        Some(RawCoordinate::Float(value)) => rounded(value),
        Some(RawCoordinate::Text(value)) => {
            let value = value.trim();
            value
                .parse::<i64>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().and_then(rounded))
        }
        Some(RawCoordinate::Other(_)) | None => None,
    })
}

/// Accepts `true`, `1`, `"1"` and `"true"` as set; everything else, including `null`, as unset.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawFlag>::deserialize(deserializer)?;

    Ok(match raw {
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Int(value)) => value == 1,
        Some(RawFlag::Text(value)) => {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true")
        }
        None => false,
    })
}
