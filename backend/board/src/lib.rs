//! # Tree Board
//!
//! Shared pieces of the Christmas tree note board: the coordinate scheme notes are pinned
//! with, the resource shapes of the note-board API and a typed client for it.
//!
//! ## Coordinates
//!
//! Users click the tree image to pin a note. The click is stored as a device-independent
//! integer per axis so the note stays on the same branch whatever the screen size. See
//! [`position`] for the scheme and [`canvas`] for the viewport helpers built on it.
//!
//! ## Remote
//!
//! Notes, likes, comments, trees and moderation all live behind the note-board REST API.
//! [`remote::RemoteBoard`] wraps it; the gateway and the `inspect` CLI both go through it.
pub mod canvas;
pub mod constants;
pub mod error;
pub mod models;
pub mod position;
pub mod remote;

pub use canvas::{Point, Viewport};
pub use error::RemoteError;
pub use position::{Axis, StoredCoordinate, decode, encode};
pub use remote::RemoteBoard;
