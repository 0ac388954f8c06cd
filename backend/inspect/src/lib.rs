//! # Inspect
//!
//! Operator tooling for stored note coordinates.
//!
//! ## Audit
//!
//! Walks every tree a user joined and counts how many notes still carry legacy pixel
//! coordinates. Legacy notes render fine, rescaled from the 660×860 reference canvas, but
//! they can only be told apart from ratio-encoded ones by value range, so the audit is how
//! we find out how many are left.
//!
//! ```sh
//! inspect --api-url http://localhost:3000 user 4 --width 660 --height 860 --verbose
//! ```
use std::time::Duration;

use anyhow::Context;
use board::{Axis, RemoteBoard, StoredCoordinate, Viewport, decode, models::PlacedNote};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

pub mod utils;

use utils::TreeReport;

const TIMEOUT: Duration = Duration::from_secs(10);

pub fn describe(stored: i64, dimension: f64, axis: Axis) -> String {
    let scheme = match StoredCoordinate::from_stored(stored) {
        StoredCoordinate::Legacy(_) => "legacy",
        StoredCoordinate::Ratio(_) => "ratio",
    };

    format!("{:.2} ({scheme})", decode(Some(stored), dimension, axis))
}

pub async fn audit_user(
    api_url: &str,
    user_id: u64,
    viewport: Viewport,
    verbose: bool,
) -> anyhow::Result<()> {
    let remote = RemoteBoard::new(api_url, TIMEOUT)?;

    let trees = remote
        .user_trees(user_id)
        .await
        .with_context(|| format!("Fetching trees of user {user_id}"))?;

    println!("Loaded Trees: {}\n", trees.len());

    let pb = ProgressBar::new(trees.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut reports = Vec::with_capacity(trees.len());

    for tree in trees {
        pb.set_message(format!("Fetching {}", tree.tree_name));

        let notes = match remote.tree_notes(tree.tree_id).await {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Skipping tree {}: {e}", tree.tree_id);
                pb.inc(1);
                continue;
            }
        };

        let report = TreeReport::from_notes(&tree, &notes);

        if verbose {
            pb.suspend(|| {
                for note in notes {
                    println!("{}", utils::note_line(&PlacedNote::place(note, &viewport, 0)));
                }
            });
        }

        reports.push(report);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!();
    for report in &reports {
        println!("{report}");
    }

    let total = TreeReport::total(&reports);
    println!("\n{total}");

    Ok(())
}
