use std::fmt;

use board::{
    StoredCoordinate,
    models::{Note, PlacedNote, Tree},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeReport {
    pub name: String,
    pub notes: usize,
    pub legacy: usize,
    pub ratio: usize,
    pub missing: usize,
}

impl TreeReport {
    pub fn from_notes(tree: &Tree, notes: &[Note]) -> Self {
        let mut report = TreeReport {
            name: tree.tree_name.clone(),
            notes: notes.len(),
            ..Default::default()
        };

        for note in notes {
            match (note.pos_x, note.pos_y) {
                (Some(pos_x), Some(pos_y)) => {
                    let legacy = StoredCoordinate::from_stored(pos_x).is_legacy()
                        || StoredCoordinate::from_stored(pos_y).is_legacy();

                    if legacy {
                        report.legacy += 1;
                    } else {
                        report.ratio += 1;
                    }
                }
                _ => report.missing += 1,
            }
        }

        report
    }

    pub fn total(reports: &[TreeReport]) -> Self {
        reports.iter().fold(
            TreeReport {
                name: "Total".to_string(),
                ..Default::default()
            },
            |mut total, report| {
                total.notes += report.notes;
                total.legacy += report.legacy;
                total.ratio += report.ratio;
                total.missing += report.missing;
                total
            },
        )
    }
}

impl fmt::Display for TreeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} notes, {} ratio, {} legacy, {} missing",
            self.name, self.notes, self.ratio, self.legacy, self.missing
        )
    }
}

fn stored(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn note_line(note: &PlacedNote) -> String {
    format!(
        "#{} ({}, {}) -> ({:.1}, {:.1}) {}",
        note.note_id,
        stored(note.pos_x),
        stored(note.pos_y),
        note.x,
        note.y,
        note.message
    )
}

#[cfg(test)]
mod tests {
    use board::{Viewport, constants::OFFSET, models::TreeType};

    use super::*;

    fn note(note_id: u64, pos_x: Option<i64>, pos_y: Option<i64>) -> Note {
        Note {
            note_id,
            message: format!("note {note_id}"),
            pos_x,
            pos_y,
            author: None,
            user_id: None,
            is_hidden: false,
        }
    }

    fn tree() -> Tree {
        Tree {
            tree_id: 1,
            tree_name: "plaza".to_string(),
            tree_type: TreeType::Public,
            tree_key: None,
            owner_id: None,
        }
    }

    #[test]
    fn test_report_counts() {
        let notes = [
            note(1, Some(OFFSET + 10), Some(OFFSET + 20)),
            note(2, Some(120), Some(300)),
            note(3, Some(OFFSET + 10), Some(300)),
            note(4, None, Some(OFFSET)),
        ];
        let report = TreeReport::from_notes(&tree(), &notes);

        assert_eq!(report.notes, 4);
        assert_eq!(report.ratio, 1);
        assert_eq!(report.legacy, 2);
        assert_eq!(report.missing, 1);
    }

    #[test]
    fn test_total() {
        let first = TreeReport::from_notes(&tree(), &[note(1, Some(1), Some(2))]);
        let second = TreeReport::from_notes(
            &tree(),
            &[note(2, Some(OFFSET), Some(OFFSET)), note(3, None, None)],
        );
        let total = TreeReport::total(&[first, second]);

        assert_eq!(total.name, "Total");
        assert_eq!(total.notes, 3);
        assert_eq!(total.legacy, 1);
        assert_eq!(total.ratio, 1);
        assert_eq!(total.missing, 1);
    }

    #[test]
    fn test_display() {
        let report = TreeReport::from_notes(&tree(), &[note(1, Some(1), Some(2))]);

        assert_eq!(report.to_string(), "plaza: 1 notes, 0 ratio, 1 legacy, 0 missing");
    }

    #[test]
    fn test_note_line() {
        let placed = PlacedNote::place(
            note(7, Some(OFFSET + 5000), None),
            &Viewport::new(660.0, 860.0),
            0,
        );

        assert_eq!(note_line(&placed), "#7 (1005000, -) -> (330.0, 0.0) note 7");
    }
}
