use serde::{Deserialize, Serialize};

use crate::position::{Axis, decode, encode, is_usable};

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel size of the tree canvas as currently laid out on the client.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !is_usable(self.width) || !is_usable(self.height)
    }

    /// Stored `(pos_x, pos_y)` for a click at `click`.
    pub fn encode(&self, click: Point) -> (i64, i64) {
        (encode(click.x, self.width), encode(click.y, self.height))
    }

    /// Where a stored position renders on this canvas.
    pub fn place(&self, pos_x: Option<i64>, pos_y: Option<i64>) -> Point {
        Point {
            x: decode(pos_x, self.width, Axis::X),
            y: decode(pos_y, self.height, Axis::Y),
        }
    }

    /// Whether `click` falls on the tree graphic.
    ///
    /// The tree is a triangle with its tip at the top center; it widens by
    /// `width / height` pixels on each side per pixel down.
    pub fn contains_tree(&self, click: Point) -> bool {
        if self.is_degenerate() {
            return false;
        }

        let center = self.width / 2.0;
        let spread = (self.width / self.height) * click.y;

        click.x >= center - spread && click.x <= center + spread
    }
}
