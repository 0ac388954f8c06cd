/// Quantization steps per unit ratio. One step is `1 / SCALE` of a canvas side.
pub const SCALE: i64 = 10_000;

/// Added to every ratio-encoded value so it can't be confused with a legacy pixel offset.
pub const OFFSET: i64 = 1_000_000;

/// Reference canvas width legacy `pos_x` values were measured against.
pub const LEGACY_WIDTH: f64 = 660.0;

/// Reference canvas height legacy `pos_y` values were measured against.
pub const LEGACY_HEIGHT: f64 = 860.0;

pub const MAX_MESSAGE_CHARS: usize = 120;

pub const ADMIN_HEADER: &str = "x-user-id";
