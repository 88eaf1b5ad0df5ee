//! Level progression, gravity timing and line-clear scoring

/// Pieces that must be placed to advance one level
pub const PIECES_PER_LEVEL: u32 = 70;

/// Gravity period at level 0, in milliseconds
const BASE_DROP_MS: f64 = 1000.0;

/// Grace period a grounded piece gets before it locks, in milliseconds
pub const LANDING_MS: f64 = 500.0;

/// Difficulty tier for a given number of placed pieces
pub fn level(pieces: u32) -> u32 {
    pieces / PIECES_PER_LEVEL
}

/// Milliseconds between gravity steps: `(0.8 - 0.001 * level) ^ level` seconds
pub fn drop_period(level: u32) -> f64 {
    if level == 0 {
        return BASE_DROP_MS;
    }
    let level = level as f64;
    (0.8 - 0.001 * level).powf(level) * BASE_DROP_MS
}

/// Points for clearing `rows` rows at once: `(2^rows - 1) * (level + 1)`
pub fn clear_score(rows: usize, level: u32) -> u64 {
    if rows == 0 {
        return 0;
    }
    let multiplier = (1u64 << rows.min(63)) - 1;
    multiplier.saturating_mul(level as u64 + 1)
}
