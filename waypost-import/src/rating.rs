//! Ratings blob interpretation
//!
//! Source files carry ratings either as a JSON numeric array (`[3, 4, 5]`)
//! or as a bare comma-separated list (`3, 4, 5`). Both forms reduce to the
//! same average; anything unparsable yields no rating rather than an error.

/// Compute the average of a raw ratings payload, rounded to 2 decimal
/// places with ties going to the even neighbor. Returns `None` when no
/// usable rating can be derived.
///
/// The comma-list path is all-or-nothing: a single non-numeric token voids
/// the whole computation instead of being dropped.
pub fn average_rating(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let ratings: Vec<f64> = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        serde_json::from_str(trimmed).ok()?
    } else {
        trimmed
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| token.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .ok()?
    };

    if ratings.is_empty() {
        return None;
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    Some(round_half_to_even(mean, 2))
}

// Ties go to the even neighbor (0.125 -> 0.12, 0.375 -> 0.38), not away
// from zero as `f64::round` would.
fn round_half_to_even(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let floor = scaled.floor();
    let diff = scaled - floor;
    let rounded = if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded / factor
}
