use crate::model::{Row, Scores};
use crate::text::{format_two_decimals, hundredths};

/// Trimmed total of the present judge scores.
///
/// Three or more scores drop exactly one lowest and one highest value
/// (even when they are equal); fewer scores are summed as-is.
pub fn aggregate(present: &[f64]) -> f64 {
    let sum: f64 = present.iter().sum();
    if present.len() < 3 {
        return sum;
    }
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    sum - min - max
}

pub fn scores_total(scores: &Scores) -> f64 {
    aggregate(&scores.present())
}

/// Derived total of a row. Team members are never scored.
pub fn row_total(row: &Row) -> f64 {
    row.entry().map(|e| scores_total(&e.scores)).unwrap_or(0.0)
}

/// Total in hundredths, used for every ranking comparison.
pub fn row_total_key(row: &Row) -> i64 {
    hundredths(row_total(row))
}

/// Two-decimal display; a zero total displays as empty.
pub fn display_total(total: f64) -> String {
    if hundredths(total) == 0 {
        String::new()
    } else {
        format_two_decimals(total)
    }
}
