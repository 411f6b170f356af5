//! Salary Parser. Turns free-form display strings ("$80K - $120K", "₩40M - ₩60M",
//! "$6K - $8K/month") into a single annual figure.
//!
//! Currency symbols are ignored, so "£45K" and "$45K" parse to the same number.
//! Callers comparing parsed salaries across postings inherit that conflation.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));

/// Markers that flag a monthly figure.
const MONTHLY_MARKERS: &[&str] = &["/month", "/mo", "월", "月"];

const MONTHS_PER_YEAR: u64 = 12;

/// Parses a salary display string into an annual estimate.
///
/// Returns `None` when the text holds no digits at all. That means "no salary
/// signal", not an error.
pub fn parse_salary(text: &str) -> Option<u64> {
    let mut figures = DIGIT_RUN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u64>().ok());

    let first = figures.next()?;
    let second = figures.next();

    let multiplier = unit_multiplier(text) * period_multiplier(text);
    let low = first.saturating_mul(multiplier);

    match second {
        Some(second) => {
            let high = second.saturating_mul(multiplier);
            Some(((low as f64 + high as f64) / 2.0).round() as u64)
        }
        None => Some(low),
    }
}

/// `M` beats `K` when both appear (e.g. "SEK 5M").
fn unit_multiplier(text: &str) -> u64 {
    if text.contains('M') {
        1_000_000
    } else if text.contains('K') {
        1_000
    } else {
        1
    }
}

fn period_multiplier(text: &str) -> u64 {
    let lower = text.to_lowercase();
    if MONTHLY_MARKERS.iter().any(|m| lower.contains(m)) {
        MONTHS_PER_YEAR
    } else {
        1
    }
}
