//! Pure scoring functions over session statistics.

/// Width of the performance bar in cells.
const GRAPH_WIDTH: usize = 24;

const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '░';

pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total as f64
    }
}

/// Estimated percentile for a given wpm.
///
/// Fixed calibration curve, not a statistical model: piecewise linear
/// with 25-point segments at 30, 60, and 90 wpm, capped at 99.
pub fn percentile(wpm: u64) -> f64 {
    let wpm = wpm as f64;
    if wpm < 30.0 {
        wpm / 30.0 * 25.0
    } else if wpm < 60.0 {
        25.0 + (wpm - 30.0) / 30.0 * 25.0
    } else if wpm < 90.0 {
        50.0 + (wpm - 60.0) / 30.0 * 25.0
    } else {
        (75.0 + (wpm - 90.0) / 30.0 * 25.0).min(99.0)
    }
}

/// Three-line textual summary of a final wpm: a fixed-width bar filled
/// one cell per 5 wpm, a marker under the leading edge, and a comment
/// bucketed by percentile.
pub fn performance_graph(wpm: u64) -> String {
    let filled = ((wpm / 5) as usize).min(GRAPH_WIDTH);

    let mut bar = String::with_capacity(GRAPH_WIDTH * FILLED_CELL.len_utf8());
    for _ in 0..filled {
        bar.push(FILLED_CELL);
    }
    for _ in filled..GRAPH_WIDTH {
        bar.push(EMPTY_CELL);
    }

    let mut marker = " ".repeat(filled.saturating_sub(1));
    marker.push('^');

    let pct = percentile(wpm);
    let comment = if pct < 25.0 {
        "keep at it, speed builds with mileage"
    } else if pct < 50.0 {
        "solid progress, past the beginner plateau"
    } else if pct < 75.0 {
        "above average, most typists trail you"
    } else {
        "top-tier speed, few typists get here"
    };

    format!("{bar}\n{marker}\n{comment}")
}
