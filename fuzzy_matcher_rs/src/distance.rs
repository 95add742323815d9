use crate::confusion::ConfusionTable;
use crate::token::Token;

/// Computes the weighted edit distance between two token sequences.
///
/// The recurrence is standard Levenshtein with insertion and deletion at cost
/// `1.0` and substitution priced by the confusion table: equal tokens cost
/// `0.0`, confusable pairs cost their table entry in `(0, 1]`, everything else
/// costs `1.0`. Because the table is symmetric the distance is symmetric, and
/// the operands may be swapped freely, which keeps the working memory at
/// `O(min(|a|, |b|))` for the two-row evaluation.
pub fn weighted_edit_distance(a: &[Token], b: &[Token], confusion: &ConfusionTable) -> f64 {
    compute(a, b, confusion, f64::INFINITY).unwrap_or(f64::INFINITY)
}

/// Computes the weighted edit distance, giving up early when it cannot stay
/// within `cutoff`.
///
/// Returns `None` once every cell of a DP row exceeds `cutoff`, since the
/// final distance can only grow from there. Candidates scored during a match
/// run through this entry point with `cutoff = max_distance`.
pub fn weighted_edit_distance_within(
    a: &[Token],
    b: &[Token],
    confusion: &ConfusionTable,
    cutoff: f64,
) -> Option<f64> {
    compute(a, b, confusion, cutoff)
}

/// Derives a similarity in `[0, 1]` from a distance over the two sequences.
///
/// `sim = 1 - distance / max(len_a, len_b)`, clamped; two empty sequences are
/// identical and yield `1.0`.
pub fn similarity(distance: f64, len_a: usize, len_b: usize) -> f64 {
    let longest = len_a.max(len_b);
    if longest == 0 {
        return 1.0;
    }
    (1.0 - distance / longest as f64).clamp(0.0, 1.0)
}

fn compute(a: &[Token], b: &[Token], confusion: &ConfusionTable, cutoff: f64) -> Option<f64> {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if long.len() as f64 - short.len() as f64 > cutoff {
        return None;
    }
    if short.is_empty() {
        return Some(long.len() as f64);
    }

    let mut prev: Vec<f64> = (0..=short.len()).map(|j| j as f64).collect();
    let mut cur = vec![0.0; short.len() + 1];

    for (i, long_token) in long.iter().enumerate() {
        cur[0] = (i + 1) as f64;
        let mut row_min = cur[0];

        for (j, short_token) in short.iter().enumerate() {
            let substitute_cost = if long_token == short_token {
                0.0
            } else {
                confusion.lookup(long_token.as_str(), short_token.as_str())
            };
            let substituted = prev[j] + substitute_cost;
            let deleted = prev[j + 1] + 1.0;
            let inserted = cur[j] + 1.0;
            let cell = substituted.min(deleted).min(inserted);
            cur[j + 1] = cell;
            row_min = row_min.min(cell);
        }

        if row_min > cutoff {
            return None;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let distance = prev[short.len()];
    (distance <= cutoff).then_some(distance)
}
