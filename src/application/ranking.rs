//! Ordering of scored doctors.

use crate::domain::ScoredDoctor;

/// Sort by score descending and keep the first `top_n`.
///
/// The sort is stable, so equal scores keep their input (roster) order.
/// `top_n` larger than the input returns everything.
#[must_use]
pub fn rank_top_n(mut scored: Vec<ScoredDoctor>, top_n: usize) -> Vec<ScoredDoctor> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);
    scored
}
