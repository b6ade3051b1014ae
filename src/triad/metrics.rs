//! Aggregate alignment metrics between predicted and target triads

use super::value::TriadValue;
use crate::core::error::{Result, TriadError};

/// Alignment between two parallel triad lists.
///
/// Returns `(mean L1 distance, mean cosine similarity)`.
pub fn alignment_score(pred: &[TriadValue], target: &[TriadValue]) -> Result<(f64, f64)> {
    if pred.len() != target.len() {
        return Err(TriadError::invalid(format!(
            "alignment needs parallel lists, got {} predictions and {} targets",
            pred.len(),
            target.len()
        )));
    }
    if pred.is_empty() {
        return Err(TriadError::invalid("alignment needs at least one triad"));
    }

    let n = pred.len() as f64;
    let (dist_sum, cos_sum) = pred
        .iter()
        .zip(target.iter())
        .fold((0.0, 0.0), |(d, c), (p, t)| {
            (d + p.distance(t), c + p.cosine_similarity(t))
        });

    Ok((dist_sum / n, cos_sum / n))
}
