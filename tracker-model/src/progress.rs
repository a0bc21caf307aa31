//! Derived progress computation.

use crate::entry::Milestone;

/// Fraction of milestones marked done.
///
/// Returns `None` for an empty list: the caller keeps whatever progress the
/// entry already had.
pub fn compute_progress(milestones: &[Milestone]) -> Option<f64> {
    if milestones.is_empty() {
        return None;
    }
    let done = milestones.iter().filter(|m| m.done).count();
    Some(done as f64 / milestones.len() as f64)
}

/// Clamps a manually supplied progress value into `[0, 1]`. NaN becomes 0.
pub fn clamp_progress(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}
