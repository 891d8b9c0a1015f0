//! Rank transforms shared by the non-parametric procedures.

use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

/// 1-based ranks; tied values share the mean of the positions they occupy
pub fn rank_average(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    Data::new(values.to_vec()).ranks(RankTieBreaker::Average)
}

/// Sizes of every run of equal values longer than one
pub fn tie_group_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut sizes = Vec::new();
    let mut run = 1;
    for window in sorted.windows(2) {
        if window[0] == window[1] {
            run += 1;
        } else {
            if run > 1 {
                sizes.push(run);
            }
            run = 1;
        }
    }
    if run > 1 && !sorted.is_empty() {
        sizes.push(run);
    }
    sizes
}

/// `Σ (t³ - t)` over tie groups, the usual rank tie correction term
pub fn tie_correction_sum(values: &[f64]) -> f64 {
    tie_group_sizes(values)
        .into_iter()
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}
