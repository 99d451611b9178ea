use std::collections::{HashMap, HashSet};

use crate::error::RankError;
use crate::metric::Polarity;
use crate::record::{SubjectId, check_value};

/// Dense 1-based ranks for one metric in one scope.
///
/// Equal values share a rank and the next distinct value gets the next
/// integer, so ranks never skip. The function has no notion of scope: callers
/// pass whichever pool they want ranked. A subject may appear at most once.
pub fn dense_rank(
    pairs: &[(SubjectId, f64)],
    polarity: Polarity,
) -> Result<HashMap<SubjectId, u32>, RankError> {
    let mut seen = HashSet::with_capacity(pairs.len());
    for (subject_id, value) in pairs {
        check_value(*subject_id, *value)?;
        if !seen.insert(*subject_id) {
            return Err(RankError::InvalidInput {
                subject_id: *subject_id,
                reason: "subject appears more than once in the pool".to_string(),
            });
        }
    }

    let mut ordered: Vec<(SubjectId, f64)> = pairs.to_vec();
    // Stable sort keeps input order inside equal-value groups.
    ordered.sort_by(|a, b| apply_dir(b.1, polarity).total_cmp(&apply_dir(a.1, polarity)));

    let mut out = HashMap::with_capacity(ordered.len());
    let mut rank = 0u32;
    let mut prev: Option<f64> = None;
    for (subject_id, value) in ordered {
        if prev != Some(value) {
            rank += 1;
            prev = Some(value);
        }
        out.insert(subject_id, rank);
    }
    Ok(out)
}

fn apply_dir(v: f64, polarity: Polarity) -> f64 {
    match polarity {
        Polarity::HigherBetter => v,
        Polarity::LowerBetter => -v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zeroes_share_a_rank() {
        let ranks = dense_rank(&[(1, 0.0), (2, -0.0), (3, -1.0)], Polarity::HigherBetter).unwrap();
        assert_eq!(ranks[&1], ranks[&2]);
        assert_eq!(ranks[&3], 2);
    }
}
