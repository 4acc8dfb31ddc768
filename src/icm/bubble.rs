//! Pairwise bubble factors: the ICM risk premium of a marginal all-in.

use tracing::trace;

use crate::icm::{equity, validate, IcmError};

/// Bubble factor of player `i` against player `j`, in `[0, 1)`.
///
/// Two hypothetical full-transfer stack vectors are valued: a win scenario
/// where `i` takes all of `j`'s chips and `j` busts, and the mirror-image
/// lose scenario. The raw factor is the equity `i` risks over the equity `i`
/// could gain,
///
/// ```text
/// f = (eq_now - eq_lose) / (eq_win - eq_now)
/// ```
///
/// normalized to `f / (1 + f)`. Higher values mean `i` stands to lose more
/// equity than the confrontation could win them, the classic bubble signal.
///
/// A schedule under which winning moves no equity (for example, a flat
/// payout) makes the factor undefined and fails with
/// [`IcmError::DegenerateEquity`] instead of producing an infinity or NaN.
pub fn bubble_factor(
    stacks: &[f64],
    i: usize,
    j: usize,
    payouts: &[f64],
) -> Result<f64, IcmError> {
    validate(stacks)?;
    if i >= stacks.len() {
        return Err(IcmError::PlayerOutOfRange(i));
    }
    if j >= stacks.len() {
        return Err(IcmError::PlayerOutOfRange(j));
    }
    if i == j {
        return Err(IcmError::IdenticalPlayers);
    }

    let mut win = stacks.to_vec();
    win[i] += win[j];
    win[j] = 0.0;
    let mut lose = stacks.to_vec();
    lose[j] += lose[i];
    lose[i] = 0.0;

    let eq_now = equity(stacks, payouts)?;
    let eq_win = equity(&win, payouts)?;
    let eq_lose = equity(&lose, payouts)?;

    let gain = eq_win[i] - eq_now[i];
    let risk = eq_now[i] - eq_lose[i];
    if !(gain > 0.0) {
        trace!(i, j, gain, "degenerate bubble factor denominator");
        return Err(IcmError::DegenerateEquity);
    }
    let f = risk / gain;
    Ok(f / (1.0 + f))
}

/// The full pairwise matrix, `result[i][j] = bubble_factor(i, j)`, with a
/// zero diagonal.
pub fn bubble_factors(stacks: &[f64], payouts: &[f64]) -> Result<Vec<Vec<f64>>, IcmError> {
    let n = stacks.len();
    let mut result = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                result[i][j] = bubble_factor(stacks, i, j, payouts)?;
            }
        }
    }
    Ok(result)
}
