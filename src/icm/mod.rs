//! # Independent Chip Model
//!
//! Converts tournament chip stacks into finish-place probabilities and
//! expected prize equity, under the standard ICM assumption: at every
//! elimination event, each remaining player busts with probability
//! proportional to their share of the chips still in play.
//!
//! The reference formulation enumerates finish orders (Malmuth-Harville):
//! the probability of one exact order is the product, position by position,
//! of `stack[p] / chips_remaining`. That is factorial in the field size, so
//! beyond [`ENUMERATION_LIMIT`] players the engine switches to an equivalent
//! recursion over the 2^n subsets of already-finished players. The two
//! formulations agree to within 1e-9 and the tests hold them to it.
//!
//! Everything here is a pure function of its arguments. Nothing is shared
//! between calls, so hands can be valued in parallel without coordination.
//! The payout schedule is always an explicit argument, never ambient state.

mod bubble;

pub use bubble::{bubble_factor, bubble_factors};

use thiserror::Error;
use tracing::trace;

/// Hard cap on the field size. The subset recursion walks 2^n states;
/// anything past this is a reportable condition, not an unbounded wait.
pub const MAX_PLAYERS: usize = 16;

/// Largest field the factorial enumeration is used for.
pub const ENUMERATION_LIMIT: usize = 8;

/// Failures of the equity engine. Invalid input is rejected before any
/// enumeration begins; no failure degrades into a plausible-looking number.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum IcmError {
    #[error("stacks contain a negative or non-finite value")]
    InvalidStacks,

    #[error("too many players for exact ICM computation: {0}")]
    TooManyPlayers(usize),

    #[error("player index {0} out of range")]
    PlayerOutOfRange(usize),

    #[error("bubble factor requires two distinct players")]
    IdenticalPlayers,

    #[error("win and current equity coincide; bubble factor is undefined")]
    DegenerateEquity,

    #[error("unknown player {0}")]
    UnknownPlayer(String),
}

pub(crate) fn validate(stacks: &[f64]) -> Result<(), IcmError> {
    if stacks.iter().any(|s| !s.is_finite() || *s < 0.0) {
        return Err(IcmError::InvalidStacks);
    }
    if stacks.len() > MAX_PLAYERS {
        return Err(IcmError::TooManyPlayers(stacks.len()));
    }
    Ok(())
}

/// Probability that `player` finishes in exactly `place` (1 = winner).
///
/// Out-of-range `place` or `player` has probability zero. Zero-stack players
/// are already eliminated: they never take a live place, and they split the
/// bottom places evenly among themselves, so one busted player takes the
/// worst place with certainty.
pub fn finish_probability(stacks: &[f64], player: usize, place: usize) -> Result<f64, IcmError> {
    validate(stacks)?;
    Ok(finish_probability_unchecked(stacks, player, place))
}

fn finish_probability_unchecked(stacks: &[f64], player: usize, place: usize) -> f64 {
    let n = stacks.len();
    if place == 0 || place > n || player >= n {
        return 0.0;
    }
    let mut live_stacks = Vec::with_capacity(n);
    let mut pos = 0;
    for (i, &stack) in stacks.iter().enumerate() {
        if stack > 0.0 {
            if i == player {
                pos = live_stacks.len();
            }
            live_stacks.push(stack);
        }
    }
    let busted = n - live_stacks.len();
    if stacks[player] == 0.0 {
        return if place > live_stacks.len() {
            1.0 / busted as f64
        } else {
            0.0
        };
    }
    if place > live_stacks.len() {
        return 0.0;
    }
    if live_stacks.len() <= ENUMERATION_LIMIT {
        enumerated(&live_stacks, pos, place)
    } else {
        trace!(n = live_stacks.len(), "using subset recursion for finish probability");
        subset_recursion(&live_stacks, pos, place)
    }
}

/// Expected prize value per player under `payouts` (index 0 pays place 1).
pub fn equity(stacks: &[f64], payouts: &[f64]) -> Result<Vec<f64>, IcmError> {
    validate(stacks)?;
    let n = stacks.len();
    let places = n.min(payouts.len());
    let matrix = place_matrix(stacks);
    Ok((0..n)
        .map(|i| (0..places).map(|p| matrix[i][p] * payouts[p]).sum())
        .collect())
}

/// The full finish-distribution matrix: `matrix[player][place - 1]`.
pub fn place_probabilities(stacks: &[f64]) -> Result<Vec<Vec<f64>>, IcmError> {
    validate(stacks)?;
    Ok(place_matrix(stacks))
}

fn place_matrix(stacks: &[f64]) -> Vec<Vec<f64>> {
    let n = stacks.len();
    let live: Vec<usize> = (0..n).filter(|&i| stacks[i] > 0.0).collect();
    let live_stacks: Vec<f64> = live.iter().map(|&i| stacks[i]).collect();
    let l = live.len();

    let live_matrix: Vec<Vec<f64>> = if l <= ENUMERATION_LIMIT {
        (0..l)
            .map(|i| (1..=l).map(|place| enumerated(&live_stacks, i, place)).collect())
            .collect()
    } else {
        trace!(n = l, "using subset recursion for place matrix");
        subset_matrix(&live_stacks)
    };

    let mut matrix = vec![vec![0.0f64; n]; n];
    for (i, &p) in live.iter().enumerate() {
        matrix[p][..l].copy_from_slice(&live_matrix[i]);
    }
    // Already-eliminated players split the bottom places evenly.
    if l < n {
        let share = 1.0 / (n - l) as f64;
        for (i, row) in matrix.iter_mut().enumerate() {
            if stacks[i] == 0.0 {
                row[l..].iter_mut().for_each(|p| *p = share);
            }
        }
    }
    matrix
}

/// Reference formulation: sum over all finish orders that put `player` at
/// `place`, of the product of elimination-step probabilities. The recursion
/// fixes one finisher per position. Callers pass strictly positive stacks,
/// so every chips-remaining denominator is nonzero.
fn enumerated(stacks: &[f64], player: usize, place: usize) -> f64 {
    let total: f64 = stacks.iter().sum();
    let mut used = vec![false; stacks.len()];
    walk(stacks, &mut used, 0, player, place - 1, total, 1.0)
}

fn walk(
    stacks: &[f64],
    used: &mut [bool],
    pos: usize,
    player: usize,
    target_pos: usize,
    remaining: f64,
    acc: f64,
) -> f64 {
    let n = stacks.len();
    if pos == n {
        return acc;
    }
    let mut sum = 0.0;
    for candidate in 0..n {
        if used[candidate] {
            continue;
        }
        // The target occupies exactly target_pos; nothing else may.
        if (pos == target_pos) != (candidate == player) {
            continue;
        }
        let factor = stacks[candidate] / remaining;
        used[candidate] = true;
        sum += walk(
            stacks,
            used,
            pos + 1,
            player,
            target_pos,
            remaining - stacks[candidate],
            acc * factor,
        );
        used[candidate] = false;
    }
    sum
}

/// Subset formulation: `finished[mask]` is the probability that exactly the
/// players in `mask` hold the top `|mask|` places, in any internal order.
/// Extending a mask by one player multiplies by that player's share of the
/// chips not yet retired into a paid place.
fn subset_recursion(stacks: &[f64], player: usize, place: usize) -> f64 {
    let n = stacks.len();
    let total: f64 = stacks.iter().sum();
    let mut finished = vec![0.0f64; 1 << n];
    finished[0] = 1.0;
    let mut result = 0.0;

    for mask in 0..(1usize << n) {
        let weight = finished[mask];
        if weight == 0.0 {
            continue;
        }
        let retired: f64 = (0..n)
            .filter(|j| mask & (1 << j) != 0)
            .map(|j| stacks[j])
            .sum();
        let remaining = total - retired;
        let count = mask.count_ones() as usize;

        if count == place - 1 && mask & (1 << player) == 0 {
            result += weight * stacks[player] / remaining;
        }
        for j in 0..n {
            if mask & (1 << j) != 0 {
                continue;
            }
            finished[mask | (1 << j)] += weight * stacks[j] / remaining;
        }
    }
    result
}

/// One subset sweep filling every `matrix[player][place - 1]` entry at once.
fn subset_matrix(stacks: &[f64]) -> Vec<Vec<f64>> {
    let n = stacks.len();
    let total: f64 = stacks.iter().sum();
    let mut finished = vec![0.0f64; 1 << n];
    finished[0] = 1.0;
    let mut matrix = vec![vec![0.0f64; n]; n];

    for mask in 0..(1usize << n) {
        let weight = finished[mask];
        if weight == 0.0 {
            continue;
        }
        let retired: f64 = (0..n)
            .filter(|j| mask & (1 << j) != 0)
            .map(|j| stacks[j])
            .sum();
        let remaining = total - retired;
        let count = mask.count_ones() as usize;
        if count == n {
            continue;
        }
        for j in 0..n {
            if mask & (1 << j) != 0 {
                continue;
            }
            let share = weight * stacks[j] / remaining;
            // Taking the next slot puts player j in place count + 1.
            matrix[j][count] += share;
            finished[mask | (1 << j)] += share;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rng, Rng};

    #[test_log::test]
    fn test_two_player_winner_probability_is_chip_share() {
        let stacks = [3000.0, 1000.0];
        assert_relative_eq!(
            finish_probability(&stacks, 0, 1).unwrap(),
            0.75,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            finish_probability(&stacks, 1, 2).unwrap(),
            0.75,
            epsilon = 1e-12
        );
    }

    #[test_log::test]
    fn test_three_player_second_place_by_hand() {
        // Orders putting player 0 second: (1,0,2) and (2,0,1).
        // 0.3 * 50/70 + 0.2 * 50/80
        let stacks = [50.0, 30.0, 20.0];
        let expected = 0.3 * (50.0 / 70.0) + 0.2 * (50.0 / 80.0);
        assert_relative_eq!(
            finish_probability(&stacks, 0, 2).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test_log::test]
    fn test_out_of_range_is_zero() {
        let stacks = [50.0, 30.0, 20.0];
        assert_eq!(finish_probability(&stacks, 0, 4).unwrap(), 0.0);
        assert_eq!(finish_probability(&stacks, 3, 1).unwrap(), 0.0);
        assert_eq!(finish_probability(&stacks, 0, 0).unwrap(), 0.0);
    }

    #[test_log::test]
    fn test_zero_stack_takes_worst_place() {
        let stacks = [500.0, 0.0, 300.0];
        assert_eq!(finish_probability(&stacks, 1, 3).unwrap(), 1.0);
        assert_eq!(finish_probability(&stacks, 1, 1).unwrap(), 0.0);
        assert_eq!(finish_probability(&stacks, 1, 2).unwrap(), 0.0);
        // The live players never take the worst place.
        assert_eq!(finish_probability(&stacks, 0, 3).unwrap(), 0.0);
    }

    /// Conservation must survive several already-busted stacks: the busted
    /// players share the bottom places, they do not each claim the worst one.
    #[test_log::test]
    fn test_multiple_zero_stacks_share_bottom_places() {
        let stacks = [100.0, 0.0, 0.0, 300.0];
        for player in 0..stacks.len() {
            let sum: f64 = (1..=stacks.len())
                .map(|place| finish_probability(&stacks, player, place).unwrap())
                .sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
        assert_relative_eq!(
            finish_probability(&stacks, 1, 3).unwrap(),
            0.5,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            finish_probability(&stacks, 1, 4).unwrap(),
            0.5,
            epsilon = 1e-12
        );
        assert_eq!(finish_probability(&stacks, 1, 1).unwrap(), 0.0);

        // Payouts hand out exactly the pool even with two busted players.
        let eq = equity(&[100.0, 0.0, 0.0], &[50.0, 30.0, 20.0]).unwrap();
        assert_relative_eq!(eq.iter().sum::<f64>(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(eq[0], 50.0, epsilon = 1e-12);
        assert_relative_eq!(eq[1], 25.0, epsilon = 1e-12);
        assert_relative_eq!(eq[2], 25.0, epsilon = 1e-12);
    }

    #[test_log::test]
    fn test_invalid_stacks_rejected() {
        assert_eq!(
            finish_probability(&[100.0, -1.0], 0, 1).unwrap_err(),
            IcmError::InvalidStacks
        );
        assert_eq!(
            finish_probability(&[100.0, f64::NAN], 0, 1).unwrap_err(),
            IcmError::InvalidStacks
        );
        assert_eq!(
            equity(&[100.0, f64::INFINITY], &[1.0]).unwrap_err(),
            IcmError::InvalidStacks
        );
    }

    #[test_log::test]
    fn test_too_many_players_is_reported() {
        let stacks = vec![100.0; MAX_PLAYERS + 1];
        assert_eq!(
            finish_probability(&stacks, 0, 1).unwrap_err(),
            IcmError::TooManyPlayers(MAX_PLAYERS + 1)
        );
    }

    /// For any player the place distribution must sum to one.
    #[test_log::test]
    fn test_probability_conservation() {
        let mut rng = rng();
        for n in 2..=6 {
            let stacks: Vec<f64> = (0..n).map(|_| rng.random_range(1..5000) as f64).collect();
            for player in 0..n {
                let sum: f64 = (1..=n)
                    .map(|place| finish_probability(&stacks, player, place).unwrap())
                    .sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
            }
        }
    }

    /// Conservation must also hold on the subset-recursion path.
    #[test_log::test]
    fn test_probability_conservation_large_field() {
        let mut rng = rng();
        let n = ENUMERATION_LIMIT + 2;
        let stacks: Vec<f64> = (0..n).map(|_| rng.random_range(1..5000) as f64).collect();
        for player in 0..n {
            let sum: f64 = (1..=n)
                .map(|place| finish_probability(&stacks, player, place).unwrap())
                .sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    /// The permutation and subset formulations must agree to 1e-9.
    #[test_log::test]
    fn test_cross_implementation_agreement() {
        let mut rng = rng();
        for n in 2..=ENUMERATION_LIMIT {
            let stacks: Vec<f64> = (0..n).map(|_| rng.random_range(1..5000) as f64).collect();
            for player in 0..n {
                for place in 1..=n {
                    let by_orders = enumerated(&stacks, player, place);
                    let by_subsets = subset_recursion(&stacks, player, place);
                    assert_relative_eq!(by_orders, by_subsets, epsilon = 1e-9);
                }
            }
        }
    }

    #[test_log::test]
    fn test_subset_matrix_matches_scalar_form() {
        let stacks = [4500.0, 2500.0, 1500.0, 1000.0, 500.0];
        let matrix = subset_matrix(&stacks);
        for player in 0..stacks.len() {
            for place in 1..=stacks.len() {
                assert_relative_eq!(
                    matrix[player][place - 1],
                    enumerated(&stacks, player, place),
                    epsilon = 1e-9
                );
            }
        }
    }

    /// Paying out every place hands out exactly the pool.
    #[test_log::test]
    fn test_payout_conservation() {
        let payouts = [50.0, 30.0, 20.0];
        let stacks = [4000.0, 2500.0, 1500.0, 1000.0];
        let eq = equity(&stacks, &payouts).unwrap();
        let total: f64 = eq.iter().sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
    }

    /// Equity attaches to the stack value, not the seat label.
    #[test_log::test]
    fn test_label_symmetry() {
        let payouts = [65.0, 35.0];
        let stacks = [4000.0, 2500.0, 1500.0];
        let permuted = [1500.0, 4000.0, 2500.0];
        let eq = equity(&stacks, &payouts).unwrap();
        let eq_permuted = equity(&permuted, &payouts).unwrap();
        assert_relative_eq!(eq[0], eq_permuted[1], epsilon = 1e-9);
        assert_relative_eq!(eq[1], eq_permuted[2], epsilon = 1e-9);
        assert_relative_eq!(eq[2], eq_permuted[0], epsilon = 1e-9);
    }

    #[test_log::test]
    fn test_equity_order_follows_stacks() {
        let payouts = [50.0, 30.0, 20.0];
        let stacks = [9000.0, 3000.0, 2000.0, 1000.0];
        let eq = equity(&stacks, &payouts).unwrap();
        assert!(eq[0] > eq[1] && eq[1] > eq[2] && eq[2] > eq[3]);
        // Even a dominant stack is worth less than first-place money.
        assert!(eq[0] < payouts[0]);
    }

    /// Equal stacks split the pool evenly.
    #[test_log::test]
    fn test_equal_stacks_equal_equity() {
        let payouts = [50.0, 30.0];
        let eq = equity(&[1000.0, 1000.0, 1000.0], &payouts).unwrap();
        for e in &eq {
            assert_relative_eq!(*e, 80.0 / 3.0, epsilon = 1e-9);
        }
    }

    #[test_log::test]
    fn test_more_payouts_than_players() {
        // Only the first n payout places are reachable.
        let eq = equity(&[600.0, 400.0], &[50.0, 30.0, 20.0]).unwrap();
        let total: f64 = eq.iter().sum();
        assert_relative_eq!(total, 80.0, epsilon = 1e-9);
    }
}
