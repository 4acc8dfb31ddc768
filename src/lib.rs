//! # Tourney EQ
//!
//! A library for turning raw tournament poker hand-history text into a
//! structured, queryable hand model, and for valuing tournament chip stacks
//! with the Independent Chip Model (ICM).
//!
//! The two halves are independent:
//!
//! - [`hand_history`] parses one PokerStars-style transcript into a
//!   [`hand_history::Hand`]: players and stacks, blinds and antes, per-street
//!   actions and amounts, board cards, showdown, pots, finishes and prizes.
//!   Field extraction is deliberately lenient; a malformed field degrades
//!   rather than aborting the hand.
//! - [`icm`] computes finish-place probabilities, expected prize equity, and
//!   pairwise bubble factors from a stack vector and a payout schedule. These
//!   are pure functions with no shared state, safe to run in parallel across
//!   hands.
//!
//! ```
//! use tourney_eq::icm;
//!
//! let stacks = [4500.0, 3000.0, 1500.0];
//! let payouts = [50.0, 30.0, 20.0];
//! let eq = icm::equity(&stacks, &payouts).unwrap();
//! // The chip leader is worth the most, but less than half the pool.
//! assert!(eq[0] > eq[1] && eq[1] > eq[2]);
//! assert!(eq[0] < 50.0);
//! ```
pub mod hand_history;
pub mod icm;
