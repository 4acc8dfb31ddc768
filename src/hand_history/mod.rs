//! # Tournament Hand History Parsing
//!
//! This module parses one raw hand-history transcript (PokerStars-style
//! tournament format) into a queryable [`Hand`].
//!
//! ## Pipeline
//!
//! - [`Sections`] partitions the raw text on the six literal street markers
//!   (`*** HOLE CARDS ***`, `*** FLOP ***`, ...).
//! - [`extract`] provides the lenient pattern-to-value combinators every
//!   field is built on.
//! - [`Hand`] applies one extraction per field over the right segment, and
//!   memoizes the result for the life of the hand.
//!
//! ## Leniency
//!
//! Hand-history producers vary slightly in their field formats, so a single
//! malformed field must never abort the hand. An unmatched pattern yields the
//! field's default (zero, empty map, or unset) and a value that will not
//! coerce is kept as its raw string. Only structural problems are errors:
//! empty input, or a transcript with no recognizable seat listing.
mod action;
mod betting;
mod errors;
pub mod extract;
mod hand;
mod money;
mod patterns;
mod sections;
mod summary;

pub use action::{Action, Street};
pub use errors::HandParseError;
pub use hand::{Hand, POSITIONS};
pub use money::Money;
pub use sections::Sections;
pub use summary::TournamentSummary;
