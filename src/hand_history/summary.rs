use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;

use crate::hand_history::extract::{self, Captured};
use crate::hand_history::{patterns, Money};

/// A parsed tournament-result summary (the email-style recap, not a hand).
///
/// Carries the hero's finishing place and the per-player prize table. Built
/// on the same lenient extraction layer as [`crate::hand_history::Hand`];
/// missing fields yield defaults, never failures.
pub struct TournamentSummary {
    text: String,
    tid: OnceCell<Option<u64>>,
    finishes: OnceCell<Option<u32>>,
    prize_won: OnceCell<HashMap<String, Money>>,
}

impl TournamentSummary {
    pub fn new(text: impl Into<String>) -> TournamentSummary {
        TournamentSummary {
            text: text.into(),
            tid: OnceCell::new(),
            finishes: OnceCell::new(),
            prize_won: OnceCell::new(),
        }
    }

    pub fn tid(&self) -> Option<u64> {
        *self.tid.get_or_init(|| {
            extract::first(&patterns::TID, &self.text, "tid", |s| s.parse().ok())
                .and_then(Captured::into_value)
        })
    }

    /// The hero's finishing place, from the `You finished in Nth` line.
    pub fn finishes(&self) -> Option<u32> {
        *self.finishes.get_or_init(|| {
            extract::first(&patterns::TS_FINISHES, &self.text, "place", |s| s.parse().ok())
                .and_then(Captured::into_value)
        })
    }

    /// Prize money per player from the result table.
    pub fn prize_won(&self) -> &HashMap<String, Money> {
        self.prize_won.get_or_init(|| {
            extract::keyed_sum(&patterns::TS_PRIZE, &self.text, "player", "prize", Money::parse)
                .into_iter()
                .filter_map(|(k, v)| v.into_value().map(|v| (k, v)))
                .collect()
        })
    }
}

impl fmt::Display for TournamentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tournament: #{} Finish: {}",
            self.tid().unwrap_or(0),
            self.finishes().unwrap_or(0)
        )
    }
}
