//! Per-player chip contribution totals, street by street.
//!
//! The log format records a raise as a raise-to total that supersedes the
//! player's earlier bets and calls on the same street. The aggregation rule
//! here is therefore: with at least one raise on a street, sum only the
//! amounts from the last raise onward; without one, sum everything the
//! street logged. Callers downstream report chips won and lost from these
//! totals, so the rule is reproduced exactly even where a double raise on
//! one street could attribute amounts oddly.

use std::collections::HashMap;

use crate::hand_history::{Action, Hand, Street};

impl Hand {
    /// Chips this player put in on one street.
    ///
    /// On the no-raise branch the preflop total includes the posted blind; a
    /// preflop raise-to amount already covers it.
    pub fn street_contribution(&self, player: &str, street: Street) -> u64 {
        let empty_actions: Vec<Action> = Vec::new();
        let empty_amounts: Vec<Option<u64>> = Vec::new();
        let actions = self.actions(street).get(player).unwrap_or(&empty_actions);
        let amounts = self.amounts(street).get(player).unwrap_or(&empty_amounts);

        let last_raise_from_end = actions.iter().rev().position(|a| *a == Action::Raise);
        match last_raise_from_end {
            Some(back) => {
                // Amounts aligned with the tail of the action list, from the
                // last raise (inclusive) onward.
                amounts.iter().rev().take(back + 1).flatten().sum()
            }
            None => {
                let logged: u64 = amounts.iter().flatten().sum();
                if street == Street::Preflop {
                    logged + self.blinds().get(player).copied().unwrap_or(0)
                } else {
                    logged
                }
            }
        }
    }

    /// Everything this player put in over the whole hand, antes included.
    pub fn total_contribution(&self, player: &str) -> u64 {
        let streets: u64 = Street::ALL
            .iter()
            .map(|&street| self.street_contribution(player, street))
            .sum();
        streets + self.antes().get(player).copied().unwrap_or(0)
    }

    /// Contribution totals for every live player.
    pub fn total_contributions(&self) -> HashMap<String, u64> {
        self.players()
            .iter()
            .map(|player| (player.clone(), self.total_contribution(player)))
            .collect()
    }
}
