use std::fmt;

/// The four betting streets of a hold'em hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// All streets in play order.
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "preflop"),
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
        }
    }
}

/// One logged player decision.
///
/// `Fold` and `Check` carry no amount in the transcript; `Raise` amounts are
/// raise-to totals that supersede the player's earlier wagers on the street.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Fold,
    Check,
    Bet,
    Call,
    Raise,
}

impl Action {
    /// Map a transcript verb (`"calls"`, `"raises"`, ...) to an action kind.
    pub(crate) fn from_verb(verb: &str) -> Option<Action> {
        match verb {
            "folds" => Some(Action::Fold),
            "checks" => Some(Action::Check),
            "bets" => Some(Action::Bet),
            "calls" => Some(Action::Call),
            "raises" => Some(Action::Raise),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_mapping() {
        assert_eq!(Action::from_verb("raises"), Some(Action::Raise));
        assert_eq!(Action::from_verb("checks"), Some(Action::Check));
        assert_eq!(Action::from_verb("posts"), None);
    }

    #[test]
    fn test_street_order() {
        assert_eq!(Street::ALL[0], Street::Preflop);
        assert_eq!(Street::ALL[3], Street::River);
    }
}
