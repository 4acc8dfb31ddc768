use thiserror::Error;

/// Structural failures while constructing a [`crate::hand_history::Hand`].
///
/// Field-level problems never surface here; they degrade to defaults per the
/// module's leniency policy. These errors mean the input is not a hand at all.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum HandParseError {
    #[error("hand history text is empty")]
    EmptyHand,

    #[error("no seat listing found in hand history")]
    NoSeats,
}
