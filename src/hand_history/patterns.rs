//! The fixed pattern table for the PokerStars-style tournament grammar.
//!
//! Patterns are compiled once and shared; every field in [`super::hand`] is
//! one of these applied to one section through the [`super::extract`]
//! combinators.

use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        pub static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).unwrap());
    };
}

// Caption fields.
pattern!(SEAT, r"Seat \d+: (?P<player>.+?) \(\$?(?P<stack>[\d,]+)(?: in chips)?\)");
pattern!(LEVEL_BLINDS, r"Level .+? \((?P<sb>\d+)/(?P<bb>\d+)\)");
pattern!(TID, r"Tournament #(?P<tid>\d+)");
pattern!(HID, r"Hand #(?P<hid>\d+)");
pattern!(
    DATETIME,
    r"(?P<datetime>\d{4}/\d{2}/\d{2} \d{1,2}:\d{1,2}:\d{1,2}) ET"
);
pattern!(
    BI_BOUNTY_RAKE,
    r"Tournament #\d+, \$(?P<bi>\d+\.\d+)(?:\+\$(?P<bounty>\d+\.\d+))?\+\$(?P<rake>\d+\.\d+)"
);

// Forced bets, posted before the first decision point.
pattern!(SB_PLAYER, r"(?P<player>.+): posts small");
pattern!(BB_PLAYER, r"(?P<player>.+): posts big");
pattern!(BLINDS, r"(?P<player>.+): posts (?:small|big) blind (?P<bet>\d+)");
pattern!(ANTES, r"(?P<player>.+): posts the ante (?P<bet>\d+)");
pattern!(BLINDS_ANTES, r"(?P<player>.+): posts .*?(?P<bet>\d+)");

// Street action logs. The amount group is optional so that a bare check
// still produces an entry; a raise amount is the raise-to total.
pattern!(ACTIONS, r"(?P<player>.+): (?P<action>calls|raises|bets|folds|checks)");
pattern!(
    ACTION_AMOUNTS,
    r"(?P<player>.+?): (?:calls|raises .*?to|bets|checks)(?: (?P<amount>\d+))?"
);
pattern!(ALL_IN, r"(?P<player>.+?):.* all-in");
pattern!(UNCALLED, r"Uncalled.*\((?P<bet>\d+)\).*to (?P<player>.+)");

// Hole cards and the board. Street segments have their marker literal
// stripped, so the board patterns key on the bracketed card groups alone.
pattern!(HERO, r"Dealt to (?P<hero>.+?) \[(?P<cards>[^\]]+)\]");
pattern!(FLOP, r"\[(?P<flop>[^\]]+)\]");
pattern!(TURN, r"\[[^\]]+\] \[(?P<turn>.{2})\]");
pattern!(RIVER, r"\[[^\]]+\] \[(?P<river>.{2})\]");

// Showdown and summary.
pattern!(CHIP_WON, r"(?P<player>.+?) collected (?P<chipwon>\d+)");
pattern!(
    FINISHES,
    r"(?P<player>.+?) (?:finished.*in (?P<place>\d+)(?:st|nd|rd|th)|wins the tournament)"
);
pattern!(
    PRIZE_WON,
    r"(?P<player>.+?) (?:wins|finished).* and (?:received|receives) \$(?P<prize>\d+\.\d+)"
);
pattern!(BOUNTY_WON, r"(?P<player>.+?) wins the \$(?P<bounty>[\d.]+) bounty");
pattern!(POT_LIST, r"(?:Total|Main|Side) pot(?:-\d)? (?P<pot>\d+)");
pattern!(
    KNOWN_CARDS,
    r"Seat \d+: (?P<player>.+?) (?:\(button\) )?(?:\(small blind\) |\(big blind\) )?showed \[(?P<cards>[^\]]+)\]"
);

// Tournament summary emails (the second transcript kind).
pattern!(TS_FINISHES, r"You finished in (?P<place>\d+)(?:st|nd|rd|th)");
pattern!(TS_PRIZE, r"\d+: (?P<player>.+?) \(.*\), \$(?P<prize>\d+\.\d+)");
