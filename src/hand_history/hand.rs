use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::hand_history::extract::{self, Captured};
use crate::hand_history::{patterns, Action, HandParseError, Money, Sections, Street};
use crate::icm::{self, IcmError};

/// Table position labels, from the big blind backwards around the table.
pub const POSITIONS: [&str; 9] = [
    "BB", "SB", "BU", "CO", "MP2", "MP1", "UTG3", "UTG2", "UTG1",
];

/// One parsed tournament hand.
///
/// Constructed once from an immutable text blob. The seat listing, blind
/// posters and preflop order are derived eagerly; every other field is a
/// single pattern application over the right section, computed on first
/// access and memoized. Recomputation is idempotent, so the caches need no
/// synchronization beyond their `OnceCell`s.
#[derive(Debug)]
pub struct Hand {
    raw: String,
    sections: Sections,

    players: Vec<String>,
    stacks: Vec<u64>,
    stack_map: HashMap<String, u64>,
    preflop_order: Vec<String>,
    small_blind_player: Option<String>,
    big_blind_player: Option<String>,
    sb: u64,
    bb: u64,

    // Lazily derived fields.
    tid: OnceCell<Option<u64>>,
    hid: OnceCell<Option<u64>>,
    datetime: OnceCell<Option<Captured<NaiveDateTime>>>,
    buy_in: OnceCell<Money>,
    bounty: OnceCell<Money>,
    rake: OnceCell<Money>,
    blinds: OnceCell<HashMap<String, u64>>,
    antes: OnceCell<HashMap<String, u64>>,
    blinds_and_antes: OnceCell<HashMap<String, u64>>,
    streets: [StreetCache; 4],
    flop: OnceCell<Option<String>>,
    turn: OnceCell<Option<String>>,
    river: OnceCell<Option<String>>,
    showdown_hands: OnceCell<HashMap<String, String>>,
    finishes: OnceCell<HashMap<String, u32>>,
    prize_won: OnceCell<HashMap<String, Money>>,
    bounty_won: OnceCell<HashMap<String, Money>>,
    chip_won: OnceCell<HashMap<String, Vec<u64>>>,
    pot_list: OnceCell<Vec<u64>>,
    hero: OnceCell<Option<String>>,
    hero_cards: OnceCell<Option<String>>,
    uncalled: OnceCell<HashMap<String, u64>>,
}

#[derive(Debug, Default)]
struct StreetCache {
    actions: OnceCell<HashMap<String, Vec<Action>>>,
    amounts: OnceCell<HashMap<String, Vec<Option<u64>>>>,
    all_in: OnceCell<Vec<String>>,
}

impl Hand {
    /// Parse one hand-history block.
    ///
    /// Fails only on structural problems: blank input, or a transcript with
    /// no recognizable seat listing. Seats listed with a zero stack are
    /// already-busted placeholders and are dropped from the live hand.
    pub fn parse(text: &str) -> Result<Hand, HandParseError> {
        if text.trim().is_empty() {
            return Err(HandParseError::EmptyHand);
        }
        let sections = Sections::split(text);

        let mut players: Vec<String> = Vec::new();
        let mut stacks: Vec<u64> = Vec::new();
        for caps in patterns::SEAT.captures_iter(&sections.caption) {
            players.push(caps["player"].to_string());
            stacks.push(extract::as_chips(&caps["stack"]).unwrap_or(0));
        }
        if players.is_empty() {
            return Err(HandParseError::NoSeats);
        }

        // Drop busted seats, keeping players and stacks in lock-step.
        let seats = players.len();
        let (players, stacks): (Vec<String>, Vec<u64>) = players
            .into_iter()
            .zip(stacks)
            .filter(|(_, stack)| *stack != 0)
            .unzip();
        if players.len() < seats {
            debug!(removed = seats - players.len(), "dropped zero-stack seats");
        }

        let small_blind_player =
            extract::first(&patterns::SB_PLAYER, &sections.caption, "player", extract::as_text)
                .and_then(Captured::into_value);
        let big_blind_player =
            extract::first(&patterns::BB_PLAYER, &sections.caption, "player", extract::as_text)
                .and_then(Captured::into_value);

        // The big blind takes priority for seating the preflop rotation.
        let poster = big_blind_player
            .as_deref()
            .filter(|p| players.iter().any(|q| q == p))
            .or(small_blind_player
                .as_deref()
                .filter(|p| players.iter().any(|q| q == p)));
        let preflop_order = match poster.and_then(|p| players.iter().position(|q| q == p)) {
            Some(idx) => {
                let mut order = players[idx + 1..].to_vec();
                order.extend_from_slice(&players[..=idx]);
                order
            }
            None => Vec::new(),
        };

        let level = |group| {
            extract::first(&patterns::LEVEL_BLINDS, &sections.caption, group, extract::as_chips)
                .and_then(Captured::into_value)
                .unwrap_or(0)
        };
        let (sb, bb) = (level("sb"), level("bb"));

        let stack_map = players
            .iter()
            .cloned()
            .zip(stacks.iter().copied())
            .collect();

        Ok(Hand {
            raw: text.to_string(),
            sections,
            players,
            stacks,
            stack_map,
            preflop_order,
            small_blind_player,
            big_blind_player,
            sb,
            bb,
            tid: OnceCell::new(),
            hid: OnceCell::new(),
            datetime: OnceCell::new(),
            buy_in: OnceCell::new(),
            bounty: OnceCell::new(),
            rake: OnceCell::new(),
            blinds: OnceCell::new(),
            antes: OnceCell::new(),
            blinds_and_antes: OnceCell::new(),
            streets: Default::default(),
            flop: OnceCell::new(),
            turn: OnceCell::new(),
            river: OnceCell::new(),
            showdown_hands: OnceCell::new(),
            finishes: OnceCell::new(),
            prize_won: OnceCell::new(),
            bounty_won: OnceCell::new(),
            chip_won: OnceCell::new(),
            pot_list: OnceCell::new(),
            hero: OnceCell::new(),
            hero_cards: OnceCell::new(),
            uncalled: OnceCell::new(),
        })
    }

    /// The section partition this hand was built from.
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Player names in table-seat order, zero-stack seats removed.
    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn players_number(&self) -> usize {
        self.players.len()
    }

    /// Stacks aligned with [`players`](Hand::players).
    pub fn stacks(&self) -> &[u64] {
        &self.stacks
    }

    pub fn stack_map(&self) -> &HashMap<String, u64> {
        &self.stack_map
    }

    pub fn stack_of(&self, player: &str) -> Option<u64> {
        self.stack_map.get(player).copied()
    }

    pub fn player_index(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    /// Players in preflop acting order, first-to-act first, ending on the
    /// blind poster the rotation was anchored to. Empty when no blind post
    /// was found.
    pub fn preflop_order(&self) -> &[String] {
        &self.preflop_order
    }

    pub fn small_blind_player(&self) -> Option<&str> {
        self.small_blind_player.as_deref()
    }

    pub fn big_blind_player(&self) -> Option<&str> {
        self.big_blind_player.as_deref()
    }

    /// The level's posted blind sizes `(small, big)`, zero when the caption
    /// carries no level line.
    pub fn level_blinds(&self) -> (u64, u64) {
        (self.sb, self.bb)
    }

    pub fn tid(&self) -> Option<u64> {
        *self.tid.get_or_init(|| {
            extract::first(&patterns::TID, &self.sections.caption, "tid", |s| {
                s.parse().ok()
            })
            .and_then(Captured::into_value)
        })
    }

    pub fn hid(&self) -> Option<u64> {
        *self.hid.get_or_init(|| {
            extract::first(&patterns::HID, &self.sections.caption, "hid", |s| {
                s.parse().ok()
            })
            .and_then(Captured::into_value)
        })
    }

    fn datetime_field(&self) -> &Option<Captured<NaiveDateTime>> {
        self.datetime.get_or_init(|| {
            extract::first(&patterns::DATETIME, &self.sections.caption, "datetime", |s| {
                NaiveDateTime::parse_from_str(s, "%Y/%m/%d %H:%M:%S").ok()
            })
        })
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.datetime_field()
            .as_ref()
            .and_then(|c| c.value().copied())
    }

    /// Best-effort datetime text when the timestamp would not parse.
    pub fn datetime_raw(&self) -> Option<&str> {
        self.datetime_field().as_ref().and_then(|c| c.raw())
    }

    fn caption_money(&self, cell: &OnceCell<Money>, group: &str) -> Money {
        *cell.get_or_init(|| {
            extract::first(&patterns::BI_BOUNTY_RAKE, &self.sections.caption, group, |s| {
                Money::parse(s)
            })
            .and_then(Captured::into_value)
            .unwrap_or(Money::ZERO)
        })
    }

    /// Full buy-in: entry plus knockout bounty plus rake.
    pub fn buy_in(&self) -> Money {
        self.caption_money(&self.buy_in, "bi") + self.bounty() + self.rake()
    }

    pub fn bounty(&self) -> Money {
        self.caption_money(&self.bounty, "bounty")
    }

    pub fn rake(&self) -> Money {
        self.caption_money(&self.rake, "rake")
    }

    pub fn is_knockout(&self) -> bool {
        self.bounty() > Money::ZERO
    }

    fn keyed_chips<'a>(
        &self,
        cell: &'a OnceCell<HashMap<String, u64>>,
        re: &regex::Regex,
        text: &str,
    ) -> &'a HashMap<String, u64> {
        cell.get_or_init(|| {
            extract::keyed_sum(re, text, "player", "bet", extract::as_chips)
                .into_iter()
                .filter_map(|(k, v)| v.into_value().map(|v| (k, v)))
                .collect()
        })
    }

    /// Posted blinds per player.
    pub fn blinds(&self) -> &HashMap<String, u64> {
        self.keyed_chips(&self.blinds, &patterns::BLINDS, &self.sections.caption)
    }

    /// Posted antes per player.
    pub fn antes(&self) -> &HashMap<String, u64> {
        self.keyed_chips(&self.antes, &patterns::ANTES, &self.sections.caption)
    }

    /// Everything a player posted before the first decision point.
    pub fn blinds_and_antes(&self) -> &HashMap<String, u64> {
        self.keyed_chips(
            &self.blinds_and_antes,
            &patterns::BLINDS_ANTES,
            &self.sections.caption,
        )
    }

    /// Uncalled bets returned to their bettor.
    pub fn uncalled(&self) -> &HashMap<String, u64> {
        self.uncalled.get_or_init(|| {
            extract::keyed_sum(&patterns::UNCALLED, &self.raw, "player", "bet", extract::as_chips)
                .into_iter()
                .filter_map(|(k, v)| v.into_value().map(|v| (k, v)))
                .collect()
        })
    }

    fn street_text(&self, street: Street) -> &str {
        match street {
            Street::Preflop => self.sections.preflop(),
            Street::Flop => self.sections.flop(),
            Street::Turn => self.sections.turn(),
            Street::River => self.sections.river(),
        }
    }

    fn street_cache(&self, street: Street) -> &StreetCache {
        &self.streets[street as usize]
    }

    /// Action kinds per player for one street, in order of appearance.
    pub fn actions(&self, street: Street) -> &HashMap<String, Vec<Action>> {
        self.street_cache(street).actions.get_or_init(|| {
            extract::keyed_list(
                &patterns::ACTIONS,
                self.street_text(street),
                "player",
                "action",
                Action::from_verb,
            )
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().filter_map(Captured::into_value).collect()))
            .collect()
        })
    }

    /// Logged amounts per player for one street. `None` marks an action with
    /// no amount, like a check. A raise entry is the raise-to total.
    pub fn amounts(&self, street: Street) -> &HashMap<String, Vec<Option<u64>>> {
        self.street_cache(street).amounts.get_or_init(|| {
            extract::keyed_list(
                &patterns::ACTION_AMOUNTS,
                self.street_text(street),
                "player",
                "amount",
                extract::as_chips,
            )
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().map(Captured::into_value).collect()))
            .collect()
        })
    }

    /// Players who moved all-in on the given street.
    pub fn all_in_players(&self, street: Street) -> &[String] {
        self.street_cache(street).all_in.get_or_init(|| {
            extract::all(&patterns::ALL_IN, self.street_text(street), "player", extract::as_text)
                .into_iter()
                .filter_map(Captured::into_value)
                .collect()
        })
    }

    /// Paired `(action, amount)` view of one street's log.
    ///
    /// Folds log no amount line in this format, so they pair with `None`
    /// without consuming an amount entry.
    pub fn action_log(&self, street: Street) -> HashMap<String, Vec<(Action, Option<u64>)>> {
        let amounts = self.amounts(street);
        let empty: Vec<Option<u64>> = Vec::new();
        self.actions(street)
            .iter()
            .map(|(player, actions)| {
                let mut amounts = amounts.get(player).unwrap_or(&empty).iter();
                let log = actions
                    .iter()
                    .map(|&action| {
                        let amount = if action == Action::Fold {
                            None
                        } else {
                            amounts.next().copied().flatten()
                        };
                        (action, amount)
                    })
                    .collect();
                (player.clone(), log)
            })
            .collect()
    }

    /// Each player's final action on a street.
    pub fn last_action(&self, street: Street) -> HashMap<String, Action> {
        self.actions(street)
            .iter()
            .filter_map(|(player, actions)| actions.last().map(|&a| (player.clone(), a)))
            .collect()
    }

    /// The action map of the latest street that saw any action.
    pub fn last_actions(&self) -> &HashMap<String, Vec<Action>> {
        for street in Street::ALL.iter().rev() {
            if !self.actions(*street).is_empty() {
                return self.actions(*street);
            }
        }
        self.actions(Street::Preflop)
    }

    pub fn flop(&self) -> Option<&str> {
        self.flop
            .get_or_init(|| {
                extract::first(&patterns::FLOP, self.sections.flop(), "flop", extract::as_text)
                    .and_then(Captured::into_value)
            })
            .as_deref()
    }

    pub fn turn(&self) -> Option<&str> {
        self.turn
            .get_or_init(|| {
                extract::first(&patterns::TURN, self.sections.turn(), "turn", extract::as_text)
                    .and_then(Captured::into_value)
            })
            .as_deref()
    }

    pub fn river(&self) -> Option<&str> {
        self.river
            .get_or_init(|| {
                extract::first(&patterns::RIVER, self.sections.river(), "river", extract::as_text)
                    .and_then(Captured::into_value)
            })
            .as_deref()
    }

    /// The board card strings for every street that was reached.
    pub fn board(&self) -> Vec<&str> {
        [self.flop(), self.turn(), self.river()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Cards revealed in the summary's `showed [..]` lines.
    pub fn showdown_hands(&self) -> &HashMap<String, String> {
        self.showdown_hands.get_or_init(|| {
            extract::keyed_list(
                &patterns::KNOWN_CARDS,
                self.sections.summary(),
                "player",
                "cards",
                extract::as_text,
            )
            .into_iter()
            .filter_map(|(k, v)| {
                v.into_iter()
                    .next()
                    .and_then(Captured::into_value)
                    .map(|cards| (k, cards))
            })
            .collect()
        })
    }

    pub fn is_showdown(&self) -> bool {
        !self.sections.showdown().trim().is_empty()
    }

    /// Tournament finishes declared in this hand; place 1 is the winner.
    ///
    /// A `wins the tournament` line carries no numeric place and maps to 1.
    pub fn finishes(&self) -> &HashMap<String, u32> {
        self.finishes.get_or_init(|| {
            extract::keyed_sum(
                &patterns::FINISHES,
                self.sections.showdown(),
                "player",
                "place",
                |s| s.parse::<u32>().ok(),
            )
            .into_iter()
            .map(|(k, v)| {
                let place = v.into_value().unwrap_or(1);
                (k, place)
            })
            .collect()
        })
    }

    /// Cash prizes awarded in this hand.
    pub fn prize_won(&self) -> &HashMap<String, Money> {
        self.prize_won.get_or_init(|| {
            extract::keyed_sum(
                &patterns::PRIZE_WON,
                self.sections.showdown(),
                "player",
                "prize",
                Money::parse,
            )
            .into_iter()
            .filter_map(|(k, v)| v.into_value().map(|v| (k, v)))
            .collect()
        })
    }

    /// Knockout bounties collected in this hand.
    ///
    /// The tournament winner also claims their own head bounty, so a place-1
    /// finish adds this hand's bounty amount on top of any knockout lines.
    pub fn bounty_won(&self) -> &HashMap<String, Money> {
        self.bounty_won.get_or_init(|| {
            let mut res: HashMap<String, Money> = extract::keyed_sum(
                &patterns::BOUNTY_WON,
                self.sections.showdown(),
                "player",
                "bounty",
                Money::parse,
            )
            .into_iter()
            .filter_map(|(k, v)| v.into_value().map(|v| (k, v)))
            .collect();
            for (player, place) in self.finishes() {
                if *place == 1 {
                    let total = res.get(player).copied().unwrap_or(Money::ZERO) + self.bounty();
                    res.insert(player.clone(), total);
                }
            }
            res
        })
    }

    /// Chips collected from each pot, per player.
    pub fn chip_won(&self) -> &HashMap<String, Vec<u64>> {
        self.chip_won.get_or_init(|| {
            // Preflop wins (everyone folded) log their collection line there.
            let text = format!("{}{}", self.sections.showdown(), self.sections.preflop());
            extract::keyed_list(&patterns::CHIP_WON, &text, "player", "chipwon", extract::as_chips)
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().filter_map(Captured::into_value).collect()))
                .collect()
        })
    }

    /// Pot sizes from the summary: total pot first, side pots after.
    pub fn pot_list(&self) -> &[u64] {
        self.pot_list.get_or_init(|| {
            extract::all(&patterns::POT_LIST, self.sections.summary(), "pot", extract::as_chips)
                .into_iter()
                .filter_map(Captured::into_value)
                .collect()
        })
    }

    /// The hand owner named by the `Dealt to` line.
    pub fn hero(&self) -> Option<&str> {
        self.hero
            .get_or_init(|| {
                extract::first(&patterns::HERO, self.sections.preflop(), "hero", extract::as_text)
                    .and_then(Captured::into_value)
            })
            .as_deref()
    }

    pub fn hero_cards(&self) -> Option<&str> {
        self.hero_cards
            .get_or_init(|| {
                extract::first(&patterns::HERO, self.sections.preflop(), "cards", extract::as_text)
                    .and_then(Captured::into_value)
            })
            .as_deref()
    }

    /// Stack rank of a player, 1 for the chip leader.
    pub fn tournament_position(&self, player: &str) -> Option<usize> {
        let stack = self.stack_of(player)?;
        Some(1 + self.stacks.iter().filter(|&&s| s > stack).count())
    }

    pub fn is_chip_leader(&self, player: &str) -> bool {
        self.tournament_position(player) == Some(1)
    }

    /// Stack rank among the players still to act after this player preflop
    /// (this player included). The big blind closes the rotation, so their
    /// rank is the whole-table rank.
    pub fn tournament_position_left(&self, player: &str) -> Option<usize> {
        if self.big_blind_player.as_deref() == Some(player) {
            return self.tournament_position(player);
        }
        let stack = self.stack_of(player)?;
        let idx = self.preflop_order.iter().position(|p| p == player)?;
        let ahead = self.preflop_order[idx..]
            .iter()
            .filter(|p| self.stack_of(p).unwrap_or(0) > stack)
            .count();
        Some(1 + ahead)
    }

    pub fn is_chip_leader_left(&self, player: &str) -> bool {
        self.tournament_position_left(player) == Some(1)
    }

    /// Position label per player (BB, SB, BU, ...), walked backwards from
    /// the end of the preflop rotation.
    pub fn positions(&self) -> HashMap<String, &'static str> {
        self.preflop_order
            .iter()
            .rev()
            .zip(POSITIONS)
            .map(|(player, label)| (player.clone(), label))
            .collect()
    }

    /// Live stacks as the float vector the equity engine consumes.
    pub fn stack_vector(&self) -> Vec<f64> {
        self.stacks.iter().map(|&s| s as f64).collect()
    }

    /// ICM prize equity per player under the given payout schedule.
    pub fn icm_equity(&self, payouts: &[f64]) -> Result<HashMap<String, f64>, IcmError> {
        let eq = icm::equity(&self.stack_vector(), payouts)?;
        Ok(self
            .players
            .iter()
            .cloned()
            .zip(eq)
            .collect())
    }

    /// Bubble factor of `hero` against `villain` under the given payouts.
    pub fn bubble_factor(
        &self,
        hero: &str,
        villain: &str,
        payouts: &[f64],
    ) -> Result<f64, IcmError> {
        let i = self
            .player_index(hero)
            .ok_or_else(|| IcmError::UnknownPlayer(hero.to_string()))?;
        let j = self
            .player_index(villain)
            .ok_or_else(|| IcmError::UnknownPlayer(villain.to_string()))?;
        icm::bubble_factor(&self.stack_vector(), i, j, payouts)
    }

    /// The full pairwise bubble-factor table, keyed by player names. Each
    /// player's row omits themselves.
    pub fn bubble_factors(
        &self,
        payouts: &[f64],
    ) -> Result<HashMap<String, HashMap<String, f64>>, IcmError> {
        let matrix = icm::bubble_factors(&self.stack_vector(), payouts)?;
        Ok(self
            .players
            .iter()
            .enumerate()
            .map(|(i, hero)| {
                let row = self
                    .players
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, villain)| (villain.clone(), matrix[i][j]))
                    .collect();
                (hero.clone(), row)
            })
            .collect())
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Hand: #{} Tournament: #{} ${}",
            self.hid().unwrap_or(0),
            self.tid().unwrap_or(0),
            self.buy_in()
        )
    }
}

impl FromStr for Hand {
    type Err = HandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hand::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A complete 3-max hyper-turbo hand: button open-folds, the small blind
    /// jams, the big blind calls and loses the showdown.
    const HAND: &str = "\
PokerStars Hand #189807795760: Tournament #2380726500, $0.23+$0.02 USD Hold'em No Limit - Level IV (60/120) - 2018/09/02 10:57:35 ET
Table '2380726500 1' 3-max Seat #1 is the button
Seat 1: dimitriskous (1432 in chips)
Seat 4: MM7000k (544 in chips)
Seat 5: DiggErr555 (1024 in chips)
dimitriskous: posts the ante 12
MM7000k: posts the ante 12
DiggErr555: posts the ante 12
MM7000k: posts small blind 60
DiggErr555: posts big blind 120
*** HOLE CARDS ***
Dealt to DiggErr555 [Qs Qc]
dimitriskous: folds
MM7000k: raises 412 to 532 and is all-in
DiggErr555: calls 412
*** FLOP *** [Jc 6c 6h]
*** TURN *** [Jc 6c 6h] [Js]
*** RIVER *** [Jc 6c 6h Js] [7d]
*** SHOW DOWN ***
MM7000k: shows [Jd Ah] (three of a kind, Jacks)
DiggErr555: shows [Qs Qc] (two pair, Queens and Sixes)
MM7000k collected 1100 from pot
*** SUMMARY ***
Total pot 1100 | Rake 0
Board [Jc 6c 6h Js 7d]
Seat 1: dimitriskous (button) folded before Flop
Seat 4: MM7000k (small blind) showed [Jd Ah] and won (1100) with three of a kind, Jacks
Seat 5: DiggErr555 (big blind) showed [Qs Qc] and lost with two pair, Queens and Sixes
";

    fn hand() -> Hand {
        Hand::parse(HAND).unwrap()
    }

    #[test_log::test]
    fn test_ids_and_datetime() {
        let h = hand();
        assert_eq!(h.tid(), Some(2380726500));
        assert_eq!(h.hid(), Some(189807795760));
        let dt = h.datetime().unwrap();
        assert_eq!(dt.format("%Y/%m/%d %H:%M:%S").to_string(), "2018/09/02 10:57:35");
    }

    #[test_log::test]
    fn test_players_and_stacks() {
        let h = hand();
        assert_eq!(h.players(), ["dimitriskous", "MM7000k", "DiggErr555"]);
        assert_eq!(h.stacks(), [1432, 544, 1024]);
        assert_eq!(h.stack_of("MM7000k"), Some(544));
        assert_eq!(h.players_number(), 3);
    }

    #[test_log::test]
    fn test_blind_posters_and_order() {
        let h = hand();
        assert_eq!(h.big_blind_player(), Some("DiggErr555"));
        assert_eq!(h.small_blind_player(), Some("MM7000k"));
        assert_eq!(h.preflop_order(), ["dimitriskous", "MM7000k", "DiggErr555"]);
        assert_eq!(h.level_blinds(), (60, 120));
    }

    #[test_log::test]
    fn test_blinds_and_antes() {
        let h = hand();
        assert_eq!(h.blinds()["MM7000k"], 60);
        assert_eq!(h.blinds()["DiggErr555"], 120);
        assert_eq!(h.antes()["dimitriskous"], 12);
        // Combined posting totals sum blind plus ante.
        assert_eq!(h.blinds_and_antes()["DiggErr555"], 132);
        assert_eq!(h.blinds_and_antes()["dimitriskous"], 12);
    }

    #[test_log::test]
    fn test_preflop_actions() {
        let h = hand();
        let actions = h.actions(Street::Preflop);
        assert_eq!(actions["dimitriskous"], [Action::Fold]);
        assert_eq!(actions["MM7000k"], [Action::Raise]);
        assert_eq!(actions["DiggErr555"], [Action::Call]);

        let amounts = h.amounts(Street::Preflop);
        assert_eq!(amounts["MM7000k"], [Some(532)]);
        assert_eq!(amounts["DiggErr555"], [Some(412)]);
        assert!(!amounts.contains_key("dimitriskous"));
    }

    #[test_log::test]
    fn test_action_log_pairs_folds_with_no_amount() {
        let h = hand();
        let log = h.action_log(Street::Preflop);
        assert_eq!(log["dimitriskous"], [(Action::Fold, None)]);
        assert_eq!(log["MM7000k"], [(Action::Raise, Some(532))]);
    }

    #[test_log::test]
    fn test_board() {
        let h = hand();
        assert_eq!(h.flop(), Some("Jc 6c 6h"));
        assert_eq!(h.turn(), Some("Js"));
        assert_eq!(h.river(), Some("7d"));
        assert_eq!(h.board(), ["Jc 6c 6h", "Js", "7d"]);
    }

    #[test_log::test]
    fn test_showdown() {
        let h = hand();
        assert!(h.is_showdown());
        assert_eq!(h.showdown_hands()["MM7000k"], "Jd Ah");
        assert_eq!(h.showdown_hands()["DiggErr555"], "Qs Qc");
        assert_eq!(h.chip_won()["MM7000k"], [1100]);
    }

    #[test_log::test]
    fn test_summary_fields() {
        let h = hand();
        assert_eq!(h.pot_list(), [1100]);
        // The tournament did not end on this hand.
        assert!(h.finishes().is_empty());
        assert!(h.prize_won().is_empty());
    }

    #[test_log::test]
    fn test_hero() {
        let h = hand();
        assert_eq!(h.hero(), Some("DiggErr555"));
        assert_eq!(h.hero_cards(), Some("Qs Qc"));
    }

    #[test_log::test]
    fn test_buy_in_components() {
        let h = hand();
        assert_eq!(h.rake(), Money::parse("0.02").unwrap());
        assert_eq!(h.bounty(), Money::ZERO);
        assert!(!h.is_knockout());
        // bi + bounty + rake
        assert_eq!(h.buy_in(), Money::parse("0.25").unwrap());
    }

    #[test_log::test]
    fn test_positions_and_ranks() {
        let h = hand();
        let pos = h.positions();
        assert_eq!(pos["DiggErr555"], "BB");
        assert_eq!(pos["MM7000k"], "SB");
        assert_eq!(pos["dimitriskous"], "BU");

        assert_eq!(h.tournament_position("dimitriskous"), Some(1));
        assert_eq!(h.tournament_position("MM7000k"), Some(3));
        assert!(h.is_chip_leader("dimitriskous"));
        // The big blind acts last, so their left-rank is the table rank.
        assert_eq!(h.tournament_position_left("DiggErr555"), Some(2));
        // Only the blinds act after the small blind's rotation slot.
        assert_eq!(h.tournament_position_left("MM7000k"), Some(2));
    }

    #[test_log::test]
    fn test_last_actions() {
        let h = hand();
        assert_eq!(h.last_action(Street::Preflop)["MM7000k"], Action::Raise);
        // No betting after the preflop all-in, so preflop is the last street
        // with any action.
        assert_eq!(h.last_actions()["DiggErr555"], [Action::Call]);
        assert_eq!(h.all_in_players(Street::Preflop), ["MM7000k"]);
    }

    #[test_log::test]
    fn test_empty_input_is_structural_error() {
        assert_eq!(Hand::parse("").unwrap_err(), HandParseError::EmptyHand);
        assert_eq!(Hand::parse("  \n \n").unwrap_err(), HandParseError::EmptyHand);
    }

    #[test_log::test]
    fn test_no_seats_is_structural_error() {
        let err = Hand::parse("PokerStars Hand #1: Tournament #2\nno seats here\n").unwrap_err();
        assert_eq!(err, HandParseError::NoSeats);
    }

    #[test_log::test]
    fn test_zero_stack_seats_removed() {
        let text = "\
PokerStars Hand #1: Tournament #2, $0.23+$0.02 USD Hold'em No Limit - Level I (10/20) - 2018/09/02 10:57:35 ET
Seat 1: alive (980 in chips)
Seat 2: busted (0 in chips)
Seat 3: other (2020 in chips)
alive: posts small blind 10
other: posts big blind 20
*** HOLE CARDS ***
";
        let h = Hand::parse(text).unwrap();
        assert_eq!(h.players(), ["alive", "other"]);
        assert_eq!(h.stacks(), [980, 2020]);
        assert!(!h.preflop_order().iter().any(|p| p == "busted"));
    }

    #[test_log::test]
    fn test_small_blind_fallback_rotation() {
        // No big blind post: rotation anchors on the small blind.
        let text = "\
Hand #1: Tournament #2
Seat 1: a (100 in chips)
Seat 2: b (200 in chips)
Seat 3: c (300 in chips)
b: posts small blind 10
*** HOLE CARDS ***
";
        let h = Hand::parse(text).unwrap();
        assert_eq!(h.preflop_order(), ["c", "a", "b"]);
    }

    #[test_log::test]
    fn test_no_blind_posts_means_empty_order() {
        let text = "Hand #1\nSeat 1: a (100 in chips)\nSeat 2: b (50 in chips)\n";
        let h = Hand::parse(text).unwrap();
        assert!(h.preflop_order().is_empty());
    }

    #[test_log::test]
    fn test_finishes_and_prizes() {
        let text = "\
Hand #9: Tournament #7, $0.23+$0.02 USD
Seat 1: winner (2900 in chips)
Seat 2: loser (100 in chips)
winner: posts small blind 50
loser: posts big blind 100
*** HOLE CARDS ***
winner: raises 100 to 200
loser: calls 100
*** SHOW DOWN ***
winner collected 400 from pot
loser finished the tournament in 2nd place
winner wins the tournament and receives $11.00 - congratulations!
*** SUMMARY ***
Total pot 400 | Rake 0
";
        let h = Hand::parse(text).unwrap();
        assert_eq!(h.finishes()["loser"], 2);
        assert_eq!(h.finishes()["winner"], 1);
        assert_eq!(h.prize_won()["winner"], Money::parse("11.00").unwrap());
        assert!(h.is_showdown());
    }

    #[test_log::test]
    fn test_winner_collects_own_bounty() {
        let text = "\
Hand #9: Tournament #7, $2.30+$2.25+$0.45 USD
Seat 1: winner (2900 in chips)
Seat 2: loser (100 in chips)
winner: posts small blind 50
loser: posts big blind 100
*** HOLE CARDS ***
*** SHOW DOWN ***
winner wins the $2.25 bounty for eliminating loser
loser finished the tournament in 2nd place
winner wins the tournament and receives $11.00 - congratulations!
*** SUMMARY ***
Total pot 400 | Rake 0
";
        let h = Hand::parse(text).unwrap();
        assert!(h.is_knockout());
        // Knockout bounty plus their own head bounty for winning.
        assert_eq!(h.bounty_won()["winner"], Money::parse("4.50").unwrap());
    }

    #[test_log::test]
    fn test_uncalled_bet() {
        let text = "\
Hand #9: Tournament #7
Seat 1: a (2900 in chips)
Seat 2: b (100 in chips)
a: posts small blind 50
b: posts big blind 100
*** HOLE CARDS ***
a: raises 200 to 300
Uncalled bet (200) returned to a
a collected 250 from pot
*** SUMMARY ***
Total pot 250 | Rake 0
";
        let h = Hand::parse(text).unwrap();
        assert_eq!(h.uncalled()["a"], 200);
        assert_eq!(h.chip_won()["a"], [250]);
    }

    #[test_log::test]
    fn test_display() {
        assert_eq!(
            hand().to_string(),
            "Hand: #189807795760 Tournament: #2380726500 $0.25"
        );
    }

    #[test_log::test]
    fn test_from_str() {
        let h: Hand = HAND.parse().unwrap();
        assert_eq!(h.tid(), Some(2380726500));
    }

    #[test_log::test]
    fn test_icm_equity_by_name() {
        let h = hand();
        let eq = h.icm_equity(&[0.65, 0.35]).unwrap();
        assert_eq!(eq.len(), 3);
        // Bigger stack, bigger equity.
        assert!(eq["dimitriskous"] > eq["DiggErr555"]);
        assert!(eq["DiggErr555"] > eq["MM7000k"]);
    }

    #[test_log::test]
    fn test_bubble_factor_by_name() {
        let h = hand();
        let bf = h.bubble_factor("dimitriskous", "DiggErr555", &[0.65, 0.35]).unwrap();
        assert!((0.0..1.0).contains(&bf));
        let err = h.bubble_factor("nobody", "DiggErr555", &[0.65, 0.35]).unwrap_err();
        assert!(matches!(err, IcmError::UnknownPlayer(_)));
    }

    #[test_log::test]
    fn test_bubble_factor_table_by_name() {
        let h = hand();
        let table = h.bubble_factors(&[0.65, 0.35]).unwrap();
        assert_eq!(table.len(), 3);
        let row = &table["dimitriskous"];
        assert_eq!(row.len(), 2);
        assert!(!row.contains_key("dimitriskous"));
        assert_eq!(
            row["DiggErr555"],
            h.bubble_factor("dimitriskous", "DiggErr555", &[0.65, 0.35]).unwrap()
        );
    }
}
