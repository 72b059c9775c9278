//! French Tarot round scoring and settlement between players

use super::bid::Bid;
use super::card::Card;
use super::player::Player;
use super::table::TableSize;
use crate::error::{Result, TarotError};

/// Base value of every contract, before the point difference is added
pub const CONTRACT_BASE: f64 = 25.0;

/// Bonus for winning the last trick with the Petit
pub const PETIT_BONUS: i32 = 10;

/// Slam outcome for the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slam {
    #[default]
    None,
    DeclaredMade,
    DeclaredMissed,
    UndeclaredMade,
}

impl Slam {
    /// Build from the two table questions: was a slam announced, and did the
    /// taker's side win every trick
    pub fn from_answers(declared: bool, made: bool) -> Slam {
        match (declared, made) {
            (true, true) => Slam::DeclaredMade,
            (true, false) => Slam::DeclaredMissed,
            (false, true) => Slam::UndeclaredMade,
            (false, false) => Slam::None,
        }
    }

    pub fn bonus(&self) -> i32 {
        match self {
            Slam::None => 0,
            Slam::DeclaredMade => 400,
            Slam::DeclaredMissed => -200,
            Slam::UndeclaredMade => 200,
        }
    }
}

/// Optional bonuses announced or earned during the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bonuses {
    /// Petit won in the last trick
    pub petit: bool,
    /// Number of trumps shown in a declared handful
    pub handful: Option<u32>,
    pub slam: Slam,
}

/// Everything computed for one round, kept for display and settlement
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub points: f64,
    pub honors: usize,
    pub threshold: f64,
    pub diff: f64,
    pub petit_bonus: i32,
    pub handful_bonus: i32,
    pub slam_bonus: i32,
    pub multiplier: i32,
    /// Signed: positive when the taker made the contract
    pub magnitude: f64,
}

impl RoundResult {
    pub fn made(&self) -> bool {
        self.points >= self.threshold
    }

    /// One-line summary of how the magnitude was built
    pub fn breakdown(&self) -> String {
        format!(
            "({} + {} + {}) x {} + {} (slam) + {} (handful) = {} {} the taker",
            CONTRACT_BASE,
            self.diff,
            self.petit_bonus,
            self.multiplier,
            self.slam_bonus,
            self.handful_bonus,
            self.magnitude.abs(),
            if self.made() { "for" } else { "against" }
        )
    }
}

/// Points the taker needs for a given number of honors (Excuse, Petit,
/// Twenty-one). Counts above 3 cannot come out of a validated pile and fall
/// back to the 3-honor threshold.
pub fn threshold_for_honors(honors: usize) -> f64 {
    match honors {
        0 => 56.0,
        1 => 51.0,
        2 => 41.0,
        _ => 36.0,
    }
}

/// Score a round from the taker's captured cards.
///
/// `cards` is expected to have gone through `validate_cards`. The magnitude is
/// `(25 + |points - threshold| + petit) * multiplier + slam + handful`,
/// negated when the taker fell short of the threshold.
pub fn calculate_score(
    cards: &[Card],
    bid: Bid,
    table: TableSize,
    bonuses: &Bonuses,
) -> RoundResult {
    let honor_points: f64 = cards.iter().filter(|c| c.is_honor()).map(|c| c.points()).sum();
    let other_points: f64 = cards.iter().filter(|c| !c.is_honor()).map(|c| c.points()).sum();
    let points = honor_points + other_points;

    let honors = cards.iter().filter(|c| c.is_honor()).count();
    let threshold = threshold_for_honors(honors);
    let diff = (points - threshold).abs();

    let petit_bonus = if bonuses.petit { PETIT_BONUS } else { 0 };

    let handful_bonus = match bonuses.handful {
        Some(count) => table.handful_bonus(count).unwrap_or_else(|| {
            log::warn!(
                "No handful of {} trumps at {} (valid: {:?}), counting 0",
                count,
                table,
                table.handful_counts()
            );
            0
        }),
        None => 0,
    };

    let slam_bonus = bonuses.slam.bonus();
    let multiplier = bid.multiplier();

    let stake = (CONTRACT_BASE + diff + petit_bonus as f64) * multiplier as f64
        + slam_bonus as f64
        + handful_bonus as f64;
    let magnitude = if points >= threshold { stake } else { -stake };

    let result = RoundResult {
        points,
        honors,
        threshold,
        diff,
        petit_bonus,
        handful_bonus,
        slam_bonus,
        multiplier,
        magnitude,
    };

    log::debug!(
        "{} at {}: {} points, {} honor(s), threshold {}: {}",
        bid,
        table,
        points,
        honors,
        threshold,
        result.breakdown()
    );

    result
}

/// Per-seat multiples of the round magnitude.
///
/// Every defender pays one magnitude, a called partner at 5 players receives
/// one, and the taker collects the rest: 2x at 3 players, 3x at 4, 2x at 5
/// with a partner and 4x when the taker called their own card.
pub fn seat_shares(table: TableSize, taker: usize, partner: Option<usize>) -> Result<Vec<i32>> {
    let seats = table.player_count();
    if taker >= seats {
        return Err(TarotError::InvalidSelection(format!(
            "taker index {} (expected 0-{})",
            taker,
            seats - 1
        )));
    }

    let partner = if table.has_partner() {
        match partner {
            Some(p) if p < seats => Some(p),
            Some(p) => {
                return Err(TarotError::InvalidSelection(format!(
                    "partner index {} (expected 0-{})",
                    p,
                    seats - 1
                )))
            }
            None => {
                return Err(TarotError::InvalidSelection(
                    "a partner is required at 5 players".to_string(),
                ))
            }
        }
    } else {
        None
    };

    let mut shares = vec![-1; seats];
    shares[taker] = table.taker_share();
    match partner {
        Some(p) if p != taker => shares[p] = table.partner_share(),
        // Called their own card: four defenders pay the taker alone
        Some(_) => shares[taker] += table.partner_share() + 1,
        None => {}
    }

    Ok(shares)
}

/// Apply a round's magnitude to every player's running total.
///
/// Nothing is changed if the selection is invalid or the number of players
/// does not match `table`. Scores always sum to the same total before and
/// after.
pub fn distribute_scores(
    players: &mut [Player],
    taker: usize,
    partner: Option<usize>,
    magnitude: f64,
    table: TableSize,
) -> Result<()> {
    if players.len() != table.player_count() {
        return Err(TarotError::InvalidSelection(format!(
            "{} players seated for a {} table",
            players.len(),
            table.player_count()
        )));
    }

    let shares = seat_shares(table, taker, partner)?;
    for (player, share) in players.iter_mut().zip(shares) {
        player.score += share as f64 * magnitude;
    }

    Ok(())
}
