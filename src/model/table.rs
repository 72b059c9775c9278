use crate::error::{Result, TarotError};
use std::fmt;

/// Number of players at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSize {
    Three,
    Four,
    Five,
}

impl TableSize {
    pub fn from_count(players: usize) -> Result<Self> {
        match players {
            3 => Ok(TableSize::Three),
            4 => Ok(TableSize::Four),
            5 => Ok(TableSize::Five),
            n => Err(TarotError::InvalidPlayers(format!(
                "{} players (French Tarot is played by 3, 4 or 5)",
                n
            ))),
        }
    }

    pub fn player_count(&self) -> usize {
        match self {
            TableSize::Three => 3,
            TableSize::Four => 4,
            TableSize::Five => 5,
        }
    }

    /// Only the 5-player game has a called partner
    pub fn has_partner(&self) -> bool {
        matches!(self, TableSize::Five)
    }

    /// Handful bonus for a declared number of trumps, if that count is a
    /// recognized handful at this table
    pub fn handful_bonus(&self, cards: u32) -> Option<i32> {
        match (self, cards) {
            (TableSize::Three | TableSize::Four, 10) => Some(20),
            (TableSize::Three | TableSize::Four, 13) => Some(30),
            (TableSize::Three | TableSize::Four, 15) => Some(40),
            (TableSize::Five, 8) => Some(20),
            (TableSize::Five, 10) => Some(30),
            (TableSize::Five, 13) => Some(40),
            _ => None,
        }
    }

    /// Recognized handful sizes, smallest first
    pub fn handful_counts(&self) -> [u32; 3] {
        match self {
            TableSize::Three | TableSize::Four => [10, 13, 15],
            TableSize::Five => [8, 10, 13],
        }
    }

    /// How many times the round magnitude the taker receives when playing
    /// alone against everybody else (3 and 4 players) or with a partner (5).
    pub fn taker_share(&self) -> i32 {
        match self {
            TableSize::Three => 2,
            TableSize::Four => 3,
            TableSize::Five => 2,
        }
    }

    /// The called partner's share; zero where there is no partner
    pub fn partner_share(&self) -> i32 {
        match self {
            TableSize::Five => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for TableSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} players", self.player_count())
    }
}
