use crate::error::{Result, TarotError};
use std::fmt;
use std::str::FromStr;

/// Contract levels, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bid {
    Small,
    Guard,
    GuardWithout,
    GuardAgainst,
}

impl Bid {
    pub const ALL: [Bid; 4] = [Bid::Small, Bid::Guard, Bid::GuardWithout, Bid::GuardAgainst];

    /// Multiplier applied to the base score
    pub fn multiplier(&self) -> i32 {
        match self {
            Bid::Small => 1,
            Bid::Guard => 2,
            Bid::GuardWithout => 4,
            Bid::GuardAgainst => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bid::Small => "small",
            Bid::Guard => "guard",
            Bid::GuardWithout => "guard without",
            Bid::GuardAgainst => "guard against",
        }
    }

    /// What happens to the kitty under this bid
    pub fn kitty_reminder(&self) -> &'static str {
        match self {
            Bid::Small | Bid::Guard => {
                "Please add the points from the kitty to the taker's cards."
            }
            Bid::GuardWithout => {
                "The kitty stays hidden, but its points count for the taker."
            }
            Bid::GuardAgainst => {
                "The kitty stays hidden and its points go to the defenders."
            }
        }
    }
}

impl FromStr for Bid {
    type Err = TarotError;

    /// Parse "small", "guard", "guard without" or "guard against" (case and
    /// spacing insensitive)
    fn from_str(s: &str) -> Result<Bid> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "small" => Ok(Bid::Small),
            "guard" => Ok(Bid::Guard),
            "guard without" => Ok(Bid::GuardWithout),
            "guard against" => Ok(Bid::GuardAgainst),
            _ => Err(TarotError::InvalidBid(format!(
                "'{}' (expected small, guard, guard without or guard against)",
                s.trim()
            ))),
        }
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
