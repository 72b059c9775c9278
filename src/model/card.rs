use crate::error::{Result, TarotError};
use nom::{
    bytes::complete::{take_while, take_while1},
    multi::separated_list0,
    sequence::delimited,
    IResult, Parser,
};
use std::collections::HashMap;
use std::fmt;

/// The four court ranks. Suits are not tracked, only the rank matters for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    King,
    Queen,
    Knight,
    Jack,
}

impl Face {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Face::King),
            'd' => Some(Face::Queen),
            'c' => Some(Face::Knight),
            'v' => Some(Face::Jack),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Face::King => 'r',
            Face::Queen => 'd',
            Face::Knight => 'c',
            Face::Jack => 'v',
        }
    }

    pub fn points(&self) -> f64 {
        match self {
            Face::King => 4.5,
            Face::Queen => 3.5,
            Face::Knight => 2.5,
            Face::Jack => 1.5,
        }
    }
}

/// A card token as entered at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Card {
    /// "f"
    Excuse,
    /// "1h"
    Petit,
    /// "21"
    TwentyOne,
    /// "1" to "20"
    Number(u8),
    Face(Face),
}

impl Card {
    /// Parse a card token ("f", "1h", "21", "1"-"20", "r", "d", "c", "v")
    pub fn from_token(token: &str) -> Option<Card> {
        let token = token.trim().to_lowercase();
        match token.as_str() {
            "f" => Some(Card::Excuse),
            "1h" => Some(Card::Petit),
            "21" => Some(Card::TwentyOne),
            s => {
                if let Ok(n) = s.parse::<u8>() {
                    // Reject "+5", "05" and friends
                    if (1..=20).contains(&n) && n.to_string() == s {
                        return Some(Card::Number(n));
                    }
                    return None;
                }
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Face::from_char(c).map(Card::Face),
                    _ => None,
                }
            }
        }
    }

    pub fn to_token(&self) -> String {
        match self {
            Card::Excuse => "f".to_string(),
            Card::Petit => "1h".to_string(),
            Card::TwentyOne => "21".to_string(),
            Card::Number(n) => n.to_string(),
            Card::Face(face) => face.to_char().to_string(),
        }
    }

    /// Excuse, Petit and Twenty-one
    pub fn is_honor(&self) -> bool {
        matches!(self, Card::Excuse | Card::Petit | Card::TwentyOne)
    }

    pub fn points(&self) -> f64 {
        match self {
            Card::Excuse | Card::Petit | Card::TwentyOne => 4.5,
            Card::Face(face) => face.points(),
            Card::Number(_) => 0.5,
        }
    }

    /// How many times this token may appear in one captured pile
    pub fn max_copies(&self) -> usize {
        match self {
            Card::Excuse | Card::Petit | Card::TwentyOne => 1,
            Card::Number(1..=10) => 5,
            Card::Number(_) => 1,
            Card::Face(_) => 4,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}

/// Check captured card tokens against the deck composition.
///
/// Tokens are scanned in order and the first violation is reported: an unknown
/// token, or a card seen more often than `Card::max_copies` allows. Honors and
/// the numbers 11-20 are each capped at one copy regardless of any face-card
/// count. There is no check on the total number of cards.
pub fn validate_cards<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Card>> {
    let mut counts: HashMap<Card, usize> = HashMap::new();
    let mut cards = Vec::with_capacity(tokens.len());

    for token in tokens {
        let token = token.as_ref();
        let card = Card::from_token(token)
            .ok_or_else(|| TarotError::InvalidCard(format!("'{}' is not a tarot card", token)))?;

        let count = counts.entry(card).or_insert(0);
        *count += 1;
        if *count > card.max_copies() {
            return Err(TarotError::InvalidCard(format!(
                "'{}' appears {} times (at most {} allowed)",
                card,
                count,
                card.max_copies()
            )));
        }

        cards.push(card);
    }

    Ok(cards)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Parse one token: letters and digits ("1h", "r", "14")
fn card_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric()).parse(input)
}

fn separators0(input: &str) -> IResult<&str, &str> {
    take_while(is_separator).parse(input)
}

fn separators1(input: &str) -> IResult<&str, &str> {
    take_while1(is_separator).parse(input)
}

/// Split a line such as "r d 3 10" or "1h, 21, f" into lowercase tokens.
///
/// Only tokenizes; use `validate_cards` to check the tokens themselves.
pub fn parse_card_list(input: &str) -> Result<Vec<String>> {
    let line = input.to_lowercase();
    let parsed = delimited(
        separators0,
        separated_list0(separators1, card_token),
        separators0,
    )
    .parse(line.as_str());

    match parsed {
        Ok(("", tokens)) => Ok(tokens.into_iter().map(String::from).collect()),
        Ok((rest, _)) => Err(TarotError::InvalidCard(format!(
            "unexpected input '{}'",
            rest.trim()
        ))),
        Err(e) => Err(TarotError::InvalidCard(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_from_token() {
        assert_eq!(Card::from_token("f"), Some(Card::Excuse));
        assert_eq!(Card::from_token("1h"), Some(Card::Petit));
        assert_eq!(Card::from_token("21"), Some(Card::TwentyOne));
        assert_eq!(Card::from_token("1"), Some(Card::Number(1)));
        assert_eq!(Card::from_token("20"), Some(Card::Number(20)));
        assert_eq!(Card::from_token("R"), Some(Card::Face(Face::King)));
        assert_eq!(Card::from_token("v"), Some(Card::Face(Face::Jack)));

        assert_eq!(Card::from_token("0"), None);
        assert_eq!(Card::from_token("22"), None);
        assert_eq!(Card::from_token("05"), None);
        assert_eq!(Card::from_token("+5"), None);
        assert_eq!(Card::from_token("x"), None);
        assert_eq!(Card::from_token("rd"), None);
        assert_eq!(Card::from_token(""), None);
    }

    #[test]
    fn test_card_points() {
        assert_eq!(Card::Excuse.points(), 4.5);
        assert_eq!(Card::Petit.points(), 4.5);
        assert_eq!(Card::TwentyOne.points(), 4.5);
        assert_eq!(Card::Face(Face::King).points(), 4.5);
        assert_eq!(Card::Face(Face::Queen).points(), 3.5);
        assert_eq!(Card::Face(Face::Knight).points(), 2.5);
        assert_eq!(Card::Face(Face::Jack).points(), 1.5);
        assert_eq!(Card::Number(7).points(), 0.5);
        assert_eq!(Card::Number(18).points(), 0.5);
    }

    #[test]
    fn test_token_round_trip() {
        for token in ["f", "1h", "21", "1", "10", "11", "20", "r", "d", "c", "v"] {
            let card = Card::from_token(token).unwrap();
            assert_eq!(card.to_token(), token);
        }
    }

    #[test]
    fn test_validate_accepts_legal_pile() {
        let cards = validate_cards(&["1h", "r", "d", "3", "10", "15", "f"]).unwrap();
        assert_eq!(cards.len(), 7);
        assert_eq!(cards[0], Card::Petit);
    }

    #[test]
    fn test_validate_unknown_token() {
        let err = validate_cards(&["r", "zz"]).unwrap_err();
        assert!(err.to_string().contains("'zz'"));
    }

    #[test]
    fn test_validate_low_number_cap() {
        assert!(validate_cards(&["5"; 5]).is_ok());
        let err = validate_cards(&["5"; 6]).unwrap_err();
        assert!(matches!(err, TarotError::InvalidCard(_)));
    }

    #[test]
    fn test_validate_honor_cap() {
        assert!(validate_cards(&["21", "21"]).is_err());
        assert!(validate_cards(&["f", "f"]).is_err());
        assert!(validate_cards(&["1h", "1h"]).is_err());
    }

    #[test]
    fn test_validate_face_cap() {
        assert!(validate_cards(&["r"; 4]).is_ok());
        assert!(validate_cards(&["r"; 5]).is_err());
    }

    #[test]
    fn test_validate_high_number_cap_independent_of_faces() {
        // A historical version combined this rule with the face check and let
        // duplicate high numbers through when no face card was involved.
        assert!(validate_cards(&["14", "14"]).is_err());
        assert!(validate_cards(&["r", "r", "14", "14"]).is_err());
        assert!(validate_cards(&["11", "12", "13", "r", "r"]).is_ok());
    }

    #[test]
    fn test_validate_reports_first_violation() {
        let err = validate_cards(&["21", "21", "bogus"]).unwrap_err();
        assert!(err.to_string().contains("'21'"));
    }

    #[test]
    fn test_parse_card_list() {
        assert_eq!(
            parse_card_list("r d 3 10").unwrap(),
            vec!["r", "d", "3", "10"]
        );
        assert_eq!(
            parse_card_list("  1H, 21 ,f  ").unwrap(),
            vec!["1h", "21", "f"]
        );
        assert!(parse_card_list("").unwrap().is_empty());
        assert!(parse_card_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_card_list_rejects_punctuation() {
        let err = parse_card_list("r d; 3").unwrap_err();
        assert!(err.to_string().contains("; 3"));
    }
}
