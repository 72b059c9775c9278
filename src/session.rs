//! A scoring session: the seated players, their running totals and the
//! per-round undo history.

use crate::error::{Result, TarotError};
use crate::model::{
    calculate_score, distribute_scores, seat_shares, validate_cards, Bid, Bonuses, Player,
    RoundResult, TableSize,
};
use std::collections::HashSet;

/// Copy of every player's name and score at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub players: Vec<Player>,
}

impl GameState {
    /// Take an independent copy; later changes to `players` do not show up here
    pub fn capture(players: &[Player]) -> Self {
        Self {
            players: players.to_vec(),
        }
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }
}

/// LIFO history of `GameState`s, one pushed per played round and dropped
/// again once that round is committed
#[derive(Debug, Default)]
pub struct UndoStack {
    states: Vec<GameState>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: GameState) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<GameState> {
        self.states.pop()
    }

    /// Players as they were before the most recent round, or `None` when
    /// nothing has been played
    pub fn restore(&mut self) -> Option<Vec<Player>> {
        self.pop().map(GameState::into_players)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// What the table reports at the end of a round
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub taker: usize,
    /// Seat holding the called card; only used at 5 players
    pub partner: Option<usize>,
    pub bid: Bid,
    /// Card tokens captured by the taker, as entered
    pub cards: Vec<String>,
    pub bonuses: Bonuses,
}

#[derive(Debug)]
pub struct Session {
    players: Vec<Player>,
    table: TableSize,
    history: UndoStack,
    rounds_played: u32,
}

impl Session {
    /// Seat 3 to 5 players with distinct, non-empty names
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let table = TableSize::from_count(names.len())?;

        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(TarotError::InvalidPlayers("player names cannot be empty".to_string()));
            }
            if !seen.insert(name.to_string()) {
                return Err(TarotError::InvalidPlayers(format!("'{}' is seated twice", name)));
            }
            players.push(Player::new(name));
        }

        Ok(Self {
            players,
            table,
            history: UndoStack::new(),
            rounds_played: 0,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn table(&self) -> TableSize {
        self.table
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of played rounds that can still be undone
    pub fn undo_levels(&self) -> usize {
        self.history.len()
    }

    /// Check taker and partner seats without touching any score
    pub fn check_selection(&self, taker: usize, partner: Option<usize>) -> Result<()> {
        seat_shares(self.table, taker, partner).map(|_| ())
    }

    /// Validate, score and settle one round.
    ///
    /// A snapshot is pushed right before the scores change, so a rejected
    /// round leaves both the totals and the undo history untouched.
    pub fn play_round(&mut self, round: &Round) -> Result<RoundResult> {
        self.check_selection(round.taker, round.partner)?;
        let cards = validate_cards(&round.cards)?;
        let result = calculate_score(&cards, round.bid, self.table, &round.bonuses);

        self.history.push(GameState::capture(&self.players));
        if let Err(e) = distribute_scores(
            &mut self.players,
            round.taker,
            round.partner,
            result.magnitude,
            self.table,
        ) {
            self.history.pop();
            return Err(e);
        }
        self.rounds_played += 1;

        log::info!(
            "Round {}: {} {} by {} for {}",
            self.rounds_played,
            round.bid,
            if result.made() { "made" } else { "failed" },
            self.players[round.taker].name,
            result.magnitude
        );

        Ok(result)
    }

    /// Put the scores back to where they were before the last played round.
    /// Returns false when there is nothing to undo.
    pub fn undo_last_round(&mut self) -> bool {
        match self.history.restore() {
            Some(players) => {
                self.players = players;
                self.rounds_played = self.rounds_played.saturating_sub(1);
                log::info!("Undid round {}", self.rounds_played + 1);
                true
            }
            None => false,
        }
    }

    /// Accept the last played round: its snapshot is dropped and the round
    /// can no longer be undone. Returns false when no round is pending.
    pub fn commit_round(&mut self) -> bool {
        match self.history.pop() {
            Some(_) => {
                log::info!("Committed round {}", self.rounds_played);
                true
            }
            None => false,
        }
    }

    /// Players ordered by score, highest first; ties keep seating order
    pub fn standings(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Slam;

    fn round(taker: usize, partner: Option<usize>, bid: Bid, cards: &str) -> Round {
        Round {
            taker,
            partner,
            bid,
            cards: cards.split_whitespace().map(String::from).collect(),
            bonuses: Bonuses::default(),
        }
    }

    fn scores(session: &Session) -> Vec<f64> {
        session.players().iter().map(|p| p.score).collect()
    }

    #[test]
    fn test_new_session() {
        let session = Session::new(&["Michael", "Joe", "Devin", "Seth"]).unwrap();
        assert_eq!(session.table(), TableSize::Four);
        assert_eq!(session.players().len(), 4);
        assert!(session.players().iter().all(|p| p.score == 0.0));
        assert!(!session.can_undo());
    }

    #[test]
    fn test_new_session_rejects_bad_tables() {
        assert!(Session::new(&["A", "B"]).is_err());
        assert!(Session::new(&["A", "B", "C", "D", "E", "F"]).is_err());
        assert!(Session::new(&["A", "B", "A"]).is_err());
        assert!(Session::new(&["A", "  ", "C"]).is_err());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut players = vec![Player::new("A"), Player::new("B").with_score(12.5)];
        let state = GameState::capture(&players);

        players[0].score = 99.0;
        players[1].name = "Changed".to_string();

        let mut stack = UndoStack::new();
        stack.push(state);
        assert_eq!(stack.len(), 1);
        let restored = stack.restore().unwrap();
        assert_eq!(restored, vec![Player::new("A"), Player::new("B").with_score(12.5)]);
        assert!(stack.restore().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_play_round_four_players() {
        let mut session = Session::new(&["A", "B", "C", "D"]).unwrap();
        let result = session.play_round(&round(0, None, Bid::Small, "1h r d")).unwrap();
        assert_eq!(result.magnitude, -63.5);
        assert_eq!(scores(&session), vec![-190.5, 63.5, 63.5, 63.5]);
        assert_eq!(session.rounds_played(), 1);
    }

    #[test]
    fn test_play_round_five_players() {
        let mut session = Session::new(&["A", "B", "C", "D", "E"]).unwrap();
        let mut r = round(1, Some(3), Bid::Guard, "f 1h 21 r r r r d d d d");
        r.bonuses.slam = Slam::UndeclaredMade;
        let result = session.play_round(&r).unwrap();
        // (25 + 9.5) * 2 + 200
        assert_eq!(result.magnitude, 269.0);
        assert_eq!(scores(&session), vec![-269.0, 538.0, -269.0, 269.0, -269.0]);
    }

    #[test]
    fn test_rejected_round_changes_nothing() {
        let mut session = Session::new(&["A", "B", "C"]).unwrap();
        assert!(matches!(
            session.play_round(&round(3, None, Bid::Small, "r")),
            Err(TarotError::InvalidSelection(_))
        ));
        assert!(matches!(
            session.play_round(&round(0, None, Bid::Small, "r r r r r")),
            Err(TarotError::InvalidCard(_))
        ));
        assert!(!session.can_undo());
        assert_eq!(session.rounds_played(), 0);
        assert_eq!(scores(&session), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_five_players_need_partner() {
        let mut session = Session::new(&["A", "B", "C", "D", "E"]).unwrap();
        assert!(session.check_selection(0, None).is_err());
        assert!(session.check_selection(0, Some(0)).is_ok());
        assert!(session.play_round(&round(0, None, Bid::Small, "r")).is_err());
    }

    #[test]
    fn test_undo_restores_previous_round() {
        let mut session = Session::new(&["A", "B", "C", "D"]).unwrap();
        session.play_round(&round(0, None, Bid::Small, "1h r d")).unwrap();
        let after_first = scores(&session);

        session.play_round(&round(2, None, Bid::Guard, "f 21 r r")).unwrap();
        assert_ne!(scores(&session), after_first);

        assert!(session.undo_last_round());
        assert_eq!(scores(&session), after_first);
        assert_eq!(session.rounds_played(), 1);

        assert!(session.undo_last_round());
        assert_eq!(scores(&session), vec![0.0; 4]);
        assert_eq!(session.rounds_played(), 0);

        assert!(!session.undo_last_round());
        assert_eq!(scores(&session), vec![0.0; 4]);
    }

    #[test]
    fn test_committed_round_cannot_be_undone() {
        let mut session = Session::new(&["A", "B", "C", "D"]).unwrap();
        for taker in 0..3 {
            session.play_round(&round(taker, None, Bid::Small, "1h r d")).unwrap();
            assert_eq!(session.undo_levels(), 1);
            assert!(session.commit_round());
            assert_eq!(session.undo_levels(), 0);
        }
        let committed = scores(&session);

        assert!(!session.undo_last_round());
        assert!(!session.commit_round());
        assert_eq!(scores(&session), committed);
        assert_eq!(session.rounds_played(), 3);
    }

    #[test]
    fn test_undo_only_rewinds_uncommitted_round() {
        let mut session = Session::new(&["A", "B", "C"]).unwrap();
        session.play_round(&round(0, None, Bid::Small, "r")).unwrap();
        session.commit_round();
        let after_first = scores(&session);

        session.play_round(&round(1, None, Bid::Guard, "f 21 r r")).unwrap();
        assert!(session.undo_last_round());
        assert_eq!(scores(&session), after_first);
        assert_eq!(session.rounds_played(), 1);
        assert!(!session.undo_last_round());
        assert_eq!(scores(&session), after_first);
    }

    #[test]
    fn test_standings() {
        let mut session = Session::new(&["A", "B", "C"]).unwrap();
        session.play_round(&round(1, None, Bid::Small, "r")).unwrap();
        let names: Vec<&str> = session.standings().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }
}
