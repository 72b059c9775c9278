//! Interactive scoring session over any line-based input and output.
//!
//! The binary wires this to stdin/stdout; tests drive it with in-memory
//! buffers.

use crate::error::{Result, TarotError};
use crate::model::{parse_card_list, validate_cards, Bid, Bonuses, Slam};
use crate::session::{Round, Session};
use std::io::{BufRead, Write};

/// What is already known before the first prompt
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Player names in seating order; prompted for when empty
    pub players: Vec<String>,
    /// Number of rounds to score; prompted for when `None`
    pub rounds: Option<u32>,
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run a whole session and return it in its final state.
    ///
    /// Running out of input ends the session early; whatever was committed up
    /// to that point is kept and the standings are still printed.
    pub fn run(&mut self, config: SessionConfig) -> Result<Option<Session>> {
        let mut session = match self.seat_players(config.players) {
            Ok(session) => session,
            Err(TarotError::EndOfInput) => return Ok(None),
            Err(e) => return Err(e),
        };

        let rounds = match config.rounds {
            Some(rounds) => rounds,
            None => match self.ask_parsed("Enter the number of rounds: ", parse_round_count) {
                Ok(rounds) => rounds,
                Err(TarotError::EndOfInput) => return Ok(Some(session)),
                Err(e) => return Err(e),
            },
        };

        while session.rounds_played() < rounds {
            match self.play_one_round(&mut session) {
                Ok(()) => {}
                Err(TarotError::EndOfInput) => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Input ended, stopping early.")?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        self.print_standings(&session)?;
        Ok(Some(session))
    }

    fn seat_players(&mut self, names: Vec<String>) -> Result<Session> {
        if !names.is_empty() {
            return Session::new(&names);
        }

        let count = self.ask_parsed("Enter the number of players (3-5): ", |s| {
            match s.trim().parse::<usize>() {
                Ok(n @ 3..=5) => Ok(n),
                _ => Err("please enter 3, 4 or 5".to_string()),
            }
        })?;

        let mut names: Vec<String> = Vec::with_capacity(count);
        for seat in 0..count {
            let prompt = format!("Name of player {}: ", seat);
            let name = self.ask_parsed(&prompt, |s| {
                let name = s.trim();
                if name.is_empty() {
                    Err("a name is required".to_string())
                } else if names.iter().any(|n| n == name) {
                    Err(format!("'{}' is already seated", name))
                } else {
                    Ok(name.to_string())
                }
            })?;
            names.push(name);
        }

        Session::new(&names)
    }

    fn play_one_round(&mut self, session: &mut Session) -> Result<()> {
        let seats = session.table().player_count();
        writeln!(self.output)?;
        writeln!(self.output, "Round {}", session.rounds_played() + 1)?;
        for (seat, player) in session.players().iter().enumerate() {
            writeln!(self.output, "  {}: {} ({})", seat, player.name, player.score)?;
        }

        let seat_range = format!("0-{}", seats - 1);
        let taker = self.ask_parsed(
            &format!("Enter the index ({}) of the taker: ", seat_range),
            |s| parse_seat(s, seats),
        )?;

        let partner = if session.table().has_partner() {
            let partner = self.ask_parsed(
                &format!(
                    "Enter the index ({}) of the player holding the called card: ",
                    seat_range
                ),
                |s| parse_seat(s, seats),
            )?;
            Some(partner)
        } else {
            None
        };
        session.check_selection(taker, partner)?;

        let bid = self.ask_parsed(
            "Enter the bid (small, guard, guard without, guard against): ",
            |s| s.parse::<Bid>().map_err(|e| e.to_string()),
        )?;
        writeln!(self.output, "Reminder: {}", bid.kitty_reminder())?;

        let cards = self.ask_parsed(
            "Enter the cards won by the taker, separated by spaces (e.g. r d 3 10): ",
            |s| {
                let tokens = parse_card_list(s).map_err(|e| e.to_string())?;
                validate_cards(&tokens).map_err(|e| e.to_string())?;
                Ok(tokens)
            },
        )?;

        let bonuses = self.ask_bonuses(session)?;

        let before: Vec<f64> = session.players().iter().map(|p| p.score).collect();
        let result = session.play_round(&Round {
            taker,
            partner,
            bid,
            cards,
            bonuses,
        })?;

        writeln!(
            self.output,
            "The taker had {} honor card(s). The required score threshold was {} points.",
            result.honors, result.threshold
        )?;
        writeln!(
            self.output,
            "{} captured {} points: contract {} by {}.",
            session.players()[taker].name,
            result.points,
            if result.made() { "made" } else { "failed" },
            result.diff
        )?;
        writeln!(self.output, "Score: {}", result.breakdown())?;
        for (player, old) in session.players().iter().zip(before) {
            writeln!(
                self.output,
                "  {}: {:+} -> {}",
                player.name,
                player.score - old,
                player.score
            )?;
        }

        if self.ask_yes_no("Undo this round? (y/n): ")? {
            session.undo_last_round();
            writeln!(self.output, "Round undone.")?;
        } else {
            session.commit_round();
        }

        Ok(())
    }

    fn ask_bonuses(&mut self, session: &Session) -> Result<Bonuses> {
        let petit = self.ask_yes_no("Petit bonus? (y/n): ")?;

        let handful = if self.ask_yes_no("Handful bonus? (y/n): ")? {
            let [a, b, c] = session.table().handful_counts();
            let count = self.ask_parsed(
                &format!("How many trumps? ({}, {} or {}): ", a, b, c),
                |s| {
                    s.trim()
                        .parse::<u32>()
                        .map_err(|_| "please enter a number".to_string())
                },
            )?;
            Some(count)
        } else {
            None
        };

        let slam = if self.ask_yes_no("Slam bonus? (y/n): ")? {
            if self.ask_yes_no("Was the slam declared? (y/n): ")? {
                let made = self.ask_yes_no("Slam met? (y/n): ")?;
                Slam::from_answers(true, made)
            } else {
                Slam::UndeclaredMade
            }
        } else {
            Slam::None
        };

        Ok(Bonuses {
            petit,
            handful,
            slam,
        })
    }

    fn print_standings(&mut self, session: &Session) -> Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Final standings after {} round(s):",
            session.rounds_played()
        )?;
        for (place, player) in session.standings().iter().enumerate() {
            writeln!(self.output, "  {}. {}: {}", place + 1, player.name, player.score)?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TarotError::EndOfInput);
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    /// Ask until `parse` accepts the answer, echoing its complaint each time
    fn ask_parsed<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    log::debug!("Rejected answer '{}': {}", answer, reason);
                    writeln!(self.output, "Invalid answer: {}", reason)?;
                }
            }
        }
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        self.ask_parsed(prompt, |s| match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Err("please answer y or n".to_string()),
        })
    }
}

fn parse_seat(s: &str, seats: usize) -> std::result::Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(seat) if seat < seats => Ok(seat),
        _ => Err(format!("expected a seat between 0 and {}", seats - 1)),
    }
}

fn parse_round_count(s: &str) -> std::result::Result<u32, String> {
    match s.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("expected a positive number of rounds".to_string()),
    }
}

/// Convenience wrapper for a console over the given streams
pub fn run_session<R: BufRead, W: Write>(
    input: R,
    output: W,
    config: SessionConfig,
) -> Result<Option<Session>> {
    Console::new(input, output).run(config)
}
