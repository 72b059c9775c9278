use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;

use tarot_counter::console::{self, SessionConfig};
use tarot_counter::{
    calculate_score, parse_card_list, seat_shares, threshold_for_honors, validate_cards, Bid,
    Bonuses, Card, Slam, TableSize,
};

#[derive(Parser)]
#[command(name = "tarot-counter")]
#[command(about = "Keep score of French Tarot games for 3 to 5 players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a whole session interactively
    Play {
        /// Player names in seating order, comma separated (prompted for if omitted)
        #[arg(short, long, env = "TAROT_PLAYERS", value_delimiter = ',')]
        players: Vec<String>,

        /// Number of rounds to play (prompted for if omitted)
        #[arg(short, long, env = "TAROT_ROUNDS")]
        rounds: Option<u32>,
    },

    /// Score a single round without keeping totals
    Score {
        /// Cards won by the taker, e.g. "1h r d 3 10"
        #[arg(short, long)]
        cards: String,

        /// small, guard, "guard without" or "guard against"
        #[arg(short, long, default_value = "small")]
        bid: Bid,

        /// Number of players at the table (3-5)
        #[arg(short = 'n', long, default_value_t = 4)]
        players: usize,

        /// The Petit was won in the last trick
        #[arg(long)]
        petit: bool,

        /// Number of trumps shown in a declared handful
        #[arg(long)]
        handful: Option<u32>,

        /// Slam outcome
        #[arg(long, value_enum, default_value_t = SlamArg::None)]
        slam: SlamArg,

        /// The taker called their own card (5 players)
        #[arg(long)]
        self_called: bool,
    },

    /// Check a list of captured cards
    Check {
        /// Card tokens, e.g. 1h r d 3 10
        #[arg(required = true)]
        cards: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SlamArg {
    None,
    DeclaredMade,
    DeclaredMissed,
    UndeclaredMade,
}

impl From<SlamArg> for Slam {
    fn from(arg: SlamArg) -> Slam {
        match arg {
            SlamArg::None => Slam::None,
            SlamArg::DeclaredMade => Slam::DeclaredMade,
            SlamArg::DeclaredMissed => Slam::DeclaredMissed,
            SlamArg::UndeclaredMade => Slam::UndeclaredMade,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { players, rounds } => {
            play(players, rounds)?;
        }
        Commands::Score {
            cards,
            bid,
            players,
            petit,
            handful,
            slam,
            self_called,
        } => {
            let bonuses = Bonuses {
                petit,
                handful,
                slam: slam.into(),
            };
            score(&cards, bid, players, &bonuses, self_called)?;
        }
        Commands::Check { cards } => {
            check(&cards.join(" "))?;
        }
    }

    Ok(())
}

fn play(players: Vec<String>, rounds: Option<u32>) -> Result<()> {
    let players: Vec<String> = players
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let stdin = io::stdin();
    let config = SessionConfig { players, rounds };
    console::run_session(stdin.lock(), io::stdout(), config)
        .context("Scoring session failed")?;

    Ok(())
}

fn read_cards(line: &str) -> Result<Vec<Card>> {
    let tokens = parse_card_list(line).context("Failed to read card list")?;
    let cards = validate_cards(&tokens).context("Card list is not valid")?;
    Ok(cards)
}

fn score(line: &str, bid: Bid, players: usize, bonuses: &Bonuses, self_called: bool) -> Result<()> {
    let table = TableSize::from_count(players)?;
    let cards = read_cards(line)?;
    let result = calculate_score(&cards, bid, table, bonuses);

    println!("Bid: {} (x{}) at {}", bid, result.multiplier, table);
    println!("Reminder: {}", bid.kitty_reminder());
    println!(
        "Captured {} points with {} honor(s), threshold {}",
        result.points, result.honors, result.threshold
    );
    println!(
        "Contract {} by {}",
        if result.made() { "made" } else { "failed" },
        result.diff
    );
    println!("Score: {}", result.breakdown());

    let partner = match (table.has_partner(), self_called) {
        (false, _) => None,
        (true, true) => Some(0),
        (true, false) => Some(1),
    };
    let shares = seat_shares(table, 0, partner)?;
    println!("Taker: {:+}", shares[0] as f64 * result.magnitude);
    if let Some(p) = partner.filter(|&p| p != 0) {
        println!("Partner: {:+}", shares[p] as f64 * result.magnitude);
    }
    println!("Each defender: {:+}", -result.magnitude);

    Ok(())
}

fn check(line: &str) -> Result<()> {
    let cards = read_cards(line)?;
    let points: f64 = cards.iter().map(|c| c.points()).sum();
    let honors = cards.iter().filter(|c| c.is_honor()).count();

    println!("Card list is valid");
    println!("  {} cards", cards.len());
    println!("  {} points", points);
    println!(
        "  {} honor(s), the taker needs {} points",
        honors,
        threshold_for_honors(honors)
    );

    Ok(())
}
