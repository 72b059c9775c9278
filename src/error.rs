use thiserror::Error;

#[derive(Error, Debug)]
pub enum TarotError {
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid bid: {0}")]
    InvalidBid(String),

    #[error("Invalid players: {0}")]
    InvalidPlayers(String),

    #[error("Input ended before the session finished")]
    EndOfInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TarotError>;
