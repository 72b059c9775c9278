pub mod bid;
pub mod card;
pub mod player;
pub mod scoring;
pub mod table;

pub use bid::Bid;
pub use card::{parse_card_list, validate_cards, Card, Face};
pub use player::Player;
pub use scoring::{
    calculate_score, distribute_scores, seat_shares, threshold_for_honors, Bonuses, RoundResult,
    Slam,
};
pub use table::TableSize;
