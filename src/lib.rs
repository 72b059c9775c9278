pub mod console;
pub mod error;
pub mod model;
pub mod session;

pub use error::{Result, TarotError};
pub use model::*;
pub use session::{GameState, Round, Session, UndoStack};
