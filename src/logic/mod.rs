//! Tournament business logic: registration, bracket, progression, standings.

mod actions;
mod bracket;
mod progression;
mod registration;
mod standings;

pub use actions::{apply, try_apply, Action, PendingWinner, Transition};
pub use bracket::start_tournament;
pub use progression::{award_point, confirm_advance, proceed_to_next_match, select_current_match};
pub use registration::{parse_names, register_players, reset_tournament};
pub use standings::{is_complete, standings, Standings};
