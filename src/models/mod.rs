//! Data structures for the bracket: players, matches, tournament snapshot.

mod game;
mod player;
mod tournament;

pub use game::{GameMatch, MatchId, POINTS_TO_WIN};
pub use player::{Player, PlayerId};
pub use tournament::{
    Keyed, TournamentError, TournamentState, BRACKET_SIZE, FINAL_MATCH_ID, FINAL_ROUND,
    SEMIFINAL_ROUND, THIRD_PLACE_MATCH_ID,
};
