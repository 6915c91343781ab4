mod combo;
mod leaderboard;
mod question;
mod record;

pub use combo::{Combo, KeyChord};
pub use leaderboard::{LeaderboardEntry, rank_of, sort_ranked};
pub use question::{Question, builtin_catalog, display_combo};
pub use record::{Elapsed, QuestionRecord};
