use serde::{Deserialize, Serialize};

/// Read-only projection fetched from the remote score store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: i64,
}

/// Sorts entries descending by score, ties broken by name for stability.
pub fn sort_ranked(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
}

/// 1-based rank of the first entry with the given name, if present.
///
/// Assumes the slice is already sorted descending by score.
#[must_use]
pub fn rank_of(entries: &[LeaderboardEntry], name: &str) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry.name == name)
        .map(|index| index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn sort_is_descending_by_score() {
        let mut board = vec![entry("a", 10), entry("b", 30), entry("c", 20)];
        sort_ranked(&mut board);
        let scores: Vec<i64> = board.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
    }

    #[test]
    fn rank_is_one_based() {
        let mut board = vec![entry("a", 10), entry("b", 30), entry("c", 20)];
        sort_ranked(&mut board);
        assert_eq!(rank_of(&board, "b"), Some(1));
        assert_eq!(rank_of(&board, "a"), Some(3));
        assert_eq!(rank_of(&board, "nobody"), None);
    }
}
