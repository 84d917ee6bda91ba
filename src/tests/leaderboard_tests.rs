#[cfg(test)]
mod tests {
    use crate::leaderboard::{Leaderboard, MAX_ENTRIES, ScoreEntry, format_time};

    fn entry(name: &str, score: u32, time_seconds: u32) -> ScoreEntry {
        ScoreEntry::new(name, score, 1, time_seconds, 0)
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
    }

    #[test]
    fn test_ordering_score_desc_then_time_asc() {
        let mut leaderboard = Leaderboard::new();
        leaderboard.add_entry(entry("a", 50, 10));
        leaderboard.add_entry(entry("b", 80, 5));
        leaderboard.add_entry(entry("c", 80, 20));

        let ranked: Vec<(u32, u32)> = leaderboard
            .entries
            .iter()
            .map(|e| (e.score, e.time_seconds))
            .collect();
        assert_eq!(ranked, vec![(80, 5), (80, 20), (50, 10)]);
    }

    #[test]
    fn test_ranks_are_one_indexed() {
        let mut leaderboard = Leaderboard::new();
        assert_eq!(leaderboard.add_entry(entry("a", 100, 30)), Some(1));
        assert_eq!(leaderboard.add_entry(entry("b", 200, 30)), Some(1));
        assert_eq!(leaderboard.add_entry(entry("c", 50, 30)), Some(3));
    }

    #[test]
    fn test_capped_at_ten_entries() {
        let mut leaderboard = Leaderboard::new();
        for score in 0..12u32 {
            leaderboard.add_entry(entry("p", score * 10, 60));
        }

        assert_eq!(leaderboard.entries.len(), MAX_ENTRIES);
        // The weakest runs fell off the end
        assert_eq!(leaderboard.entries.last().map(|e| e.score), Some(20));
        assert_eq!(leaderboard.top_score(), Some(110));
    }

    #[test]
    fn test_entry_below_cap_reports_no_rank() {
        let mut leaderboard = Leaderboard::new();
        for score in 1..=10u32 {
            leaderboard.add_entry(entry("p", score * 10, 60));
        }

        assert_eq!(leaderboard.add_entry(entry("late", 1, 60)), None);
        assert_eq!(leaderboard.entries.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        let anonymous = ScoreEntry::new("   ", 10, 1, 5, 0);
        assert_eq!(anonymous.name, "Anonymous");

        let named = ScoreEntry::new(" ada ", 10, 1, 5, 0);
        assert_eq!(named.name, "ada");
    }

    #[test]
    fn test_entry_carries_formatted_time() {
        let e = ScoreEntry::new("ada", 10, 3, 125, 0);
        assert_eq!(e.time, "2:05");
        assert_eq!(e.time_seconds, 125);
    }
}
