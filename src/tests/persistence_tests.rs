#[cfg(test)]
mod tests {
    use crate::leaderboard::{SavedProgress, ScoreEntry};
    use crate::persistence::Storage;

    fn progress() -> SavedProgress {
        SavedProgress {
            player_name: "ada".to_string(),
            level: 4,
            score: 730,
            game_time: 312,
        }
    }

    #[test]
    fn test_empty_directory_opens_fresh() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::open(dir.path().to_path_buf());

        assert!(storage.leaderboard.is_empty());
        assert!(!storage.has_snapshot());
    }

    #[test]
    fn test_leaderboard_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let mut storage = Storage::open(dir.path().to_path_buf());
            storage
                .leaderboard
                .add_entry(ScoreEntry::new("ada", 500, 3, 100, 1));
            storage
                .leaderboard
                .add_entry(ScoreEntry::new("bob", 900, 5, 80, 2));
            storage.save_leaderboard();
        }

        let reopened = Storage::open(dir.path().to_path_buf());
        assert_eq!(reopened.leaderboard.entries.len(), 2);
        assert_eq!(reopened.leaderboard.top_score(), Some(900));
        assert_eq!(reopened.leaderboard.entries[0].name, "bob");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let mut storage = Storage::open(dir.path().to_path_buf());
            storage.save_snapshot(progress());
        }

        let reopened = Storage::open(dir.path().to_path_buf());
        assert_eq!(reopened.snapshot, Some(progress()));
    }

    #[test]
    fn test_clear_snapshot_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");

        let mut storage = Storage::open(dir.path().to_path_buf());
        storage.save_snapshot(progress());
        storage.clear_snapshot();
        assert!(!storage.has_snapshot());

        // Gone from disk too, not just from memory
        let reopened = Storage::open(dir.path().to_path_buf());
        assert!(!reopened.has_snapshot());
    }

    #[test]
    fn test_corrupt_files_are_treated_as_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("leaderboard.toml"), "not [valid toml").expect("write");
        std::fs::write(dir.path().join("savegame.toml"), "garbage = [").expect("write");

        let storage = Storage::open(dir.path().to_path_buf());
        assert!(storage.leaderboard.is_empty());
        assert!(!storage.has_snapshot());
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("deeply").join("nested");

        let mut storage = Storage::open(nested.clone());
        storage.save_snapshot(progress());

        assert!(nested.join("savegame.toml").exists());
    }
}
