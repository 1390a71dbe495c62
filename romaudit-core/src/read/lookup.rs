use crate::domain::basename;

/// Compare a stored entry path against a requested name.
pub fn name_matches(entry_path: &str, wanted: &str, exact_path: bool) -> bool {
    if exact_path {
        entry_path == wanted
    } else {
        basename(entry_path) == basename(wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_full_path() {
        assert!(name_matches("roms/game.bin", "roms/game.bin", true));
        assert!(!name_matches("roms/game.bin", "game.bin", true));
        assert!(!name_matches("game.bin", "roms/game.bin", true));
    }

    #[test]
    fn loose_ignores_directories_on_both_sides() {
        assert!(name_matches("roms/game.bin", "game.bin", false));
        assert!(name_matches("game.bin", "other/game.bin", false));
        assert!(name_matches("a\\b\\game.bin", "game.bin", false));
        assert!(!name_matches("roms/game.bin", "game.bin2", false));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!name_matches("GAME.BIN", "game.bin", false));
    }
}
