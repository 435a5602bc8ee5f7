use rand::Rng;

/// Letters used both for words and for filler cells
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pick a filler letter uniformly from A-Z
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}

/// Check if a character may appear in a puzzle word
pub fn is_puzzle_letter(ch: char) -> bool {
    ch.is_ascii_uppercase()
}

/// Normalize raw user input into puzzle form (trimmed, uppercase)
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_letter_is_uppercase() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let letter = random_letter(&mut rng);
            assert!(letter.is_ascii_uppercase(), "'{}' is not A-Z", letter);
        }
    }

    #[test]
    fn test_random_letter_covers_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 26];
        for _ in 0..5000 {
            let letter = random_letter(&mut rng);
            seen[(letter as u8 - b'A') as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  cat "), "CAT");
        assert_eq!(normalize_word("Dog"), "DOG");
        assert_eq!(normalize_word("   "), "");
    }

    #[test]
    fn test_is_puzzle_letter() {
        assert!(is_puzzle_letter('Q'));
        assert!(!is_puzzle_letter('q'));
        assert!(!is_puzzle_letter(' '));
        assert!(!is_puzzle_letter('-'));
    }
}
