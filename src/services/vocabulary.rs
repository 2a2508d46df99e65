//! Word list used as the alphabet for storage keys.
//!
//! Words are short, common and lowercase so that a key like `plum-koala`
//! can be read aloud or retyped without ambiguity.

/// Number of entries in [`WORDS`].
pub const WORD_COUNT: usize = 80;

/// Fixed ordered vocabulary. Every entry matches `^[a-z]+$` and appears once.
pub const WORDS: [&str; WORD_COUNT] = [
    "apple", "banana", "orange", "grape", "melon", "lemon", "peach", "plum", "cherry", "berry",
    "horse", "tiger", "lion", "zebra", "panda", "koala", "eagle", "hawk", "wolf", "bear",
    "river", "ocean", "lake", "mountain", "valley", "hill", "forest", "desert", "island", "beach",
    "blue", "green", "red", "yellow", "purple", "gray", "pink", "brown", "white", "black",
    "sun", "moon", "star", "cloud", "rain", "snow", "wind", "storm", "thunder", "lightning",
    "gold", "silver", "bronze", "iron", "steel", "copper", "tin", "lead", "zinc", "nickel",
    "book", "page", "story", "tale", "poem", "song", "music", "art", "paint", "dance",
    "chair", "table", "desk", "bed", "sofa", "lamp", "clock", "door", "window", "floor",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn words_are_lowercase_ascii() {
        for word in WORDS {
            assert!(!word.is_empty());
            assert!(word.bytes().all(|b| b.is_ascii_lowercase()), "{word}");
        }
    }

    #[test]
    fn words_are_unique() {
        let unique: HashSet<_> = WORDS.iter().collect();
        assert_eq!(unique.len(), WORD_COUNT);
    }
}
