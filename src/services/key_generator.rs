//! Human-readable storage keys: `<word>-<word>[.<ext>]`.

use super::vocabulary::WORDS;
use rand::Rng;

/// Extensions longer than this are truncated.
const MAX_EXTENSION_LEN: usize = 16;

/// Generate a key for `file_name` using the thread-local RNG.
pub fn generate_key(file_name: &str) -> String {
    generate_key_with(&mut rand::thread_rng(), file_name)
}

/// Generate a key for `file_name` drawing both words from `rng`.
///
/// The two words are drawn independently, so `plum-plum` is a valid result.
/// No uniqueness check happens here; the store rejects duplicates on insert.
pub fn generate_key_with<R: Rng + ?Sized>(rng: &mut R, file_name: &str) -> String {
    let first = WORDS[rng.gen_range(0..WORDS.len())];
    let second = WORDS[rng.gen_range(0..WORDS.len())];

    match extension_of(file_name) {
        Some(ext) => format!("{first}-{second}.{ext}"),
        None => format!("{first}-{second}"),
    }
}

/// Extension segment for a key, taken from the text after the last `.`.
///
/// The raw extension is lowercased and reduced to ASCII alphanumerics so the
/// resulting key always stays routable. Returns `None` when there is no dot
/// or nothing usable remains.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, raw) = file_name.rsplit_once('.')?;
    let ext: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_EXTENSION_LEN)
        .collect();

    if ext.is_empty() { None } else { Some(ext) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::routes::is_file_key;
    use rand::{SeedableRng, rngs::StdRng};

    fn split_words(key: &str) -> (&str, &str) {
        let stem = key.split('.').next().unwrap();
        stem.split_once('-').unwrap()
    }

    #[test]
    fn key_keeps_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let key = generate_key_with(&mut rng, "hello.txt");
        assert!(key.ends_with(".txt"), "{key}");
        let (a, b) = split_words(&key);
        assert!(WORDS.contains(&a));
        assert!(WORDS.contains(&b));
    }

    #[test]
    fn key_without_extension_has_no_dot() {
        let key = generate_key("Makefile");
        assert!(!key.contains('.'));
        assert_eq!(key.matches('-').count(), 1);
    }

    #[test]
    fn only_last_dot_counts() {
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of(".bashrc").as_deref(), Some("bashrc"));
    }

    #[test]
    fn extension_is_normalized() {
        assert_eq!(extension_of("Photo.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("notes.t-x_t").as_deref(), Some("txt"));
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("weird.+++"), None);
        assert_eq!(
            extension_of("x.abcdefghijklmnopqrstuvwxyz").as_deref(),
            Some("abcdefghijklmnop")
        );
    }

    #[test]
    fn generated_keys_are_always_routable() {
        let mut rng = StdRng::seed_from_u64(42);
        let names = [
            "a.png",
            "README",
            "Résumé.PDF",
            "dump.tar.GZ",
            "sneaky.\"ext",
            "..",
            "report.2024",
        ];
        for _ in 0..200 {
            for name in names {
                let key = generate_key_with(&mut rng, name);
                assert!(is_file_key(&key), "{name} -> {key}");
            }
        }
    }
}
