//! Unique file name generation for uploads.
//!
//! Name format: `{unix-millis}-{8-char [a-z0-9] suffix}{extension}`. Two
//! uploads collide only if they land in the same millisecond AND draw the
//! same suffix (probability 1/36^8 per colliding millisecond), so names are
//! unique with overwhelming probability across concurrent uploads. All
//! upload pathways must use this module so storage keys stay consistent.

use rand::Rng;

const NAME_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 8;

/// Generate a unique storage name for a file, preserving the extension of
/// its original name.
pub fn unique_file_name(original_name: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    format!(
        "{}-{}{}",
        timestamp,
        random_suffix(SUFFIX_LEN),
        file_extension(original_name)
    )
}

/// Extension of a file name including the dot (e.g. `.png`), or the empty
/// string if the name has none.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index..],
        None => "",
    }
}

fn random_suffix(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| NAME_CHARS[rng.random_range(0..NAME_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn extension_extraction() {
        assert_eq!(file_extension("photo.png"), ".png");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("no-extension"), "");
    }

    #[test]
    fn generated_name_has_expected_shape() {
        let name = unique_file_name("photo.png");
        assert!(name.ends_with(".png"));

        let stem = name.trim_end_matches(".png");
        let (millis, suffix) = stem.rsplit_once('-').expect("timestamp-suffix separator");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn names_do_not_collide_across_many_draws() {
        let names: HashSet<String> = (0..10_000)
            .map(|_| unique_file_name("photo.jpg"))
            .collect();
        assert_eq!(names.len(), 10_000);
    }
}
