//! Numbered frame sequences.
//!
//! A sequence is a set of sibling files that share a base name and
//! extension and differ only by a trailing number:
//!
//! ```text
//! walk_1.png  walk_2.png  ...  walk_10.png
//! ```

use std::cmp::Ordering;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::frame::FileFrame;

/// Fewer matching files than this is not an animation.
const MIN_SEQUENCE_LEN: usize = 2;

/// A filename split into base, trailing number and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub base: String,
    pub number: Option<u64>,
    /// Extension including the leading dot, or empty if there is none.
    pub extension: String,
}

/// Digits are ASCII only, matching what `u64::from_str` accepts.
fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(.*?)(?:[-_]?([0-9]+))?(\.[^.]+)?$").ok())
        .as_ref()
}

/// Split `filename` into base name, numeric suffix and extension.
///
/// The number is the trailing run of digits before the extension,
/// optionally preceded by one `-` or `_`. Leading zeros are ignored.
///
/// ```
/// use glimpse_anim::parse_base_name;
///
/// let parsed = parse_base_name("jump007.png");
/// assert_eq!((parsed.base.as_str(), parsed.number, parsed.extension.as_str()), ("jump", Some(7), ".png"));
/// ```
pub fn parse_base_name(filename: &str) -> ParsedName {
    let Some(caps) = name_pattern().and_then(|pattern| pattern.captures(filename)) else {
        return ParsedName {
            base: filename.to_string(),
            number: None,
            extension: String::new(),
        };
    };

    let group = |i| caps.get(i).map_or("", |m| m.as_str());
    let extension = group(3).to_string();

    match caps.get(2).and_then(|m| m.as_str().parse::<u64>().ok()) {
        Some(number) => ParsedName {
            base: group(1).to_string(),
            number: Some(number),
            extension,
        },
        // Digit runs too long for u64 stay part of the base name.
        None => ParsedName {
            base: filename[..filename.len() - extension.len()].to_string(),
            number: None,
            extension,
        },
    }
}

/// Matches the members of one sequence.
///
/// A base or extension too large to compile into a pattern yields a
/// matcher that matches nothing.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    pattern: Option<Regex>,
}

impl SequenceMatcher {
    /// Build a matcher for `base`, an optional `-`/`_`, ASCII digits, then `extension`.
    ///
    /// Both parts are matched literally and the extension case-sensitively.
    pub fn new(base: &str, extension: &str) -> Self {
        let source = format!(
            r"^{}[-_]?([0-9]+){}$",
            regex::escape(base),
            regex::escape(extension)
        );
        let pattern = match Regex::new(&source) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                debug!(base_len = base.len(), error = %e, "sequence pattern rejected");
                None
            }
        };
        Self { pattern }
    }

    /// The digit run of `name` if it belongs to the sequence.
    pub fn frame_number<'a>(&self, name: &'a str) -> Option<&'a str> {
        self.pattern
            .as_ref()?
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(name))
    }

    /// Filter `files` to the sequence, ordered by frame number.
    ///
    /// Entries may be bare names or paths; only the file name is matched.
    /// Equal numbers keep their input order. Returns nothing when fewer
    /// than two files match.
    pub fn collect<I, P>(&self, files: I) -> Vec<FileFrame>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut matched: Vec<(String, FileFrame)> = files
            .into_iter()
            .filter_map(|file| {
                let path = file.as_ref();
                let name = path.file_name()?.to_str()?;
                let digits = self.frame_number(name)?.to_string();
                Some((
                    digits,
                    FileFrame {
                        path: path.to_path_buf(),
                        name: name.to_string(),
                    },
                ))
            })
            .collect();

        if matched.len() < MIN_SEQUENCE_LEN {
            return Vec::new();
        }

        matched.sort_by(|(a, _), (b, _)| compare_numeric(a, b));
        matched.into_iter().map(|(_, frame)| frame).collect()
    }
}

/// Find the numbered sequence for `base` + `extension` among `files`.
pub fn find_sequence<I, P>(files: I, base: &str, extension: &str) -> Vec<FileFrame>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    SequenceMatcher::new(base, extension).collect(files)
}

/// Compare two ASCII digit strings by numeric value, without overflow.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parts(name: &str) -> (String, Option<u64>, String) {
        let parsed = parse_base_name(name);
        (parsed.base, parsed.number, parsed.extension)
    }

    fn names(frames: &[FileFrame]) -> Vec<&str> {
        frames.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_parse_examples() {
        assert_eq!(parts("walk_01.png"), ("walk".into(), Some(1), ".png".into()));
        assert_eq!(parts("run-7.png"), ("run".into(), Some(7), ".png".into()));
        assert_eq!(parts("jump001.png"), ("jump".into(), Some(1), ".png".into()));
        assert_eq!(parts("jump007.png"), ("jump".into(), Some(7), ".png".into()));
        assert_eq!(parts("tile.png"), ("tile".into(), None, ".png".into()));
    }

    #[test]
    fn test_parse_trailing_number_only() {
        assert_eq!(parts("hero2_walk_12.png"), ("hero2_walk".into(), Some(12), ".png".into()));
        assert_eq!(parts("v1.2.png"), ("v1.".into(), Some(2), ".png".into()));
    }

    #[test]
    fn test_parse_without_extension() {
        assert_eq!(parts("frame_3"), ("frame".into(), Some(3), String::new()));
        assert_eq!(parts("README"), ("README".into(), None, String::new()));
    }

    #[test]
    fn test_parse_keeps_case() {
        assert_eq!(parts("Walk_01.PNG"), ("Walk".into(), Some(1), ".PNG".into()));
    }

    #[test]
    fn test_parse_overlong_number_stays_in_base() {
        let name = "big_123456789012345678901234567890.png";
        assert_eq!(
            parts(name),
            ("big_123456789012345678901234567890".into(), None, ".png".into())
        );
    }

    #[test]
    fn test_find_sequence_numeric_order() {
        let frames = find_sequence(["walk_2.png", "walk_10.png", "walk_1.png"], "walk", ".png");
        assert_eq!(names(&frames), ["walk_1.png", "walk_2.png", "walk_10.png"]);
    }

    #[test]
    fn test_find_sequence_single_match_is_not_animation() {
        let frames = find_sequence(["walk_1.png", "run_1.png", "walk.png"], "walk", ".png");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_find_sequence_filters_other_files() {
        let files = [
            "walk_1.png",
            "walk_2.jpg",
            "walk_2.PNG",
            "walker_3.png",
            "walk-3.png",
            "walk4.png",
            "walk_x.png",
        ];
        let frames = find_sequence(files, "walk", ".png");
        assert_eq!(names(&frames), ["walk_1.png", "walk-3.png", "walk4.png"]);
    }

    #[test]
    fn test_find_sequence_escapes_base() {
        let files = ["a+b(1)_1.png", "a+b(1)_2.png", "aab(1)_3.png"];
        let frames = find_sequence(files, "a+b(1)", ".png");
        assert_eq!(names(&frames), ["a+b(1)_1.png", "a+b(1)_2.png"]);

        let frames = find_sequence(["x_1.png", "x_2.png", "x_3Xpng"], "x", ".png");
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_find_sequence_duplicate_numbers_are_stable() {
        let files = ["fx_02.png", "fx_1.png", "fx_2.png", "fx-2.png"];
        let frames = find_sequence(files, "fx", ".png");
        assert_eq!(names(&frames), ["fx_1.png", "fx_02.png", "fx_2.png", "fx-2.png"]);
    }

    #[test]
    fn test_non_ascii_digits_are_not_frame_numbers() {
        assert_eq!(parts("walk_\u{662}.png"), ("walk_\u{662}".into(), None, ".png".into()));

        let files = ["walk_1.png", "walk_\u{662}.png", "walk_10.png"];
        let frames = find_sequence(files, "walk", ".png");
        assert_eq!(names(&frames), ["walk_1.png", "walk_10.png"]);
    }

    #[test]
    fn test_oversized_base_is_no_sequence() {
        let base = "a".repeat(2_000_000);
        let files = [format!("{base}_1.png"), format!("{base}_2.png")];

        let matcher = SequenceMatcher::new(&base, ".png");
        assert!(!matcher.is_match(&files[0]));
        assert!(find_sequence(&files, &base, ".png").is_empty());
    }

    #[test]
    fn test_find_sequence_keeps_paths() {
        let files = ["/art/run_2.png", "/art/run_1.png"];
        let frames = find_sequence(files, "run", ".png");
        assert_eq!(frames[0].path, Path::new("/art/run_1.png"));
        assert_eq!(frames[0].name, "run_1.png");
    }

    #[test]
    fn test_compare_numeric() {
        assert_eq!(compare_numeric("2", "10"), Ordering::Less);
        assert_eq!(compare_numeric("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_numeric("99999999999999999999999", "100000000000000000000000"),
            Ordering::Less
        );
    }

    proptest! {
        #[test]
        fn prop_parse_recovers_number(base in "[a-z]{1,8}", sep in "[-_]?", n in 0u32..100_000, width in 1usize..6) {
            let name = format!("{base}{sep}{n:0width$}.png");
            let parsed = parse_base_name(&name);
            prop_assert_eq!(parsed.base, base);
            prop_assert_eq!(parsed.number, Some(u64::from(n)));
            prop_assert_eq!(parsed.extension, ".png");
        }

        #[test]
        fn prop_sequence_sorted_by_number(mut numbers in proptest::collection::vec(0u32..1000, 2..20)) {
            let files: Vec<String> = numbers.iter().map(|n| format!("anim_{n}.png")).collect();
            let frames = find_sequence(&files, "anim", ".png");
            numbers.sort();
            let expected: Vec<String> = numbers.iter().map(|n| format!("anim_{n}.png")).collect();
            let actual: Vec<String> = frames.into_iter().map(|f| f.name).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
