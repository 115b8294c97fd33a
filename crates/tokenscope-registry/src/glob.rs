//! Dot-path glob translation
//!
//! `color.*` matches exactly one segment below `color`; `color.**` matches
//! any depth below it. Every character other than `*` is matched literally.

use regex::Regex;

/// How `**` is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlobMode {
    /// `**` matches across segment boundaries
    #[default]
    CrossSegment,
    /// `**` is a synonym for `*`
    SingleSegment,
}

/// Translate a dot-path glob into an anchored regex using the default mode
pub fn path_to_regex(pattern: &str) -> Regex {
    path_to_regex_with(pattern, GlobMode::default())
}

pub fn path_to_regex_with(pattern: &str, mode: GlobMode) -> Regex {
    let source = glob_source(pattern, mode);
    match Regex::new(&source) {
        Ok(regex) => regex,
        Err(err) => {
            // Only reachable through regex size limits on pathological input.
            tracing::warn!(pattern, error = %err, "glob did not compile, matching nothing");
            never_matches()
        }
    }
}

/// The regex source a glob translates to
pub fn glob_source(pattern: &str, mode: GlobMode) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '*' {
            let mut buf = [0u8; 4];
            source.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            continue;
        }

        if chars.peek() == Some(&'*') {
            chars.next();
            match mode {
                GlobMode::CrossSegment => source.push_str(".*"),
                GlobMode::SingleSegment => source.push_str("[^.]*"),
            }
        } else {
            source.push_str("[^.]*");
        }
    }

    source.push('$');
    source
}

fn never_matches() -> Regex {
    Regex::new(r"[^\s\S]").expect("static pattern compiles")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_star_is_segment_bounded() {
        let re = path_to_regex("color.*");
        assert!(re.is_match("color.primary"));
        assert!(!re.is_match("color.primary.shade"));
        assert!(!re.is_match("spacing.color"));
        assert!(!re.is_match("colorXprimary"));
    }

    #[test]
    fn test_literal_path_is_anchored() {
        let re = path_to_regex("color.primary");
        assert!(re.is_match("color.primary"));
        assert!(!re.is_match("color.primary.dark"));
        assert!(!re.is_match("brand.color.primary"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let re = path_to_regex("color.**");
        assert!(re.is_match("color.primary"));
        assert!(re.is_match("color.primary.shade"));
        assert!(!re.is_match("spacing.small"));
    }

    #[test]
    fn test_double_star_single_segment_mode() {
        let re = path_to_regex_with("color.**", GlobMode::SingleSegment);
        assert!(re.is_match("color.primary"));
        assert!(!re.is_match("color.primary.shade"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let re = path_to_regex("size.(lg)+");
        assert!(re.is_match("size.(lg)+"));
        assert!(!re.is_match("size.lglg"));
    }

    #[test]
    fn test_inner_wildcard() {
        let re = path_to_regex("color.brand-*");
        assert!(re.is_match("color.brand-500"));
        assert!(re.is_match("color.brand-"));
        assert!(!re.is_match("color.accent-500"));
    }

    #[test]
    fn test_glob_source() {
        assert_eq!(glob_source("a.*", GlobMode::CrossSegment), r"^a\.[^.]*$");
        assert_eq!(glob_source("a.**", GlobMode::CrossSegment), r"^a\..*$");
        assert_eq!(glob_source("", GlobMode::CrossSegment), "^$");
    }
}
