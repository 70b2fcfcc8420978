//! Match discovery inside file names.
//!
//! Offsets are character offsets, not byte offsets. Case folding maps each
//! character to exactly one character so folded and original text always
//! line up.

pub mod file;

pub use file::{FileCollector, FileEntry, group_by_directory};

use crate::rule::MatchSpec;

/// One located occurrence of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Character offset of the first matched character.
    pub offset: usize,
    /// Length of the match in characters.
    pub len: usize,
}

impl Match {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// The result of searching a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSet {
    /// Surviving matches ordered right to left.
    pub matches: Vec<Match>,
    /// Index of the pattern that produced the matches.
    pub pattern_index: Option<usize>,
    /// The text that was compared, case folded if the search was insensitive.
    pub comparison: String,
    /// The pattern as it was compared.
    pub pattern: String,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// True when the pattern covers the whole compared text. The empty
    /// pattern always does.
    pub fn is_exact(&self) -> bool {
        !self.is_empty() && (self.pattern.is_empty() || self.comparison == self.pattern)
    }
}

/// Searches `text` for the first pattern of `spec` that occurs in it.
pub fn find_matches(text: &str, spec: &MatchSpec) -> MatchSet {
    search(text, spec, false)
}

/// Searches an extension (without its dot). Leading dots on the patterns are
/// ignored so `.txt` and `txt` behave the same.
pub fn find_extension_matches(extension: &str, spec: &MatchSpec) -> MatchSet {
    search(extension, spec, true)
}

fn search(text: &str, spec: &MatchSpec, strip_dot: bool) -> MatchSet {
    let hay = fold(text, spec.case_sensitive);
    let comparison: String = hay.iter().collect();

    for (index, pattern) in spec.patterns.iter().enumerate() {
        let pattern = if strip_dot {
            pattern.strip_prefix('.').unwrap_or(pattern)
        } else {
            pattern.as_str()
        };
        let needle = fold(pattern, spec.case_sensitive);
        let offsets = rightmost_first(&hay, &needle);
        if offsets.is_empty() {
            continue;
        }

        let mut matches: Vec<Match> = offsets
            .into_iter()
            .map(|offset| Match {
                offset,
                len: needle.len(),
            })
            .collect();
        truncate(&mut matches, spec.match_limit, spec.search_from_right);

        return MatchSet {
            matches,
            pattern_index: Some(index),
            comparison,
            pattern: needle.into_iter().collect(),
        };
    }

    MatchSet {
        comparison,
        ..Default::default()
    }
}

fn fold(text: &str, case_sensitive: bool) -> Vec<char> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .collect()
    }
}

/// Non-overlapping occurrences, found by repeatedly taking the rightmost one
/// and shrinking the window to its left.
fn rightmost_first(hay: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() {
        return vec![0];
    }

    let mut found = Vec::new();
    let mut end = hay.len();
    while end >= needle.len() {
        let hit = (0..=end - needle.len())
            .rev()
            .find(|&start| &hay[start..start + needle.len()] == needle);
        match hit {
            Some(start) => {
                found.push(start);
                end = start;
            }
            None => break,
        }
    }
    found
}

/// `matches` is right to left, so keeping the rightmost means keeping the head.
fn truncate(matches: &mut Vec<Match>, limit: Option<usize>, from_right: bool) {
    let Some(limit) = limit else {
        return;
    };
    if limit >= matches.len() {
        return;
    }
    if from_right {
        matches.truncate(limit);
    } else {
        matches.drain(..matches.len() - limit);
    }
}

/// A file name split at its final dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub stem: String,
    pub extension: Option<String>,
}

impl NameParts {
    /// Splits `name` at the last `.`. A leading dot does not start an extension.
    pub fn split(name: &str) -> Self {
        match name.rfind('.') {
            Some(idx) if idx > 0 => Self {
                stem: name[..idx].to_string(),
                extension: Some(name[idx + 1..].to_string()),
            },
            _ => Self {
                stem: name.to_string(),
                extension: None,
            },
        }
    }

    /// Reassembles the name with a different stem.
    pub fn with_stem(&self, stem: &str) -> String {
        match &self.extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        self.with_stem(&self.stem)
    }
}
