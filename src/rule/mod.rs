//! Declarative rename rules.
//!
//! A [`RuleSpec`] is immutable for the whole run. Everything that changes
//! while files are processed lives in [`crate::state::BatchState`].

pub mod config;

use crate::error::{RenameError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a rule does with the text it generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Insert text next to each match.
    #[default]
    Add,
    /// Overwrite each matched span.
    Replace,
    /// Replace the whole name, keeping the extension.
    Rename,
}

/// How search patterns are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Literal,
    /// Recognized but not implemented.
    Regex,
}

/// Where and how to look for matches inside a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpec {
    /// Search patterns. A single empty pattern matches the whole name.
    pub patterns: Vec<String>,

    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Maximum number of occurrences to act on. `None` means all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_limit: Option<usize>,

    /// When truncating to `match_limit`, keep the rightmost occurrences.
    #[serde(default)]
    pub search_from_right: bool,

    /// Pick list items by the index of the pattern that matched.
    #[serde(default)]
    pub same_match_index: bool,

    #[serde(default)]
    pub mode: MatchMode,
}

fn default_true() -> bool {
    true
}

impl MatchSpec {
    /// Matches any of the given patterns, case-sensitively, every occurrence.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            case_sensitive: true,
            match_limit: None,
            search_from_right: false,
            same_match_index: false,
            mode: MatchMode::Literal,
        }
    }

    /// Matches a single pattern.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::new([pattern.into()])
    }

    /// Matches the whole name.
    pub fn everything() -> Self {
        Self::pattern("")
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.match_limit = Some(limit);
        self
    }

    pub fn from_right(mut self) -> Self {
        self.search_from_right = true;
        self
    }

    pub fn same_match_index(mut self) -> Self {
        self.same_match_index = true;
        self
    }

    pub fn regex(mut self) -> Self {
        self.mode = MatchMode::Regex;
        self
    }
}

/// A number that increments on every successful rename.
///
/// The running value lives in the batch state; this only describes how it
/// starts, where it stops and how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingText {
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,

    #[serde(default = "default_start")]
    pub start: i64,

    /// Last value that may be emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,

    /// Minimum number of digits, zero padded.
    #[serde(default)]
    pub width: usize,
}

fn default_start() -> i64 {
    1
}

impl CountingText {
    pub fn new(start: i64) -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            start,
            end: None,
            width: 0,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders `prefix + value + suffix`.
    pub fn render(&self, value: i64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            value,
            self.suffix,
            width = self.width
        )
    }

    fn check(&self) -> Result<()> {
        match self.end {
            Some(end) if end < self.start => Err(RenameError::RuleMismatch(format!(
                "counter ends at {end} before it starts at {}",
                self.start
            ))),
            _ => Ok(()),
        }
    }
}

/// One slot of a rotating list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Static(String),
    Counting(CountingText),
}

impl From<&str> for TextItem {
    fn from(text: &str) -> Self {
        TextItem::Static(text.to_string())
    }
}

impl From<CountingText> for TextItem {
    fn from(counting: CountingText) -> Self {
        TextItem::Counting(counting)
    }
}

/// The source of insertion text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InsertText {
    Static { text: String },
    Counting(CountingText),
    List { items: Vec<TextItem> },
    /// Recognized but not implemented.
    Random { length: usize },
}

impl InsertText {
    pub fn literal(text: impl Into<String>) -> Self {
        InsertText::Static { text: text.into() }
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<TextItem>>) -> Self {
        InsertText::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for InsertText {
    fn from(text: &str) -> Self {
        InsertText::literal(text)
    }
}

impl From<CountingText> for InsertText {
    fn from(counting: CountingText) -> Self {
        InsertText::Counting(counting)
    }
}

/// Insertion text plus the options that control how it is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSpec {
    pub text: InsertText,

    /// Use the counter's `start` as a cap on the number of renames instead of
    /// embedding a number. Only the counter's prefix is inserted.
    #[serde(default)]
    pub count_to_limit: bool,

    /// Cycle through a list instead of stopping at its end.
    #[serde(default)]
    pub repeat_list: bool,
}

impl InsertSpec {
    pub fn new(text: impl Into<InsertText>) -> Self {
        Self {
            text: text.into(),
            count_to_limit: false,
            repeat_list: false,
        }
    }

    /// Number of independent counter slots this text needs.
    pub fn slot_count(&self) -> usize {
        match &self.text {
            InsertText::List { items } => items.len().max(1),
            _ => 1,
        }
    }

    /// Initial counter value for each slot.
    pub fn initial_counters(&self) -> Vec<i64> {
        match &self.text {
            InsertText::Counting(c) => vec![c.start],
            InsertText::List { items } => items
                .iter()
                .map(|item| match item {
                    TextItem::Counting(c) => c.start,
                    TextItem::Static(_) => 0,
                })
                .collect(),
            _ => vec![0],
        }
    }

    /// Last permitted counter value for each slot.
    pub fn counter_maxima(&self) -> Vec<Option<i64>> {
        match &self.text {
            InsertText::Counting(c) => vec![c.end],
            InsertText::List { items } => items
                .iter()
                .map(|item| match item {
                    TextItem::Counting(c) => c.end,
                    TextItem::Static(_) => None,
                })
                .collect(),
            _ => vec![None],
        }
    }

    /// Cap on renames per directory implied by `count_to_limit`.
    pub fn rename_budget(&self) -> Option<usize> {
        match (&self.text, self.count_to_limit) {
            (InsertText::Counting(c), true) => {
                Some(usize::try_from(c.start.saturating_sub(1)).unwrap_or(0))
            }
            _ => None,
        }
    }
}

/// Where text is placed relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Start,
    #[default]
    End,
    BothEnds,
}

/// What the placement is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    OfMatch,
    OfFileName,
    /// Restricts matching and insertion to the text after the final `.`.
    OfExtension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementSpec {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub anchor: Anchor,
}

impl PlacementSpec {
    pub fn new(position: Position, anchor: Anchor) -> Self {
        Self { position, anchor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Alphabetical,
    FileSize,
    AccessDate,
    ModifyDate,
    CreationDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// A complete rename rule.
///
/// # Example YAML
///
/// ```yaml
/// action: add
/// match:
///   patterns: ["IMG"]
///   case_sensitive: false
/// insert:
///   text:
///     type: counting
///     prefix: "-"
///     start: 1
///     width: 3
/// placement:
///   position: end
///   anchor: of_file_name
/// sort:
///   key: modify_date
///   order: ascending
/// links:
///   - gallery.html
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub action: Action,

    #[serde(rename = "match")]
    pub matching: MatchSpec,

    pub insert: InsertSpec,

    #[serde(default)]
    pub placement: PlacementSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,

    /// Companion files whose references to renamed paths are rewritten.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PathBuf>,
}

impl RuleSpec {
    /// Creates a rule from its three essential parts.
    pub fn new(action: Action, matching: MatchSpec, text: impl Into<InsertText>) -> Self {
        Self {
            action,
            matching,
            insert: InsertSpec::new(text),
            placement: PlacementSpec::default(),
            sort: None,
            links: Vec::new(),
        }
    }

    /// Inserts `text` next to each occurrence of `pattern`.
    pub fn add(pattern: impl Into<String>, text: impl Into<InsertText>) -> Self {
        Self::new(Action::Add, MatchSpec::pattern(pattern), text)
    }

    /// Overwrites each occurrence of `pattern` with `text`.
    pub fn replace(pattern: impl Into<String>, text: impl Into<InsertText>) -> Self {
        Self::new(Action::Replace, MatchSpec::pattern(pattern), text)
    }

    /// Replaces every name (extension kept) with `text`.
    pub fn rename(text: impl Into<InsertText>) -> Self {
        Self::new(Action::Rename, MatchSpec::everything(), text)
    }

    /// Adjusts the match settings.
    pub fn matching<F>(mut self, f: F) -> Self
    where
        F: FnOnce(MatchSpec) -> MatchSpec,
    {
        self.matching = f(self.matching);
        self
    }

    /// Swaps the inserted text, keeping the insert options.
    pub fn insert(mut self, text: impl Into<InsertText>) -> Self {
        self.insert.text = text.into();
        self
    }

    pub fn placement(mut self, position: Position, anchor: Anchor) -> Self {
        self.placement = PlacementSpec::new(position, anchor);
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(SortSpec::new(key, order));
        self
    }

    pub fn link(mut self, path: impl Into<PathBuf>) -> Self {
        self.links.push(path.into());
        self
    }

    pub fn count_to_limit(mut self) -> Self {
        self.insert.count_to_limit = true;
        self
    }

    pub fn repeat_list(mut self) -> Self {
        self.insert.repeat_list = true;
        self
    }

    /// Checks the rule for structural problems and unsupported options.
    ///
    /// Must pass before any file is touched.
    pub fn validate(&self) -> Result<()> {
        let patterns = &self.matching.patterns;
        if patterns.is_empty() {
            return Err(RenameError::RuleMismatch(
                "at least one match pattern is required".to_string(),
            ));
        }
        if patterns.iter().filter(|p| p.is_empty()).count() > 1 {
            return Err(RenameError::RuleMismatch(
                "only one empty pattern may be given".to_string(),
            ));
        }
        if self.matching.mode == MatchMode::Regex {
            return Err(RenameError::UnsupportedOption(
                "regular expression matching".to_string(),
            ));
        }

        match &self.insert.text {
            InsertText::Random { .. } => {
                return Err(RenameError::UnsupportedOption(
                    "random text generation".to_string(),
                ));
            }
            InsertText::Counting(c) => c.check()?,
            InsertText::List { items } => {
                if items.is_empty() {
                    return Err(RenameError::RuleMismatch(
                        "insert list must not be empty".to_string(),
                    ));
                }
                for item in items {
                    if let TextItem::Counting(c) = item {
                        c.check()?;
                    }
                }
            }
            InsertText::Static { .. } => {}
        }

        if self.matching.same_match_index {
            match &self.insert.text {
                InsertText::List { items } if items.len() == patterns.len() => {}
                InsertText::List { items } => {
                    return Err(RenameError::RuleMismatch(format!(
                        "same_match_index needs one list item per pattern ({} patterns, {} items)",
                        patterns.len(),
                        items.len()
                    )));
                }
                _ => {
                    return Err(RenameError::RuleMismatch(
                        "same_match_index requires a list insert".to_string(),
                    ));
                }
            }
        }

        if self.insert.count_to_limit && !matches!(self.insert.text, InsertText::Counting(_)) {
            return Err(RenameError::RuleMismatch(
                "count_to_limit requires counting text".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns a human-readable description of the rule.
    pub fn describe(&self) -> String {
        let patterns = self
            .matching
            .patterns
            .iter()
            .map(|p| format!("'{p}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let text = match &self.insert.text {
            InsertText::Static { text } => format!("'{text}'"),
            InsertText::Counting(c) => format!(
                "counter '{}#{}' from {}{}",
                c.prefix,
                c.suffix,
                c.start,
                c.end.map(|e| format!(" to {e}")).unwrap_or_default()
            ),
            InsertText::List { items } => format!("list of {} item(s)", items.len()),
            InsertText::Random { length } => format!("{length} random characters"),
        };
        match self.action {
            Action::Add => format!(
                "Add {text} at {:?} {:?} matching {patterns}",
                self.placement.position, self.placement.anchor
            ),
            Action::Replace => format!("Replace {patterns} with {text}"),
            Action::Rename => format!("Rename files matching {patterns} to {text}"),
        }
    }
}
