//! The rename engine and DSL entry point.

use crate::conflict::{ConflictPolicy, ConflictResolver, Decision, Proposal};
use crate::diff::{rename_plan, unified_diff};
use crate::error::{RenameError, Result};
use crate::links::{LinkPropagator, LinkUpdate, substitute_path};
use crate::matcher::{FileCollector, FileEntry, group_by_directory};
use crate::rule::RuleSpec;
use crate::sort::sort_entries;
use crate::state::BatchState;
use crate::transform::{Exhaustion, candidate_name};
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameResult {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub renamed: bool,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenameResult {
    pub fn renamed(old_path: PathBuf, new_path: PathBuf) -> Self {
        Self {
            old_path,
            new_path,
            renamed: true,
            skipped: false,
            error: None,
        }
    }

    pub fn unchanged(path: PathBuf) -> Self {
        Self {
            new_path: path.clone(),
            old_path: path,
            renamed: false,
            skipped: false,
            error: None,
        }
    }

    pub fn skipped(path: PathBuf) -> Self {
        Self {
            skipped: true,
            ..Self::unchanged(path)
        }
    }

    pub fn failed(path: PathBuf, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::unchanged(path)
        }
    }
}

/// Why processing of a directory ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    BudgetReached,
    CounterExhausted,
    ListExhausted,
    Cancelled,
}

/// A companion file that could not be updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkFailure {
    pub path: PathBuf,
    pub message: String,
}

/// The outcome of processing one directory.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryOutcome {
    pub directory: PathBuf,
    pub results: Vec<RenameResult>,
    pub stop: StopReason,
    #[serde(skip)]
    pub link_updates: Vec<LinkUpdate>,
    pub link_errors: Vec<LinkFailure>,
}

impl DirectoryOutcome {
    pub fn renamed_count(&self) -> usize {
        self.results.iter().filter(|r| r.renamed).count()
    }
}

/// The outcome of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub directories: Vec<DirectoryOutcome>,
}

impl RunReport {
    /// Total number of files renamed.
    pub fn total_renamed(&self) -> usize {
        self.directories.iter().map(|d| d.renamed_count()).sum()
    }

    pub fn results(&self) -> impl Iterator<Item = &RenameResult> {
        self.directories.iter().flat_map(|d| d.results.iter())
    }

    pub fn renamed(&self) -> Vec<&RenameResult> {
        self.results().filter(|r| r.renamed).collect()
    }

    pub fn skipped(&self) -> Vec<&RenameResult> {
        self.results().filter(|r| r.skipped).collect()
    }

    pub fn failed(&self) -> Vec<&RenameResult> {
        self.results().filter(|r| r.error.is_some()).collect()
    }

    pub fn link_errors(&self) -> impl Iterator<Item = &LinkFailure> {
        self.directories.iter().flat_map(|d| d.link_errors.iter())
    }

    /// `old -> new` listing of every directory.
    pub fn plan(&self) -> String {
        self.directories
            .iter()
            .map(|d| rename_plan(&d.results))
            .collect::<Vec<_>>()
            .concat()
    }

    /// Unified diff of every companion file rewrite.
    pub fn link_diff(&self) -> String {
        self.directories
            .iter()
            .flat_map(|d| d.link_updates.iter())
            .filter(|u| u.is_modified())
            .map(|u| unified_diff(&u.original, &u.transformed, &u.path))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Applies a [`RuleSpec`] to batches of files.
///
/// ```rust,no_run
/// use rename_dsl::prelude::*;
///
/// let rule = RuleSpec::add("", CountingText::new(1).prefix("-").width(3))
///     .placement(Position::End, Anchor::OfFileName)
///     .sort(SortKey::ModifyDate, SortOrder::Ascending);
///
/// let report = Renamer::new(rule)?
///     .on_conflict(Decision::TryAgain)
///     .dry_run()
///     .run_paths(&["./photos".into()], &FileCollector::new())?;
///
/// print!("{}", report.plan());
/// # Ok::<(), rename_dsl::error::RenameError>(())
/// ```
pub struct Renamer<'a> {
    rule: RuleSpec,
    policy: Box<dyn ConflictPolicy + 'a>,
    dry_run: bool,
}

impl<'a> Renamer<'a> {
    /// Creates a renamer. The rule is validated before anything else happens.
    pub fn new(rule: RuleSpec) -> Result<Self> {
        rule.validate()?;
        Ok(Self {
            rule,
            policy: Box::new(Decision::Skip),
            dry_run: false,
        })
    }

    /// Sets how name collisions are resolved. Defaults to skipping.
    pub fn on_conflict(mut self, policy: impl ConflictPolicy + 'a) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Enables dry-run mode (compute names without renaming anything).
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn rule(&self) -> &RuleSpec {
        &self.rule
    }

    /// Collects files under `roots` and renames them directory by directory.
    pub fn run_paths(&mut self, roots: &[PathBuf], collector: &FileCollector) -> Result<RunReport> {
        let entries = collector.collect_all(roots)?;
        self.run(entries)
    }

    /// Renames `entries`, one batch per parent directory.
    ///
    /// A `Cancel` decision ends the run with [`RenameError::Cancelled`], which
    /// carries everything done up to that point.
    pub fn run(&mut self, entries: Vec<FileEntry>) -> Result<RunReport> {
        let mut report = RunReport::default();

        for (directory, entries) in group_by_directory(entries) {
            let mut state = BatchState::new(&self.rule);
            let outcome = self.run_directory(&directory, entries, &mut state);
            let cancelled = outcome.stop == StopReason::Cancelled;
            report.directories.push(outcome);
            if cancelled {
                return Err(RenameError::Cancelled {
                    report: Box::new(report),
                });
            }
        }

        info!("Renamed {} file(s)", report.total_renamed());
        Ok(report)
    }

    /// Processes a single directory with a caller-owned state.
    ///
    /// Reusing the same state for a second pass keeps its skip set, so files
    /// skipped earlier are not attempted again.
    pub fn run_directory(
        &mut self,
        directory: &Path,
        mut entries: Vec<FileEntry>,
        state: &mut BatchState,
    ) -> DirectoryOutcome {
        sort_entries(&mut entries, self.rule.sort.as_ref());
        info!("Processing {} file(s) in {}", entries.len(), directory.display());

        let mut resolver = if self.dry_run {
            ConflictResolver::simulated()
        } else {
            ConflictResolver::live()
        };
        let mut links = LinkTracker::new(self.dry_run);
        let mut results = Vec::with_capacity(entries.len());
        let mut stop = StopReason::Completed;
        let total = entries.len();

        'files: for (index, entry) in entries.iter().enumerate() {
            if state.budget_reached() {
                stop = StopReason::BudgetReached;
                break;
            }
            if state.is_skipped(&entry.path) {
                debug!("Skipping {} (skipped earlier)", entry.path.display());
                results.push(RenameResult::skipped(entry.path.clone()));
                continue;
            }
            let Some(name) = entry.file_name() else {
                results.push(RenameResult::unchanged(entry.path.clone()));
                continue;
            };

            let retry_bound = total - index;
            let mut retries = 0;

            loop {
                let candidate = match candidate_name(&self.rule, name, state) {
                    Ok(Some(candidate)) => candidate,
                    Ok(None) => {
                        results.push(RenameResult::unchanged(entry.path.clone()));
                        continue 'files;
                    }
                    Err(Exhaustion::Counter) => {
                        stop = StopReason::CounterExhausted;
                        break 'files;
                    }
                    Err(Exhaustion::List) => {
                        stop = StopReason::ListExhausted;
                        break 'files;
                    }
                };

                if !is_valid_file_name(&candidate.name) {
                    results.push(RenameResult::failed(
                        entry.path.clone(),
                        format!("invalid file name '{}'", candidate.name),
                    ));
                    continue 'files;
                }

                let target = entry.path.with_file_name(&candidate.name);
                match resolver.classify(&entry.path, &target) {
                    Proposal::NoOp => {
                        debug!("{} already has the desired name", entry.path.display());
                        results.push(RenameResult::unchanged(entry.path.clone()));
                        continue 'files;
                    }
                    Proposal::Ready => {
                        match self.execute(&entry.path, &target) {
                            Ok(()) => {
                                info!("Renamed {} -> {}", entry.path.display(), candidate.name);
                                state.record_rename(candidate.slot);
                                resolver.record(&entry.path, &target);
                                links.propagate(&self.rule.links, &entry.path, &target);
                                results.push(RenameResult::renamed(entry.path.clone(), target));
                            }
                            Err(e) => {
                                warn!("{}", e);
                                results.push(RenameResult::failed(
                                    entry.path.clone(),
                                    e.to_string(),
                                ));
                            }
                        }
                        continue 'files;
                    }
                    Proposal::Exists => match self.policy.decide(&entry.path, &target) {
                        Decision::Cancel => {
                            warn!("Cancelled at {}", entry.path.display());
                            stop = StopReason::Cancelled;
                            break 'files;
                        }
                        Decision::Skip => {
                            debug!(
                                "Skipping {}: {} exists",
                                entry.path.display(),
                                target.display()
                            );
                            state.skip(entry.path.clone());
                            results.push(RenameResult::skipped(entry.path.clone()));
                            continue 'files;
                        }
                        Decision::TryAgain => {
                            retries += 1;
                            match candidate.slot {
                                Some(slot) if retries <= retry_bound => {
                                    debug!("{} exists, advancing counter", target.display());
                                    state.advance(slot);
                                }
                                _ => {
                                    warn!(
                                        "Giving up on {} after {} attempt(s)",
                                        entry.path.display(),
                                        retries
                                    );
                                    state.skip(entry.path.clone());
                                    results.push(RenameResult::skipped(entry.path.clone()));
                                    continue 'files;
                                }
                            }
                        }
                    },
                }
            }
        }

        // Files never reached keep their names.
        for entry in entries.iter().skip(results.len()) {
            results.push(RenameResult::unchanged(entry.path.clone()));
        }

        if stop != StopReason::Completed {
            info!("Stopped processing {}: {:?}", directory.display(), stop);
        }

        let (link_updates, link_errors) = links.finish();
        DirectoryOutcome {
            directory: directory.to_path_buf(),
            results,
            stop,
            link_updates,
            link_errors,
        }
    }

    fn execute(&self, from: &Path, to: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        fs::rename(from, to).map_err(|source| RenameError::FileSystem {
            path: from.to_path_buf(),
            source,
        })
    }
}

fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('\0')
        && !name.chars().any(std::path::is_separator)
}

/// Companion file rewrites for one directory.
///
/// Content is read once per companion and rewritten in memory after every
/// rename; live runs write it back each time.
struct LinkTracker {
    dry_run: bool,
    updates: BTreeMap<PathBuf, LinkUpdate>,
    errors: Vec<LinkFailure>,
}

impl LinkTracker {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            updates: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    fn propagate(&mut self, companions: &[PathBuf], from: &Path, to: &Path) {
        if companions.is_empty() {
            return;
        }
        let old = absolute_string(from);
        let new = absolute_string(to);

        for companion in companions {
            if let Err(e) = self.rewrite(companion, &old, &new) {
                warn!("{}", e);
                self.errors.push(LinkFailure {
                    path: companion.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn rewrite(&mut self, companion: &Path, old: &str, new: &str) -> Result<()> {
        let update = match self.updates.entry(companion.to_path_buf()) {
            Entry::Vacant(slot) => {
                let update = LinkPropagator::plan(companion, old, new)?;
                if !update.is_modified() {
                    slot.insert(update);
                    return Ok(());
                }
                slot.insert(update)
            }
            Entry::Occupied(slot) => {
                let update = slot.into_mut();
                let (transformed, changed) = substitute_path(&update.transformed, old, new);
                if !changed {
                    return Ok(());
                }
                update.transformed = transformed;
                update
            }
        };
        if !self.dry_run {
            update.apply()?;
        }
        debug!("Updated references in {}", companion.display());
        Ok(())
    }

    fn finish(self) -> (Vec<LinkUpdate>, Vec<LinkFailure>) {
        (
            self.updates.into_values().filter(|u| u.is_modified()).collect(),
            self.errors,
        )
    }
}

fn absolute_string(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::PolicyFn;
    use crate::rule::{Anchor, CountingText, InsertText, Position};
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, names: &[&str]) -> Vec<FileEntry> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                File::create(&path).unwrap();
                FileEntry::from_path(path).unwrap()
            })
            .collect()
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_counter_follows_sorted_order() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["c.txt", "a.txt", "b.txt"]);

        let rule = RuleSpec::add("", CountingText::new(1).prefix("_"))
            .placement(Position::End, Anchor::OfFileName);
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 3);
        assert_eq!(names_in(dir.path()), vec!["a_1.txt", "b_2.txt", "c_3.txt"]);
    }

    #[test]
    fn test_skip_does_not_advance_counter() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt"]);
        File::create(dir.path().join("a-1.txt")).unwrap();

        let rule = RuleSpec::add("", CountingText::new(1).prefix("-"))
            .placement(Position::End, Anchor::OfFileName);
        let mut state = BatchState::new(&rule);
        let outcome = Renamer::new(rule)
            .unwrap()
            .run_directory(dir.path(), entries, &mut state);

        assert!(outcome.results[0].skipped);
        assert!(state.is_skipped(&dir.path().join("a.txt")));
        assert!(outcome.results[1].renamed);
        assert_eq!(outcome.results[1].new_path, dir.path().join("b-1.txt"));
        assert_eq!(state.counters, vec![2]);
    }

    #[test]
    fn test_skip_set_survives_second_pass() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt"]);
        File::create(dir.path().join("a-1.txt")).unwrap();

        let rule = RuleSpec::add("", CountingText::new(1).prefix("-"))
            .placement(Position::End, Anchor::OfFileName);
        let mut state = BatchState::new(&rule);
        let mut asked = 0;
        let second = {
            let mut renamer = Renamer::new(rule).unwrap().on_conflict(PolicyFn(
                |_: &Path, _: &Path| {
                    asked += 1;
                    Decision::Skip
                },
            ));
            let first = renamer.run_directory(dir.path(), entries, &mut state);
            assert!(first.results[0].skipped);

            // The blocking file is gone, but a skipped file is not retried.
            fs::remove_file(dir.path().join("a-1.txt")).unwrap();
            let again = vec![FileEntry::from_path(dir.path().join("a.txt")).unwrap()];
            renamer.run_directory(dir.path(), again, &mut state)
        };

        assert_eq!(asked, 1);
        assert_eq!(second.results.len(), 1);
        assert!(second.results[0].skipped);
        assert!(!second.results[0].renamed);
        assert!(dir.path().join("a.txt").exists());
        assert_eq!(state.counters, vec![2]);
    }

    #[test]
    fn test_missing_file_is_reported_failed() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt", "c.txt"]);
        fs::remove_file(dir.path().join("b.txt")).unwrap();

        let rule = RuleSpec::rename(CountingText::new(1).prefix("n"));
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 2);
        let failed = report.failed();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].old_path, dir.path().join("b.txt"));
        assert!(!failed[0].renamed);
        assert_eq!(names_in(dir.path()), vec!["n1.txt", "n2.txt"]);
    }

    #[test]
    fn test_counter_at_max_stops_instead_of_overflowing() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt"]);

        let rule = RuleSpec::rename(CountingText::new(i64::MAX).prefix("n"));
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 1);
        assert_eq!(report.directories[0].stop, StopReason::CounterExhausted);
        assert_eq!(
            names_in(dir.path()),
            vec!["b.txt".to_string(), format!("n{}.txt", i64::MAX)]
        );
    }

    #[test]
    fn test_link_rewritten_once_when_new_name_extends_old() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.jpg"]);
        let old = absolute_string(&dir.path().join("a.jpg"));
        let companion = dir.path().join("index.txt");
        fs::write(&companion, format!("{old}\n")).unwrap();

        let rule = RuleSpec::add("jpg", ".bak")
            .placement(Position::End, Anchor::OfExtension)
            .link(&companion);
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 1);
        assert_eq!(
            fs::read_to_string(&companion).unwrap(),
            format!("{old}.bak\n")
        );
        assert_eq!(report.directories[0].link_updates.len(), 1);
    }

    #[test]
    fn test_try_again_advances_counter() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("file-1.txt")).unwrap();
        let entries = touch(dir.path(), &["file.txt"]);

        let rule = RuleSpec::add("", CountingText::new(1).prefix("-"))
            .placement(Position::End, Anchor::OfFileName);
        let report = Renamer::new(rule)
            .unwrap()
            .on_conflict(Decision::TryAgain)
            .run(entries)
            .unwrap();

        assert_eq!(report.total_renamed(), 1);
        assert_eq!(names_in(dir.path()), vec!["file-1.txt", "file-2.txt"]);
    }

    #[test]
    fn test_try_again_is_bounded() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt"]);

        // Static text can never produce a different name.
        let rule = RuleSpec::rename("b");
        let mut asked = 0;
        let report = Renamer::new(rule)
            .unwrap()
            .on_conflict(PolicyFn(|_: &Path, _: &Path| {
                asked += 1;
                Decision::TryAgain
            }))
            .run(entries)
            .unwrap();

        assert_eq!(report.total_renamed(), 0);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(asked, 1);
    }

    #[test]
    fn test_cancel_keeps_earlier_renames() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt", "x2.txt"]);

        let rule = RuleSpec::rename(CountingText::new(1).prefix("x"));
        let err = Renamer::new(rule)
            .unwrap()
            .on_conflict(Decision::Cancel)
            .run(entries)
            .unwrap_err();

        match err {
            RenameError::Cancelled { report } => {
                assert_eq!(report.total_renamed(), 1);
                assert_eq!(report.directories[0].stop, StopReason::Cancelled);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(names_in(dir.path()), vec!["b.txt", "x1.txt", "x2.txt"]);
    }

    #[test]
    fn test_list_exhausted() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["1.jpg", "2.jpg", "3.jpg"]);

        let rule = RuleSpec::rename(InsertText::list(["red", "green"]));
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 2);
        assert_eq!(report.directories[0].stop, StopReason::ListExhausted);
        assert_eq!(names_in(dir.path()), vec!["3.jpg", "green.jpg", "red.jpg"]);
    }

    #[test]
    fn test_counter_exhausted() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt", "c.txt"]);

        let rule = RuleSpec::rename(CountingText::new(1).end(2).prefix("n"));
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 2);
        assert_eq!(report.directories[0].stop, StopReason::CounterExhausted);
        assert_eq!(report.directories[0].results.len(), 3);
    }

    #[test]
    fn test_budget_caps_renames() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt", "c.txt", "d.txt"]);

        let rule = RuleSpec::add("", CountingText::new(3).prefix("old_"))
            .placement(Position::Start, Anchor::OfFileName)
            .count_to_limit();
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 2);
        assert_eq!(report.directories[0].stop, StopReason::BudgetReached);
        assert_eq!(
            names_in(dir.path()),
            vec!["c.txt", "d.txt", "old_a.txt", "old_b.txt"]
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt", "b.txt"]);

        let rule = RuleSpec::rename("same");
        let report = Renamer::new(rule).unwrap().dry_run().run(entries).unwrap();

        // The simulated rename of a.txt makes same.txt collide for b.txt.
        assert_eq!(report.total_renamed(), 1);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(names_in(dir.path()), vec!["a.txt", "b.txt"]);
        assert!(report.plan().contains("-> same.txt"));
    }

    #[test]
    fn test_unmatched_file_is_not_renamed() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["keep.txt"]);

        let report = Renamer::new(RuleSpec::replace("zzz", "y"))
            .unwrap()
            .run(entries)
            .unwrap();
        assert_eq!(report.total_renamed(), 0);
        assert!(!report.directories[0].results[0].renamed);
        assert!(!report.directories[0].results[0].skipped);
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let rule = RuleSpec::add("a", "b").matching(|m| m.regex());
        assert!(matches!(
            Renamer::new(rule),
            Err(RenameError::UnsupportedOption(_))
        ));
    }

    #[test]
    fn test_separator_in_name_fails_file() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt"]);

        let report = Renamer::new(RuleSpec::rename("sub/dir"))
            .unwrap()
            .run(entries)
            .unwrap();
        assert_eq!(report.failed().len(), 1);
        assert_eq!(names_in(dir.path()), vec!["a.txt"]);
    }

    #[test]
    fn test_links_updated() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt"]);
        let companion = dir.path().join("index.md");
        let old = std::path::absolute(dir.path().join("a.txt")).unwrap();
        fs::write(&companion, format!("[a]({})\n", old.display())).unwrap();

        let rule = RuleSpec::rename("b").link(&companion);
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        let new = std::path::absolute(dir.path().join("b.txt")).unwrap();
        assert_eq!(
            fs::read_to_string(&companion).unwrap(),
            format!("[a]({})\n", new.display())
        );
        assert_eq!(report.directories[0].link_updates.len(), 1);
        assert!(report.link_diff().contains("+[a]("));
    }

    #[test]
    fn test_missing_link_file_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let entries = touch(dir.path(), &["a.txt"]);

        let rule = RuleSpec::rename("b").link(dir.path().join("missing.md"));
        let report = Renamer::new(rule).unwrap().run(entries).unwrap();

        assert_eq!(report.total_renamed(), 1);
        assert_eq!(report.link_errors().count(), 1);
    }
}
