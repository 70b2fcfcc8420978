//! Previews of planned renames and companion file rewrites.

use crate::renamer::RenameResult;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    writeln!(&mut output, "--- a/{}", path.display()).unwrap();
    writeln!(&mut output, "+++ b/{}", path.display()).unwrap();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            writeln!(&mut output).unwrap();
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };

                write!(&mut output, "{}{}", sign, change.value()).unwrap();
                if change.missing_newline() {
                    writeln!(&mut output).unwrap();
                }
            }
        }
    }

    output
}

/// Lists renames as `old -> new`, one per line, followed by skipped and
/// failed files.
pub fn rename_plan(results: &[RenameResult]) -> String {
    let mut output = String::new();

    for result in results.iter().filter(|r| r.renamed) {
        writeln!(
            &mut output,
            "{} -> {}",
            result.old_path.display(),
            display_name(&result.new_path)
        )
        .unwrap();
    }
    for result in results.iter().filter(|r| r.skipped) {
        writeln!(&mut output, "skipped {}", result.old_path.display()).unwrap();
    }
    for result in results.iter().filter(|r| r.error.is_some()) {
        writeln!(
            &mut output,
            "failed {}: {}",
            result.old_path.display(),
            result.error.as_deref().unwrap_or_default()
        )
        .unwrap();
    }

    output
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
