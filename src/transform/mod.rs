//! Name transformation: text generation and placement.

pub mod placement;
pub mod text;

pub use text::{Exhaustion, GeneratedText, TextGenerator};

use crate::matcher::{NameParts, find_extension_matches, find_matches};
use crate::rule::{Anchor, RuleSpec};
use crate::state::BatchState;

/// A proposed new name for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    /// Counter slot consumed if the rename goes through.
    pub slot: Option<usize>,
}

/// Runs match, text generation and placement for a single file name.
///
/// Returns `Ok(None)` when the rule does not apply to the name.
pub fn candidate_name(
    rule: &RuleSpec,
    name: &str,
    state: &BatchState,
) -> Result<Option<Candidate>, Exhaustion> {
    let parts = NameParts::split(name);
    let set = match rule.placement.anchor {
        Anchor::OfExtension => {
            find_extension_matches(parts.extension.as_deref().unwrap_or(""), &rule.matching)
        }
        Anchor::OfMatch | Anchor::OfFileName => find_matches(&parts.stem, &rule.matching),
    };
    if set.is_empty() {
        return Ok(None);
    }

    let generated = TextGenerator::new(&rule.insert, rule.matching.same_match_index)
        .generate(state, set.pattern_index)?;

    Ok(
        placement::resolve(rule.action, rule.placement, &parts, &set, &generated.text).map(
            |name| Candidate {
                name,
                slot: generated.slot,
            },
        ),
    )
}
