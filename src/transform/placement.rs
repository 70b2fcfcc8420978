//! Splicing generated text into names.

use crate::matcher::{Match, MatchSet, NameParts};
use crate::rule::{Action, Anchor, PlacementSpec, Position};

/// Computes the new name, or `None` when the rule does not apply.
///
/// `set` must come from searching the stem, or the extension when the anchor
/// is [`Anchor::OfExtension`]. Edits are applied at descending offsets so an
/// insertion never moves an offset that is still pending.
pub fn resolve(
    action: Action,
    placement: PlacementSpec,
    parts: &NameParts,
    set: &MatchSet,
    text: &str,
) -> Option<String> {
    if set.is_empty() {
        return None;
    }

    let name = match placement.anchor {
        Anchor::OfExtension => resolve_extension(action, parts, set, text)?,
        Anchor::OfMatch | Anchor::OfFileName => {
            let stem = match action {
                Action::Rename => text.to_string(),
                Action::Replace => replace_spans(&parts.stem, &spans(set, &parts.stem), text),
                Action::Add if placement.anchor == Anchor::OfFileName => {
                    wrap(&parts.stem, placement.position, text)
                }
                Action::Add => insert_at_spans(
                    &parts.stem,
                    &spans(set, &parts.stem),
                    placement.position,
                    text,
                ),
            };
            parts.with_stem(&stem)
        }
    };

    if name.is_empty() { None } else { Some(name) }
}

/// `Add` appends `text` directly after the full name whatever the position,
/// so it becomes part of the extension. `Replace` and `Rename` swap the
/// extension for `text`, ignoring a leading dot.
fn resolve_extension(
    action: Action,
    parts: &NameParts,
    set: &MatchSet,
    text: &str,
) -> Option<String> {
    let dotted = |stem: &str| {
        let text = text.strip_prefix('.').unwrap_or(text);
        if text.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{text}")
        }
    };

    match action {
        Action::Replace if !set.is_exact() => None,
        Action::Replace | Action::Rename => Some(dotted(&parts.stem)),
        Action::Add => Some(format!("{}{text}", parts.full_name())),
    }
}

/// The empty pattern stands for the whole stem.
fn spans(set: &MatchSet, stem: &str) -> Vec<Match> {
    if set.pattern.is_empty() {
        vec![Match {
            offset: 0,
            len: stem.chars().count(),
        }]
    } else {
        set.matches.clone()
    }
}

fn wrap(stem: &str, position: Position, text: &str) -> String {
    match position {
        Position::Start => format!("{text}{stem}"),
        Position::End => format!("{stem}{text}"),
        Position::BothEnds => format!("{text}{stem}{text}"),
    }
}

fn insert_at_spans(stem: &str, spans: &[Match], position: Position, text: &str) -> String {
    let mut chars: Vec<char> = stem.chars().collect();
    let insert: Vec<char> = text.chars().collect();

    for span in descending(spans) {
        if matches!(position, Position::End | Position::BothEnds) {
            chars.splice(span.end()..span.end(), insert.iter().copied());
        }
        if matches!(position, Position::Start | Position::BothEnds) {
            chars.splice(span.offset..span.offset, insert.iter().copied());
        }
    }

    chars.into_iter().collect()
}

fn replace_spans(stem: &str, spans: &[Match], text: &str) -> String {
    let mut chars: Vec<char> = stem.chars().collect();
    let replacement: Vec<char> = text.chars().collect();

    for span in descending(spans) {
        chars.splice(span.offset..span.end(), replacement.iter().copied());
    }

    chars.into_iter().collect()
}

fn descending(spans: &[Match]) -> Vec<Match> {
    let mut sorted = spans.to_vec();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{find_extension_matches, find_matches};
    use crate::rule::MatchSpec;

    fn apply(
        action: Action,
        position: Position,
        anchor: Anchor,
        spec: &MatchSpec,
        name: &str,
        text: &str,
    ) -> Option<String> {
        let parts = NameParts::split(name);
        let set = if anchor == Anchor::OfExtension {
            find_extension_matches(parts.extension.as_deref().unwrap_or(""), spec)
        } else {
            find_matches(&parts.stem, spec)
        };
        resolve(
            action,
            PlacementSpec::new(position, anchor),
            &parts,
            &set,
            text,
        )
    }

    fn add(position: Position, anchor: Anchor, spec: &MatchSpec, name: &str, text: &str) -> String {
        apply(Action::Add, position, anchor, spec, name, text).unwrap_or_default()
    }

    fn replace(anchor: Anchor, spec: &MatchSpec, name: &str, text: &str) -> Option<String> {
        apply(Action::Replace, Position::End, anchor, spec, name, text)
    }

    fn rename(anchor: Anchor, spec: &MatchSpec, name: &str, text: &str) -> Option<String> {
        apply(Action::Rename, Position::End, anchor, spec, name, text)
    }

    #[test]
    fn test_add_end_of_file_name() {
        let spec = MatchSpec::everything();
        let once = add(Position::End, Anchor::OfFileName, &spec, "report.txt", "-1");
        assert_eq!(once, "report-1.txt");

        let twice = add(Position::End, Anchor::OfFileName, &spec, &once, "-1");
        assert_eq!(twice, "report-1-1.txt");
    }

    #[test]
    fn test_add_around_matches() {
        let spec = MatchSpec::pattern("a");
        assert_eq!(
            add(Position::Start, Anchor::OfMatch, &spec, "banana.txt", "_"),
            "b_an_an_a.txt"
        );
        assert_eq!(
            add(Position::End, Anchor::OfMatch, &spec, "banana.txt", "_"),
            "ba_na_na_.txt"
        );
        assert_eq!(
            add(Position::BothEnds, Anchor::OfMatch, &spec, "banana", "|"),
            "b|a|n|a|n|a|"
        );
    }

    #[test]
    fn test_add_respects_match_limit() {
        let spec = MatchSpec::pattern("a").limit(1).from_right();
        assert_eq!(
            add(Position::End, Anchor::OfMatch, &spec, "banana", "!"),
            "banana!"
        );
        let spec = MatchSpec::pattern("a").limit(1);
        assert_eq!(
            add(Position::End, Anchor::OfMatch, &spec, "banana", "!"),
            "ba!nana"
        );
    }

    #[test]
    fn test_add_file_name_start_and_both() {
        let spec = MatchSpec::pattern("rep");
        assert_eq!(
            add(Position::Start, Anchor::OfFileName, &spec, "report.txt", "v2-"),
            "v2-report.txt"
        );
        assert_eq!(
            add(Position::BothEnds, Anchor::OfFileName, &spec, "rep.txt", "~"),
            "~rep~.txt"
        );
    }

    #[test]
    fn test_add_extension_appends_after_full_name() {
        let spec = MatchSpec::pattern("txt");
        for position in [Position::Start, Position::End, Position::BothEnds] {
            assert_eq!(
                add(position, Anchor::OfExtension, &spec, "notes.txt", ".bak"),
                "notes.txt.bak"
            );
            assert_eq!(
                add(position, Anchor::OfExtension, &spec, "notes.txt", "old"),
                "notes.txtold"
            );
        }
    }

    #[test]
    fn test_replace_extension_exact_only() {
        let spec = MatchSpec::pattern("txt").case_insensitive();
        assert_eq!(
            replace(Anchor::OfExtension, &spec, "notes.TXT", "doc").as_deref(),
            Some("notes.doc")
        );
        assert_eq!(replace(Anchor::OfExtension, &spec, "notes.txts", "doc"), None);
    }

    #[test]
    fn test_replace_spans() {
        let spec = MatchSpec::pattern("IMG");
        assert_eq!(
            replace(Anchor::OfMatch, &spec, "IMG_IMG_1.jpg", "photo").as_deref(),
            Some("photo_photo_1.jpg")
        );
        let spec = MatchSpec::pattern("ä");
        assert_eq!(
            replace(Anchor::OfMatch, &spec, "bär_ä.txt", "ae").as_deref(),
            Some("baer_ae.txt")
        );
    }

    #[test]
    fn test_replace_keeps_casing_outside_matches() {
        let spec = MatchSpec::pattern("draft").case_insensitive();
        assert_eq!(
            replace(Anchor::OfMatch, &spec, "My_DRAFT_Notes.md", "final").as_deref(),
            Some("My_final_Notes.md")
        );
    }

    #[test]
    fn test_rename_keeps_extension() {
        let spec = MatchSpec::everything();
        assert_eq!(
            rename(Anchor::OfMatch, &spec, "whatever.jpg", "holiday").as_deref(),
            Some("holiday.jpg")
        );
        assert_eq!(
            rename(Anchor::OfMatch, &spec, "README", "INFO").as_deref(),
            Some("INFO")
        );
        assert_eq!(
            rename(Anchor::OfExtension, &spec, "photo.jpeg", ".jpg").as_deref(),
            Some("photo.jpg")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let spec = MatchSpec::pattern("zzz");
        assert_eq!(
            apply(
                Action::Add,
                Position::End,
                Anchor::OfFileName,
                &spec,
                "report.txt",
                "x"
            ),
            None
        );
        assert_eq!(rename(Anchor::OfMatch, &spec, "report.txt", "x"), None);
    }
}
