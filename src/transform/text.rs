//! Insertion text generation.

use crate::rule::{InsertSpec, InsertText, TextItem};
use crate::state::BatchState;

/// Text produced for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
    /// Counter slot that advances if the rename succeeds.
    pub slot: Option<usize>,
}

/// Why a dynamic text source could not produce more text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    Counter,
    List,
}

/// Produces insertion text from an [`InsertSpec`] and the current batch state.
#[derive(Debug, Clone, Copy)]
pub struct TextGenerator<'a> {
    insert: &'a InsertSpec,
    same_match_index: bool,
}

impl<'a> TextGenerator<'a> {
    pub fn new(insert: &'a InsertSpec, same_match_index: bool) -> Self {
        Self {
            insert,
            same_match_index,
        }
    }

    /// Generates text for the current file.
    ///
    /// `pattern_index` is the index of the pattern that matched; it selects the
    /// list item when `same_match_index` is set. The state is never mutated
    /// here.
    pub fn generate(
        &self,
        state: &BatchState,
        pattern_index: Option<usize>,
    ) -> Result<GeneratedText, Exhaustion> {
        match &self.insert.text {
            InsertText::Static { text } => Ok(GeneratedText {
                text: text.clone(),
                slot: None,
            }),
            InsertText::Counting(counting) if self.insert.count_to_limit => Ok(GeneratedText {
                text: counting.prefix.clone(),
                slot: None,
            }),
            InsertText::Counting(counting) => {
                if state.is_exhausted(0) {
                    return Err(Exhaustion::Counter);
                }
                Ok(GeneratedText {
                    text: counting.render(state.counter(0)),
                    slot: Some(0),
                })
            }
            InsertText::List { items } => {
                let index = self.list_index(items.len(), state, pattern_index)?;
                match &items[index] {
                    TextItem::Static(text) => Ok(GeneratedText {
                        text: text.clone(),
                        slot: None,
                    }),
                    TextItem::Counting(counting) => {
                        if state.is_exhausted(index) {
                            return Err(Exhaustion::Counter);
                        }
                        Ok(GeneratedText {
                            text: counting.render(state.counter(index)),
                            slot: Some(index),
                        })
                    }
                }
            }
            // Rejected by validation.
            InsertText::Random { .. } => Err(Exhaustion::List),
        }
    }

    fn list_index(
        &self,
        len: usize,
        state: &BatchState,
        pattern_index: Option<usize>,
    ) -> Result<usize, Exhaustion> {
        if len == 0 {
            return Err(Exhaustion::List);
        }
        if self.same_match_index {
            let index = pattern_index.unwrap_or(0);
            return if index < len {
                Ok(index)
            } else {
                Err(Exhaustion::List)
            };
        }
        if self.insert.repeat_list {
            return Ok(state.renamed_count % len);
        }
        if state.renamed_count < len {
            Ok(state.renamed_count)
        } else {
            Err(Exhaustion::List)
        }
    }
}
