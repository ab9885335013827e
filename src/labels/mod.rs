//! Ordered label lists (tags, splits) and the actions that reorder them.
//!
//! The list computed here only decides what gets sent; the fragment the server
//! renders back is what the user sees next.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ListError {
    #[error("label {0:?} is not in the list")]
    NotFound(String),
    #[error("label {0:?} is already first")]
    AtStart(String),
    #[error("label {0:?} is already last")]
    AtEnd(String),
    #[error("label must not be empty")]
    Empty,
    #[error("label {0:?} already exists")]
    Duplicate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct OrderedLabelList {
    labels: Vec<String>,
}

impl OrderedLabelList {
    /// Build from labels in display order; later duplicates are dropped.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Self { labels: out }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn into_vec(self) -> Vec<String> {
        self.labels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Whether `candidate` (trimmed) may be appended.
    pub fn can_add(&self, candidate: &str) -> bool {
        self.check_new(candidate).is_ok()
    }

    fn check_new(&self, candidate: &str) -> Result<String, ListError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(ListError::Empty);
        }
        if self.position(candidate).is_some() {
            return Err(ListError::Duplicate(candidate.to_string()));
        }
        Ok(candidate.to_string())
    }

    fn index_of(&self, label: &str) -> Result<usize, ListError> {
        self.position(label)
            .ok_or_else(|| ListError::NotFound(label.to_string()))
    }

    pub fn apply(&self, action: &ListAction) -> Result<Self, ListError> {
        let mut next = self.labels.clone();
        match action {
            ListAction::MoveUp(label) => {
                let i = self.index_of(label)?;
                if i == 0 {
                    return Err(ListError::AtStart(label.clone()));
                }
                next.swap(i, i - 1);
            }
            ListAction::MoveDown(label) => {
                let i = self.index_of(label)?;
                if i + 1 >= next.len() {
                    return Err(ListError::AtEnd(label.clone()));
                }
                next.swap(i, i + 1);
            }
            ListAction::Delete(label) => {
                let i = self.index_of(label)?;
                next.remove(i);
            }
            ListAction::Rename { from, to } => {
                let i = self.index_of(from)?;
                let to = to.trim();
                if to.is_empty() {
                    return Err(ListError::Empty);
                }
                if to != from.as_str() && self.position(to).is_some() {
                    return Err(ListError::Duplicate(to.to_string()));
                }
                next[i] = to.to_string();
            }
            ListAction::Add(candidate) => {
                next.push(self.check_new(candidate)?);
            }
        }
        Ok(Self { labels: next })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ListAction {
    MoveUp(String),
    MoveDown(String),
    Delete(String),
    Rename { from: String, to: String },
    Add(String),
}

/// The list verbs the editors understand; everything else is a metadata action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
pub(crate) enum ListVerb {
    #[strum(serialize = "move_tag_up", serialize = "move_split_up")]
    MoveUp,
    #[strum(serialize = "move_tag_down", serialize = "move_split_down")]
    MoveDown,
    #[strum(serialize = "delete_tag", serialize = "delete_split")]
    Delete,
    #[strum(serialize = "rename_tag", serialize = "rename_split")]
    Rename,
    #[strum(serialize = "update_taglist", serialize = "add_tag", serialize = "update_splitlist", serialize = "add_split")]
    Add,
}

/// A requested mutation read off a clicked control; sent at once, never queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingAction {
    pub verb: String,
    pub target: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// Send the whole reordered list.
    List {
        verb: String,
        labels: OrderedLabelList,
    },
    /// Send `{target, value}` untouched (colors, icons, ...).
    Metadata {
        verb: String,
        target: String,
        value: Option<String>,
    },
}

impl PendingAction {
    pub fn new(verb: impl Into<String>, target: impl Into<String>, value: Option<String>) -> Self {
        Self {
            verb: verb.into(),
            target: target.into(),
            value: value.filter(|v| !v.is_empty()),
        }
    }

    pub fn list_verb(&self) -> Option<ListVerb> {
        ListVerb::from_str(self.verb.trim()).ok()
    }

    /// Resolve against the current list. `edited` is the entry's input value, read by the
    /// caller at dispatch time; only renames and adds look at it.
    pub fn resolve(
        &self,
        current: &OrderedLabelList,
        edited: Option<&str>,
    ) -> Result<Dispatch, ListError> {
        let target = self.target.trim().to_string();
        let action = match self.list_verb() {
            None => {
                return Ok(Dispatch::Metadata {
                    verb: self.verb.clone(),
                    target,
                    value: self.value.clone(),
                })
            }
            Some(ListVerb::MoveUp) => ListAction::MoveUp(target),
            Some(ListVerb::MoveDown) => ListAction::MoveDown(target),
            Some(ListVerb::Delete) => ListAction::Delete(target),
            Some(ListVerb::Rename) => ListAction::Rename {
                from: target,
                to: edited.unwrap_or_default().to_string(),
            },
            Some(ListVerb::Add) => ListAction::Add(edited.unwrap_or(&target).to_string()),
        };

        Ok(Dispatch::List {
            verb: self.verb.clone(),
            labels: current.apply(&action)?,
        })
    }
}

/// Rename lock: an entry whose input differs from its label blocks edits elsewhere.
///
/// Returns whether the entry's rename button should be enabled.
pub(crate) fn rename_pending(label: &str, input: &str) -> bool {
    let input = input.trim();
    !input.is_empty() && input != label.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(labels: &[&str]) -> OrderedLabelList {
        OrderedLabelList::from_labels(labels.iter().copied())
    }

    #[test]
    fn test_move_down_first() {
        let next = list(&["a", "b", "c"])
            .apply(&ListAction::MoveDown("a".to_string()))
            .expect("move down");
        assert_eq!(next.as_slice(), ["b", "a", "c"]);
    }

    #[test]
    fn test_move_up_then_down_restores_order() {
        let original = list(&["a", "b", "c", "d"]);
        for label in ["b", "c", "d"] {
            let up = original
                .apply(&ListAction::MoveUp(label.to_string()))
                .expect("move up");
            let back = up
                .apply(&ListAction::MoveDown(label.to_string()))
                .expect("move down");
            assert_eq!(back, original, "round trip for {label}");
        }
    }

    #[test]
    fn test_out_of_range_moves_are_rejected() {
        let l = list(&["a", "b"]);
        assert_eq!(
            l.apply(&ListAction::MoveUp("a".to_string())),
            Err(ListError::AtStart("a".to_string()))
        );
        assert_eq!(
            l.apply(&ListAction::MoveDown("b".to_string())),
            Err(ListError::AtEnd("b".to_string()))
        );
        assert_eq!(
            l.apply(&ListAction::MoveUp("zzz".to_string())),
            Err(ListError::NotFound("zzz".to_string()))
        );
    }

    #[test]
    fn test_delete_twice_is_an_explicit_error() {
        let l = list(&["a", "b", "c"]);
        let once = l
            .apply(&ListAction::Delete("b".to_string()))
            .expect("first delete");
        assert_eq!(once.as_slice(), ["a", "c"]);
        let twice = once.apply(&ListAction::Delete("b".to_string()));
        assert_eq!(twice, Err(ListError::NotFound("b".to_string())));
        assert_eq!(once.as_slice(), ["a", "c"]);
    }

    #[test]
    fn test_add_rejects_empty_and_duplicates() {
        let l = list(&["a", "b"]);
        assert_eq!(
            l.apply(&ListAction::Add("b".to_string())),
            Err(ListError::Duplicate("b".to_string()))
        );
        assert_eq!(l.apply(&ListAction::Add("   ".to_string())), Err(ListError::Empty));
        assert!(!l.can_add("b"));
        assert!(!l.can_add(""));
        assert!(l.can_add("B"), "duplicates are case-sensitive");

        let added = l.apply(&ListAction::Add(" c ".to_string())).expect("add");
        assert_eq!(added.as_slice(), ["a", "b", "c"]);
        assert!(!added.can_add("c"));
    }

    #[test]
    fn test_rename_in_place() {
        let l = list(&["a", "b", "c"]);
        let renamed = l
            .apply(&ListAction::Rename {
                from: "b".to_string(),
                to: "beta".to_string(),
            })
            .expect("rename");
        assert_eq!(renamed.as_slice(), ["a", "beta", "c"]);

        assert_eq!(
            l.apply(&ListAction::Rename {
                from: "b".to_string(),
                to: "c".to_string(),
            }),
            Err(ListError::Duplicate("c".to_string()))
        );
        assert_eq!(
            l.apply(&ListAction::Rename {
                from: "b".to_string(),
                to: " ".to_string(),
            }),
            Err(ListError::Empty)
        );
    }

    #[test]
    fn test_from_labels_drops_duplicates() {
        assert_eq!(list(&["a", "b", "a"]).as_slice(), ["a", "b"]);
    }

    #[test]
    fn test_verbs_parse_for_tags_and_splits() {
        assert_eq!(ListVerb::from_str("move_tag_up"), Ok(ListVerb::MoveUp));
        assert_eq!(ListVerb::from_str("move_split_down"), Ok(ListVerb::MoveDown));
        assert_eq!(ListVerb::from_str("update_taglist"), Ok(ListVerb::Add));
        assert!(ListVerb::from_str("set_color").is_err());
    }

    #[test]
    fn test_pending_action_resolves_list_verbs() {
        let current = list(&["urgent", "later"]);
        let action = PendingAction::new("move_tag_down", "urgent", None);
        let dispatch = action.resolve(&current, None).expect("resolves");
        assert_eq!(
            dispatch,
            Dispatch::List {
                verb: "move_tag_down".to_string(),
                labels: list(&["later", "urgent"]),
            }
        );
    }

    #[test]
    fn test_pending_action_rename_reads_edited_value() {
        let current = list(&["urgent", "later"]);
        let action = PendingAction::new("rename_tag", "later", None);
        let Dispatch::List { labels, .. } = action
            .resolve(&current, Some("someday"))
            .expect("resolves")
        else {
            panic!("rename is a list action");
        };
        assert_eq!(labels.as_slice(), ["urgent", "someday"]);
    }

    #[test]
    fn test_pending_action_unknown_verb_is_metadata() {
        let current = list(&["urgent"]);
        let action = PendingAction::new("set_color", "urgent", Some("red".to_string()));
        assert_eq!(
            action.resolve(&current, None),
            Ok(Dispatch::Metadata {
                verb: "set_color".to_string(),
                target: "urgent".to_string(),
                value: Some("red".to_string()),
            })
        );
    }

    #[test]
    fn test_pending_action_on_missing_label_is_rejected() {
        let current = list(&["a"]);
        let action = PendingAction::new("delete_tag", "gone", None);
        assert_eq!(
            action.resolve(&current, None),
            Err(ListError::NotFound("gone".to_string()))
        );
    }

    #[test]
    fn test_rename_pending() {
        assert!(rename_pending("urgent", "very urgent"));
        assert!(!rename_pending("urgent", " urgent "));
        assert!(!rename_pending("urgent", "   "));
    }
}
