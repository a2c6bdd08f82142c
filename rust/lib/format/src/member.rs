//! Display names and avatar initials for comment authors.
//!
//! A comment's member is absent when the member was deleted, and present
//! with an empty name when the comment was posted anonymously.

use serde::{Deserialize, Serialize};

use crate::translate::Translate;

pub mod keys {
    pub const DELETED_MEMBER: &str = "Deleted member";
    pub const ANONYMOUS: &str = "Anonymous";
}

/// The member attached to a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: Option<String>,
}

impl Member {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        Self { name: None }
    }
}

/// Name to show for a comment author.
///
/// - deleted member (`None`) → `t("Deleted member")`
/// - no name or an empty name → `t("Anonymous")`
/// - otherwise the member's name as stored, untranslated
pub fn member_name(member: Option<&Member>, t: &impl Translate) -> String {
    let Some(member) = member else {
        return t.t(keys::DELETED_MEMBER, None);
    };
    match member.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => t.t(keys::ANONYMOUS, None),
    }
}

/// Avatar initials for a comment author, derived from [`member_name`].
pub fn member_initials(member: Option<&Member>, t: &impl Translate) -> String {
    initials(&member_name(member, t))
}

/// First letter of the first and last word, uppercased.
///
/// A single word yields one letter; an empty name yields an empty string.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out: String = first.chars().take(1).flat_map(char::to_uppercase).collect();
    if let Some(last) = words.last() {
        out.extend(last.chars().take(1).flat_map(char::to_uppercase));
    }
    out
}
