//! Fixed team roster and @-mention parsing.
//!
//! The roster is static configuration: three members with display name,
//! emoji, and color. Mention parsing and per-assignee statistics both key
//! off this set.

use regex::Regex;
use std::sync::LazyLock;

/// One member of the fixed roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMember {
    /// Identifier used in assignee fields and @-mentions
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Avatar emoji
    pub emoji: &'static str,
    /// Display color (hex)
    pub color: &'static str,
}

/// The full roster, in display order.
pub const TEAM: &[TeamMember] = &[
    TeamMember {
        id: "kris",
        name: "Kris",
        emoji: "🧑‍💼",
        color: "#e91e63",
    },
    TeamMember {
        id: "taylor",
        name: "Taylor",
        emoji: "🦉",
        color: "#2196f3",
    },
    TeamMember {
        id: "nyx",
        name: "Nyx",
        emoji: "🤖",
        color: "#9c27b0",
    },
];

/// Look up a roster member by id.
pub fn member(id: &str) -> Option<&'static TeamMember> {
    TEAM.iter().find(|m| m.id == id)
}

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let ids = TEAM.iter().map(|m| m.id).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)@({})\b", ids)).expect("valid mention regex")
});

/// Extract distinct roster ids @-mentioned in `text`, in first-appearance
/// order. Matching is case-insensitive and word-bounded; self-mentions are
/// not the parser's concern.
pub fn mentions(text: &str) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();
    for capture in MENTION_RE.captures_iter(text) {
        let id = capture[1].to_lowercase();
        if let Some(member) = TEAM.iter().find(|m| m.id == id) {
            if !found.contains(&member.id) {
                found.push(member.id);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_lookup() {
        assert_eq!(member("kris").unwrap().emoji, "🧑‍💼");
        assert_eq!(member("taylor").unwrap().color, "#2196f3");
        assert_eq!(member("nyx").unwrap().name, "Nyx");
        assert!(member("stranger").is_none());
    }

    #[test]
    fn test_mentions_basic() {
        assert_eq!(mentions("@kris please review"), vec!["kris"]);
        assert_eq!(mentions("ping @taylor and @nyx"), vec!["taylor", "nyx"]);
    }

    #[test]
    fn test_mentions_case_insensitive() {
        assert_eq!(mentions("@Kris @TAYLOR"), vec!["kris", "taylor"]);
    }

    #[test]
    fn test_mentions_deduplicated_in_order() {
        assert_eq!(mentions("@nyx @kris @nyx"), vec!["nyx", "kris"]);
    }

    #[test]
    fn test_mentions_word_boundary() {
        // "@krista" must not count as a mention of kris
        assert!(mentions("@krista says hi").is_empty());
        assert_eq!(mentions("(@kris)"), vec!["kris"]);
    }

    #[test]
    fn test_mentions_unknown_ignored() {
        assert!(mentions("@somebody else").is_empty());
        assert!(mentions("no mentions here").is_empty());
    }

    #[test]
    fn test_mentions_email_like_text() {
        // Plain id without @ is not a mention
        assert!(mentions("kris taylor nyx").is_empty());
    }
}
