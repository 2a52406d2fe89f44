//! Keyword-driven decoration for alert titles and lines.
//!
//! Groups are checked in order and the first group with a keyword contained
//! in the (lowercased) text wins. Titles and lines use separate group lists,
//! each with its own fallback.

struct KeywordGroup {
    keywords: &'static [&'static str],
    emoji: &'static str,
}

const TITLE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["error", "fail", "exception", "critical"],
        emoji: "🚨",
    },
    KeywordGroup {
        keywords: &["deploy", "release"],
        emoji: "🚀",
    },
    KeywordGroup {
        keywords: &["warn"],
        emoji: "⚠️",
    },
    KeywordGroup {
        keywords: &["success", "completed", "complete"],
        emoji: "✅",
    },
];

const TITLE_DEFAULT: &str = "📢";

const LINE_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        keywords: &["error", "fail"],
        emoji: "❌",
    },
    KeywordGroup {
        keywords: &["warn"],
        emoji: "⚠️",
    },
    KeywordGroup {
        keywords: &["success", "completed", "done"],
        emoji: "✔️",
    },
];

const LINE_DEFAULT: &str = "▫️";

fn resolve(text: &str, groups: &[KeywordGroup], default: &'static str) -> &'static str {
    let lowered = text.to_lowercase();
    groups
        .iter()
        .find(|g| g.keywords.iter().any(|k| lowered.contains(k)))
        .map(|g| g.emoji)
        .unwrap_or(default)
}

/// Marker placed in front of a message title
pub fn resolve_title_emoji(text: &str) -> &'static str {
    resolve(text, TITLE_GROUPS, TITLE_DEFAULT)
}

/// Marker placed in front of each content line
pub fn resolve_line_emoji(text: &str) -> &'static str {
    resolve(text, LINE_GROUPS, LINE_DEFAULT)
}
