//! Grouping of raw todo/notification text into display rows.

use serde::{Deserialize, Serialize};

/// Prefix the mail fetcher puts in front of every email notification line.
const EMAIL_MARKER: &str = "📧";

/// Kind of a notification row, used only for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Email,
    Task,
}

/// One line of bubble content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRow {
    pub kind: RowKind,
    pub text: String,
}

/// Splits content into non-empty rows.
///
/// Lines are trimmed; blank lines are dropped. A line starting with the email
/// marker becomes an [`RowKind::Email`] row with the marker removed, anything
/// else is a [`RowKind::Task`].
///
/// # Examples
///
/// ```
/// use ping_pet::content::{parse_rows, RowKind};
///
/// let rows = parse_rows("📧 alice: lunch?\n\n  water plants  \n");
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].kind, RowKind::Email);
/// assert_eq!(rows[0].text, "alice: lunch?");
/// assert_eq!(rows[1].text, "water plants");
/// ```
#[must_use]
pub fn parse_rows(content: &str) -> Vec<NotificationRow> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix(EMAIL_MARKER).map_or_else(
                || NotificationRow {
                    kind: RowKind::Task,
                    text: line.to_string(),
                },
                |rest| NotificationRow {
                    kind: RowKind::Email,
                    text: rest.trim_start().to_string(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_has_no_rows() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n   \n\t\n").is_empty());
    }

    #[test]
    fn mixed_content_keeps_order() {
        let rows = parse_rows("buy milk\n📧 bob@example.com: invoice\n📧no-space");
        let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RowKind::Task, RowKind::Email, RowKind::Email]);
        assert_eq!(rows[1].text, "bob@example.com: invoice");
        assert_eq!(rows[2].text, "no-space");
    }

    #[test]
    fn marker_in_middle_is_a_task() {
        let rows = parse_rows("reply to 📧 later");
        assert_eq!(rows[0].kind, RowKind::Task);
        assert_eq!(rows[0].text, "reply to 📧 later");
    }
}
