//! Change records parsed from merged commit summaries.
use log::*;
use regex::Regex;
use std::sync::LazyLock;

static CHANGE_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(#(?<number>\d+)\)\s*$").unwrap()
});

/// A single merged change as one line of text ending in `(#<number>)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Full summary line as it appears in the release body
    pub raw_text: String,
    /// Change identifier including the leading `#`
    pub id: String,
    /// Numeric part of the identifier, used for forge lookups
    pub number: u64,
}

impl ChangeRecord {
    /// Parses a summary line. Lines without a trailing change identifier are
    /// not merged changes and yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let captures = CHANGE_ID_REGEX.captures(line)?;
        let number = captures["number"].parse::<u64>().ok()?;

        Some(Self {
            raw_text: line.to_string(),
            id: format!("#{number}"),
            number,
        })
    }

    /// Summary text with any leading list bullet removed.
    pub fn summary(&self) -> &str {
        self.raw_text
            .strip_prefix("* ")
            .or_else(|| self.raw_text.strip_prefix("- "))
            .unwrap_or(&self.raw_text)
    }
}

/// Parses an ordered sequence of lines, keeping order and dropping lines that
/// carry no change identifier.
pub fn parse_changes<I, S>(lines: I) -> Vec<ChangeRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref();
            let parsed = ChangeRecord::parse(line);
            if parsed.is_none() {
                debug!("skipping line without change id: {line}");
            }
            parsed
        })
        .collect()
}

/// Drops changes whose summary starts with any of the excluded prefixes.
pub fn filter_excluded(
    changes: Vec<ChangeRecord>,
    excluded_prefixes: &[String],
) -> Vec<ChangeRecord> {
    changes
        .into_iter()
        .filter(|change| {
            let excluded = excluded_prefixes
                .iter()
                .any(|prefix| change.summary().starts_with(prefix.as_str()));
            if excluded {
                debug!("excluding change {}: {}", change.id, change.raw_text);
            }
            !excluded
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trailing_change_id() {
        let change = ChangeRecord::parse("Fix block import (#4521)").unwrap();
        assert_eq!(change.id, "#4521");
        assert_eq!(change.number, 4521);
        assert_eq!(change.raw_text, "Fix block import (#4521)");
    }

    #[test]
    fn ignores_ids_not_at_end_of_line() {
        assert!(ChangeRecord::parse("Revert (#12) partially").is_none());
        assert!(ChangeRecord::parse("Merge branch 'master'").is_none());
    }

    #[test]
    fn parse_changes_preserves_order() {
        let changes = parse_changes([
            "Third (#3)",
            "no id here",
            "First (#1)",
            "Second (#2)",
        ]);

        let ids: Vec<&str> = changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["#3", "#1", "#2"]);
    }

    #[test]
    fn filter_excluded_drops_both_prefix_styles() {
        let changes = parse_changes([
            "[contracts] Bump weights (#10)",
            "* contracts: new host fn (#11)",
            "Update runtime (#12)",
            "Mention of contracts: elsewhere (#13)",
        ]);
        let prefixes =
            vec!["[contracts]".to_string(), "contracts:".to_string()];

        let kept = filter_excluded(changes, &prefixes);

        let ids: Vec<&str> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["#12", "#13"]);
    }

    #[test]
    fn filter_excluded_with_no_prefixes_keeps_everything() {
        let changes = parse_changes(["a (#1)", "b (#2)"]);
        assert_eq!(filter_excluded(changes, &[]).len(), 2);
    }
}
