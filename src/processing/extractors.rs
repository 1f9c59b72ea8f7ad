// Ordered, named extraction rules shared by the per-document parsers.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Numeric date token: D{1,2} sep D{1,2} sep D{2,4}, separators `.`, `-`, `/`.
    pub(crate) static ref NUMERIC_DATE: Regex =
        Regex::new(r"\d{1,2}\s*[./-]\s*\d{1,2}\s*[./-]\s*\d{2,4}").unwrap();
    /// ISO calendar date token.
    pub(crate) static ref ISO_DATE: Regex = Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap();
    static ref SEGMENT_DELIMITER: Regex = Regex::new(r"[:<]").unwrap();
}

/// A single pattern tried against text; the value is capture group `group`.
pub struct ExtractionRule {
    pub name: &'static str,
    pattern: &'static Regex,
    group: usize,
}

impl ExtractionRule {
    pub const fn new(name: &'static str, pattern: &'static Regex, group: usize) -> Self {
        ExtractionRule {
            name,
            pattern,
            group,
        }
    }

    pub fn apply(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|captures| captures.get(self.group))
            .map(|matched| matched.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Rule-major search: every line is tried with the first rule before the next rule is
/// consulted, so an earlier tier always beats a later one.
pub fn first_match_by_tier<'r>(
    rules: &'r [ExtractionRule],
    lines: &[&str],
) -> Option<(&'r ExtractionRule, String)> {
    rules.iter().find_map(|rule| {
        lines
            .iter()
            .find_map(|line| rule.apply(line))
            .map(|value| (rule, value))
    })
}

/// Text after the last `:` or `<` delimiter, trimmed. `None` without a delimiter or
/// when nothing follows it.
pub fn trailing_segment(line: &str) -> Option<String> {
    if !SEGMENT_DELIMITER.is_match(line) {
        return None;
    }
    let value = SEGMENT_DELIMITER.split(line).last()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Case-insensitive keyword check against an already lowercased line.
pub fn contains_any(lowercase_line: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowercase_line.contains(keyword))
}

pub fn first_numeric_date(line: &str) -> Option<String> {
    NUMERIC_DATE
        .find(line)
        .map(|matched| matched.as_str().trim().to_string())
}

pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    lazy_static! {
        static ref FIRST: Regex = Regex::new(r"A(\d)").unwrap();
        static ref SECOND: Regex = Regex::new(r"B(\d)").unwrap();
    }

    #[test]
    fn earlier_tier_wins_even_on_later_line() {
        let rules = [
            ExtractionRule::new("first", &FIRST, 1),
            ExtractionRule::new("second", &SECOND, 1),
        ];
        let lines = ["B1", "A2"];

        let (rule, value) = first_match_by_tier(&rules, &lines).expect("a rule matches");

        assert_eq!(rule.name, "first");
        assert_eq!(value, "2");
    }

    #[test]
    fn trailing_segment_uses_last_delimiter() {
        assert_eq!(
            trailing_segment("Surname / Nom: DOE<JANE").as_deref(),
            Some("JANE")
        );
        assert_eq!(trailing_segment("Name:   "), None);
        assert_eq!(trailing_segment("Name Jane"), None);
    }

    #[test]
    fn numeric_date_allows_spaced_separators() {
        assert_eq!(
            first_numeric_date("Date of Birth 12 / 05 / 1990").as_deref(),
            Some("12 / 05 / 1990")
        );
        assert_eq!(first_numeric_date("no date here"), None);
    }
}
