use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::extractors::{
    contains_any, first_match_by_tier, first_numeric_date, normalize_lines, trailing_segment,
    ExtractionRule,
};
use crate::models::PassportFields;

lazy_static! {
    static ref STRICT_NUMBER: Regex = Regex::new(r"\b([A-Z][0-9]{7})\b").unwrap();
    static ref LOOSE_NUMBER: Regex = Regex::new(r"([A-Z][0-9]{7,8})").unwrap();
    static ref PASSPORT_NO_MARKER: Regex =
        Regex::new(r"(?i:passport\s+no)\.?\s*([A-Z][0-9]{7,8})").unwrap();
    static ref NO_MARKER: Regex = Regex::new(r"(?i:no)\.?\s*([A-Z][0-9]{7,8})").unwrap();
    static ref DOCUMENT_NO_MARKER: Regex =
        Regex::new(r"(?i:document\s+no)\.?\s*([A-Z][0-9]{7,8})").unwrap();

    /// Passport number tiers in fallback order.
    static ref PASSPORT_NUMBER_RULES: Vec<ExtractionRule> = vec![
        ExtractionRule::new("strict", &STRICT_NUMBER, 1),
        ExtractionRule::new("loose", &LOOSE_NUMBER, 1),
        ExtractionRule::new("passport-no-marker", &PASSPORT_NO_MARKER, 1),
        ExtractionRule::new("no-marker", &NO_MARKER, 1),
        ExtractionRule::new("document-no-marker", &DOCUMENT_NO_MARKER, 1),
    ];
}

const NAME_KEYWORDS: [&str; 3] = ["surname", "given name", "name"];
const NATIONALITY_KEYWORDS: [&str; 2] = ["nationality", "nation"];
const BIRTH_KEYWORDS: [&str; 2] = ["birth", "dob"];
const EXPIRY_KEYWORDS: [&str; 3] = ["expiry", "expiration", "exp"];
const ISSUE_KEYWORDS: [&str; 2] = ["issue", "issued"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassportDate {
    Birth,
    Expiry,
    Issue,
}

impl PassportDate {
    /// Keyword priority: birth, then expiry, then issue.
    fn classify(lowercase_line: &str) -> Option<Self> {
        if contains_any(lowercase_line, &BIRTH_KEYWORDS) {
            Some(PassportDate::Birth)
        } else if contains_any(lowercase_line, &EXPIRY_KEYWORDS) {
            Some(PassportDate::Expiry)
        } else if contains_any(lowercase_line, &ISSUE_KEYWORDS) {
            Some(PassportDate::Issue)
        } else {
            None
        }
    }

    fn slot(self, fields: &mut PassportFields) -> &mut Option<String> {
        match self {
            PassportDate::Birth => &mut fields.date_of_birth,
            PassportDate::Expiry => &mut fields.date_of_expiry,
            PassportDate::Issue => &mut fields.date_of_issue,
        }
    }
}

/// Line-oriented parser for OCR text of a passport bio page.
pub struct PassportParser;

impl PassportParser {
    pub fn parse(text: &str) -> PassportFields {
        let lines = normalize_lines(text);
        let mut fields = PassportFields::default();

        if let Some((rule, number)) = first_match_by_tier(&PASSPORT_NUMBER_RULES, &lines) {
            debug!("Passport number {} matched rule '{}'", number, rule.name);
            fields.passport_number = Some(number.clone());
            fields.document_number = Some(number);
        }

        for line in &lines {
            let lowercase = line.to_lowercase();

            if fields.full_name.is_none() && contains_any(&lowercase, &NAME_KEYWORDS) {
                fields.full_name = trailing_segment(line);
            }

            if let Some(date) = first_numeric_date(line) {
                if let Some(kind) = PassportDate::classify(&lowercase) {
                    let slot = kind.slot(&mut fields);
                    if slot.is_none() {
                        *slot = Some(date);
                    }
                }
            }

            if fields.nationality.is_none() && contains_any(&lowercase, &NATIONALITY_KEYWORDS) {
                fields.nationality = trailing_segment(line);
            }
        }

        fields
    }
}
