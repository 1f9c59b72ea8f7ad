use lazy_static::lazy_static;
use regex::Regex;

use super::extractors::ExtractionRule;
use crate::models::TaxIdFields;

lazy_static! {
    static ref TAX_ID: Regex = Regex::new(r"([A-Z]{5}[0-9]{4}[A-Z])").unwrap();
    static ref HOLDER_NAME: Regex =
        Regex::new(r"(?i)name[ \t]*[: \t][ \t]*([A-Za-z][A-Za-z \t]*)").unwrap();
    static ref DATE_OF_BIRTH: Regex =
        Regex::new(r"(?i)DOB[ \t]*[: \t][ \t]*(\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4})").unwrap();

    static ref TAX_ID_RULE: ExtractionRule = ExtractionRule::new("tax-id", &TAX_ID, 1);
    static ref NAME_RULE: ExtractionRule = ExtractionRule::new("holder-name", &HOLDER_NAME, 1);
    static ref DOB_RULE: ExtractionRule = ExtractionRule::new("dob", &DATE_OF_BIRTH, 1);
}

/// Single-pattern parser for national tax-ID (PAN) cards.
pub struct TaxIdParser;

impl TaxIdParser {
    pub fn parse(text: &str) -> TaxIdFields {
        TaxIdFields {
            tax_id: TAX_ID_RULE.apply(text),
            full_name: NAME_RULE.apply(text),
            date_of_birth: DOB_RULE.apply(text),
        }
    }
}
