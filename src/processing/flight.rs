use super::extractors::{contains_any, normalize_lines, ISO_DATE, NUMERIC_DATE};
use crate::models::FlightTicketFields;

const DEPARTURE_KEYWORDS: [&str; 3] = ["depart", "outbound", "onward"];
const RETURN_KEYWORDS: [&str; 2] = ["return", "inbound"];

fn first_date_token(line: &str) -> Option<String> {
    let iso = ISO_DATE.find(line);
    let numeric = NUMERIC_DATE.find(line);
    let earliest = match (iso, numeric) {
        (Some(a), Some(b)) => Some(if a.start() <= b.start() { a } else { b }),
        (a, b) => a.or(b),
    };
    earliest.map(|matched| matched.as_str().trim().to_string())
}

/// Reads travel dates off an itinerary or e-ticket.
pub struct FlightTicketParser;

impl FlightTicketParser {
    pub fn parse(text: &str) -> FlightTicketFields {
        let mut fields = FlightTicketFields::default();
        let mut unlabelled = Vec::new();

        for line in normalize_lines(text) {
            let Some(date) = first_date_token(line) else {
                continue;
            };
            let lowercase = line.to_lowercase();

            if contains_any(&lowercase, &DEPARTURE_KEYWORDS) {
                if fields.departure_date.is_none() {
                    fields.departure_date = Some(date);
                }
            } else if contains_any(&lowercase, &RETURN_KEYWORDS) {
                if fields.return_date.is_none() {
                    fields.return_date = Some(date);
                }
            } else {
                unlabelled.push(date);
            }
        }

        // Legs without a keyword are taken in reading order.
        let mut remaining = unlabelled.into_iter();
        if fields.departure_date.is_none() {
            fields.departure_date = remaining.next();
        }
        if fields.return_date.is_none() {
            fields.return_date = remaining.next();
        }

        fields
    }
}
