use log::debug;

use crate::models::{ApplicationExtractedData, FieldName, FieldSource, ParsedFields};

/// FieldMerge folds a freshly parsed document into the application-wide record.
///
/// Each merged field remembers which document kind wrote it. An incoming value replaces
/// an existing one only when its source is at least as authoritative as the recorded
/// source, so a passport re-scan refreshes passport fields while a tax-ID card can only
/// fill gaps. Empty incoming values never overwrite anything.
pub struct FieldMerge;

impl FieldMerge {
    /// Precedence assumed for values that predate provenance tracking.
    const UNKNOWN_SOURCE: FieldSource = FieldSource::Passport;

    pub fn merge(
        existing: &ApplicationExtractedData,
        incoming: &ParsedFields,
    ) -> ApplicationExtractedData {
        let mut merged = existing.clone();
        let source = incoming.source();

        for (field, value) in incoming.entries() {
            let value = value.trim();
            let accept = match merged.fields.get(field) {
                None => true,
                Some(current) if current == value => false,
                // Only a tax-ID card carries a tax ID, so its reading always wins
                Some(_) if field == FieldName::TaxId && source == FieldSource::TaxIdCard => true,
                Some(current) => {
                    let holder = merged
                        .provenance
                        .get(&field)
                        .copied()
                        .unwrap_or(Self::UNKNOWN_SOURCE);
                    if source >= holder {
                        debug!(
                            "{:?}: {:?} replaces {:?} value '{}' with '{}'",
                            field, source, holder, current, value
                        );
                        true
                    } else {
                        debug!(
                            "{:?}: kept {:?} value '{}' over {:?} value '{}'",
                            field, holder, current, source, value
                        );
                        false
                    }
                }
            };

            if accept {
                merged.fields.set(field, value.to_string());
                merged.provenance.insert(field, source);
            }
        }

        merged
    }
}
