pub mod dates;
pub mod scoring;

pub use dates::{parse_document_date, DateCheck, DateConsistencyChecker};
pub use scoring::{ApprovalScore, ApprovalScorer, ApprovalTier};
