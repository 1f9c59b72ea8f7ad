pub mod error;

pub use error::IntakeError;
