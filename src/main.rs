// Operator CLI for the visa document intake pipeline

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::Deserialize;
use visa_intake::{
    models::{Document, ParsedFields, RequiredDocumentCatalog, VisaApplication, VisaType},
    processing::{FlightTicketParser, PassportParser, TaxIdParser},
    validation::ApprovalScorer,
    IntakeConfig, IntakeError,
};

#[derive(Parser, Debug)]
#[command(
    name = "visa-intake",
    about = "Extract fields from visa documents and score application readiness",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse already-recognised document text into structured fields
    Parse {
        #[arg(long, value_enum)]
        kind: DocumentKind,
        text_file: PathBuf,
    },
    /// Run OCR on a document image and parse the result
    Extract {
        #[arg(long, value_enum)]
        kind: DocumentKind,
        image: PathBuf,
    },
    /// Score an application snapshot of the form {"application": ..., "documents": [...]}
    Score { snapshot: PathBuf },
    /// Print the required-document checklist for a visa type
    Checklist {
        #[arg(long, value_enum, default_value = "uae")]
        visa_type: VisaType,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DocumentKind {
    Passport,
    TaxId,
    FlightTicket,
}

impl DocumentKind {
    fn parse(self, text: &str) -> ParsedFields {
        match self {
            DocumentKind::Passport => PassportParser::parse(text).into(),
            DocumentKind::TaxId => TaxIdParser::parse(text).into(),
            DocumentKind::FlightTicket => FlightTicketParser::parse(text).into(),
        }
    }
}

#[derive(Deserialize)]
struct ScoreSnapshot {
    application: VisaApplication,
    #[serde(default)]
    documents: Vec<Document>,
}

#[cfg(feature = "tesseract")]
async fn extract(
    kind: DocumentKind,
    image: PathBuf,
    config: IntakeConfig,
) -> Result<ParsedFields, IntakeError> {
    use std::sync::Arc;
    use visa_intake::{processing::TesseractExtractor, InMemoryRecordStore, IntakePipeline};

    let extractor = Arc::new(TesseractExtractor::from_config(&config));
    let pipeline = IntakePipeline::new(Arc::new(InMemoryRecordStore::new()), extractor, config);
    let bytes = fs::read(&image)?;
    info!("Running OCR on {}", image.display());

    Ok(match kind {
        DocumentKind::Passport => pipeline.extract_passport_data(&bytes).await?.into(),
        DocumentKind::TaxId => pipeline.extract_tax_id_data(&bytes).await?.into(),
        DocumentKind::FlightTicket => pipeline.extract_flight_ticket_data(&bytes).await?.into(),
    })
}

#[cfg(not(feature = "tesseract"))]
async fn extract(
    _kind: DocumentKind,
    image: PathBuf,
    _config: IntakeConfig,
) -> Result<ParsedFields, IntakeError> {
    Err(IntakeError::ExtractionFailed(format!(
        "cannot OCR {}: built without the `tesseract` feature",
        image.display()
    )))
}

#[tokio::main]
async fn main() -> Result<(), IntakeError> {
    let config = IntakeConfig::load()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let cli = Cli::parse();
    let output = match cli.command {
        Command::Parse { kind, text_file } => {
            let text = fs::read_to_string(&text_file)?;
            info!("Parsing {} as {:?}", text_file.display(), kind);
            serde_json::to_string_pretty(&kind.parse(&text))?
        }
        Command::Extract { kind, image } => {
            serde_json::to_string_pretty(&extract(kind, image, config).await?)?
        }
        Command::Score { snapshot } => {
            let snapshot: ScoreSnapshot = serde_json::from_str(&fs::read_to_string(&snapshot)?)?;
            let checklist = RequiredDocumentCatalog::for_visa_type(snapshot.application.visa_type);
            let score =
                ApprovalScorer::score(&snapshot.documents, checklist, Some(&snapshot.application));
            serde_json::to_string_pretty(&score)?
        }
        Command::Checklist { visa_type } => {
            serde_json::to_string_pretty(RequiredDocumentCatalog::for_visa_type(visa_type))?
        }
    };

    println!("{}", output);
    Ok(())
}
