//! MedRush command-line demo
//!
//! Runs the reference scenarios, renders a schedule from a JSON file, or
//! scans a real prescription photo through the configured extraction
//! provider.
//!
//! Usage:
//!   cargo run -p medrush-demo -- run-all
//!   cargo run -p medrush-demo -- call
//!   cargo run -p medrush-demo -- classify meds.json --language te
//!   cargo run -p medrush-demo -- --config medrush.toml scan photo.jpg

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use medrush_config::{AppConfig, LocaleCatalog};
use medrush_contracts::{
    error::{MedRushError, MedRushResult},
    medicine::{Language, MedicineRecord},
    role::Role,
};
use medrush_core::{
    classifier::classify,
    render::{render_schedule, sections_to_text},
    LoginDetails, ScanOutcome, Session,
};
use medrush_ref::{
    adapters::{ConsoleVoice, DummyOtpIdentity, GeminiExtractionProvider},
    scenarios::{self, call_reminder, caretaker, nurse, patient_scan},
};
use medrush_store::InMemoryStore;
use medrush_verify::ExtractionSchemaVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// MedRush: prescription photos turned into a spoken daily schedule.
#[derive(Parser)]
#[command(
    name = "medrush",
    about = "MedRush medication schedule demo",
    long_about = "Runs MedRush scenarios showing prescription extraction, time-of-day\n\
                  scheduling, caretaker and nurse rosters, and the simulated reminder call."
)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: patient login, scan, schedule, save.
    PatientScan,
    /// Scenario 2: caretaker roster, dose marking, reminder call request.
    Caretaker,
    /// Scenario 3: nurse ward admissions, no-caretaker alert, discharge.
    Nurse,
    /// Scenario 4: simulated incoming reminder call.
    Call,
    /// Render the schedule for a JSON array of medicine records.
    Classify {
        file: PathBuf,
        /// Language for headings and badges (en, te, hi).
        #[arg(long)]
        language: Option<Language>,
    },
    /// Scan a prescription photo with the configured extraction provider.
    Scan {
        image: PathBuf,
        /// Language of the summary (en, te, hi).
        #[arg(long)]
        language: Option<Language>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| run(cli.command, config));

    if let Err(e) = result {
        eprintln!("medrush error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> MedRushResult<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path),
        None => Ok(AppConfig::default()),
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run(command: Command, mut config: AppConfig) -> MedRushResult<()> {
    match command {
        Command::RunAll => {
            print_banner();
            scenarios::run_all(&config)?;
            println!("All scenarios completed successfully.");
        }
        Command::PatientScan => patient_scan::run_scenario(&config)?,
        Command::Caretaker => caretaker::run_scenario(&config)?,
        Command::Nurse => nurse::run_scenario(&config)?,
        Command::Call => call_reminder::run_scenario(&config)?,
        Command::Classify { file, language } => {
            if let Some(language) = language {
                config.language = language;
            }
            print!("{}", classify_file(&file, &config)?);
        }
        Command::Scan { image, language } => {
            if let Some(language) = language {
                config.language = language;
            }
            scan_image(&image, &config)?;
        }
    }
    Ok(())
}

/// Rendered schedule text for a JSON file of medicine records.
fn classify_file(path: &Path, config: &AppConfig) -> MedRushResult<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| invalid_input(path, e))?;
    classify_json(&contents, &path.display().to_string(), config)
}

fn classify_json(contents: &str, source: &str, config: &AppConfig) -> MedRushResult<String> {
    let records: Vec<MedicineRecord> =
        serde_json::from_str(contents).map_err(|e| MedRushError::InvalidInput {
            path: source.to_string(),
            reason: format!("expected a JSON array of medicine records: {e}"),
        })?;
    debug!(records = records.len(), language = %config.language, "classifying");

    let catalog = LocaleCatalog::load(config)?;
    let sections = render_schedule(&classify(&records), catalog.table(config.language));
    Ok(sections_to_text(&sections))
}

fn scan_image(path: &Path, config: &AppConfig) -> MedRushResult<()> {
    let image = std::fs::read(path).map_err(|e| invalid_input(path, e))?;
    let provider = GeminiExtractionProvider::from_settings(&config.extraction)?;
    let verifier = ExtractionSchemaVerifier::new();
    let catalog = LocaleCatalog::load(config)?;
    let store = InMemoryStore::new();
    let identity = DummyOtpIdentity::new(config.auth.dummy_otp.clone());

    let mut session = Session::new(config.call.timings());
    session.set_language(config.language);
    let challenge = session.request_otp(&identity, "0000000000")?;
    session.login(
        &identity,
        &store,
        &challenge,
        &config.auth.dummy_otp,
        LoginDetails::new("CLI User", Role::Patient),
    )?;

    println!("Analyzing {} with {} ...", path.display(), config.extraction.model);
    if let ScanOutcome::Applied { count } = session.scan(&provider, &verifier, image)? {
        println!("{count} medicine(s) found.");
    }
    println!();
    print!("{}", sections_to_text(&session.render(catalog.table(session.language()))));
    println!("{}", session.summary());
    session.read_aloud(&ConsoleVoice::new(config.voice.rate));
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn invalid_input(path: &Path, err: std::io::Error) -> MedRushError {
    MedRushError::InvalidInput {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn print_banner() {
    println!();
    println!("MedRush: Medication Schedule Assistant");
    println!("Reference Demo");
    println!("======================================");
    println!();
    println!("Flow per scan:");
    println!("  [1] Phone OTP login gates every action");
    println!("  [2] Prescription photo -> extraction provider -> schema verifier");
    println!("  [3] Medicines sorted into morning / afternoon / evening / other");
    println!("  [4] Summary read aloud; a simulated reminder call rings");
    println!("  [5] Caretakers and nurses track doses on their rosters");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_renders_headings_and_counts() {
        let json = r#"[
            {"name": "Metformin", "dosage": "500mg", "frequency": "Daily", "time": "After Breakfast"},
            {"name": "Amoxicillin", "dosage": "250mg", "frequency": "Daily", "time": "2pm"},
            {"name": "ORS", "dosage": "1", "frequency": "As needed", "time": ""}
        ]"#;
        let text = classify_json(json, "meds.json", &AppConfig::default()).unwrap();

        assert!(text.contains("Metformin"));
        assert!(text.contains("(1 Items)"));
        assert!(text.contains("No medicines scheduled for afternoon"));
    }

    #[test]
    fn classify_rejects_non_array_input() {
        let err = classify_json(r#"{"medicines": []}"#, "meds.json", &AppConfig::default()).unwrap_err();
        assert!(matches!(err, MedRushError::InvalidInput { ref path, .. } if path == "meds.json"));
    }

    #[test]
    fn missing_input_files_are_input_errors() {
        let config = AppConfig::default();
        let missing = Path::new("does-not-exist/meds.json");

        let err = classify_file(missing, &config).unwrap_err();
        assert!(matches!(err, MedRushError::InvalidInput { .. }));
        assert!(err.to_string().starts_with("invalid input 'does-not-exist/meds.json'"));

        let err = scan_image(Path::new("does-not-exist/rx.jpg"), &config).unwrap_err();
        assert!(matches!(err, MedRushError::InvalidInput { .. }));
    }

    #[test]
    fn language_flag_parses_codes_and_names() {
        let cli = Cli::try_parse_from(["medrush", "classify", "m.json", "--language", "telugu"]).unwrap();
        match cli.command {
            Command::Classify { language, .. } => assert_eq!(language, Some(Language::Telugu)),
            _ => panic!("expected classify"),
        }
        assert!(Cli::try_parse_from(["medrush", "classify", "m.json", "--language", "fr"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["medrush", "call", "--config", "medrush.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("medrush.toml")));
    }
}
