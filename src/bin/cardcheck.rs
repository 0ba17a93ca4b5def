//! CLI tool for payment card validation.
//!
//! # Usage
//!
//! ```bash
//! # Validate a card number, detecting its type
//! cardcheck validate 4242424242424242
//!
//! # Accept only some types
//! cardcheck validate 4242424242424242 --type mastercard --type visa
//!
//! # Extra rules and a BIN cache
//! cardcheck --rules rules.json --bins bins.json validate 1234567891234567
//!
//! # Validate a CVC
//! cardcheck cvc 1234 --type amex
//!
//! # Validate an expiry date
//! cardcheck date 2030 07
//! ```
//!
//! Exits 0 when the input is valid, 1 when it is not and 2 when the
//! configuration cannot be loaded. Set `RUST_LOG=cardcheck=debug` to see
//! why a number was rejected.

use cardcheck::{
    clean_number, expiry, luhn, CardValidator, MemoryBinCache, Registry, RuleConfig, TypeHint,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cardcheck")]
#[command(author, version, about = "Offline payment card validation tool")]
struct Cli {
    /// JSON file with extra card type rules
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// JSON file with BIN cache entries
    #[arg(long, global = true)]
    bins: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a card number
    Validate {
        /// Card number to validate (spaces and dashes allowed)
        card_number: String,

        /// Accepted card type; repeat to accept several
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Detect the card type of a number
    Detect {
        /// Card number (or partial number)
        card_number: String,
    },

    /// Check if a number passes the Luhn checksum
    Luhn {
        /// Card number to check
        card_number: String,
    },

    /// Validate a CVC/CVV
    Cvc {
        /// CVC to validate
        cvc: String,

        /// Card type the CVC belongs to
        #[arg(short = 't', long = "type")]
        card_type: String,
    },

    /// Validate an expiry date
    Date {
        /// Four-digit year (20YY)
        year: String,

        /// Month (1-12, optionally zero-padded)
        month: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let validator = match build_validator(cli.rules.as_ref(), cli.bins.as_ref()) {
        Ok(validator) => validator,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let valid = match cli.command {
        Commands::Validate {
            card_number,
            types,
            output,
        } => cmd_validate(&validator, &card_number, &types, output),
        Commands::Detect { card_number } => cmd_detect(&validator, &card_number),
        Commands::Luhn { card_number } => cmd_luhn(&card_number),
        Commands::Cvc { cvc, card_type } => cmd_cvc(&validator, &cvc, &card_type),
        Commands::Date { year, month } => cmd_date(&year, &month),
    };

    process::exit(if valid { 0 } else { 1 });
}

fn build_validator(
    rules: Option<&PathBuf>,
    bins: Option<&PathBuf>,
) -> Result<CardValidator, Box<dyn std::error::Error>> {
    let mut validator = CardValidator::new();

    if let Some(path) = rules {
        let configs = RuleConfig::from_json_file(path)?;
        let registry = Registry::builder().with_configs(&configs)?.build();
        validator = validator.with_registry(registry);
    }

    if let Some(path) = bins {
        validator = validator.with_cache(MemoryBinCache::from_json_file(path)?);
    }

    Ok(validator)
}

fn cmd_validate(
    validator: &CardValidator,
    card_number: &str,
    types: &[String],
    output: OutputFormat,
) -> bool {
    let checked = validator.check_card(card_number, TypeHint::from(types));

    match output {
        OutputFormat::Text => match &checked {
            Ok(result) => {
                println!("Valid: yes");
                println!("Type: {}", result.card_type);
                println!("Masked: {}", result.masked());
            }
            Err(e) => {
                println!("Valid: no");
                println!("Error: {}", e);
            }
        },
        OutputFormat::Json => {
            let json = match &checked {
                Ok(result) => serde_json::to_string_pretty(result),
                Err(e) => serde_json::to_string_pretty(&serde_json::json!({
                    "valid": false,
                    "number": "",
                    "type": "",
                    "error": e.to_string(),
                })),
            };
            match json {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Error: {}", e),
            }
        }
    }

    checked.is_ok()
}

fn cmd_detect(validator: &CardValidator, card_number: &str) -> bool {
    match validator.detect_type(card_number) {
        Some(card_type) => {
            println!("Detected Type: {}", card_type);
            if let Some(rule) = validator.registry().get(&card_type) {
                println!("Valid Lengths: {:?}", rule.lengths());
                println!("CVC Lengths: {:?}", rule.cvc_lengths());
                println!("Luhn: {}", if rule.requires_luhn() { "yes" } else { "no" });
            }
            true
        }
        None => {
            println!("Detected Type: Unknown");
            false
        }
    }
}

fn cmd_luhn(card_number: &str) -> bool {
    let passed = luhn::is_valid(&clean_number(card_number));
    println!("Luhn check: {}", if passed { "PASS" } else { "FAIL" });
    passed
}

fn cmd_cvc(validator: &CardValidator, cvc: &str, card_type: &str) -> bool {
    match validator.check_cvc(cvc, card_type) {
        Ok(()) => {
            println!("Valid: yes");
            println!("Length: {} digits", cvc.len());
            true
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            false
        }
    }
}

fn cmd_date(year: &str, month: &str) -> bool {
    match expiry::check_date(year, month) {
        Ok(()) => {
            println!("Valid: yes");
            true
        }
        Err(e) => {
            println!("Valid: no");
            println!("Error: {}", e);
            false
        }
    }
}
