use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;
use phish_scorer::report::render_text;
use phish_scorer::{Config, ParsedMessage, RiskAggregator};
use std::collections::HashMap;
use std::io::Read;
use std::process;

const DEMO_MESSAGE: &str = "
    URGENT: Fiverr Payment Issue Detected!

    Dear Seller,

    We have detected an issue with your recent payment. To prevent any delays, please verify your account immediately
    by clicking here: http://fiverr-secure-payments.tk/verify

    Additionally, you can expedite the process by contacting our support team on WhatsApp: +1234567890
    or make a direct payment through our secure Bitcoin wallet: 1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa

    If you don't confirm within 24 hours, your pending payments will be cancelled.

    Best regards,
    Fiverr Support Team
    ";

const DEMO_HEADERS: [(&str, &str); 3] = [
    ("from", "fiverr-support-team@fiverr-secure-payments.tk"),
    ("reply-to", "support-team@payment-verify.ml"),
    ("subject", "Urgent: Fiverr Payment Verification Required"),
];

fn build_cli() -> Command {
    Command::new("phish-scorer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing risk scoring for messages and mail headers")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Rule table configuration file (built-in tables when absent)"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the built-in rule tables to a configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the configuration and compile all sender patterns")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("message")
                .long("message")
                .value_name("FILE")
                .help("Analyze a plain text message")
                .conflicts_with_all(["email", "demo"])
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("FILE")
                .help("Analyze a raw email, headers included")
                .conflicts_with("demo")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("header")
                .short('H')
                .long("header")
                .value_name("NAME: VALUE")
                .help("Add a header to the analysis (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Analyze a built-in marketplace payment scam sample")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging of every matched rule")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config = match load_config(matches.get_one::<String>("config")) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            process::exit(1);
        }
    };

    let aggregator = match RiskAggregator::from_config(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("Keyword rules: {}", config.keywords.len());
        println!("Suspicious TLDs: {}", config.suspicious_tlds.len());
        println!("Sender patterns: {}", config.sender_patterns.len());
        println!("All regex patterns compiled successfully.");
        return;
    }

    let (text, headers) = match read_input(&matches) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading message: {e:#}");
            process::exit(1);
        }
    };

    let report = aggregator.analyze(&text, headers.as_ref());

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                process::exit(1);
            }
        },
        _ => print!("{}", render_text(&report)),
    }
}

fn load_config(path: Option<&String>) -> anyhow::Result<Config> {
    match path {
        Some(path) if std::path::Path::new(path).exists() => Config::from_file(path),
        Some(path) => {
            log::warn!("Configuration file '{path}' not found, using built-in rule tables");
            Ok(Config::default())
        }
        None => Ok(Config::default()),
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the rule tables to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

/// Message text plus headers from the chosen source, with `--header`
/// values layered on top.
fn read_input(
    matches: &clap::ArgMatches,
) -> anyhow::Result<(String, Option<HashMap<String, String>>)> {
    let (text, mut headers) = if matches.get_flag("demo") {
        let headers: HashMap<String, String> = DEMO_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        (DEMO_MESSAGE.to_string(), headers)
    } else if let Some(path) = matches.get_one::<String>("email") {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read email file '{path}'"))?;
        let parsed = ParsedMessage::parse(&raw);
        (parsed.body, parsed.headers)
    } else if let Some(path) = matches.get_one::<String>("message") {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message file '{path}'"))?;
        (text, HashMap::new())
    } else {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read message from stdin")?;
        (text, HashMap::new())
    };

    apply_header_args(
        &mut headers,
        matches.get_many::<String>("header").into_iter().flatten(),
    )?;

    log::debug!("Read {} bytes of text and {} headers", text.len(), headers.len());

    let headers = if headers.is_empty() { None } else { Some(headers) };
    Ok((text, headers))
}

/// Layers `Name: value` arguments over `headers`; a later value for the
/// same name replaces the earlier one.
fn apply_header_args<'a>(
    headers: &mut HashMap<String, String>,
    args: impl IntoIterator<Item = &'a String>,
) -> anyhow::Result<()> {
    for arg in args {
        match ParsedMessage::parse_header_arg(arg) {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => anyhow::bail!("Invalid header '{arg}', expected 'Name: value'"),
        }
    }
    Ok(())
}
