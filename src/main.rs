use clap::{Arg, Command};
use log::LevelFilter;
use phisheye::config::RuleConfig;
use phisheye::email_analyzer::EmailAnalyzer;
use phisheye::report::{AnalysisResult, RiskLevel};
use phisheye::url_analyzer::UrlAnalyzer;
use std::io::Read;
use std::process;

fn main() {
    let matches = Command::new("phisheye")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Heuristic phishing and fraud risk scorer for emails and URLs")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Rule configuration file (YAML); defaults to the built-in tables"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the built-in rule tables to a YAML file and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .value_name("FILE")
                .help("Analyze raw email text from a file ('-' reads stdin)"),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Analyze a website URL (scheme optional)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the result as JSON")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-rule detail")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        match RuleConfig::default().to_file(path) {
            Ok(()) => {
                println!("Default rule configuration written to: {path}");
                return;
            }
            Err(e) => {
                eprintln!("Error writing configuration: {e}");
                process::exit(1);
            }
        }
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match RuleConfig::from_file(path) {
            Ok(config) => {
                log::info!("loaded rule configuration from {path}");
                config
            }
            Err(e) => {
                eprintln!("Error loading configuration from {path}: {e}");
                process::exit(1);
            }
        },
        None => RuleConfig::default(),
    };

    let as_json = matches.get_flag("json");

    let result = if let Some(source) = matches.get_one::<String>("email") {
        let content = match read_email_input(source) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading email input: {e}");
                process::exit(1);
            }
        };
        if content.trim().is_empty() {
            eprintln!("Error: email input is empty");
            process::exit(2);
        }
        match EmailAnalyzer::new(config) {
            Ok(analyzer) => analyzer.analyze(&content),
            Err(e) => {
                eprintln!("Error building email analyzer: {e}");
                process::exit(1);
            }
        }
    } else if let Some(input) = matches.get_one::<String>("url") {
        if input.trim().is_empty() {
            eprintln!("Error: URL input is empty");
            process::exit(2);
        }
        match UrlAnalyzer::new(config) {
            Ok(analyzer) => analyzer.analyze(input),
            Err(e) => {
                eprintln!("Error building URL analyzer: {e}");
                process::exit(1);
            }
        }
    } else {
        eprintln!("Nothing to do. Use --email FILE or --url URL (see --help).");
        process::exit(2);
    };

    print_result(&result, as_json);

    if result.level == RiskLevel::Danger {
        process::exit(1);
    }
}

fn read_email_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

fn print_result(result: &AnalysisResult, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing result: {e}");
                process::exit(1);
            }
        }
        return;
    }

    println!(
        "Risk score: {}/100 ({})",
        result.score,
        result.level.as_str().to_uppercase()
    );

    if let Some(info) = &result.domain_info {
        println!("Domain:     {}", info.domain);
        println!("Age:        {}", info.age);
        println!("Reputation: {}", info.reputation);
        println!("SSL:        {}", if info.ssl { "yes" } else { "no" });
    }

    if result.flags.is_empty() {
        println!("\nNo red flags detected.");
    } else {
        println!("\nRed flags ({}):", result.flags.len());
        for flag in &result.flags {
            println!("  [{:<6}] {}: {}", flag.severity.as_str(), flag.category, flag.description);
            if let Some(recommendation) = &flag.recommendation {
                println!("           -> {recommendation}");
            }
        }
    }

    println!("\n{}", result.analysis);
}
