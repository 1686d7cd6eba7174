use clap::{Arg, Command};
use inquiry_triage::analyzer::InquiryAnalyzer;
use inquiry_triage::config::EngineConfig;
use inquiry_triage::message::{InquiryMessage, ScoreBreakdown};
use inquiry_triage::pool::AnalyzerPool;
use inquiry_triage::reply::ReplyEngine;
use log::LevelFilter;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("inquiry-triage")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rule-based triage and scoring for inbound trade inquiry mail")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Engine configuration file path")
                .default_value("config/engine.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default engine configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-message")
                .long("test-message")
                .value_name("FILE")
                .help("Score a single message from a JSON file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .value_name("FILE")
                .help("Score a JSON array of messages through the worker pool")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("draft-reply")
                .long("draft-reply")
                .help("Also print a reply draft for messages that are not spam")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Score a built-in set of sample messages")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
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
        generate_default_config(path);
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = match EngineConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration {config_path}: {e}");
            process::exit(1);
        }
    };

    let analyzer = Arc::new(InquiryAnalyzer::from_files(
        &config.keywords_path,
        &config.jargon_path,
    ));
    let pool = AnalyzerPool::new(analyzer, config.pool_capacity);
    let reply_engine = ReplyEngine::from_config(&config.reply);
    if reply_engine.is_template_only() {
        log::info!("reply drafting runs in template-only mode");
    }
    let draft_replies = matches.get_flag("draft-reply");

    if let Some(path) = matches.get_one::<String>("test-message") {
        let message: InquiryMessage = match read_json(path) {
            Ok(message) => message,
            Err(e) => {
                eprintln!("Error reading message file {path}: {e}");
                process::exit(1);
            }
        };
        score_and_print(&pool, &reply_engine, vec![message], draft_replies).await;
        return;
    }

    if let Some(path) = matches.get_one::<String>("batch") {
        let messages: Vec<InquiryMessage> = match read_json(path) {
            Ok(messages) => messages,
            Err(e) => {
                eprintln!("Error reading batch file {path}: {e}");
                process::exit(1);
            }
        };
        score_and_print(&pool, &reply_engine, messages, draft_replies).await;
        return;
    }

    if matches.get_flag("demo") {
        score_and_print(&pool, &reply_engine, demo_messages(), draft_replies).await;
        return;
    }

    eprintln!("Nothing to do: pass --test-message, --batch, or --demo (see --help)");
    process::exit(2);
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

async fn score_and_print(
    pool: &AnalyzerPool,
    reply_engine: &ReplyEngine,
    messages: Vec<InquiryMessage>,
    draft_replies: bool,
) {
    let count = messages.len();
    log::info!("scoring {count} message(s)");

    let results = match pool.score_batch(messages.clone()).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Batch scoring failed: {e}");
            process::exit(1);
        }
    };

    for (message, breakdown) in messages.iter().zip(&results) {
        print_breakdown(message, breakdown);
        if draft_replies && !breakdown.is_spam && breakdown.total > 0.0 {
            let draft = reply_engine.draft(message).await;
            println!("  suggested reply subject: {}", draft.subject);
            println!("  suggested reply:");
            for line in draft.body.lines() {
                println!("    {line}");
            }
        }
        println!();
    }
}

fn print_breakdown(message: &InquiryMessage, breakdown: &ScoreBreakdown) {
    println!("📧 {}", message.subject());
    println!(
        "  total {:>5.1}  (clarity {:.1} / intent {:.1} / terms {:.1})",
        breakdown.total, breakdown.clarity, breakdown.intent, breakdown.terms
    );
    println!(
        "  language {}  spam {}",
        breakdown.language,
        if breakdown.is_spam { "yes" } else { "no" }
    );
    println!("  reason: {}", breakdown.reason);
    if !breakdown.keywords.is_empty() {
        println!("  keywords: {}", breakdown.keywords);
    }
}

fn generate_default_config(path: &str) {
    let config = EngineConfig::default();
    let yaml = match config.to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error serializing default configuration: {e}");
            process::exit(1);
        }
    };
    let content = format!(
        "# inquiry-triage engine configuration\n\
         # keywords_path / jargon_path: JSON score tables (missing files degrade to empty)\n\
         # pool_capacity: bounded worker pool size for batch scoring\n\
         # reply.backend: \"template\" or \"remote\" (remote needs an api_key)\n{yaml}"
    );
    if let Err(e) = std::fs::write(path, content) {
        eprintln!("Error writing {path}: {e}");
        process::exit(1);
    }
    println!("Default configuration written to {path}");
}

fn demo_messages() -> Vec<InquiryMessage> {
    vec![
        InquiryMessage {
            subject: Some("Purchase Order for LED Bulbs - FOB Shenzhen".to_string()),
            body: Some(
                "We would like to order 10,000 pcs. Target price USD 1.20/pc, \
                 delivery within 30 days, payment by T/T."
                    .to_string(),
            ),
            sender: Some("Jane Doe <jane@brightimports.com>".to_string()),
            sender_email: Some("jane@brightimports.com".to_string()),
            ..Default::default()
        },
        InquiryMessage {
            subject: Some("CONGRATULATIONS!!! YOU WON $1,000,000!!!".to_string()),
            body: Some("Click here NOW!!!".to_string()),
            sender_email: Some("winner@lottery.xyz".to_string()),
            ..Default::default()
        },
        InquiryMessage {
            subject: Some("견적 문의".to_string()),
            body: Some("LED 전구 500개 발주 예정입니다. 단가와 납기 회신 부탁드립니다.".to_string()),
            sender: Some("김철수 <kim@hanatrade.kr>".to_string()),
            sender_email: Some("kim@hanatrade.kr".to_string()),
            ..Default::default()
        },
        InquiryMessage {
            subject: Some("产品询价".to_string()),
            body: Some("你好，我们对贵公司的产品很感兴趣。".to_string()),
            ..Default::default()
        },
        InquiryMessage {
            subject: Some("asdf".to_string()),
            body: Some("qwert zxcv !!!!! jplm vbnm trewq".to_string()),
            ..Default::default()
        },
    ]
}
