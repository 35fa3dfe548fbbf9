//! `selfeval` - CLI for the self-evaluation survey
//!
//! This binary runs the survey over answer files, stores submissions and
//! prints the aggregate report.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;

use anyhow::{bail, Context, Result};
use clap::Parser;

use selfeval::cli::{
    AnnotateCommand, Cli, Command, ConfigCommand, ReportCommand, SeedCommand, SubmitCommand,
};
use selfeval::receipt::{JsonReceiptWriter, NoopReceiptWriter, ReceiptStatus, ReceiptWriter};
use selfeval::report::{render::render_text, Aggregator};
use selfeval::storage::{AnnotationRepository, SqliteSurveyStore, SubmissionRepository};
use selfeval::survey::AnswerRecord;
use selfeval::wizard::{Advance, EntryPoint, Wizard};
use selfeval::{init_logging, seed, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
        command => {
            let path = config.database_path();
            let store = SqliteSurveyStore::open(&path)
                .with_context(|| format!("failed to open store at {}", path.display()))?;
            run(&config, &store, command)
        }
    }
}

fn run(config: &Config, store: &SqliteSurveyStore, command: Command) -> Result<()> {
    match command {
        Command::Submit(cmd) => handle_submit(config, store, &cmd),
        Command::Report(cmd) => handle_report(config, store, &cmd),
        Command::List(cmd) => handle_list(store, cmd.json),
        Command::Annotate(cmd) => handle_annotate(store, &cmd),
        Command::Annotations(cmd) => handle_annotations(store, cmd.json),
        Command::Clear(cmd) => handle_clear(store, cmd.yes),
        Command::Seed(cmd) => handle_seed(store, &cmd),
        Command::Config(config_cmd) => handle_config(config, config_cmd),
    }
}

fn handle_submit(config: &Config, store: &SqliteSurveyStore, cmd: &SubmitCommand) -> Result<()> {
    let raw = fs::read_to_string(&cmd.file)
        .with_context(|| format!("failed to read {}", cmd.file.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", cmd.file.display()))?;
    let answers = AnswerRecord::from_json(value)?;

    let entry = if cmd.direct {
        EntryPoint::Direct
    } else {
        config.wizard.entry
    };

    let json_writer;
    let receipts: &dyn ReceiptWriter = if config.receipts.enabled {
        json_writer = JsonReceiptWriter::new(config.receipts_dir());
        &json_writer
    } else {
        &NoopReceiptWriter
    };

    let mut wizard = Wizard::new(entry, store).with_receipts(receipts);
    wizard.fill(&answers);

    loop {
        match wizard.advance() {
            Advance::Moved { .. } => {}
            Advance::Blocked { missing } => {
                let keys: Vec<&str> = missing.iter().map(|f| f.key()).collect();
                bail!(
                    "survey incomplete on \"{}\", missing fields: {}",
                    wizard.screen(),
                    keys.join(", ")
                );
            }
            Advance::SubmitFailed { message } => bail!(message),
            Advance::Submitted {
                submission,
                receipt,
            } => {
                println!("Submission stored.");
                println!("  Id:            {}", submission.id);
                println!("  Name:          {}", submission.name);
                println!("  Sector:        {}", submission.sector);
                println!("  Overall score: {:.1}", submission.overall_score);
                match receipt {
                    ReceiptStatus::Written(path) => println!("  Receipt:       {}", path.display()),
                    ReceiptStatus::Skipped => {}
                    ReceiptStatus::Failed(reason) => {
                        println!("  Receipt could not be written: {reason}");
                    }
                }
                return Ok(());
            }
            Advance::Finished => return Ok(()),
        }
    }
}

fn handle_report(config: &Config, store: &SqliteSurveyStore, cmd: &ReportCommand) -> Result<()> {
    let top_n = cmd.top.unwrap_or(config.report.top_n);
    if top_n == 0 {
        bail!("--top must be greater than 0");
    }

    let submissions = store.load_all();
    let aggregator =
        Aggregator::new(&submissions).with_missing_ratings(config.report.missing_ratings);
    let report = if config.report.demo_fallback {
        aggregator.report(top_n)
    } else {
        aggregator.summarize(top_n)
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn handle_list(store: &SqliteSurveyStore, json: bool) -> Result<()> {
    let submissions = store.load_all();
    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
        return Ok(());
    }

    if submissions.is_empty() {
        println!("No submissions stored.");
        return Ok(());
    }

    let annotations = store.load_annotations();
    println!(
        "{:<36}  {:<16}  {:<22}  {:<20}  {:>5}",
        "ID", "DATE", "NAME", "SECTOR", "SCORE"
    );
    for submission in &submissions {
        let marker = if annotations.contains_key(submission.annotation_key()) {
            " *"
        } else {
            ""
        };
        println!(
            "{:<36}  {:<16}  {:<22}  {:<20}  {:>5.1}{marker}",
            submission.id,
            submission.created_at.format("%Y-%m-%d %H:%M"),
            submission.name,
            submission.sector.label(),
            submission.overall_score
        );
    }
    println!();
    println!("{} submission(s); * has an admin comment", submissions.len());
    println!(
        "Database: {} ({} bytes)",
        store.kv().path().display(),
        store.kv().size_bytes()
    );
    Ok(())
}

fn handle_annotate(store: &SqliteSurveyStore, cmd: &AnnotateCommand) -> Result<()> {
    if cmd.comment.trim().is_empty() {
        bail!("comment must not be empty");
    }
    if !store.load_all().iter().any(|s| s.annotation_key() == cmd.key) {
        tracing::warn!(key = %cmd.key, "No stored submission has this id");
    }
    let annotation = store.annotate(&cmd.key, &cmd.comment, &cmd.author)?;
    println!(
        "Comment saved for {} by {} at {}.",
        cmd.key,
        annotation.author,
        annotation.date.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn handle_annotations(store: &SqliteSurveyStore, json: bool) -> Result<()> {
    let annotations = store.load_annotations();
    if json {
        println!("{}", serde_json::to_string_pretty(&annotations)?);
        return Ok(());
    }
    if annotations.is_empty() {
        println!("No admin comments.");
        return Ok(());
    }
    for (key, annotation) in &annotations {
        println!(
            "{key} ({}, {}): {}",
            annotation.author,
            annotation.date.format("%Y-%m-%d %H:%M"),
            annotation.comment
        );
    }
    Ok(())
}

fn handle_clear(store: &SqliteSurveyStore, yes: bool) -> Result<()> {
    if !yes {
        println!("This will remove every stored submission.");
        println!("Use --yes to confirm.");
        return Ok(());
    }
    let removed = store.clear_all()?;
    println!("Removed {removed} submission(s).");
    Ok(())
}

fn handle_seed(store: &SqliteSurveyStore, cmd: &SeedCommand) -> Result<()> {
    for submission in seed::sample_submissions(cmd.count) {
        store.append_one(submission)?;
    }
    println!("Stored {} sample submission(s).", cmd.count);
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Receipts]");
                println!("  Enabled:            {}", config.receipts.enabled);
                println!("  Directory:          {}", config.receipts_dir().display());
                println!();
                println!("[Report]");
                println!("  Missing ratings:    {:?}", config.report.missing_ratings);
                println!("  Top N:              {}", config.report.top_n);
                println!("  Demo fallback:      {}", config.report.demo_fallback);
                println!();
                println!("[Wizard]");
                println!("  Entry:              {:?}", config.wizard.entry);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::check_file(&path) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
