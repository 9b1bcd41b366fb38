//! `eightball` - CLI for the project showcase kiosk
//!
//! This binary runs the rotating kiosk and provides commands for listing
//! and submitting projects.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use eightball::cli::{
    Cli, Command, ConfigCommand, ListCommand, OutputFormat, ShowCommand, SubmitCommand,
};
use eightball::display::TerminalRenderer;
use eightball::runtime::{run_kiosk, spawn_stdin_reader};
use eightball::submit::{submit, ScreenshotFile, Submission};
use eightball::{init_logging, Config, Kiosk, Project, ProjectRepository, RestStore};

const INPUT_BUFFER: usize = 16;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // `config validate` reports problems itself instead of failing here
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        handle_validate(file.clone().or_else(|| cli.config.clone()));
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Show(show_cmd) => handle_show(&config, &show_cmd).await?,
        Command::List(list_cmd) => handle_list(&config, &list_cmd).await?,
        Command::Submit(submit_cmd) => return handle_submit(&config, submit_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, &config_cmd)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn repository(config: &Config) -> anyhow::Result<ProjectRepository<RestStore>> {
    let endpoint = config
        .store_endpoint()
        .context("the store connection is not configured")?;
    Ok(ProjectRepository::new(RestStore::new(endpoint)))
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let repository = repository(config)?;
    let rng = match cmd.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut kiosk = Kiosk::new(
        TerminalRenderer::stdout(),
        rng,
        config.timings(),
        config.messages.clone(),
    );

    println!("Enter or s to shake, o to open the link, q to quit.");
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    spawn_stdin_reader(tx)?;

    run_kiosk(&repository, &mut kiosk, rx).await?;
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let repository = repository(config)?;
    let projects = repository.load_all().await?;

    match cmd.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        OutputFormat::Plain => {
            for project in &projects {
                println!("{} {}", project.title, project.byline());
                if let Some(link) = project.link() {
                    println!("  {link}");
                }
            }
        }
        OutputFormat::Table => print_table(&projects),
    }
    Ok(())
}

fn print_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects submitted yet.");
        return;
    }

    let title_width = projects
        .iter()
        .map(|p| p.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());
    let author_width = projects
        .iter()
        .map(|p| p.author_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Student".len());

    println!(
        "{:<16}  {:<title_width$}  {:<author_width$}  Link",
        "Submitted", "Title", "Student"
    );
    println!(
        "{}  {}  {}  ----",
        "-".repeat(16),
        "-".repeat(title_width),
        "-".repeat(author_width)
    );
    for project in projects {
        println!(
            "{:<16}  {:<title_width$}  {:<author_width$}  {}",
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.title,
            project.author_name,
            project.link().unwrap_or("-")
        );
    }
}

async fn handle_submit(config: &Config, cmd: SubmitCommand) -> anyhow::Result<ExitCode> {
    let repository = repository(config)?;
    let screenshot = cmd
        .screenshot
        .as_deref()
        .map(ScreenshotFile::read)
        .transpose()
        .context("could not read the screenshot")?;

    let submission = Submission {
        student_name: cmd.name,
        title: cmd.title,
        link: cmd.link,
        screenshot,
    };

    match submit(repository.store(), submission, Utc::now()).await {
        Ok(project) => {
            println!("{}", config.messages.submit_success);
            tracing::debug!(title = %project.title, "submission stored");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "submission failed");
            eprintln!("{}", config.messages.submit_failed);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn handle_validate(path: Option<std::path::PathBuf>) {
    let path = path.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path)) {
        Ok(_) => println!("Configuration is valid."),
        Err(e) => println!("Configuration error: {e}"),
    }
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&config.redacted())?);
            } else {
                let timings = &config.rotation;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!(
                    "  URL:                {}",
                    config.store.url.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Anon key:           {}",
                    if config.store.anon_key.is_some() {
                        "(set)"
                    } else {
                        "(not set)"
                    }
                );
                println!("  Table:              {}", config.store.table);
                println!("  Bucket:             {}", config.store.bucket);
                println!();
                println!("[Rotation]");
                println!("  Interval (ms):      {}", timings.interval_ms);
                println!("  Shake (ms):         {}", timings.shake_ms);
                println!("  Fade out (ms):      {}", timings.fade_out_ms);
                println!("  Fade settle (ms):   {}", timings.fade_settle_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { .. } => {}
    }
    Ok(())
}
