//! `formcap` - CLI for formcapture
//!
//! Drives the form controller with the desktop stand-ins for camera,
//! location and permissions, and inspects the local submission store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use formcapture::cli::{Cli, Command, ConfigCommand, SubmitCommand};
use formcapture::desktop::{FilePhotoCapture, FixedLocation, StaticPermissions};
use formcapture::{init_logging, Config, FormController, SubmissionStore, SubmitOutcome};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config_path = cli.config;
    let load = || load_config(config_path.clone());

    match cli.command {
        Command::Submit(submit_cmd) => handle_submit(&load()?, submit_cmd),
        Command::List(list_cmd) => handle_list(&load()?, list_cmd.json),
        Command::Reset(reset_cmd) => handle_reset(&load()?, reset_cmd.yes),
        Command::Status(status_cmd) => handle_status(&load()?, status_cmd.json),
        Command::Config(config_cmd) => handle_config(config_path.clone(), config_cmd),
    }
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(config_path).context("loading configuration")
}

fn open_store(config: &Config) -> anyhow::Result<SubmissionStore> {
    let path = config.database_path();
    SubmissionStore::open(&path)
        .with_context(|| format!("opening submission store at {}", path.display()))
}

fn handle_submit(config: &Config, cmd: SubmitCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let mut form = FormController::new(
        store,
        config.photo_dir(),
        FilePhotoCapture::new(cmd.photo.clone()),
        FixedLocation(config.position()),
        StaticPermissions(config.permissions.clone()),
    );
    form.set_name(cmd.name);
    form.set_email(cmd.email);
    form.set_comment(cmd.comment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        if cmd.photo.is_some() {
            println!("{}", form.take_photo().await?);
        }
        if cmd.locate {
            println!("{}", form.fetch_location().await);
        }
        anyhow::Ok(())
    })?;

    match form.submit()? {
        SubmitOutcome::Saved(id) => println!("Saved submission #{id}"),
        SubmitOutcome::NoPhoto => {
            println!("No photo taken, nothing saved.");
            return Ok(());
        }
    }

    println!();
    println!("Registered submissions:");
    for submission in form.submissions() {
        println!("  {submission}");
    }
    Ok(())
}

fn handle_list(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let submissions = store.list_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&submissions)?);
    } else if submissions.is_empty() {
        println!("No submissions yet.");
    } else {
        for submission in &submissions {
            println!("#{:<4} {}", submission.id, submission);
            println!("      Photo: {}", submission.photo_path);
        }
    }
    Ok(())
}

fn handle_reset(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!("This will delete every stored submission.");
        println!("Use --yes to confirm.");
        return Ok(());
    }

    let store = open_store(config)?;
    store.reset()?;
    println!("All submissions deleted.");
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let count = store.list_all()?.len();
    let path = store.path()?;
    let schema_version = store.schema_version()?;
    let size_bytes = store
        .size_bytes()
        .with_context(|| format!("reading size of {}", path.display()))?;

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "schema_version": schema_version,
            "submissions": count,
            "size_bytes": size_bytes,
            "photo_dir": config.photo_dir(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("formcap status");
        println!("--------------");
        println!("Database:       {}", path.display());
        println!("Schema version: {schema_version}");
        println!("Submissions:    {count}");
        println!("Size:           {size_bytes} bytes");
        println!("Photos:         {}", config.photo_dir().display());
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!();
                println!("[Capture]");
                println!("  Photo dir:      {}", config.photo_dir().display());
                println!();
                println!("[Permissions]");
                println!("  Camera:         {}", config.permissions.camera);
                println!("  Location:       {}", config.permissions.location);
                println!();
                println!("[Location]");
                match config.position() {
                    Some(position) => println!("  {position}"),
                    None => println!("  (none)"),
                }
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::check_file(&path)
                .with_context(|| format!("invalid configuration file {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
