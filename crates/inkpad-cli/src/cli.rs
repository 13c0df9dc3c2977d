// Imports
use crate::{notes, replay};
use anyhow::Context;
use clap::Parser;
use inkpad_core::Settings;
use inkpad_core::storage::FileStorage;
use std::path::{Path, PathBuf};

/// inkpad{n}{n}
/// Create, inspect and replay input into InkPad notes.
#[derive(clap::Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub(crate) struct Cli {
    /// Directory holding the note files. Defaults to the platform data directory.
    #[arg(short = 'd', long, global = true)]
    pub(crate) notes_dir: Option<PathBuf>,
    /// Settings file. Defaults are used when it is missing.
    #[arg(short = 's', long, global = true)]
    pub(crate) settings: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Creates a new empty note and prints its id.
    New {
        /// The note title.
        title: String,
    },
    /// Lists all notes.
    List,
    /// Prints a summary of a note.
    Show {
        /// The note id.
        id: String,
        /// Print the stored record as JSON instead.
        #[arg(long, action = clap::ArgAction::SetTrue)]
        json: bool,
    },
    /// Deletes a note.
    Delete {
        /// The note id.
        id: String,
    },
    /// Replays a recorded event script against a note and saves the result.
    Replay {
        /// The note id.
        id: String,
        /// The JSON event script.
        script: PathBuf,
        /// Write through the background queue instead of blocking on every commit.
        #[arg(long, action = clap::ArgAction::SetTrue)]
        queued: bool,
    },
    /// Prints the effective settings as JSON.
    Settings,
}

pub(crate) fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let storage = open_storage(cli.notes_dir.as_deref())?;
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::New { title } => {
            let note = notes::run_new(&storage, &title)?;
            println!("{}", note.id);
        }
        Command::List => notes::run_list(&storage)?,
        Command::Show { id, json } => notes::run_show(&storage, &id, json)?,
        Command::Delete { id } => {
            notes::run_delete(&storage, &id)?;
            println!("Deleted {id}");
        }
        Command::Replay { id, script, queued } => {
            let summary = replay::run_replay(storage, settings, &id, &script, queued)?;
            println!("{summary}");
        }
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn open_storage(notes_dir: Option<&Path>) -> anyhow::Result<FileStorage> {
    let storage = match notes_dir {
        Some(dir) => FileStorage::new(dir.to_path_buf()),
        None => FileStorage::default_location(),
    }
    .context("Opening note storage failed")?;
    log::info!("Using notes directory {}", storage.base_path().display());
    Ok(storage)
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Loading settings from \"{}\" failed", path.display())),
        None => Ok(Settings::default()),
    }
}
