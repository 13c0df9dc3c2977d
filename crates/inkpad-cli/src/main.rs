//! inkpad
//!
//! Command-line front end for InkPad notes.

// Modules
pub(crate) mod cli;
pub(crate) mod notes;
pub(crate) mod replay;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting InkPad CLI");

    cli::run()
}
