pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod logging;
pub mod notification;
pub mod session;
pub mod state;
pub mod storage;

pub use error::{AppError, AppResult, EditorError, EditorResult};
pub use export::ExportedImage;
pub use filter::{FilterChannel, FilterPreset, FilterSettings};
pub use session::{EditorConfig, LoadOutcome, SessionController};

/// Entrypoint used by the command-line binary.
pub fn run(args: &cli::CliArgs) -> AppResult<()> {
    logging::init();
    tracing::info!("starting photo-editor");

    let written = cli::run(args)?;

    tracing::info!("export complete at {}", written.display());
    Ok(())
}
