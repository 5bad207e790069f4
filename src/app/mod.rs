//! Root controller and application state.

mod controller;
mod state;

pub use controller::{
    download_file_name, Controller, GenerationOutcome, PendingGeneration, DOWNLOAD_FILE_PREFIX,
    GENERIC_ERROR_MESSAGE,
};
pub use state::{AppState, Phase, ResultView};
