//! Desktop front end (egui).

mod app;
mod preview;
mod selector;
mod upload;

pub use app::SelfieApp;

use crate::config::Config;

/// Opens the window and blocks until it is closed.
///
/// Requests run on `runtime`; the window itself runs on the calling thread.
pub fn run(config: Config, runtime: tokio::runtime::Handle) -> Result<(), eframe::Error> {
    tracing::info!(?config, "opening window");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Zootopia Selfie Maker",
        options,
        Box::new(move |cc| Ok(Box::new(SelfieApp::new(cc, config, runtime)))),
    )
}
