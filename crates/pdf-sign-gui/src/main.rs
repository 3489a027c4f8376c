#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use std::path::PathBuf;

mod app;
mod handlers;
mod logger;
mod render;
mod views;
mod worker;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(500);
    logger.clone().init()?;

    // The worker runs on its own runtime; eframe owns the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let handle = runtime.handle().clone();

    // A PDF passed on the command line is opened on start
    let initial_document = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 850.0])
            .with_title("PDF Sign"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Sign",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::SignApp::new(
                cc,
                handle,
                logger,
                initial_document,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
