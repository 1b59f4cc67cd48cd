//! SimpleOverlay - pin an image above other windows
//!
//! A small control window drives a borderless overlay that passes clicks
//! through until move mode is switched on.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;
mod state;
mod surface;
mod ui;
#[cfg(not(windows))]
mod viewport;

use crate::ui::ControlApp;
use eframe::egui;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::parse_args();
    info!(
        "Starting SimpleOverlay (opacity {}, move mode {})",
        args.opacity, args.move_mode
    );

    // Overlay geometry is computed in physical pixels.
    #[cfg(windows)]
    unsafe {
        use windows::Win32::UI::HiDpi::{
            SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        };
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 190.0])
            .with_min_inner_size([380.0, 170.0])
            .with_title("SimpleOverlay")
            .with_decorations(false)
            .with_always_on_top()
            .with_resizable(false),
        ..Default::default()
    };

    let cli::Args {
        image,
        opacity,
        move_mode,
    } = args;

    eframe::run_native(
        "SimpleOverlay",
        native_options,
        Box::new(move |cc| Ok(Box::new(ControlApp::new(cc, opacity, move_mode, image)))),
    )
    .map_err(|e| anyhow::anyhow!("control window failed: {e}"))?;

    info!("SimpleOverlay closed");
    Ok(())
}
