use eframe::egui;
use vsidv_viewer::app::VsidvApp;
use vsidv_viewer::config::Config;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VSIDV – Two-phase flow viewer",
        options,
        Box::new(|_cc| Ok(Box::new(VsidvApp::new(config)))),
    )
}
