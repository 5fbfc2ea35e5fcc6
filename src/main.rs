use anyhow::Context;
use std::path::PathBuf;

use sceneforge::{EditorApp, EditorSettings};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = EditorSettings::default_path();
    let settings = EditorSettings::load_or_default(&settings_path);

    let assets: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if !assets.is_empty() {
        log::info!("Importing {} asset(s) from the command line", assets.len());
    }

    EditorApp::new(settings, assets)
        .run()
        .context("editor terminated with an error")
}
