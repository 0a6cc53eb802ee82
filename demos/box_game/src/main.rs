mod game;

use std::path::Path;

use anyhow::Result;
use boxengine::{Engine, EngineConfig, TextGrid};
use game::BoxGame;

fn main() -> Result<()> {
    env_logger::init();

    // Optional first argument: path to a JSON engine config.
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig {
            title: "Box Game".into(),
            tick_interval_ms: 30,
            ..EngineConfig::default()
        },
    };

    let (width, height) = config.canvas_size();
    let palette = &config.palette;
    // The window takes keyboard focus; the frame is drawn in the terminal.
    let surface = TextGrid::new(width, height, 80, 30)
        .with_glyph(palette.border, '#')
        .with_glyph(palette.enemy, 'x')
        .with_glyph(palette.player, '@')
        .with_output(Box::new(std::io::stdout()));

    Engine::new()
        .with_config(config)
        .run(BoxGame::new(), Box::new(surface))
}
