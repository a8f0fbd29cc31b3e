// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the API client and hand an
//   `App` to the UI loop.

use anyhow::Context;
use pixelrevive_cli::{api::ApiClient, app::App, config::Config, ui};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    // Defaults < ~/.pixelrevive.json < COLORIZE_API_URL & friends.
    let config = Config::load().context("Loading configuration")?;
    log::info!("using colorization service at {}", config.colorize_url());

    let api = ApiClient::new(&config)?;
    let app = App::new(api, ui::TerminalNotifier::default());

    // Blocks until the user exits.
    ui::main_menu(app, &config.output_dir)?;
    Ok(())
}
