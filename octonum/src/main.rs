mod app;
mod config;
mod dispatch;
mod error;
mod guard;
mod heaters;
mod registry;
mod toggle;
mod utils;
#[cfg(test)]
mod testing;

use std::env::var;
use std::path::Path;
use std::time::Instant;
use dotenv::dotenv;
use eyre::WrapErr;
use log::{debug, info, warn};
use octonum_input::{Indicator, KeySource};
use octonum_input::debounce::TimedDebounce;
use octonum_input::keypad::EvdevKeypad;
use octonum_input::led::{ConsoleLed, EvdevLed, NoIndicator};
use octonum_printer::ConnectionSettings;
use octonum_printer::http::HttpPrinter;
use crate::app::App;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::registry::build_registry;

fn env_flag(name: &str) -> bool {
    var(name)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Opens the LED backend named by `OCTONUM_LED`, degrading to no LED on failure.
fn open_indicator(keypad_path: &Path) -> Box<dyn Indicator> {
    let kind = var("OCTONUM_LED").unwrap_or_else(|_| "evdev".to_string());

    let opened = match kind.trim() {
        "none" => return Box::new(NoIndicator),
        "console" => ConsoleLed::open(ConsoleLed::DEFAULT_PATH).map(|led| Box::new(led) as Box<dyn Indicator>),
        "evdev" => EvdevLed::open(keypad_path).map(|led| Box::new(led) as Box<dyn Indicator>),
        other => {
            warn!("Unknown LED backend {:?}, running without LED.", other);
            return Box::new(NoIndicator);
        }
    };

    opened.unwrap_or_else(|e| {
        warn!("Cannot open {} LED: {}. Running without LED.", kind, e);
        Box::new(NoIndicator)
    })
}

fn main() -> eyre::Result<()> {
    // Initialize environment and logger
    dotenv().ok();
    pretty_env_logger::init();

    info!("OctoNum starting...");

    let settings = ConnectionSettings::from_env()?;
    info!("OctoPrint @ {}", settings.base_url());

    debug!("Trying to load config...");
    let config_path = Config::path();
    let loaded = Config::try_load()
        .wrap_err_with(|| format!("Cannot load config from {}", config_path.display()))?;
    let config = if let Some(config) = loaded {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };
    debug!("{:?}", config);

    let registry = build_registry(&config)?;
    info!("{} key actions registered.", registry.len());

    let printer = HttpPrinter::new(&settings)?;
    debug!("{:?} initialized.", printer);

    debug!("Initializing keypad...");
    let mut keypad = match var("OCTONUM_INPUT_DEVICE") {
        Ok(path) => EvdevKeypad::open(path)?,
        Err(_) => EvdevKeypad::discover()?,
    };
    if env_flag("OCTONUM_GRAB") {
        keypad.grab()?;
        debug!("Keypad grabbed.");
    }
    info!("Keypad @ {}", keypad.path().display());

    let mut indicator = open_indicator(keypad.path());
    let test_mode = env_flag("OCTONUM_TEST_MODE");
    let debounce_time = config.debounce();

    let mut keys = TimedDebounce::new(&mut keypad).with_debounce_time(debounce_time);

    let dispatcher = Dispatcher::new(config, registry, &printer);
    let mut app = App::new(dispatcher, &mut *indicator, test_mode);
    app.start(Instant::now());

    info!("OctoNum initialized. Waiting for keys...");

    loop {
        for event in keys.next_events()? {
            app.handle_key_event(&event);
        }
    }
}
