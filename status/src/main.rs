use dotenv::dotenv;
use log::{info, warn};
use octonum_printer::http::HttpPrinter;
use octonum_printer::{ConnectionSettings, PrinterApi};
use serde_json::json;
use sysinfo::System;

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "System ver {} kernel ver {}",
        System::long_os_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
    );

    let settings = ConnectionSettings::from_env()?;
    let printer = HttpPrinter::new(&settings)?;
    info!("Querying {}", settings.base_url());

    let connection = printer.connection()?;
    let state = if connection.is_connected() {
        Some(printer.printer_state()?)
    } else {
        warn!("Printer is not connected ({})", connection.state);
        None
    };

    let report = json!({
        "host": {
            "hostname": System::host_name(),
            "os": System::long_os_version(),
            "kernel": System::kernel_version(),
            "arch": System::cpu_arch(),
        },
        "octoprint": settings.base_url(),
        "connection": connection,
        "connected": connection.is_connected(),
        "printer": state,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
