//! Preconditions checked before anything is sent to the printer.

use std::time::{Duration, Instant};
use log::{debug, info, warn};
use octonum_printer::PrinterApi;

/// Keeps the printer connected without flooding OctoPrint with connect requests.
#[derive(Debug, Clone)]
pub struct ConnectivityGuard {
    last_attempt: Option<Instant>,
    retry_interval: Duration,
}

impl ConnectivityGuard {
    pub fn new(retry_interval: Duration) -> Self {
        ConnectivityGuard {
            last_attempt: None,
            retry_interval,
        }
    }

    #[cfg(test)]
    pub fn last_attempt(&self) -> Option<Instant> {
        self.last_attempt
    }

    /// Returns whether the printer is connected, trying to connect it if it is not.
    ///
    /// A connect request is only sent if no attempt was made within the retry interval.
    pub fn ensure_connected(&mut self, printer: &dyn PrinterApi, now: Instant) -> bool {
        if is_connected(printer) {
            return true;
        }

        if let Some(last) = self.last_attempt {
            let elapsed = now.saturating_duration_since(last);
            if elapsed <= self.retry_interval {
                debug!("Last connect attempt {:?} ago, not retrying yet", elapsed);
                return false;
            }
        }

        info!("Printer not connected, connecting...");
        self.last_attempt = Some(now);
        if let Err(e) = printer.connect() {
            warn!("Connect request failed: {}", e);
            return false;
        }

        is_connected(printer)
    }
}

fn is_connected(printer: &dyn PrinterApi) -> bool {
    match printer.connection() {
        Ok(status) => {
            debug!("Connection state: {}", status.state);
            status.is_connected()
        }
        Err(e) => {
            warn!("Failed to query connection: {}", e);
            false
        }
    }
}

/// Returns the printer's `operational` flag. Errors count as not operational.
pub fn is_operational(printer: &dyn PrinterApi) -> bool {
    match printer.printer_state() {
        Ok(state) => {
            if state.flags.operational {
                debug!("Printer operational ({})", state.text);
            } else {
                warn!("Printer not operational ({})", state.text);
            }
            state.flags.operational
        }
        Err(e) => {
            warn!("Failed to query printer state: {}", e);
            false
        }
    }
}
