//! The module for the main app state and logic.

use std::time::Instant;
use log::{debug, info, warn};
use octonum_input::{Indicator, KeyDirection, KeyEvent};
use octonum_input::keypad::NumpadKey;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::error::DispatchError;
use crate::guard::is_operational;
use crate::toggle::NumLock;

/// What [App::handle_key_event] did with an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Handled {
    /// Key releases and auto-repeats.
    Ignored,
    /// The num-lock key was pressed; holds the new state.
    Toggled(bool),
    /// Test mode: the press was logged but not sent.
    Logged,
    Dispatched(Result<Dispatched, DispatchError>),
}

/// The main app state struct.
pub struct App<'a> {
    /// Resolves and runs actions.
    dispatcher: Dispatcher<'a>,
    /// The current num-lock state.
    numlock: NumLock,
    /// The LED showing the num-lock state.
    indicator: &'a mut dyn Indicator,
    /// Whether key presses are only logged instead of sent to the printer.
    test_mode: bool,
}

impl <'a> App<'a> {
    /// Creates a new instance of the App. Num lock starts enabled.
    pub fn new(
        dispatcher: Dispatcher<'a>,
        indicator: &'a mut dyn Indicator,
        test_mode: bool,
    ) -> App<'a> {
        App {
            dispatcher,
            numlock: NumLock::new(true),
            indicator,
            test_mode,
        }
    }

    #[cfg(test)]
    pub fn numlock(&self) -> bool {
        self.numlock.is_on()
    }

    /// Syncs the LED with the initial state and logs whether the printer is ready.
    pub fn start(&mut self, now: Instant) {
        if !self.indicator.is_available() {
            warn!("No num-lock LED available.");
        }
        self.numlock.reflect(self.indicator);

        if self.test_mode {
            info!("Test mode: key presses will not be sent.");
            return;
        }
        if self.dispatcher.require_connected(now).is_ok() {
            is_operational(self.dispatcher.printer());
        } else {
            warn!("Printer not connected yet.");
        }
    }

    /// Handles a single key event. Errors are logged, never returned.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Handled {
        if event.direction != KeyDirection::Down {
            return Handled::Ignored;
        }

        debug!("{:?}", event);

        if event.code == NumpadKey::KeyNumLock.code() {
            return Handled::Toggled(self.numlock.toggle(self.indicator));
        }

        if self.test_mode {
            info!("Test mode: key {} (num lock {})", event.code, self.numlock.is_on());
            return Handled::Logged;
        }

        let result = self.dispatcher.dispatch(event.code, self.numlock.is_on(), event.at);
        match &result {
            Ok(dispatched) => debug!("Done: {:?}", dispatched),
            Err(e) if e.is_benign() => debug!("{}", e),
            Err(e) => warn!("Action skipped: {}", e),
        }
        Handled::Dispatched(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octonum_input::KeyCode;
    use octonum_printer::{Axis, Route, TaskDescriptor};
    use crate::config::Config;
    use crate::registry::build_registry;
    use crate::testing::{Call, FakeIndicator, FakePrinter};

    fn dispatcher(printer: &FakePrinter) -> Dispatcher<'_> {
        let config = Config::default();
        let registry = build_registry(&config).unwrap();
        Dispatcher::new(config, registry, printer)
    }

    fn press(key: NumpadKey) -> KeyEvent {
        KeyEvent::down(key.code(), Instant::now())
    }

    #[test]
    fn numlock_key_toggles_and_updates_led() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        assert_eq!(app.handle_key_event(&press(NumpadKey::KeyNumLock)), Handled::Toggled(false));
        assert_eq!(app.handle_key_event(&press(NumpadKey::KeyNumLock)), Handled::Toggled(true));
        assert!(app.numlock());
        drop(app);

        assert_eq!(indicator.writes, vec![false, true]);
        assert!(printer.calls().is_empty());
    }

    #[test]
    fn releases_are_ignored() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        let release = KeyEvent::up(NumpadKey::KeyEnter.code(), Instant::now());
        let repeat = KeyEvent::new(NumpadKey::KeyEnter.code(), KeyDirection::Repeat, Instant::now());
        assert_eq!(app.handle_key_event(&release), Handled::Ignored);
        assert_eq!(app.handle_key_event(&repeat), Handled::Ignored);
        assert!(printer.calls().is_empty());
    }

    #[test]
    fn numlock_selects_action_set() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        app.handle_key_event(&press(NumpadKey::KeyPlus));
        app.handle_key_event(&press(NumpadKey::KeyNumLock));
        app.handle_key_event(&press(NumpadKey::KeyPlus));

        assert_eq!(
            printer.sent(),
            vec![
                (Route::Printhead, TaskDescriptor::jog_relative(None, None, Some(10.0))),
                (Route::Tool, TaskDescriptor::extrude(5.0)),
            ]
        );
    }

    #[test]
    fn errors_do_not_escape() {
        let printer = FakePrinter::ready();
        printer.operational.set(false);
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        let handled = app.handle_key_event(&press(NumpadKey::Key0));
        assert_eq!(handled, Handled::Dispatched(Err(DispatchError::NotOperational)));

        let unmapped = KeyEvent::down(KeyCode(30), Instant::now());
        assert!(matches!(
            app.handle_key_event(&unmapped),
            Handled::Dispatched(Err(DispatchError::UnmappedKey { .. }))
        ));
        assert!(printer.commands().is_empty());
    }

    #[test]
    fn test_mode_only_logs() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, true);

        assert_eq!(app.handle_key_event(&press(NumpadKey::Key0)), Handled::Logged);
        assert_eq!(app.handle_key_event(&press(NumpadKey::KeyNumLock)), Handled::Toggled(false));
        assert!(printer.calls().is_empty());
    }

    #[test]
    fn start_reflects_led_and_checks_printer() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        app.start(Instant::now());
        drop(app);

        assert_eq!(indicator.writes, vec![true]);
        assert_eq!(printer.calls(), vec![Call::Connection, Call::PrinterState]);
    }

    #[test]
    fn dot_homes_xy_regardless_of_numlock() {
        let printer = FakePrinter::ready();
        let mut indicator = FakeIndicator::default();
        let mut app = App::new(dispatcher(&printer), &mut indicator, false);

        app.handle_key_event(&press(NumpadKey::KeyDot));
        app.handle_key_event(&press(NumpadKey::KeyNumLock));
        app.handle_key_event(&press(NumpadKey::KeyDot));

        let home_xy = (Route::Printhead, TaskDescriptor::home(&[Axis::X, Axis::Y]));
        assert_eq!(printer.sent(), vec![home_xy.clone(), home_xy]);
    }
}
