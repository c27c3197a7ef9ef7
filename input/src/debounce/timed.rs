use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::time::{Duration, Instant};
use log::debug;
use crate::{InputResult, KeyCode, KeyEvent, KeySource};

/// A key source wrapper that drops repeated key presses arriving within a short window.
///
/// Each key code has its own window, which only restarts when a press is accepted.
/// Releases and repeats pass through untouched.
pub struct TimedDebounce<'a> {
    source: &'a mut dyn KeySource,
    last_accepted: HashMap<KeyCode, Instant>,
    pub debounce_time: Duration,
}

impl <'a> TimedDebounce<'a> {
    pub fn new(source: &'a mut dyn KeySource) -> Self {
        Self {
            source,
            last_accepted: HashMap::new(),
            debounce_time: Duration::from_millis(100),
        }
    }

    pub fn with_debounce_time(mut self, debounce_time: Duration) -> Self {
        self.debounce_time = debounce_time;
        self
    }

    /// Decides whether the event should be let through, remembering accepted presses.
    pub fn accept(&mut self, event: &KeyEvent) -> bool {
        accept_press(&mut self.last_accepted, self.debounce_time, event)
    }
}

fn accept_press(
    last_accepted: &mut HashMap<KeyCode, Instant>,
    debounce_time: Duration,
    event: &KeyEvent,
) -> bool {
    if !event.is_down() {
        return true;
    }

    if let Some(previous) = last_accepted.get(&event.code) {
        let delta = event.at.saturating_duration_since(*previous);
        if delta <= debounce_time {
            debug!("Key {} suppressed, {:?} < {:?}", event.code, delta, debounce_time);
            return false;
        }
    }

    last_accepted.insert(event.code, event.at);
    true
}

impl Debug for TimedDebounce<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}(debounced)", self.source)
    }
}

impl KeySource for TimedDebounce<'_> {
    fn next_events(&mut self) -> InputResult<Vec<KeyEvent>> {
        let events = self.source.next_events()?;
        let debounce_time = self.debounce_time;
        let last_accepted = &mut self.last_accepted;

        Ok(events
            .into_iter()
            .filter(|event| accept_press(last_accepted, debounce_time, event))
            .collect())
    }
}
