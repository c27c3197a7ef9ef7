//! The key-to-action table.

use std::collections::HashMap;
use log::debug;
use thiserror::Error;
use octonum_input::KeyCode;
use octonum_input::keypad::NumpadKey;
use octonum_printer::{Axis, Route, TaskDescriptor};
use crate::config::Config;

/// Lookup key of the registry: a key code together with the num-lock state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActionKey {
    pub code: KeyCode,
    pub numlock: bool,
}

impl ActionKey {
    pub fn new(key: NumpadKey, numlock: bool) -> Self {
        ActionKey { code: key.code(), numlock }
    }
}

/// Built-in operations that need to read printer state before deciding what to send.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Callback {
    ToggleBedTemperature,
    ToggleToolTemperature,
}

/// What a key does.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Posts the tasks to the route one after another.
    Tasks {
        name: String,
        route: Route,
        tasks: Vec<TaskDescriptor>,
    },
    Callback {
        name: String,
        callback: Callback,
    },
}

impl Action {
    fn tasks(name: impl Into<String>, route: Route, tasks: Vec<TaskDescriptor>) -> Self {
        Action::Tasks { name: name.into(), route, tasks }
    }

    fn callback(name: impl Into<String>, callback: Callback) -> Self {
        Action::Callback { name: name.into(), callback }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::Tasks { name, .. } | Action::Callback { name, .. } => name,
        }
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum RegistryError {
    #[error("key {} (num lock {}) is already bound to {existing}", .key.code, .key.numlock)]
    Duplicate { key: ActionKey, existing: String },
}

/// An immutable mapping from [ActionKey] to [Action].
#[derive(Debug, Default, Clone)]
pub struct Registry {
    actions: HashMap<ActionKey, Action>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an action to a key. Binding the same key twice is an error.
    pub fn register(&mut self, key: ActionKey, action: Action) -> Result<(), RegistryError> {
        if let Some(existing) = self.actions.get(&key) {
            return Err(RegistryError::Duplicate { key, existing: existing.name().to_string() });
        }
        debug!("Registered {} for key {} (num lock {})", action.name(), key.code, key.numlock);
        self.actions.insert(key, action);
        Ok(())
    }

    pub fn get(&self, code: KeyCode, numlock: bool) -> Option<&Action> {
        self.actions.get(&ActionKey { code, numlock })
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

/// Combines every row value with every column value, rows first.
fn product(rows: [f64; 3], cols: [f64; 3]) -> [(f64, f64); 9] {
    let mut out = [(0.0, 0.0); 9];
    for (i, row) in rows.into_iter().enumerate() {
        for (j, col) in cols.into_iter().enumerate() {
            out[i * 3 + j] = (row, col);
        }
    }
    out
}

/// The nine bed-leveling points as `(y, x)`, row-major over depth then width.
pub fn grid_positions(config: &Config) -> [(f64, f64); 9] {
    let bed = &config.bed;
    let margin = bed.side_margin;
    let depths = [margin, bed.depth / 2.0, bed.depth - margin];
    let widths = [margin, bed.width / 2.0, bed.width - margin];
    product(depths, widths)
}

/// The nine manual jog moves as `(dy, dx)`, in the same order as [grid_positions].
pub fn jog_deltas(config: &Config) -> [(f64, f64); 9] {
    let step = &config.jog;
    product([-step.y, 0.0, step.y], [-step.x, 0.0, step.x])
}

/// Builds the full key map for both num-lock states.
pub fn build_registry(config: &Config) -> Result<Registry, RegistryError> {
    use NumpadKey::*;

    let mut registry = Registry::new();

    for numlock in [true, false] {
        let home = |name: &str, axes: &[Axis]| {
            Action::tasks(name, Route::Printhead, vec![TaskDescriptor::home(axes)])
        };

        registry.register(ActionKey::new(Key0, numlock), home("Home XYZ", &[Axis::X, Axis::Y, Axis::Z]))?;
        registry.register(ActionKey::new(KeyDot, numlock), home("Home XY", &[Axis::X, Axis::Y]))?;
        registry.register(ActionKey::new(KeyEnter, numlock), home("Home Z", &[Axis::Z]))?;

        let (lower, raise) = if numlock {
            (
                Action::tasks("Lower Z", Route::Printhead, vec![TaskDescriptor::jog_relative(None, None, Some(-config.jog.z))]),
                Action::tasks("Raise Z", Route::Printhead, vec![TaskDescriptor::jog_relative(None, None, Some(config.jog.z))]),
            )
        } else {
            (
                Action::tasks("Retract", Route::Tool, vec![TaskDescriptor::extrude(-config.extrude.amount)]),
                Action::tasks("Extrude", Route::Tool, vec![TaskDescriptor::extrude(config.extrude.amount)]),
            )
        };
        registry.register(ActionKey::new(KeyMinus, numlock), lower)?;
        registry.register(ActionKey::new(KeyPlus, numlock), raise)?;

        registry.register(
            ActionKey::new(KeySlash, numlock),
            Action::callback("Toggle bed heater", Callback::ToggleBedTemperature),
        )?;
        registry.register(
            ActionKey::new(KeyAsterisk, numlock),
            Action::callback("Toggle tool heater", Callback::ToggleToolTemperature),
        )?;
        registry.register(
            ActionKey::new(KeyBackspace, numlock),
            Action::tasks("Disable steppers", Route::Command, vec![TaskDescriptor::gcode(&["M18"])]),
        )?;
    }

    let positions = grid_positions(config);
    let deltas = jog_deltas(config);
    for (key, ((y, x), (dy, dx))) in NumpadKey::GRID.into_iter().zip(positions.into_iter().zip(deltas)) {
        registry.register(
            ActionKey::new(key, true),
            Action::tasks(
                format!("Level {}", key.name()),
                Route::Printhead,
                vec![
                    TaskDescriptor::jog_absolute(None, None, Some(config.leveling.height)),
                    TaskDescriptor::jog_absolute(Some(x), Some(y), None),
                ],
            ),
        )?;
        registry.register(
            ActionKey::new(key, false),
            Action::tasks(
                format!("Jog {}", key.name()),
                Route::Printhead,
                vec![TaskDescriptor::jog_relative(Some(dx), Some(dy), None)],
            ),
        )?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks_of(registry: &Registry, key: NumpadKey, numlock: bool) -> Vec<TaskDescriptor> {
        match registry.get(key.code(), numlock) {
            Some(Action::Tasks { tasks, .. }) => tasks.clone(),
            other => panic!("expected tasks for {:?}, got {:?}", key, other),
        }
    }

    #[test]
    fn registers_every_key_for_both_states() {
        let registry = build_registry(&Config::default()).unwrap();
        // 8 fixed keys and 9 grid keys, each in two states.
        assert_eq!(registry.len(), 34);
        assert!(registry.get(NumpadKey::KeyNumLock.code(), true).is_none());
    }

    #[test]
    fn grid_positions_are_row_major_and_inside_margins() {
        let config = Config::default();
        let positions = grid_positions(&config);
        let (margin, width, depth) = (config.bed.side_margin, config.bed.width, config.bed.depth);

        assert_eq!(
            positions,
            [
                (40.0, 40.0), (40.0, 110.0), (40.0, 180.0),
                (110.0, 40.0), (110.0, 110.0), (110.0, 180.0),
                (180.0, 40.0), (180.0, 110.0), (180.0, 180.0),
            ]
        );
        for (y, x) in positions {
            assert!(x >= margin && x <= width - margin);
            assert!(y >= margin && y <= depth - margin);
        }
    }

    #[test]
    fn jog_deltas_follow_grid_order() {
        let mut config = Config::default();
        config.jog.x = 5.0;
        config.jog.y = 2.0;

        assert_eq!(
            jog_deltas(&config),
            [
                (-2.0, -5.0), (-2.0, 0.0), (-2.0, 5.0),
                (0.0, -5.0), (0.0, 0.0), (0.0, 5.0),
                (2.0, -5.0), (2.0, 0.0), (2.0, 5.0),
            ]
        );
    }

    #[test]
    fn leveling_key_raises_then_moves() {
        let config = Config::default();
        let registry = build_registry(&config).unwrap();

        assert_eq!(
            tasks_of(&registry, NumpadKey::Key1, true),
            vec![
                TaskDescriptor::jog_absolute(None, None, Some(10.0)),
                TaskDescriptor::jog_absolute(Some(40.0), Some(40.0), None),
            ]
        );
        assert_eq!(
            tasks_of(&registry, NumpadKey::Key9, true)[1],
            TaskDescriptor::jog_absolute(Some(180.0), Some(180.0), None)
        );
    }

    #[test]
    fn same_key_moves_in_corresponding_direction() {
        let registry = build_registry(&Config::default()).unwrap();

        assert_eq!(
            tasks_of(&registry, NumpadKey::Key1, false),
            vec![TaskDescriptor::jog_relative(Some(-10.0), Some(-10.0), None)]
        );
        assert_eq!(
            tasks_of(&registry, NumpadKey::Key6, false),
            vec![TaskDescriptor::jog_relative(Some(10.0), Some(0.0), None)]
        );
    }

    #[test]
    fn minus_and_plus_depend_on_numlock() {
        let registry = build_registry(&Config::default()).unwrap();

        assert_eq!(
            tasks_of(&registry, NumpadKey::KeyMinus, true),
            vec![TaskDescriptor::jog_relative(None, None, Some(-10.0))]
        );
        assert_eq!(
            tasks_of(&registry, NumpadKey::KeyPlus, false),
            vec![TaskDescriptor::extrude(5.0)]
        );
        match registry.get(NumpadKey::KeyMinus.code(), false) {
            Some(Action::Tasks { route, .. }) => assert_eq!(*route, Route::Tool),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn heater_keys_are_callbacks() {
        let registry = build_registry(&Config::default()).unwrap();
        for numlock in [true, false] {
            assert!(matches!(
                registry.get(NumpadKey::KeySlash.code(), numlock),
                Some(Action::Callback { callback: Callback::ToggleBedTemperature, .. })
            ));
            assert!(matches!(
                registry.get(NumpadKey::KeyAsterisk.code(), numlock),
                Some(Action::Callback { callback: Callback::ToggleToolTemperature, .. })
            ));
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        let key = ActionKey::new(NumpadKey::Key0, true);
        let action = Action::callback("Toggle bed heater", Callback::ToggleBedTemperature);

        registry.register(key, action.clone()).unwrap();
        let err = registry.register(key, action).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate { key, existing: "Toggle bed heater".to_string() }
        );
        assert_eq!(registry.len(), 1);
    }
}
