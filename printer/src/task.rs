use std::fmt::{Display, Formatter};
use serde_json::{Map, Value, json};

/// The API endpoint a task is posted to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Route {
    Printhead,
    Tool,
    Bed,
    Command,
}

impl Route {
    /// Gets the path below `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            Route::Printhead => "printer/printhead",
            Route::Tool => "printer/tool",
            Route::Bed => "printer/bed",
            Route::Command => "printer/command",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// One printer command with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskDescriptor {
    /// Moves the print head. Axes left as `None` are not moved.
    Jog {
        absolute: bool,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    /// Homes the given axes.
    Home { axes: Vec<Axis> },
    /// Extrudes (positive) or retracts (negative) filament on the active tool.
    Extrude { amount: f64 },
    /// Raw G-code lines.
    Gcode { commands: Vec<String> },
}

impl TaskDescriptor {
    pub fn jog_absolute(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        TaskDescriptor::Jog { absolute: true, x, y, z }
    }

    pub fn jog_relative(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> Self {
        TaskDescriptor::Jog { absolute: false, x, y, z }
    }

    pub fn home(axes: &[Axis]) -> Self {
        TaskDescriptor::Home { axes: axes.to_vec() }
    }

    pub fn extrude(amount: f64) -> Self {
        TaskDescriptor::Extrude { amount }
    }

    pub fn gcode(commands: &[&str]) -> Self {
        TaskDescriptor::Gcode {
            commands: commands.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Gets the kind tag of the task.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskDescriptor::Jog { .. } => "jog",
            TaskDescriptor::Home { .. } => "home",
            TaskDescriptor::Extrude { .. } => "extrude",
            TaskDescriptor::Gcode { .. } => "gcode",
        }
    }

    /// Gets whether the task physically moves the printer.
    pub fn is_motion(&self) -> bool {
        !matches!(self, TaskDescriptor::Gcode { .. })
    }

    /// Builds the JSON request body for the task.
    pub fn body(&self) -> Value {
        match self {
            TaskDescriptor::Jog { absolute, x, y, z } => {
                let mut body = Map::new();
                body.insert("command".into(), json!("jog"));
                body.insert("absolute".into(), json!(absolute));
                for (axis, value) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
                    if let Some(value) = value {
                        body.insert(axis.as_str().into(), json!(value));
                    }
                }
                Value::Object(body)
            }
            TaskDescriptor::Home { axes } => {
                let axes: Vec<&str> = axes.iter().map(|axis| axis.as_str()).collect();
                json!({ "command": "home", "axes": axes })
            }
            TaskDescriptor::Extrude { amount } => json!({ "command": "extrude", "amount": amount }),
            TaskDescriptor::Gcode { commands } => json!({ "commands": commands }),
        }
    }
}
