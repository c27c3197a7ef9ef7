use std::env::var_os;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Serialize, Deserialize};

const DEFAULT_CONFIG_FILE: &str = "octonum.json";

/// Printer geometry, step sizes and dispatch policy, stored as JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bed: BedGeometry,
    pub jog: JogSteps,
    pub leveling: Leveling,
    pub extrude: Extrusion,
    pub temperatures: Temperatures,
    pub policy: Policy,
    /// Minimum time between two connect attempts.
    pub connect_retry_secs: u64,
    /// Repeated presses of the same key within this window are ignored.
    pub debounce_ms: u64,
}

/// Bed size in millimetres.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BedGeometry {
    pub width: f64,
    pub depth: f64,
    pub max_height: f64,
    /// Inset of the outer leveling points from the bed edges.
    pub side_margin: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct JogSteps {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Leveling {
    /// Z height the nozzle is raised to before moving to a leveling point.
    pub height: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Extrusion {
    pub amount: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Temperatures {
    pub bed_on: f64,
    pub tool_on: f64,
    pub tool: String,
}

/// Which guards apply to which actions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Policy {
    pub heaters_require_operational: bool,
    pub steppers_require_operational: bool,
    /// Reject relative jogs and extrusions larger than the configured steps.
    pub check_relative_bounds: bool,
}

impl Config {
    /// Loads the config from `CONFIG_FILE`. `Ok(None)` means there is no such file.
    pub fn try_load() -> std::io::Result<Option<Self>> {
        Self::try_load_from(&Self::path())
    }

    /// Loads the config from the given file. A file that exists but does not parse is an error,
    /// so it never gets replaced by the defaults.
    pub fn try_load_from(config_path: &Path) -> std::io::Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }
        let file = std::fs::File::open(config_path)?;
        let reader = std::io::BufReader::new(file);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    /// Gets the path used by [Config::try_load] and [Config::save].
    pub fn path() -> PathBuf {
        var_os("CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn save(&self) -> std::io::Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, config_path: &Path) -> std::io::Result<()> {
        let file = std::fs::File::create(config_path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn connect_retry(&self) -> Duration {
        Duration::from_secs(self.connect_retry_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bed: BedGeometry::default(),
            jog: JogSteps::default(),
            leveling: Leveling::default(),
            extrude: Extrusion::default(),
            temperatures: Temperatures::default(),
            policy: Policy::default(),
            connect_retry_secs: 30,
            debounce_ms: 100,
        }
    }
}

impl Default for BedGeometry {
    fn default() -> Self {
        BedGeometry {
            width: 220.0,
            depth: 220.0,
            max_height: 250.0,
            side_margin: 40.0,
        }
    }
}

impl Default for JogSteps {
    fn default() -> Self {
        JogSteps { x: 10.0, y: 10.0, z: 10.0 }
    }
}

impl Default for Leveling {
    fn default() -> Self {
        Leveling { height: 10.0 }
    }
}

impl Default for Extrusion {
    fn default() -> Self {
        Extrusion { amount: 5.0 }
    }
}

impl Default for Temperatures {
    fn default() -> Self {
        Temperatures {
            bed_on: 60.0,
            tool_on: 200.0,
            tool: "tool0".to_string(),
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            heaters_require_operational: false,
            steppers_require_operational: false,
            check_relative_bounds: true,
        }
    }
}
