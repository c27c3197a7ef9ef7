use serde::{Deserialize, Serialize};

/// The `current` block of `GET /api/connection`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub state: String,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub baudrate: Option<u32>,
    #[serde(default)]
    pub printer_profile: Option<String>,
}

impl ConnectionStatus {
    /// Gets whether OctoPrint holds an established connection to the printer.
    ///
    /// `Closed`, `Offline…` and `Error…` do not count. Neither do the handshake states
    /// (`Opening serial connection`, `Connecting`, `Detecting baudrate`), since OctoPrint answers
    /// commands with 409 until the handshake is done.
    pub fn is_connected(&self) -> bool {
        let state = self.state.as_str();
        !(state.is_empty()
            || state == "Closed"
            || state.starts_with("Offline")
            || state.starts_with("Error")
            || state.starts_with("Opening")
            || state.starts_with("Connecting")
            || state.starts_with("Detecting"))
    }
}

#[derive(Deserialize)]
pub(crate) struct ConnectionResponse {
    pub current: ConnectionStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterFlags {
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub printing: bool,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub closed_or_error: bool,
}

/// The `state` block of `GET /api/printer`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterState {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub flags: PrinterFlags,
}

#[derive(Deserialize)]
pub(crate) struct PrinterResponse {
    pub state: PrinterState,
}

/// Actual and target temperature of one heater. OctoPrint sends `null` for unknown values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct HeaterTemperature {
    #[serde(default)]
    pub target: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct BedResponse {
    pub bed: HeaterTemperature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connection_states() {
        let status = |state: &str| ConnectionStatus { state: state.to_string(), ..Default::default() };
        assert!(status("Operational").is_connected());
        assert!(status("Printing").is_connected());
        assert!(!status("Closed").is_connected());
        assert!(!status("Offline after error").is_connected());
        assert!(!status("Error: Failed to autodetect serial port").is_connected());
    }

    #[test]
    fn handshake_is_not_connected() {
        let status = |state: &str| ConnectionStatus { state: state.to_string(), ..Default::default() };
        assert!(!status("Opening serial connection").is_connected());
        assert!(!status("Connecting").is_connected());
        assert!(!status("Detecting baudrate").is_connected());
    }

    #[test]
    fn parses_printer_response() {
        let value = json!({
            "state": {
                "text": "Operational",
                "flags": {
                    "operational": true,
                    "paused": false,
                    "printing": false,
                    "cancelling": false,
                    "sdReady": true,
                    "error": false,
                    "ready": true,
                    "closedOrError": false
                }
            }
        });
        let response: PrinterResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.state.text, "Operational");
        assert!(response.state.flags.operational);
        assert!(response.state.flags.ready);
    }

    #[test]
    fn parses_connection_response() {
        let value = json!({
            "current": {
                "state": "Operational",
                "port": "/dev/ttyACM0",
                "baudrate": 250000,
                "printerProfile": "_default"
            },
            "options": {}
        });
        let response: ConnectionResponse = serde_json::from_value(value).unwrap();
        assert_eq!(response.current.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(response.current.printer_profile.as_deref(), Some("_default"));
    }

    #[test]
    fn bed_target_may_be_null() {
        let response: BedResponse =
            serde_json::from_value(json!({ "bed": { "actual": 21.3, "target": null } })).unwrap();
        assert_eq!(response.bed.target, None);
    }
}
