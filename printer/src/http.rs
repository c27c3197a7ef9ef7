use std::fmt::{Debug, Formatter};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use crate::model::{BedResponse, ConnectionResponse, PrinterResponse};
use crate::{ConnectionSettings, ConnectionStatus, PrinterApi, PrinterError, PrinterResult, PrinterState, Route, TaskDescriptor};

const API_KEY_HEADER: &str = "X-Api-Key";

/// A [PrinterApi] talking to OctoPrint over HTTP.
pub struct HttpPrinter {
    client: Client,
    base_url: String,
    api_key: String,
    serial_port: Option<String>,
    baudrate: Option<u32>,
}

impl Debug for HttpPrinter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HttpPrinter({})", self.base_url)
    }
}

impl HttpPrinter {
    pub fn new(settings: &ConnectionSettings) -> PrinterResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PrinterError::Request(e.to_string()))?;

        Ok(HttpPrinter {
            client,
            base_url: settings.base_url(),
            api_key: settings.api_key.clone(),
            serial_port: settings.serial_port.clone(),
            baudrate: settings.baudrate,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn execute(&self, request: RequestBuilder) -> PrinterResult<Response> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| PrinterError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrinterError::Status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown").to_string(),
            ));
        }
        Ok(response)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> PrinterResult<T> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        self.execute(self.client.get(&url).query(query))?
            .json()
            .map_err(|e| PrinterError::Parse(e.to_string()))
    }

    fn post(&self, path: &str, body: &Value) -> PrinterResult<()> {
        let url = self.url(path);
        debug!("POST {} {}", url, body);
        self.execute(self.client.post(&url).json(body))?;
        Ok(())
    }
}

impl PrinterApi for HttpPrinter {
    fn connection(&self) -> PrinterResult<ConnectionStatus> {
        let response: ConnectionResponse = self.get("connection", &[])?;
        Ok(response.current)
    }

    fn connect(&self) -> PrinterResult<()> {
        let mut body = json!({ "command": "connect" });
        if let Some(port) = &self.serial_port {
            body["port"] = json!(port);
        }
        if let Some(baudrate) = self.baudrate {
            body["baudrate"] = json!(baudrate);
        }
        self.post("connection", &body)
    }

    fn printer_state(&self) -> PrinterResult<PrinterState> {
        let response: PrinterResponse = self.get("printer", &[("exclude", "temperature,sd")])?;
        Ok(response.state)
    }

    fn bed_target(&self) -> PrinterResult<f64> {
        let response: BedResponse = self.get(Route::Bed.path(), &[])?;
        Ok(response.bed.target.unwrap_or(0.0))
    }

    fn set_bed_target(&self, target: f64) -> PrinterResult<()> {
        self.post(Route::Bed.path(), &json!({ "command": "target", "target": target }))
    }

    fn tool_target(&self, tool: &str) -> PrinterResult<f64> {
        let response: Value = self.get(Route::Tool.path(), &[])?;
        let heater = response
            .get(tool)
            .ok_or_else(|| PrinterError::Parse(format!("no {} in tool state", tool)))?;
        Ok(heater.get("target").and_then(Value::as_f64).unwrap_or(0.0))
    }

    fn set_tool_target(&self, tool: &str, target: f64) -> PrinterResult<()> {
        let mut targets = Map::new();
        targets.insert(tool.to_string(), json!(target));
        self.post(
            Route::Tool.path(),
            &json!({ "command": "target", "targets": targets }),
        )
    }

    fn send(&self, route: Route, task: &TaskDescriptor) -> PrinterResult<()> {
        self.post(route.path(), &task.body())
    }
}
