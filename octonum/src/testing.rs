//! In-memory stand-ins for the printer and the LED.

use std::cell::{Cell, RefCell};
use octonum_input::{Indicator, InputError, InputResult};
use octonum_printer::{ConnectionStatus, PrinterApi, PrinterError, PrinterFlags, PrinterResult, PrinterState, Route, TaskDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Connection,
    Connect,
    PrinterState,
    BedTarget,
    SetBedTarget(f64),
    ToolTarget(String),
    SetToolTarget(String, f64),
    Send(Route, TaskDescriptor),
}

impl Call {
    /// Gets whether the call changes anything on the printer.
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Call::Connect | Call::SetBedTarget(_) | Call::SetToolTarget(..) | Call::Send(..)
        )
    }
}

#[derive(Debug)]
pub struct FakePrinter {
    pub connected: Cell<bool>,
    pub connect_succeeds: Cell<bool>,
    /// Reports the `Connecting` handshake state while connected.
    pub handshaking: Cell<bool>,
    pub operational: Cell<bool>,
    pub unreachable: Cell<bool>,
    pub bed_target: Cell<f64>,
    pub tool_target: Cell<f64>,
    /// Zero-based index of the `send` call that should fail.
    pub fail_send: Cell<Option<usize>>,
    calls: RefCell<Vec<Call>>,
}

impl FakePrinter {
    pub fn ready() -> Self {
        FakePrinter {
            connected: Cell::new(true),
            connect_succeeds: Cell::new(false),
            handshaking: Cell::new(false),
            operational: Cell::new(true),
            unreachable: Cell::new(false),
            bed_target: Cell::new(0.0),
            tool_target: Cell::new(0.0),
            fail_send: Cell::new(None),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        let printer = Self::ready();
        printer.connected.set(false);
        printer.operational.set(false);
        printer
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn commands(&self) -> Vec<Call> {
        self.calls.borrow().iter().filter(|call| call.is_command()).cloned().collect()
    }

    pub fn sent(&self) -> Vec<(Route, TaskDescriptor)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Send(route, task) => Some((*route, task.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> PrinterResult<()> {
        self.calls.borrow_mut().push(call);
        if self.unreachable.get() {
            Err(PrinterError::Request("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PrinterApi for FakePrinter {
    fn connection(&self) -> PrinterResult<ConnectionStatus> {
        self.record(Call::Connection)?;
        let state = match (self.connected.get(), self.handshaking.get()) {
            (false, _) => "Closed",
            (true, true) => "Connecting",
            (true, false) => "Operational",
        };
        Ok(ConnectionStatus { state: state.to_string(), ..Default::default() })
    }

    fn connect(&self) -> PrinterResult<()> {
        self.record(Call::Connect)?;
        if self.connect_succeeds.get() {
            self.connected.set(true);
        }
        Ok(())
    }

    fn printer_state(&self) -> PrinterResult<PrinterState> {
        self.record(Call::PrinterState)?;
        let operational = self.operational.get();
        Ok(PrinterState {
            text: if operational { "Operational" } else { "Offline" }.to_string(),
            flags: PrinterFlags { operational, ..Default::default() },
        })
    }

    fn bed_target(&self) -> PrinterResult<f64> {
        self.record(Call::BedTarget)?;
        Ok(self.bed_target.get())
    }

    fn set_bed_target(&self, target: f64) -> PrinterResult<()> {
        self.record(Call::SetBedTarget(target))?;
        self.bed_target.set(target);
        Ok(())
    }

    fn tool_target(&self, tool: &str) -> PrinterResult<f64> {
        self.record(Call::ToolTarget(tool.to_string()))?;
        Ok(self.tool_target.get())
    }

    fn set_tool_target(&self, tool: &str, target: f64) -> PrinterResult<()> {
        self.record(Call::SetToolTarget(tool.to_string(), target))?;
        self.tool_target.set(target);
        Ok(())
    }

    fn send(&self, route: Route, task: &TaskDescriptor) -> PrinterResult<()> {
        let index = self.count(|call| matches!(call, Call::Send(..)));
        self.record(Call::Send(route, task.clone()))?;
        if self.fail_send.get() == Some(index) {
            return Err(PrinterError::Status(409, "Conflict".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeIndicator {
    pub writes: Vec<bool>,
    pub unavailable: bool,
    pub failing: bool,
}

impl Indicator for FakeIndicator {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn set(&mut self, on: bool) -> InputResult<()> {
        if self.failing {
            return Err(InputError::NotSupported);
        }
        self.writes.push(on);
        Ok(())
    }
}
