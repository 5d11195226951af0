//! Recording fakes for the agent's collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use kiosk_displayd::{
    error::IpcError, CommandOutcome, ConfiguratorOptions, ControlPlane, DesiredConfiguration,
    DeviceId, DisplayConfigurator, DisplayManager, Monitor, Supervisor, Synchronizer,
};
use std::{
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TerminateAll(String),
    ResetDir(PathBuf),
    QueryOutputs,
    Command(String),
}

#[derive(Debug, Default)]
pub struct State {
    pub events: Vec<Event>,
    /// Document served by the fake control server.
    pub config: Option<DesiredConfiguration>,
    pub fetches: usize,
    pub registrations: usize,
    pub reported: Vec<Monitor>,
    pub outputs: Vec<Monitor>,
    /// Every IPC call fails at the transport level.
    pub unreachable: bool,
    /// Transport fails once this many commands have been sent.
    pub disconnect_after: Option<usize>,
    /// Commands containing this text are rejected by the manager.
    pub reject_containing: Option<String>,
}

impl State {
    pub fn commands(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Command(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn applies(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::TerminateAll(_)))
            .count()
    }

    fn sent_commands(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Command(_)))
            .count()
    }
}

pub type Shared = Arc<Mutex<State>>;

fn unreachable_error() -> IpcError {
    IpcError::Transport(Box::new(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "sway socket refused connection",
    )))
}

pub struct FakeControl(pub Shared);

#[async_trait]
impl ControlPlane for FakeControl {
    async fn register(&self, _device: &DeviceId) {
        self.0.lock().unwrap().registrations += 1;
    }

    async fn report_display(&self, _device: &DeviceId, monitor: &Monitor) {
        self.0.lock().unwrap().reported.push(monitor.clone());
    }

    async fn fetch_config(&self, _device: &DeviceId) -> Option<DesiredConfiguration> {
        let mut state = self.0.lock().unwrap();
        state.fetches += 1;
        state.config.clone()
    }
}

pub struct FakeDisplay(pub Shared);

#[async_trait]
impl DisplayManager for FakeDisplay {
    async fn outputs(&mut self) -> Result<Vec<Monitor>, IpcError> {
        let mut state = self.0.lock().unwrap();
        if state.unreachable {
            return Err(unreachable_error());
        }
        state.events.push(Event::QueryOutputs);
        Ok(state.outputs.clone())
    }

    async fn run_command(&mut self, command: &str) -> Result<Vec<CommandOutcome>, IpcError> {
        let mut state = self.0.lock().unwrap();
        if state.unreachable || state.disconnect_after == Some(state.sent_commands()) {
            return Err(unreachable_error());
        }
        state.events.push(Event::Command(command.to_string()));
        let rejected = state
            .reject_containing
            .as_deref()
            .is_some_and(|needle| command.contains(needle));
        if rejected {
            Ok(vec![CommandOutcome::failed("Invalid mode")])
        } else {
            Ok(vec![CommandOutcome::ok()])
        }
    }
}

pub struct FakeSupervisor(pub Shared);

#[async_trait]
impl Supervisor for FakeSupervisor {
    async fn terminate_all(&mut self, name: &str) {
        self.0
            .lock()
            .unwrap()
            .events
            .push(Event::TerminateAll(name.to_string()));
    }

    async fn reset_dir(&mut self, dir: &Path) -> io::Result<()> {
        self.0
            .lock()
            .unwrap()
            .events
            .push(Event::ResetDir(dir.to_path_buf()));
        Ok(())
    }
}

pub type FakeSynchronizer = Synchronizer<FakeControl, FakeDisplay, FakeSupervisor>;

pub fn options() -> ConfiguratorOptions {
    ConfiguratorOptions {
        browser: "chromium".to_string(),
        browser_args: vec!["--noerrdialogs".to_string()],
        profile_root: PathBuf::from("/tmp/chromium_userdata"),
        seat: "seat0".to_string(),
        hide_cursor_ms: 3000,
        settle_delay: Duration::ZERO,
    }
}

pub fn device() -> DeviceId {
    DeviceId::from_mac("dc:a6:32:00:11:22").unwrap()
}

pub fn monitor(name: &str) -> Monitor {
    Monitor {
        name: name.to_string(),
        modes: Vec::new(),
    }
}

pub fn configurator(state: &Shared) -> DisplayConfigurator<FakeDisplay, FakeSupervisor> {
    DisplayConfigurator::new(
        FakeDisplay(state.clone()),
        FakeSupervisor(state.clone()),
        options(),
    )
}

pub fn synchronizer(state: &Shared) -> FakeSynchronizer {
    Synchronizer::new(device(), FakeControl(state.clone()), configurator(state))
}

pub fn shared(outputs: &[&str]) -> Shared {
    let state = State {
        outputs: outputs.iter().map(|name| monitor(name)).collect(),
        ..State::default()
    };
    Arc::new(Mutex::new(state))
}

pub fn parse(json: &str) -> DesiredConfiguration {
    serde_json::from_str(json).unwrap()
}
