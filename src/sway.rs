use crate::{error::IpcError, monitor::Monitor};
use async_trait::async_trait;
use log::{debug, info, warn};
use swayipc_async::Connection;

/// Acknowledgement of a single command sent to the display manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn ok() -> CommandOutcome {
        CommandOutcome {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> CommandOutcome {
        CommandOutcome {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Window/output manager that accepts textual commands.
///
/// `Err` means the manager could not be talked to at all; a command the
/// manager rejected comes back as an unsuccessful `CommandOutcome`.
#[async_trait]
pub trait DisplayManager: Send {
    async fn outputs(&mut self) -> Result<Vec<Monitor>, IpcError>;

    async fn run_command(&mut self, command: &str) -> Result<Vec<CommandOutcome>, IpcError>;
}

/// Talks to sway over its IPC socket.
///
/// The connection is opened on first use and dropped after a transport
/// failure, so the next call reconnects (e.g. after sway restarted).
#[derive(Debug, Default)]
pub struct SwayDisplayManager {
    sway_connection: Option<Connection>,
}

impl SwayDisplayManager {
    pub fn new() -> SwayDisplayManager {
        SwayDisplayManager {
            sway_connection: None,
        }
    }

    async fn connection(&mut self) -> Result<&mut Connection, IpcError> {
        let connection = match self.sway_connection.take() {
            Some(connection) => connection,
            None => {
                let connection = Connection::new()
                    .await
                    .map_err(|e| IpcError::Connect(Box::new(e)))?;
                info!("connected to sway ipc");
                connection
            }
        };
        Ok(self.sway_connection.insert(connection))
    }

    fn transport_failed(&mut self, e: swayipc_async::Error) -> IpcError {
        warn!("dropping sway ipc connection: {e}");
        self.sway_connection = None;
        IpcError::Transport(Box::new(e))
    }
}

#[async_trait]
impl DisplayManager for SwayDisplayManager {
    async fn outputs(&mut self) -> Result<Vec<Monitor>, IpcError> {
        let result = self.connection().await?.get_outputs().await;
        let outputs = result.map_err(|e| self.transport_failed(e))?;
        let monitors: Vec<Monitor> = outputs.iter().map(Monitor::new).collect();
        debug!("monitors info: {:#?}", monitors);
        Ok(monitors)
    }

    async fn run_command(&mut self, command: &str) -> Result<Vec<CommandOutcome>, IpcError> {
        let result = self.connection().await?.run_command(command).await;
        let replies = result.map_err(|e| self.transport_failed(e))?;
        Ok(replies
            .into_iter()
            .map(|reply| match reply {
                Ok(()) => CommandOutcome::ok(),
                Err(e) => CommandOutcome::failed(e.to_string()),
            })
            .collect())
    }
}
