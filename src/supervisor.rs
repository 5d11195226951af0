use async_trait::async_trait;
use log::{debug, warn};
use std::{io, path::Path};
use tokio::{fs, process::Command};

/// Local process and filesystem side effects of an apply.
#[async_trait]
pub trait Supervisor: Send {
    /// Kills every running process called `name`. Best effort.
    async fn terminate_all(&mut self, name: &str);

    /// Deletes `dir` if it exists and creates it again, empty.
    async fn reset_dir(&mut self, dir: &Path) -> io::Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemSupervisor;

#[async_trait]
impl Supervisor for SystemSupervisor {
    async fn terminate_all(&mut self, name: &str) {
        match Command::new("killall").arg(name).status().await {
            Ok(status) if status.success() => debug!("killed running {name} instances"),
            // killall exits non-zero when nothing matched
            Ok(status) => debug!("killall {name} exited with {status}"),
            Err(e) => warn!("unable to run killall {name}: {e}"),
        }
    }

    async fn reset_dir(&mut self, dir: &Path) -> io::Result<()> {
        match fs::remove_dir_all(dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(dir).await
    }
}
