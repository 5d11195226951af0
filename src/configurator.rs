use crate::{
    desired::{DesiredConfiguration, DisplayRule},
    error::IpcError,
    settings::Settings,
    supervisor::Supervisor,
    sway::DisplayManager,
};
use log::{debug, info, warn};
use std::{path::PathBuf, time::Duration};
use tokio::time::sleep;

/// Fixed parameters of an apply run.
#[derive(Debug, Clone)]
pub struct ConfiguratorOptions {
    pub browser: String,
    pub browser_args: Vec<String>,
    pub profile_root: PathBuf,
    pub seat: String,
    pub hide_cursor_ms: u32,
    pub settle_delay: Duration,
}

impl From<&Settings> for ConfiguratorOptions {
    fn from(settings: &Settings) -> Self {
        ConfiguratorOptions {
            browser: settings.browser.binary.clone(),
            browser_args: settings.browser.args.clone(),
            profile_root: settings.browser.profile_root.clone(),
            seat: settings.display.seat.clone(),
            hide_cursor_ms: settings.display.hide_cursor_ms,
            settle_delay: Duration::from_millis(settings.display.settle_delay_ms),
        }
    }
}

/// Pushes a desired configuration into sway and the browser processes.
pub struct DisplayConfigurator<D, S> {
    display: D,
    supervisor: S,
    options: ConfiguratorOptions,
}

impl<D: DisplayManager, S: Supervisor> DisplayConfigurator<D, S> {
    pub fn new(display: D, supervisor: S, options: ConfiguratorOptions) -> Self {
        DisplayConfigurator {
            display,
            supervisor,
            options,
        }
    }

    /// Runs the whole procedure once, rule by rule in document order.
    ///
    /// Commands sway rejects are logged and skipped. Losing the IPC
    /// connection aborts the run; nothing is rolled back.
    pub async fn apply(&mut self, desired: &DesiredConfiguration) -> Result<(), IpcError> {
        self.supervisor.terminate_all(&self.options.browser).await;
        if let Err(e) = self.supervisor.reset_dir(&self.options.profile_root).await {
            warn!(
                "unable to reset browser profiles in {}: {e}",
                self.options.profile_root.display()
            );
        }

        for rule in &desired.displays {
            self.apply_rule(rule).await?;
            sleep(self.options.settle_delay).await;
        }
        info!("applied configuration for {} displays", desired.displays.len());
        Ok(())
    }

    async fn apply_rule(&mut self, rule: &DisplayRule) -> Result<(), IpcError> {
        let outputs = self.display.outputs().await?;
        if !outputs.iter().any(|o| o.name == rule.name) {
            warn!("output {} is not connected, configuring it anyway", rule.name);
        }
        info!("configuring display {}", rule.name);

        self.run(&rule.build_transform_cmd()).await?;
        if let Some(cmd) = rule.build_mode_cmd() {
            self.run(&cmd).await?;
        }
        self.run(&rule.build_workspace_output_cmd()).await?;
        self.run(&rule.build_workspace_cmd()).await?;
        let hide_cursor = format!(
            "seat {} hide_cursor {}",
            self.options.seat, self.options.hide_cursor_ms
        );
        self.run(&hide_cursor).await?;
        self.run(&rule.build_assign_cmd()).await?;

        let exec = rule.build_exec_cmd(
            &self.options.browser,
            &self.options.browser_args,
            &self.options.profile_root,
        );
        if let Some(cmd) = exec {
            self.run(&cmd).await?;
        }
        Ok(())
    }

    async fn run(&mut self, cmd: &str) -> Result<(), IpcError> {
        let outcomes = self.display.run_command(cmd).await?;
        for outcome in outcomes {
            if outcome.success {
                debug!("{cmd}: {:?}", outcome);
            } else {
                warn!(
                    "{cmd}: {}",
                    outcome.error.as_deref().unwrap_or("command failed")
                );
            }
        }
        Ok(())
    }
}
