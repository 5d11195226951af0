use crate::{
    configurator::DisplayConfigurator, control::ControlPlane, desired::DesiredConfiguration,
    error::TickError, identity::DeviceId, supervisor::Supervisor, sway::DisplayManager,
};
use log::{debug, error, info};
use std::{future::Future, time::Duration};
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The server had no usable document.
    NoUpdate,
    /// The document matches what was last applied.
    Unchanged,
    Applied,
}

/// Keeps the local layout in step with the server's document.
///
/// `last_applied` only ever holds a document whose apply ran to completion,
/// so a failed apply is retried in full on the next tick.
pub struct Synchronizer<C, D, S> {
    device: DeviceId,
    control: C,
    configurator: DisplayConfigurator<D, S>,
    last_applied: Option<DesiredConfiguration>,
}

impl<C, D, S> Synchronizer<C, D, S>
where
    C: ControlPlane,
    D: DisplayManager,
    S: Supervisor,
{
    pub fn new(device: DeviceId, control: C, configurator: DisplayConfigurator<D, S>) -> Self {
        Synchronizer {
            device,
            control,
            configurator,
            last_applied: None,
        }
    }

    pub fn last_applied(&self) -> Option<&DesiredConfiguration> {
        self.last_applied.as_ref()
    }

    pub async fn tick(&mut self, force_apply: bool) -> Result<TickOutcome, TickError> {
        let Some(desired) = self.control.fetch_config(&self.device).await else {
            return Ok(TickOutcome::NoUpdate);
        };
        if !force_apply && self.last_applied.as_ref() == Some(&desired) {
            debug!("configuration unchanged");
            return Ok(TickOutcome::Unchanged);
        }

        info!("applying new configuration");
        self.configurator.apply(&desired).await?;
        self.last_applied = Some(desired);
        Ok(TickOutcome::Applied)
    }

    /// Forced tick, then one tick per `interval` until `shutdown` resolves.
    ///
    /// Tick errors are logged and dropped. `shutdown` is only polled between
    /// ticks, never in the middle of an apply.
    pub async fn run<F>(&mut self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut force_apply = true;
        loop {
            if let Err(e) = self.tick(force_apply).await {
                error!("{:#}", anyhow::Error::from(e));
            }
            force_apply = false;
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down");
                    return;
                }
                _ = sleep(interval) => {}
            }
        }
    }
}
