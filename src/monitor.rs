use crate::{control::ControlPlane, identity::DeviceId, modes::Mode, sway::DisplayManager};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use swayipc_async::Output;

/// A physical output as reported to the control server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Monitor {
    pub name: String,
    pub modes: Vec<Mode>,
}

impl Monitor {
    pub fn new(output: &Output) -> Monitor {
        Monitor {
            name: output.name.clone(),
            modes: output.modes.iter().map(Mode::from).collect(),
        }
    }
}

/// Reads the current outputs and posts each one to the control server.
///
/// Runs once; a display manager that cannot be queried is logged and skipped.
pub async fn report_monitors<C, D>(control: &C, device: &DeviceId, display: &mut D)
where
    C: ControlPlane + ?Sized,
    D: DisplayManager + ?Sized,
{
    let monitors = match display.outputs().await {
        Ok(monitors) => monitors,
        Err(e) => {
            warn!("unable to read outputs for reporting: {e}");
            return;
        }
    };
    info!("reporting {} monitors", monitors.len());
    for monitor in &monitors {
        control.report_display(device, monitor).await;
    }
}
