pub mod configurator;
pub mod control;
pub mod desired;
pub mod error;
pub mod identity;
pub mod modes;
pub mod monitor;
pub mod settings;
pub mod supervisor;
pub mod sway;
pub mod sync;

pub use configurator::{ConfiguratorOptions, DisplayConfigurator};
pub use control::{ControlPlane, HttpControlPlane};
pub use desired::{DesiredConfiguration, DisplayRule};
pub use identity::DeviceId;
pub use monitor::{report_monitors, Monitor};
pub use settings::Settings;
pub use supervisor::{Supervisor, SystemSupervisor};
pub use sway::{CommandOutcome, DisplayManager, SwayDisplayManager};
pub use sync::{Synchronizer, TickOutcome};
