use crate::error::IdentityError;
use log::{debug, info};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

const SYS_NET: &str = "/sys/class/net";
const ROUTE_TABLE: &str = "/proc/net/route";
const NULL_ADDRESS: &str = "00:00:00:00:00:00";

/// Hardware address of this machine, as the control server knows it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Upper-cases the first character and lower-cases the rest.
    pub fn from_mac(mac: &str) -> Option<DeviceId> {
        let mac = mac.trim();
        let mut chars = mac.chars();
        let first = chars.next()?;
        let normalized: String = first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect();
        Some(DeviceId(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the device id from the live system.
pub fn resolve(interface: Option<&str>) -> Result<DeviceId, IdentityError> {
    resolve_from(Path::new(SYS_NET), Path::new(ROUTE_TABLE), interface)
}

/// Resolves the device id against an arbitrary sysfs net directory and route
/// table, preferring `interface`, then the default-route interface, then the
/// first non-loopback interface by name.
pub fn resolve_from(
    sys_net: &Path,
    route_table: &Path,
    interface: Option<&str>,
) -> Result<DeviceId, IdentityError> {
    if let Some(iface) = interface {
        let id = read_address(sys_net, iface)?
            .ok_or_else(|| IdentityError::NoAddress(iface.to_string()))?;
        info!("using hardware address of configured interface {iface}: {id}");
        return Ok(id);
    }

    if let Some(iface) = default_route_interface(route_table) {
        if let Ok(Some(id)) = read_address(sys_net, &iface) {
            info!("using hardware address of default route interface {iface}: {id}");
            return Ok(id);
        }
        debug!("default route interface {iface} has no hardware address");
    }

    let entries = fs::read_dir(sys_net).map_err(|source| IdentityError::Read {
        path: sys_net.to_path_buf(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name != "lo")
        .collect();
    names.sort();

    for name in names {
        if let Ok(Some(id)) = read_address(sys_net, &name) {
            info!("using hardware address of interface {name}: {id}");
            return Ok(id);
        }
    }
    Err(IdentityError::NoInterface)
}

fn read_address(sys_net: &Path, iface: &str) -> Result<Option<DeviceId>, IdentityError> {
    let path: PathBuf = sys_net.join(iface).join("address");
    let raw = fs::read_to_string(&path).map_err(|source| IdentityError::Read { path, source })?;
    let raw = raw.trim();
    if raw.is_empty() || raw == NULL_ADDRESS {
        return Ok(None);
    }
    Ok(DeviceId::from_mac(raw))
}

/// Name of the interface holding the `0.0.0.0` destination in a
/// `/proc/net/route` formatted table.
fn default_route_interface(route_table: &Path) -> Option<String> {
    let table = fs::read_to_string(route_table).ok()?;
    table
        .lines()
        .skip(1)
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .find(|cols| cols.len() > 1 && cols[1] == "00000000")
        .map(|cols| cols[0].to_string())
}
