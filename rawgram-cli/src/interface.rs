//! Network interface lookup

use pnet_datalink::interfaces;
use rawgram_core::{Error, MacAddr, Result};

/// Resolve the hardware address of a named interface
pub fn interface_mac(name: &str) -> Result<MacAddr> {
    let iface = interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;

    let mac = iface
        .mac
        .ok_or_else(|| Error::InvalidEndpoint(format!("interface '{name}' has no MAC address")))?;

    Ok(MacAddr::new(mac.octets()))
}
