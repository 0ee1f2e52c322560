//! Interfaces command - list what can be captured on

use anyhow::Result;
use colored::Colorize;
use switchyard_core::InterfaceType;
use switchyard_platform::discovery;

/// Execute interfaces command
pub fn execute() -> Result<()> {
    let interfaces = discovery::interfaces();
    if interfaces.is_empty() {
        println!("No network interfaces found");
        return Ok(());
    }

    for iface in interfaces {
        let kind = match iface.iface_type {
            InterfaceType::Loopback => iface.iface_type.to_string().dimmed(),
            InterfaceType::Wireless => iface.iface_type.to_string().yellow(),
            _ => iface.iface_type.to_string().normal(),
        };
        let mac = iface
            .mac
            .map_or_else(|| "-".to_string(), |mac| mac.to_string());
        let ips: Vec<String> = iface.ips.iter().map(ToString::to_string).collect();

        println!(
            "{:>3}  {:<16} {:<9} {}  {}",
            iface.index,
            iface.name.green().bold(),
            kind,
            mac,
            if ips.is_empty() { "-".to_string() } else { ips.join(", ") }
        );
    }
    Ok(())
}
