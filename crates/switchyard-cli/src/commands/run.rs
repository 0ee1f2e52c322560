//! Run command - capture and print packets

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::time::Duration;
use switchyard_core::Config;
use switchyard_platform::{LiveNet, PlatformError, ReceivedPacket};
use tracing::{debug, info, warn};

/// How long one receive waits before checking the packet budget again
const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Run command arguments
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Stop after this many packets
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Open the devices, then shut down without capturing
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the run command
pub fn execute(args: &RunArgs, config: Config) -> Result<()> {
    info!("Starting switchyard...");

    let net = LiveNet::open(&config).context("Failed to open capture devices")?;
    for iface in net.interfaces() {
        debug!(interface = %iface, "Capturing");
    }
    info!(
        name = net.name(),
        devices = net.interfaces().len(),
        "Capture devices ready"
    );

    // Dry run check
    if args.dry_run {
        warn!("Dry run mode - devices opened successfully, shutting down");
        net.shutdown();
        return Ok(());
    }

    // Set up signal handler
    if let Err(e) = net.shutdown_handle().install_signal_handler() {
        net.shutdown();
        return Err(e).context("Failed to set signal handler");
    }

    let result = receive_loop(&net, args.count);
    net.shutdown();

    let received = result?;
    info!(received, "switchyard stopped");
    Ok(())
}

fn receive_loop(net: &LiveNet, count: Option<u64>) -> Result<u64> {
    let mut received = 0u64;
    loop {
        if count.is_some_and(|max| received >= max) {
            break;
        }
        match net.recv_packet(Some(RECV_TIMEOUT)) {
            Ok(packet) => {
                received += 1;
                print_packet(&packet);
            }
            Err(e) if e.is_retryable() => continue,
            Err(PlatformError::Shutdown) => break,
            Err(e) => return Err(e).context("Failed to receive packet"),
        }
    }
    Ok(received)
}

fn print_packet(received: &ReceivedPacket) {
    println!(
        "{:.6} {} {}",
        received.timestamp,
        received.ingress.cyan(),
        received.packet
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use switchyard_core::Interface;
    use switchyard_platform::{CaptureDevice, MockDevice};

    fn single_device() -> (LiveNet, Arc<MockDevice>) {
        let device = Arc::new(MockDevice::ethernet("eth0"));
        let handle: Arc<dyn CaptureDevice> = device.clone();
        let net = LiveNet::with_devices(
            Some("test".into()),
            vec![(Interface::new("eth0", None, 1), handle)],
            Duration::from_millis(5),
        )
        .unwrap();
        (net, device)
    }

    #[test]
    fn test_receive_loop_stops_at_count() {
        let (net, device) = single_device();
        for ts in 0..3 {
            device.inject_frame(f64::from(ts), vec![0u8; 60]);
        }

        assert_eq!(receive_loop(&net, Some(2)).unwrap(), 2);
        net.shutdown();
        assert_eq!(receive_loop(&net, None).unwrap(), 0);
    }

    #[test]
    fn test_receive_loop_waits_through_timeouts() {
        let (net, device) = single_device();
        let late = std::thread::spawn(move || {
            std::thread::sleep(RECV_TIMEOUT + Duration::from_millis(300));
            device.inject_frame(1.0, vec![0u8; 60]);
        });

        assert_eq!(receive_loop(&net, Some(1)).unwrap(), 1);
        late.join().unwrap();
    }
}
