use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use blebridge::{
    session, Bridge, BridgeConfig, DeviceSighting, DiscoveryAdapter, PlatformConfig, Request,
    Response, ScanEvent,
};
use tracing::{info, metadata::LevelFilter};

/// Adapter that replays a scripted set of advertisements, standing in for a real radio.
struct ScriptedAdapter {
    events: async_channel::Sender<ScanEvent>,
}

impl DiscoveryAdapter for ScriptedAdapter {
    fn is_enabled(&self) -> bool {
        true
    }

    fn enable(&self) -> blebridge::Result<()> {
        Ok(())
    }

    fn begin_discovery(&self) {
        let events = self.events.clone();
        tokio::spawn(async move {
            let nearby = [
                DeviceSighting::new("Pixel Buds".to_string(), "11:22:33:44:55:66"),
                DeviceSighting::new(None, "AA:BB:CC:DD:EE:FF"),
                // Re-advertised; the session keeps a single entry per address.
                DeviceSighting::new("Pixel Buds".to_string(), "11:22:33:44:55:66"),
                DeviceSighting::new("Watch".to_string(), "01:23:45:67:89:AB"),
            ];
            for sighting in nearby {
                tokio::time::sleep(Duration::from_millis(150)).await;
                events.try_send(ScanEvent::Sighting(sighting)).ok();
            }
        });
    }

    fn end_discovery(&self) {}

    fn paired_devices(&self) -> Vec<DeviceSighting> {
        vec![DeviceSighting::new("Keyboard".to_string(), "00:11:22:33:44:55")]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let (sender, receiver) = session::event_channel();
    let bridge = Bridge::with_config(BridgeConfig {
        adapter: Some(Arc::new(ScriptedAdapter { events: sender })),
        platform: PlatformConfig { api_level: 34 },
        scan_period: Duration::from_secs(2),
        ..BridgeConfig::default()
    });

    let pump_session = bridge.session().clone();
    tokio::spawn(async move { pump_session.pump(receiver).await });

    if let Response::Devices(paired) = bridge.handle(Request::GetPairedDevices)? {
        for label in paired {
            info!("paired: {label}");
        }
    }

    info!("starting scan");
    bridge.handle(Request::StartScan)?;
    while bridge.session().is_scanning() {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    if let Response::Devices(found) = bridge.handle(Request::GetScanResults)? {
        for label in found {
            info!("found: {label}");
        }
    }

    Ok(())
}
