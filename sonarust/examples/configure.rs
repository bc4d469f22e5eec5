//! Configuration walk: address the module, tune its peripherals, change
//! the serial rate

use sonarust::{BaudRate, LedMode, RelayMode, Sensor};

#[tokio::main]
async fn main() -> sonarust::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::serial(&port, 9600);
    sensor.open().await?;

    sensor.set_address(0x0001).await?;
    println!("✓ Module now answers at 0x{:04X}", sensor.target_address());

    sensor.set_led(LedMode::Enabled).await?;
    println!("✓ Measurement LED enabled");

    sensor.set_relay(RelayMode::Disabled).await?;
    println!("✓ Relay output disabled");

    // Transport follows the module to the new rate before this returns
    sensor.set_baud_rate(BaudRate::B115200).await?;
    println!("✓ Link now running at {}", BaudRate::B115200);

    let sample = sensor.read_distance().await?;
    println!("✓ Reading at the new rate: {}", sample);

    sensor.close().await?;
    Ok(())
}
