//! One-shot distance query over a serial port

use sonarust::Sensor;

#[tokio::main]
async fn main() -> sonarust::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    println!("Querying module on {}...", port);

    let mut sensor = Sensor::serial(&port, 9600);
    sensor.open().await?;

    let sample = sensor.read_distance().await?;
    println!("✓ {}", sample);

    sensor.close().await?;
    Ok(())
}
