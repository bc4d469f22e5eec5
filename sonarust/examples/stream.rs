//! Auto-upload consumer: switch the module to pushed readings and drain
//! them

use std::time::Duration;

use sonarust::{Sensor, UploadMode};

#[tokio::main]
async fn main() -> sonarust::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::serial(&port, 9600);
    sensor.open().await?;

    // One frame every 500 ms
    sensor.set_upload_interval(5).await?;
    sensor.set_upload_mode(UploadMode::Auto).await?;
    println!("Streaming; press Ctrl-C to stop");

    loop {
        if let Some(sample) = sensor.poll_stream().await? {
            println!(
                "{}  (resync discards so far: {})",
                sample,
                sensor.stream_discarded()
            );
        }

        // Poll faster than the upload interval so the stream never backs up
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
