use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use keymapp_client::{KeymappClient, Rgb};

const BLINK_INTERVAL: Duration = Duration::from_millis(1000);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let client = match std::env::args().nth(1) {
        Some(address) => KeymappClient::connect(address).await?,
        None => KeymappClient::connect_default().await?,
    };

    let status = client.get_status().await?;
    println!("Keymapp {}: {:?}", status.version, status.keyboard);

    client.connect_any_keyboard().await?;
    println!("successful connection");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            result = blink(&client) => result?,
        }
    }

    client.close();
    Ok(())
}

async fn blink(client: &KeymappClient) -> Result<(), Box<dyn Error>> {
    client.set_rgb_all(Rgb::WHITE).await?;
    tokio::time::sleep(BLINK_INTERVAL).await;
    client.set_rgb_all(Rgb::RED).await?;
    tokio::time::sleep(BLINK_INTERVAL).await;
    Ok(())
}
