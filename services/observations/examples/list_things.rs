//! List things and their data streams of the data source configured in env.
//!
//! ```shell
//! SENSORSIGN_SERVER_URL=https://api.example.com \
//! SENSORSIGN_CLIENT_ID=client \
//! SENSORSIGN_SECRET_KEY=c2VjcmV0LWtleQ== \
//! RUST_LOG=debug cargo run --example list_things
//! ```

use log::info;
use sensorsign_core::{Context, OsEnv, Result};
use sensorsign_http_send_reqwest::ReqwestHttpSend;
use sensorsign_observations::{Client, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::new(ctx.clone(), Config::new().from_env(&ctx));

    let health = client.check_health().await;
    info!("health: {:?} {}", health.status, health.message);
    if !health.is_ok() {
        return Ok(());
    }

    let resp = client.list_things().await?;
    println!("GET /sites -> {}", resp.status());
    println!("{}", String::from_utf8_lossy(resp.body()));

    for resource in client.list_things_with_data_streams().await? {
        println!(
            "{} ({}): {} data streams",
            resource.thing.name,
            resource.thing.id,
            resource.data_streams.len()
        );
        for ds in resource.data_streams {
            println!("  {} {} [{}]", ds.id, ds.name, ds.unit_of_measurement.symbol);
        }
    }

    Ok(())
}
