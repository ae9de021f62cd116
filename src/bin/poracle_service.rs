use poracle::{http::search_url, spawn_service, CbcPaddingOracle, DEMO_IV, DEMO_KEY, DEMO_MESSAGE};

use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());

    let data = CbcPaddingOracle::new(DEMO_KEY, DEMO_IV).seal(DEMO_MESSAGE)?;
    info!("using key: {:?}", String::from_utf8_lossy(&DEMO_KEY));
    info!("using iv: {:?}", String::from_utf8_lossy(&DEMO_IV));
    info!("using flag: {:?}", String::from_utf8_lossy(DEMO_MESSAGE));

    let base = spawn_service(address, DEMO_KEY).await?;
    info!("query should be: {}", search_url(&base, &data));

    tokio::signal::ctrl_c().await?;
    Ok(())
}
