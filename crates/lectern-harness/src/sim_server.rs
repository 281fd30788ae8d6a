//! Real server loop over turmoil's simulated TCP.
//!
//! The production server speaks QUIC; here each simulated TCP stream stands
//! in for one participant stream and is handed to the same
//! [`serve_stream`] the QUIC runtime uses.

use lectern_core::{ClaimSecret, Environment};
use lectern_server::{DriverConfig, ServerDriver, SharedDriver, serve_stream, shared};
use turmoil::net::TcpListener;

use crate::sim_env::SimEnv;

/// Port simulated servers listen on.
pub const SIM_PORT: u16 = 4433;

/// Build a shared driver for simulation.
pub fn create_shared_driver(env: SimEnv, secret: &str) -> SharedDriver<SimEnv> {
    shared(ServerDriver::new(env, DriverConfig::default(), ClaimSecret::new(secret)))
}

/// Accept participants on `SIM_PORT` forever.
///
/// Connection ids are drawn from `env`, so a run is reproducible from the
/// environment's seed.
pub async fn run_sim_server(
    env: SimEnv,
    driver: SharedDriver<SimEnv>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(("0.0.0.0", SIM_PORT)).await?;

    loop {
        let (stream, peer) = listener.accept().await?;
        let conn_id = env.random_u64();
        tracing::debug!(conn_id, %peer, "simulated participant accepted");

        let (reader, writer) = stream.into_split();
        let driver = driver.clone();
        tokio::spawn(async move {
            if let Err(e) = serve_stream(conn_id, reader, writer, driver).await {
                tracing::debug!(conn_id, "participant refused: {}", e);
            }
        });
    }
}
