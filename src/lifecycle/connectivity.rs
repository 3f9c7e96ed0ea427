//! Startup connectivity probe

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

/// Public DNS endpoint used as a reachability probe
const PROBE_ADDR: &str = "8.8.8.8:53";

/// Check whether the network is reachable within `timeout`
pub async fn check_internet(timeout: Duration) -> bool {
    probe(PROBE_ADDR, timeout).await
}

async fn probe(addr: &str, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!(addr, error = %e, "connectivity probe failed");
            false
        }
        Err(_) => {
            debug!(addr, "connectivity probe timed out");
            false
        }
    }
}
