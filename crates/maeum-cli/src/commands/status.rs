//! `maeum --status` -- backend health check.

use maeum_llm::{Generator, HttpBackend};
use maeum_types::config::Config;

/// Query the health endpoint once and print the result.
///
/// Returns whether the backend answered successfully.
pub async fn run(config: &Config) -> anyhow::Result<bool> {
    let backend = HttpBackend::new(&config.backend)?;
    println!("Backend:  {}", backend.base_url());
    println!("Timeout:  {}s", config.backend.timeout_secs);
    let online = match backend.health().await {
        Ok(()) => {
            println!("Status:   online");
            true
        }
        Err(e) => {
            println!("Status:   offline ({e})");
            false
        }
    };
    Ok(online)
}
