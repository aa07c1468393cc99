use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pms_core::{config::records_file_from_env_value, CoreConfig};

/// Main entry point for the PMS application
///
/// Resolves configuration once, then serves the REST API. The records file path is fixed
/// for the life of the process and handed to the single `PatientService` behind the router.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_RECORDS_FILE`: JSON records file (default: "patients.json")
/// - `RUST_LOG`: tracing filter (default adds `info` for the PMS crates)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_run=info".parse()?)
                .add_directive("pms_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let records_file = records_file_from_env_value(std::env::var("PATIENT_RECORDS_FILE").ok());

    let cfg = CoreConfig::new(records_file)?;
    tracing::info!("++ Using records file {}", cfg.records_file().display());

    api_rest::serve(&rest_addr, &cfg).await
}
