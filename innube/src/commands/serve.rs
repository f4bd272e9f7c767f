use innube_config::Config;
use tracing::{info, warn};

use crate::environment;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    if config.email.api_key.is_none() {
        warn!(
            "No email provider api key configured ({}), contact messages will be rejected",
            innube_config::API_KEY_ENV
        );
    }

    let server = environment::rest_server(&config)?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
