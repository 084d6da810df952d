use blocky_domain::{CliOverrides, Config};
use std::path::Path;
use tracing::info;

pub fn load_config(config_path: &Path, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;

    info!(
        config_file = %config_path.display(),
        udp_bind = %config.server.udp_bind,
        tcp_bind = %config.server.tcp_bind,
        "Configuration loaded"
    );

    Ok(config)
}
