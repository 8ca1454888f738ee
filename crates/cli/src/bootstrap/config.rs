use reflector_dns_domain::{CliOverrides, Config};

/// Loads the configuration and validates it. Runs before logging exists, so
/// failures are reported by the caller on stderr.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}
