use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::Result;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, init: bool, force: bool) -> Result<()> {
    if init {
        let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        Config::write_default(path, force)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = Config::load(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
