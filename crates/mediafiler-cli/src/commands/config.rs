//! Config command implementation.

use anyhow::Result;

use mediafiler_core::config::Config;

use super::ConfigArgs;

/// Run the config command.
pub async fn run(args: ConfigArgs) -> Result<()> {
    let path = Config::config_path();
    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    let config = super::load_config();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, using defaults)", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
