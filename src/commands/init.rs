use crate::config::{self, CONFIG_FILE_NAME};
use crate::io;
use anyhow::Result;
use std::path::PathBuf;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if io::file_exists(&config_path) && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, &config::default_config_toml())?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
