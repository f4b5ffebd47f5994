use domlens_core::{Config, Paths};

pub async fn show() -> anyhow::Result<()> {
    let paths = Paths::new();
    let config = Config::load_or_default(&paths)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

pub async fn path() -> anyhow::Result<()> {
    let paths = Paths::new();
    println!("{}", paths.config_file().display());
    Ok(())
}
