use anyhow::Result;
use calmail_core::config::CalmailConfig;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = CalmailConfig::config_path()?;
    let config = CalmailConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Mailbox:   {}", config.mailbox_path().display());
    println!("  Calendar:  {}", config.calendar_path().display());
    println!();
    println!("{}", "Effective settings".bold());
    print!("{}", config.to_toml()?);

    Ok(())
}
