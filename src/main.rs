use std::time::Duration;

use clap::Parser;
use form_builder::api::{client::HttpFormApi, enum_cache::EnumGroupCache};
use form_builder::cli::commands::{
    cmd_groups, cmd_import, cmd_load, cmd_new_element, cmd_preview, cmd_submit, write_output,
};
use form_builder::cli::config::{Cli, Commands, load_config};
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    // Resolve API settings: CLI > config > defaults
    let base_url = cli.api_url.as_deref().unwrap_or(config.api.base_url.as_str());
    let api = HttpFormApi::new(base_url, Duration::from_secs(config.api.timeout_secs));

    match cli.command {
        Commands::NewElement { element_type } => {
            println!("{}", cmd_new_element(&element_type)?);
        }
        Commands::Preview { sections, output } => {
            let (json, fingerprint) = cmd_preview(&sections, &config)?;
            write_output(output.as_deref(), &json)?;
            eprintln!("fingerprint: {}", fingerprint);
        }
        Commands::Import { sections, output } => {
            let json = cmd_import(&sections)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Submit { sections } => {
            let fingerprint = cmd_submit(&sections, &config, &api)?;
            println!("Submitted {} ({})", config.form.key, fingerprint);
        }
        Commands::Load {
            key,
            version,
            output,
        } => {
            let json = cmd_load(key.as_deref(), version.as_deref(), &config, &api)?;
            write_output(Some(&output), &json)?;
            println!("Wrote {}", output);
        }
        Commands::Groups { language } => {
            let mut cache = EnumGroupCache::default();
            for line in cmd_groups(language.as_deref(), &config, &api, &mut cache)? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
