//! Configuration validation command.

use std::path::Path;

use crate::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate the configuration file without starting anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    output::note(&format!("Checking configuration: {}", path.display()));

    let config = Config::load(path)?;
    output::ok("Configuration file is valid");

    output::section("Summary");
    output::key_value("Source", &config.source.api_url);
    output::key_value("Markets/poll", config.source.limit);
    output::key_value("Poll interval", format!("{}ms", config.poll.interval_ms));
    output::key_value("Sync interval", format!("{}ms", config.sync.interval_ms));
    output::key_value("Max rows", config.sync.max_rows);
    output::key_value("Server", config.server.bind_addr());
    println!();

    if !config.sync.enabled {
        output::note("  Sheet sync: disabled");
    } else {
        let missing = config.sheets.missing();
        if missing.is_empty() {
            output::ok(&format!(
                "Sheet sync configured (worksheet \"{}\")",
                config.sheets.worksheet_title
            ));
        } else {
            output::warn("Sheet sync enabled but missing environment variables:");
            for var in missing {
                output::note(&format!("    - {var}"));
            }
        }
    }

    println!();
    output::note("Configuration is ready to use.");
    Ok(())
}
