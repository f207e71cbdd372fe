use clap::Parser;
use digest_core::config::canonical_key;

/// Summarise recent task outcomes for the suburb discovery and business
/// outreach agents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Window size in hours
    ///
    /// Example: digest_cli 48
    #[arg(allow_negative_numbers = true, value_name = "HOURS")]
    pub hours: Option<String>,

    /// Output JSON
    #[arg(long, conflicts_with = "detailed")]
    pub json: bool,

    /// Print per-agent breakdowns instead of the compact report
    #[arg(long)]
    pub detailed: bool,

    /// Do not update the notes document
    #[arg(long = "no-note")]
    pub no_note: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursChoice {
    pub hours: u32,
    pub warning: Option<String>,
}

/// Uses `raw` when it is a positive integer, otherwise the default with a
/// warning to show the user.
pub fn resolve_hours(raw: Option<&str>, default_hours: u32) -> HoursChoice {
    let Some(raw) = raw else {
        return HoursChoice {
            hours: default_hours,
            warning: None,
        };
    };

    match raw.trim().parse::<u32>() {
        Ok(hours) if hours > 0 => HoursChoice {
            hours,
            warning: None,
        },
        _ => HoursChoice {
            hours: default_hours,
            warning: Some(format!(
                "Invalid hours value: {raw}, using default {default_hours}"
            )),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub key: String,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let key = canonical_key(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    Ok(ParsedConfigOverride {
        key,
        value: value_raw.trim().to_string(),
    })
}
