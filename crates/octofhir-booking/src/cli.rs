use clap::Parser;
use octofhir_booking::ConfigOverrides;

#[derive(Parser)]
#[command(name = "octofhir-book")]
#[command(about = "Book the first free slot on a FHIR server for the first active patient")]
#[command(version)]
pub struct Cli {
    /// FHIR base URL (overrides config file and environment)
    #[arg(short, long, env = "OCTOFHIR_BOOKING_URL")]
    pub server: Option<String>,

    /// Path to a TOML config file (default: octofhir-book.toml if present)
    #[arg(short, long, env = "OCTOFHIR_BOOKING_CONFIG")]
    pub config: Option<String>,

    /// System of the identifier put on the new appointment
    #[arg(long)]
    pub identifier_system: Option<String>,

    /// Value of the identifier put on the new appointment
    #[arg(long)]
    pub identifier_value: Option<String>,

    /// Number of results per search page (_count)
    #[arg(long)]
    pub count: Option<u32>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Search and assemble, print the appointment, but do not create it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.server.clone(),
            identifier_system: self.identifier_system.clone(),
            identifier_value: self.identifier_value.clone(),
            page_size: self.count,
            log_level: self.log_level.clone(),
        }
    }
}
