mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli::Cli;
use octofhir_booking::{BookingConfig, init_tracing_with_level, load_config_with_overrides};
use octofhir_scheduling::resource::encode_resource;
use octofhir_scheduling::{BookingOutcome, BookingPlan, BookingWorkflow, FhirClient};
use output::{print_error, print_json, print_selection, print_success};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Optional .env for local runs
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let cli = Cli::parse();

    let cfg = match load_config_with_overrides(cli.config.as_deref(), &cli.overrides()) {
        Ok(c) => c,
        Err(e) => {
            print_error(&format!("Configuration error: {e}"));
            std::process::exit(2);
        }
    };

    init_tracing_with_level(&cfg.logging.level);
    tracing::info!(server = %cfg.server.base_url, dry_run = cli.dry_run, "Starting booking run");

    if let Err(e) = run(&cli, &cfg).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, cfg: &BookingConfig) -> Result<()> {
    let client = FhirClient::new(&cfg.server.base_url);
    let workflow = BookingWorkflow::new(&client, cfg.identifier()).with_options(cfg.scan_options());

    if cli.dry_run {
        let prepared = match workflow.plan().await.context("Booking search failed")? {
            BookingPlan::Ready(prepared) => prepared,
            BookingPlan::NoFreeSchedule => anyhow::bail!(no_free_schedule(cfg)),
            BookingPlan::NoActivePatient => anyhow::bail!(no_active_patient(cfg)),
        };
        print_selection(&prepared);
        print_json(&encode_resource(&prepared.appointment)?)?;
        print_success("Dry run: appointment not submitted");
        return Ok(());
    }

    match workflow.book().await.context("Booking failed")? {
        BookingOutcome::Booked(booking) => {
            print_selection(&booking.prepared);
            print_success(&format!(
                "Created {}",
                booking.created.reference().cyan()
            ));
            println!("Got ID: {}", booking.created.id);
            Ok(())
        }
        BookingOutcome::NoFreeSchedule => anyhow::bail!(no_free_schedule(cfg)),
        BookingOutcome::NoActivePatient => anyhow::bail!(no_active_patient(cfg)),
    }
}

fn no_free_schedule(cfg: &BookingConfig) -> String {
    format!("No schedule with a free slot found on {}", cfg.server.base_url)
}

fn no_active_patient(cfg: &BookingConfig) -> String {
    format!("No active patient found on {}", cfg.server.base_url)
}
