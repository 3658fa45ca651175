use anyhow::Result;
use colored::Colorize;
use octofhir_scheduling::PreparedBooking;
use serde_json::Value;

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// What was picked: schedule, slot window, patient and participants.
pub fn print_selection(prepared: &PreparedBooking) {
    println!(
        "{}: Schedule/{}",
        "Schedule".cyan(),
        or_dash(prepared.schedule.id.as_deref())
    );
    println!(
        "{}: Slot/{} ({} .. {})",
        "Slot".cyan(),
        or_dash(prepared.slot.id.as_deref()),
        or_dash(prepared.slot.start.as_deref()),
        or_dash(prepared.slot.end.as_deref())
    );
    println!(
        "{}: Patient/{}",
        "Patient".cyan(),
        or_dash(prepared.patient.id.as_deref())
    );
    for participant in &prepared.appointment.participant {
        println!("  {} {}", "participant".dimmed(), participant.actor);
    }
}
