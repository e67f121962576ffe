//! Terminal implementation of the render sink.

use citycast_core::{RenderPayload, RenderSink};

/// Renders session payloads as plain text on stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&mut self, payload: RenderPayload) -> anyhow::Result<()> {
        match payload {
            RenderPayload::Welcome => {
                println!("Welcome! Enter a city name to get started.");
            }
            RenderPayload::Loading { city } => {
                println!("Looking up {city}...");
            }
            RenderPayload::Success { current, days } => {
                println!();
                println!(
                    "{}  {} {}°C  {}",
                    current.location_name,
                    glyph(&current.icon_id),
                    current.temperature_c.round() as i64,
                    current.description,
                );
                for day in days {
                    println!(
                        "  {}  {} {:>3}°C  {}",
                        day.day_label,
                        glyph(&day.icon_id),
                        day.temperature_c,
                        day.description,
                    );
                }
                println!();
            }
            RenderPayload::Failure { message } => {
                println!("{message}");
            }
            RenderPayload::RecentList { names } => {
                if names.is_empty() {
                    return Ok(());
                }
                let listed = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| format!("{}. {name}", i + 1))
                    .collect::<Vec<_>>()
                    .join("  ");
                println!("Recent: {listed}");
            }
        }

        Ok(())
    }

    fn set_input_enabled(&mut self, _enabled: bool) {
        // A blocking terminal prompt cannot accept input mid-lookup; the
        // toggle only matters for interactive surfaces with their own loop.
    }
}

/// Rough terminal stand-in for the provider's icon set.
fn glyph(icon_id: &str) -> &'static str {
    match icon_id.get(..2) {
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁",
        Some("09") | Some("10") => "🌧",
        Some("11") => "⛈",
        Some("13") => "❄",
        Some("50") => "🌫",
        _ => "·",
    }
}
