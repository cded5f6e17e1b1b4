//! Setup/initialization module - handles application startup tasks
//!
//! Includes:
//! - Logger initialization
//! - Products folder initialization

use std::io::Write;

use anstyle::{AnsiColor, Style};
use anyhow::{Context, Result};
use env_logger::{Builder, WriteStyle};
use log::info;
use log::kv::Key;

use crate::config::AppConfig;

// ────────────────────────────────────────────────────────────────
// Folder Initialization
// ────────────────────────────────────────────────────────────────

/// Create the products root if it does not exist yet
pub fn initialize_folder(config: &AppConfig) -> Result<()> {
    if config.products_dir.is_dir() {
        info!(
            "Products directory already exists: {}",
            config.products_dir.display()
        );
        return Ok(());
    }

    std::fs::create_dir_all(&config.products_dir).context(format!(
        "failed to create products directory {}",
        config.products_dir.display()
    ))?;
    info!(
        "Created products directory at: {}",
        config.products_dir.display()
    );
    Ok(())
}

// ────────────────────────────────────────────────────────────────
// Logger Initialization
// ────────────────────────────────────────────────────────────────

/// Render a logged `duration` such as `12.345678ms` as `12.35 ms`.
pub fn format_duration(raw: &str) -> String {
    if let Some(idx) = raw.find(|c: char| c.is_alphabetic()) {
        let (num, unit) = (&raw[..idx], &raw[idx..]);
        if let Ok(val) = num.parse::<f32>() {
            return format!("{:.2} {}", val, unit);
        }
    }
    raw.to_string()
}

/// Initialize the global logger. `RUST_LOG` overrides the default filters.
pub fn initialize_logger() {
    let dim = Style::new().fg_color(Some(AnsiColor::BrightBlack.into()));
    let cyan = Style::new().fg_color(Some(AnsiColor::Cyan.into()));

    Builder::new()
        .write_style(WriteStyle::Auto)
        .format(move |buf, record| {
            let ts = buf.timestamp();

            let level_style = buf.default_level_style(record.level());

            // Extract raw duration and format to 2 decimal places
            let dur_raw = record
                .key_values()
                .get(Key::from("duration"))
                .map(|v| format_duration(&v.to_string()))
                .unwrap_or_default();

            // Right-align or pad the duration field to width 10
            let dur = if dur_raw.is_empty() {
                " ".repeat(10)
            } else {
                format!("{cyan}{:>10}{cyan:#}", dur_raw)
            };

            writeln!(
                buf,
                "{dim}{}{dim:#} {level_style}{}{level_style:#} {dim}{}{dim:#}",
                ts,
                record.level(),
                record.target()
            )?;

            let message = format!("{}", record.args());

            // Subsequent lines are indented past the duration column
            let subsequent_indent = " ".repeat(11);

            let mut lines = message.lines();

            if let Some(first_line) = lines.next() {
                writeln!(buf, "{} {}", dur, first_line)?;
            }

            for line in lines {
                writeln!(buf, "{}{}", subsequent_indent, line)?;
            }

            Ok(())
        })
        // Only show INFO+ globally, WARN+ for Rocket
        .filter(None, log::LevelFilter::Info)
        .filter(Some("rocket"), log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
