// SPDX-License-Identifier: Apache-2.0

//! Styled terminal output.
//!
//! Human-facing status lines, separate from the tracing log stream. Fatal
//! errors go to stderr; everything else is stdout.

use crossterm::style::Stylize;

use avstack_core::{HealthReport, StackConfig};

pub fn step(message: &str) {
    println!("{} {}", "▶".blue(), message);
}

pub fn ok(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    println!("  {} {}", "⚠".yellow(), message);
}

/// Non-fatal bad news (an endpoint down); stays on stdout.
pub fn bad(message: &str) {
    println!("  {} {}", "✗".red(), message);
}

/// Fatal error line on stderr.
pub fn fatal(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Per-endpoint health lines.
pub fn health_summary(report: &HealthReport) {
    println!();
    for endpoint in &report.endpoints {
        if endpoint.reachable {
            let mut line = format!("{} is healthy", endpoint.name);
            match endpoint.dictionary_loaded() {
                Some(true) => line.push_str(" (dictionary-assisted validation)"),
                Some(false) => line.push_str(" (AI-only validation)"),
                None => {}
            }
            ok(&line);
        } else {
            bad(&format!(
                "{} is not responding ({})",
                endpoint.name, endpoint.health_url
            ));
        }
    }
}

/// Access-point block, printed regardless of health outcome.
pub fn access_urls(config: &StackConfig) {
    let host = &config.options.host;

    println!();
    println!("{}", "Access points:".bold());
    for service in &config.services {
        println!("  {:<5} {}", service.name.as_str(), service.base_url(host));
        if let Some(docs) = service.docs_url(host) {
            println!("  {:<5} {}", "docs", docs);
        }
    }
}
