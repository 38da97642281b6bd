//! Marlin CLI
//!
//! Scans templates and prints the event stream, for debugging the scanner.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use marlin_common::LineIndex;
use marlin_common::warning::clear_warnings;
use marlin_parser::{Event, ScanOptions};
use owo_colors::OwoColorize;

/// Marlin — dump the scan events of markup templates
#[derive(Parser, Debug)]
#[command(name = "marlin")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Scan a concise template
    marlin page.marko

    # Scan tag syntax given inline
    marlin --html --eval '<div class="a">${x}</div>'

    # Machine-readable output
    marlin --json page.marko

    # Trace state transitions
    RUST_LOG=marlin=trace marlin page.marko
"#)]
struct Cli {
    /// Template files to scan
    #[arg(value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Scan this template text instead of files
    #[arg(short, long, value_name = "TEMPLATE")]
    eval: Option<String>,

    /// Start in tag syntax instead of concise syntax
    #[arg(long)]
    html: bool,

    /// Do not treat `-` as an expression continuation operator
    #[arg(long)]
    legacy: bool,

    /// Never recognize placeholders inside string literals
    #[arg(long)]
    ignore_placeholders: bool,

    /// JSON file with scanner options (camelCase keys)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

/// Initialize tracing when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let base = load_options(&cli)?;
    let sources = load_sources(&cli)?;
    let mut failed = false;

    for (name, source) in &sources {
        clear_warnings();
        let mut options = base.clone();
        if options.filename.is_none() {
            options.filename.clone_from(name);
        }
        let events = marlin_parser::scan(source, options);
        failed |= events.iter().any(|event| matches!(event, Event::Error(_)));

        if cli.json {
            print_json(&events)?;
        } else {
            if sources.len() > 1 {
                println!("{}", format!("=== {} ===", name.as_deref().unwrap_or("-")).bold());
            }
            print_events(source, &events);
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Build scanner options from the config file and flags
fn load_options(cli: &Cli) -> Result<ScanOptions> {
    let mut options = match cli.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ScanOptions::default(),
    };
    if cli.html {
        options.concise = false;
    }
    if cli.legacy {
        options.legacy_compatibility = true;
    }
    if cli.ignore_placeholders {
        options.ignore_placeholders = true;
    }
    Ok(options)
}

/// Load template sources as (file name, text) pairs
fn load_sources(cli: &Cli) -> Result<Vec<(Option<String>, String)>> {
    if let Some(ref template) = cli.eval {
        return Ok(vec![(None, template.clone())]);
    }
    if cli.paths.is_empty() {
        anyhow::bail!("nothing to scan: pass template files or --eval");
    }
    cli.paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok((Some(path.display().to_string()), text))
        })
        .collect()
}

fn print_json(events: &[Event]) -> Result<()> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}

fn print_events(source: &str, events: &[Event]) {
    let index = LineIndex::new(source);
    for event in events {
        let location = event
            .span()
            .map(|(pos, _)| index.location(pos).to_string())
            .unwrap_or_default();
        let name = event.name();
        let name = if matches!(event, Event::Error(_)) {
            name.red().bold().to_string()
        } else {
            name.cyan().to_string()
        };
        println!("{:>8} {name:<12} {}", location.dimmed(), describe(event));
    }
}

/// One-line summary of an event's payload
fn describe(event: &Event) -> String {
    match event {
        Event::Text(text) => format!("{:?}", text.value),
        Event::Placeholder(placeholder) => {
            let marker = if placeholder.escape { "${" } else { "$!{" };
            format!("{marker}{}}}", placeholder.value)
        }
        Event::String(string) => string.value.clone(),
        Event::Expression(expression) => format!("{:?} {}", expression.context, expression.value),
        Event::OpenTag(tag) => {
            let mut summary = tag
                .tag_name_expression
                .clone()
                .unwrap_or_else(|| tag.tag_name.clone());
            for attribute in &tag.attributes {
                summary.push(' ');
                if attribute.spread {
                    summary.push_str("...");
                }
                summary.push_str(&attribute.name);
                if let Some(ref method) = attribute.method {
                    summary.push_str(&method.value);
                } else if let Some(ref argument) = attribute.argument {
                    summary.push_str(&format!("({})", argument.value));
                }
                if let Some(ref value) = attribute.value {
                    if !attribute.spread {
                        summary.push('=');
                    }
                    summary.push_str(value);
                }
            }
            if tag.self_closed {
                summary.push_str(" /");
            }
            summary
        }
        Event::CloseTag(close) => close.tag_name.clone(),
        Event::Scriptlet(scriptlet) => format!("{:?} {:?}", scriptlet.kind, scriptlet.value),
        Event::Comment(comment) => format!("{:?} {:?}", comment.kind, comment.value),
        Event::Cdata(literal) | Event::DocumentType(literal) | Event::Declaration(literal) => {
            format!("{:?}", literal.value)
        }
        Event::Error(diagnostic) => diagnostic.to_string(),
        Event::Finish => String::new(),
    }
}
