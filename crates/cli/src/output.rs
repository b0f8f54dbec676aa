//! Output formatting for ranked prices and instance listings

use advisor_lib::{InstanceMeta, PriceClass, RankedPrice};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the ranked price table
#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Price/Core")]
    price_per_core: String,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Stability")]
    stability: String,
    #[tabled(rename = "Cores")]
    cores: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Arch")]
    arch: String,
    #[tabled(rename = "Class")]
    class: String,
}

/// Row for the instance type listing
#[derive(Tabled)]
struct InstanceTypeRow {
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Cores")]
    cores: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Arch")]
    arch: String,
}

/// Print the ranked, annotated price records
pub fn print_ranked(ranked: &[RankedPrice], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&ranked),
        OutputFormat::Table => {
            if ranked.is_empty() {
                print_warning("No price summaries found");
                return;
            }

            let rows: Vec<RankRow> = ranked
                .iter()
                .map(|record| RankRow {
                    instance_type: record.summary.instance_type_id.clone(),
                    zone: record.summary.zone_id.clone(),
                    price_per_core: format!("{:.4}", record.summary.price_per_core),
                    discount: color_class(
                        &format!("{:.1}", record.summary.discount),
                        record.class,
                    ),
                    stability: format!("{:.1}", record.summary.stability),
                    cores: record.summary.cpu_core_count.to_string(),
                    memory: format_memory(record.summary.memory_size_gb),
                    arch: record.summary.arch.clone(),
                    class: color_class(class_label(record.class), record.class),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} price summaries", ranked.len());
        }
    }
}

/// Print the eligible instance type listing
pub fn print_instance_types(metas: &[&InstanceMeta], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&metas),
        OutputFormat::Table => {
            if metas.is_empty() {
                print_warning("No instance types matched the filter");
                return;
            }

            let rows: Vec<InstanceTypeRow> = metas
                .iter()
                .map(|meta| InstanceTypeRow {
                    instance_type: meta.instance_type_id.clone(),
                    family: meta.instance_family.clone(),
                    cores: meta.cpu_core_count.to_string(),
                    memory: format_memory(meta.memory_size_gb),
                    arch: advisor_lib::instance_arch(meta),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} instance types", metas.len());
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(error) => print_error(&format!("Failed to serialize output: {}", error)),
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Format a memory size in GB
pub fn format_memory(gb: f64) -> String {
    if gb >= 1.0 && (gb - gb.round()).abs() < 1e-9 {
        format!("{}G", gb as u64)
    } else {
        format!("{:.1}G", gb)
    }
}

fn class_label(class: PriceClass) -> &'static str {
    match class {
        PriceClass::Favorable => "favorable",
        PriceClass::Unfavorable => "unfavorable",
    }
}

/// Color a value green for favorable records, blue for unfavorable
fn color_class(value: &str, class: PriceClass) -> String {
    match class {
        PriceClass::Favorable => value.green().to_string(),
        PriceClass::Unfavorable => value.blue().to_string(),
    }
}
