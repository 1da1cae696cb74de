//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use nursery_api_models::{
    Breed, DashboardSummary, Inventory, Page, Payment, RecentTransaction, Sapling, Theme,
    Transaction, User,
};
use nursery_signals::ToastQueue;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

/// Print and drop every queued toast, errors to stderr.
pub(crate) fn flush_toasts(toasts: &ToastQueue) {
    for toast in toasts.toasts() {
        match toast.kind {
            nursery_signals::ToastKind::Error => eprintln!("error: {}", toast.message),
            kind => println!("{}: {}", kind.as_str(), toast.message),
        }
    }
    toasts.clear();
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|value| !value.is_empty()).unwrap_or("-")
}

pub(crate) fn render_user(user: &User, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user)?,
        OutputFormat::Table => {
            println!("id: {}", user.id);
            println!("phone: {}", user.phone);
            println!("name: {}", or_dash(user.name.as_deref()));
            println!("nursery: {}", or_dash(user.nursery_id.as_deref()));
        }
    }
    Ok(())
}

pub(crate) fn render_dashboard(
    summary: &DashboardSummary,
    recent: &[RecentTransaction],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "summary": summary,
            "recentTransactions": recent,
        }))?,
        OutputFormat::Table => {
            println!("saplings: {}", summary.total_sapling_count);
            println!("units on hand: {}", summary.total_inventory_quantity);
            println!("sales 48h: {:.2}", summary.sales_last48_hours);
            println!("sales month: {:.2}", summary.sales_last_month);
            println!("sales year: {:.2}", summary.sales_last_year);
            println!("sales all time: {:.2}", summary.sales_all_time);
            if !recent.is_empty() {
                println!();
                println!("{:<24} {:<12} {:>8} BREED", "WHEN", "TYPE", "DELTA");
                for row in recent {
                    println!(
                        "{:<24} {:<12} {:>8} {}",
                        row.created_at,
                        row.kind.as_str(),
                        row.delta,
                        row.breed_name
                    );
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_saplings(saplings: &[Sapling], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(saplings)?,
        OutputFormat::Table => {
            println!("{:<36} {:<24} DESCRIPTION", "ID", "NAME");
            for sapling in saplings {
                println!(
                    "{:<36} {:<24} {}",
                    sapling.id,
                    sapling.name,
                    or_dash(sapling.description.as_deref())
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_sapling(sapling: &Sapling, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(sapling)?,
        OutputFormat::Table => {
            println!("id: {}", sapling.id);
            println!("name: {}", sapling.name);
            println!("description: {}", or_dash(sapling.description.as_deref()));
            println!("image: {}", or_dash(sapling.image_url.as_deref()));
            println!("nursery: {}", sapling.nursery_id);
            println!("updated: {}", sapling.updated_at);
        }
    }
    Ok(())
}

pub(crate) fn render_breeds(breeds: &[Breed], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(breeds)?,
        OutputFormat::Table => {
            println!("{:<36} {:<24} {:<10} SAPLING", "ID", "NAME", "MODE");
            for breed in breeds {
                println!(
                    "{:<36} {:<24} {:<10} {}",
                    breed.id,
                    breed.name,
                    breed.mode.map_or("-", |mode| mode.as_str()),
                    breed.sapling_id
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_breed(breed: &Breed, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(breed)?,
        OutputFormat::Table => {
            println!("id: {}", breed.id);
            println!("name: {}", breed.name);
            println!("description: {}", or_dash(breed.description.as_deref()));
            println!("sapling: {}", breed.sapling_id);
            println!("mode: {}", breed.mode.map_or("-", |mode| mode.as_str()));
            if let Some(items) = breed.items_per_slot {
                println!("items per slot: {items}");
            }
            println!("updated: {}", breed.updated_at);
        }
    }
    Ok(())
}

pub(crate) fn render_inventory(rows: &[Inventory], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(rows)?,
        OutputFormat::Table => {
            println!("{:<36} {:<24} {:>8}", "BREED", "NAME", "QTY");
            for row in rows {
                println!("{:<36} {:<24} {:>8}", row.breed_id, row.breed_name, row.quantity);
            }
        }
    }
    Ok(())
}

pub(crate) fn render_transactions(rows: &[Transaction], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(rows)?,
        OutputFormat::Table => {
            println!(
                "{:<36} {:<12} {:>8} {:<6} {:<24} REASON",
                "ID", "TYPE", "DELTA", "FLAGS", "WHEN"
            );
            for row in rows {
                println!(
                    "{:<36} {:<12} {:>8} {:<6} {:<24} {}",
                    row.id,
                    row.kind.as_str(),
                    row.delta,
                    transaction_flags(row),
                    row.created_at,
                    or_dash(row.reason.as_deref())
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_transaction(row: &Transaction, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(row)?,
        OutputFormat::Table => {
            println!("id: {}", row.id);
            println!("breed: {}", row.breed_id);
            println!("type: {}", row.kind);
            println!("delta: {}", row.delta);
            println!("reason: {}", or_dash(row.reason.as_deref()));
            println!("by: {}", or_dash(row.user_phone.as_deref()));
            if let Some(reversal) = &row.reversed_by_txn_id {
                println!("reversed by: {reversal}");
            }
            println!("flags: {}", transaction_flags(row));
            println!("created: {}", row.created_at);
        }
    }
    Ok(())
}

fn transaction_flags(row: &Transaction) -> &'static str {
    match (row.is_undo, row.is_deleted) {
        (true, true) => "U,D",
        (true, false) => "U",
        (false, true) => "D",
        (false, false) => "-",
    }
}

pub(crate) fn render_payments(rows: &[Payment], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(rows)?,
        OutputFormat::Table => {
            println!("{:<36} {:<10} {:>12} {:<8} DESCRIPTION", "ID", "TYPE", "AMOUNT", "DELETED");
            for row in rows {
                println!(
                    "{:<36} {:<10} {:>12.2} {:<8} {}",
                    row.id,
                    row.kind,
                    row.amount,
                    if row.is_deleted { "yes" } else { "no" },
                    or_dash(row.description.as_deref())
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_theme(theme: &Theme, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(theme)?,
        OutputFormat::Table => {
            println!("primary: {}", theme.primary_color);
            println!("secondary: {}", theme.secondary_color);
            println!("accent: {}", theme.accent_color);
            println!("font: {} {}", theme.font_family, theme.font_size_base);
            println!("radius: {}", theme.border_radius);
            println!("spacing: {}", theme.spacing_unit);
            println!("mode: {}", theme.theme_mode);
            println!("logo: {}", or_dash(theme.logo_url.as_deref()));
        }
    }
    Ok(())
}

/// Print a page footer after the rows in table mode.
pub(crate) fn render_page_footer<T>(page: &Page<T>, format: OutputFormat) {
    if format == OutputFormat::Table {
        println!("{} ({} total)", page.describe(), page.total_elements);
    }
}
