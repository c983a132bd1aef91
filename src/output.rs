use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::store::UserListSnapshot;
use crate::types::User;

static OUTPUT_FORMAT: AtomicU8 = AtomicU8::new(0);
static QUIET: AtomicBool = AtomicBool::new(false);

pub fn set_format(format: OutputFormat) {
    let raw = match format {
        OutputFormat::Table => 0,
        OutputFormat::Json => 1,
        OutputFormat::Compact => 2,
    };
    OUTPUT_FORMAT.store(raw, Ordering::Relaxed);
}

pub fn format() -> OutputFormat {
    match OUTPUT_FORMAT.load(Ordering::Relaxed) {
        1 => OutputFormat::Json,
        2 => OutputFormat::Compact,
        _ => OutputFormat::Table,
    }
}

pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    matches!(format(), OutputFormat::Json)
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: truncate(&user.full_name(), 30),
            email: truncate(&user.email, 36),
            phone: user.phone.clone(),
            address: truncate(&user.address.address, 30),
            company: truncate(&user.company.name, 30),
        }
    }
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
        OutputFormat::Compact => {
            for item in items {
                println!("{}", serde_json::to_string(item).unwrap_or_default());
            }
        }
        OutputFormat::Table => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{table}");
        }
    }
}

/// Print a single item or JSON depending on output mode
pub fn print_item<T: Serialize>(item: &T, display: impl FnOnce(&T)) {
    match format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
        OutputFormat::Compact => {
            println!("{}", serde_json::to_string(item).unwrap_or_default());
        }
        OutputFormat::Table => display(item),
    }
}

/// Print a message (skipped when quiet, or prints simple object in JSON mode)
pub fn print_message(message: &str) {
    if QUIET.load(Ordering::Relaxed) {
        return;
    }
    if is_json_output() {
        println!("{}", serde_json::json!({ "message": message }));
    } else {
        println!("{message}");
    }
}

/// Render the user list the way the dashboard table shows it.
///
/// A failed refresh shows the error above the last known good rows.
pub fn print_snapshot(snapshot: &UserListSnapshot, footer: &str) {
    if !matches!(format(), OutputFormat::Table) {
        print_item(snapshot, |_| {});
        return;
    }

    if snapshot.loading {
        println!("{}", "Loading...".bright_black());
        return;
    }
    if let Some(error) = &snapshot.error {
        println!("{} {error}", "Error:".red().bold());
    }

    if snapshot.users.is_empty() {
        println!("No users");
    } else {
        print_table(&snapshot.users, |u| UserRow::from(u));
    }
    println!("{}", footer.bright_black());
}

pub fn print_user(user: &User) {
    print_item(user, |u| {
        println!("{} {}", format!("#{}", u.id).bold(), u.full_name());
        println!();
        println!("Email:    {}", or_dash(&u.email));
        println!("Phone:    {}", or_dash(&u.phone));
        println!("Address:  {}", or_dash(&u.address.address));
        println!("Company:  {}", or_dash(&u.company.name));
        if let Some(role) = &u.role {
            println!("Role:     {role}");
        }
        if let Some(status) = &u.status {
            println!("Status:   {status}");
        }
    });
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

/// Format a relative time (e.g., "2 days ago")
pub fn format_relative(dt: DateTime<Utc>) -> String {
    let diff = Utc::now().signed_duration_since(dt);

    if diff.num_seconds() < 60 {
        "just now".to_string()
    } else if diff.num_minutes() < 60 {
        let mins = diff.num_minutes();
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff.num_hours() < 24 {
        let hours = diff.num_hours();
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff.num_days() < 30 {
        let days = diff.num_days();
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
