//! Terminal output for rqs

use colored::Colorize;
use std::io::{self, Write};

use crate::entry::{Entry, EntryType};

/// Print a listing of entries, sorted by (type, alias) descending
pub fn print_entries(out: &mut dyn Write, entries: &mut [Entry]) -> io::Result<()> {
    writeln!(out, "{}", "Entries:".white().bold())?;
    if entries.is_empty() {
        writeln!(out, "empty")?;
        return Ok(());
    }

    entries.sort_by(|a, b| (b.kind, &b.alias).cmp(&(a.kind, &a.alias)));
    for entry in entries.iter() {
        writeln!(out, "\t{}", entry)?;
    }
    Ok(())
}

/// Nothing matched an alias or pattern
pub fn print_no_entry(out: &mut dyn Write, name: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("rqs has no entry for {}", name).yellow())
}

pub fn print_added(out: &mut dyn Write, kind: EntryType) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("{} rqs added a {} entry.", kind.icon(), kind).white().bold()
    )
}

pub fn print_deleted(out: &mut dyn Write, alias: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("🌚 rqs deleted {}.", alias).white().bold())
}

pub fn print_deleted_all(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "🌚 rqs deleted all entries.".white().bold())
}
