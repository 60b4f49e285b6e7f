//! Resource record rendering.

use geohub_core::{ResourceRecord, format_bytes};

use super::tables::{NAME_WIDTH, format_date, print_separator, truncate_string};

/// Print records as an aligned table.
pub fn print_record_table(records: &[ResourceRecord]) {
    println!(
        "{:<36}  {:<53}  {:<16}  {:<20}  {:>9}",
        "ID", "NAME", "TYPE", "CREATOR", "DOWNLOADS"
    );
    print_separator(36 + 53 + 16 + 20 + 9 + 8);
    for record in records {
        println!(
            "{:<36}  {:<53}  {:<16}  {:<20}  {:>9}",
            record.id,
            truncate_string(&record.name, NAME_WIDTH),
            type_label(record),
            truncate_string(&record.creator, 17),
            record.download_count
        );
    }
}

/// Print every field of one record.
pub fn print_record_details(record: &ResourceRecord) {
    println!("{}", record.name);
    print_separator(record.name.chars().count().clamp(20, 80));
    println!("ID:          {}", record.id);
    println!("Type:        {}", type_label(record));
    if !record.creator.is_empty() {
        println!("Creator:     {}", record.creator);
    }
    println!("Uploaded:    {}", format_date(record.created_at.as_ref()));
    println!("Updated:     {}", format_date(record.updated_at.as_ref()));
    println!("Downloads:   {}", record.download_count);
    if let Some(size) = record.file_size_hint {
        println!("Size:        {}", format_bytes(size));
    }
    println!("File:        {}", record.download_url);
    if let Some(thumbnail) = &record.thumbnail_url {
        println!("Thumbnail:   {thumbnail}");
    }
    if !record.dependencies.is_empty() {
        println!("Depends on:  {}", record.dependencies.join(", "));
    }
    if !record.description.is_empty() {
        println!();
        println!("{}", record.description.trim());
    }
}

fn type_label(record: &ResourceRecord) -> String {
    match record.subtype() {
        Some(subtype) => format!("{} ({subtype})", record.resource_type),
        None => record.resource_type.to_string(),
    }
}
