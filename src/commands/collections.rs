use anyhow::{Context, Result};
use chrono::DateTime;
use colored::Colorize;
use serde_json::Value;

use crate::api::collections::{CollectionKey, CollectionStore};
use crate::api::models::{BadgeClassRecord, BadgeInstanceRecord, IssuerRecord};
use crate::cli::commands::collections::CollectionsSubcommands;
use crate::panels::DetailViewSpec;

pub fn handle(command: CollectionsSubcommands, collections: &CollectionStore) -> Result<()> {
    match command {
        CollectionsSubcommands::List => {
            for key in CollectionKey::ALL {
                let len = collections.len(key);
                if len == 0 {
                    println!("{}  {}", key, "empty".dimmed());
                } else {
                    match collections.last(key).and_then(|r| latest_label(key, r)) {
                        Some(latest) => println!(
                            "{}  {} records (latest: {})",
                            key.to_string().cyan(),
                            len,
                            latest
                        ),
                        None => println!("{}  {} records", key.to_string().cyan(), len),
                    }
                }
            }
            Ok(())
        }
        CollectionsSubcommands::Show { name } => {
            let key = CollectionKey::parse(&name).with_context(|| {
                let known: Vec<&str> = CollectionKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown collection '{name}'. Known: {}", known.join(", "))
            })?;
            let records = collections.records(key);
            println!("{}", serde_json::to_string_pretty(records)?);
            Ok(())
        }
    }
}

/// Prints a detail panel: labeled fields of one record, or an empty-panel
/// notice when the record is not in the local collections.
pub fn render_detail(spec: &DetailViewSpec, collections: &CollectionStore) {
    println!("{}", spec.title.bold());
    let Some(record) = collections.find(spec.collection, &spec.slug) else {
        println!(
            "{}",
            format!("No '{}' record in {}", spec.slug, spec.collection).dimmed()
        );
        return;
    };
    for (label, key) in &spec.fields {
        let rendered = match record.get(key) {
            None | Some(Value::Null) => "-".dimmed().to_string(),
            Some(Value::String(text)) => display_text(text),
            Some(other) => other.to_string(),
        };
        println!("  {:<12} {}", format!("{label}:"), rendered);
    }
}

/// A one-line identifier for the newest record, read through the typed
/// record views.
fn latest_label(key: CollectionKey, record: &Value) -> Option<String> {
    match key {
        CollectionKey::IssuerIssuers => IssuerRecord::from_value(record)?.name,
        CollectionKey::IssuerBadgeClasses => BadgeClassRecord::from_value(record)?.name,
        CollectionKey::IssuerBadges | CollectionKey::EarnerBadges => {
            let badge = BadgeInstanceRecord::from_value(record)?;
            badge.email.or(badge.slug)
        }
        CollectionKey::EarnerBadgeCollections | CollectionKey::EarnerNotifications => record
            .get("name")
            .or_else(|| record.get("email"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    }
}

// Timestamps arrive as RFC 3339 strings; show the date part.
fn display_text(text: &str) -> String {
    match DateTime::parse_from_rfc3339(text) {
        Ok(moment) => moment.format("%Y-%m-%d").to_string(),
        Err(_) => text.to_string(),
    }
}
