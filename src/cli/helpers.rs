//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::EntityId;
use crate::core::{Config, FileStorage, Persistence, Store};

/// The store as the CLI uses it: file-backed, demo-seeded
pub type HubStore = Store<FileStorage>;

/// Open the store at the configured location.
///
/// Layering: config file, then environment, then `--data-dir`.
pub fn open_store(global: &GlobalOpts) -> HubStore {
    let config = Config::load().with_data_dir(global.data_dir.clone());
    let storage = FileStorage::new(config.data_dir());
    tracing::debug!(dir = %storage.dir().display(), key = config.storage_key(), "opening store");
    Store::open(Persistence::new(storage).with_key(config.storage_key()))
}

/// Format an EntityId for display, truncating if too long
///
/// IDs longer than 16 characters are truncated to 13 chars with "..." suffix.
/// This provides a consistent display format across all list/table outputs.
pub fn format_short_id(id: &EntityId) -> String {
    truncate_str(id.as_str(), 16)
}

/// Positional short reference for the element at `index` (`TKT@1` is the first ticket)
pub fn short_ref<T: Entity>(index: usize) -> String {
    format!("{}@{}", T::PREFIX, index + 1)
}

/// Resolve a full ID or a `PREFIX@N` short reference against a collection
pub fn resolve<'a, T: Entity>(items: &'a [T], reference: &str) -> Result<&'a T> {
    let reference = reference.trim();

    if let Some((prefix, n)) = reference.split_once('@') {
        if prefix.eq_ignore_ascii_case(T::PREFIX.as_str()) {
            let n: usize = n
                .parse()
                .map_err(|_| miette::miette!("Invalid short reference '{}'", reference))?;
            return n
                .checked_sub(1)
                .and_then(|i| items.get(i))
                .ok_or_else(|| miette::miette!("No {} matching '{}'", T::PREFIX, reference));
        }
    }

    // Full ids are matched verbatim; imported data may carry ids of any shape
    items
        .iter()
        .find(|item| item.id().as_str() == reference)
        .ok_or_else(|| miette::miette!("No {} matching '{}'", T::PREFIX, reference))
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print a `✓` confirmation line unless `--quiet`
pub fn success(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet {
        println!("{} {}", style("✓").green(), message);
    }
}

/// The acting user's id, or an error telling the caller how to pick one
pub fn acting_user(store: &HubStore) -> Result<EntityId> {
    store
        .current_user()
        .map(|u| u.id.clone())
        .ok_or_else(|| miette::miette!("No current user. Run `ophub user switch <ID>` first."))
}

/// Ask for confirmation unless `assume_yes`. Non-interactive sessions decline.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !console::user_attended() {
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::core::seed::demo_data;
    use chrono::Utc;

    #[test]
    fn test_format_short_id() {
        let id = EntityId::new(EntityPrefix::Tkt);
        let formatted = format_short_id(&id);
        // ULID IDs are 30 chars (3 prefix + 1 dash + 26 ULID), so should truncate
        assert!(formatted.len() <= 16);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn test_resolve_short_and_full() {
        let data = demo_data(Utc::now());
        let second = &data.tickets[1];

        assert_eq!(resolve(&data.tickets, "TKT@2").unwrap().id, second.id);
        assert_eq!(resolve(&data.tickets, "tkt@2").unwrap().id, second.id);
        assert_eq!(
            resolve(&data.tickets, &second.id.to_string()).unwrap().id,
            second.id
        );
        assert!(resolve(&data.tickets, "TKT@0").is_err());
        assert!(resolve(&data.tickets, "TKT@99").is_err());
        assert!(resolve(&data.tickets, "garbage").is_err());
    }

    #[test]
    fn test_resolve_foreign_full_id() {
        let mut data = demo_data(Utc::now());
        let raw = "3f2b9c1e-8d4a-4b7e-9a51-2c6f0d7e8a90";
        data.tickets[0].id = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();

        assert_eq!(resolve(&data.tickets, raw).unwrap().id.as_str(), raw);
        assert_eq!(format_short_id(&data.tickets[0].id), "3f2b9c1e-8d4a...");
    }

    #[test]
    fn test_short_ref() {
        assert_eq!(short_ref::<crate::entities::Ticket>(0), "TKT@1");
    }
}
