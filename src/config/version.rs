//! Schema version ordering.
//!
//! Versions are dotted numeric strings (`"1.2.0"`). The sentinel
//! [`DEV_VERSION`] marks an unreleased build: it sorts below every released
//! version and equal to itself. That single rule drives both [`compare`] and
//! [`needs_migration`], so a development build never rewrites a document
//! produced by a release, and a release always upgrades a development
//! document.

use std::cmp::Ordering;

/// Version marker of an unreleased build.
pub const DEV_VERSION: &str = "dev";

/// Compare two version identifiers component-wise.
///
/// Missing trailing components count as 0 (`"1.2" == "1.2.0"`). Each
/// component is read from its leading digits, so `"0-rc1"` reads as 0 and a
/// component without digits reads as 0.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (a == DEV_VERSION, b == DEV_VERSION) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let left: Vec<u64> = a.split('.').map(component).collect();
    let right: Vec<u64> = b.split('.').map(component).collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }

    Ordering::Equal
}

/// Whether a document stamped `current` must be upgraded to `target`.
///
/// `None` means the persisted document carries no version marker at all,
/// which always requires migration.
pub fn needs_migration(current: Option<&str>, target: &str) -> bool {
    match current {
        None => true,
        Some(current) => compare(current, target) == Ordering::Less,
    }
}

fn component(part: &str) -> u64 {
    let digits: String = part
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
