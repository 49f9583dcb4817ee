//! Admin allow-list.
//!
//! Admins may save notes and files, delete and export items, and broadcast
//! to the target chat. Everyone else may save links and search.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSet {
    ids: BTreeSet<u64>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Parses a comma-separated id list. Entries that are not plain
    /// unsigned integers are skipped.
    pub fn parse(value: &str) -> Self {
        let ids = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty() && entry.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|entry| entry.parse::<u64>().ok());
        Self::new(ids)
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.ids.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::AdminSet;

    #[test]
    fn parse_skips_non_numeric_entries() {
        let admins = AdminSet::parse(" 42, abc,,-7, 1001 ,18446744073709551616");
        assert_eq!(admins.len(), 2);
        assert!(admins.is_admin(42));
        assert!(admins.is_admin(1001));
        assert!(!admins.is_admin(7));
    }

    #[test]
    fn empty_value_yields_no_admins() {
        let admins = AdminSet::parse("");
        assert!(admins.is_empty());
        assert!(!admins.is_admin(0));
    }
}
