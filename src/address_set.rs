//! Run-scoped accumulation of unique signer addresses

use std::collections::HashSet;

/// Callback invoked exactly once per newly discovered address, with the new
/// set size. Progress visibility only; it never affects control flow.
pub type NewAddressObserver = Box<dyn Fn(&str, usize) + Send + Sync>;

/// Insertion-ordered set of discovered signer addresses.
///
/// Grows monotonically over the run; there is no removal. First-seen order
/// is the canonical output order.
#[derive(Default)]
pub struct AddressSetBuilder {
    seen: HashSet<String>,
    order: Vec<String>,
    observer: Option<NewAddressObserver>,
}

impl AddressSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(observer: NewAddressObserver) -> Self {
        Self {
            observer: Some(observer),
            ..Self::default()
        }
    }

    /// Idempotent insert. Returns true when the address was new.
    pub fn insert(&mut self, address: &str) -> bool {
        if self.seen.contains(address) {
            return false;
        }
        self.seen.insert(address.to_string());
        self.order.push(address.to_string());
        if let Some(observer) = &self.observer {
            observer(address, self.order.len());
        }
        true
    }

    pub fn contains(&self, address: &str) -> bool {
        self.seen.contains(address)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Consume the builder, yielding addresses in first-seen order
    pub fn into_addresses(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn insert_is_idempotent() {
        let mut set = AddressSetBuilder::new();
        assert!(set.insert("Addr1"));
        assert!(!set.insert("Addr1"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let mut set = AddressSetBuilder::new();
        set.insert("Addr2");
        set.insert("Addr1");
        set.insert("Addr2");
        set.insert("Addr3");
        assert_eq!(set.into_addresses(), vec!["Addr2", "Addr1", "Addr3"]);
    }

    #[test]
    fn observer_fires_only_on_new_addresses() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut set = AddressSetBuilder::with_observer(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        set.insert("Addr1");
        set.insert("Addr1");
        set.insert("Addr2");
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn membership_is_observable() {
        let mut set = AddressSetBuilder::new();
        set.insert("Addr1");
        assert!(set.contains("Addr1"));
        assert!(!set.contains("Addr2"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Addr1"]);
    }
}
