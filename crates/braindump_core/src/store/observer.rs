//! Change notification for store consumers.

/// Which snapshot a successful mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Items,
    Categories,
    /// Both lists changed (clear, import, category removal with re-homing).
    All,
}

impl StoreChange {
    pub fn touches_items(self) -> bool {
        matches!(self, Self::Items | Self::All)
    }

    pub fn touches_categories(self) -> bool {
        matches!(self, Self::Categories | Self::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Categories => "categories",
            Self::All => "all",
        }
    }
}

/// Handle returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(StoreChange)>;

/// Ordered set of listeners notified after each successful mutation.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ListenerRegistry {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn notify(&mut self, change: StoreChange) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::StoreChange;

    #[test]
    fn all_touches_both_snapshots() {
        assert!(StoreChange::All.touches_items());
        assert!(StoreChange::All.touches_categories());
        assert!(!StoreChange::Items.touches_categories());
        assert_eq!(StoreChange::Categories.as_str(), "categories");
    }
}
