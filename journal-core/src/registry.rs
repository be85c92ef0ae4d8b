use indexmap::IndexMap;
use journal_models::StrategyUsage;
use tracing::debug;

/// Known strategy names with usage counts. This is a recently-used
/// suggestion list, not a foreign key: removing a name never touches the
/// trades that reference it, and trade deletion never decrements a count.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    entries: IndexMap<String, u64>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at count 1 on first use, increments afterwards. Blank names
    /// are a no-op.
    pub fn record_usage(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let count = self.entries.entry(name.to_string()).or_insert(0);
        *count += 1;
        debug!(strategy = name, count = *count, "Recorded strategy usage");
    }

    /// Deletes the entry entirely, whatever its count. Returns whether the
    /// name was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.shift_remove(name.trim()).is_some()
    }

    /// All (name, count) pairs in first-use order; callers pick their own
    /// sort.
    pub fn list(&self) -> Vec<StrategyUsage> {
        self.entries
            .iter()
            .map(|(name, count)| StrategyUsage {
                name: name.clone(),
                count: *count,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
