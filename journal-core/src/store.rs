use std::collections::HashMap;

use async_trait::async_trait;
use journal_models::error::Result;
use journal_models::{AccountSettings, CallerId, JournalStore, StrategyUsage, Trade, TradeId};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::registry::StrategyRegistry;

#[derive(Debug)]
struct UserState {
    trades: Vec<Trade>,
    settings: AccountSettings,
    registry: StrategyRegistry,
    next_trade_id: TradeId,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            trades: Vec::new(),
            settings: AccountSettings::default(),
            registry: StrategyRegistry::new(),
            next_trade_id: 1,
        }
    }
}

/// Caller-keyed store. Each caller gets an isolated state partition; an
/// unknown caller reads as an empty journal with default settings.
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    users: RwLock<HashMap<CallerId, UserState>>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JournalStore for InMemoryJournalStore {
    async fn list_trades(&self, caller: &CallerId) -> Result<Vec<Trade>> {
        let users = self.users.read().await;
        Ok(users
            .get(caller)
            .map(|state| state.trades.clone())
            .unwrap_or_default())
    }

    async fn fetch_trade(&self, caller: &CallerId, id: TradeId) -> Result<Option<Trade>> {
        let users = self.users.read().await;
        Ok(users
            .get(caller)
            .and_then(|state| state.trades.iter().find(|t| t.id == id).cloned()))
    }

    async fn insert_trade(&self, caller: &CallerId, mut trade: Trade) -> Result<Trade> {
        let mut users = self.users.write().await;
        let state = users.entry(caller.clone()).or_default();
        trade.id = state.next_trade_id;
        state.next_trade_id += 1;
        state.trades.push(trade.clone());
        debug!(caller = %caller, trade_id = trade.id, "Trade persisted");
        Ok(trade)
    }

    async fn replace_trade(&self, caller: &CallerId, trade: Trade) -> Result<Option<Trade>> {
        let mut users = self.users.write().await;
        let Some(state) = users.get_mut(caller) else {
            return Ok(None);
        };
        match state.trades.iter_mut().find(|t| t.id == trade.id) {
            Some(slot) => {
                *slot = trade.clone();
                debug!(caller = %caller, trade_id = trade.id, "Trade replaced");
                Ok(Some(trade))
            }
            None => Ok(None),
        }
    }

    async fn remove_trade(&self, caller: &CallerId, id: TradeId) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(state) = users.get_mut(caller) {
            let before = state.trades.len();
            state.trades.retain(|t| t.id != id);
            if state.trades.len() == before {
                debug!(caller = %caller, trade_id = id, "Delete of unknown trade ignored");
            }
        }
        Ok(())
    }

    async fn settings(&self, caller: &CallerId) -> Result<AccountSettings> {
        let users = self.users.read().await;
        Ok(users
            .get(caller)
            .map(|state| state.settings)
            .unwrap_or_default())
    }

    async fn store_settings(&self, caller: &CallerId, settings: AccountSettings) -> Result<()> {
        let mut users = self.users.write().await;
        users.entry(caller.clone()).or_default().settings = settings;
        Ok(())
    }

    async fn list_strategies(&self, caller: &CallerId) -> Result<Vec<StrategyUsage>> {
        let users = self.users.read().await;
        Ok(users
            .get(caller)
            .map(|state| state.registry.list())
            .unwrap_or_default())
    }

    async fn record_strategy_usage(&self, caller: &CallerId, name: &str) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(caller.clone())
            .or_default()
            .registry
            .record_usage(name);
        Ok(())
    }

    async fn remove_strategy(&self, caller: &CallerId, name: &str) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(state) = users.get_mut(caller) {
            state.registry.remove(name);
        }
        Ok(())
    }

    async fn replace_all(
        &self,
        caller: &CallerId,
        trades: Vec<Trade>,
        settings: AccountSettings,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let state = users.entry(caller.clone()).or_default();

        // The counter resumes above every imported id so restored
        // identifiers stay unique against later adds.
        let max_id = trades.iter().map(|t| t.id).max().unwrap_or(0);
        state.next_trade_id = state.next_trade_id.max(max_id + 1);
        state.trades = trades;
        state.settings = settings;
        info!(
            caller = %caller,
            trades = state.trades.len(),
            "State snapshot replaced"
        );
        Ok(())
    }
}
