use std::sync::Arc;

use journal_models::error::Result;
use journal_models::{
    AccountSettings, Backup, CallerId, JournalStore, StrategyUsage, Trade, TradeDraft, TradeId,
};
use tracing::{debug, info};

use crate::{backup, export, metrics, risk, validation};
use crate::risk::RiskStatus;

/// Facade over the store seam exposing the journal's external interface.
/// Every mutating operation validates first and applies atomically; all
/// state is scoped by the caller identity.
pub struct JournalService {
    store: Arc<dyn JournalStore>,
}

impl JournalService {
    pub fn new(store: Arc<dyn JournalStore>) -> Self {
        Self { store }
    }

    /// Convenience constructor backed by the in-process keyed store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(crate::store::InMemoryJournalStore::new()))
    }

    fn derive(draft: &TradeDraft) -> (f64, f64) {
        (
            metrics::pnl(
                draft.direction,
                draft.entry_price,
                draft.exit_price,
                draft.quantity,
            ),
            metrics::risk_reward_ratio(draft.entry_price, draft.stop_loss, draft.target),
        )
    }

    /// Validates, derives P&L and R:R, persists, and records strategy
    /// usage for a non-blank strategy name.
    pub async fn add_trade(&self, caller: &CallerId, draft: TradeDraft) -> Result<TradeId> {
        validation::validate_draft(&draft)?;
        let (pnl, risk_reward_ratio) = Self::derive(&draft);
        let strategy = draft.strategy.trim().to_string();

        let stored = self
            .store
            .insert_trade(caller, Trade::from_draft(0, draft, pnl, risk_reward_ratio))
            .await?;
        if !strategy.is_empty() {
            self.store.record_strategy_usage(caller, &strategy).await?;
        }

        info!(caller = %caller, trade_id = stored.id, pnl = pnl, "Trade added");
        Ok(stored.id)
    }

    /// Wholesale replacement of every user-settable field, with derived
    /// fields recomputed. Returns `None` for an unknown id.
    pub async fn update_trade(
        &self,
        caller: &CallerId,
        id: TradeId,
        draft: TradeDraft,
    ) -> Result<Option<Trade>> {
        validation::validate_draft(&draft)?;
        let (pnl, risk_reward_ratio) = Self::derive(&draft);
        let strategy = draft.strategy.trim().to_string();

        let replaced = self
            .store
            .replace_trade(caller, Trade::from_draft(id, draft, pnl, risk_reward_ratio))
            .await?;
        match replaced {
            Some(trade) => {
                if !strategy.is_empty() {
                    self.store.record_strategy_usage(caller, &strategy).await?;
                }
                info!(caller = %caller, trade_id = id, "Trade updated");
                Ok(Some(trade))
            }
            None => {
                debug!(caller = %caller, trade_id = id, "Update of unknown trade");
                Ok(None)
            }
        }
    }

    /// Deleting an unknown id is a no-op; other records are untouched
    /// either way.
    pub async fn delete_trade(&self, caller: &CallerId, id: TradeId) -> Result<()> {
        self.store.remove_trade(caller, id).await?;
        info!(caller = %caller, trade_id = id, "Trade deleted");
        Ok(())
    }

    pub async fn get_trades(&self, caller: &CallerId) -> Result<Vec<Trade>> {
        self.store.list_trades(caller).await
    }

    pub async fn get_trade_by_id(
        &self,
        caller: &CallerId,
        id: TradeId,
    ) -> Result<Option<Trade>> {
        self.store.fetch_trade(caller, id).await
    }

    /// Trades whose stored strategy matches `name` after trimming both
    /// sides.
    pub async fn get_trades_by_strategy(
        &self,
        caller: &CallerId,
        name: &str,
    ) -> Result<Vec<Trade>> {
        let name = name.trim();
        let trades = self.store.list_trades(caller).await?;
        Ok(trades
            .into_iter()
            .filter(|t| t.strategy.trim() == name)
            .collect())
    }

    pub async fn total_trades_count(&self, caller: &CallerId) -> Result<usize> {
        Ok(self.store.list_trades(caller).await?.len())
    }

    pub async fn get_strategies(&self, caller: &CallerId) -> Result<Vec<StrategyUsage>> {
        self.store.list_strategies(caller).await
    }

    pub async fn save_strategy(&self, caller: &CallerId, name: &str) -> Result<()> {
        self.store.record_strategy_usage(caller, name).await
    }

    /// Removes the registry entry only; trades referencing the name keep
    /// it.
    pub async fn delete_strategy(&self, caller: &CallerId, name: &str) -> Result<()> {
        self.store.remove_strategy(caller, name).await
    }

    pub async fn get_account_size(&self, caller: &CallerId) -> Result<f64> {
        Ok(self.store.settings(caller).await?.account_size)
    }

    pub async fn set_account_size(&self, caller: &CallerId, size: f64) -> Result<()> {
        validation::validate_account_size(size)?;
        let mut settings = self.store.settings(caller).await?;
        settings.account_size = size;
        self.store.store_settings(caller, settings).await
    }

    pub async fn get_daily_max_loss(&self, caller: &CallerId) -> Result<f64> {
        Ok(self.store.settings(caller).await?.daily_max_loss_percent)
    }

    pub async fn set_daily_max_loss(&self, caller: &CallerId, percent: f64) -> Result<()> {
        validation::validate_daily_max_loss(percent)?;
        let mut settings = self.store.settings(caller).await?;
        settings.daily_max_loss_percent = percent;
        self.store.store_settings(caller, settings).await
    }

    /// Loss-limit check over the lifetime aggregate net P&L.
    pub async fn get_risk_status(&self, caller: &CallerId) -> Result<RiskStatus> {
        let settings = self.store.settings(caller).await?;
        let total_pnl: f64 = self
            .store
            .list_trades(caller)
            .await?
            .iter()
            .map(|t| t.pnl)
            .sum();
        Ok(risk::evaluate(settings, total_pnl))
    }

    pub async fn export_backup(&self, caller: &CallerId) -> Result<Backup> {
        let trades = self.store.list_trades(caller).await?;
        let settings = self.store.settings(caller).await?;
        Ok(backup::export(trades, settings))
    }

    /// All-or-nothing restore: validation runs to completion before the
    /// store is touched, and a failure leaves existing state unchanged.
    /// The strategy registry is not part of the snapshot.
    pub async fn import_backup(&self, caller: &CallerId, snapshot: Backup) -> Result<()> {
        backup::validate(&snapshot)?;
        let settings = backup::settings_of(&snapshot);
        self.store
            .replace_all(caller, snapshot.trades, settings)
            .await?;
        info!(caller = %caller, "Backup imported");
        Ok(())
    }

    /// Spreadsheet rendition of the full trade log.
    pub async fn export_csv(&self, caller: &CallerId) -> Result<String> {
        let trades = self.store.list_trades(caller).await?;
        export::trades_to_csv(&trades)
    }
}
