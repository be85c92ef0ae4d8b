use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

use error::Result;

/// Store-assigned trade identifier, unique within one caller's journal.
pub type TradeId = u64;

/// Opaque identity of the journal owner. Partitioning by caller is the
/// store's responsibility; the core never mixes two callers' state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// Trading Types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketType {
    Equity,
    Future,
    Option,
    CurrencyPair,
    Crypto,
}

impl MarketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::Equity => "Equity",
            MarketType::Future => "Future",
            MarketType::Option => "Option",
            MarketType::CurrencyPair => "Currency Pair",
            MarketType::Crypto => "Crypto",
        }
    }
}

/// One logged position. `pnl` and `risk_reward_ratio` are derived once at
/// write time and stored; aggregation never re-derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub date: DateTime<Utc>,
    pub instrument: String,
    pub market_type: MarketType,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub quantity: u32,
    pub is_a_plus_setup: bool,
    pub emotion: String,
    pub conviction_level: u8,
    pub strategy: String,
    pub followed_plan: bool,
    pub mistake_type: String,
    pub notes: String,
    pub pnl: f64,
    pub risk_reward_ratio: f64,
}

impl Trade {
    /// Assembles a full record from user-settable fields plus the derived
    /// values computed for this write.
    pub fn from_draft(id: TradeId, draft: TradeDraft, pnl: f64, risk_reward_ratio: f64) -> Self {
        Self {
            id,
            date: draft.date,
            instrument: draft.instrument,
            market_type: draft.market_type,
            direction: draft.direction,
            entry_price: draft.entry_price,
            exit_price: draft.exit_price,
            stop_loss: draft.stop_loss,
            target: draft.target,
            quantity: draft.quantity,
            is_a_plus_setup: draft.is_a_plus_setup,
            emotion: draft.emotion,
            conviction_level: draft.conviction_level,
            strategy: draft.strategy,
            followed_plan: draft.followed_plan,
            mistake_type: draft.mistake_type,
            notes: draft.notes,
            pnl,
            risk_reward_ratio,
        }
    }
}

/// User-settable trade fields. The only input shape for add and update;
/// there is no partial-update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub date: DateTime<Utc>,
    pub instrument: String,
    pub market_type: MarketType,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub quantity: u32,
    pub is_a_plus_setup: bool,
    pub emotion: String,
    pub conviction_level: u8,
    pub strategy: String,
    pub followed_plan: bool,
    pub mistake_type: String,
    pub notes: String,
}

/// Per-caller singleton, mutated independently of trades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub account_size: f64,
    pub daily_max_loss_percent: f64,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            account_size: 1000.0,
            daily_max_loss_percent: 20.0,
        }
    }
}

/// Snapshot of one caller's full state. Exists only transiently during
/// export/import; field spelling matches the interchange document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub trades: Vec<Trade>,
    pub account_size: f64,
    pub daily_max_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyUsage {
    pub name: String,
    pub count: u64,
}

// Store seam. Persistence (and its latency/retry policy) belongs to the
// external collaborator; every operation is scoped to one caller.
use async_trait::async_trait;

#[async_trait]
pub trait JournalStore: Send + Sync {
    /// All trades in natural (insertion) order.
    async fn list_trades(&self, caller: &CallerId) -> Result<Vec<Trade>>;
    async fn fetch_trade(&self, caller: &CallerId, id: TradeId) -> Result<Option<Trade>>;
    /// Persists a new record; the store assigns the id and returns the
    /// stored trade.
    async fn insert_trade(&self, caller: &CallerId, trade: Trade) -> Result<Trade>;
    /// Wholesale replacement of the record with `trade.id`. `None` when the
    /// id is unknown; no partial update is observable either way.
    async fn replace_trade(&self, caller: &CallerId, trade: Trade) -> Result<Option<Trade>>;
    /// Removing an unknown id is a no-op and never affects other records.
    async fn remove_trade(&self, caller: &CallerId, id: TradeId) -> Result<()>;

    async fn settings(&self, caller: &CallerId) -> Result<AccountSettings>;
    async fn store_settings(&self, caller: &CallerId, settings: AccountSettings) -> Result<()>;

    async fn list_strategies(&self, caller: &CallerId) -> Result<Vec<StrategyUsage>>;
    async fn record_strategy_usage(&self, caller: &CallerId, name: &str) -> Result<()>;
    async fn remove_strategy(&self, caller: &CallerId, name: &str) -> Result<()>;

    /// Atomically swaps in a full state snapshot (trades + settings).
    /// Either everything is replaced or nothing is.
    async fn replace_all(
        &self,
        caller: &CallerId,
        trades: Vec<Trade>,
        settings: AccountSettings,
    ) -> Result<()>;
}
