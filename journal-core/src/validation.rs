use std::collections::HashSet;

use journal_models::error::{JournalError, Result};
use journal_models::{Backup, Trade, TradeDraft};

macro_rules! ensure {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(JournalError::Validation(format!($($msg)+)));
        }
    };
}

fn ensure_price(value: f64, field: &str) -> Result<()> {
    ensure!(value.is_finite(), "{field} must be a finite number");
    ensure!(value >= 0.0, "{field} must not be negative");
    Ok(())
}

/// Checks every user-settable field before any mutation happens.
pub fn validate_draft(draft: &TradeDraft) -> Result<()> {
    ensure_price(draft.entry_price, "entryPrice")?;
    ensure_price(draft.exit_price, "exitPrice")?;
    ensure_price(draft.stop_loss, "stopLoss")?;
    ensure_price(draft.target, "target")?;
    ensure!(draft.quantity > 0, "quantity must be positive");
    ensure!(
        (1..=5).contains(&draft.conviction_level),
        "convictionLevel must be between 1 and 5, got {}",
        draft.conviction_level
    );
    Ok(())
}

pub fn validate_account_size(size: f64) -> Result<()> {
    ensure!(size.is_finite(), "accountSize must be a finite number");
    ensure!(size > 0.0, "accountSize must be positive");
    Ok(())
}

pub fn validate_daily_max_loss(percent: f64) -> Result<()> {
    ensure!(
        percent.is_finite(),
        "dailyMaxLoss must be a finite number"
    );
    ensure!(
        (0.0..=100.0).contains(&percent),
        "dailyMaxLoss must be between 0 and 100, got {percent}"
    );
    Ok(())
}

fn validate_backup_trade(trade: &Trade) -> Result<()> {
    ensure_price(trade.entry_price, "entryPrice")?;
    ensure_price(trade.exit_price, "exitPrice")?;
    ensure_price(trade.stop_loss, "stopLoss")?;
    ensure_price(trade.target, "target")?;
    ensure!(
        trade.quantity > 0,
        "trade {} has non-positive quantity",
        trade.id
    );
    ensure!(
        (1..=5).contains(&trade.conviction_level),
        "trade {} has conviction level {} outside 1..=5",
        trade.id,
        trade.conviction_level
    );
    ensure!(
        trade.pnl.is_finite() && trade.risk_reward_ratio.is_finite(),
        "trade {} has non-finite derived fields",
        trade.id
    );
    Ok(())
}

/// Full shape check for an imported snapshot. Runs to completion before the
/// caller mutates anything, so a failure leaves existing state untouched.
pub fn validate_backup(backup: &Backup) -> Result<()> {
    validate_account_size(backup.account_size)?;
    validate_daily_max_loss(backup.daily_max_loss)?;

    let mut seen_ids = HashSet::with_capacity(backup.trades.len());
    for trade in &backup.trades {
        validate_backup_trade(trade)
            .map_err(|e| JournalError::Validation(format!("invalid backup: {e}")))?;
        ensure!(
            seen_ids.insert(trade.id),
            "invalid backup: duplicate trade id {}",
            trade.id
        );
    }
    Ok(())
}
