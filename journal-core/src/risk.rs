use journal_models::AccountSettings;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of the daily loss-limit check. The evaluator only reports;
/// blocking entries or alerting is the presentation layer's job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskStatus {
    pub total_pnl: f64,
    pub account_size: f64,
    pub daily_max_loss: f64,
    pub max_loss_amount: f64,
    pub pnl_percent: f64,
    pub breached: bool,
}

/// Compares the aggregate net P&L against the account-relative loss limit.
/// The aggregate is the lifetime total across all trades, not a
/// calendar-day slice. A zero account size reports `pnl_percent` as 0.
pub fn evaluate(settings: AccountSettings, total_pnl: f64) -> RiskStatus {
    let max_loss_amount = settings.account_size * settings.daily_max_loss_percent / 100.0;
    let pnl_percent = if settings.account_size > 0.0 {
        total_pnl / settings.account_size * 100.0
    } else {
        0.0
    };
    let breached = total_pnl < -max_loss_amount;

    if breached {
        warn!(
            total_pnl = total_pnl,
            max_loss_amount = max_loss_amount,
            account_size = settings.account_size,
            "Daily loss limit breached"
        );
    }

    RiskStatus {
        total_pnl,
        account_size: settings.account_size,
        daily_max_loss: settings.daily_max_loss_percent,
        max_loss_amount,
        pnl_percent,
        breached,
    }
}
