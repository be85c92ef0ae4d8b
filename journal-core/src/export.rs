use journal_models::error::{JournalError, Result};
use journal_models::Trade;

use crate::metrics;

/// Column set for the spreadsheet export, one row per trade.
pub const CSV_HEADERS: [&str; 17] = [
    "Date",
    "Symbol",
    "Market/Type",
    "Direction",
    "Entry Price",
    "Exit Price",
    "Stop Loss",
    "Target",
    "Quantity",
    "Risk/Trade",
    "RR Ratio",
    "P&L",
    "A+ Setup",
    "Emotion",
    "Followed Plan",
    "Mistake Type",
    "Notes",
];

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Renders the trade collection as RFC 4180 CSV. Fields containing commas,
/// quotes, or newlines are quoted with internal quotes doubled.
pub fn trades_to_csv(trades: &[Trade]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| JournalError::Export(e.to_string()))?;

    for trade in trades {
        let risk = metrics::risk_per_trade(trade.entry_price, trade.stop_loss, trade.quantity);
        writer
            .write_record([
                trade.date.format("%Y-%m-%d").to_string(),
                trade.instrument.clone(),
                trade.market_type.as_str().to_string(),
                trade.direction.to_string(),
                format!("{:.2}", trade.entry_price),
                format!("{:.2}", trade.exit_price),
                format!("{:.2}", trade.stop_loss),
                format!("{:.2}", trade.target),
                trade.quantity.to_string(),
                format!("{risk:.2}"),
                format!("{:.2}", trade.risk_reward_ratio),
                format!("{:.2}", trade.pnl),
                yes_no(trade.is_a_plus_setup).to_string(),
                trade.emotion.clone(),
                yes_no(trade.followed_plan).to_string(),
                trade.mistake_type.clone(),
                trade.notes.clone(),
            ])
            .map_err(|e| JournalError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| JournalError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| JournalError::Export(e.to_string()))
}
