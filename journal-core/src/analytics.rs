use std::collections::BTreeMap;

use chrono::Datelike;
use indexmap::IndexMap;
use journal_models::Trade;
use serde::{Deserialize, Serialize};

use crate::metrics;

/// Label substituted for a blank strategy field during aggregation. The
/// stored value itself is never rewritten.
pub const UNTAGGED_STRATEGY: &str = "Untagged";

/// Mistake leaderboard depth.
pub const MISTAKE_LEADERBOARD_SIZE: usize = 8;

/// Rollup over one caller's full trade collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStats {
    pub total_trades: usize,
    pub win_rate: f64,
    pub avg_risk_reward: f64,
    pub total_pnl: f64,
    pub best_trade: Option<Trade>,
    pub worst_trade: Option<Trade>,
    pub consecutive_wins: usize,
    pub consecutive_losses: usize,
}

impl TradeStats {
    fn empty() -> Self {
        Self {
            total_trades: 0,
            win_rate: 0.0,
            avg_risk_reward: 0.0,
            total_pnl: 0.0,
            best_trade: None,
            worst_trade: None,
            consecutive_wins: 0,
            consecutive_losses: 0,
        }
    }
}

/// Overall statistics plus streaks. Pure and re-entrant; ties on best and
/// worst trade keep the first record in natural order.
pub fn trade_stats(trades: &[Trade]) -> TradeStats {
    if trades.is_empty() {
        return TradeStats::empty();
    }

    let total = trades.len();
    let wins = trades.iter().filter(|t| t.pnl > 0.0).count();
    let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let avg_risk_reward =
        trades.iter().map(|t| t.risk_reward_ratio).sum::<f64>() / total as f64;

    let mut best = &trades[0];
    let mut worst = &trades[0];
    for trade in &trades[1..] {
        if trade.pnl > best.pnl {
            best = trade;
        }
        if trade.pnl < worst.pnl {
            worst = trade;
        }
    }

    let (consecutive_wins, consecutive_losses) = streaks(trades);

    TradeStats {
        total_trades: total,
        win_rate: wins as f64 / total as f64 * 100.0,
        avg_risk_reward,
        total_pnl,
        best_trade: Some(best.clone()),
        worst_trade: Some(worst.clone()),
        consecutive_wins,
        consecutive_losses,
    }
}

/// Leading win and loss runs, counted from the most recent trade backward.
/// Date ties keep a stable order.
fn streaks(trades: &[Trade]) -> (usize, usize) {
    let mut recent_first: Vec<&Trade> = trades.iter().collect();
    recent_first.sort_by_key(|t| std::cmp::Reverse(t.date));

    let wins = recent_first.iter().take_while(|t| t.pnl > 0.0).count();
    let losses = recent_first.iter().take_while(|t| t.pnl <= 0.0).count();
    (wins, losses)
}

/// One calendar month's bucket, keyed by the UTC year and month of the
/// trade dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub net_pnl: f64,
}

/// Month buckets, most recent month first. A loss is any `pnl <= 0`.
pub fn monthly_stats(trades: &[Trade]) -> Vec<MonthlyStats> {
    let mut buckets: BTreeMap<(i32, u32), Vec<&Trade>> = BTreeMap::new();
    for trade in trades {
        buckets
            .entry((trade.date.year(), trade.date.month()))
            .or_default()
            .push(trade);
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), bucket)| {
            let total = bucket.len();
            let wins = bucket.iter().filter(|t| t.pnl > 0.0).count();
            let losses = total - wins;
            let net_pnl: f64 = bucket.iter().map(|t| t.pnl).sum();
            MonthlyStats {
                year,
                month,
                label: bucket[0].date.format("%B %Y").to_string(),
                total,
                wins,
                losses,
                win_rate: wins as f64 / total as f64 * 100.0,
                net_pnl,
            }
        })
        .collect()
}

/// Per-strategy rollup. `avg_risk` is the mean per-trade risk distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStats {
    pub strategy: String,
    pub trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_risk_reward: f64,
    pub avg_risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategySortKey {
    Strategy,
    Trades,
    WinRate,
    TotalPnl,
    AvgRiskReward,
    AvgRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Strategy label used for bucketing: trimmed, blank mapped to
/// [`UNTAGGED_STRATEGY`].
pub fn strategy_label(trade: &Trade) -> &str {
    let label = trade.strategy.trim();
    if label.is_empty() {
        UNTAGGED_STRATEGY
    } else {
        label
    }
}

/// Strategy buckets in first-seen order.
pub fn strategy_stats(trades: &[Trade]) -> Vec<StrategyStats> {
    let mut buckets: IndexMap<&str, Vec<&Trade>> = IndexMap::new();
    for trade in trades {
        buckets.entry(strategy_label(trade)).or_default().push(trade);
    }

    buckets
        .into_iter()
        .map(|(label, bucket)| {
            let total = bucket.len();
            let wins = bucket.iter().filter(|t| t.pnl > 0.0).count();
            StrategyStats {
                strategy: label.to_string(),
                trades: total,
                win_rate: wins as f64 / total as f64 * 100.0,
                total_pnl: bucket.iter().map(|t| t.pnl).sum(),
                avg_risk_reward: bucket.iter().map(|t| t.risk_reward_ratio).sum::<f64>()
                    / total as f64,
                avg_risk: bucket
                    .iter()
                    .map(|t| metrics::risk_distance(t.entry_price, t.stop_loss))
                    .sum::<f64>()
                    / total as f64,
            }
        })
        .collect()
}

/// Stable single-key sort, caller-selected key and direction. No sort
/// state outlives the call.
pub fn sort_strategy_stats(
    stats: &mut [StrategyStats],
    key: StrategySortKey,
    direction: SortDirection,
) {
    stats.sort_by(|a, b| {
        let ordering = match key {
            StrategySortKey::Strategy => a.strategy.cmp(&b.strategy),
            StrategySortKey::Trades => a.trades.cmp(&b.trades),
            StrategySortKey::WinRate => a.win_rate.total_cmp(&b.win_rate),
            StrategySortKey::TotalPnl => a.total_pnl.total_cmp(&b.total_pnl),
            StrategySortKey::AvgRiskReward => a.avg_risk_reward.total_cmp(&b.avg_risk_reward),
            StrategySortKey::AvgRisk => a.avg_risk.total_cmp(&b.avg_risk),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Bucket with the highest total P&L; ties keep the first-seen bucket.
pub fn best_strategy(trades: &[Trade]) -> Option<StrategyStats> {
    strategy_stats(trades)
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.total_pnl > best.total_pnl {
                candidate
            } else {
                best
            }
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStats {
    pub emotion: String,
    pub trades: usize,
    pub avg_pnl: f64,
}

/// Per-emotion count and mean P&L, in first-seen order.
pub fn emotion_breakdown(trades: &[Trade]) -> Vec<EmotionStats> {
    let mut buckets: IndexMap<&str, (usize, f64)> = IndexMap::new();
    for trade in trades {
        let entry = buckets.entry(trade.emotion.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += trade.pnl;
    }

    buckets
        .into_iter()
        .map(|(emotion, (count, pnl_sum))| EmotionStats {
            emotion: emotion.to_string(),
            trades: count,
            avg_pnl: pnl_sum / count as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeCount {
    pub mistake: String,
    pub count: usize,
}

/// Top mistakes by frequency. Empty mistake fields mean "no mistake" and
/// are skipped; count ties keep first-seen order.
pub fn mistake_frequency(trades: &[Trade]) -> Vec<MistakeCount> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for trade in trades {
        if trade.mistake_type.is_empty() {
            continue;
        }
        *counts.entry(trade.mistake_type.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<MistakeCount> = counts
        .into_iter()
        .map(|(mistake, count)| MistakeCount {
            mistake: mistake.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(MISTAKE_LEADERBOARD_SIZE);
    rows
}
