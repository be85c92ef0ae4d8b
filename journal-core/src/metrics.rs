use journal_models::Direction;

/// Profit or loss in currency units for a closed position.
pub fn pnl(direction: Direction, entry_price: f64, exit_price: f64, quantity: u32) -> f64 {
    match direction {
        Direction::Long => (exit_price - entry_price) * f64::from(quantity),
        Direction::Short => (entry_price - exit_price) * f64::from(quantity),
    }
}

/// Reward distance over risk distance from entry. A zero risk distance
/// yields 0, not an error.
pub fn risk_reward_ratio(entry_price: f64, stop_loss: f64, target: f64) -> f64 {
    let risk = (entry_price - stop_loss).abs();
    if risk == 0.0 {
        return 0.0;
    }
    (target - entry_price).abs() / risk
}

/// Price distance between entry and stop.
pub fn risk_distance(entry_price: f64, stop_loss: f64) -> f64 {
    (entry_price - stop_loss).abs()
}

/// Currency amount at risk between entry and stop for the full position.
pub fn risk_per_trade(entry_price: f64, stop_loss: f64, quantity: u32) -> f64 {
    risk_distance(entry_price, stop_loss) * f64::from(quantity)
}
