use chrono::{TimeZone, Utc};
use journal_core::{analytics, backup, JournalService};
use journal_models::error::JournalError;
use journal_models::{CallerId, Direction, MarketType, TradeDraft};
use tracing::info;
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn caller() -> CallerId {
    CallerId::new(Uuid::new_v4().to_string())
}

fn draft(day: u32, exit_price: f64, strategy: &str) -> TradeDraft {
    TradeDraft {
        date: Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap(),
        instrument: "ACME".into(),
        market_type: MarketType::Equity,
        direction: Direction::Long,
        entry_price: 100.0,
        exit_price,
        stop_loss: 95.0,
        target: 115.0,
        quantity: 1,
        is_a_plus_setup: false,
        emotion: "Calm".into(),
        conviction_level: 3,
        strategy: strategy.into(),
        followed_plan: true,
        mistake_type: String::new(),
        notes: "entered on \"retest\", held".into(),
    }
}

#[tokio::test]
async fn full_journal_lifecycle() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    // pnl sequence by date ascending: +1, -2, +3, +5
    let first = service.add_trade(&user, draft(1, 101.0, "Breakout")).await?;
    service.add_trade(&user, draft(2, 98.0, "Breakout")).await?;
    service.add_trade(&user, draft(3, 103.0, "")).await?;
    service.add_trade(&user, draft(4, 105.0, "Reversal")).await?;

    let trades = service.get_trades(&user).await?;
    assert_eq!(trades.len(), 4);

    let stats = analytics::trade_stats(&trades);
    assert_eq!(stats.total_trades, 4);
    assert_eq!(stats.win_rate, 75.0);
    assert_eq!(stats.total_pnl, 7.0);
    assert_eq!(stats.consecutive_wins, 2);
    assert_eq!(stats.consecutive_losses, 0);

    let by_strategy = analytics::strategy_stats(&trades);
    assert_eq!(by_strategy[0].strategy, "Breakout");
    assert_eq!(by_strategy[0].trades, 2);
    assert!(by_strategy
        .iter()
        .any(|s| s.strategy == analytics::UNTAGGED_STRATEGY && s.trades == 1));

    // Full-field update recomputes the stored derived values.
    let updated = service
        .update_trade(&user, first, draft(1, 111.0, "Breakout"))
        .await?
        .expect("trade exists");
    assert_eq!(updated.pnl, 11.0);

    service.delete_trade(&user, first).await?;
    service.delete_trade(&user, 999).await?; // unknown id: no-op
    assert_eq!(service.total_trades_count(&user).await?, 3);

    info!("journal lifecycle verified");
    Ok(())
}

#[tokio::test]
async fn risk_status_tracks_loss_limit_breach() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    service.set_daily_max_loss(&user, 2.0).await?;
    service.add_trade(&user, draft(1, 85.0, "")).await?; // pnl -15

    let status = service.get_risk_status(&user).await?;
    assert_eq!(status.max_loss_amount, 20.0);
    assert!(!status.breached);

    service.add_trade(&user, draft(2, 90.0, "")).await?; // lifetime pnl -25
    let status = service.get_risk_status(&user).await?;
    assert_eq!(status.total_pnl, -25.0);
    assert!(status.breached);
    Ok(())
}

#[tokio::test]
async fn backup_round_trip_restores_identical_state() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    service.add_trade(&user, draft(1, 101.0, "Breakout")).await?;
    service.add_trade(&user, draft(2, 98.0, "Reversal")).await?;
    service.set_account_size(&user, 5000.0).await?;
    service.set_daily_max_loss(&user, 5.0).await?;

    let before_trades = service.get_trades(&user).await?;
    let snapshot = service.export_backup(&user).await?;

    // Encode/decode through the interchange document, as a real
    // download/upload cycle would.
    let document = backup::to_json(&snapshot)?;
    let decoded = backup::from_json(&document)?;
    service.import_backup(&user, decoded).await?;

    assert_eq!(service.get_trades(&user).await?, before_trades);
    assert_eq!(service.get_account_size(&user).await?, 5000.0);
    assert_eq!(service.get_daily_max_loss(&user).await?, 5.0);

    // The id counter resumes above the restored ids.
    let next = service.add_trade(&user, draft(3, 104.0, "")).await?;
    assert_eq!(next, 3);
    Ok(())
}

#[tokio::test]
async fn malformed_backup_leaves_state_untouched() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    service.add_trade(&user, draft(1, 101.0, "Breakout")).await?;
    let before_trades = service.get_trades(&user).await?;
    let before_size = service.get_account_size(&user).await?;

    // A trade record with entryPrice stripped fails shape validation at
    // decode time.
    let mut doc: serde_json::Value =
        serde_json::from_str(&backup::to_json(&service.export_backup(&user).await?)?)?;
    doc["trades"][0]
        .as_object_mut()
        .expect("trade object")
        .remove("entryPrice");
    let err = backup::from_json(&doc.to_string()).unwrap_err();
    assert!(matches!(err, JournalError::Validation(_)));

    // A well-formed document with out-of-range values fails before any
    // mutation.
    let mut bad = service.export_backup(&user).await?;
    bad.trades[0].conviction_level = 11;
    let err = service.import_backup(&user, bad).await.unwrap_err();
    assert!(matches!(err, JournalError::Validation(_)));

    assert_eq!(service.get_trades(&user).await?, before_trades);
    assert_eq!(service.get_account_size(&user).await?, before_size);
    Ok(())
}

#[tokio::test]
async fn import_preserves_strategy_registry() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    service.add_trade(&user, draft(1, 101.0, "Breakout")).await?;
    let snapshot = service.export_backup(&user).await?;
    service.import_backup(&user, snapshot).await?;

    let strategies = service.get_strategies(&user).await?;
    assert_eq!(strategies.len(), 1);
    assert_eq!(strategies[0].name, "Breakout");
    Ok(())
}

#[tokio::test]
async fn callers_are_fully_isolated() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let alice = caller();
    let bob = caller();

    service.add_trade(&alice, draft(1, 101.0, "Breakout")).await?;
    service.set_account_size(&alice, 9000.0).await?;

    assert_eq!(service.total_trades_count(&bob).await?, 0);
    assert_eq!(service.get_account_size(&bob).await?, 1000.0);
    assert!(service.get_strategies(&bob).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn csv_export_quotes_notes_with_embedded_quotes() -> anyhow::Result<()> {
    init_tracing();
    let service = JournalService::in_memory();
    let user = caller();

    service.add_trade(&user, draft(1, 101.0, "Breakout")).await?;
    let rendered = service.export_csv(&user).await?;

    let mut lines = rendered.lines();
    assert!(lines.next().unwrap().starts_with("Date,Symbol,Market/Type"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("2025-06-01,ACME,Equity,Long,100.00,101.00"));
    assert!(row.ends_with("\"entered on \"\"retest\"\", held\""));
    Ok(())
}
