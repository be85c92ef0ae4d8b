use journal_models::error::{JournalError, Result};
use journal_models::{AccountSettings, Backup, Trade};

use crate::validation;

/// Value copy of the caller's full state. No filtering, no re-derivation
/// of the stored derived fields.
pub fn export(trades: Vec<Trade>, settings: AccountSettings) -> Backup {
    Backup {
        trades,
        account_size: settings.account_size,
        daily_max_loss: settings.daily_max_loss_percent,
    }
}

/// Shape check for an incoming snapshot; must pass before any state is
/// replaced.
pub fn validate(backup: &Backup) -> Result<()> {
    validation::validate_backup(backup)
}

pub fn settings_of(backup: &Backup) -> AccountSettings {
    AccountSettings {
        account_size: backup.account_size,
        daily_max_loss_percent: backup.daily_max_loss,
    }
}

/// Encodes the interchange document (trades + accountSize + dailyMaxLoss).
pub fn to_json(backup: &Backup) -> Result<String> {
    Ok(serde_json::to_string_pretty(backup)?)
}

/// Decodes an interchange document. A document that does not parse into
/// the expected shape is a validation failure, not a crash.
pub fn from_json(raw: &str) -> Result<Backup> {
    serde_json::from_str(raw)
        .map_err(|e| JournalError::Validation(format!("malformed backup document: {e}")))
}
