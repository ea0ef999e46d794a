use clap::Subcommand;
use pomoloop_core::storage::Database;
use pomoloop_core::{CoreError, SettingsError, TimerSettings};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Set a settings field (focus, short-break, long-break, pomos-before-long)
    Set {
        /// Field name
        field: String,
        /// New value in minutes (or a count for pomos-before-long)
        value: String,
    },
    /// Restore default settings
    Reset,
}

/// Apply one `field=value` change. Rejects zero, non-numeric input and
/// unknown field names before anything touches the stored record.
fn apply_field(
    mut settings: TimerSettings,
    field: &str,
    value: &str,
) -> Result<TimerSettings, SettingsError> {
    let parsed: u32 = value.parse().map_err(|_| SettingsError::InvalidValue {
        field: field.to_string(),
        message: format!("'{value}' must be a positive integer"),
    })?;
    if parsed == 0 {
        return Err(SettingsError::InvalidValue {
            field: field.to_string(),
            message: "must be a positive integer".to_string(),
        });
    }

    match field {
        "focus" => settings.focus_min = parsed,
        "short-break" => settings.short_break_min = parsed,
        "long-break" => settings.long_break_min = parsed,
        "pomos-before-long" => settings.pomos_before_long = parsed,
        other => return Err(SettingsError::UnknownField(other.to_string())),
    }
    Ok(settings)
}

pub fn run(action: SettingsAction) -> Result<(), CoreError> {
    let db = Database::open()?;
    let mut record = db.load_record()?.unwrap_or_default();

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&record.settings)?);
        }
        SettingsAction::Set { field, value } => {
            record.settings = apply_field(record.settings, &field, &value)?;
            db.save_record(&record)?;
            println!("{}", serde_json::to_string_pretty(&record.settings)?);
        }
        SettingsAction::Reset => {
            record.settings = TimerSettings::default();
            db.save_record(&record)?;
            println!("settings reset to defaults");
        }
    }

    Ok(())
}
