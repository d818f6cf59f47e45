//! Reminder service: polls the medication database and prints one JSON
//! notification payload per line whenever reminders fire.
//!
//! Usage: `med-reminderd [--once]`

use std::io::Write;

use anyhow::Context;
use med_helper_core::export::NotificationPayload;
use med_helper_core::scheduler::next_poll_delay;
use med_helper_core::{AppConfig, Database, ReminderEngine};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        version = med_helper_core::config::APP_VERSION,
        database = %config.database_path.display(),
        offset = %config.utc_offset,
        poll_secs = config.poll_interval.as_secs(),
        "reminder service starting"
    );

    let db = Database::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    db.set_busy_timeout(config.busy_timeout)?;

    let engine = ReminderEngine::new(&db, config.reminder_policy);
    let once = std::env::args().skip(1).any(|arg| arg == "--once");

    loop {
        tick(&engine, &config)?;

        if once {
            return Ok(());
        }

        std::thread::sleep(next_poll_delay(config.now(), config.poll_interval));
    }
}

/// Run one due check and emit its payload. Store errors while loading are
/// logged and retried next tick.
fn tick(engine: &ReminderEngine<'_>, config: &AppConfig) -> anyhow::Result<()> {
    let now = config.now();
    let check = match engine.check_due_now(now) {
        Ok(check) => check,
        Err(e) => {
            tracing::error!(error = %e, "reminder check failed");
            return Ok(());
        }
    };

    for failure in &check.persist_failures {
        tracing::warn!(
            medication_id = failure.medication_id,
            error = %failure.error,
            "reminder fired but was not recorded"
        );
    }

    let payload = NotificationPayload::from_check(&check, now);
    if payload.is_empty() {
        tracing::debug!(at = %now, "no reminders due");
        return Ok(());
    }

    for reminder in &payload.reminders {
        tracing::info!(
            title = %NotificationPayload::title_for(reminder),
            body = %NotificationPayload::body_for(reminder),
            "notify"
        );
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", payload.to_json()?).context("writing payload")?;
    stdout.flush().context("flushing payload")?;
    Ok(())
}
