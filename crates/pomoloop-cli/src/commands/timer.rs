use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomoloop_core::storage::Database;
use pomoloop_core::{CoreError, CycleEngine, Event};
use tokio::time::MissedTickBehavior;

use crate::notify;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground until interrupted
    Run,
    /// Print current timer state as JSON
    Status,
    /// Zero the completion counters
    ResetCounters,
}

fn load_engine(db: &Database) -> Result<CycleEngine, CoreError> {
    let record = db.load_record()?.unwrap_or_default();
    Ok(CycleEngine::from_record(&record))
}

pub fn run(action: TimerAction) -> Result<(), CoreError> {
    let db = Database::open()?;

    match action {
        TimerAction::Run => run_loop(&db),
        TimerAction::Status => {
            let engine = load_engine(&db)?;
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            Ok(())
        }
        TimerAction::ResetCounters => {
            let mut record = db.load_record()?.unwrap_or_default();
            record.completed_pomodoros = 0;
            record.pomos_since_long = 0;
            db.save_record(&record)?;
            println!("counters reset");
            Ok(())
        }
    }
}

/// Foreground run loop. Ticks once a second as a scheduling hint; the
/// engine measures real elapsed time itself, so a late tick is harmless.
fn run_loop(db: &Database) -> Result<(), CoreError> {
    let mut engine = load_engine(db)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        if let Some(event) = engine.start() {
            println!("{}", serde_json::to_string(&event)?);
        }

        let mut interval = tokio::time::interval(Duration::from_millis(1000));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match engine.tick() {
                        Some(event) => {
                            db.save_record(&engine.persisted_record())?;
                            println!();
                            println!("{}", serde_json::to_string(&event)?);
                            if let Event::PhaseCompleted { cue, .. } = &event {
                                notify::dispatch(*cue);
                            }
                        }
                        None => {
                            print!("\r{} {}  ", engine.phase().label(), engine.display());
                            std::io::stdout().flush()?;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    if let Some(event) = engine.pause() {
                        println!();
                        println!("{}", serde_json::to_string(&event)?);
                    }
                    db.save_record(&engine.persisted_record())?;
                    break;
                }
            }
        }
        Ok::<(), CoreError>(())
    })?;

    Ok(())
}
