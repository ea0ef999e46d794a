//! Desktop notification dispatch for phase transitions.
//!
//! Notification failures are reported and swallowed; a missing
//! notification daemon must never stop the timer.

use notify_rust::Notification;
use pomoloop_core::NotificationCue;

fn cue_text(cue: NotificationCue) -> (&'static str, &'static str) {
    match cue {
        NotificationCue::FocusStarted => ("Focus", "Break over. Time to focus."),
        NotificationCue::ShortBreakStarted => ("Short Break", "Pomodoro complete. Take a short break."),
        NotificationCue::LongBreakStarted => ("Long Break", "Pomodoro complete. Take a long break."),
    }
}

pub fn dispatch(cue: NotificationCue) {
    let (summary, body) = cue_text(cue);
    if let Err(e) = Notification::new()
        .appname("pomoloop")
        .summary(summary)
        .body(body)
        .show()
    {
        eprintln!("notification failed: {e}");
    }
}
