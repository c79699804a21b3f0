use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime, TimeZone};
use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Matches a clock time anywhere in the reminder text: "at 5pm",
/// "at 17:30", "at 9:05 am". Minutes and the meridiem are optional.
fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b")
            .unwrap_or_else(|e| panic!("invalid reminder pattern: {e}"))
    })
}

/// Pull the first clock time out of free text. Returns `None` when no
/// "at <time>" phrase is present or the digits are out of range.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let caps = time_pattern().captures(text)?;

    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let meridiem = caps.get(3).map(|m| m.as_str().to_ascii_lowercase());

    match meridiem.as_deref() {
        Some("pm") if hour < 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Resolve a wall-clock time to its next occurrence: today if still ahead,
/// otherwise tomorrow.
pub fn next_occurrence(now: DateTime<Local>, time: NaiveTime) -> DateTime<Local> {
    let today = now.date_naive().and_time(time);
    let candidate = Local
        .from_local_datetime(&today)
        .earliest()
        .unwrap_or(now);
    if candidate > now {
        candidate
    } else {
        candidate + ChronoDuration::days(1)
    }
}

pub struct Reminder {
    pub text: String,
    pub fire_at: DateTime<Local>,
    handle: JoinHandle<()>,
}

/// Armed one-shot reminders. Each entry owns a sleeping task that pushes an
/// alarm line into the channel when its time comes; removing the entry
/// aborts the task so the alarm never fires.
#[derive(Default)]
pub struct ReminderList {
    reminders: Vec<Reminder>,
}

impl ReminderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the time out of `text` and arm a reminder for its next
    /// occurrence. Returns the scheduled instant, or `None` when no clock
    /// time could be found.
    pub fn arm(
        &mut self,
        text: &str,
        alarms: UnboundedSender<String>,
    ) -> Option<DateTime<Local>> {
        let time = parse_clock_time(text)?;
        let fire_at = next_occurrence(Local::now(), time);

        let delay = (fire_at - Local::now())
            .to_std()
            .unwrap_or_default();
        let message = format!("⏰ Reminder: {}", text.trim());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = alarms.send(message);
        });

        self.reminders.push(Reminder {
            text: text.trim().to_string(),
            fire_at,
            handle,
        });
        Some(fire_at)
    }

    /// Drop a reminder and cancel its timer.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.reminders.len() {
            return None;
        }
        let reminder = self.reminders.remove(index);
        reminder.handle.abort();
        Some(reminder.text)
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }
}

impl Drop for ReminderList {
    fn drop(&mut self) {
        for reminder in &self.reminders {
            reminder.handle.abort();
        }
    }
}
