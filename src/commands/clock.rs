use crate::services::trading_hours::{MarketSession, TradingHours};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClockStatus {
    pub now: DateTime<Utc>,
    pub session: MarketSession,
    pub next_open: Option<DateTime<Utc>>,
    /// Minutes left in the regular session
    pub minutes_to_close: Option<i64>,
}

pub fn clock_status(hours: &TradingHours, now: DateTime<Utc>) -> ClockStatus {
    ClockStatus {
        now,
        session: hours.session_at(now),
        next_open: hours.next_open_after(now),
        minutes_to_close: hours.time_until_close(now).map(|d| d.num_minutes()),
    }
}

pub fn run(json: bool) {
    let status = clock_status(&TradingHours::default(), Utc::now());

    if json {
        match serde_json::to_string_pretty(&status) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("🕒 US Market Clock\n");
    println!("   Session:   {}", status.session);
    if let Some(minutes) = status.minutes_to_close {
        println!("   Closes in: {}h {:02}m", minutes / 60, minutes % 60);
    }
    if let Some(next_open) = status.next_open {
        println!("   Next open: {} UTC", next_open.format("%Y-%m-%d %H:%M"));
    }
}
