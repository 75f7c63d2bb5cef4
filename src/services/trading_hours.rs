use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Trading session of the US equity market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSession {
    PreMarket,
    Open,
    AfterHours,
    Closed,
}

impl MarketSession {
    pub fn label(&self) -> &'static str {
        match self {
            MarketSession::PreMarket => "Pre-Market",
            MarketSession::Open => "Market Open",
            MarketSession::AfterHours => "After Hours",
            MarketSession::Closed => "Market Closed",
        }
    }

    /// Any session where quotes move (extended hours included)
    pub fn is_trading(&self) -> bool {
        !matches!(self, MarketSession::Closed)
    }
}

impl fmt::Display for MarketSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Trading hours configuration for the US stock market
///
/// Market holidays are not modelled.
pub struct TradingHours {
    pub pre_market_open: NaiveTime,  // 04:00
    pub regular_open: NaiveTime,     // 09:30
    pub regular_close: NaiveTime,    // 16:00
    pub after_hours_close: NaiveTime, // 20:00
    pub timezone: &'static str,      // "America/New_York"
    pub weekdays_only: bool,         // true for Monday-Friday only
}

impl Default for TradingHours {
    fn default() -> Self {
        Self {
            pre_market_open: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or_default(),
            regular_open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            regular_close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
            after_hours_close: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            timezone: "America/New_York",
            weekdays_only: true,
        }
    }
}

impl TradingHours {
    fn tz(&self) -> Option<Tz> {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                tracing::warn!("Failed to parse timezone '{}': {}", self.timezone, e);
                None
            }
        }
    }

    fn is_trading_day(&self, weekday: Weekday) -> bool {
        !self.weekdays_only || !matches!(weekday, Weekday::Sat | Weekday::Sun)
    }

    /// Session at a given instant
    pub fn session_at(&self, now: DateTime<Utc>) -> MarketSession {
        // Default to closed if the timezone cannot be parsed
        let Some(tz) = self.tz() else {
            return MarketSession::Closed;
        };

        let now_local = now.with_timezone(&tz);
        if !self.is_trading_day(now_local.weekday()) {
            return MarketSession::Closed;
        }

        let time = now_local.time();
        if time >= self.pre_market_open && time < self.regular_open {
            MarketSession::PreMarket
        } else if time >= self.regular_open && time < self.regular_close {
            MarketSession::Open
        } else if time >= self.regular_close && time < self.after_hours_close {
            MarketSession::AfterHours
        } else {
            MarketSession::Closed
        }
    }

    /// Check if the regular session is open at a given instant
    pub fn is_market_open_at(&self, now: DateTime<Utc>) -> bool {
        self.session_at(now) == MarketSession::Open
    }

    /// Next regular-session open strictly after `now`
    pub fn next_open_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let tz = self.tz()?;
        let today = now.with_timezone(&tz).date_naive();

        for offset in 0..=7 {
            let date = today + ChronoDuration::days(offset);
            if !self.is_trading_day(date.weekday()) {
                continue;
            }

            let open = tz
                .from_local_datetime(&date.and_time(self.regular_open))
                .earliest()?
                .with_timezone(&Utc);
            if open > now {
                return Some(open);
            }
        }

        None
    }

    /// Time left in the regular session, `None` outside it
    pub fn time_until_close(&self, now: DateTime<Utc>) -> Option<ChronoDuration> {
        if !self.is_market_open_at(now) {
            return None;
        }

        let tz = self.tz()?;
        let close = tz
            .from_local_datetime(&now.with_timezone(&tz).date_naive().and_time(self.regular_close))
            .earliest()?
            .with_timezone(&Utc);
        Some(close - now)
    }
}

/// Current session with the default US configuration
pub fn current_session() -> MarketSession {
    TradingHours::default().session_at(Utc::now())
}

/// Get appropriate refresh interval based on market session
///
/// While quotes move (pre-market, open, after hours) movers are refreshed
/// at `trading_interval`, otherwise at `closed_interval`.
pub fn get_refresh_interval(trading_interval: Duration, closed_interval: Duration) -> Duration {
    if current_session().is_trading() {
        trading_interval
    } else {
        closed_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_trading_hours_config() {
        let config = TradingHours::default();
        assert_eq!(config.regular_open, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.regular_close, NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        assert_eq!(config.timezone, "America/New_York");
        assert!(config.weekdays_only);
    }

    #[test]
    fn test_sessions_winter() {
        let hours = TradingHours::default();
        // Wednesday, EST (UTC-5)
        assert_eq!(hours.session_at(utc("2024-01-10T08:59:00Z")), MarketSession::Closed);
        assert_eq!(hours.session_at(utc("2024-01-10T13:00:00Z")), MarketSession::PreMarket);
        assert_eq!(hours.session_at(utc("2024-01-10T14:30:00Z")), MarketSession::Open);
        assert_eq!(hours.session_at(utc("2024-01-10T21:00:00Z")), MarketSession::AfterHours);
        assert_eq!(hours.session_at(utc("2024-01-11T02:00:00Z")), MarketSession::Closed);
    }

    #[test]
    fn test_sessions_daylight_saving() {
        let hours = TradingHours::default();
        // Wednesday, EDT (UTC-4): 13:30Z is 09:30 local
        assert_eq!(hours.session_at(utc("2024-03-13T13:30:00Z")), MarketSession::Open);
        assert_eq!(hours.session_at(utc("2024-03-13T13:29:00Z")), MarketSession::PreMarket);
    }

    #[test]
    fn test_weekend_closed() {
        let hours = TradingHours::default();
        assert_eq!(hours.session_at(utc("2024-01-13T15:00:00Z")), MarketSession::Closed);
        assert!(!hours.is_market_open_at(utc("2024-01-14T15:00:00Z")));
    }

    #[test]
    fn test_next_open_skips_weekend() {
        let hours = TradingHours::default();
        // Friday evening → Monday 09:30 EST
        let next = hours.next_open_after(utc("2024-01-12T22:00:00Z")).unwrap();
        assert_eq!(next, utc("2024-01-15T14:30:00Z"));

        // Early Wednesday → same day
        let next = hours.next_open_after(utc("2024-01-10T10:00:00Z")).unwrap();
        assert_eq!(next, utc("2024-01-10T14:30:00Z"));
    }

    #[test]
    fn test_time_until_close() {
        let hours = TradingHours::default();
        let left = hours.time_until_close(utc("2024-01-10T20:00:00Z")).unwrap();
        assert_eq!(left, ChronoDuration::hours(1));
        assert!(hours.time_until_close(utc("2024-01-10T22:00:00Z")).is_none());
    }

    #[test]
    fn test_invalid_timezone_is_closed() {
        let hours = TradingHours {
            timezone: "Mars/Olympus_Mons",
            ..TradingHours::default()
        };
        assert_eq!(hours.session_at(utc("2024-01-10T15:00:00Z")), MarketSession::Closed);
        assert!(hours.next_open_after(utc("2024-01-10T15:00:00Z")).is_none());
    }
}
