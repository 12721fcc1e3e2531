use heapless::String;
use serde::{Deserialize, Serialize};
use ufmt::uwrite;

const SECONDS_PER_DAY: u64 = 86_400;
const EPOCH_YEAR: u16 = 1970;

/// Seconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// 9999-12-31 23:59:59 UTC, the last instant a four-digit year can show.
    pub const MAX_DISPLAYABLE: Timestamp = Timestamp(253_402_300_799);
}

/// A broken-down UTC calendar time.
/// Months and days start at 1; weekday 0 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    pub second: u8,
    pub minute: u8,
    pub hour: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    pub weekday: u8,
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl Timestamp {
    /// Converts to a calendar date by peeling off whole years, then whole
    /// months, from the day count. Times past
    /// [`Timestamp::MAX_DISPLAYABLE`] are clamped to it.
    pub fn civil(self) -> CivilTime {
        let seconds = self.0.min(Self::MAX_DISPLAYABLE.0);
        let mut days = seconds / SECONDS_PER_DAY;
        let secs = seconds % SECONDS_PER_DAY;
        // 1970-01-01 was a Thursday
        let weekday = ((days + 4) % 7) as u8;

        let mut year = EPOCH_YEAR;
        loop {
            let days_in_year = if is_leap_year(year) { 366 } else { 365 };
            if days < days_in_year {
                break;
            }
            days -= days_in_year;
            year += 1;
        }

        let mut month = 1;
        loop {
            let days_in_month = u64::from(days_in_month(month, year));
            if days < days_in_month {
                break;
            }
            days -= days_in_month;
            month += 1;
        }

        CivilTime {
            second: (secs % 60) as u8,
            minute: (secs / 60 % 60) as u8,
            hour: (secs / 3600) as u8,
            day: days as u8 + 1,
            month,
            year,
            weekday,
        }
    }
}

impl CivilTime {
    /// Gets the time in the HH:MM:SS format and the date in DD/MM/YYYY
    /// returns: (HH:MM:SS, DD/MM/YYYY)
    pub fn formatted(&self) -> (String<8>, String<10>) {
        let mut time: String<8> = String::new();
        let mut date: String<10> = String::new();
        // Both buffers are sized for their widest output
        let _ = uwrite!(
            &mut time,
            "{}:{}:{}",
            pad_number(self.hour).as_str(),
            pad_number(self.minute).as_str(),
            pad_number(self.second).as_str()
        );
        let _ = uwrite!(
            &mut date,
            "{}/{}/{}",
            pad_number(self.day).as_str(),
            pad_number(self.month).as_str(),
            self.year
        );
        (time, date)
    }

    /// Date and time joined as "DD/MM/YYYY HH:MM:SS"
    pub fn to_display(&self) -> String<19> {
        let (time, date) = self.formatted();
        let mut out: String<19> = String::new();
        let _ = uwrite!(&mut out, "{} {}", date.as_str(), time.as_str());
        out
    }
}

/// Pads a number with a zero before it if < 10
/// NOTE: Only supports values <100
fn pad_number(num: u8) -> String<2> {
    let mut padded = String::new();
    if num < 10 {
        let _ = uwrite!(&mut padded, "0{}", num);
    } else {
        let _ = uwrite!(&mut padded, "{}", num);
    }
    padded
}

/// Calculates if it is leap year
pub fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Gets the amount of days in a month (1-based)
pub fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Wall clock backed by [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timestamp(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_first_of_january_1970() {
        let t = Timestamp(0).civil();
        assert_eq!((t.day, t.month, t.year), (1, 1, 1970));
        assert_eq!((t.hour, t.minute, t.second), (0, 0, 0));
        assert_eq!(t.weekday, 4);
    }

    #[test]
    fn converts_leap_day() {
        // 2024-02-29 12:34:56 UTC
        let t = Timestamp(1_709_210_096).civil();
        assert_eq!((t.day, t.month, t.year), (29, 2, 2024));
        assert_eq!((t.hour, t.minute, t.second), (12, 34, 56));
    }

    #[test]
    fn converts_end_of_year() {
        // 2023-12-31 23:59:59 UTC
        let t = Timestamp(1_704_067_199).civil();
        assert_eq!((t.day, t.month, t.year), (31, 12, 2023));
        assert_eq!((t.hour, t.minute, t.second), (23, 59, 59));
        // and one second later
        let t = Timestamp(1_704_067_200).civil();
        assert_eq!((t.day, t.month, t.year), (1, 1, 2024));
        assert_eq!(t.weekday, 1);
    }

    #[test]
    fn formats_with_zero_padding() {
        // 2001-09-09 01:46:40 UTC
        let (time, date) = Timestamp(1_000_000_000).civil().formatted();
        assert_eq!(time.as_str(), "01:46:40");
        assert_eq!(date.as_str(), "09/09/2001");
        assert_eq!(
            Timestamp(1_000_000_000).civil().to_display().as_str(),
            "09/09/2001 01:46:40"
        );
    }

    #[test]
    fn far_future_clamps_to_year_9999() {
        let last = Timestamp::MAX_DISPLAYABLE.civil();
        assert_eq!((last.day, last.month, last.year), (31, 12, 9999));
        assert_eq!((last.hour, last.minute, last.second), (23, 59, 59));
        assert_eq!(last.weekday, 5);

        assert_eq!(Timestamp(u64::MAX).civil(), last);
        assert_eq!(
            Timestamp(u64::MAX).civil().to_display().as_str(),
            "31/12/9999 23:59:59"
        );
    }

    #[test]
    fn leap_year_rules() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2, 1900), 28);
        assert_eq!(days_in_month(2, 2000), 29);
        assert_eq!(days_in_month(11, 2000), 30);
    }
}
