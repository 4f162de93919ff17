//! BCD-encoded date/time helpers.
//!
//! Dates are 3 bytes BCD `YY MM DD` (year offset from 2000); times are
//! either 3 bytes BCD `HH MM SS` ([`Time`]) or 2 bytes BCD `HH MM`
//! ([`HourMinute`], used by time profile segments and task start times).
//! An all-zero encoding is the "absent" sentinel for both [`Date`] and
//! [`Time`]; it decodes to `None` rather than to midnight/epoch.

pub(crate) fn bcd_to_decimal(byte: u8) -> u8 {
    (byte >> 4) * 10 + (byte & 0x0F)
}

fn decimal_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// A calendar date, BCD-encoded as `YY MM DD` where `YY` is the year minus
/// 2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    /// Full year, e.g. 2018.
    pub year: u16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
}

impl Date {
    /// Decodes a 3-byte BCD date. Returns `None` for the all-zero sentinel.
    #[must_use]
    pub fn decode(bytes: [u8; 3]) -> Option<Self> {
        if bytes == [0, 0, 0] {
            return None;
        }
        Some(Self {
            year: 2000 + u16::from(bcd_to_decimal(bytes[0])),
            month: bcd_to_decimal(bytes[1]),
            day: bcd_to_decimal(bytes[2]),
        })
    }

    /// Encodes this date (or the null sentinel, for `None`) as 3 BCD bytes.
    #[must_use]
    pub fn encode(date: Option<Self>) -> [u8; 3] {
        match date {
            None => [0, 0, 0],
            Some(d) => {
                let yy = (d.year % 100) as u8;
                [decimal_to_bcd(yy), decimal_to_bcd(d.month), decimal_to_bcd(d.day)]
            },
        }
    }
}

/// A time of day, BCD-encoded as `HH MM SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl Time {
    /// Decodes a 3-byte BCD time. Returns `None` for the all-zero sentinel.
    #[must_use]
    pub fn decode(bytes: [u8; 3]) -> Option<Self> {
        if bytes == [0, 0, 0] {
            return None;
        }
        Some(Self {
            hour: bcd_to_decimal(bytes[0]),
            minute: bcd_to_decimal(bytes[1]),
            second: bcd_to_decimal(bytes[2]),
        })
    }

    /// Encodes this time (or the null sentinel, for `None`) as 3 BCD bytes.
    #[must_use]
    pub fn encode(time: Option<Self>) -> [u8; 3] {
        match time {
            None => [0, 0, 0],
            Some(t) => {
                [decimal_to_bcd(t.hour), decimal_to_bcd(t.minute), decimal_to_bcd(t.second)]
            },
        }
    }
}

/// An `HH:MM` time-of-day, used by time profile segments and task start
/// times (no seconds field on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourMinute {
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
}

impl HourMinute {
    /// Decodes a 2-byte BCD `HH:MM`. Returns `None` for the all-zero
    /// sentinel (an unused time profile segment).
    #[must_use]
    pub fn decode(bytes: [u8; 2]) -> Option<Self> {
        if bytes == [0, 0] {
            return None;
        }
        Some(Self { hour: bcd_to_decimal(bytes[0]), minute: bcd_to_decimal(bytes[1]) })
    }

    /// Encodes this `HH:MM` (or the null sentinel, for `None`) as 2 BCD
    /// bytes.
    #[must_use]
    pub fn encode(value: Option<Self>) -> [u8; 2] {
        match value {
            None => [0, 0],
            Some(hm) => [decimal_to_bcd(hm.hour), decimal_to_bcd(hm.minute)],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn null_date_round_trips() {
        assert_eq!(Date::decode([0, 0, 0]), None);
        assert_eq!(Date::encode(None), [0, 0, 0]);
    }

    #[test]
    fn null_time_round_trips() {
        assert_eq!(Time::decode([0, 0, 0]), None);
        assert_eq!(Time::encode(None), [0, 0, 0]);
    }

    #[test]
    fn decodes_known_date() {
        // 2018-11-05 -> BCD 18 11 05
        let date = Date::decode([0x18, 0x11, 0x05]).unwrap();
        assert_eq!(date, Date { year: 2018, month: 11, day: 5 });
    }

    proptest! {
        #[test]
        fn date_round_trips(year in 2000u16..2099, month in 1u8..=12, day in 1u8..=28) {
            let date = Date { year, month, day };
            let encoded = Date::encode(Some(date));
            prop_assert_eq!(Date::decode(encoded), Some(date));
        }

        #[test]
        fn time_round_trips(hour in 0u8..24, minute in 0u8..60, second in 0u8..60) {
            let time = Time { hour, minute, second };
            let encoded = Time::encode(Some(time));
            prop_assert_eq!(Time::decode(encoded), Some(time));
        }

        #[test]
        fn hour_minute_round_trips(hour in 0u8..24, minute in 1u8..60) {
            let hm = HourMinute { hour, minute };
            let encoded = HourMinute::encode(Some(hm));
            prop_assert_eq!(HourMinute::decode(encoded), Some(hm));
        }
    }
}
