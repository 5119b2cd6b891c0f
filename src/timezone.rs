//! Conversion of store timestamps into the configured local timezone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, timezones};

/// Whether `canonical_timezone` names a known timezone, e.g. "Pacific/Auckland".
pub fn is_valid_timezone(canonical_timezone: &str) -> bool {
    timezones::get_by_name(canonical_timezone).is_some()
}

/// The UTC offset of `canonical_timezone` at the instant `at`.
///
/// The offset is looked up for each instant so that timestamps on either side
/// of a daylight saving change are both shown in the right local time.
pub fn get_local_offset(canonical_timezone: &str, at: OffsetDateTime) -> Option<UtcOffset> {
    timezones::get_by_name(canonical_timezone).map(|tz| tz.get_offset_utc(&at).to_utc())
}

/// Convert `datetime` to local time in `canonical_timezone`, or leave it in UTC
/// if the timezone is unknown.
pub fn to_local_time(datetime: OffsetDateTime, canonical_timezone: &str) -> OffsetDateTime {
    match get_local_offset(canonical_timezone, datetime) {
        Some(offset) => datetime.to_offset(offset),
        None => datetime.to_offset(UtcOffset::UTC),
    }
}

#[cfg(test)]
mod tests {
    use time::{UtcOffset, macros::datetime};

    use super::{get_local_offset, is_valid_timezone, to_local_time};

    #[test]
    fn recognises_canonical_names() {
        assert!(is_valid_timezone("Etc/UTC"));
        assert!(is_valid_timezone("Europe/Paris"));
        assert!(!is_valid_timezone("Mars/Olympus_Mons"));
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let winter = get_local_offset("Europe/Paris", datetime!(2025-01-15 12:00 UTC)).unwrap();
        let summer = get_local_offset("Europe/Paris", datetime!(2025-07-15 12:00 UTC)).unwrap();

        assert_eq!(winter, UtcOffset::from_hms(1, 0, 0).unwrap());
        assert_eq!(summer, UtcOffset::from_hms(2, 0, 0).unwrap());
    }

    #[test]
    fn converts_to_local_time() {
        let local = to_local_time(datetime!(2025-07-15 22:30 UTC), "Europe/Paris");

        assert_eq!(local, datetime!(2025-07-16 00:30 +2));
    }

    #[test]
    fn unknown_timezone_stays_utc() {
        let local = to_local_time(datetime!(2025-07-15 22:30 +5), "Nowhere/Special");

        assert_eq!(local.offset(), UtcOffset::UTC);
    }
}
