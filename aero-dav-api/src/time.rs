use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use super::error::DecodeError;

/// RFC 1123, eg. `Wed, 27 Sep 2017 14:28:34 GMT`
pub const TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A date and time as found in `getlastmodified`
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Time(pub DateTime<Utc>);

impl Time {
    pub fn encode(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }

    /// Parse the exact RFC 1123 format, no other format is tried.
    pub fn decode(txt: &str) -> Result<Self, DecodeError> {
        let naive = NaiveDateTime::parse_from_str(txt, TIME_FORMAT)?;
        let t = Self(Utc.from_utc_datetime(&naive));
        // chrono lets a space in the format match any run of whitespace, or none,
        // and is lenient on case and padding
        if t.encode() != txt {
            return Err(DecodeError::TimeLayout(txt.into()));
        }
        Ok(t)
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(value: Time) -> Self {
        value.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for Time {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_then_encode() {
        for txt in [
            "Wed, 27 Sep 2017 14:28:34 GMT",
            "Mon, 12 Jan 1998 09:25:56 GMT",
            "Thu, 01 Jan 1970 00:00:00 GMT",
            "Sat, 29 Feb 2020 23:59:59 GMT",
        ] {
            assert_eq!(Time::decode(txt).unwrap().encode(), txt);
        }
    }

    #[test]
    fn encode_then_decode() {
        let t = Time(Utc.with_ymd_and_hms(2017, 9, 27, 14, 28, 34).unwrap());
        assert_eq!(t.encode(), "Wed, 27 Sep 2017 14:28:34 GMT");
        assert_eq!(Time::decode(&t.encode()).unwrap(), t);
    }

    #[test]
    fn sub_second_precision_is_not_carried() {
        let exact = Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let t = Time(exact + chrono::Duration::milliseconds(250));
        assert_eq!(Time::decode(&t.encode()).unwrap(), Time(exact));
    }

    #[test]
    fn other_formats_are_rejected() {
        for txt in [
            "",
            "2017-09-27T14:28:34Z",
            "Wednesday, 27-Sep-17 14:28:34 GMT",
            "Wed, 27 Sep 2017 14:28:34 +0000",
            "Wed, 27 Sep 2017 14:28:34 GMT trailing",
            "Wed, 27 Sep 2017 25:28:34 GMT",
        ] {
            assert!(Time::decode(txt).is_err(), "{:?} should not decode", txt);
        }
    }

    #[test]
    fn spacing_case_and_padding_must_be_exact() {
        for txt in [
            "Wed,27 Sep 2017 14:28:34GMT",
            "Wed, 27 Sep 2017   14:28:34 GMT",
            " Wed, 27 Sep 2017 14:28:34 GMT",
            "Wed, 27 Sep 2017 14:28:34 GMT ",
            "wed, 27 sep 2017 14:28:34 GMT",
            "Mon, 2 Oct 2017 14:28:34 GMT",
        ] {
            assert!(Time::decode(txt).is_err(), "{:?} should not decode", txt);
        }
        // chrono alone would accept these
        assert!(matches!(
            Time::decode("Wed,27 Sep 2017 14:28:34GMT"),
            Err(DecodeError::TimeLayout(_))
        ));
        assert!(matches!(
            Time::decode("Wed, 27 Sep 2017   14:28:34 GMT"),
            Err(DecodeError::TimeLayout(_))
        ));
    }

    #[test]
    fn weekday_must_match_date() {
        assert!(matches!(
            Time::decode("Thu, 27 Sep 2017 14:28:34 GMT"),
            Err(DecodeError::Chrono(_))
        ));
    }

    #[test]
    fn display_and_from_str() {
        let t: Time = "Mon, 12 Jan 1998 09:25:56 GMT".parse().unwrap();
        assert_eq!(
            DateTime::<Utc>::from(t),
            Utc.with_ymd_and_hms(1998, 1, 12, 9, 25, 56).unwrap()
        );
        assert_eq!(t.to_string(), "Mon, 12 Jan 1998 09:25:56 GMT");
    }
}
