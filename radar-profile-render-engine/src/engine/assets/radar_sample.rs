use crate::engine::core::errors::{ProfileError, ProfileResult};
use crate::engine::core::sim_time::utc_to_sim_time;
use radar_constants::time::NANOS_PER_MILLI;
use std::fmt;

/// UTC calendar timestamp as written in sample tables (`YYYY-MM-DDTHH:MM:SS.mmm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcTimestamp {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanos: u32,
}

impl UtcTimestamp {
    /// Parse `YYYY-MM-DDTHH:MM:SS[.fff]`. The fraction is read as a decimal
    /// fraction of a second, truncated to nanoseconds.
    pub fn parse(text: &str) -> ProfileResult<Self> {
        let invalid = || ProfileError::InvalidTimestamp(text.to_string());

        let (date, time) = text.trim().split_once('T').ok_or_else(invalid)?;

        let mut date_parts = date.splitn(3, '-');
        let year = parse_field::<i32>(date_parts.next()).ok_or_else(invalid)?;
        let month = parse_field::<u8>(date_parts.next()).ok_or_else(invalid)?;
        let day = parse_field::<u8>(date_parts.next()).ok_or_else(invalid)?;

        let (clock, fraction) = match time.split_once('.') {
            Some((clock, fraction)) => (clock, fraction),
            None => (time, ""),
        };
        let mut clock_parts = clock.splitn(3, ':');
        let hour = parse_field::<u8>(clock_parts.next()).ok_or_else(invalid)?;
        let minute = parse_field::<u8>(clock_parts.next()).ok_or_else(invalid)?;
        let second = parse_field::<u8>(clock_parts.next()).ok_or_else(invalid)?;
        let nanos = parse_fraction_nanos(fraction).ok_or_else(invalid)?;

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanos,
        })
    }

    pub fn millis(&self) -> u32 {
        self.nanos / NANOS_PER_MILLI
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millis()
        )
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>) -> Option<T> {
    let field = field?;
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn parse_fraction_nanos(fraction: &str) -> Option<u32> {
    if fraction.is_empty() {
        return Some(0);
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = fraction.chars().chain("000000000".chars()).take(9).collect();
    digits.parse().ok()
}

/// One row of a radar sample table.
///
/// `aux` carries the four trailing columns verbatim; rendering does not read them.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarSample {
    pub record_number: i64,
    pub timestamp: UtcTimestamp,
    /// `timestamp` on the simulation clock.
    pub sim_time: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub surface_altitude: f64,
    pub instrument_altitude: f64,
    pub aux: [f64; 4],
}

/// Number of comma separated columns in a sample row.
pub const SAMPLE_FIELD_COUNT: usize = 10;

impl RadarSample {
    /// Parse one table row. `line` is the 1-based line number used in errors.
    ///
    /// Columns past the tenth are ignored.
    pub fn parse(text: &str, line: usize) -> ProfileResult<Self> {
        let malformed = |reason: String| ProfileError::MalformedRecord { line, reason };

        let fields: Vec<&str> = text
            .splitn(SAMPLE_FIELD_COUNT + 1, ',')
            .take(SAMPLE_FIELD_COUNT)
            .map(str::trim)
            .collect();
        if fields.len() < SAMPLE_FIELD_COUNT {
            return Err(malformed(format!(
                "expected {SAMPLE_FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }

        let record_number = fields[0]
            .parse::<i64>()
            .map_err(|_| malformed(format!("bad record number {:?}", fields[0])))?;

        let timestamp = UtcTimestamp::parse(fields[1]).map_err(|err| malformed(err.to_string()))?;
        let sim_time = utc_to_sim_time(&timestamp).map_err(|err| malformed(err.to_string()))?;

        let mut values = [0.0f64; 8];
        for (value, field) in values.iter_mut().zip(&fields[2..]) {
            *value = field
                .parse::<f64>()
                .map_err(|_| malformed(format!("bad number {field:?}")))?;
        }

        Ok(Self {
            record_number,
            timestamp,
            sim_time,
            latitude_deg: values[0],
            longitude_deg: values[1],
            surface_altitude: values[2],
            instrument_altitude: values[3],
            aux: [values[4], values[5], values[6], values[7]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROW: &str = "1042,2008-11-02T07:15:30.125, -12.5,137.25,-2150.5,265000.0, 0.5,1.5,-2.25,1e3";

    #[test]
    fn parses_every_column() {
        let sample = RadarSample::parse(ROW, 1).unwrap();
        assert_eq!(sample.record_number, 1042);
        assert_eq!(
            sample.timestamp,
            UtcTimestamp {
                year: 2008,
                month: 11,
                day: 2,
                hour: 7,
                minute: 15,
                second: 30,
                nanos: 125_000_000,
            }
        );
        assert_eq!(sample.latitude_deg, -12.5);
        assert_eq!(sample.longitude_deg, 137.25);
        assert_eq!(sample.surface_altitude, -2150.5);
        assert_eq!(sample.instrument_altitude, 265000.0);
        assert_eq!(sample.aux, [0.5, 1.5, -2.25, 1000.0]);
    }

    #[test]
    fn timestamp_fraction_is_decimal() {
        assert_eq!(UtcTimestamp::parse("2008-01-01T00:00:00.5").unwrap().nanos, 500_000_000);
        assert_eq!(UtcTimestamp::parse("2008-01-01T00:00:00").unwrap().nanos, 0);
        assert_eq!(
            UtcTimestamp::parse("2008-01-01T00:00:00.007").unwrap().to_string(),
            "2008-01-01T00:00:00.007"
        );
    }

    #[test]
    fn short_rows_are_malformed() {
        let err = RadarSample::parse("1,2008-01-01T00:00:00.000, 1,2,3", 7).unwrap_err();
        match err {
            ProfileError::MalformedRecord { line, .. } => assert_eq!(line, 7),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn bad_numbers_and_dates_are_malformed() {
        let bad_float = ROW.replace("137.25", "east");
        assert!(RadarSample::parse(&bad_float, 1).is_err());

        let bad_date = ROW.replace("2008-11-02", "2008-13-02");
        assert!(RadarSample::parse(&bad_date, 1).is_err());

        let bad_record = ROW.replace("1042", "x");
        assert!(RadarSample::parse(&bad_record, 1).is_err());
    }

    #[test]
    fn trailing_columns_are_ignored() {
        let extended = format!("{ROW},99,100");
        assert_eq!(
            RadarSample::parse(&extended, 1).unwrap(),
            RadarSample::parse(ROW, 1).unwrap()
        );
    }
}
