use crate::engine::assets::radar_sample::RadarSample;
use crate::engine::core::errors::{ProfileError, ProfileResult};
use bevy::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Samples parsed from one table, in file order.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    pub samples: Vec<RadarSample>,
    /// Non-empty lines dropped because they did not parse.
    pub skipped_lines: usize,
}

impl SampleTable {
    /// Parse table rows from `reader`. Malformed rows, including rows that are
    /// not valid UTF-8, are logged and skipped; only a failing reader aborts.
    pub fn parse(mut reader: impl BufRead, source: &Path) -> ProfileResult<Self> {
        let mut table = SampleTable::default();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|err| ProfileError::from_io(source, err))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let parsed = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => RadarSample::parse(line.trim_end_matches(['\r', '\n']), line_number),
                Err(err) => Err(ProfileError::MalformedRecord {
                    line: line_number,
                    reason: format!("not valid UTF-8: {err}"),
                }),
            };

            match parsed {
                Ok(sample) => table.samples.push(sample),
                Err(err) => {
                    warn!("Skipping sample in {}: {err}", source.display());
                    table.skipped_lines += 1;
                }
            }
        }

        Ok(table)
    }

    /// Simulation time of the first sample, the origin of the profile's local time.
    pub fn start_time(&self) -> Option<f64> {
        self.samples.first().map(|s| s.sim_time)
    }
}

pub fn load_sample_table(path: &Path) -> ProfileResult<SampleTable> {
    let file = File::open(path).map_err(|err| ProfileError::from_io(path, err))?;
    SampleTable::parse(BufReader::new(file), path)
}

/// Lenient entry point: an unreadable table yields no samples and a warning.
pub fn read_samples_or_empty(path: &Path) -> Vec<RadarSample> {
    match load_sample_table(path) {
        Ok(table) => table.samples,
        Err(err) => {
            warn!("Failed to load radar samples: {err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const GOOD: &str = "1,2008-11-02T07:15:30.000, 10.0,20.0,-100.0,250000.0, 0,0,0,0";

    #[test]
    fn malformed_row_is_skipped_and_counted() {
        let input = format!("{GOOD}\n2,2008-11-02T07:15:30.500, 10.1\n");
        let table = SampleTable::parse(Cursor::new(input), Path::new("mem.tab")).unwrap();
        assert_eq!(table.samples.len(), 1);
        assert_eq!(table.skipped_lines, 1);
    }

    #[test]
    fn invalid_utf8_row_is_skipped_not_fatal() {
        let mut input = Vec::new();
        input.extend_from_slice(GOOD.as_bytes());
        input.extend_from_slice(b"\n2,2008-11-02T07:15:31.000, 10.1,20.0\xff\n");
        input.extend_from_slice(GOOD.as_bytes());
        input.push(b'\n');

        let table = SampleTable::parse(Cursor::new(input), Path::new("mem.tab")).unwrap();
        assert_eq!(table.samples.len(), 2);
        assert_eq!(table.skipped_lines, 1);
    }

    #[test]
    fn final_row_without_newline_is_read() {
        let table = SampleTable::parse(Cursor::new(GOOD), Path::new("mem.tab")).unwrap();
        assert_eq!(table.samples.len(), 1);
    }

    #[test]
    fn blank_lines_are_not_records() {
        let input = format!("\n{GOOD}\r\n   \n{GOOD}\n");
        let table = SampleTable::parse(Cursor::new(input), Path::new("mem.tab")).unwrap();
        assert_eq!(table.samples.len(), 2);
        assert_eq!(table.skipped_lines, 0);
    }

    #[test]
    fn out_of_order_rows_keep_file_order() {
        let later = GOOD.replace("07:15:30.000", "07:16:00.000");
        let input = format!("{later}\n{GOOD}\n");
        let table = SampleTable::parse(Cursor::new(input), Path::new("mem.tab")).unwrap();
        assert!(table.samples[0].sim_time > table.samples[1].sim_time);
        assert_eq!(table.start_time(), Some(table.samples[0].sim_time));
    }

    #[test]
    fn reads_tables_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s_01_geom.tab");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{GOOD}").unwrap();
        writeln!(file, "{GOOD}").unwrap();

        assert_eq!(load_sample_table(&path).unwrap().samples.len(), 2);
    }

    #[test]
    fn missing_table_is_not_found_and_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent_geom.tab");
        assert!(matches!(
            load_sample_table(&path),
            Err(ProfileError::FileNotFound(_))
        ));
        assert!(read_samples_or_empty(&path).is_empty());
    }
}
