use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use tracing::info;

use crate::error::{OutputError, PinError, Result};

const DELIMITER: u8 = b',';
const QUOTE: u8 = b'|';

/// The first and last rows of a solver result table.
///
/// The first row is normally the column header and the last the final time
/// step. A table with a single row yields that row twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub first: StringRecord,
    pub last: StringRecord,
}

impl ResultSummary {
    /// Reads the table at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Missing`] if the file does not exist,
    /// [`OutputError::Empty`] if it has no rows, and
    /// [`OutputError::Malformed`] if it cannot be parsed.
    pub fn collect(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(OutputError::Missing(path.to_path_buf()).into());
        }
        let malformed = |source| OutputError::Malformed {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(DELIMITER)
            .quote(QUOTE)
            .flexible(true)
            .from_path(path)
            .map_err(malformed)?;

        let mut first = None;
        let mut last = None;
        let mut rows = 0_usize;
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            if first.is_none() {
                first = Some(record.clone());
            }
            last = Some(record);
            rows += 1;
        }

        match (first, last) {
            (Some(first), Some(last)) => {
                info!(path = %path.display(), rows, "collected solver results");
                Ok(Self { first, last })
            }
            _ => Err(OutputError::Empty(path.to_path_buf()).into()),
        }
    }

    /// Writes both rows to `path`, quoting with `|` only where needed.
    ///
    /// # Errors
    ///
    /// Returns [`PinError::Io`] if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        let io = |e: csv::Error| PinError::io(path, e.into());
        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote(QUOTE)
            .quote_style(QuoteStyle::Necessary)
            .flexible(true)
            .from_path(path)
            .map_err(io)?;
        writer.write_record(&self.first).map_err(io)?;
        writer.write_record(&self.last).map_err(io)?;
        writer.flush().map_err(|e| PinError::io(path, e))?;
        info!(path = %path.display(), "wrote result summary");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keeps_header_and_last_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breeder-pin_out.csv");
        fs::write(&path, "time,T_max,p_drop\n0,300,0\n1,410.5,12\n2,415.25,12.5\n").unwrap();

        let s = ResultSummary::collect(&path).unwrap();
        assert_eq!(s.first, StringRecord::from(vec!["time", "T_max", "p_drop"]));
        assert_eq!(s.last, StringRecord::from(vec!["2", "415.25", "12.5"]));

        let out = dir.path().join("summary.csv");
        s.write(&out).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "time,T_max,p_drop\n2,415.25,12.5\n"
        );
    }

    #[test]
    fn single_row_is_repeated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        fs::write(&path, "a,b\n").unwrap();
        let s = ResultSummary::collect(&path).unwrap();
        assert_eq!(s.first, s.last);
    }

    #[test]
    fn pipe_quoting_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        fs::write(&path, "name,value\n|a,b|,1\n").unwrap();
        let s = ResultSummary::collect(&path).unwrap();
        assert_eq!(&s.last[0], "a,b");

        let out = dir.path().join("s.csv");
        s.write(&out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "name,value\n|a,b|,1\n");
    }

    #[test]
    fn missing_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(
            ResultSummary::collect(&path),
            Err(PinError::Output(OutputError::Missing(_)))
        ));

        fs::write(&path, "").unwrap();
        assert!(matches!(
            ResultSummary::collect(&path),
            Err(PinError::Output(OutputError::Empty(_)))
        ));
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.csv");
        fs::write(&path, "a,b,c\n1,2\n").unwrap();
        let s = ResultSummary::collect(&path).unwrap();
        assert_eq!(s.last.len(), 2);
    }
}
