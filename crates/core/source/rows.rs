//! Delimited-text reader for clustered location rows.
//!
//! The first line is a header and is skipped. Fields may be wrapped in
//! double quotes, with `""` standing for a literal quote. Quoted fields
//! cannot span lines.

use crate::error::{Result, TravelRegionsError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use travel_regions_types::row::LocationRow;

/// Iterator over the rows of a delimited text source.
pub struct DelimitedRows<R> {
    reader: R,
    delimiter: char,
    line_number: usize,
    header_skipped: bool,
    buffer: String,
}

impl<R: BufRead> DelimitedRows<R> {
    pub fn new(reader: R) -> Self {
        Self::with_delimiter(reader, ',')
    }

    pub fn with_delimiter(reader: R, delimiter: char) -> Self {
        Self {
            reader,
            delimiter,
            line_number: 0,
            header_skipped: false,
            buffer: String::new(),
        }
    }

    fn next_line(&mut self) -> Option<Result<String>> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.buffer.trim_end_matches(['\r', '\n']);
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(Ok(line.to_string()));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

impl DelimitedRows<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> Iterator for DelimitedRows<R> {
    type Item = Result<LocationRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.header_skipped {
            self.header_skipped = true;
            if let Err(e) = self.next_line()? {
                return Some(Err(e));
            }
        }

        let line = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        let fields = split_fields(&line, self.delimiter);
        Some(LocationRow::from_fields(&fields).map_err(|e| {
            TravelRegionsError::InvalidInput(format!("line {}: {}", self.line_number, e))
        }))
    }
}

/// Read every row of a comma-separated file.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<LocationRow>> {
    DelimitedRows::open(path)?.collect()
}

/// Split one line into fields, honouring double quotes.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
id,l1,l2,country,lat,lng,name
45,1,12,US,40.781459,-73.966551,Central Park
7,1,13,US,40.7128,-74.006,\"New York, NY\"

8,2,14,DE,48.137,11.575,\"Munich \"\"Altstadt\"\"\"
";

    #[test]
    fn test_reads_rows_after_header() {
        let rows: Vec<LocationRow> = DelimitedRows::new(Cursor::new(SAMPLE))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].node_id, "45");
        assert_eq!(rows[0].communities, vec![1, 12]);
        assert_eq!(rows[1].place_name, "New York, NY");
        assert_eq!(rows[2].place_name, "Munich \"Altstadt\"");
        assert_eq!(rows[2].country_code, "DE");
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let input = "id,l1,country,lat,lng,name\n1,x,US,1.0,2.0,A\n";
        let result: Result<Vec<LocationRow>> = DelimitedRows::new(Cursor::new(input)).collect();
        let err = result.unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a,b,,c", ','), vec!["a", "b", "", "c"]);
        assert_eq!(split_fields("\"a,b\",c", ','), vec!["a,b", "c"]);
        assert_eq!(split_fields("a\tb", '\t'), vec!["a", "b"]);
    }

    #[test]
    fn test_read_rows_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(read_rows(dir.path().join("missing.csv")).is_err());
    }
}
