use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::error::LoadError;
use super::model::{Column, ColumnData, Dataset};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Layout of the experiment files written by the acquisition system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Metadata lines preceding the column header row.
    pub header_lines: usize,
    /// Field separator. Must be a single-byte (Latin-1) character.
    pub delimiter: char,
    /// Decimal separator used by numeric fields.
    pub decimal: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            header_lines: 23,
            delimiter: '\t',
            decimal: ',',
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse an experiment file from disk.
pub fn load_file(path: &Path, options: &LoaderOptions) -> Result<Dataset> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let dataset =
        parse_bytes(&bytes, options).with_context(|| format!("parsing {}", path.display()))?;
    Ok(dataset)
}

/// Parse the raw bytes of an upload into a [`Dataset`].
///
/// The bytes are decoded as Latin-1, the metadata block is skipped, and the
/// remaining text is read as delimited records with a header row. Column
/// types are inferred per column: a column is numeric when every field
/// parses as a finite number once the decimal separator is normalised, and
/// textual when none do. Anything in between is a load failure, as are
/// ragged rows and an empty table.
pub fn parse_bytes(bytes: &[u8], options: &LoaderOptions) -> Result<Dataset, LoadError> {
    let delimiter =
        u8::try_from(options.delimiter).map_err(|_| LoadError::InvalidDelimiter(options.delimiter))?;

    // Latin-1 maps every byte to the code point of the same value.
    let text: String = bytes.iter().map(|&b| b as char).collect();
    let body = skip_lines(&text, options.header_lines)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let header = reader.headers()?.clone();
    if header.is_empty() || header.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::MissingHeader);
    }
    let names = column_names(&header);
    let width = names.len();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); width];
    let mut lines: Vec<usize> = Vec::new();
    let mut newlines = NewlineCounter::new(body.as_bytes());

    for result in reader.records() {
        let record = result?;
        // 1-based file line: metadata, then the header row, then newlines
        // seen in the body before this record.
        let byte = record.position().map_or(0, |p| p.byte() as usize);
        let line = options.header_lines + 1 + newlines.before(byte);
        if record.len() != width {
            return Err(LoadError::RowWidth {
                line,
                expected: width,
                found: record.len(),
            });
        }
        for (col, field) in raw.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
        lines.push(line);
    }

    if lines.is_empty() {
        return Err(LoadError::NoRows);
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, values)| -> Result<Column, LoadError> {
            let data = infer_column(&name, values, options.decimal, &lines)?;
            Ok(Column { name, data })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Widths and names were checked above.
    Dataset::from_columns(columns).ok_or(LoadError::NoRows)
}

/// Parse a number written with `decimal` as the decimal separator.
/// Non-finite values are rejected.
pub fn parse_number(field: &str, decimal: char) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalised = if decimal == '.' {
        trimmed.to_string()
    } else {
        trimmed.replace(decimal, ".")
    };
    normalised.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn skip_lines(text: &str, n: usize) -> Result<&str, LoadError> {
    let mut offset = 0;
    for skipped in 0..n {
        match text[offset..].find('\n') {
            Some(pos) => offset += pos + 1,
            None => {
                let partial = usize::from(!text[offset..].is_empty());
                return Err(LoadError::TruncatedHeader {
                    expected: n,
                    found: skipped + partial,
                });
            }
        }
    }
    Ok(&text[offset..])
}

/// Counts `\n` bytes up to increasing offsets without rescanning.
/// Line numbers come from byte offsets because the reader's own line count
/// does not treat CRLF and LF alike.
struct NewlineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    count: usize,
}

impl<'a> NewlineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        NewlineCounter {
            bytes,
            offset: 0,
            count: 0,
        }
    }

    fn before(&mut self, offset: usize) -> usize {
        let end = offset.min(self.bytes.len());
        if end > self.offset {
            self.count += self.bytes[self.offset..end]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = end;
        }
        self.count
    }
}

/// Header names with blanks replaced by `Unnamed: <i>` and repeats suffixed
/// with `.1`, `.2`, ... so that every column is addressable.
fn column_names(header: &csv::StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.to_string()
            };
            let mut name = base.clone();
            let mut k = 1;
            while seen.contains(&name) {
                name = format!("{base}.{k}");
                k += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn infer_column(
    name: &str,
    values: Vec<String>,
    decimal: char,
    lines: &[usize],
) -> Result<ColumnData, LoadError> {
    let parsed: Vec<Option<f64>> = values.iter().map(|v| parse_number(v, decimal)).collect();

    if parsed.iter().all(Option::is_none) {
        return Ok(ColumnData::Text(values));
    }

    let mut numbers = Vec::with_capacity(values.len());
    for ((raw, num), &line) in values.iter().zip(&parsed).zip(lines) {
        match num {
            Some(v) => numbers.push(*v),
            None if raw.trim().is_empty() => {
                return Err(LoadError::MissingValue {
                    line,
                    column: name.to_string(),
                })
            }
            None => {
                return Err(LoadError::UnparsableNumber {
                    line,
                    column: name.to_string(),
                    value: raw.clone(),
                })
            }
        }
    }
    Ok(ColumnData::Numeric(numbers))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::data::model::CellValue;

    /// Build an upload: 23 metadata lines, then `header`, then `rows`.
    pub(crate) fn upload(header: &str, rows: &[&str]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        for i in 0..23 {
            out.extend_from_slice(format!("LabVIEW Measurement\tline {i}\r\n").as_bytes());
        }
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(b"\r\n");
        for row in rows {
            out.extend_from_slice(row.as_bytes());
            out.extend_from_slice(b"\r\n");
        }
        out
    }

    #[test]
    fn parses_comma_decimals_and_text_columns() {
        let bytes = upload(
            "X_Value\tJ_SF6\tComment",
            &["0,0\t1,5\tstart", "0,1\t2,5\t", "0,2\t3,5\tend"],
        );
        let ds = parse_bytes(&bytes, &LoaderOptions::default()).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            ["X_Value", "J_SF6", "Comment"]
        );
        let jg = ds.numeric("J_SF6").unwrap();
        assert_abs_diff_eq!(jg[0], 1.5);
        assert_abs_diff_eq!(jg[2], 3.5);
        assert_eq!(ds.row_value("Comment", 0), Some(CellValue::Text("start")));
        assert_eq!(ds.row_value("Comment", 1), Some(CellValue::Text("")));
    }

    #[test]
    fn columns_are_rectangular() {
        let bytes = upload("X_Value\ta\tb", &["1\t2\t3", "4\t5\t6"]);
        let ds = parse_bytes(&bytes, &LoaderOptions::default()).unwrap();
        for col in ds.columns() {
            assert_eq!(col.data.len(), ds.len());
        }
    }

    #[test]
    fn decodes_latin1_column_names() {
        let mut bytes = upload("X_Value\tT", &["1\t2"]);
        // Rename "T" to "T(°C)" using the single Latin-1 byte for the degree sign.
        let pos = bytes.len() - b"T\r\n1\t2\r\n".len();
        bytes.splice(pos..pos + 1, b"T(\xB0C)".iter().copied());
        let ds = parse_bytes(&bytes, &LoaderOptions::default()).unwrap();
        assert!(ds.has_column("T(\u{b0}C)"));
    }

    #[test]
    fn blank_and_repeated_names_are_made_unique() {
        let bytes = upload("X_Value\tP\tP\t", &["1\t2\t3\t"]);
        let ds = parse_bytes(&bytes, &LoaderOptions::default()).unwrap();
        assert_eq!(
            ds.column_names().collect::<Vec<_>>(),
            ["X_Value", "P", "P.1", "Unnamed: 3"]
        );
    }

    #[test]
    fn ragged_row_is_a_load_error() {
        let crlf = upload("X_Value\ta", &["1\t2", "3"]);
        let lf: Vec<u8> = crlf.iter().copied().filter(|&b| b != b'\r').collect();
        for bytes in [crlf, lf] {
            match parse_bytes(&bytes, &LoaderOptions::default()) {
                Err(LoadError::RowWidth {
                    line,
                    expected,
                    found,
                }) => {
                    assert_eq!(line, 26);
                    assert_eq!(expected, 2);
                    assert_eq!(found, 1);
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn bad_cell_reports_its_file_line() {
        let bytes = upload("X_Value\ta", &["1\t2", "2\t3", "3\tabc"]);
        match parse_bytes(&bytes, &LoaderOptions::default()) {
            Err(LoadError::UnparsableNumber { line, column, value }) => {
                assert_eq!(line, 27);
                assert_eq!(column, "a");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn mixed_column_is_a_load_error() {
        let bytes = upload("X_Value\ta", &["1\t2", "2\tabc"]);
        assert!(matches!(
            parse_bytes(&bytes, &LoaderOptions::default()),
            Err(LoadError::UnparsableNumber { ref column, .. }) if column == "a"
        ));
    }

    #[test]
    fn hole_in_numeric_column_is_a_load_error() {
        let bytes = upload("X_Value\ta", &["1\t2", "2\t"]);
        assert!(matches!(
            parse_bytes(&bytes, &LoaderOptions::default()),
            Err(LoadError::MissingValue { .. })
        ));
    }

    #[test]
    fn empty_results_are_load_errors() {
        let opts = LoaderOptions::default();
        assert!(matches!(
            parse_bytes(b"only\nthree\nlines\n", &opts),
            Err(LoadError::TruncatedHeader {
                expected: 23,
                found: 3
            })
        ));
        assert!(matches!(
            parse_bytes(&upload("X_Value\ta", &[]), &opts),
            Err(LoadError::NoRows)
        ));
    }

    #[test]
    fn rejects_multibyte_delimiter() {
        let opts = LoaderOptions {
            delimiter: '\u{2192}',
            ..LoaderOptions::default()
        };
        assert!(matches!(
            parse_bytes(&upload("a", &["1"]), &opts),
            Err(LoadError::InvalidDelimiter(_))
        ));
    }

    #[test]
    fn number_parsing() {
        assert_eq!(parse_number(" 1,25 ", ','), Some(1.25));
        assert_eq!(parse_number("-3", ','), Some(-3.0));
        assert_eq!(parse_number("1.5", '.'), Some(1.5));
        assert_eq!(parse_number("", ','), None);
        assert_eq!(parse_number("NaN", ','), None);
        assert_eq!(parse_number("abc", ','), None);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&upload("X_Value\ta", &["0\t1,0", "1\t2,0"]))
            .unwrap();
        let ds = load_file(file.path(), &LoaderOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);

        let missing = file.path().with_extension("missing");
        assert!(load_file(&missing, &LoaderOptions::default()).is_err());
    }
}
