//! Delimited text reading.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const QUOTE: u8 = b'"';

fn read_options(config: &AnalysisConfig) -> CsvReadOptions {
    let null_values = if config.null_values.is_empty() {
        None
    } else {
        Some(NullValues::AllColumns(
            config
                .null_values
                .iter()
                .map(|v| PlSmallStr::from(v.as_str()))
                .collect(),
        ))
    };

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(config.infer_schema_rows)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(config.delimiter)
                .with_quote_char(Some(QUOTE))
                .with_null_values(null_values),
        )
}

/// Read a delimited file with a header row.
pub(crate) fn read_path(path: &Path, config: &AnalysisConfig) -> Result<DataFrame> {
    let source = path.display().to_string();
    if !path.is_file() {
        return Err(AnalysisError::load_failed(source, "file not found"));
    }

    let bytes = fs::read(path).map_err(|e| AnalysisError::load_failed(&source, e))?;
    read_bytes(&bytes, &source, config)
}

/// Read delimited text from an in-memory buffer (e.g. an uploaded file).
///
/// Quoted fields may span lines; a quote left open at end of input is a load
/// error rather than a field that swallows the rest of the file.
pub(crate) fn read_bytes(bytes: &[u8], source: &str, config: &AnalysisConfig) -> Result<DataFrame> {
    if std::str::from_utf8(bytes).is_err() {
        return Err(AnalysisError::load_failed(source, "input is not valid UTF-8"));
    }

    if has_unterminated_quote(bytes, config.delimiter) {
        return Err(AnalysisError::load_failed(
            source,
            "unterminated quoted field at end of input",
        ));
    }

    read_options(config)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| {
            debug!("CSV parse of {} failed: {}", source, e);
            AnalysisError::load_failed(source, e)
        })
}

/// True when a field opened with a quote is still open at end of input.
///
/// A quote only opens a field at the start of that field; inside a quoted
/// field a doubled quote is an escaped literal.
pub(crate) fn has_unterminated_quote(bytes: &[u8], delimiter: u8) -> bool {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            if b == QUOTE {
                if bytes.get(i + 1) == Some(&QUOTE) {
                    i += 1;
                } else {
                    in_quotes = false;
                }
            }
            field_start = false;
        } else if b == QUOTE && field_start {
            in_quotes = true;
            field_start = false;
        } else {
            field_start = b == delimiter || b == b'\n' || b == b'\r';
        }
        i += 1;
    }

    in_quotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bytes_with_header() {
        let config = AnalysisConfig::default();
        let df = read_bytes(b"a,b\n1,x\n2,y\n", "mem.csv", &config).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("b").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_read_bytes_custom_delimiter() {
        let config = AnalysisConfig::builder().delimiter(b';').build().unwrap();
        let df = read_bytes(b"a;b\n1.5;x\n2.5;y\n", "mem.csv", &config).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_null_tokens_keep_numeric_dtype() {
        let config = AnalysisConfig::default();
        let df = read_bytes(
            b"price,qty,city\n1.5,3,A\nNA,4,B\n2.5,null,A\n3.5,7,N/A\n",
            "mem.csv",
            &config,
        )
        .unwrap();

        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("qty").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().null_count(), 1);
        assert_eq!(df.column("qty").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_null_token_list_reads_tokens_as_text() {
        let config = AnalysisConfig::builder()
            .null_values(Vec::<String>::new())
            .build()
            .unwrap();
        let df = read_bytes(b"a\n1\nNA\n", "mem.csv", &config).unwrap();
        assert_eq!(df.column("a").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("a").unwrap().null_count(), 0);
    }

    #[test]
    fn test_unterminated_quote_is_load_failure() {
        let config = AnalysisConfig::default();
        let err = read_bytes(b"a,b\n1,\"x\n2,y\n", "mem.csv", &config).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_quoted_field_with_delimiter_and_newline() {
        let config = AnalysisConfig::default();
        let df = read_bytes(
            b"name,note\n\"Smith, J\",\"two\nlines\"\nLee,\"say \"\"hi\"\"\"\n",
            "mem.csv",
            &config,
        )
        .unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_unterminated_quote_scanner() {
        assert!(has_unterminated_quote(b"a,b\n1,\"x\n2,y\n", b','));
        assert!(has_unterminated_quote(b"a\n\"open \"\" still\n", b','));
        assert!(!has_unterminated_quote(b"a,b\n\"x, y\",2\n", b','));
        assert!(!has_unterminated_quote(b"a\n\"say \"\"hi\"\"\"\n", b','));
        // a quote in the middle of an unquoted field is literal
        assert!(!has_unterminated_quote(b"size\n15\" screen\n", b','));
        assert!(!has_unterminated_quote(b"a;b\n1;\"x\"\n", b';'));
    }

    #[test]
    fn test_read_bytes_rejects_invalid_utf8() {
        let config = AnalysisConfig::default();
        let err = read_bytes(&[b'a', b'\n', 0xff, 0xfe, b'\n'], "bad.csv", &config).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_read_path_missing_file() {
        let config = AnalysisConfig::default();
        let err = read_path(Path::new("does/not/exist.csv"), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::LoadFailed { .. }));
    }
}
