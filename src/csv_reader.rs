//! CSV sources. Files may arrive in a non-UTF-8 single-byte encoding (the
//! happiness exports are ISO-8859-1), so bytes are decoded per call before
//! the parser sees them.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};
use crate::table::{Table, Value};

/// Read a CSV file into a `Table`. `encoding` is a WHATWG label such as
/// `"iso-8859-1"` or `"windows-1252"`; `None` means UTF-8.
pub fn read_path(path: &Path, encoding: Option<&str>) -> Result<Table> {
    let bytes = std::fs::read(path)?;
    read_bytes(&bytes, encoding)
}

/// Read CSV from any reader (stdin, a network body) into a `Table`.
pub fn read_reader<R: Read>(mut reader: R, encoding: Option<&str>) -> Result<Table> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    read_bytes(&bytes, encoding)
}

pub fn read_bytes(bytes: &[u8], encoding: Option<&str>) -> Result<Table> {
    let text = decode(bytes, encoding)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(Value::infer).collect());
    }

    Table::new(headers, rows)
}

fn decode<'a>(bytes: &'a [u8], encoding: Option<&str>) -> Result<Cow<'a, str>> {
    let encoding = match encoding {
        None => UTF_8,
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?,
    };
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::InvalidData(format!(
            "input is not valid {}",
            encoding.name()
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_utf8() {
        let table = read_bytes(b"year,score\n2010,7.16\n2011,7.12\n", None).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.headers(), &["year".to_string(), "score".to_string()]);
        assert_eq!(table.rows()[0][0], Value::Int(2010));
        assert_eq!(table.rows()[0][1], Value::Float(7.16));
    }

    #[test]
    fn test_read_latin1() {
        // "Türkiye" with a Latin-1 u-umlaut byte, invalid as UTF-8
        let bytes = b"Country name,year\nT\xfcrkiye,2010\n";
        let table = read_bytes(bytes, Some("iso-8859-1")).unwrap();
        assert_eq!(table.rows()[0][0], Value::Str("Türkiye".to_string()));

        assert!(read_bytes(bytes, None).is_err());
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = read_bytes(b"a\n1\n", Some("not-a-charset")).unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(_)));
    }

    #[test]
    fn test_ragged_record_is_an_error() {
        assert!(read_bytes(b"a,b\n1\n", None).is_err());
    }
}
