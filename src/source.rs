//! CSV source reading.
//!
//! The whole file is read into memory as a [`Table`]. The header row names the
//! properties. Each column gets a single inferred type (integer, float, boolean
//! or string), and cells from the NA set become `null`.

use crate::error::{LoaderError, Result};
use csv::{ReaderBuilder, StringRecord};
use log::info;
use serde_json::{Number, Value};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One CSV row: column name to scalar value, in header order.
pub type Record = serde_json::Map<String, Value>;

/// Cell spellings read as missing values.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    String,
}

/// An in-memory CSV file with typed rows.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    column_types: Vec<ColumnType>,
    rows: Vec<Record>,
}

impl Table {
    /// Read the CSV file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoaderError::SourceNotFound(path.to_path_buf()),
            _ => LoaderError::Io(e),
        })?;
        let table = Self::from_reader(file, path)?;
        info!("  Read {} rows from {:?}", table.len(), path);
        Ok(table)
    }

    /// Parse CSV from any reader. `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let format_error = |message: String| LoaderError::SourceFormat {
            path: PathBuf::from(origin),
            message,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let raw_headers = rdr.headers().map_err(|e| format_error(e.to_string()))?.clone();
        if raw_headers.is_empty() {
            return Err(format_error("no columns to parse from file".to_string()));
        }
        let columns = normalize_headers(&raw_headers);

        let mut raw_rows: Vec<StringRecord> = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| format_error(e.to_string()))?;
            // Short rows are padded with nulls below; long ones cannot be mapped.
            if record.len() > columns.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(format_error(format!(
                    "line {}: expected {} fields, saw {}",
                    line,
                    columns.len(),
                    record.len()
                )));
            }
            raw_rows.push(record);
        }

        let column_types: Vec<ColumnType> = (0..columns.len())
            .map(|idx| infer_column_type(raw_rows.iter().map(|row| row.get(idx).unwrap_or(""))))
            .collect();

        let rows = raw_rows
            .iter()
            .map(|raw| {
                columns
                    .iter()
                    .zip(&column_types)
                    .enumerate()
                    .map(|(idx, (name, ty))| {
                        (name.clone(), convert_cell(raw.get(idx).unwrap_or(""), *ty))
                    })
                    .collect::<Record>()
            })
            .collect();

        Ok(Self {
            columns,
            column_types,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Rows in `range`, clamped to the table length.
    pub fn slice(&self, range: Range<usize>) -> &[Record] {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        &self.rows[start..end]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Blank headers become `Unnamed: <idx>`; repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(raw: &StringRecord) -> Vec<String> {
    let mut used = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    raw.iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name.to_string()
            };
            let mut candidate = base.clone();
            while used.contains(&candidate) {
                let n = suffixes.entry(base.clone()).or_insert(0);
                *n += 1;
                candidate = format!("{}.{}", base, n);
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

fn parse_finite_f64(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Narrowest type that fits every non-missing cell of a column.
fn infer_column_type<'a, I: Iterator<Item = &'a str>>(cells: I) -> ColumnType {
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in cells.filter(|c| !is_na(c)) {
        seen = true;
        all_int &= cell.trim().parse::<i64>().is_ok();
        all_float &= parse_finite_f64(cell).is_some();
        all_bool &= parse_bool(cell).is_some();
        if !(all_int || all_float || all_bool) {
            break;
        }
    }

    match (seen, all_int, all_float, all_bool) {
        (false, ..) => ColumnType::String,
        (true, true, _, _) => ColumnType::Integer,
        (true, false, true, _) => ColumnType::Float,
        (true, false, false, true) => ColumnType::Boolean,
        _ => ColumnType::String,
    }
}

fn convert_cell(cell: &str, ty: ColumnType) -> Value {
    if is_na(cell) {
        return Value::Null;
    }
    let string = || Value::String(cell.to_string());
    match ty {
        ColumnType::Integer => cell.trim().parse::<i64>().map(Value::from).unwrap_or_else(|_| string()),
        ColumnType::Float => parse_finite_f64(cell)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(string),
        ColumnType::Boolean => parse_bool(cell).map(Value::Bool).unwrap_or_else(string),
        ColumnType::String => string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(text: &str) -> Result<Table> {
        Table::from_reader(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_rows_keep_header_order() {
        let table = parse("name,id,city\na,1,x\nb,2,y\n").unwrap();
        assert_eq!(table.columns(), &["name", "id", "city"]);
        let keys: Vec<&String> = table.rows()[0].keys().collect();
        assert_eq!(keys, vec!["name", "id", "city"]);
    }

    #[test]
    fn test_column_type_inference() {
        let table = parse(
            "id,score,active,name,mixed\n\
             1,1.5,true,Alice,10\n\
             2,2,False,Bob,ten\n\
             3,,TRUE,,\n",
        )
        .unwrap();
        assert_eq!(
            table.column_types(),
            &[
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::Boolean,
                ColumnType::String,
                ColumnType::String,
            ]
        );

        let rows = table.rows();
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["score"], json!(2.0));
        assert_eq!(rows[1]["active"], json!(false));
        assert_eq!(rows[0]["mixed"], json!("10"));
        assert_eq!(rows[2]["score"], Value::Null);
        assert_eq!(rows[2]["name"], Value::Null);
    }

    #[test]
    fn test_na_spellings_are_null() {
        let table = parse("id,note\n1,NA\n2,null\n3,N/A\n4,keep\n").unwrap();
        assert_eq!(table.rows()[0]["note"], Value::Null);
        assert_eq!(table.rows()[1]["note"], Value::Null);
        assert_eq!(table.rows()[2]["note"], Value::Null);
        assert_eq!(table.rows()[3]["note"], json!("keep"));
    }

    #[test]
    fn test_non_finite_floats_stay_strings() {
        let table = parse("x\n1.5\ninf\n").unwrap();
        assert_eq!(table.column_types(), &[ColumnType::String]);
        assert_eq!(table.rows()[1]["x"], json!("inf"));
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = parse("a,a,,a\n1,2,3,4\n").unwrap();
        assert_eq!(table.columns(), &["a", "a.1", "Unnamed: 2", "a.2"]);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse("id,name\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_empty_file_is_format_error() {
        assert!(matches!(parse(""), Err(LoaderError::SourceFormat { .. })));
    }

    #[test]
    fn test_short_row_padded_with_nulls() {
        let table = parse("id,name\n1,a\n2\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(Value::Object(table.rows()[1].clone()), json!({"id": 2, "name": null}));
    }

    #[test]
    fn test_long_row_is_format_error() {
        let err = parse("id,name\n1,a\n2,b,extra\n").unwrap_err();
        match err {
            LoaderError::SourceFormat { path, message } => {
                assert_eq!(path, PathBuf::from("inline.csv"));
                assert!(message.contains("line 3"), "{}", message);
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_padded_na_spelling_stays_string() {
        let table = parse("id,note\n1, NA\n2,NA\n").unwrap();
        assert_eq!(table.rows()[0]["note"], json!(" NA"));
        assert_eq!(table.rows()[1]["note"], Value::Null);
    }

    #[test]
    fn test_slice_clamps() {
        let table = parse("id\n1\n2\n3\n").unwrap();
        assert_eq!(table.slice(2..10).len(), 1);
        assert!(table.slice(5..10).is_empty());
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.csv");
        match Table::from_path(&missing) {
            Err(LoaderError::SourceNotFound(p)) => assert_eq!(p, missing),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_from_path_quoted_fields() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("quoted.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "id,comment").unwrap();
        writeln!(file, "1,\"hello, world\"").unwrap();
        writeln!(file, "2,\"it's \"\"quoted\"\"\"").unwrap();

        let table = Table::from_path(&file_path).unwrap();
        assert_eq!(table.rows()[0]["comment"], json!("hello, world"));
        assert_eq!(table.rows()[1]["comment"], json!("it's \"quoted\""));
    }
}
