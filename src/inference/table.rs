//! Tabular feature loading for the inference pipeline
//!
//! Segment and sleeper datasets arrive as plain CSV exports. Cells are kept
//! as raw strings so identifier columns survive the round trip to the API;
//! the pipeline parses the model's feature columns to f64 on demand.

use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
/// Returns owned strings because quoted fields need unquoting.
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// An in-memory CSV table: header row + raw string cells.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FeatureTable {
    /// Load a CSV file into memory.
    ///
    /// Blank lines are skipped; ragged rows are rejected with their line
    /// number so a bad export fails loudly instead of shifting columns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or_else(|| anyhow!("empty file: {}", path.display()))?
            .with_context(|| format!("failed to read header of {}", path.display()))?;
        let headers = csv_split(&header_line);

        let mut rows = Vec::new();
        let mut line_num = 1usize;
        for line_result in lines {
            line_num += 1;
            let line = line_result
                .with_context(|| format!("failed to read line {line_num} of {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv_split(&line);
            if fields.len() != headers.len() {
                return Err(anyhow!(
                    "line {line_num} of {}: expected {} fields, got {}",
                    path.display(),
                    headers.len(),
                    fields.len()
                ));
            }
            rows.push(fields);
        }

        Ok(Self { headers, rows })
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("missing column '{name}'"))
    }

    /// Extract the named columns as numeric feature rows, in the given order.
    ///
    /// Categorical columns are expected to arrive already numerically encoded
    /// by the export step that produced the CSV.
    pub fn numeric_features(&self, names: &[String]) -> Result<Vec<Vec<f64>>> {
        let indices: Vec<usize> = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<_>>()?;

        let mut feature_rows = Vec::with_capacity(self.rows.len());
        for (row_num, row) in self.rows.iter().enumerate() {
            let mut values = Vec::with_capacity(indices.len());
            for (&idx, name) in indices.iter().zip(names.iter()) {
                let value: f64 = row[idx].trim().parse().with_context(|| {
                    format!("row {}: column '{name}' is not numeric", row_num + 2)
                })?;
                values.push(value);
            }
            feature_rows.push(values);
        }
        Ok(feature_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_select_features() {
        let file = write_csv("segment_id,avg_beta,max_geom_dev\nS-001,0.4,1.2\nS-002,0.6,0.8\n");
        let table = FeatureTable::load(file.path()).unwrap();
        assert_eq!(table.rows.len(), 2);

        let features = table
            .numeric_features(&["avg_beta".to_string(), "max_geom_dev".to_string()])
            .unwrap();
        assert_eq!(features, vec![vec![0.4, 1.2], vec![0.6, 0.8]]);
    }

    #[test]
    fn test_quoted_fields_survive() {
        let file = write_csv("name,value\n\"a, quoted\",1.5\n");
        let table = FeatureTable::load(file.path()).unwrap();
        assert_eq!(table.rows[0][0], "a, quoted");
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let file = write_csv("a,b\n1.0\n");
        assert!(FeatureTable::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv("a,b\n1.0,2.0\n");
        let table = FeatureTable::load(file.path()).unwrap();
        let err = table.numeric_features(&["c".to_string()]).unwrap_err();
        assert!(err.to_string().contains("missing column 'c'"));
    }
}
