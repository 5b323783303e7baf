//! County Tables
//!
//! A table of county records read from a delimited file. Every table carries
//! a FIPS column and a place-name column; all remaining columns are numeric
//! metrics. Empty or non-numeric metric cells become missing values.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::error::{DataError, DataResult};
use super::fips::Fips;

/// Default name of the FIPS column
pub const DEFAULT_FIPS_COLUMN: &str = "FIPS";

/// Default name of the place-name column
pub const DEFAULT_NAME_COLUMN: &str = "PlaceName";

/// One county row
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRecord {
    pub fips: Fips,
    pub place_name: String,
    /// One entry per metric column of the owning table
    pub values: Vec<Option<f64>>,
}

/// An immutable table of county records with a FIPS index
#[derive(Debug, Clone, Default)]
pub struct CountyTable {
    columns: Vec<String>,
    records: Vec<CountyRecord>,
    index: HashMap<Fips, usize>,
}

/// Which header names identify the key columns
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub fips_column: String,
    pub name_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            fips_column: DEFAULT_FIPS_COLUMN.to_string(),
            name_column: DEFAULT_NAME_COLUMN.to_string(),
        }
    }
}

impl CountyTable {
    /// Build a table from already parsed records.
    ///
    /// Fails on duplicate FIPS codes or records whose value count does not
    /// match the column count.
    pub fn new(
        source_name: &str,
        columns: Vec<String>,
        records: Vec<CountyRecord>,
    ) -> DataResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (row, record) in records.iter().enumerate() {
            if record.values.len() != columns.len() {
                return Err(DataError::Csv {
                    source_name: source_name.to_string(),
                    error: format!(
                        "record {} has {} values, expected {}",
                        record.fips,
                        record.values.len(),
                        columns.len()
                    ),
                });
            }
            if index.insert(record.fips.clone(), row).is_some() {
                return Err(DataError::DuplicateFips {
                    source_name: source_name.to_string(),
                    fips: record.fips.to_string(),
                });
            }
        }

        Ok(Self {
            columns,
            records,
            index,
        })
    }

    /// Read a table from a CSV file
    pub fn from_path(path: &Path, layout: &TableLayout) -> DataResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| DataError::io(path, e))?;
        Self::from_reader(file, &path.display().to_string(), layout)
    }

    /// Read a table from any CSV source (useful for testing)
    pub fn from_reader<R: Read>(
        reader: R,
        source_name: &str,
        layout: &TableLayout,
    ) -> DataResult<Self> {
        let csv_error = |e: csv::Error| DataError::Csv {
            source_name: source_name.to_string(),
            error: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DataError::MissingColumn {
                    source_name: source_name.to_string(),
                    column: column.to_string(),
                })
        };
        let fips_idx = find(&layout.fips_column)?;
        let name_idx = find(&layout.name_column)?;

        // Every other non-empty header is a metric column; pandas-style
        // unnamed index columns are skipped
        let metric_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| {
                *idx != fips_idx
                    && *idx != name_idx
                    && !header.is_empty()
                    && !header.starts_with("Unnamed:")
            })
            .map(|(idx, header)| (idx, header.to_string()))
            .collect();

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result.map_err(csv_error)?;

            let fips = match record.get(fips_idx).and_then(Fips::parse) {
                Some(fips) => fips,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            let place_name = record.get(name_idx).unwrap_or("").trim().to_string();
            let values = metric_columns
                .iter()
                .map(|(idx, _)| {
                    record
                        .get(*idx)
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .and_then(|v| v.parse::<f64>().ok())
                        .filter(|v| !v.is_nan())
                })
                .collect();

            records.push(CountyRecord {
                fips,
                place_name,
                values,
            });
        }

        if skipped > 0 {
            tracing::warn!(source = %source_name, skipped, "Skipped rows without a FIPS code");
        }

        let columns = metric_columns.into_iter().map(|(_, name)| name).collect();
        Self::new(source_name, columns, records)
    }

    /// Metric column names, in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn records(&self) -> &[CountyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by FIPS code
    pub fn get(&self, fips: &Fips) -> Option<&CountyRecord> {
        self.index.get(fips).map(|&row| &self.records[row])
    }

    /// All present values of a column, in record order
    pub fn column_values(&self, column: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(column)?;
        Some(self.records.iter().filter_map(|r| r.values[idx]).collect())
    }

    /// A new table holding only the records that satisfy `keep`
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&CountyRecord) -> bool,
    {
        let records: Vec<CountyRecord> = self.records.iter().filter(|r| keep(r)).cloned().collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(row, r)| (r.fips.clone(), row))
            .collect();
        Self {
            columns: self.columns.clone(),
            records,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPENDING_CSV: &str = "FIPS,PlaceName,Instruction Spending Per Student, 2018
01001,\"Autauga County, Alabama\",5412.5
01003,\"Baldwin County, Alabama\",
1005,\"Barbour County, Alabama\",6123
,Unknown,100
01007,\"Bibb County, Alabama\",n/a";

    fn quoted(csv: &str) -> String {
        // Header cells containing commas need quoting too
        csv.replacen(
            "Instruction Spending Per Student, 2018",
            "\"Instruction Spending Per Student, 2018\"",
            1,
        )
    }

    #[test]
    fn test_from_reader_parses_records() {
        let csv = quoted(SPENDING_CSV);
        let table =
            CountyTable::from_reader(csv.as_bytes(), "spending.csv", &TableLayout::default())
                .unwrap();

        assert_eq!(table.columns(), ["Instruction Spending Per Student, 2018"]);
        assert_eq!(table.len(), 4);

        let autauga = table.get(&Fips::parse("01001").unwrap()).unwrap();
        assert_eq!(autauga.place_name, "Autauga County, Alabama");
        assert_eq!(autauga.values, vec![Some(5412.5)]);
    }

    #[test]
    fn test_missing_and_invalid_values() {
        let csv = quoted(SPENDING_CSV);
        let table =
            CountyTable::from_reader(csv.as_bytes(), "spending.csv", &TableLayout::default())
                .unwrap();

        assert_eq!(table.get(&Fips::parse("01003").unwrap()).unwrap().values, vec![None]);
        assert_eq!(table.get(&Fips::parse("01007").unwrap()).unwrap().values, vec![None]);
        assert_eq!(
            table.column_values("Instruction Spending Per Student, 2018"),
            Some(vec![5412.5, 6123.0])
        );
    }

    #[test]
    fn test_short_fips_is_padded() {
        let csv = quoted(SPENDING_CSV);
        let table =
            CountyTable::from_reader(csv.as_bytes(), "spending.csv", &TableLayout::default())
                .unwrap();
        assert!(table.get(&Fips::parse("01005").unwrap()).is_some());
    }

    #[test]
    fn test_missing_fips_column() {
        let csv = "County,PlaceName,Value\n01001,Autauga,1.0";
        let err = CountyTable::from_reader(csv.as_bytes(), "bad.csv", &TableLayout::default())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column, .. } if column == "FIPS"));
    }

    #[test]
    fn test_duplicate_fips() {
        let csv = "FIPS,PlaceName,Value\n01001,A,1.0\n01001,B,2.0";
        let err = CountyTable::from_reader(csv.as_bytes(), "dup.csv", &TableLayout::default())
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateFips { ref fips, .. } if fips == "01001"));
    }

    #[test]
    fn test_unnamed_index_column_skipped() {
        let csv = ",FIPS,PlaceName,Value\n0,01001,A,1.5";
        let table =
            CountyTable::from_reader(csv.as_bytes(), "indexed.csv", &TableLayout::default())
                .unwrap();
        assert_eq!(table.columns(), ["Value"]);
    }

    #[test]
    fn test_filtered_rebuilds_index() {
        let csv = "FIPS,PlaceName,Value\n01001,A,1.0\n01003,B,20000\n01005,C,3.0";
        let table =
            CountyTable::from_reader(csv.as_bytes(), "t.csv", &TableLayout::default()).unwrap();

        let limited = table.filtered(|r| r.values[0].map_or(false, |v| v < 15000.0));
        assert_eq!(limited.len(), 2);
        assert!(limited.get(&Fips::parse("01003").unwrap()).is_none());
        assert_eq!(
            limited.get(&Fips::parse("01005").unwrap()).unwrap().place_name,
            "C"
        );
    }
}
