use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::{
    collections::{hash_map::Entry, HashMap},
    fs::File,
    io,
    path::Path,
};

use crate::error::{BayesError, Result};
use crate::summary::Label;

/// Maps label text to integer codes in the order the labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    names: Vec<String>,
    codes: HashMap<String, Label>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code of `name`, assigning the next free code if it is new.
    pub fn code_or_insert(&mut self, name: &str) -> Label {
        match self.codes.entry(name.to_string()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.names.push(name.to_string());
                *entry.insert(self.names.len() - 1)
            }
        }
    }

    pub fn code(&self, name: &str) -> Option<Label> {
        self.codes.get(name).copied()
    }

    pub fn name(&self, code: Label) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    /// Label texts ordered by code.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A feature matrix with its parallel label vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<Label>,
    pub index: LabelIndex,
}

impl Dataset {
    /// Reads a comma separated file whose first line is a header and whose
    /// other lines hold the feature values followed by the label.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with_labels(path, LabelIndex::new())
    }

    /// Like [`from_path`](Dataset::from_path), but continues numbering from an
    /// existing index so that codes agree with a previously loaded file.
    pub fn from_path_with_labels<P: AsRef<Path>>(path: P, index: LabelIndex) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = Self::read(Self::builder().from_reader(file), index)?;

        info!(
            "loaded {} rows with {} classes from {}",
            dataset.len(),
            dataset.index.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: io::Read>(rdr: R, index: LabelIndex) -> Result<Self> {
        Self::read(Self::builder().from_reader(rdr), index)
    }

    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(true).flexible(true).trim(Trim::All);
        builder
    }

    fn read<R: io::Read>(mut reader: csv::Reader<R>, mut index: LabelIndex) -> Result<Self> {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        let width = reader.headers()?.len();

        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                let line = record.position().map_or(0, |p| p.line());
                warn!("line {}: skipping row with only empty fields", line);
                continue;
            }

            if record.len() < 2 || record.len() != width {
                return Err(BayesError::DimensionMismatch {
                    what: "fields per row",
                    expected: width.max(2),
                    got: record.len(),
                });
            }

            let (row, label) = Self::parse_record(&record);
            features.push(row);
            labels.push(index.code_or_insert(label));
        }

        Ok(Dataset {
            features,
            labels,
            index,
        })
    }

    /// Splits a record into its feature values and its trailing label.
    ///
    /// Fields that are not numbers become `NaN`.
    fn parse_record(record: &StringRecord) -> (Vec<f64>, &str) {
        let n_features = record.len() - 1;
        let row = record
            .iter()
            .take(n_features)
            .map(|field| {
                field.parse::<f64>().unwrap_or_else(|_| {
                    let line = record.position().map_or(0, |p| p.line());
                    warn!("line {}: non-numeric field {:?} read as NaN", line, field);
                    f64::NAN
                })
            })
            .collect();

        (row, &record[n_features])
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of features per row, `0` for an empty dataset.
    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FLOWERS: &str = "\
sepal_length,sepal_width,species
5.1,3.5,setosa
7.0,3.2,versicolor
5.0,3.4, setosa
6.3,3.3,virginica
6.4,3.1,versicolor

";

    #[test]
    fn label_index_assigns_first_seen_codes() {
        let mut index = LabelIndex::new();
        assert_eq!(index.code_or_insert("b"), 0);
        assert_eq!(index.code_or_insert("a"), 1);
        assert_eq!(index.code_or_insert("b"), 0);
        assert_eq!(index.code("a"), Some(1));
        assert_eq!(index.name(0), Some("b"));
        assert_eq!(index.name(5), None);
        assert_eq!(index.names(), &["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn reads_features_and_indexed_labels() {
        let dataset = Dataset::from_reader(FLOWERS.as_bytes(), LabelIndex::new()).unwrap();

        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.features[0], vec![5.1, 3.5]);
        assert_eq!(dataset.labels, vec![0, 1, 0, 2, 1]);
        assert_eq!(dataset.index.names(), &["setosa", "versicolor", "virginica"]);
    }

    #[test]
    fn malformed_numbers_become_nan() {
        let data = "a,b,label\n1.0,oops,x\n2.0,3.0,y\n";
        let dataset = Dataset::from_reader(data.as_bytes(), LabelIndex::new()).unwrap();
        assert_eq!(dataset.features[0][0], 1.0);
        assert!(dataset.features[0][1].is_nan());
        assert_eq!(dataset.features[1], vec![2.0, 3.0]);
    }

    #[test]
    fn rejects_ragged_rows() {
        let data = "a,b,label\n1.0,2.0,x\n2.0,y\n";
        let err = Dataset::from_reader(data.as_bytes(), LabelIndex::new()).unwrap_err();
        assert!(matches!(
            err,
            BayesError::DimensionMismatch {
                expected: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_rows_wider_than_the_header() {
        let data = "a,b,label\n1.0,2.0,3.0,x\n4.0,5.0,6.0,y\n";
        let err = Dataset::from_reader(data.as_bytes(), LabelIndex::new()).unwrap_err();
        assert!(matches!(
            err,
            BayesError::DimensionMismatch {
                expected: 3,
                got: 4,
                ..
            }
        ));
    }

    #[test]
    fn skips_rows_of_empty_fields() {
        let data = "a,b,label\n1.0,2.0,x\n,,\n3.0,4.0,y\n";
        let dataset = Dataset::from_reader(data.as_bytes(), LabelIndex::new()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels, vec![0, 1]);
    }

    #[test]
    fn rejects_rows_without_features() {
        let data = "label\nx\n";
        let err = Dataset::from_reader(data.as_bytes(), LabelIndex::new()).unwrap_err();
        assert!(matches!(err, BayesError::DimensionMismatch { got: 1, .. }));
    }

    #[test]
    fn second_file_reuses_label_codes() {
        let mut train = NamedTempFile::new().unwrap();
        write!(train, "{}", FLOWERS).unwrap();
        let mut test = NamedTempFile::new().unwrap();
        write!(test, "a,b,label\n6.0,3.0,virginica\n5.0,3.0,setosa\n1.0,1.0,unknown\n").unwrap();

        let train = Dataset::from_path(train.path()).unwrap();
        let test = Dataset::from_path_with_labels(test.path(), train.index.clone()).unwrap();

        assert_eq!(test.labels, vec![2, 0, 3]);
        assert_eq!(test.index.name(3), Some("unknown"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::from_path(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, BayesError::Io(_)));
    }
}
