//! Dataset rows, CSV I/O, and k-fold splitting.
//!
//! A row is one labeled document: an id, a category code, and a
//! whitespace-separated keyword bag. The CSV carrier is three columns
//! with a header; the keyword bag is the final column and is split off
//! at the second comma, so commas inside it cannot shift fields.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, TailGraphError};
use crate::types::Category;

const CSV_HEADER: &str = "doc_id,category,keywords";

/// One labeled document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub doc_id: String,
    pub category: Category,
    pub keywords: String,
}

impl DocumentRow {
    /// The keyword bag as individual tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.keywords.split_whitespace()
    }
}

/// One train/test partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train: Vec<DocumentRow>,
    pub test: Vec<DocumentRow>,
}

/// Read labeled rows from a CSV file with a `doc_id,category,keywords`
/// header. Category is carried as its numeric code.
pub fn read_rows(path: &Path) -> Result<Vec<DocumentRow>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line_no == 1 {
            if line.trim() != CSV_HEADER {
                return Err(TailGraphError::MalformedRow {
                    line: line_no,
                    reason: format!("expected header `{CSV_HEADER}`"),
                });
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, ',');
        let (Some(doc_id), Some(code), Some(keywords)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(TailGraphError::MalformedRow {
                line: line_no,
                reason: "expected 3 comma-separated fields".to_string(),
            });
        };

        let code: i64 = code.trim().parse().map_err(|_| TailGraphError::MalformedRow {
            line: line_no,
            reason: format!("category code `{}` is not an integer", code.trim()),
        })?;
        let keywords = keywords.trim().trim_matches('"').to_string();

        rows.push(DocumentRow {
            doc_id: doc_id.trim().to_string(),
            category: Category::from_code(code)?,
            keywords,
        });
    }

    Ok(rows)
}

/// Write rows back out in the same three-column shape.
pub fn write_rows(path: &Path, rows: &[DocumentRow]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(writer, "{},{},{}", row.doc_id, row.category.code(), row.keywords)?;
    }
    writer.flush()?;
    Ok(())
}

/// Shuffle `rows` and partition them into `k` folds. Each test chunk is
/// `len / k` rows; when `k` does not divide the row count the leftover
/// rows are added to the last fold's test set, so every row lands in
/// exactly one test set and none is dropped.
pub fn k_fold_splits<R: Rng>(mut rows: Vec<DocumentRow>, k: usize, rng: &mut R) -> Result<Vec<Fold>> {
    if k < 2 {
        return Err(TailGraphError::Config(format!(
            "fold count must be at least 2, got {k}"
        )));
    }
    if rows.len() < k {
        return Err(TailGraphError::Config(format!(
            "cannot split {} rows into {k} folds",
            rows.len()
        )));
    }

    rows.shuffle(rng);

    let base = rows.len() / k;
    let mut folds = Vec::with_capacity(k);
    for fold_index in 0..k {
        let start = fold_index * base;
        let end = if fold_index == k - 1 {
            rows.len()
        } else {
            start + base
        };
        let test = rows[start..end].to_vec();
        let mut train = rows[..start].to_vec();
        train.extend_from_slice(&rows[end..]);
        folds.push(Fold { train, test });
    }

    Ok(folds)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rows(n: usize) -> Vec<DocumentRow> {
        (0..n)
            .map(|i| DocumentRow {
                doc_id: format!("doc-{i}"),
                category: Category::ALL[i % Category::ALL.len()],
                keywords: format!("word{i} shared"),
            })
            .collect()
    }

    #[test]
    fn csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let original = rows(5);

        write_rows(&path, &original).unwrap();
        let loaded = read_rows(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn bad_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "id,cat,words\n1,1,apple\n").unwrap();

        let err = read_rows(&path).unwrap_err();
        assert!(matches!(err, TailGraphError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn bad_category_code_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "doc_id,category,keywords\n1,99,apple\n").unwrap();

        let err = read_rows(&path).unwrap_err();
        assert!(matches!(err, TailGraphError::UnknownCategory(99)));
    }

    #[test]
    fn quoted_keyword_bag_is_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        std::fs::write(&path, "doc_id,category,keywords\n1,3,\"apple pear\"\n").unwrap();

        let loaded = read_rows(&path).unwrap();
        assert_eq!(loaded[0].category, Category::Clerical);
        assert_eq!(loaded[0].tokens().collect::<Vec<_>>(), vec!["apple", "pear"]);
    }

    #[test]
    fn folds_partition_every_row_exactly_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let all = rows(23);
        let folds = k_fold_splits(all.clone(), 5, &mut rng).unwrap();
        assert_eq!(folds.len(), 5);

        let mut tested: Vec<&str> = folds
            .iter()
            .flat_map(|f| f.test.iter().map(|r| r.doc_id.as_str()))
            .collect();
        tested.sort_unstable();
        tested.dedup();
        assert_eq!(tested.len(), all.len());

        for (i, fold) in folds.iter().enumerate() {
            assert_eq!(fold.train.len() + fold.test.len(), all.len());
            // 23 rows over 5 folds: base test chunk of 4, remainder of 3
            // on the last fold
            let expected = if i == folds.len() - 1 { 7 } else { 4 };
            assert_eq!(fold.test.len(), expected);
            for row in &fold.test {
                assert!(!fold.train.contains(row));
            }
        }
    }

    #[test]
    fn remainder_rows_go_to_the_last_test_set() {
        let mut rng = StdRng::seed_from_u64(3);
        let folds = k_fold_splits(rows(101), 5, &mut rng).unwrap();

        let test_sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(test_sizes, vec![20, 20, 20, 20, 21]);
        let train_sizes: Vec<usize> = folds.iter().map(|f| f.train.len()).collect();
        assert_eq!(train_sizes, vec![81, 81, 81, 81, 80]);
    }

    #[test]
    fn fold_split_is_seed_deterministic() {
        let a = k_fold_splits(rows(20), 4, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = k_fold_splits(rows(20), 4, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_few_rows_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(k_fold_splits(rows(3), 5, &mut rng).is_err());
        assert!(k_fold_splits(rows(10), 1, &mut rng).is_err());
    }
}
