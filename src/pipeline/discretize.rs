//! Equal-population discretization of numeric feature columns
//!
//! One resolution applies uniformly to every numeric column in a run. Each
//! column is replaced in place by its bin codes; non-numeric columns pass
//! through untouched. Bin membership uses a closed lower bound: a value
//! lands in the highest bin whose boundary it reaches, so ties at the
//! median go to bin 1.

use rayon::prelude::*;
use std::collections::BTreeSet;

use super::table::{ColumnValues, FeatureTable, MISSING_CODE};

/// Discretization resolution: how many equal-population bins each numeric
/// column is split into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Binary median split (default) - bin 1 iff value >= column median
    #[default]
    Median,
    /// 4-way equal-population quantile split
    Quartile,
    /// 10-way equal-population quantile split
    Decile,
}

impl Resolution {
    /// Requested bin count for this resolution.
    pub fn bins(&self) -> usize {
        match self {
            Resolution::Median => 2,
            Resolution::Quartile => 4,
            Resolution::Decile => 10,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Median => write!(f, "median"),
            Resolution::Quartile => write!(f, "quartile"),
            Resolution::Decile => write!(f, "decile"),
        }
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "median" => Ok(Resolution::Median),
            "quartile" => Ok(Resolution::Quartile),
            "decile" => Ok(Resolution::Decile),
            _ => Err(format!(
                "Unknown resolution: '{}'. Use 'median', 'quartile' or 'decile'.",
                s
            )),
        }
    }
}

/// A column that could not fill the requested bin count - duplicate quantile
/// boundaries collapsed it to fewer occupied bins. Recoverable: the coarser
/// bins still partition the rows.
#[derive(Debug, Clone)]
pub struct DegenerateColumn {
    pub name: String,
    pub requested: usize,
    pub achieved: usize,
}

/// Discretize every numeric column of the table in place. Columns are
/// independent, so they run in parallel. Returns the columns that collapsed
/// below the requested bin count, in table order.
pub fn discretize(table: &mut FeatureTable, resolution: Resolution) -> Vec<DegenerateColumn> {
    let requested = resolution.bins();
    table
        .columns
        .par_iter_mut()
        .filter_map(|col| {
            let ColumnValues::Numeric(raw) = &col.values else {
                return None;
            };
            let (binned, achieved) = bin_column(raw, requested);
            col.values = binned;
            (achieved < requested).then(|| DegenerateColumn {
                name: col.name.clone(),
                requested,
                achieved,
            })
        })
        .collect()
}

/// Bin one column: interior quantile boundaries, closed lower bound, ties
/// up. Returns the binned values and the occupied (non-missing) bin count.
fn bin_column(raw: &[Option<f64>], bins: usize) -> (ColumnValues, usize) {
    let mut present: Vec<f64> = raw
        .iter()
        .filter_map(|v| *v)
        .filter(|x| !x.is_nan())
        .collect();

    if present.is_empty() {
        // Nothing to split on: every row carries the missing code.
        let codes = vec![MISSING_CODE; raw.len()];
        return (ColumnValues::Binned { codes, bins: 1 }, 1);
    }

    present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut boundaries: Vec<f64> = (1..bins)
        .map(|j| quantile(&present, j as f64 / bins as f64))
        .collect();
    boundaries.dedup();

    let codes: Vec<u32> = raw
        .iter()
        .map(|v| match v {
            None => MISSING_CODE,
            Some(x) if x.is_nan() => MISSING_CODE,
            Some(x) => boundaries.partition_point(|&b| *x >= b) as u32,
        })
        .collect();

    let occupied: BTreeSet<u32> = codes.iter().copied().filter(|&c| c != MISSING_CODE).collect();
    let achieved = occupied.len().max(1);

    (
        ColumnValues::Binned {
            codes,
            bins: boundaries.len() + 1,
        },
        achieved,
    )
}

/// Linearly interpolated quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(values: Vec<Option<f64>>) -> ColumnValues {
        ColumnValues::Numeric(values)
    }

    fn codes_of(values: &ColumnValues) -> &[u32] {
        match values {
            ColumnValues::Binned { codes, .. } => codes,
            other => panic!("expected binned, got {:?}", other),
        }
    }

    fn table_of(columns: Vec<(&str, ColumnValues)>) -> FeatureTable {
        use polars::prelude::*;
        // Build through a DataFrame so the table's row count is consistent.
        let cols: Vec<Column> = columns
            .iter()
            .map(|(name, values)| match values {
                ColumnValues::Numeric(raw) => Column::new((*name).into(), raw.clone()),
                _ => unreachable!("fixtures are numeric"),
            })
            .collect();
        FeatureTable::from_dataframe(&DataFrame::new(cols).unwrap()).unwrap()
    }

    #[test]
    fn test_median_split_ties_go_up() {
        let mut table = table_of(vec![(
            "a",
            numeric(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
        )]);
        let warnings = discretize(&mut table, Resolution::Median);
        assert!(warnings.is_empty());
        // median = 2.5; 3 and 4 reach it, 1 and 2 do not
        assert_eq!(table.columns[0].codes(), &[0, 0, 1, 1]);

        let mut table = table_of(vec![(
            "a",
            numeric(vec![Some(1.0), Some(2.0), Some(3.0)]),
        )]);
        discretize(&mut table, Resolution::Median);
        // odd count: median = 2, the tie lands in bin 1
        assert_eq!(table.columns[0].codes(), &[0, 1, 1]);
    }

    #[test]
    fn test_median_split_idempotent_on_binary_column() {
        let mut table = table_of(vec![(
            "a",
            numeric(vec![Some(0.0), Some(0.0), Some(1.0), Some(1.0)]),
        )]);
        discretize(&mut table, Resolution::Median);
        assert_eq!(table.columns[0].codes(), &[0, 0, 1, 1]);

        let mut again = table_of(vec![(
            "a",
            numeric(vec![Some(0.0), Some(0.0), Some(1.0), Some(1.0)]),
        )]);
        discretize(&mut again, Resolution::Median);
        discretize_binned_as_numeric_roundtrip(&mut again);
        assert_eq!(again.columns[0].codes(), &[0, 0, 1, 1]);
    }

    /// Re-binarize a median-split column by feeding its codes back through
    /// the discretizer as raw values.
    fn discretize_binned_as_numeric_roundtrip(table: &mut FeatureTable) {
        let raw: Vec<Option<f64>> = table.columns[0]
            .codes()
            .iter()
            .map(|&c| Some(c as f64))
            .collect();
        table.columns[0].values = ColumnValues::Numeric(raw);
        discretize(table, Resolution::Median);
    }

    #[test]
    fn test_quartile_split_even_population() {
        let mut table = table_of(vec![(
            "a",
            numeric((1..=8).map(|v| Some(v as f64)).collect()),
        )]);
        let warnings = discretize(&mut table, Resolution::Quartile);
        assert!(warnings.is_empty());
        assert_eq!(table.columns[0].codes(), &[0, 0, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_tied_mass_shrinks_occupied_bins() {
        // Half the mass tied at 1.0 leaves the lowest bin unoccupied.
        let mut table = table_of(vec![(
            "a",
            numeric(
                [1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 9.0, 9.0]
                    .into_iter()
                    .map(Some)
                    .collect(),
            ),
        )]);
        let warnings = discretize(&mut table, Resolution::Quartile);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].name, "a");
        assert_eq!(warnings[0].requested, 4);
        assert_eq!(warnings[0].achieved, 3);

        // Still a valid partition: ties share a bin, larger values sit above.
        let codes = table.columns[0].codes();
        assert!(codes[..4].iter().all(|&c| c == codes[0]));
        assert!(codes[4] > codes[0]);
        assert!(codes[6] > codes[4]);
        assert_eq!(codes[4], codes[5]);
        assert_eq!(codes[6], codes[7]);
    }

    #[test]
    fn test_all_ties_collapse_to_single_bin() {
        // Boundaries all landing on the tied value dedup to one, and the
        // closed lower bound then puts every row in the same bin.
        let mut table = table_of(vec![(
            "a",
            numeric(vec![Some(1.0); 7].into_iter().chain([Some(9.0)]).collect()),
        )]);
        let warnings = discretize(&mut table, Resolution::Quartile);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].achieved, 1);
        let codes = table.columns[0].codes();
        assert!(codes.iter().all(|&c| c == codes[0]));
    }

    #[test]
    fn test_uniform_column_collapses_to_one_bin() {
        let mut table = table_of(vec![("a", numeric(vec![Some(5.0); 6]))]);
        let warnings = discretize(&mut table, Resolution::Median);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].achieved, 1);

        let codes = table.columns[0].codes();
        assert!(codes.iter().all(|&c| c == codes[0]), "single group");
    }

    #[test]
    fn test_missing_values_share_their_own_bin() {
        let mut table = table_of(vec![(
            "a",
            numeric(vec![Some(1.0), None, Some(3.0), None]),
        )]);
        discretize(&mut table, Resolution::Median);
        let codes = table.columns[0].codes();
        assert_eq!(codes[1], MISSING_CODE);
        assert_eq!(codes[3], MISSING_CODE);
        assert_ne!(codes[0], MISSING_CODE);
    }

    #[test]
    fn test_all_missing_column() {
        let mut table = table_of(vec![("a", numeric(vec![None, None, None]))]);
        let warnings = discretize(&mut table, Resolution::Decile);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].achieved, 1);
        assert_eq!(table.columns[0].codes(), &[MISSING_CODE; 3]);
    }

    #[test]
    fn test_categorical_columns_untouched() {
        use polars::prelude::*;
        let df = df! {
            "num" => [1.0f64, 2.0, 3.0, 4.0],
            "cat" => ["x", "y", "x", "y"],
        }
        .unwrap();
        let mut table = FeatureTable::from_dataframe(&df).unwrap();
        discretize(&mut table, Resolution::Median);

        match &table.columns[1].values {
            ColumnValues::Categorical { codes, .. } => assert_eq!(codes, &[0, 1, 0, 1]),
            other => panic!("categorical column was rewritten: {:?}", other),
        }
        assert!(matches!(
            table.columns[0].values,
            ColumnValues::Binned { .. }
        ));
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert!((quantile(&sorted, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_from_str() {
        assert_eq!("median".parse::<Resolution>().unwrap(), Resolution::Median);
        assert_eq!(
            "QUARTILE".parse::<Resolution>().unwrap(),
            Resolution::Quartile
        );
        assert_eq!("decile".parse::<Resolution>().unwrap(), Resolution::Decile);
        assert!("percentile".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Median.to_string(), "median");
        assert_eq!(Resolution::Quartile.to_string(), "quartile");
        assert_eq!(Resolution::Decile.to_string(), "decile");
    }
}
