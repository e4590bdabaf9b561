use std::collections::BTreeSet;

use super::model::{
    membership_value, DataError, NumericColumn, SalaryTable, MEMBERSHIP_COLUMNS,
};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// A single row-selection constraint, owned transiently by the UI per
/// interaction. Predicates compose via [`by_conjunction`].
#[derive(Debug, Clone)]
pub enum FilterPredicate {
    /// Closed numeric range `lo <= column <= hi`.
    Range { column: String, lo: f64, hi: f64 },
    /// Set membership on a categorical column. An empty set selects no
    /// rows; callers decide whether "nothing selected" should mean "all".
    Membership {
        column: String,
        allowed: BTreeSet<String>,
    },
}

impl FilterPredicate {
    pub fn apply(&self, table: &SalaryTable) -> Result<SalaryTable, DataError> {
        match self {
            FilterPredicate::Range { column, lo, hi } => by_range(table, column, *lo, *hi),
            FilterPredicate::Membership { column, allowed } => {
                by_membership(table, column, allowed)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Filter operations
// ---------------------------------------------------------------------------

/// Rows whose numeric `column` lies within the closed interval [lo, hi].
/// `lo > hi` is an `InvalidRange` error; the bounds are never swapped.
pub fn by_range(
    table: &SalaryTable,
    column: &str,
    lo: f64,
    hi: f64,
) -> Result<SalaryTable, DataError> {
    let column = NumericColumn::parse(column)?;
    if lo > hi {
        return Err(DataError::InvalidRange { lo, hi });
    }

    let records = table
        .records
        .iter()
        .filter(|rec| {
            let v = column.value(rec);
            lo <= v && v <= hi
        })
        .cloned()
        .collect();
    Ok(SalaryTable::from_records(records))
}

/// Rows whose categorical `column` value is in `allowed`. Only the
/// experience-level and company-size columns support membership filters.
/// An empty `allowed` set yields an empty table, not an error.
pub fn by_membership(
    table: &SalaryTable,
    column: &str,
    allowed: &BTreeSet<String>,
) -> Result<SalaryTable, DataError> {
    // Validate the column up front so an unsupported name errors even on
    // an empty table.
    if !MEMBERSHIP_COLUMNS.contains(&column) {
        return Err(DataError::InvalidColumn(column.to_string()));
    }

    let mut records = Vec::new();
    for rec in &table.records {
        if allowed.contains(membership_value(rec, column)?) {
            records.push(rec.clone());
        }
    }
    Ok(SalaryTable::from_records(records))
}

/// Applies every predicate in sequence; logically an AND. The predicates
/// are independent row selections, so application order is irrelevant.
pub fn by_conjunction(
    table: &SalaryTable,
    predicates: &[FilterPredicate],
) -> Result<SalaryTable, DataError> {
    let mut current = table.clone();
    for predicate in predicates {
        current = predicate.apply(&current)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SalaryRecord;

    fn rec(location: &str, level: &str, salary: i64) -> SalaryRecord {
        SalaryRecord {
            work_year: 2023,
            experience_level: level.to_string(),
            employment_type: "FT".to_string(),
            job_title: "Data Scientist".to_string(),
            salary_in_usd: salary,
            employee_residence: location.to_string(),
            remote_ratio: 0,
            company_location: location.to_string(),
            company_size: "M".to_string(),
        }
    }

    fn sample_table() -> SalaryTable {
        SalaryTable::from_records(vec![
            rec("FR", "SE", 100_000),
            rec("FR", "EN", 40_000),
            rec("US", "SE", 150_000),
        ])
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn range_keeps_only_rows_inside_closed_bounds() {
        let table = sample_table();
        let filtered = by_range(&table, "salary_in_usd", 50_000.0, 120_000.0).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.records[0].salary_in_usd, 100_000);

        // Bounds are inclusive on both ends.
        let exact = by_range(&table, "salary_in_usd", 40_000.0, 40_000.0).unwrap();
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn full_range_preserves_cardinality_and_order() {
        let table = sample_table();
        let (min, max) = table.salary_bounds().unwrap();
        let filtered = by_range(&table, "salary_in_usd", min as f64, max as f64).unwrap();
        assert_eq!(filtered.records, table.records);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = by_range(&sample_table(), "salary_in_usd", 10.0, 5.0).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { lo, hi } if lo == 10.0 && hi == 5.0));
    }

    #[test]
    fn range_rejects_non_numeric_column() {
        let err = by_range(&sample_table(), "job_title", 0.0, 1.0).unwrap_err();
        assert!(matches!(err, DataError::InvalidColumn(_)));
    }

    #[test]
    fn membership_full_set_preserves_cardinality() {
        let table = sample_table();
        let all = table.unique("experience_level");
        let filtered = by_membership(&table, "experience_level", &all).unwrap();
        assert_eq!(filtered.records, table.records);
    }

    #[test]
    fn membership_empty_set_selects_nothing() {
        let filtered =
            by_membership(&sample_table(), "experience_level", &BTreeSet::new()).unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn membership_rejects_unsupported_column() {
        let err = by_membership(&sample_table(), "job_title", &set(&["Data Scientist"]));
        assert!(matches!(err.unwrap_err(), DataError::InvalidColumn(_)));
        let err = by_membership(
            &SalaryTable::from_records(Vec::new()),
            "job_title",
            &BTreeSet::new(),
        );
        assert!(matches!(err.unwrap_err(), DataError::InvalidColumn(_)));
    }

    #[test]
    fn conjunction_intersects_predicates_in_any_order() {
        let table = sample_table();
        let predicates = [
            FilterPredicate::Membership {
                column: "experience_level".to_string(),
                allowed: set(&["SE"]),
            },
            FilterPredicate::Range {
                column: "salary_in_usd".to_string(),
                lo: 0.0,
                hi: 120_000.0,
            },
        ];
        let forward = by_conjunction(&table, &predicates).unwrap();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward.records[0].company_location, "FR");

        let mut reversed = predicates.to_vec();
        reversed.reverse();
        let backward = by_conjunction(&table, &reversed).unwrap();
        assert_eq!(backward.records, forward.records);
    }

    #[test]
    fn conjunction_of_nothing_is_identity() {
        let table = sample_table();
        let same = by_conjunction(&table, &[]).unwrap();
        assert_eq!(same.records, table.records);
    }
}
