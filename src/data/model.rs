use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the data layer. Empty results are never an error;
/// callers render an informational notice instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset is missing from both candidate paths, or unparseable.
    #[error("salary dataset unavailable: {0}")]
    DataUnavailable(String),

    /// A grouping or filter was requested on an unsupported column.
    #[error("unsupported column '{0}'")]
    InvalidColumn(String),

    /// A range filter with inverted bounds. Bounds are never swapped.
    #[error("invalid range: low bound {lo} exceeds high bound {hi}")]
    InvalidRange { lo: f64, hi: f64 },
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single salary survey entry (one CSV row). Columns not listed here
/// (e.g. `salary`, `salary_currency`) are ignored on load.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SalaryRecord {
    pub work_year: i64,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title: String,
    pub salary_in_usd: i64,
    pub employee_residence: String,
    pub remote_ratio: i64,
    pub company_location: String,
    pub company_size: String,
}

// ---------------------------------------------------------------------------
// Column enums
// ---------------------------------------------------------------------------

/// Categorical columns supported by `stats::group_mean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    ExperienceLevel,
    EmploymentType,
    JobTitle,
    CompanyLocation,
}

impl GroupColumn {
    pub const ALL: [GroupColumn; 4] = [
        GroupColumn::ExperienceLevel,
        GroupColumn::EmploymentType,
        GroupColumn::JobTitle,
        GroupColumn::CompanyLocation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GroupColumn::ExperienceLevel => "experience_level",
            GroupColumn::EmploymentType => "employment_type",
            GroupColumn::JobTitle => "job_title",
            GroupColumn::CompanyLocation => "company_location",
        }
    }

    pub fn parse(name: &str) -> Result<Self, DataError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| DataError::InvalidColumn(name.to_string()))
    }

    /// The value of this column in a record.
    pub fn value<'a>(self, rec: &'a SalaryRecord) -> &'a str {
        match self {
            GroupColumn::ExperienceLevel => &rec.experience_level,
            GroupColumn::EmploymentType => &rec.employment_type,
            GroupColumn::JobTitle => &rec.job_title,
            GroupColumn::CompanyLocation => &rec.company_location,
        }
    }
}

impl fmt::Display for GroupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric columns, used by `describe`, `correlation` and range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    WorkYear,
    SalaryInUsd,
    RemoteRatio,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::WorkYear,
        NumericColumn::SalaryInUsd,
        NumericColumn::RemoteRatio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::WorkYear => "work_year",
            NumericColumn::SalaryInUsd => "salary_in_usd",
            NumericColumn::RemoteRatio => "remote_ratio",
        }
    }

    pub fn parse(name: &str) -> Result<Self, DataError> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| DataError::InvalidColumn(name.to_string()))
    }

    pub fn value(self, rec: &SalaryRecord) -> f64 {
        match self {
            NumericColumn::WorkYear => rec.work_year as f64,
            NumericColumn::SalaryInUsd => rec.salary_in_usd as f64,
            NumericColumn::RemoteRatio => rec.remote_ratio as f64,
        }
    }
}

/// Categorical columns supported by membership filters.
pub const MEMBERSHIP_COLUMNS: [&str; 2] = ["experience_level", "company_size"];

/// The value of a membership-filter column in a record.
pub fn membership_value<'a>(rec: &'a SalaryRecord, column: &str) -> Result<&'a str, DataError> {
    match column {
        "experience_level" => Ok(&rec.experience_level),
        "company_size" => Ok(&rec.company_size),
        other => Err(DataError::InvalidColumn(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// SalaryTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique values per categorical
/// column. Immutable after construction.
#[derive(Debug, Clone)]
pub struct SalaryTable {
    /// All records (rows), in file order.
    pub records: Vec<SalaryRecord>,
    /// For each categorical column the sorted set of unique values.
    pub unique_values: BTreeMap<&'static str, BTreeSet<String>>,
}

impl SalaryTable {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let mut unique_values: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

        for rec in &records {
            for col in GroupColumn::ALL {
                unique_values
                    .entry(col.name())
                    .or_default()
                    .insert(col.value(rec).to_string());
            }
            unique_values
                .entry("company_size")
                .or_default()
                .insert(rec.company_size.clone());
        }

        SalaryTable {
            records,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique values of a categorical column, empty set if unknown.
    pub fn unique(&self, column: &str) -> BTreeSet<String> {
        self.unique_values.get(column).cloned().unwrap_or_default()
    }

    /// Smallest and largest `salary_in_usd`, `None` for an empty table.
    pub fn salary_bounds(&self) -> Option<(i64, i64)> {
        let min = self.records.iter().map(|r| r.salary_in_usd).min()?;
        let max = self.records.iter().map(|r| r.salary_in_usd).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn unique_values_are_sorted_and_deduplicated() {
        let table = SalaryTable::from_records(vec![
            rec("US", "SE", 150_000),
            rec("FR", "SE", 100_000),
            rec("FR", "EN", 40_000),
        ]);

        let locations: Vec<&String> = table.unique_values["company_location"].iter().collect();
        assert_eq!(locations, ["FR", "US"]);
        let levels: Vec<&String> = table.unique_values["experience_level"].iter().collect();
        assert_eq!(levels, ["EN", "SE"]);
        assert_eq!(table.unique_values["company_size"].len(), 1);
    }

    #[test]
    fn salary_bounds_cover_min_and_max() {
        let table = SalaryTable::from_records(vec![
            rec("US", "SE", 150_000),
            rec("FR", "EN", 40_000),
        ]);
        assert_eq!(table.salary_bounds(), Some((40_000, 150_000)));
        assert_eq!(SalaryTable::from_records(Vec::new()).salary_bounds(), None);
    }

    #[test]
    fn group_column_parse_rejects_unsupported_names() {
        assert!(GroupColumn::parse("job_title").is_ok());
        let err = GroupColumn::parse("employee_residence").unwrap_err();
        assert!(matches!(err, DataError::InvalidColumn(c) if c == "employee_residence"));
    }
}
