use std::collections::BTreeMap;

use super::model::{DataError, GroupColumn, NumericColumn, SalaryTable};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Summary statistics for one numeric column, in the usual describe() layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (NaN when fewer than two values).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Per-numeric-column descriptive statistics. An empty table yields an
/// empty vec; callers show an informational notice.
pub fn describe(table: &SalaryTable) -> Vec<ColumnSummary> {
    if table.is_empty() {
        return Vec::new();
    }

    NumericColumn::ALL
        .into_iter()
        .map(|col| {
            let mut values: Vec<f64> = table.records.iter().map(|r| col.value(r)).collect();
            values.sort_by(f64::total_cmp);

            let n = values.len();
            let mean = values.iter().sum::<f64>() / n as f64;
            let std = if n < 2 {
                f64::NAN
            } else {
                let variance =
                    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
                variance.sqrt()
            };

            ColumnSummary {
                column: col.name(),
                count: n,
                mean,
                std,
                min: values[0],
                q25: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q75: quantile(&values, 0.75),
                max: values[n - 1],
            }
        })
        .collect()
}

/// Linearly interpolated quantile of an ascending-sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Five-number summary (min, q1, median, q3, max) of unsorted values.
/// `None` when the input is empty. Feeds the box-plot charts.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumber> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumber {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// Group aggregates
// ---------------------------------------------------------------------------

/// Mean `salary_in_usd` per distinct value of `by`, sorted descending by
/// mean (ties by key) and truncated to the top 10.
///
/// `by` must be one of the [`GroupColumn`] names; anything else is an
/// `InvalidColumn` error.
pub fn group_mean(table: &SalaryTable, by: &str) -> Result<Vec<(String, f64)>, DataError> {
    let column = GroupColumn::parse(by)?;

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in &table.records {
        let entry = groups.entry(column.value(rec)).or_insert((0.0, 0));
        entry.0 += rec.salary_in_usd as f64;
        entry.1 += 1;
    }

    let mut means: Vec<(String, f64)> = groups
        .into_iter()
        .map(|(key, (sum, n))| (key.to_string(), sum / n as f64))
        .collect();
    means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    means.truncate(10);
    Ok(means)
}

/// Median `salary_in_usd` per (experience_level, company_size) pair.
/// All groups are returned, sorted by key.
pub fn group_median(table: &SalaryTable) -> Vec<((String, String), f64)> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for rec in &table.records {
        groups
            .entry((rec.experience_level.clone(), rec.company_size.clone()))
            .or_default()
            .push(rec.salary_in_usd as f64);
    }

    groups
        .into_iter()
        .map(|(key, mut values)| {
            values.sort_by(f64::total_cmp);
            let median = quantile(&values, 0.5);
            (key, median)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlations over the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    /// Row-major; `values[i][j]` is the correlation of columns i and j.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }
}

/// Pearson correlation matrix of the numeric columns. The diagonal is
/// pinned to 1.0; a zero-variance column yields NaN off-diagonal cells.
pub fn correlation(table: &SalaryTable) -> CorrelationMatrix {
    let columns: Vec<&'static str> = NumericColumn::ALL.iter().map(|c| c.name()).collect();
    if columns.len() < 2 {
        return CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        };
    }

    let series: Vec<Vec<f64>> = NumericColumn::ALL
        .into_iter()
        .map(|col| table.records.iter().map(|r| col.value(r)).collect())
        .collect();

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix { columns, values }
}

/// Pearson correlation coefficient of two equal-length series.
/// NaN when either series has zero variance or fewer than two points.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

// ---------------------------------------------------------------------------
// Yearly trend
// ---------------------------------------------------------------------------

/// One point of the salary-evolution chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub work_year: i64,
    pub job_title: String,
    pub mean_salary: f64,
}

/// The `top_n` most frequent job titles by row count, ties broken by first
/// encounter in row order.
pub fn top_job_titles(table: &SalaryTable, top_n: usize) -> Vec<String> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for rec in &table.records {
        match index.get(rec.job_title.as_str()) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(rec.job_title.as_str(), order.len());
                order.push((rec.job_title.as_str(), 1));
            }
        }
    }

    // Stable sort keeps first-encounter order among equal counts.
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
        .into_iter()
        .take(top_n)
        .map(|(title, _)| title.to_string())
        .collect()
}

/// Mean salary per (work_year, job_title) restricted to the `top_n` most
/// frequent titles, sorted by year then title.
pub fn yearly_trend(table: &SalaryTable, top_n: usize) -> Vec<TrendPoint> {
    let top: Vec<String> = top_job_titles(table, top_n);

    let mut groups: BTreeMap<(i64, &str), (f64, usize)> = BTreeMap::new();
    for rec in &table.records {
        if !top.iter().any(|t| t == &rec.job_title) {
            continue;
        }
        let entry = groups
            .entry((rec.work_year, rec.job_title.as_str()))
            .or_insert((0.0, 0));
        entry.0 += rec.salary_in_usd as f64;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((year, title), (sum, n))| TrendPoint {
            work_year: year,
            job_title: title.to_string(),
            mean_salary: sum / n as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SalaryRecord;

    fn rec(year: i64, title: &str, location: &str, level: &str, salary: i64) -> SalaryRecord {
        SalaryRecord {
            work_year: year,
            experience_level: level.to_string(),
            employment_type: "FT".to_string(),
            job_title: title.to_string(),
            salary_in_usd: salary,
            employee_residence: location.to_string(),
            remote_ratio: 0,
            company_location: location.to_string(),
            company_size: "M".to_string(),
        }
    }

    fn sample_table() -> SalaryTable {
        SalaryTable::from_records(vec![
            rec(2023, "Data Scientist", "FR", "SE", 100_000),
            rec(2023, "Data Scientist", "FR", "EN", 40_000),
            rec(2023, "Data Scientist", "US", "SE", 150_000),
        ])
    }

    #[test]
    fn group_mean_matches_worked_example() {
        let means = group_mean(&sample_table(), "company_location").unwrap();
        assert_eq!(
            means,
            vec![("US".to_string(), 150_000.0), ("FR".to_string(), 70_000.0)]
        );
    }

    #[test]
    fn group_mean_caps_at_ten_groups_sorted_descending() {
        let records: Vec<SalaryRecord> = (0..15)
            .map(|i| rec(2023, "Data Scientist", &format!("C{i:02}"), "SE", 10_000 * (i + 1)))
            .collect();
        let table = SalaryTable::from_records(records);

        let means = group_mean(&table, "company_location").unwrap();
        assert_eq!(means.len(), 10);
        for pair in means.windows(2) {
            assert!(pair[0].1 > pair[1].1);
        }
        // The five cheapest locations fell off the end.
        assert!(means.iter().all(|(_, m)| *m >= 60_000.0));
    }

    #[test]
    fn group_mean_rejects_unsupported_column() {
        let err = group_mean(&sample_table(), "remote_ratio").unwrap_err();
        assert!(matches!(err, DataError::InvalidColumn(c) if c == "remote_ratio"));
    }

    #[test]
    fn group_median_covers_every_pair() {
        let mut records = vec![
            rec(2023, "Data Scientist", "FR", "SE", 90_000),
            rec(2023, "Data Scientist", "FR", "SE", 110_000),
            rec(2023, "Data Scientist", "FR", "EN", 40_000),
        ];
        records[2].company_size = "S".to_string();
        let table = SalaryTable::from_records(records);

        let medians = group_median(&table);
        assert_eq!(
            medians,
            vec![
                (("EN".to_string(), "S".to_string()), 40_000.0),
                (("SE".to_string(), "M".to_string()), 100_000.0),
            ]
        );
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let table = SalaryTable::from_records(vec![
            rec(2020, "Data Scientist", "US", "EN", 60_000),
            rec(2021, "Data Scientist", "US", "MI", 80_000),
            rec(2022, "Data Scientist", "US", "SE", 120_000),
        ]);
        let corr = correlation(&table);

        assert_eq!(corr.columns.len(), 3);
        for i in 0..3 {
            assert_eq!(corr.get(i, i), 1.0);
            for j in 0..3 {
                let a = corr.get(i, j);
                let b = corr.get(j, i);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
        // work_year and salary_in_usd move together in this table.
        assert!(corr.get(0, 1) > 0.9);
    }

    #[test]
    fn correlation_zero_variance_column_yields_nan_cells() {
        // remote_ratio is 0 everywhere in these fixtures.
        let corr = correlation(&sample_table());
        let remote = corr.columns.iter().position(|c| *c == "remote_ratio").unwrap();
        let salary = corr.columns.iter().position(|c| *c == "salary_in_usd").unwrap();
        assert!(corr.get(remote, salary).is_nan());
        assert_eq!(corr.get(remote, remote), 1.0);
    }

    #[test]
    fn top_job_titles_breaks_ties_by_first_encounter() {
        let table = SalaryTable::from_records(vec![
            rec(2023, "ML Engineer", "US", "SE", 150_000),
            rec(2023, "Data Analyst", "US", "EN", 60_000),
            rec(2023, "Data Analyst", "US", "EN", 65_000),
            rec(2023, "ML Engineer", "US", "SE", 140_000),
            rec(2023, "Data Scientist", "US", "MI", 100_000),
        ]);
        assert_eq!(
            top_job_titles(&table, 2),
            vec!["ML Engineer".to_string(), "Data Analyst".to_string()]
        );
    }

    #[test]
    fn yearly_trend_stays_within_top_titles() {
        let table = SalaryTable::from_records(vec![
            rec(2021, "Data Scientist", "US", "SE", 100_000),
            rec(2022, "Data Scientist", "US", "SE", 120_000),
            rec(2021, "Data Analyst", "US", "EN", 55_000),
            rec(2022, "Rare Title", "US", "EX", 300_000),
        ]);

        let trend = yearly_trend(&table, 2);
        assert!(trend.iter().all(|p| p.job_title != "Rare Title"));
        // Sorted by (year, title).
        assert_eq!(trend[0].work_year, 2021);
        assert_eq!(trend[0].job_title, "Data Analyst");
        assert_eq!(trend.last().unwrap().work_year, 2022);
    }

    #[test]
    fn describe_uses_interpolated_quantiles() {
        let table = SalaryTable::from_records(vec![
            rec(2023, "Data Scientist", "US", "SE", 10),
            rec(2023, "Data Scientist", "US", "SE", 20),
            rec(2023, "Data Scientist", "US", "SE", 30),
            rec(2023, "Data Scientist", "US", "SE", 40),
        ]);

        let summaries = describe(&table);
        let salary = summaries
            .iter()
            .find(|s| s.column == "salary_in_usd")
            .unwrap();
        assert_eq!(salary.count, 4);
        assert_eq!(salary.mean, 25.0);
        assert_eq!(salary.q25, 17.5);
        assert_eq!(salary.median, 25.0);
        assert_eq!(salary.q75, 32.5);
        assert_eq!(salary.min, 10.0);
        assert_eq!(salary.max, 40.0);
    }

    #[test]
    fn describe_empty_table_is_empty() {
        assert!(describe(&SalaryTable::from_records(Vec::new())).is_empty());
    }

    #[test]
    fn five_number_summary_of_singleton() {
        let f = five_number_summary(&[42.0]).unwrap();
        assert_eq!(f.min, 42.0);
        assert_eq!(f.median, 42.0);
        assert_eq!(f.max, 42.0);
        assert!(five_number_summary(&[]).is_none());
    }
}
