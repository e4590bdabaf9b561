use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use super::model::{DataError, SalaryRecord, SalaryTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Preferred dataset location.
pub const PRIMARY_PATH: &str = "data/ds_salaries.csv";
/// Fallback location in the working directory.
pub const FALLBACK_PATH: &str = "ds_salaries.csv";

static TABLE: OnceLock<SalaryTable> = OnceLock::new();

/// Load the salary dataset, trying [`PRIMARY_PATH`] then [`FALLBACK_PATH`].
///
/// The first successful load is memoized for the process lifetime; later
/// calls return the same table without touching the filesystem. A failed
/// load is not memoized, so the error is reported on every attempt.
pub fn load() -> Result<&'static SalaryTable, DataError> {
    if let Some(table) = TABLE.get() {
        return Ok(table);
    }
    let table = read_from_disk()?;
    Ok(TABLE.get_or_init(|| table))
}

fn read_from_disk() -> Result<SalaryTable, DataError> {
    let path = if Path::new(PRIMARY_PATH).exists() {
        PRIMARY_PATH
    } else if Path::new(FALLBACK_PATH).exists() {
        FALLBACK_PATH
    } else {
        return Err(DataError::DataUnavailable(format!(
            "no file at '{PRIMARY_PATH}' or '{FALLBACK_PATH}'"
        )));
    };

    let file = std::fs::File::open(path)
        .map_err(|e| DataError::DataUnavailable(format!("opening '{path}': {e}")))?;
    let records = parse_records(file)
        .map_err(|e| DataError::DataUnavailable(format!("parsing '{path}': {e}")))?;

    log::info!("loaded {} salary records from '{path}'", records.len());
    Ok(SalaryTable::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse CSV rows into records. The header row must carry every column of
/// [`SalaryRecord`]; extra columns are ignored.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<SalaryRecord>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (row_no, result) in csv_reader.deserialize::<SalaryRecord>().enumerate() {
        let record =
            result.map_err(|e| DataError::DataUnavailable(format!("row {row_no}: {e}")))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "work_year,experience_level,employment_type,job_title,\
                          salary_in_usd,employee_residence,remote_ratio,\
                          company_location,company_size";

    #[test]
    fn parses_well_formed_rows() {
        let csv = format!(
            "{HEADER}\n\
             2023,SE,FT,Data Scientist,150000,US,100,US,M\n\
             2022,EN,FT,Data Analyst,40000,FR,0,FR,S\n"
        );
        let records = parse_records(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].job_title, "Data Scientist");
        assert_eq!(records[1].salary_in_usd, 40_000);
    }

    #[test]
    fn ignores_extra_columns() {
        let csv = "work_year,experience_level,employment_type,job_title,salary,\
                   salary_currency,salary_in_usd,employee_residence,remote_ratio,\
                   company_location,company_size\n\
                   2023,SE,FT,ML Engineer,180000,USD,180000,US,50,US,L\n";
        let records = parse_records(Cursor::new(csv)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].remote_ratio, 50);
    }

    #[test]
    fn load_is_memoized_after_success() {
        // Only meaningful when a dataset file is present in the working
        // directory; both calls must then hand back the same table.
        if let Ok(first) = load() {
            let second = load().unwrap();
            assert!(std::ptr::eq(first, second));
        }
    }

    #[test]
    fn rejects_header_mismatch() {
        let csv = "year,level\n2023,SE\n";
        let err = parse_records(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable(_)));
    }

    #[test]
    fn rejects_malformed_numeric_cell() {
        let csv = format!("{HEADER}\n2023,SE,FT,Data Scientist,not-a-number,US,0,US,M\n");
        let err = parse_records(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable(_)));
    }
}
