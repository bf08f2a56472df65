// Primitives for reading CSV files.

use std::io::Read;

use crate::survey::{
    io_common::{simplify_file_name, to_cell},
    *,
};

/// Reads a CSV export. The first line is the header.
pub fn read_csv_responses(path: &str) -> SurveyResult<ResponseTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    debug!("read_csv_responses: reading {}", simplify_file_name(path));
    read_records(rdr)
}

pub fn read_csv_from_reader<R: Read>(input: R) -> SurveyResult<ResponseTable> {
    let rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    read_records(rdr)
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>) -> SurveyResult<ResponseTable> {
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    ensure!(!header.is_empty(), EmptyCsvSnafu {});
    debug!("read_records: header: {:?}", header);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // Quoted answers may span several lines: the reader knows the physical line.
        let line = match line_r {
            Ok(line) => line,
            Err(e) => {
                let lineno = e
                    .position()
                    .map(|pos| pos.line() as usize)
                    .unwrap_or(idx + 2);
                return Err(e).context(CsvLineParseSnafu { lineno });
            }
        };
        let lineno = line.position().map(|pos| pos.line()).unwrap_or(0);
        let row: Vec<Cell> = line.iter().map(to_cell).collect();
        debug!("read_records: lineno: {:?} row: {:?}", lineno, row);
        rows.push(row);
    }
    ResponseTable::new(header, rows).context(CrunchingSnafu {})
}
