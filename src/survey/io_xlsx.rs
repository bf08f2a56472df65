use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::{
    io_common::{simplify_file_name, to_cell},
    *,
};

/// Reads an Excel export. The first row of the worksheet is the header.
pub fn read_excel_responses(path: &str, worksheet: Option<&str>) -> SurveyResult<ResponseTable> {
    let wrange = get_range(path, worksheet)?;

    let mut iter = wrange.rows();
    let header_row = iter.next().context(EmptyExcelSnafu {})?;
    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, dt)| read_cell(dt, 1).map(|c| c.unwrap_or_else(|| format!("column {}", idx + 1))))
        .collect::<SurveyResult<Vec<String>>>()?;
    debug!("read_excel_responses: header: {:?}", header);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let cells: Vec<Cell> = row
            .iter()
            .map(|dt| read_cell(dt, lineno))
            .collect::<SurveyResult<Vec<Cell>>>()?;
        debug!("read_excel_responses: lineno: {:?} row: {:?}", lineno, cells);
        rows.push(cells);
    }
    ResponseTable::new(header, rows).context(CrunchingSnafu {})
}

fn read_cell(cell: &DataType, lineno: usize) -> SurveyResult<Cell> {
    match cell {
        DataType::String(s) => Ok(to_cell(s)),
        DataType::Empty => Ok(None),
        DataType::Int(i) => Ok(Some(i.to_string())),
        DataType::Float(f) => Ok(Some(f.to_string())),
        DataType::Bool(b) => Ok(Some(b.to_string())),
        // Timestamps are kept as the raw serial number of Excel.
        DataType::DateTime(f) => Ok(Some(f.to_string())),
        // Formula errors in the answers are skipped. The header must be readable.
        DataType::Error(e) if lineno > 1 => {
            warn!("read_cell: error value {:?} at line {} read as missing", e, lineno);
            Ok(None)
        }
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, worksheet: Option<&str>) -> SurveyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: file: {:?} worksheet: {:?}",
        simplify_file_name(path),
        worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu {}.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using the only worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu {
                names: all_worksheets
                    .iter()
                    .map(|(name, _)| name.clone())
                    .collect::<Vec<String>>(),
            }
            .fail(),
        }
    }
}
