//! Layout of the summary workbook.
//!
//! The workbook has a fixed set of tabs. Every summary table is placed under its
//! prompt, and most of them get a chart on the `charts` tab that points back to the
//! cells of the table. Rows and columns are 0-based.

use serde::Serialize;
use survey_crunch::{CrunchedResult, ResponseTable, SummaryTable};

pub const CHARTS_SHEET: &str = "charts";
pub const YES_NO_SHEET: &str = "yes_no";
pub const RADIO_SHEET: &str = "radio";
pub const SEMICOLON_SHEET: &str = "semicolon";
pub const FREEFORM_SHEET: &str = "freeform_text";
pub const RAW_DATA_SHEET: &str = "raw_data";

const PIE_COLORS: [&str; 2] = ["#67a9cf", "#ef8a62"];
const BAR_COLORS: [&str; 3] = ["#ece2f0", "#a6bddb", "#1c9099"];

// Vertical space taken by each chart on the charts tab.
const CHART_ROW_STRIDE: u32 = 20;
// Blank rows between two tables of the same tab.
const TABLE_GAP: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    /// Vertical bars, grouped by sub-question.
    Column,
    /// Horizontal bars.
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    InsideEnd,
    OutsideEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub sheet: String,
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    fn column(sheet: &str, col: u32, first_row: u32, last_row: u32) -> CellRange {
        CellRange {
            sheet: sheet.to_string(),
            first_row,
            first_col: col,
            last_row,
            last_col: col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: Option<CellRange>,
    pub values: CellRange,
    pub categories: CellRange,
    pub fill: Option<String>,
    pub point_fills: Vec<String>,
    pub data_labels: Option<LabelPosition>,
    pub gap: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub title_font_size: u32,
    pub width: u32,
    pub height: u32,
    /// The top-left cell of the chart on the charts tab, in A1 notation.
    pub anchor: String,
    pub series: Vec<Series>,
    pub legend: bool,
    pub reverse_categories: bool,
    pub category_gridlines: bool,
}

/// A table written on a tab, with its prompt on the row above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    pub prompt: Option<String>,
    pub start_row: u32,
    pub start_col: u32,
    /// Whether a header row is written at `start_row`.
    pub header: bool,
    /// Whether the first column holds the row labels.
    pub index: bool,
    pub num_rows: u32,
    pub num_cols: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidth {
    pub first_col: u32,
    pub last_col: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    pub tables: Vec<TableBlock>,
    pub column_widths: Vec<ColumnWidth>,
}

impl Sheet {
    fn new(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            tables: Vec::new(),
            column_widths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFormat {
    pub italic: bool,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookPlan {
    pub sheets: Vec<Sheet>,
    pub charts: Vec<Chart>,
    pub prompt_format: PromptFormat,
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// The name of the output file: the name of the report, the date and the place if any.
pub fn output_file_name(report_name: &str, date: &str, place: Option<&str>) -> String {
    match place {
        Some(p) => format!("{} {} - {}.json", report_name, date, p),
        None => format!("{} {}.json", report_name, date),
    }
}

/// Lays out all the tables of a survey, and the charts that go with them.
pub fn plan_workbook(res: &CrunchedResult, raw: &ResponseTable) -> WorkbookPlan {
    let mut charts: Vec<Chart> = Vec::new();
    // The charts tab starts with an empty table so that the tab exists.
    let mut charts_sheet = Sheet::new(CHARTS_SHEET);
    charts_sheet.tables.push(TableBlock {
        prompt: None,
        start_row: 0,
        start_col: 0,
        header: true,
        index: true,
        num_rows: 1,
        num_cols: 2,
    });
    let mut chart_row: u32 = 1;

    // Yes/no questions: one pie chart each, side by side.
    let mut yes_no = Sheet::new(YES_NO_SHEET);
    let mut start_row: u32 = 1;
    let mut pie_col = "A";
    for (prompt, vc) in res.yes_no.iter() {
        let n = to_u32(vc.num_rows());
        yes_no.tables.push(TableBlock {
            prompt: Some(prompt.clone()),
            start_row,
            start_col: 0,
            header: true,
            index: true,
            num_rows: n,
            num_cols: 2,
        });
        let last_row = start_row + n.max(1);
        charts.push(Chart {
            kind: ChartKind::Pie,
            title: prompt.clone(),
            title_font_size: 12,
            width: 350,
            height: 350,
            anchor: format!("{}{}", pie_col, chart_row),
            series: vec![Series {
                name: None,
                values: CellRange::column(YES_NO_SHEET, 1, start_row + 1, last_row),
                categories: CellRange::column(YES_NO_SHEET, 0, start_row + 1, last_row),
                fill: None,
                point_fills: (0..n.max(1))
                    .map(|i| PIE_COLORS[i as usize % PIE_COLORS.len()].to_string())
                    .collect(),
                data_labels: None,
                gap: None,
            }],
            legend: true,
            reverse_categories: false,
            category_gridlines: false,
        });
        // Two answers fit in the historical spacing of 5 rows.
        start_row += (n + TABLE_GAP).max(5);
        pie_col = "G";
    }
    chart_row += CHART_ROW_STRIDE;

    // Radio questions: one grouped column chart each, one series per option.
    let mut radio = Sheet::new(RADIO_SHEET);
    start_row = 1;
    for (prompt, rt) in res.multi_radio_questions.iter() {
        let n = to_u32(rt.num_rows());
        let num_options = to_u32(rt.options.len());
        radio.tables.push(TableBlock {
            prompt: Some(prompt.clone()),
            start_row,
            start_col: 1,
            header: true,
            index: false,
            num_rows: n,
            num_cols: num_options + 1,
        });
        let last_row = start_row + n.max(1);
        let series: Vec<Series> = (0..num_options)
            .map(|opt_idx| {
                let col = 2 + opt_idx;
                Series {
                    name: Some(CellRange::column(RADIO_SHEET, col, start_row, start_row)),
                    values: CellRange::column(RADIO_SHEET, col, start_row + 1, last_row),
                    categories: CellRange::column(RADIO_SHEET, 1, start_row + 1, last_row),
                    fill: Some(BAR_COLORS[opt_idx as usize % BAR_COLORS.len()].to_string()),
                    point_fills: Vec::new(),
                    data_labels: Some(LabelPosition::InsideEnd),
                    gap: None,
                }
            })
            .collect();
        charts.push(Chart {
            kind: ChartKind::Column,
            title: prompt.clone(),
            title_font_size: 12,
            width: 800,
            height: 350,
            anchor: format!("A{}", chart_row),
            series,
            legend: true,
            reverse_categories: false,
            category_gridlines: true,
        });
        start_row += TABLE_GAP + n;
        chart_row += CHART_ROW_STRIDE;
    }
    radio.column_widths.push(ColumnWidth {
        first_col: 1,
        last_col: 1,
        width: 70,
    });
    radio.column_widths.push(ColumnWidth {
        first_col: 2,
        last_col: 5,
        width: 18,
    });

    // Multi-select questions: one horizontal bar chart each, most frequent item on top.
    let mut semicolon = Sheet::new(SEMICOLON_SHEET);
    start_row = 1;
    for (prompt, tc) in res.semicolon_lists.iter() {
        let n = to_u32(tc.num_rows());
        semicolon.tables.push(TableBlock {
            prompt: Some(prompt.clone()),
            start_row,
            start_col: 1,
            header: true,
            index: false,
            num_rows: n,
            num_cols: 2,
        });
        let last_row = start_row + n.max(1);
        charts.push(Chart {
            kind: ChartKind::Bar,
            title: prompt.clone(),
            title_font_size: 12,
            width: 800,
            height: 350,
            anchor: format!("A{}", chart_row),
            series: vec![Series {
                name: None,
                values: CellRange::column(SEMICOLON_SHEET, 2, start_row + 1, last_row),
                categories: CellRange::column(SEMICOLON_SHEET, 1, start_row + 1, last_row),
                fill: None,
                point_fills: Vec::new(),
                data_labels: Some(LabelPosition::OutsideEnd),
                gap: Some(50),
            }],
            legend: false,
            reverse_categories: true,
            category_gridlines: false,
        });
        start_row += TABLE_GAP + n;
        chart_row += CHART_ROW_STRIDE;
    }
    semicolon.column_widths.push(ColumnWidth {
        first_col: 1,
        last_col: 1,
        width: 70,
    });

    // Freeform answers: no chart, no header.
    let mut freeform = Sheet::new(FREEFORM_SHEET);
    start_row = 1;
    for (prompt, ff) in res.freeform_text.iter() {
        let n = to_u32(ff.num_rows());
        freeform.tables.push(TableBlock {
            prompt: Some(prompt.clone()),
            start_row,
            start_col: 0,
            header: false,
            index: false,
            num_rows: n,
            num_cols: 1,
        });
        start_row += TABLE_GAP + n;
    }
    freeform.column_widths.push(ColumnWidth {
        first_col: 0,
        last_col: 0,
        width: 150,
    });

    let mut raw_data = Sheet::new(RAW_DATA_SHEET);
    raw_data.tables.push(TableBlock {
        prompt: None,
        start_row: 0,
        start_col: 0,
        header: true,
        index: true,
        num_rows: to_u32(raw.num_rows()),
        num_cols: to_u32(raw.columns().len()) + 1,
    });

    WorkbookPlan {
        sheets: vec![charts_sheet, yes_no, radio, semicolon, freeform, raw_data],
        charts,
        prompt_format: PromptFormat {
            italic: true,
            font_size: 14,
            color: "blue".to_string(),
        },
    }
}
