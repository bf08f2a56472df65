use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_crunch::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::report::WorkbookPlan;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
pub mod report;
pub mod southeast_pa;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The CSV file has no header row"))]
    EmptyCsv {},
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file has no worksheet to read"))]
    EmptyExcel {},
    #[snafu(display("The Excel file has several worksheets, use --excel-worksheet-name to pick one of: {names:?}"))]
    AmbiguousWorksheet { names: Vec<String> },
    #[snafu(display("Cannot read the cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot understand the column reference {reference}"))]
    ParsingColumnRef { reference: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The survey cannot be summarized: {source}"))]
    Crunching { source: CrunchError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn table_to_json<T: SummaryTable>(prompt: &str, table: &T) -> JSValue {
    let rows: Vec<JSValue> = table
        .rows()
        .into_iter()
        .map(|row| {
            let fields: Vec<JSValue> = row
                .into_iter()
                .map(|f| match f {
                    Field::Text(s) => json!(s),
                    Field::Count(c) => json!(c),
                })
                .collect();
            JSValue::Array(fields)
        })
        .collect();
    json!({"prompt": prompt, "header": table.header(), "rows": rows})
}

fn result_to_json(res: &CrunchedResult) -> JSValue {
    let radio: Vec<JSValue> = res
        .multi_radio_questions
        .iter()
        .map(|(prompt, rt)| {
            let mut js = table_to_json(prompt, rt);
            let dropped: Vec<u64> = rt.rows.iter().map(|r| r.dropped).collect();
            js["dropped"] = json!(dropped);
            js
        })
        .collect();
    let yes_no: Vec<JSValue> = res
        .yes_no
        .iter()
        .map(|(prompt, vc)| table_to_json(prompt, vc))
        .collect();
    let semicolon: Vec<JSValue> = res
        .semicolon_lists
        .iter()
        .map(|(prompt, tc)| table_to_json(prompt, tc))
        .collect();
    let freeform: Vec<JSValue> = res
        .freeform_text
        .iter()
        .map(|(prompt, ff)| table_to_json(prompt, ff))
        .collect();
    json!({
        "responses": res.num_responses,
        "multi_radio_questions": radio,
        "yes_no": yes_no,
        "semicolon_lists": semicolon,
        "freeform_text": freeform,
    })
}

fn build_summary_js(
    config: &SurveyConfig,
    date: &str,
    place: Option<&str>,
    res: &CrunchedResult,
    plan: &WorkbookPlan,
) -> SurveyResult<JSValue> {
    let c = OutputConfig {
        report: config.output_settings.report_name.clone(),
        date: date.to_string(),
        place: place.map(|s| s.to_string()),
    };
    let workbook = serde_json::to_value(plan).context(ParsingJsonSnafu {})?;
    Ok(json!({
        "config": c,
        "results": result_to_json(res),
        "workbook": workbook,
    }))
}

fn input_path(args: &Args, config: &SurveyConfig) -> SurveyResult<PathBuf> {
    if let Some(p) = &args.input {
        return Ok(PathBuf::from(p));
    }
    match &config.input_settings {
        Some(inputs) => {
            let p: PathBuf = match &config.root_dir {
                Some(root) => root.join(&inputs.file_path),
                None => PathBuf::from(&inputs.file_path),
            };
            Ok(p)
        }
        None => whatever!("No input file: use the --input option or set inputSettings.filePath"),
    }
}

fn input_type(args: &Args, config: &SurveyConfig, path: &Path) -> String {
    if let Some(t) = &args.input_type {
        return t.clone();
    }
    if let Some(provider) = config
        .input_settings
        .as_ref()
        .and_then(|i| i.provider.clone())
    {
        return provider;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => "xlsx".to_string(),
        _ => "csv".to_string(),
    }
}

fn read_responses(args: &Args, config: &SurveyConfig) -> SurveyResult<ResponseTable> {
    let path = input_path(args, config)?;
    let p = path.as_path().display().to_string();
    let itype = input_type(args, config, &path);
    info!("Attempting to read responses from {:?} (type {})", p, itype);
    let worksheet = args.excel_worksheet_name.clone().or_else(|| {
        config
            .input_settings
            .as_ref()
            .and_then(|i| i.excel_worksheet_name.clone())
    });
    match itype.as_str() {
        "csv" if p == "-" => io_csv::read_csv_from_reader(std::io::stdin().lock()),
        "csv" => io_csv::read_csv_responses(&p),
        "xlsx" => io_xlsx::read_excel_responses(&p, worksheet.as_deref()),
        x => whatever!("Input type not implemented: {:?}", x),
    }
}

fn place_filter(args: &Args, schema: &SurveySchema) -> SurveyResult<Option<PlaceFilter>> {
    let needle = match &args.place {
        Some(n) => n,
        None => return Ok(None),
    };
    let column = match (&args.place_column, schema.serving_area()) {
        (Some(c), _) => c.clone(),
        (None, Some(c)) => c.to_string(),
        (None, None) => {
            whatever!("The survey has no serving area column: use --place-column with --place")
        }
    };
    Ok(Some(PlaceFilter::new(&column, needle)))
}

fn write_summary(
    args: &Args,
    config: &SurveyConfig,
    date: &str,
    pretty_js: &str,
) -> SurveyResult<()> {
    let out_path: PathBuf = match args.out.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js);
            return Ok(());
        }
        Some(p) => PathBuf::from(p),
        None => {
            let name =
                report::output_file_name(&config.output_settings.report_name, date, args.place.as_deref());
            match &config.output_settings.output_directory {
                Some(dir) => {
                    let dir_p: PathBuf = match &config.root_dir {
                        Some(root) => root.join(dir),
                        None => PathBuf::from(dir),
                    };
                    dir_p.join(name)
                }
                None => PathBuf::from(name),
            }
        }
    };
    let out_s = out_path.display().to_string();
    info!("Writing summary to {:?}", out_s);
    fs::write(&out_path, pretty_js).context(WritingOutputSnafu { path: out_s })?;
    Ok(())
}

fn check_reference(reference_path: &str, summary: &JSValue) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    // Only the results are compared: the date and the layout do not matter.
    let pretty_ref =
        serde_json::to_string_pretty(&summary_ref["results"]).context(ParsingJsonSnafu {})?;
    let pretty_res =
        serde_json::to_string_pretty(&summary["results"]).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_res {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_res.as_str(), "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_survey(args: &Args) -> SurveyResult<()> {
    let config = match &args.config {
        Some(p) => read_config(p)?,
        None => southeast_pa::default_config().context(CrunchingSnafu {})?,
    };
    debug!("config: {:?}", config);

    let table = read_responses(args, &config)?;
    info!(
        "Read {} responses with {} columns",
        table.num_rows(),
        table.columns().len()
    );

    let pf = place_filter(args, &config.schema)?;
    let result = crunch(&table, &config.schema, pf.as_ref()).context(CrunchingSnafu {})?;

    let plan = report::plan_workbook(&result, &table);
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let summary_js = build_summary_js(&config, &date, args.place.as_deref(), &result, &plan)?;
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    write_summary(args, &config, &date, &pretty_js)?;

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &summary_js)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_result() -> CrunchedResult {
        let schema = SurveySchema::new(
            vec!["Support?".to_string(), "Bus".to_string(), "Why".to_string()],
            vec!["Support?".to_string()],
            vec![],
            vec!["Why".to_string()],
            vec![RadioGroup {
                prompt: "Usage".to_string(),
                columns: vec!["Bus".to_string()],
                options: vec!["Never".to_string(), "Daily".to_string()],
            }],
        )
        .unwrap();
        let mut b = builder::Builder::new(&schema);
        b.add_response_simple(&["Yes", "Daily", "Cheaper"]).unwrap();
        b.add_response_simple(&["Yes", "Weekly", ""]).unwrap();
        b.crunch(None).unwrap()
    }

    #[test]
    fn results_json_layout() {
        let js = result_to_json(&tiny_result());
        assert_eq!(js["responses"], json!(2));
        assert_eq!(
            js["yes_no"][0],
            json!({"prompt": "Support?", "header": ["value", "count"], "rows": [["Yes", 2]]})
        );
        assert_eq!(js["freeform_text"][0]["rows"], json!([["Cheaper"]]));
        assert_eq!(
            js["multi_radio_questions"][0]["header"],
            json!(["Option", "Never", "Daily"])
        );
        assert_eq!(js["multi_radio_questions"][0]["rows"], json!([["Bus", 0, 1]]));
        assert_eq!(js["multi_radio_questions"][0]["dropped"], json!([1]));
        assert_eq!(js["semicolon_lists"], json!([]));
    }

    fn args() -> Args {
        Args {
            config: None,
            input: None,
            input_type: None,
            excel_worksheet_name: None,
            place: None,
            place_column: None,
            out: None,
            reference: None,
            verbose: false,
        }
    }

    #[test]
    fn input_type_from_extension() {
        let config = southeast_pa::default_config().unwrap();
        let a = args();
        assert_eq!(input_type(&a, &config, Path::new("responses.XLSX")), "xlsx");
        assert_eq!(input_type(&a, &config, Path::new("responses.csv")), "csv");
        let a = Args {
            input_type: Some("xlsx".to_string()),
            ..args()
        };
        assert_eq!(input_type(&a, &config, Path::new("responses.csv")), "xlsx");
    }

    #[test]
    fn place_filter_defaults_to_serving_area() {
        let config = southeast_pa::default_config().unwrap();
        assert_eq!(place_filter(&args(), &config.schema).unwrap(), None);

        let a = Args {
            place: Some("Philadelphia".to_string()),
            ..args()
        };
        let pf = place_filter(&a, &config.schema).unwrap().unwrap();
        assert_eq!(pf.needle, "Philadelphia");
        assert_eq!(Some(pf.column.as_str()), config.schema.serving_area());
    }

    #[test]
    fn missing_input_is_an_error() {
        let config = southeast_pa::default_config().unwrap();
        assert!(input_path(&args(), &config).is_err());
    }

    const TRAIL_CONFIG: &str = r#"{
        "outputSettings": {"reportName": "Trail survey", "outputDirectory": "out"},
        "inputSettings": {"filePath": "responses.csv"},
        "columns": ["Timestamp", "Support?", "Modes", "Why"],
        "yesNo": ["Support?"],
        "semicolonLists": [2],
        "freeformText": ["Why"]
    }"#;

    const TRAIL_RESPONSES: &str = "Timestamp,Support?,Modes,Why\n\
                                   2022/11/01,Yes,Walk;Bike,\"Safer\nroads\"\n\
                                   2022/11/02,No,Bike,\n\
                                   2022/11/03,Yes,,Cheaper\n";

    // Writes the configuration and the responses into a fresh directory.
    fn trail_survey_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "survey_{}_{}",
            test_name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("out")).unwrap();
        fs::write(dir.join("config.json"), TRAIL_CONFIG).unwrap();
        fs::write(dir.join("responses.csv"), TRAIL_RESPONSES).unwrap();
        dir
    }

    fn path_str(p: &Path) -> String {
        p.display().to_string()
    }

    #[test]
    fn summary_written_to_output_directory() {
        let dir = trail_survey_dir("output_directory");
        let a = Args {
            config: Some(path_str(&dir.join("config.json"))),
            ..args()
        };
        run_survey(&a).unwrap();

        let written: Vec<PathBuf> = fs::read_dir(dir.join("out"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(written.len(), 1);
        let file_name = written[0].file_name().unwrap().to_str().unwrap().to_string();
        assert!(file_name.starts_with("Trail survey "));
        assert!(file_name.ends_with(".json"));

        let summary = read_summary(&path_str(&written[0])).unwrap();
        assert_eq!(summary["config"]["report"], json!("Trail survey"));
        assert_eq!(summary["results"]["responses"], json!(3));
        assert_eq!(
            summary["results"]["yes_no"][0]["rows"],
            json!([["Yes", 2], ["No", 1]])
        );
        assert_eq!(
            summary["results"]["freeform_text"][0]["rows"],
            json!([["Safer\nroads"], ["Cheaper"]])
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reference_summary_check() {
        let dir = trail_survey_dir("reference");
        let config = path_str(&dir.join("config.json"));
        let first = path_str(&dir.join("first.json"));
        let a = Args {
            config: Some(config.clone()),
            out: Some(first.clone()),
            ..args()
        };
        run_survey(&a).unwrap();

        // Same responses: the summary matches.
        let a = Args {
            config: Some(config.clone()),
            out: Some(path_str(&dir.join("second.json"))),
            reference: Some(first.clone()),
            ..args()
        };
        assert!(run_survey(&a).is_ok());

        // One count differs: the check fails.
        let mut reference = read_summary(&first).unwrap();
        reference["results"]["yes_no"][0]["rows"][0][1] = json!(99);
        let altered = path_str(&dir.join("altered.json"));
        fs::write(&altered, serde_json::to_string_pretty(&reference).unwrap()).unwrap();
        let a = Args {
            config: Some(config),
            out: Some(path_str(&dir.join("third.json"))),
            reference: Some(altered),
            ..args()
        };
        assert!(matches!(run_survey(&a), Err(SurveyError::Whatever { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }
}
