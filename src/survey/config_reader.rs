use crate::survey::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// The description of the report, as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report: String,
    pub date: String,
    pub place: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RadioQuestionSettings {
    pub prompt: String,
    pub columns: Vec<JSValue>,
    pub options: Vec<String>,
}

/// The configuration file, as written by the user.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveySettings {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSettings")]
    pub input_settings: Option<InputSettings>,
    pub columns: Vec<String>,
    #[serde(rename = "yesNo", default)]
    pub yes_no: Vec<JSValue>,
    #[serde(rename = "semicolonLists", default)]
    pub semicolon_lists: Vec<JSValue>,
    #[serde(rename = "freeformText", default)]
    pub freeform_text: Vec<JSValue>,
    #[serde(rename = "radioQuestions", default)]
    pub radio_questions: Vec<RadioQuestionSettings>,
    #[serde(rename = "servingAreaColumn")]
    pub serving_area_column: Option<String>,
}

/// The validated configuration of a run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyConfig {
    pub output_settings: OutputSettings,
    pub input_settings: Option<InputSettings>,
    pub schema: SurveySchema,
    /// The directory that relative paths of the configuration are resolved against.
    pub root_dir: Option<PathBuf>,
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config = parse_config(&contents)?;
    config.root_dir = Path::new(path).parent().map(|p| p.to_path_buf());
    Ok(config)
}

pub fn parse_config(contents: &str) -> SurveyResult<SurveyConfig> {
    let settings: SurveySettings = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", settings);
    let columns = settings.columns.clone();

    let yes_no = resolve_columns(&settings.yes_no, &columns)?;
    let semicolon_lists = resolve_columns(&settings.semicolon_lists, &columns)?;
    let freeform_text = resolve_columns(&settings.freeform_text, &columns)?;
    let mut radio_groups: Vec<RadioGroup> = Vec::new();
    for rq in settings.radio_questions.iter() {
        radio_groups.push(RadioGroup {
            prompt: rq.prompt.clone(),
            columns: resolve_columns(&rq.columns, &columns)?,
            options: rq.options.clone(),
        });
    }

    let mut schema = SurveySchema::new(
        columns,
        yes_no,
        semicolon_lists,
        freeform_text,
        radio_groups,
    )
    .context(CrunchingSnafu {})?;
    if let Some(c) = &settings.serving_area_column {
        schema = schema.with_serving_area(c).context(CrunchingSnafu {})?;
    }

    Ok(SurveyConfig {
        output_settings: settings.output_settings,
        input_settings: settings.input_settings,
        schema,
        root_dir: None,
    })
}

/// Reads a summary written by a previous run.
pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Turns the column references of the configuration into column names.
fn resolve_columns(refs: &[JSValue], columns: &[String]) -> SurveyResult<Vec<String>> {
    let mut res: Vec<String> = Vec::new();
    for r in refs {
        for idx in read_column_ref(r, columns)? {
            res.push(columns[idx].clone());
        }
    }
    Ok(res)
}

// A reference is a column name, an index (number or string) or a range of indexes "start..end".
fn read_column_ref(x: &JSValue, columns: &[String]) -> SurveyResult<Vec<usize>> {
    let reference = x.to_string();
    let check = |idx: usize| -> SurveyResult<usize> {
        ensure!(
            idx < columns.len(),
            ParsingColumnRefSnafu {
                reference: x.to_string()
            }
        );
        Ok(idx)
    };
    match x {
        JSValue::Number(n) => {
            let idx = n
                .as_u64()
                .map(|x| x as usize)
                .context(ParsingColumnRefSnafu {
                    reference: reference.clone(),
                })?;
            Ok(vec![check(idx)?])
        }
        // Names take precedence over the other notations.
        JSValue::String(s) if columns.contains(s) => {
            let idx = columns.iter().position(|c| c == s).unwrap_or_default();
            Ok(vec![idx])
        }
        JSValue::String(s) if s.contains("..") => {
            let (start_s, end_s) = s.split_once("..").unwrap_or_default();
            let start = start_s.trim().parse::<usize>().ok();
            let end = end_s.trim().parse::<usize>().ok();
            match (start, end) {
                (Some(start), Some(end)) if start < end && end <= columns.len() => {
                    Ok((start..end).collect())
                }
                _ => ParsingColumnRefSnafu { reference }.fail(),
            }
        }
        JSValue::String(s) => {
            let idx = s.trim().parse::<usize>().ok().context(ParsingColumnRefSnafu {
                reference: reference.clone(),
            })?;
            Ok(vec![check(idx)?])
        }
        _ => ParsingColumnRefSnafu { reference }.fail(),
    }
}
