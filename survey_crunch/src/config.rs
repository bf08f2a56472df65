// ********* Input data structures ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

/// The content of one cell of a response.
///
/// `None` and the empty string are both treated as "no answer".
pub type Cell = Option<String>;

/// Returns the content of a cell if the respondent answered something.
pub fn answered(cell: &Cell) -> Option<&str> {
    match cell.as_deref() {
        None | Some("") => None,
        Some(s) => Some(s),
    }
}

/// The raw responses: one row per respondent, one column per question.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl ResponseTable {
    /// Creates a table. Every row must have exactly one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<ResponseTable, CrunchError> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CrunchError::RaggedRow {
                    row: idx,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(ResponseTable { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Result<usize, CrunchError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CrunchError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// All the cells of the given column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, CrunchError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Overwrites the column names by position.
    ///
    /// The header found in the input is discarded: the provided names are authoritative.
    /// The number of names must match the number of columns exactly.
    pub fn relabel(self, names: &[String]) -> Result<ResponseTable, CrunchError> {
        if names.len() != self.columns.len() {
            return Err(CrunchError::SchemaMismatch {
                expected: names.len(),
                found: self.columns.len(),
            });
        }
        Ok(ResponseTable {
            columns: names.to_vec(),
            rows: self.rows,
        })
    }

    /// Keeps the rows for which the predicate holds, in their original order.
    pub fn filter_rows<F>(&self, predicate: F) -> ResponseTable
    where
        F: Fn(&[Cell]) -> bool,
    {
        ResponseTable {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| predicate(row.as_slice()))
                .cloned()
                .collect(),
        }
    }
}

/// A question answered through a grid of radio buttons: each sub-question
/// (one column) takes exactly one of the shared options.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RadioGroup {
    pub prompt: String,
    pub columns: Vec<String>,
    pub options: Vec<String>,
}

/// The role of a column in a survey.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QuestionRole {
    YesNo,
    SemicolonList,
    FreeformText,
    MultiRadio,
}

impl Display for QuestionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionRole::YesNo => "yes_no",
            QuestionRole::SemicolonList => "semicolon_lists",
            QuestionRole::FreeformText => "freeform_text",
            QuestionRole::MultiRadio => "multi_radio_questions",
        };
        write!(f, "{}", s)
    }
}

/// The layout of a survey: the ordered list of columns, and the role of each question.
///
/// The schema is validated at construction and cannot be changed afterwards.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveySchema {
    columns: Vec<String>,
    yes_no: Vec<String>,
    semicolon_lists: Vec<String>,
    freeform_text: Vec<String>,
    radio_groups: Vec<RadioGroup>,
    serving_area: Option<String>,
}

impl SurveySchema {
    pub fn new(
        columns: Vec<String>,
        yes_no: Vec<String>,
        semicolon_lists: Vec<String>,
        freeform_text: Vec<String>,
        radio_groups: Vec<RadioGroup>,
    ) -> Result<SurveySchema, CrunchError> {
        let mut known: HashSet<&String> = HashSet::new();
        for c in columns.iter() {
            if !known.insert(c) {
                return Err(CrunchError::DuplicateColumn { name: c.clone() });
            }
        }

        let mut assigned: HashSet<&String> = HashSet::new();
        let radio_columns = radio_groups.iter().flat_map(|g| g.columns.iter());
        let by_role = yes_no
            .iter()
            .map(|c| (QuestionRole::YesNo, c))
            .chain(
                semicolon_lists
                    .iter()
                    .map(|c| (QuestionRole::SemicolonList, c)),
            )
            .chain(freeform_text.iter().map(|c| (QuestionRole::FreeformText, c)))
            .chain(radio_columns.map(|c| (QuestionRole::MultiRadio, c)));
        for (role, name) in by_role {
            if !known.contains(name) {
                return Err(CrunchError::MissingReferencedColumn {
                    role,
                    name: name.clone(),
                });
            }
            if !assigned.insert(name) {
                return Err(CrunchError::OverlappingRoles { name: name.clone() });
            }
        }

        for group in radio_groups.iter() {
            let distinct: HashSet<&String> = group.options.iter().collect();
            if group.options.is_empty() || distinct.len() != group.options.len() {
                return Err(CrunchError::InvalidOptions {
                    prompt: group.prompt.clone(),
                });
            }
        }

        Ok(SurveySchema {
            columns,
            yes_no,
            semicolon_lists,
            freeform_text,
            radio_groups,
            serving_area: None,
        })
    }

    /// Declares the column that holds the places served by the respondent.
    pub fn with_serving_area(self, column: &str) -> Result<SurveySchema, CrunchError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(CrunchError::MissingColumn {
                name: column.to_string(),
            });
        }
        Ok(SurveySchema {
            serving_area: Some(column.to_string()),
            ..self
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn yes_no(&self) -> &[String] {
        &self.yes_no
    }

    pub fn semicolon_lists(&self) -> &[String] {
        &self.semicolon_lists
    }

    pub fn freeform_text(&self) -> &[String] {
        &self.freeform_text
    }

    pub fn radio_groups(&self) -> &[RadioGroup] {
        &self.radio_groups
    }

    pub fn serving_area(&self) -> Option<&str> {
        self.serving_area.as_deref()
    }
}

/// Restricts the responses to the rows whose value in `column` contains `needle`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PlaceFilter {
    pub column: String,
    pub needle: String,
}

impl PlaceFilter {
    /// Stands in for a missing answer when matching.
    pub const NO_RESPONSE: &'static str = "no response provided";

    pub fn new(column: &str, needle: &str) -> PlaceFilter {
        PlaceFilter {
            column: column.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn matches(&self, cell: &Cell) -> bool {
        answered(cell)
            .unwrap_or(PlaceFilter::NO_RESPONSE)
            .contains(self.needle.as_str())
    }
}

// ******** Output data structures *********

/// One field of a summary table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Field {
    Text(String),
    Count(u64),
}

/// The uniform shape consumed by the report writers: a header and rows of
/// fields of the same width.
pub trait SummaryTable {
    fn header(&self) -> Vec<String>;
    fn rows(&self) -> Vec<Vec<Field>>;

    fn num_rows(&self) -> usize {
        self.rows().len()
    }
}

/// The number of occurrences of each distinct answer of a column.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ValueCounts {
    pub entries: Vec<(String, u64)>,
}

impl ValueCounts {
    pub fn get(&self, value: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, c)| *c)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl SummaryTable for ValueCounts {
    fn header(&self) -> Vec<String> {
        vec!["value".to_string(), "count".to_string()]
    }

    fn rows(&self) -> Vec<Vec<Field>> {
        self.entries
            .iter()
            .map(|(v, c)| vec![Field::Text(v.clone()), Field::Count(*c)])
            .collect()
    }
}

/// The number of occurrences of each item of semicolon-delimited answers.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct TokenCounts {
    pub entries: Vec<(String, u64)>,
}

impl TokenCounts {
    pub fn get(&self, token: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, c)| *c)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl SummaryTable for TokenCounts {
    fn header(&self) -> Vec<String> {
        vec!["text value".to_string(), "count".to_string()]
    }

    fn rows(&self) -> Vec<Vec<Field>> {
        self.entries
            .iter()
            .map(|(t, c)| vec![Field::Text(t.clone()), Field::Count(*c)])
            .collect()
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FreeformEntries {
    pub entries: Vec<String>,
}

impl SummaryTable for FreeformEntries {
    fn header(&self) -> Vec<String> {
        vec!["text".to_string()]
    }

    fn rows(&self) -> Vec<Vec<Field>> {
        self.entries
            .iter()
            .map(|s| vec![Field::Text(s.clone())])
            .collect()
    }
}

/// The counts for one sub-question of a radio group.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RadioRow {
    pub question: String,
    /// One count per option, in the order of the options.
    pub counts: Vec<u64>,
    /// Answers that matched none of the options.
    pub dropped: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RadioTable {
    pub options: Vec<String>,
    pub rows: Vec<RadioRow>,
}

impl SummaryTable for RadioTable {
    fn header(&self) -> Vec<String> {
        let mut h = vec!["Option".to_string()];
        h.extend(self.options.iter().cloned());
        h
    }

    fn rows(&self) -> Vec<Vec<Field>> {
        self.rows
            .iter()
            .map(|r| {
                let mut fields = vec![Field::Text(r.question.clone())];
                fields.extend(r.counts.iter().map(|c| Field::Count(*c)));
                fields
            })
            .collect()
    }
}

/// All the summary tables of a survey, keyed by prompt, in the order of the schema.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CrunchedResult {
    pub num_responses: usize,
    pub multi_radio_questions: Vec<(String, RadioTable)>,
    pub yes_no: Vec<(String, ValueCounts)>,
    pub semicolon_lists: Vec<(String, TokenCounts)>,
    pub freeform_text: Vec<(String, FreeformEntries)>,
}

/// Errors that prevent the survey from being summarized.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CrunchError {
    /// The input does not have as many columns as the schema.
    SchemaMismatch { expected: usize, found: usize },
    /// A row does not have as many cells as there are columns.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    MissingColumn { name: String },
    /// The schema assigns a role to a column it does not declare.
    MissingReferencedColumn { role: QuestionRole, name: String },
    DuplicateColumn { name: String },
    /// A column is given more than one role.
    OverlappingRoles { name: String },
    /// A radio group has no options, or the same option twice.
    InvalidOptions { prompt: String },
}

impl Error for CrunchError {}

impl Display for CrunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrunchError::SchemaMismatch { expected, found } => write!(
                f,
                "the schema declares {} columns but the input has {}",
                expected, found
            ),
            CrunchError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {}",
                row, found, expected
            ),
            CrunchError::MissingColumn { name } => write!(f, "missing column {:?}", name),
            CrunchError::MissingReferencedColumn { role, name } => write!(
                f,
                "column {:?} is listed under {} but is not a column of the survey",
                name, role
            ),
            CrunchError::DuplicateColumn { name } => {
                write!(f, "column {:?} is declared twice", name)
            }
            CrunchError::OverlappingRoles { name } => {
                write!(f, "column {:?} is assigned more than one role", name)
            }
            CrunchError::InvalidOptions { prompt } => write!(
                f,
                "the options of {:?} must be non-empty and distinct",
                prompt
            ),
        }
    }
}
