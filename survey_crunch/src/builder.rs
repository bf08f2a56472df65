pub use crate::config::*;

/// A builder for adding responses one row at a time.
///
/// ```
/// pub use survey_crunch::builder::Builder;
/// pub use survey_crunch::{RadioGroup, SurveySchema};
/// # use survey_crunch::CrunchError;
///
/// let columns = vec!["Timestamp".to_string(), "Bus".to_string(), "Train".to_string()];
/// let schema = SurveySchema::new(
///     columns,
///     vec![],
///     vec![],
///     vec![],
///     vec![RadioGroup {
///         prompt: "How much do you use it?".to_string(),
///         columns: vec!["Bus".to_string(), "Train".to_string()],
///         options: vec!["Never".to_string(), "Daily".to_string()],
///     }],
/// )?;
///
/// let mut builder = Builder::new(&schema);
/// builder.add_response_simple(&["2022-11-01", "Daily", "Never"])?;
/// builder.add_response_simple(&["2022-11-02", "Daily", ""])?;
///
/// let result = builder.crunch(None)?;
/// let (_, table) = &result.multi_radio_questions[0];
/// assert_eq!(table.rows[0].counts, vec![0, 2]);
/// assert_eq!(table.rows[1].counts, vec![1, 0]);
///
/// # Ok::<(), CrunchError>(())
/// ```
pub struct Builder {
    pub(crate) _schema: SurveySchema,
    pub(crate) _rows: Vec<Vec<Cell>>,
}

impl Builder {
    pub fn new(schema: &SurveySchema) -> Builder {
        Builder {
            _schema: schema.clone(),
            _rows: Vec::new(),
        }
    }

    /// Adds a response in which every question has a textual answer.
    ///
    /// Empty strings stand for unanswered questions.
    pub fn add_response_simple(&mut self, answers: &[&str]) -> Result<(), CrunchError> {
        let cells: Vec<Cell> = answers
            .iter()
            .map(|s| match s {
                s if s.is_empty() => None,
                s => Some(s.to_string()),
            })
            .collect();
        self.add_response(cells)
    }

    /// Adds a response. There must be one cell per column of the schema.
    pub fn add_response(&mut self, cells: Vec<Cell>) -> Result<(), CrunchError> {
        let expected = self._schema.columns().len();
        if cells.len() != expected {
            return Err(CrunchError::RaggedRow {
                row: self._rows.len(),
                expected,
                found: cells.len(),
            });
        }
        self._rows.push(cells);
        Ok(())
    }

    pub fn num_responses(&self) -> usize {
        self._rows.len()
    }

    /// The responses added so far, labelled with the columns of the schema.
    pub fn table(&self) -> Result<ResponseTable, CrunchError> {
        ResponseTable::new(self._schema.columns().to_vec(), self._rows.clone())
    }

    pub fn crunch(&self, place_filter: Option<&PlaceFilter>) -> Result<CrunchedResult, CrunchError> {
        crate::crunch(&self.table()?, &self._schema, place_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SurveySchema {
        SurveySchema::new(
            vec!["Support?".to_string(), "Where".to_string()],
            vec!["Support?".to_string()],
            vec!["Where".to_string()],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn rejects_short_rows() {
        let mut b = Builder::new(&schema());
        b.add_response_simple(&["Yes", "Philadelphia"]).unwrap();
        assert_eq!(
            b.add_response_simple(&["No"]),
            Err(CrunchError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(b.num_responses(), 1);
    }

    #[test]
    fn empty_strings_are_unanswered() {
        let mut b = Builder::new(&schema());
        b.add_response_simple(&["", "Philadelphia"]).unwrap();
        b.add_response_simple(&["Yes", ""]).unwrap();
        let table = b.table().unwrap();
        assert_eq!(table.rows()[0][0], None);

        let pf = PlaceFilter::new("Where", "Philadelphia");
        let res = b.crunch(Some(&pf)).unwrap();
        assert_eq!(res.num_responses, 1);
        assert!(res.yes_no[0].1.entries.is_empty());
    }
}
