/*!
Aggregation of survey responses into summary tables.

A survey export is a table with one row per respondent and one column per question.
Each question is answered in one of four shapes, declared by a [SurveySchema]:

- yes/no questions (or any small set of fixed answers), summarized with [count_values]
- multi-select questions, whose answers are joined with `;`, summarized with [count_semicolon_list]
- freeform text, collected with [freeform_entries]
- radio grids, where each sub-question takes one of a shared list of options,
  summarized with [count_radio_group]

[crunch] runs all of them against a schema and collects the results in a [CrunchedResult].

See the [quick start](quick_start/index.html) and the [manual](manual/index.html).
*/

pub mod builder;
mod config;
pub mod manual;
pub mod quick_start;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;

/// Counts the occurrences of each distinct answer.
///
/// Missing answers are ignored. The entries are ordered by decreasing count, and
/// by order of first appearance for equal counts.
pub fn count_values<'a, I>(cells: I) -> ValueCounts
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut entries: Vec<(String, u64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for s in cells.into_iter().filter_map(answered) {
        match positions.get(s) {
            Some(idx) => entries[*idx].1 += 1,
            None => {
                positions.insert(s.to_string(), entries.len());
                entries.push((s.to_string(), 1));
            }
        }
    }
    // Stable sort: ties keep their order of appearance.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    ValueCounts { entries }
}

/// Counts the occurrences of each item in answers of the form `item1;item2;...`.
///
/// Items are compared exactly (case-sensitive, no trimming). An empty item, such as the
/// one produced by a trailing `;`, is counted as the empty string.
///
/// The entries are ordered by decreasing count. Items with the same count appear in the
/// reverse order of their first appearance.
pub fn count_semicolon_list<'a, I>(cells: I) -> TokenCounts
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut entries: Vec<(String, u64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for s in cells.into_iter().filter_map(answered) {
        for item in s.split(';') {
            match positions.get(item) {
                Some(idx) => entries[*idx].1 += 1,
                None => {
                    positions.insert(item.to_string(), entries.len());
                    entries.push((item.to_string(), 1));
                }
            }
        }
    }
    entries.sort_by_key(|(_, count)| *count);
    entries.reverse();
    TokenCounts { entries }
}

/// Keeps the non-empty answers, in their original order.
pub fn freeform_entries<'a, I>(cells: I) -> FreeformEntries
where
    I: IntoIterator<Item = &'a Cell>,
{
    FreeformEntries {
        entries: cells
            .into_iter()
            .filter_map(answered)
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Summarizes a radio grid: one row per sub-question column, one count per option.
///
/// Options never selected for a sub-question get a count of zero. Answers that are not
/// one of the options are not counted; they are reported in [RadioRow::dropped].
pub fn count_radio_group(
    table: &ResponseTable,
    columns: &[String],
    options: &[String],
) -> Result<RadioTable, CrunchError> {
    let mut rows: Vec<RadioRow> = Vec::new();
    for col in columns {
        let value_counts = count_values(table.column(col)?);
        debug!("count_radio_group: {:?}: {:?}", col, value_counts);

        let counts: Vec<u64> = options
            .iter()
            .map(|opt| value_counts.get(opt).unwrap_or(0))
            .collect();
        let dropped = value_counts
            .total()
            .saturating_sub(counts.iter().sum::<u64>());
        if dropped > 0 {
            let unknown: Vec<&String> = value_counts
                .entries
                .iter()
                .map(|(v, _)| v)
                .filter(|v| !options.contains(*v))
                .collect();
            warn!(
                "count_radio_group: {:?}: {} answers matched no option: {:?}",
                col, dropped, unknown
            );
        }
        rows.push(RadioRow {
            question: col.clone(),
            counts,
            dropped,
        });
    }
    Ok(RadioTable {
        options: options.to_vec(),
        rows,
    })
}

/// Summarizes all the questions of a survey.
///
/// Arguments:
/// * `table` the raw responses. Its column names are replaced, by position, with the
/// columns of the schema. The number of columns must match the schema.
/// * `schema` the role of each question
/// * `place_filter` if provided, only the rows matching the filter are summarized
pub fn crunch(
    table: &ResponseTable,
    schema: &SurveySchema,
    place_filter: Option<&PlaceFilter>,
) -> Result<CrunchedResult, CrunchError> {
    info!(
        "crunch: processing {} responses with {} columns",
        table.num_rows(),
        table.columns().len()
    );
    let relabeled = table.clone().relabel(schema.columns())?;

    let responses = match place_filter {
        Some(pf) => {
            let idx = relabeled
                .columns()
                .iter()
                .position(|c| *c == pf.column)
                .ok_or_else(|| CrunchError::MissingColumn {
                    name: pf.column.clone(),
                })?;
            let filtered = relabeled.filter_rows(|row| pf.matches(&row[idx]));
            info!(
                "crunch: place filter {:?}: kept {} of {} responses",
                pf.needle,
                filtered.num_rows(),
                table.num_rows()
            );
            filtered
        }
        None => relabeled,
    };

    let mut res = CrunchedResult {
        num_responses: responses.num_rows(),
        ..CrunchedResult::default()
    };

    for col in schema.yes_no() {
        res.yes_no
            .push((col.clone(), count_values(responses.column(col)?)));
    }

    for col in schema.semicolon_lists() {
        res.semicolon_lists
            .push((col.clone(), count_semicolon_list(responses.column(col)?)));
    }

    for col in schema.freeform_text() {
        res.freeform_text
            .push((col.clone(), freeform_entries(responses.column(col)?)));
    }

    for group in schema.radio_groups() {
        let rt = count_radio_group(&responses, &group.columns, &group.options)?;
        res.multi_radio_questions.push((group.prompt.clone(), rt));
    }

    debug!("crunch: result: {:?}", res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cells(xs: &[Option<&str>]) -> Vec<Cell> {
        xs.iter().map(|x| x.map(|s| s.to_string())).collect()
    }

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    fn entries(xs: &[(&str, u64)]) -> Vec<(String, u64)> {
        xs.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn count_values_sums_to_answered() {
        init();
        let data = cells(&[Some("Yes"), None, Some("No"), Some("Yes"), Some(""), Some("Maybe")]);
        let vc = count_values(&data);
        assert_eq!(vc.total(), 4);
        assert_eq!(vc.entries, entries(&[("Yes", 2), ("No", 1), ("Maybe", 1)]));
    }

    #[test]
    fn count_values_empty() {
        let data = cells(&[None, None]);
        assert!(count_values(&data).entries.is_empty());
        assert!(count_values(&Vec::<Cell>::new()).entries.is_empty());
    }

    #[test]
    fn semicolon_counts() {
        init();
        let data = cells(&[Some("a;b"), Some("a"), None, Some("b;c")]);
        let tc = count_semicolon_list(&data);
        assert_eq!(tc.get("a"), Some(2));
        assert_eq!(tc.get("b"), Some(2));
        assert_eq!(tc.get("c"), Some(1));
        assert_eq!(tc.total(), 5);
        // Equal counts come out in reverse order of first appearance.
        assert_eq!(tc.entries, entries(&[("b", 2), ("a", 2), ("c", 1)]));
    }

    #[test]
    fn semicolon_sorted_by_decreasing_count() {
        let data = cells(&[Some("x;y;z"), Some("z;y"), Some("z")]);
        let tc = count_semicolon_list(&data);
        assert_eq!(tc.entries, entries(&[("z", 3), ("y", 2), ("x", 1)]));
    }

    #[test]
    fn semicolon_keeps_empty_items() {
        let data = cells(&[Some("a;"), Some(";")]);
        let tc = count_semicolon_list(&data);
        assert_eq!(tc.get(""), Some(3));
        assert_eq!(tc.get("a"), Some(1));
    }

    #[test]
    fn semicolon_is_exact() {
        let data = cells(&[Some("Bus; bus;Bus")]);
        let tc = count_semicolon_list(&data);
        assert_eq!(tc.get("Bus"), Some(2));
        assert_eq!(tc.get(" bus"), Some(1));
        assert_eq!(tc.get("bus"), None);
    }

    #[test]
    fn freeform_drops_missing_and_empty() {
        let data = cells(&[Some("hello"), None, Some(""), Some("world"), Some(" hello ")]);
        let ff = freeform_entries(&data);
        assert_eq!(ff.entries, names(&["hello", "world", " hello "]));
    }

    fn radio_table() -> ResponseTable {
        let rows = vec![
            cells(&[Some("Low"), Some("High")]),
            cells(&[Some("Low"), Some("High")]),
            cells(&[Some("High"), None]),
        ];
        ResponseTable::new(names(&["Q1", "Q2"]), rows).unwrap()
    }

    #[test]
    fn radio_zero_fill() {
        init();
        let rt = count_radio_group(&radio_table(), &names(&["Q1", "Q2"]), &names(&["Low", "High"]))
            .unwrap();
        assert_eq!(rt.header(), names(&["Option", "Low", "High"]));
        assert_eq!(
            rt.rows(),
            vec![
                vec![
                    Field::Text("Q1".to_string()),
                    Field::Count(2),
                    Field::Count(1)
                ],
                vec![
                    Field::Text("Q2".to_string()),
                    Field::Count(0),
                    Field::Count(2)
                ],
            ]
        );
        assert!(rt.rows.iter().all(|r| r.dropped == 0));
    }

    #[test]
    fn radio_follows_declared_order() {
        let rt = count_radio_group(&radio_table(), &names(&["Q2", "Q1"]), &names(&["High", "Low"]))
            .unwrap();
        assert_eq!(rt.rows[0].question, "Q2");
        assert_eq!(rt.rows[0].counts, vec![2, 0]);
        assert_eq!(rt.rows[1].counts, vec![1, 2]);
    }

    #[test]
    fn radio_unmatched_answers_are_dropped() {
        init();
        let rows = vec![
            cells(&[Some("Low")]),
            cells(&[Some("low")]),
            cells(&[Some("Unsure")]),
        ];
        let table = ResponseTable::new(names(&["Q1"]), rows).unwrap();
        let rt = count_radio_group(&table, &names(&["Q1"]), &names(&["Low", "High"])).unwrap();
        assert_eq!(rt.rows[0].counts, vec![1, 0]);
        assert_eq!(rt.rows[0].dropped, 2);
    }

    #[test]
    fn radio_missing_column() {
        let res = count_radio_group(&radio_table(), &names(&["Q3"]), &names(&["Low"]));
        assert_eq!(
            res,
            Err(CrunchError::MissingColumn {
                name: "Q3".to_string()
            })
        );
    }

    fn schema() -> SurveySchema {
        SurveySchema::new(
            names(&["When", "Support?", "Q1", "Q2", "Modes", "Comments", "Where"]),
            names(&["Support?"]),
            names(&["Modes", "Where"]),
            names(&["Comments"]),
            vec![RadioGroup {
                prompt: "Priorities".to_string(),
                columns: names(&["Q1", "Q2"]),
                options: names(&["Low", "High"]),
            }],
        )
        .unwrap()
        .with_serving_area("Where")
        .unwrap()
    }

    fn responses() -> ResponseTable {
        // The header of the export is not the one of the schema.
        let header = names(&["a", "b", "c", "d", "e", "f", "g"]);
        let rows = vec![
            cells(&[
                Some("t1"),
                Some("Yes"),
                Some("Low"),
                Some("High"),
                Some("Bus;Train"),
                Some("More trains"),
                Some("Philadelphia;Bucks County"),
            ]),
            cells(&[
                Some("t2"),
                Some("No"),
                Some("Low"),
                Some("High"),
                Some("Train"),
                None,
                None,
            ]),
            cells(&[
                Some("t3"),
                Some("Yes"),
                Some("High"),
                None,
                None,
                Some("Fix the roads"),
                Some("Chester County"),
            ]),
        ];
        ResponseTable::new(header, rows).unwrap()
    }

    #[test]
    fn crunch_all_roles() {
        init();
        let res = crunch(&responses(), &schema(), None).unwrap();
        assert_eq!(res.num_responses, 3);

        assert_eq!(res.yes_no.len(), 1);
        assert_eq!(res.yes_no[0].0, "Support?");
        assert_eq!(res.yes_no[0].1.entries, entries(&[("Yes", 2), ("No", 1)]));

        let lists: Vec<&String> = res.semicolon_lists.iter().map(|(p, _)| p).collect();
        assert_eq!(lists, vec!["Modes", "Where"]);
        assert_eq!(
            res.semicolon_lists[0].1.entries,
            entries(&[("Train", 2), ("Bus", 1)])
        );

        assert_eq!(
            res.freeform_text[0].1.entries,
            names(&["More trains", "Fix the roads"])
        );

        let (prompt, rt) = &res.multi_radio_questions[0];
        assert_eq!(prompt, "Priorities");
        assert_eq!(rt.rows[0].counts, vec![2, 1]);
        assert_eq!(rt.rows[1].counts, vec![0, 2]);
    }

    #[test]
    fn crunch_is_idempotent() {
        let s = schema();
        let t = responses();
        assert_eq!(crunch(&t, &s, None), crunch(&t, &s, None));
    }

    #[test]
    fn crunch_with_place_filter() {
        init();
        let pf = PlaceFilter::new("Where", "Philadelphia");
        let res = crunch(&responses(), &schema(), Some(&pf)).unwrap();
        assert_eq!(res.num_responses, 1);
        assert_eq!(res.yes_no[0].1.entries, entries(&[("Yes", 1)]));
    }

    #[test]
    fn place_filter_missing_answers() {
        let pf = PlaceFilter::new("Where", "County");
        let res = crunch(&responses(), &schema(), Some(&pf)).unwrap();
        assert_eq!(res.num_responses, 2);

        // The empty filter matches everything, including missing answers.
        let pf = PlaceFilter::new("Where", "");
        let res = crunch(&responses(), &schema(), Some(&pf)).unwrap();
        assert_eq!(res.num_responses, 3);

        assert!(PlaceFilter::new("Where", "response").matches(&None));
        assert!(!PlaceFilter::new("Where", "Philadelphia").matches(&Some(String::new())));
    }

    #[test]
    fn place_filter_unknown_column() {
        let pf = PlaceFilter::new("Nowhere", "x");
        assert_eq!(
            crunch(&responses(), &schema(), Some(&pf)),
            Err(CrunchError::MissingColumn {
                name: "Nowhere".to_string()
            })
        );
    }

    #[test]
    fn crunch_rejects_wrong_width() {
        let header = names(&["a", "b", "c", "d", "e", "f"]);
        let table = ResponseTable::new(header, vec![]).unwrap();
        assert_eq!(
            crunch(&table, &schema(), None),
            Err(CrunchError::SchemaMismatch {
                expected: 7,
                found: 6
            })
        );
    }

    #[test]
    fn crunch_empty_input() {
        let header = names(&["a", "b", "c", "d", "e", "f", "g"]);
        let table = ResponseTable::new(header, vec![]).unwrap();
        let res = crunch(&table, &schema(), None).unwrap();
        assert_eq!(res.num_responses, 0);
        assert!(res.yes_no[0].1.entries.is_empty());
        assert!(res.semicolon_lists[0].1.entries.is_empty());
        assert!(res.freeform_text[0].1.entries.is_empty());
        assert_eq!(res.multi_radio_questions[0].1.rows[1].counts, vec![0, 0]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = ResponseTable::new(names(&["a", "b"]), vec![cells(&[Some("x")])]);
        assert_eq!(
            res,
            Err(CrunchError::RaggedRow {
                row: 0,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn schema_validation() {
        let cols = names(&["A", "B", "C"]);
        let res = SurveySchema::new(cols.clone(), names(&["D"]), vec![], vec![], vec![]);
        assert_eq!(
            res,
            Err(CrunchError::MissingReferencedColumn {
                role: QuestionRole::YesNo,
                name: "D".to_string()
            })
        );

        let res = SurveySchema::new(cols.clone(), names(&["A"]), names(&["A"]), vec![], vec![]);
        assert_eq!(
            res,
            Err(CrunchError::OverlappingRoles {
                name: "A".to_string()
            })
        );

        let res = SurveySchema::new(names(&["A", "A"]), vec![], vec![], vec![], vec![]);
        assert_eq!(
            res,
            Err(CrunchError::DuplicateColumn {
                name: "A".to_string()
            })
        );

        let group = RadioGroup {
            prompt: "P".to_string(),
            columns: names(&["B", "C"]),
            options: names(&["x", "x"]),
        };
        let res = SurveySchema::new(cols, vec![], vec![], vec![], vec![group]);
        assert_eq!(
            res,
            Err(CrunchError::InvalidOptions {
                prompt: "P".to_string()
            })
        );
    }
}
