/*!

# Quick start with Google Forms

This example goes through a complete run, from a form to the summary tables.

**Collecting the responses** Create the survey in Google Forms. The question types map to
the summaries of this crate:

- *Multiple choice* questions with two answers (`Yes`, `No`) are summarized as `yesNo`.
- *Checkboxes* questions are exported as items joined by `;` and summarized as `semicolonLists`.
- *Paragraph* or *Short answer* questions are collected as `freeformText`.
- *Multiple choice grid* questions are exported as one column per row of the grid and summarized
  as `radioQuestions`. The columns of the grid are the options.

After the survey is closed, open the `Responses` tab and download the responses as a CSV file
(or as an Excel file, in which case use `--input-type xlsx`).

**Running the summary** For the built-in "Southeast PA Funding Options" survey:

```bash
survey -i 'Funding options (Responses).csv'
```

The summary is written to a file named after the survey and the current date, for example
`Southeast PA Funding Options 2022-11-14.json`. It contains one table per question and
the description of the spreadsheet tabs (`charts`, `yes_no`, `radio`, `semicolon`,
`freeform_text`, `raw_data`) and of the charts to draw from them.

To only summarize the respondents serving Philadelphia:

```bash
survey -i 'Funding options (Responses).csv' --place Philadelphia
```

The output file is then named `Southeast PA Funding Options 2022-11-14 - Philadelphia.json`.

**Other surveys** Describe the columns of your survey in a configuration file (see the
[configuration section](../manual/index.html#configuration)) and pass it with `--config`:

```bash
survey -c trail_survey.json
```

**Using the library** The same summaries are available from Rust:

```
use survey_crunch::{count_semicolon_list, Cell};

let answers: Vec<Cell> = vec![
    Some("Philadelphia;Bucks County".to_string()),
    None,
    Some("Philadelphia".to_string()),
];
let counts = count_semicolon_list(&answers);
assert_eq!(counts.get("Philadelphia"), Some(2));
assert_eq!(counts.get("Bucks County"), Some(1));
```

*/
