/*!

This is the long-form manual for `survey_crunch` and the `survey` program.

## Question types

Every column of a survey export is either ignored (for example the timestamp) or
assigned exactly one of the following roles.

### `yesNo`

Questions answered with one of a small set of values, usually `Yes` and `No`.
The summary counts the number of times each distinct answer was given. Nothing
forces the answers to be exactly two.

| value | count |
|-------|-------|
| Yes   | 31    |
| No    | 7     |

### `semicolonLists`

Multi-select questions ("check all that apply"). Google Forms writes the selected
items in a single cell, joined by `;`:

```text
Timestamp,Where do you serve?
2022/11/01 10:00:00,Philadelphia;Bucks County
2022/11/01 10:05:00,Philadelphia
```

Each item is counted separately. Items are compared exactly: `Bucks County` and
`bucks county` are two different items, and spaces around an item are kept.
A trailing `;` produces an empty item, which is counted as such.

The items are listed by decreasing count. When two items have the same count, the
one that appeared last in the file comes first. This is the order of the reports
produced by earlier versions of the tool.

### `freeformText`

Open questions. The summary is the list of the answers, in the order of the file,
without the unanswered ones.

### `radioQuestions`

A prompt made of several sub-questions that share the same options, for example a
grid of priorities:

|                      | Lowest priority | Medium priority | Highest priority |
|----------------------|-----------------|-----------------|------------------|
| New rail lines       |                 | x               |                  |
| Highway improvements | x               |                 |                  |

Each sub-question is a column of the export. The summary has one row per
sub-question and one count per option. An option that nobody selected gets a count
of `0`.

An answer that is not exactly one of the options (for example after the form was
edited) is not counted. The number of such answers is reported for each
sub-question under `dropped`, and a warning is logged.

## Missing answers

An empty cell is an unanswered question. It is never counted and never listed.

## Place filter

The summary can be restricted to the respondents that serve a given place, with the
`--place` flag. A response is kept if its answer to the serving area question
contains the given text (case-sensitive). An unanswered serving area question is
read as `no response provided` before the comparison.

## Configuration

The `survey` program comes with the schema of the "Southeast PA Funding Options"
survey built in. Other surveys are described with a configuration file in JSON:

```json
{
  "outputSettings": { "reportName": "Trail survey", "outputDirectory": "reports" },
  "inputSettings": { "provider": "csv", "filePath": "responses.csv" },
  "columns": ["Timestamp", "Do you bike?", "Weekdays", "Weekends", "Comments", "Where?"],
  "yesNo": ["Do you bike?"],
  "semicolonLists": [5],
  "freeformText": ["Comments"],
  "radioQuestions": [
    {
      "prompt": "How often do you ride?",
      "columns": ["2..4"],
      "options": ["Never", "Sometimes", "Often"]
    }
  ],
  "servingAreaColumn": "Where?"
}
```

- `columns` (array of strings, mandatory): the name of every column of the export,
  in order. The header of the export itself is not used: the columns are assigned by
  position, and the export must have exactly this number of columns.
- `yesNo`, `semicolonLists`, `freeformText` (arrays, optional): the columns having
  this role. A column is referred to by its name, by its index in `columns` (starting
  at 0, as a number or a string), or by a range of indexes `"start..end"` (end
  excluded).
- `radioQuestions` (array, optional): the prompt, the sub-question columns (same
  notation as above) and the options, in the order in which they should appear.
- `servingAreaColumn` (string, optional): the column used by the place filter.
- `outputSettings.reportName` (string, mandatory): the prefix of the output file name.
  The name of the output file is the prefix followed by the date, and by the place
  when a place filter is used.
- `outputSettings.outputDirectory` (string, optional): where to write the output file.
- `inputSettings` (optional): the file to read (`filePath`, relative to the
  configuration file), its type (`provider`: `csv` or `xlsx`) and, for Excel files, the
  worksheet (`excelWorksheetName`).

Command line flags take precedence over the configuration file.

 */
