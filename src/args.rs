use clap::Parser;

/// This is a survey summary program. It turns the export of a survey form into summary tables.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file describing the survey in JSON format.
    /// If not provided, the "Southeast PA Funding Options" survey is assumed.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or '-') The export of the survey responses ('-' reads a CSV export from the standard input).
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (text, optional) Only summarize the responses whose serving area contains this text.
    #[clap(short, long, value_parser)]
    pub place: Option<String>,

    /// (column name, optional) The column the --place filter applies to. Defaults to the serving
    /// area column of the survey.
    #[clap(long, value_parser)]
    pub place_column: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Otherwise it is written to a file named after the survey and the current date.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program will
    /// check that the produced summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
