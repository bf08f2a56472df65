//! The "Southeast PA Funding Options" survey, the default survey of the program.

use survey_crunch::{CrunchError, RadioGroup, SurveySchema};

use crate::survey::config_reader::{OutputSettings, SurveyConfig};

pub const REPORT_NAME: &str = "Southeast PA Funding Options";

/// The columns of the export, in order.
pub const COLUMNS: [&str; 29] = [
    "Timestamp",
    "What is your view of the transportation network in southeastern Pennsylvania, including  current condition, coverage and services? (Choose as many as apply)",
    "New or extended rail lines",
    "Highway capacity improvements",
    "New roads or road extensions",
    "Improve maintenance, safety and operations of the highway and transit network",
    "Speed up transit / increase service frequency",
    "More trails and bicycle/pedestrian improvements",
    "List any specific projects or improvements that you feel are critical to the region’s future.",
    "Do you support raising state funds across Pennsylvania to pay for transportation needs?",
    "Toll Major Bridges",
    "Tolls on Managed Lanes",
    "Congestion Pricing",
    "Corridor Tolling",
    "Road User Charge",
    "Fees or Tax increases on other non-transportation items",
    "Do you support raising funds at the city or county level in Southeast Pennsylvania to supplement federal and state funds to pay for local transportation needs?",
    "Earned Income Tax",
    "Local Services Tax",
    "Real Estate Transfer Tax",
    "Vehicle Property Tax",
    "Property Tax",
    "Sales Tax",
    "Uber and Lyft fee",
    "Local Gasoline Tax",
    "Do you have other ideas or suggestions about how the region could fund transportation investments?",
    "Is there anything else you would like to share with us regarding the region's transportation and funding?",
    "Who do you represent?: (check all that apply)",
    "Where do you serve?: (check all that apply)",
];

const IMPROVEMENTS_PROMPT: &str =
    "What kind of improvements, if any, would you like to see to improve the transportation network?";

const PRIORITIES: [&str; 3] = ["Lowest priority", "Medium priority", "Highest priority"];

const SUPPORT: [&str; 3] = ["I oppose this", "I need to learn more", "I support this"];

fn cols(idxs: impl IntoIterator<Item = usize>) -> Vec<String> {
    idxs.into_iter().map(|i| COLUMNS[i].to_string()).collect()
}

fn labels(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

pub fn schema() -> Result<SurveySchema, CrunchError> {
    let radio_groups = vec![
        RadioGroup {
            prompt: IMPROVEMENTS_PROMPT.to_string(),
            columns: cols(2..8),
            options: labels(&PRIORITIES),
        },
        RadioGroup {
            prompt: COLUMNS[9].to_string(),
            columns: cols(10..16),
            options: labels(&SUPPORT),
        },
        RadioGroup {
            prompt: COLUMNS[16].to_string(),
            columns: cols(17..25),
            options: labels(&SUPPORT),
        },
    ];
    SurveySchema::new(
        cols(0..29),
        cols([9, 16]),
        cols([1, 27, 28]),
        cols([8, 25, 26]),
        radio_groups,
    )?
    .with_serving_area(COLUMNS[28])
}

pub fn default_config() -> Result<SurveyConfig, CrunchError> {
    Ok(SurveyConfig {
        output_settings: OutputSettings {
            report_name: REPORT_NAME.to_string(),
            output_directory: None,
        },
        input_settings: None,
        schema: schema()?,
        root_dir: None,
    })
}
