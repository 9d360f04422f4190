use std::path::PathBuf;

use clap::Parser;
use metrics_app::OutputMode;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Convert GitHub Copilot user metrics exports into CSV tables and an HTML report",
    long_about = None
)]
pub struct CliArgs {
    /// Export to convert (JSON array or JSON Lines)
    pub input: PathBuf,

    /// What to write: html, all, user_summary, by_ide, by_feature,
    /// by_language_feature, by_language_model, by_model_feature,
    /// code_completion_summary, chat_loc_summary or feature_split_summary
    /// [default: user_summary]
    #[arg(short = 't', long = "type", value_name = "MODE")]
    pub mode: Option<OutputMode>,

    /// Directory for the outputs [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML file with defaults for the options above and a [report] table
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_mode_and_output_dir() {
        let args = CliArgs::try_parse_from([
            "copilot-metrics",
            "metrics.json",
            "-t",
            "by_language_model",
            "--output-dir",
            "out",
        ])
        .expect("args");
        assert_eq!(args.input, PathBuf::from("metrics.json"));
        assert_eq!(args.mode, Some(OutputMode::ByLanguageModel));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(!args.verbose);
    }

    #[test]
    fn rejects_unknown_mode() {
        let result = CliArgs::try_parse_from(["copilot-metrics", "metrics.json", "--type", "xlsx"]);
        assert!(result.is_err());
    }
}
