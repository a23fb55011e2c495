use clap::{Parser, Subcommand};

use self::{analyze::AnalyzeArg, fetch::FetchArg};

mod analyze;
mod fetch;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze survey responses and write per-group results
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Download raw survey responses as JSON
    Fetch(#[clap(flatten)] FetchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Fetch(arg) => fetch::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_args() {
        let args = CommandArgs::try_parse_from([
            "uistudy",
            "analyze",
            "--input",
            "responses.json",
            "--created-after",
            "2025-11-26T00:00:00+09:00",
            "--alpha",
            "0.01",
        ])
        .unwrap();
        let Mode::Analyze(arg) = args.mode else {
            panic!("expected analyze mode");
        };
        let config = arg.config();
        assert!((config.alpha - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.min_paired_observations, 5);
        assert_eq!(
            config.created_after.map(|cutoff| cutoff.to_rfc3339()),
            Some("2025-11-25T15:00:00+00:00".to_owned())
        );

        assert!(
            CommandArgs::try_parse_from(["uistudy", "analyze", "--created-after", "soon"]).is_err()
        );
    }
}
