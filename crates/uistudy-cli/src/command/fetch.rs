use std::path::PathBuf;

use crate::{remote::RemoteArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct FetchArg {
    #[command(flatten)]
    remote: RemoteArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FetchArg) -> anyhow::Result<()> {
    let rows: Vec<serde_json::Value> = arg.remote.fetch_rows()?;
    Output::save_json(&rows, arg.output.clone())
}
