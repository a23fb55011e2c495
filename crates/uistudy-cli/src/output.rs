//! Files written for each analysis group.
//!
//! ```text
//! <output-dir>/<label>/<label>_descriptive.csv
//! <output-dir>/<label>/<label>_stats.json
//! <output-dir>/<label>/<label>_chart.json
//! <output-dir>/<label>/<label>_raw_long.csv
//! <output-dir>/overall/overall_report.txt
//! <output-dir>/overall/summary.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;
use uistudy_analysis::{
    flatten::NormalizedRow,
    group::{GroupResult, OVERALL_LABEL},
    pipeline::StudyAnalysis,
    study::Question,
};

use crate::util::Output;

/// Writes the files of every group and the overall report.
pub fn write_analysis(output_dir: &Path, analysis: &StudyAnalysis) -> anyhow::Result<()> {
    for group in analysis.groups() {
        let dir = write_group(output_dir, group)?;
        info!(label = %group.label, dir = %dir.display(), "Saved group results");
    }

    let overall_dir = output_dir.join(OVERALL_LABEL);
    Output::open(overall_dir.join("overall_report.txt"))?
        .write_text(&analysis.report.to_string())?;
    Output::open(overall_dir.join("summary.json"))?
        .write_json(analysis.groups().collect::<Vec<_>>())?;
    Ok(())
}

/// Writes the files of one group into `<output_dir>/<label>/` and returns that directory.
pub fn write_group(output_dir: &Path, group: &GroupResult) -> anyhow::Result<PathBuf> {
    let label = &group.label;
    let dir = output_dir.join(label);

    let mut output = Output::open(dir.join(format!("{label}_descriptive.csv")))?;
    write_descriptive_csv(&mut output, group)?;

    Output::open(dir.join(format!("{label}_stats.json")))?.write_json(group.stats_report())?;
    Output::open(dir.join(format!("{label}_chart.json")))?.write_json(&group.chart)?;

    let mut output = Output::open(dir.join(format!("{label}_raw_long.csv")))?;
    write_rows_csv(&mut output, &group.rows)?;

    Ok(dir)
}

fn write_descriptive_csv(output: &mut Output, group: &GroupResult) -> anyhow::Result<()> {
    let path = output.display_path();
    let mut writer = csv::Writer::from_writer(&mut *output);
    writer
        .write_record(["interface", "question", "mean", "std", "count"])
        .with_context(|| format!("Failed to write to {path}"))?;
    for stat in &group.descriptive.entries {
        writer
            .write_record([
                stat.interface.to_string(),
                stat.question.to_string(),
                float_field(Some(stat.mean)),
                float_field(Some(stat.std_dev)),
                stat.count.to_string(),
            ])
            .with_context(|| format!("Failed to write to {path}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write to {path}"))?;
    drop(writer);
    output.finish()
}

const ROW_COLUMNS: &[&str] = &[
    "participant_id",
    "name",
    "age",
    "gender",
    "interface",
    "data_folder",
    "html_file",
    "Q1",
    "Q2",
    "Q3",
    "Q4",
    "preferred_interface",
    "preferred_reason",
    "created_at",
    "pairing_index",
    "pairing_number",
];

fn write_rows_csv(output: &mut Output, rows: &[NormalizedRow]) -> anyhow::Result<()> {
    let path = output.display_path();
    let mut writer = csv::Writer::from_writer(&mut *output);
    writer
        .write_record(ROW_COLUMNS)
        .with_context(|| format!("Failed to write to {path}"))?;
    for row in rows {
        let mut fields = vec![
            row.participant_id.clone(),
            text_field(row.name.as_deref()),
            text_field(row.age.as_deref()),
            text_field(row.gender.as_deref()),
            row.interface.code().to_owned(),
            text_field(row.data_folder.as_deref()),
            text_field(row.html_file.as_deref()),
        ];
        fields.extend(
            Question::ALL
                .into_iter()
                .map(|question| float_field(row.score(question))),
        );
        fields.extend([
            text_field(row.preferred_interface.as_deref()),
            text_field(row.preferred_reason.as_deref()),
            row.created_at
                .map(|created| created.to_rfc3339())
                .unwrap_or_default(),
            int_field(row.pairing_index),
            int_field(row.pairing_number),
        ]);
        writer
            .write_record(&fields)
            .with_context(|| format!("Failed to write to {path}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write to {path}"))?;
    drop(writer);
    output.finish()
}

/// Empty for missing or undefined values.
fn float_field(value: Option<f64>) -> String {
    value
        .filter(|value| !value.is_nan())
        .map(|value| value.to_string())
        .unwrap_or_default()
}

fn text_field(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn int_field(value: Option<i64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
