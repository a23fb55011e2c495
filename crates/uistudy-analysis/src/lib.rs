//! Statistical analysis of a multi-interface user study
//!
//! Every participant rates several interface variants ([`study::Interface`])
//! on four Likert-scale questions ([`study::Question`]) and names the
//! interface they prefer. This crate turns the raw survey records into
//! per-group results that answer whether the interfaces differ and which one
//! participants prefer.
//!
//! # Overview
//!
//! 1. **Flatten** ([`flatten`]): nested [`record::RawRecord`]s become one
//!    [`flatten::NormalizedRow`] per rated interface
//! 2. **Filter** ([`flatten::retain_created_after`]): optional created-after cutoff
//! 3. **Group** ([`group::AnalysisGroup`]): "overall" plus one group per data folder
//! 4. **Analyze** each group ([`group::GroupResult`]):
//!    - [`descriptive`]: mean, sample standard deviation and count per interface and question
//!    - [`omnibus`]: Friedman test per question on complete cases
//!    - [`pairwise`]: Wilcoxon signed-rank tests per interface pair, Holm-corrected
//!    - [`demographics`] and [`preference`]: participant-level tallies
//!    - [`annotation`]: chart bars and non-overlapping significance brackets
//! 5. **Report** ([`report::OverallReport`]): plain-text summary of the overall group
//!
//! [`pipeline::analyze`] runs all of the above.
//!
//! # Missing data
//!
//! Missing scores stay missing. Descriptive statistics use the non-missing
//! values only, the Friedman test uses participants who rated every compared
//! interface, and each pairwise test uses participants who rated both
//! interfaces. Statistics that cannot be computed are reported as `NaN`
//! (serialized as `null`) or left out, never as zero.
//!
//! # Example
//!
//! ```
//! use uistudy_analysis::{config::AnalysisConfig, pipeline, record::RawRecord};
//!
//! let records: Vec<RawRecord> = serde_json::from_str(
//!     r#"[{
//!         "id": "p1",
//!         "participant": { "name": "Lee", "age": "31", "gender": "F" },
//!         "question_scores": {
//!             "C": { "dataFolder": "scene_a", "scores": { "Q1": 6, "Q2": "5" } },
//!             "Y": { "dataFolder": "scene_a", "scores": { "Q1": 4, "Q2": 3 } },
//!             "_pairing_info": { "permutation_index": 0, "permutation_number": 1 }
//!         },
//!         "preferred_interface": "c"
//!     }]"#,
//! )?;
//!
//! let analysis = pipeline::analyze(&records, &AnalysisConfig::default())?;
//! assert_eq!(analysis.overall.num_rows, 2);
//! assert_eq!(analysis.folders[0].label, "data_scene_a");
//! println!("{}", analysis.report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotation;
pub mod config;
pub mod demographics;
pub mod descriptive;
pub mod error;
pub mod exposure;
pub mod flatten;
pub mod group;
pub mod matrix;
pub mod omnibus;
pub mod pairwise;
pub mod pipeline;
pub mod preference;
pub mod record;
pub mod report;
pub mod study;
