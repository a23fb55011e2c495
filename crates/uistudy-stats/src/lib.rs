//! Statistical tools for the interface user-study analysis.
//!
//! This crate provides the numeric building blocks of the analysis:
//!
//! - **Descriptive statistics**: count, mean, median, sample variance and standard deviation
//! - **Ranking**: average ranks for tied observations and tie-group bookkeeping
//! - **Friedman test**: non-parametric repeated-measures test across three or more conditions
//! - **Wilcoxon signed-rank test**: non-parametric paired test for two conditions
//! - **Multiple comparisons**: Holm-Bonferroni step-down correction
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing samples
//! - [`rank`]: Tie-aware ranking
//! - [`friedman`]: Friedman rank test
//! - [`wilcoxon`]: Wilcoxon signed-rank test
//! - [`multitest`]: Holm-Bonferroni correction
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use uistudy_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Comparing three related conditions
//!
//! ```
//! use uistudy_stats::friedman::FriedmanTest;
//!
//! // one row per subject, one column per condition
//! let blocks = vec![
//!     vec![6.0, 4.0, 2.0],
//!     vec![7.0, 5.0, 3.0],
//!     vec![5.0, 4.0, 1.0],
//!     vec![6.0, 3.0, 2.0],
//! ];
//! let test = FriedmanTest::new(&blocks).unwrap();
//! assert!(test.p_value < 0.05);
//! ```
//!
//! ## Post-hoc pairwise tests with correction
//!
//! ```
//! use uistudy_stats::{multitest::HolmCorrection, wilcoxon::WilcoxonSignedRank};
//!
//! let a = [5.0, 6.0, 4.0, 7.0, 5.0, 6.0];
//! let b = [3.0, 4.0, 2.0, 5.0, 3.0, 4.0];
//! let test = WilcoxonSignedRank::new(&a, &b).unwrap();
//! let holm = HolmCorrection::new(&[test.p_value], 0.05);
//! assert_eq!(holm.adjusted[0], test.p_value);
//! ```

pub mod descriptive;
pub mod friedman;
pub mod multitest;
pub mod rank;
pub mod wilcoxon;
