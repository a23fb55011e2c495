//! Plain-text report of the overall group.

use std::fmt;

use crate::{
    demographics::{DemographicSummary, Gender},
    exposure::ExposureTable,
    group::GroupResult,
    preference::PreferenceSummary,
    study::Interface,
};

/// Who took part, what they saw and what they preferred.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallReport {
    pub demographics: DemographicSummary,
    pub exposure: ExposureTable,
    pub preference: PreferenceSummary,
}

impl OverallReport {
    #[must_use]
    pub fn new(overall: &GroupResult) -> Self {
        Self {
            demographics: overall.demographics.clone(),
            exposure: ExposureTable::from_rows(&overall.rows),
            preference: overall.preference.clone(),
        }
    }
}

impl fmt::Display for OverallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let demographics = &self.demographics;
        writeln!(f, "=== Participants ===")?;
        writeln!(f, "Total: {}", demographics.participants)?;
        writeln!(f)?;

        let age = &demographics.age;
        writeln!(f, "Age (valid: {}, missing: {})", age.valid, age.missing)?;
        match (age.mean, age.min, age.max) {
            (Some(mean), Some(min), Some(max)) => {
                write!(f, "  mean: {mean:.2}")?;
                if let Some(std_dev) = age.std_dev {
                    write!(f, ", sd: {std_dev:.2}")?;
                }
                writeln!(f, ", range: {min}-{max}")?;
            }
            _ => writeln!(f, "  no numeric ages")?,
        }
        writeln!(f)?;

        writeln!(f, "Gender")?;
        for gender in Gender::ALL {
            let count = demographics.gender.get(&gender).copied().unwrap_or(0);
            writeln!(f, "  {:<8} {count:>4}", gender.to_string())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Interface exposure (rows) ===")?;
        let exposure = &self.exposure;
        let width = exposure
            .folders
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(5);
        write!(f, "{:<9}", "Interface")?;
        for folder in &exposure.folders {
            write!(f, " {folder:>width$}")?;
        }
        writeln!(f, " {:>width$}", "Total")?;
        for interface in Interface::ALL {
            write!(f, "{:<9}", interface.code())?;
            for folder in &exposure.folders {
                write!(f, " {:>width$}", exposure.get(interface, folder))?;
            }
            writeln!(f, " {:>width$}", exposure.interface_total(interface))?;
        }
        writeln!(f)?;

        writeln!(f, "=== Preferred interface ===")?;
        let preference = &self.preference;
        for (interface, count) in &preference.counts {
            writeln!(
                f,
                "  {:<8} {count:>4} ({:5.1}%)",
                interface.code(),
                preference.rate(*count)
            )?;
        }
        writeln!(
            f,
            "  {:<8} {:>4} ({:5.1}%)",
            "other",
            preference.other,
            preference.rate(preference.other)
        )?;
        for (code, count) in &preference.other_codes {
            writeln!(f, "    {code}: {count}")?;
        }
        writeln!(
            f,
            "  {:<8} {:>4} ({:5.1}%)",
            "missing",
            preference.missing,
            preference.rate(preference.missing)
        )?;
        Ok(())
    }
}
