// ---------------------------------------------------------------------------
// Record – one student row
// ---------------------------------------------------------------------------

/// One student's habits and performance, fully populated after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub student_id: String,
    pub study_hours_per_day: f64,
    pub sleep_hours: f64,
    /// Ordinal 1–10 self-rating, kept numeric for plotting.
    pub mental_health_rating: f64,
    pub exam_score: f64,
    pub gender: String,
    pub diet_quality: String,
    pub internet_quality: String,
    /// "Yes" / "No".
    pub part_time_job: String,
}

/// The fixed set of part-time job answers offered by the job filter.
pub const JOB_OPTIONS: [&str; 2] = ["Yes", "No"];

// ---------------------------------------------------------------------------
// StudentDataset – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset. Never mutated after load; filtering produces indices.
#[derive(Debug, Clone, Default)]
pub struct StudentDataset {
    pub records: Vec<Record>,
    /// Rows removed during cleaning because some cell was missing.
    pub dropped_rows: usize,
}

impl StudentDataset {
    pub fn new(records: Vec<Record>, dropped_rows: usize) -> Self {
        StudentDataset {
            records,
            dropped_rows,
        }
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Min and max of `study_hours_per_day`, or `None` for an empty dataset.
    pub fn study_hours_bounds(&self) -> Option<(f64, f64)> {
        self.records.iter().fold(None, |acc, r| {
            let v = r.study_hours_per_day;
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
            })
        })
    }

    /// Distinct diet qualities in order of first appearance.
    pub fn diet_options(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.diet_quality.as_str()))
    }

    /// Distinct internet qualities in order of first appearance.
    pub fn internet_options(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.internet_quality.as_str()))
    }

    pub fn job_options(&self) -> Vec<String> {
        JOB_OPTIONS.iter().map(|s| s.to_string()).collect()
    }

    /// Distinct genders in order of first appearance.
    pub fn genders(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.gender.as_str()))
    }

    /// Distinct part-time job answers in order of first appearance.
    pub fn job_values(&self) -> Vec<String> {
        distinct_in_order(self.records.iter().map(|r| r.part_time_job.as_str()))
    }
}

/// Collect unique values, keeping the position of their first occurrence.
pub fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Small record builder shared by the data-layer tests.
    pub(crate) fn record(id: &str, study: f64, diet: &str, score: f64) -> Record {
        Record {
            student_id: id.to_string(),
            study_hours_per_day: study,
            sleep_hours: 7.0,
            mental_health_rating: 5.0,
            exam_score: score,
            gender: "Female".to_string(),
            diet_quality: diet.to_string(),
            internet_quality: "Good".to_string(),
            part_time_job: "No".to_string(),
        }
    }

    #[test]
    fn bounds_cover_full_dataset() {
        let ds = StudentDataset::new(
            vec![
                record("S1", 2.0, "Good", 70.0),
                record("S2", 5.0, "Poor", 50.0),
                record("S3", 6.0, "Good", 90.0),
            ],
            0,
        );
        assert_eq!(ds.study_hours_bounds(), Some((2.0, 6.0)));
    }

    #[test]
    fn bounds_of_empty_dataset_are_none() {
        assert_eq!(StudentDataset::default().study_hours_bounds(), None);
    }

    #[test]
    fn options_keep_first_appearance_order() {
        let ds = StudentDataset::new(
            vec![
                record("S1", 2.0, "Poor", 70.0),
                record("S2", 5.0, "Good", 50.0),
                record("S3", 6.0, "Poor", 90.0),
                record("S4", 1.0, "Fair", 60.0),
            ],
            0,
        );
        assert_eq!(ds.diet_options(), vec!["Poor", "Good", "Fair"]);
        assert_eq!(ds.internet_options(), vec!["Good"]);
        assert_eq!(ds.job_options(), vec!["Yes", "No"]);
    }
}
