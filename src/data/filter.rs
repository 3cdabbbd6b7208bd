use std::fmt;

use super::model::{Record, StudentDataset};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Label shown for the "no filter" entry of a dropdown.
pub const ALL_LABEL: &str = "All";

/// A categorical dropdown selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    /// No constraint on this column.
    #[default]
    All,
    /// Keep only rows whose value equals this one exactly.
    Only(String),
}

impl Choice {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "{ALL_LABEL}"),
            Choice::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Inclusive range on `study_hours_per_day`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudyHoursRange {
    pub lo: f64,
    pub hi: f64,
}

impl StudyHoursRange {
    /// Endpoints are ordered, so an inverted pair still describes a valid range.
    pub fn new(a: f64, b: f64) -> Self {
        StudyHoursRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }
}

/// All sidebar selections.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub study_hours: StudyHoursRange,
    pub diet: Choice,
    pub internet: Choice,
    pub job: Choice,
}

impl FilterState {
    /// The identity filter for `dataset`: full study-hours range, everything "All".
    pub fn for_dataset(dataset: &StudentDataset) -> Self {
        let (lo, hi) = dataset.study_hours_bounds().unwrap_or((0.0, 0.0));
        FilterState {
            study_hours: StudyHoursRange::new(lo, hi),
            diet: Choice::All,
            internet: Choice::All,
            job: Choice::All,
        }
    }

    /// The four independent predicates this state describes.
    pub fn predicates(&self) -> [RowFilter; 4] {
        [
            RowFilter::StudyHours(self.study_hours),
            RowFilter::Diet(self.diet.clone()),
            RowFilter::Internet(self.internet.clone()),
            RowFilter::PartTimeJob(self.job.clone()),
        ]
    }
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState::for_dataset(&StudentDataset::default())
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// A predicate narrowing the working subset along one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    StudyHours(StudyHoursRange),
    Diet(Choice),
    Internet(Choice),
    PartTimeJob(Choice),
}

impl RowFilter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            RowFilter::StudyHours(range) => range.contains(record.study_hours_per_day),
            RowFilter::Diet(choice) => choice.accepts(&record.diet_quality),
            RowFilter::Internet(choice) => choice.accepts(&record.internet_quality),
            RowFilter::PartTimeJob(choice) => choice.accepts(&record.part_time_job),
        }
    }
}

/// Return indices of records that pass all active filters.
pub fn filtered_indices(dataset: &StudentDataset, filters: &FilterState) -> Vec<usize> {
    apply_filters(dataset, &filters.predicates())
}

/// Narrow the dataset by each predicate in turn.  Order does not matter.
pub fn apply_filters(dataset: &StudentDataset, predicates: &[RowFilter]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    for predicate in predicates {
        indices.retain(|&i| predicate.matches(&dataset.records[i]));
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use pretty_assertions::assert_eq;

    fn three_students() -> StudentDataset {
        StudentDataset::new(
            vec![
                record("S1", 2.0, "Good", 70.0),
                record("S2", 5.0, "Poor", 50.0),
                record("S3", 6.0, "Good", 90.0),
            ],
            0,
        )
    }

    #[test]
    fn default_state_keeps_everything() {
        let ds = three_students();
        let state = FilterState::for_dataset(&ds);
        assert_eq!(state.study_hours, StudyHoursRange { lo: 2.0, hi: 6.0 });
        assert_eq!(filtered_indices(&ds, &state), vec![0, 1, 2]);
    }

    #[test]
    fn study_range_is_inclusive() {
        let ds = three_students();
        let mut state = FilterState::for_dataset(&ds);
        state.study_hours = StudyHoursRange::new(3.0, 6.0);
        assert_eq!(filtered_indices(&ds, &state), vec![1, 2]);

        state.study_hours = StudyHoursRange::new(5.0, 5.0);
        assert_eq!(filtered_indices(&ds, &state), vec![1]);
    }

    #[test]
    fn inverted_range_is_reordered() {
        assert_eq!(
            StudyHoursRange::new(6.0, 3.0),
            StudyHoursRange { lo: 3.0, hi: 6.0 }
        );
    }

    #[test]
    fn diet_choice_matches_exactly() {
        let ds = three_students();
        let mut state = FilterState::for_dataset(&ds);
        state.diet = Choice::Only("Good".into());
        assert_eq!(filtered_indices(&ds, &state), vec![0, 2]);

        state.diet = Choice::Only("good".into());
        assert!(filtered_indices(&ds, &state).is_empty());
    }

    #[test]
    fn all_is_identity() {
        let ds = three_students();
        for r in &ds.records {
            assert!(RowFilter::Diet(Choice::All).matches(r));
            assert!(RowFilter::Internet(Choice::All).matches(r));
            assert!(RowFilter::PartTimeJob(Choice::All).matches(r));
        }
    }

    #[test]
    fn filters_are_conjunctive() {
        let mut ds = three_students();
        ds.records[2].part_time_job = "Yes".into();
        let state = FilterState {
            study_hours: StudyHoursRange::new(1.0, 10.0),
            diet: Choice::Only("Good".into()),
            internet: Choice::Only("Good".into()),
            job: Choice::Only("Yes".into()),
        };
        assert_eq!(filtered_indices(&ds, &state), vec![2]);
    }

    #[test]
    fn filter_order_does_not_matter() {
        let mut ds = three_students();
        ds.records[0].internet_quality = "Poor".into();
        ds.records[1].part_time_job = "Yes".into();
        let state = FilterState {
            study_hours: StudyHoursRange::new(2.0, 5.5),
            diet: Choice::All,
            internet: Choice::Only("Good".into()),
            job: Choice::Only("Yes".into()),
        };
        let forward = state.predicates();
        let mut reversed = forward.clone();
        reversed.reverse();
        let shuffled = [
            forward[2].clone(),
            forward[0].clone(),
            forward[3].clone(),
            forward[1].clone(),
        ];

        let expected = apply_filters(&ds, &forward);
        assert_eq!(expected, vec![1]);
        assert_eq!(apply_filters(&ds, &reversed), expected);
        assert_eq!(apply_filters(&ds, &shuffled), expected);
    }

    #[test]
    fn empty_dataset_filters_to_nothing() {
        let ds = StudentDataset::default();
        let state = FilterState::for_dataset(&ds);
        assert!(filtered_indices(&ds, &state).is_empty());
    }

    #[test]
    fn choice_displays_all_label() {
        assert_eq!(Choice::All.to_string(), "All");
        assert_eq!(Choice::Only("Poor".into()).to_string(), "Poor");
    }
}
