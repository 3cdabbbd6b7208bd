use std::path::Path;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, Choice, FilterState, StudyHoursRange};
use crate::data::model::StudentDataset;
use crate::data::views::DashboardViews;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded, cleaned dataset.  Never mutated by filtering.
    pub dataset: StudentDataset,

    /// Current sidebar selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// The five charts' data for `visible_indices` (cached).
    pub views: DashboardViews,

    /// Dropdown choices, computed once per dataset from the full data.
    pub diet_options: Vec<String>,
    pub internet_options: Vec<String>,
    pub job_options: Vec<String>,

    /// Slider bounds: min/max study hours of the full dataset.
    pub study_hours_bounds: (f64, f64),

    /// Colour per gender (scatter charts).
    pub gender_colors: ColorMap,

    /// Colour per part-time job answer (box chart).
    pub job_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: StudentDataset) -> Self {
        let mut state = AppState::default();
        state.set_dataset(dataset);
        state
    }

    /// Ingest a newly loaded dataset: options, colours, filters, views.
    pub fn set_dataset(&mut self, dataset: StudentDataset) {
        self.diet_options = dataset.diet_options();
        self.internet_options = dataset.internet_options();
        self.job_options = dataset.job_options();
        self.study_hours_bounds = dataset.study_hours_bounds().unwrap_or((0.0, 0.0));
        self.gender_colors = ColorMap::new(&dataset.genders());
        self.job_colors = ColorMap::new(&dataset.job_values());
        self.filters = FilterState::for_dataset(&dataset);

        self.dataset = dataset;
        self.status_message = None;
        self.refilter();
    }

    /// Load a file and make it the active dataset.  On failure the current
    /// dataset stays and the error is shown in the status bar.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} students from {} ({} incomplete rows dropped)",
                    dataset.len(),
                    path.display(),
                    dataset.dropped_rows
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute `visible_indices` and the views after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        self.views = DashboardViews::compute(&self.dataset, &self.visible_indices);
        log::debug!(
            "filters {:?} keep {}/{} students",
            self.filters,
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Set the study-hours range, clamped to the dataset bounds.
    pub fn set_study_hours(&mut self, lo: f64, hi: f64) {
        let (min, max) = self.study_hours_bounds;
        let range = StudyHoursRange::new(lo.clamp(min, max), hi.clamp(min, max));
        if range != self.filters.study_hours {
            self.filters.study_hours = range;
            self.refilter();
        }
    }

    pub fn set_diet(&mut self, choice: Choice) {
        if choice != self.filters.diet {
            self.filters.diet = choice;
            self.refilter();
        }
    }

    pub fn set_internet(&mut self, choice: Choice) {
        if choice != self.filters.internet {
            self.filters.internet = choice;
            self.refilter();
        }
    }

    pub fn set_job(&mut self, choice: Choice) {
        if choice != self.filters.job {
            self.filters.job = choice;
            self.refilter();
        }
    }

    /// Back to the identity filter.
    pub fn reset_filters(&mut self) {
        self.filters = FilterState::for_dataset(&self.dataset);
        self.refilter();
    }
}
