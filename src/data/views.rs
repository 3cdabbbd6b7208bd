use std::collections::BTreeMap;

use super::model::{Record, StudentDataset};

// ---------------------------------------------------------------------------
// Scatter views (A, B)
// ---------------------------------------------------------------------------

/// One plotted point, pointing back at the record it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Index into `StudentDataset::records`.
    pub record: usize,
    pub x: f64,
    pub y: f64,
    /// Marker size driver (exam score for the bubble chart).
    pub size: f64,
}

/// Points sharing a colour group (gender).
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub group: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterView {
    pub series: Vec<ScatterSeries>,
}

impl ScatterView {
    /// Group the selected records by gender, series in first-appearance order.
    fn build(
        dataset: &StudentDataset,
        indices: &[usize],
        x: fn(&Record) -> f64,
        y: fn(&Record) -> f64,
        size: fn(&Record) -> f64,
    ) -> Self {
        let mut series: Vec<ScatterSeries> = Vec::new();
        for &i in indices {
            let r = &dataset.records[i];
            let point = ScatterPoint {
                record: i,
                x: x(r),
                y: y(r),
                size: size(r),
            };
            match series.iter_mut().find(|s| s.group == r.gender) {
                Some(s) => s.points.push(point),
                None => series.push(ScatterSeries {
                    group: r.gender.clone(),
                    points: vec![point],
                }),
            }
        }
        ScatterView { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Largest `size` over all points, used to normalise bubble radii.
    pub fn max_size(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| &s.points)
            .map(|p| p.size)
            .fold(0.0, f64::max)
    }

    /// Every record of `group` plotted at exactly (`x`, `y`).  Coincident
    /// points are common (ratings are whole numbers), so a hover resolves to
    /// all of them.
    pub fn records_at(&self, group: &str, x: f64, y: f64) -> Vec<usize> {
        self.series
            .iter()
            .filter(|s| s.group == group)
            .flat_map(|s| &s.points)
            .filter(|p| p.x == x && p.y == y)
            .map(|p| p.record)
            .collect()
    }
}

/// Marker radius whose *area* is proportional to `value / max`.
pub fn bubble_radius(value: f64, max: f64, max_radius: f32) -> f32 {
    const MIN_RADIUS: f32 = 1.5;
    if max <= 0.0 || value <= 0.0 {
        return MIN_RADIUS;
    }
    let r = max_radius * (value / max).sqrt() as f32;
    r.clamp(MIN_RADIUS, max_radius)
}

// ---------------------------------------------------------------------------
// Box summary (C)
// ---------------------------------------------------------------------------

/// Five-number summary plus outliers for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub group: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Furthest observation at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Furthest observation at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty group.
    pub fn from_values(group: &str, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let q1 = quantile(&values, 0.25);
        let median = quantile(&values, 0.5);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            group: group.to_string(),
            count: values.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

// ---------------------------------------------------------------------------
// Group means (D, E)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: f64,
    pub count: usize,
}

/// Mean exam score per distinct `key`, sorted by key.  Groups with no rows
/// in `indices` do not appear.
pub fn mean_score_by(
    dataset: &StudentDataset,
    indices: &[usize],
    key: fn(&Record) -> &str,
) -> Vec<GroupMean> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &i in indices {
        let r = &dataset.records[i];
        let entry = sums.entry(key(r)).or_insert((0.0, 0));
        entry.0 += r.exam_score;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group: group.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// All five views
// ---------------------------------------------------------------------------

/// Everything the central panel draws, derived from one filtered subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    /// A: study hours vs exam score, by gender.
    pub study_vs_score: ScatterView,
    /// B: sleep hours vs mental health rating, sized by exam score.
    pub sleep_vs_mental: ScatterView,
    /// C: exam score distribution per part-time job answer.
    pub score_by_job: Vec<BoxSummary>,
    /// D: mean exam score per internet quality.
    pub score_by_internet: Vec<GroupMean>,
    /// E: mean exam score per diet quality.
    pub score_by_diet: Vec<GroupMean>,
}

impl DashboardViews {
    pub fn compute(dataset: &StudentDataset, indices: &[usize]) -> Self {
        let study_vs_score = ScatterView::build(
            dataset,
            indices,
            |r| r.study_hours_per_day,
            |r| r.exam_score,
            |r| r.exam_score,
        );
        let sleep_vs_mental = ScatterView::build(
            dataset,
            indices,
            |r| r.sleep_hours,
            |r| r.mental_health_rating,
            |r| r.exam_score,
        );

        let mut job_groups: Vec<(&str, Vec<f64>)> = Vec::new();
        for &i in indices {
            let r = &dataset.records[i];
            match job_groups.iter_mut().find(|(g, _)| *g == r.part_time_job) {
                Some((_, scores)) => scores.push(r.exam_score),
                None => job_groups.push((r.part_time_job.as_str(), vec![r.exam_score])),
            }
        }
        let score_by_job = job_groups
            .into_iter()
            .filter_map(|(group, scores)| BoxSummary::from_values(group, scores))
            .collect();

        DashboardViews {
            study_vs_score,
            sleep_vs_mental,
            score_by_job,
            score_by_internet: mean_score_by(dataset, indices, |r| r.internet_quality.as_str()),
            score_by_diet: mean_score_by(dataset, indices, |r| r.diet_quality.as_str()),
        }
    }
}
