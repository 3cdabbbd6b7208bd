use eframe::egui::{Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, MarkerShape, Plot, PlotPoints, Points,
};

use crate::data::model::Record;
use crate::data::views::{bubble_radius, BoxSummary, GroupMean, ScatterView};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
const POINT_RADIUS: f32 = 3.0;
const MAX_BUBBLE_RADIUS: f32 = 10.0;
const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// ---------------------------------------------------------------------------
// Central panel – the five charts, stacked
// ---------------------------------------------------------------------------

/// Render the dashboard body in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Student Habits and Performance Dashboard");
            ui.label(
                "Analyze how student habits (like study hours, sleep, part-time jobs) \
                 impact academic and mental health performance.",
            );
            if state.views.study_vs_score.is_empty() {
                ui.weak("No students match the current filters.");
            }
            ui.add_space(8.0);

            section(ui, "Study Hours vs Exam Score");
            study_vs_score(ui, state);

            section(ui, "Sleep Duration vs Mental Health Rating");
            sleep_vs_mental(ui, state);

            section(ui, "Exam Scores by Part-Time Job Status");
            score_by_job(ui, state, &state.views.score_by_job);

            section(ui, "Average Exam Score by Internet Quality");
            mean_bars(
                ui,
                "score_by_internet",
                "Internet Quality",
                &state.views.score_by_internet,
            );

            section(ui, "Average Exam Score by Diet Quality");
            mean_bars(ui, "score_by_diet", "Diet Quality", &state.views.score_by_diet);

            ui.add_space(12.0);
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Created by:");
                ui.label(RichText::new("Fatmah").strong());
            });
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.strong(title);
}

/// A plot sized for the stacked layout; scrolling moves the page, not the axes.
fn chart<'a>(id: &str) -> Plot<'a> {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
}

// ---------------------------------------------------------------------------
// A: study hours vs exam score
// ---------------------------------------------------------------------------

fn study_vs_score(ui: &mut Ui, state: &AppState) {
    let view = &state.views.study_vs_score;
    let records = &state.dataset.records;

    chart("study_vs_score")
        .legend(Legend::default())
        .x_axis_label("Study Hours Per Day")
        .y_axis_label("Exam Score")
        .label_formatter(move |name, value| {
            let hits = view.records_at(name, value.x, value.y);
            point_tooltip(records, &hits, |r| {
                format!(
                    "{name}\nStudy Hours Per Day: {}\nExam Score: {}\nstudent_id: {}\nmental_health_rating: {}",
                    r.study_hours_per_day, r.exam_score, r.student_id, r.mental_health_rating
                )
            })
        })
        .show(ui, |plot_ui| {
            for series in &view.series {
                let points: PlotPoints = series.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&series.group)
                        .color(state.gender_colors.color_for(&series.group))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(POINT_RADIUS),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// B: sleep vs mental health, bubble size = exam score
// ---------------------------------------------------------------------------

fn sleep_vs_mental(ui: &mut Ui, state: &AppState) {
    let view: &ScatterView = &state.views.sleep_vs_mental;
    let records = &state.dataset.records;
    let max_score = view.max_size();

    chart("sleep_vs_mental")
        .legend(Legend::default())
        .x_axis_label("Sleep Hours")
        .y_axis_label("Mental Health Rating")
        .label_formatter(move |name, value| {
            let hits = view.records_at(name, value.x, value.y);
            point_tooltip(records, &hits, |r| {
                format!(
                    "{}\ngender: {name}\nSleep Hours: {}\nMental Health Rating: {}\nexam_score: {}",
                    r.student_id, r.sleep_hours, r.mental_health_rating, r.exam_score
                )
            })
        })
        .show(ui, |plot_ui| {
            for series in &view.series {
                let color = state.gender_colors.color_for(&series.group);
                // One item per bubble; egui_plot merges equal names in the legend.
                for p in &series.points {
                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[p.x, p.y]]))
                            .name(&series.group)
                            .color(color.gamma_multiply(0.7))
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(bubble_radius(p.size, max_score, MAX_BUBBLE_RADIUS)),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// C: exam score distribution per part-time job answer
// ---------------------------------------------------------------------------

fn score_by_job(ui: &mut Ui, state: &AppState, boxes: &[BoxSummary]) {
    let labels: Vec<String> = boxes.iter().map(|b| b.group.clone()).collect();

    chart("score_by_job")
        .legend(Legend::default())
        .x_axis_label("Has Part-Time Job")
        .y_axis_label("Exam Score")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let color = state.job_colors.color_for(&b.group);
                let x = i as f64;
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(format!("{} (n = {})", b.group, b.count))
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color))
                .box_width(0.5);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.group).color(color));

                if !b.outliers.is_empty() {
                    let points: PlotPoints = b.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(&b.group)
                            .color(color)
                            .radius(POINT_RADIUS),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// D, E: mean exam score per category
// ---------------------------------------------------------------------------

fn mean_bars(ui: &mut Ui, id: &str, x_label: &str, groups: &[GroupMean]) {
    let labels: Vec<String> = groups.iter().map(|g| g.group.clone()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| Bar::new(i as f64, g.mean).name(bar_label(g)).width(0.6))
        .collect();

    chart(id)
        .x_axis_label(x_label)
        .y_axis_label("Average Exam Score")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(BAR_COLOR)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}\nAverage Exam Score: {:.2}", bar.name, bar.value)
                    })),
            );
        });
}

/// One block per student plotted at the hovered position.
fn point_tooltip(
    records: &[Record],
    hits: &[usize],
    describe: impl Fn(&Record) -> String,
) -> String {
    hits.iter()
        .map(|&i| describe(&records[i]))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn bar_label(group: &GroupMean) -> String {
    format!("{} (n = {})", group.group, group.count)
}

/// Axis text for a categorical x position; blank between categories.
fn category_label(labels: &[String], value: f64) -> String {
    let nearest = value.round();
    if (value - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::StudentDataset;
    use crate::data::views::DashboardViews;
    use eframe::egui::{self, epaint::Shape};

    fn student(id: &str, sleep: f64, rating: f64, score: f64) -> Record {
        Record {
            student_id: id.to_string(),
            study_hours_per_day: 3.0,
            sleep_hours: sleep,
            mental_health_rating: rating,
            exam_score: score,
            gender: "Female".to_string(),
            diet_quality: "Good".to_string(),
            internet_quality: "Good".to_string(),
            part_time_job: "No".to_string(),
        }
    }

    fn collect_text(shape: &Shape, out: &mut Vec<String>) {
        match shape {
            Shape::Text(t) => out.push(t.galley.text().to_string()),
            Shape::Vec(shapes) => shapes.iter().for_each(|s| collect_text(s, out)),
            _ => {}
        }
    }

    #[test]
    fn coincident_bubbles_list_every_student() {
        let records = vec![
            student("S1", 7.0, 5.0, 60.0),
            student("S2", 7.0, 5.0, 95.0),
        ];
        let ds = StudentDataset::new(records, 0);
        let views = DashboardViews::compute(&ds, &[0, 1]);

        let hits = views.sleep_vs_mental.records_at("Female", 7.0, 5.0);
        let text = point_tooltip(&ds.records, &hits, |r| {
            format!("{}: {}", r.student_id, r.exam_score)
        });
        assert_eq!(text, "S1: 60\n\nS2: 95");
        assert_eq!(point_tooltip(&ds.records, &[], |r| r.student_id.clone()), "");
    }

    #[test]
    fn bar_label_carries_group_size() {
        let g = GroupMean {
            group: "Poor".to_string(),
            mean: 61.5,
            count: 12,
        };
        assert_eq!(bar_label(&g), "Poor (n = 12)");
    }

    #[test]
    fn dashboard_ends_with_footer() {
        let state = AppState::new(StudentDataset::new(
            vec![student("S1", 7.0, 5.0, 60.0), student("S2", 6.0, 8.0, 75.0)],
            0,
        ));
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| dashboard(ui, &state));
        });

        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        assert!(texts.iter().any(|t| t == "Created by:"), "{texts:?}");
        assert!(texts.iter().any(|t| t == "Fatmah"));
    }

    #[test]
    fn category_labels_only_on_whole_positions() {
        let labels = vec!["Average".to_string(), "Good".to_string(), "Poor".to_string()];
        assert_eq!(category_label(&labels, 0.0), "Average");
        assert_eq!(category_label(&labels, 2.0), "Poor");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 3.0), "");
    }
}
