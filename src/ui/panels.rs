use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::data::filter::{Choice, ALL_LABEL};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter the Data");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No students loaded.");
        return;
    }

    // ---- Study hours range ----
    ui.strong("Study Hours per Day");
    let (min, max) = state.study_hours_bounds;
    let mut lo = state.filters.study_hours.lo;
    let mut hi = state.filters.study_hours.hi;
    let from_changed = ui
        .add(Slider::new(&mut lo, min..=max).text("From"))
        .changed();
    let to_changed = ui.add(Slider::new(&mut hi, min..=max).text("To")).changed();
    if from_changed || to_changed {
        // The dragged handle pushes the other one along.
        if from_changed && lo > hi {
            hi = lo;
        }
        if to_changed && hi < lo {
            lo = hi;
        }
        state.set_study_hours(lo, hi);
    }
    ui.separator();

    // ---- Categorical dropdowns ----
    if let Some(choice) = choice_combo(
        ui,
        "diet_filter",
        "Diet Quality",
        &state.filters.diet,
        &state.diet_options,
    ) {
        state.set_diet(choice);
    }
    if let Some(choice) = choice_combo(
        ui,
        "internet_filter",
        "Internet Quality",
        &state.filters.internet,
        &state.internet_options,
    ) {
        state.set_internet(choice);
    }
    if let Some(choice) = choice_combo(
        ui,
        "job_filter",
        "Part-Time Job?",
        &state.filters.job,
        &state.job_options,
    ) {
        state.set_job(choice);
    }
    ui.separator();

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
}

/// A dropdown with "All" followed by `options`.  Returns the newly picked
/// choice, if the user picked one this frame.
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &Choice,
    options: &[String],
) -> Option<Choice> {
    let mut picked = None;
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Choice::All, ALL_LABEL)
                .clicked()
            {
                picked = Some(Choice::All);
            }
            for opt in options {
                let selected = matches!(current, Choice::Only(v) if v == opt);
                if ui.selectable_label(selected, opt).clicked() {
                    picked = Some(Choice::Only(opt.clone()));
                }
            }
        });
    ui.add_space(4.0);
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} students loaded, {} match filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
