use eframe::egui::{self, Color32, RichText, ScrollArea, Sense, Shape, Stroke, Ui};

use crate::data::model::MEASUREMENT_ATTRIBUTES;
use crate::state::AppState;

/// Upper bound of the "Input number" field.
const MAX_OVERLAY_BINS: u32 = 200;

// ---------------------------------------------------------------------------
// Left side panel – controls
// ---------------------------------------------------------------------------

/// Render the sidebar: attribute picker, bin inputs, species checkboxes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Attribute picker (multi-select) ----
            ui.strong("Select attributes");
            for attr in MEASUREMENT_ATTRIBUTES {
                let picked = state.controls.attributes.iter().any(|a| a == attr);
                if ui.selectable_label(picked, attr).clicked() {
                    state.toggle_attribute(attr);
                }
            }
            ui.add_space(6.0);

            // ---- Bin counts ----
            ui.strong("Input number");
            ui.add(
                egui::DragValue::new(&mut state.controls.overlay_bin_count)
                    .range(0..=MAX_OVERLAY_BINS),
            );
            ui.label(RichText::new("0 = automatic bins").small().weak());
            ui.add_space(6.0);

            ui.add(
                egui::Slider::new(
                    &mut state.controls.stacked_bin_count,
                    0..=state.config.stacked_bin_max,
                )
                .text("Bin Count"),
            );
            ui.add_space(6.0);

            // ---- Species checkboxes (inline) ----
            ui.strong("Species:");
            let labels = state.selection.declared().to_vec();
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for label in &labels {
                    let mut checked = state.selection.contains(label);
                    let text = RichText::new(label).color(state.color_map.color_for(label));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_species(label);
                    }
                }
            });
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_species();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_species();
                }
            });
            ui.add_space(6.0);

            ui.hyperlink_to("GitHub", &state.config.repository_url);
            dashed_rule(ui);
        });
}

/// Thick dashed green rule closing the sidebar.
fn dashed_rule(ui: &mut Ui) {
    let (rect, _) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), 14.0), Sense::hover());
    let y = rect.center().y;
    let stroke = Stroke::new(5.0, Color32::from_rgb(0x38, 0x76, 0x1d));
    ui.painter().extend(Shape::dashed_line(
        &[egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)],
        stroke,
        10.0,
        6.0,
    ));
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
        ui.strong(&state.config.title);
        ui.separator();

        ui.label(format!(
            "{} penguins loaded, {} visible",
            state.penguins.len(),
            state.visible_count()
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
        .set_title("Open penguin data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_penguins_from(&path);
    }
}
