use eframe::egui::{self, Ui};

pub mod panels;
pub mod plot;
pub mod table;

/// A framed card with a header line, filling the available width.
pub fn card<R>(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.strong(title);
            ui.separator();
            add_contents(ui)
        })
        .inner
}
