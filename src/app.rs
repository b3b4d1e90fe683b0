use eframe::egui::{self, ScrollArea, Ui};

use crate::data::model::{TIP_COLUMN, TOTAL_BILL_COLUMN};
use crate::state::AppState;
use crate::ui::{self, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashboardApp {
    pub state: AppState,
}

impl PenguinDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("sidebar")
            .default_width(240.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(egui::Color32::from_gray(0xf8)))
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.columns(2, |cols: &mut [Ui]| {
        ui::card(&mut cols[0], "Penguins Data Table", |ui| {
            table::data_table(ui, state);
        });
        ui::card(&mut cols[1], "Penguins Data Grid", |ui| {
            table::data_grid(ui, state);
        });
    });
    ui.add_space(8.0);

    ui.columns(2, |cols: &mut [Ui]| {
        ui::card(&mut cols[0], "Plotly Histogram: Species", |ui| {
            plot::overlay_histogram(ui, state);
        });
        ui::card(&mut cols[1], "Seaborn Histogram: Species", |ui| {
            plot::stacked_histogram(ui, state);
        });
    });
    ui.add_space(8.0);

    ui::card(ui, "Plotly Scatterplot: Penguin Flipper & Bill Length", |ui| {
        plot::scatter_plot(ui, state);
    });
    ui.add_space(8.0);

    ui::card(ui, "Tips", |ui| {
        ui.columns(2, |cols: &mut [Ui]| {
            plot::tips_histogram(&mut cols[0], &state.tips, TIP_COLUMN);
            plot::tips_histogram(&mut cols[1], &state.tips, TOTAL_BILL_COLUMN);
        });
    });
}
