use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points,
};

use crate::color::ColorMap;
use crate::data::model::DataTable;
use crate::data::stats::{resolve_bin_count, BinEdges, BoxSummary};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 300.0;
const MARGINAL_HEIGHT: f32 = 90.0;

// ---------------------------------------------------------------------------
// Body mass histograms
// ---------------------------------------------------------------------------

/// Overlaid per-species histogram with a marginal box plot per species.
/// Bin count comes from the "Input number" field.
pub fn overlay_histogram(ui: &mut Ui, state: &AppState) {
    ui.label(RichText::new("Penguin Body Mass by Species").strong());
    let series = &state.charts.body_mass;
    let n: usize = series.iter().map(|(_, v)| v.len()).sum();
    empty_hint(ui, n);

    let bins = resolve_bin_count(state.controls.overlay_bin_count, n);
    let edges = BinEdges::spanning(series.iter().map(|(_, v)| v.as_slice()), bins);

    // ---- Marginal box plot ----
    let mut marginal = Plot::new("plotly_histogram_marginal")
        .height(MARGINAL_HEIGHT)
        .show_axes([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false);
    if let Some(e) = &edges {
        marginal = marginal.include_x(e.min).include_x(e.min + e.width * e.count as f64);
    }
    marginal.show(ui, |plot_ui| {
        for (row, (label, values)) in series.iter().enumerate() {
            let Some(summary) = BoxSummary::from_values(values) else {
                continue;
            };
            plot_ui.box_plot(species_box(row as f64, label, summary, &state.color_map));
        }
    });

    // ---- Histogram ----
    let mut plot = Plot::new("plotly_histogram")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Body Mass (g)")
        .y_axis_label("Count");
    if let Some(e) = &edges {
        plot = plot.include_x(e.min).include_x(e.min + e.width * e.count as f64);
    }
    plot.show(ui, |plot_ui| {
        let Some(edges) = edges else {
            return;
        };
        for (label, values) in series {
            let chart = histogram_chart(&edges, values, label)
                .color(state.color_map.translucent_for(label));
            plot_ui.bar_chart(chart);
        }
    });
}

/// Per-species histogram with bars stacked on top of each other.
/// Bin count comes from the "Bin Count" slider.
pub fn stacked_histogram(ui: &mut Ui, state: &AppState) {
    ui.label(RichText::new("Penguin Body Mass by Species").strong());
    let series = &state.charts.body_mass;
    let n: usize = series.iter().map(|(_, v)| v.len()).sum();
    empty_hint(ui, n);

    let bins = resolve_bin_count(state.controls.stacked_bin_count, n);
    let edges = BinEdges::spanning(series.iter().map(|(_, v)| v.as_slice()), bins);

    let mut charts: Vec<BarChart> = Vec::new();
    if let Some(edges) = &edges {
        for (label, values) in series {
            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = histogram_chart(edges, values, label)
                .color(state.color_map.color_for(label))
                .stack_on(&below);
            charts.push(chart);
        }
    }

    Plot::new("seaborn_histogram")
        .height(PLOT_HEIGHT + MARGINAL_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Body Mass (g)")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let series = &state.charts.flipper_vs_bill;
    empty_hint(ui, series.iter().map(|(_, p)| p.len()).sum());

    Plot::new("plotly_scatterplot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Flipper Length (mm)")
        .y_axis_label("Bill Length (mm)")
        .show(ui, |plot_ui| {
            for (label, points) in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(points.clone()))
                        .name(label)
                        .color(state.color_map.color_for(label))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Tips histograms (unfiltered example dataset)
// ---------------------------------------------------------------------------

/// Horizontal histogram of one numeric column of the tips table; the value
/// runs along the y axis and the count along x.
pub fn tips_histogram(ui: &mut Ui, tips: &DataTable, column: &str) {
    let values = match tips.numeric_column(column) {
        Ok(v) => v,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };
    let bins = resolve_bin_count(0, values.len());
    let edges = BinEdges::spanning([values.as_slice()], bins);

    Plot::new(format!("tips_{column}"))
        .height(PLOT_HEIGHT)
        .x_axis_label("count")
        .y_axis_label(column)
        .show(ui, |plot_ui| {
            if let Some(edges) = edges {
                plot_ui.bar_chart(
                    histogram_chart(&edges, &values, column)
                        .color(Color32::from_rgb(0x63, 0x6e, 0xfa))
                        .horizontal(),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn histogram_chart(edges: &BinEdges, values: &[f64], name: &str) -> BarChart {
    let bars: Vec<Bar> = edges
        .counts(values)
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bar::new(edges.center(i), count as f64))
        .collect();
    BarChart::new(bars).name(name).width(edges.width)
}

fn species_box(row: f64, label: &str, s: BoxSummary, colors: &ColorMap) -> BoxPlot {
    let color = colors.color_for(label);
    let elem = BoxElem::new(
        row,
        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
    )
    .name(label)
    .box_width(0.6)
    .whisker_width(0.4)
    .fill(color.gamma_multiply(0.4))
    .stroke(Stroke::new(1.5, color));
    BoxPlot::new(vec![elem]).name(label).color(color).horizontal()
}

fn empty_hint(ui: &mut Ui, n: usize) {
    if n == 0 {
        ui.label(RichText::new("No rows match the selected species.").weak());
    }
}
