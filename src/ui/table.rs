use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{DataTable, SortOrder, SPECIES_COLUMN};
use crate::state::AppState;

const TABLE_HEIGHT: f32 = 400.0;
const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table: every column, load order
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let table = &state.penguins;
    let columns: Vec<usize> = (0..table.columns.len()).collect();
    render(
        ui,
        "penguins_datatable",
        table,
        &columns,
        &state.table_rows.indices,
        None,
    );
}

// ---------------------------------------------------------------------------
// Data grid: species + picked attributes, sortable
// ---------------------------------------------------------------------------

pub fn data_grid(ui: &mut Ui, state: &mut AppState) {
    let table = &state.penguins;
    let columns: Vec<usize> = std::iter::once(SPECIES_COLUMN)
        .chain(state.controls.attributes.iter().map(String::as_str))
        .filter_map(|name| table.column_index(name).ok())
        .collect();

    let clicked = render(
        ui,
        "penguins_datagrid",
        table,
        &columns,
        &state.table_rows.grid_order,
        Some(state.table_rows.sort.as_ref()),
    );
    if let Some(column) = clicked {
        state.sort_grid_by(&column);
    }
}

/// Draw `rows` of `table` restricted to `columns`. With `sort` set the
/// headers are buttons; the name of a clicked header is returned.
fn render(
    ui: &mut Ui,
    id: &str,
    table: &DataTable,
    columns: &[usize],
    rows: &[usize],
    sort: Option<Option<&(String, SortOrder)>>,
) -> Option<String> {
    if rows.is_empty() {
        ui.label(RichText::new("No rows match the selected species.").weak());
    }

    let mut clicked = None;
    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .resizable(sort.is_some())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(64.0).clip(true), columns.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(TABLE_HEIGHT)
        .header(22.0, |mut header| {
            for &c in columns {
                let name = &table.columns[c];
                header.col(|ui| match sort {
                    Some(current) => {
                        let marker = match current {
                            Some((col, SortOrder::Ascending)) if col == name => " ⬆",
                            Some((col, SortOrder::Descending)) if col == name => " ⬇",
                            _ => "",
                        };
                        if ui
                            .button(RichText::new(format!("{name}{marker}")).strong())
                            .clicked()
                        {
                            clicked = Some(name.clone());
                        }
                    }
                    None => {
                        ui.strong(name);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let r = rows[row.index()];
                for &c in columns {
                    row.col(|ui| {
                        ui.label(table.cell(r, c).to_string());
                    });
                }
            });
        });
    clicked
}
