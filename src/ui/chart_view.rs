use eframe::egui::{self, Color32, PointerButton, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Corner, Legend, Line, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};

use crate::app::{DataVisualizer, apply_fullscreen, window_geometry};
use crate::chart::{
    Chart, ChartData, HostedChart, annotation, category_tick, diverging_color, format_axis_value,
    format_timestamp, palette, wedge_angles, wedge_outline,
};
use crate::constants::chart::TITLE_COLOR;
use crate::constants::layout::{CHART_HEIGHT, CHART_WIDTH};
use crate::state::NavMode;

fn color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Render the navigation toolbar and the hosted chart
pub fn render_chart_view(app: &mut DataVisualizer, ui: &mut egui::Ui) {
    profiling::scope!("render_chart_view");

    render_nav_toolbar(app, ui);
    ui.separator();

    let reset = app.state.viewport.take_reset();
    let mode = app.state.viewport.mode;
    let Some(hosted) = app.state.host.current() else {
        ui.centered_and_justified(|ui| {
            ui.weak("No chart. Load a file, pick a chart type and press Generate Chart.");
        });
        return;
    };

    // Fixed-size figure; the wheel scrolls this area, never the plot
    egui::ScrollArea::both()
        .id_salt("chart_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.label(
                RichText::new(&hosted.chart().title)
                    .heading()
                    .strong()
                    .color(color32(TITLE_COLOR)),
            );
            render_plot(ui, hosted, mode, reset);
        });
}

fn render_nav_toolbar(app: &mut DataVisualizer, ui: &mut egui::Ui) {
    let has_chart = app.state.host.has_chart();
    let zooming = app.state.viewport.zoom_enabled();
    let panning = app.state.viewport.pan_enabled();

    ui.horizontal(|ui| {
        ui.add_enabled_ui(has_chart, |ui| {
            if ui
                .selectable_label(zooming, "🔍 Zoom In")
                .on_hover_text("Drag a rectangle to zoom into it")
                .clicked()
            {
                app.zoom_in();
            }
            if ui.button("🔎 Zoom Out").clicked() {
                app.zoom_out();
            }
            if ui
                .selectable_label(panning, "✋ Pan")
                .on_hover_text("Drag to move the view")
                .clicked()
            {
                app.toggle_pan();
            }
            if ui.button("🔄 Reset View").clicked() {
                app.reset_view();
            }
        });

        ui.separator();
        let label = if app.state.viewport.fullscreen {
            "🗗 Exit Fullscreen"
        } else {
            "⛶ Fullscreen"
        };
        if ui.button(label).on_hover_text("F11").clicked() {
            let change = app.toggle_fullscreen(window_geometry(ui.ctx()));
            apply_fullscreen(ui.ctx(), change);
        }
    });
}

fn series_name(chart: &Chart) -> String {
    chart
        .y_label
        .clone()
        .or_else(|| chart.x_label.clone())
        .unwrap_or_else(|| chart.kind.to_string())
}

fn render_plot(ui: &mut egui::Ui, hosted: &HostedChart, mode: NavMode, reset: bool) {
    profiling::scope!("render_plot");

    let chart = hosted.chart();
    let mut plot = Plot::new("chart_plot")
        .id(hosted.plot_id())
        .width(CHART_WIDTH)
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(mode == NavMode::Pan)
        .allow_boxed_zoom(mode == NavMode::Zoom)
        .boxed_zoom_pointer_button(PointerButton::Primary)
        .legend(Legend::default().position(Corner::RightTop));

    if let Some(label) = &chart.x_label {
        plot = plot.x_axis_label(label.clone());
    }
    if let Some(label) = &chart.y_label {
        plot = plot.y_axis_label(label.clone());
    }
    if reset {
        plot = plot.reset();
    }

    plot = match &chart.data {
        ChartData::Bars { categories, .. } => {
            let labels = categories.clone();
            plot.x_axis_formatter(move |mark, _range| {
                category_tick(&labels, mark.value).unwrap_or_default().to_string()
            })
        }
        ChartData::Line {
            tick_labels: Some(labels),
            ..
        } => {
            let labels = labels.clone();
            plot.x_axis_formatter(move |mark, _range| {
                category_tick(&labels, mark.value).unwrap_or_default().to_string()
            })
        }
        ChartData::Line {
            x_temporal: true, ..
        } => plot.x_axis_formatter(|mark, _range| format_timestamp(mark.value)),
        ChartData::Pie(_) => plot.data_aspect(1.0).show_axes(false).show_grid(false),
        ChartData::Boxplot(_) => {
            let name = series_name(chart);
            plot.x_axis_formatter(move |mark, _range| {
                if (mark.value - 1.0).abs() < 1e-6 {
                    name.clone()
                } else {
                    String::new()
                }
            })
        }
        ChartData::Heatmap { columns, .. } => {
            let n = columns.len() as f64;
            let x_labels = columns.clone();
            let y_labels = columns.clone();
            plot.show_grid(false)
                .x_axis_formatter(move |mark, _range| {
                    category_tick(&x_labels, mark.value - 0.5)
                        .unwrap_or_default()
                        .to_string()
                })
                .y_axis_formatter(move |mark, _range| {
                    category_tick(&y_labels, n - 0.5 - mark.value)
                        .unwrap_or_default()
                        .to_string()
                })
        }
        _ => plot.x_axis_formatter(|mark, _range| format_axis_value(mark.value)),
    };

    let name = series_name(chart);
    plot.show(ui, |plot_ui| match &chart.data {
        ChartData::Bars { categories, values } => {
            let bars = categories
                .iter()
                .zip(values)
                .enumerate()
                .map(|(i, (category, &value))| Bar::new(i as f64, value).width(0.8).name(category))
                .collect();
            plot_ui.bar_chart(BarChart::new(name, bars).color(color32(palette(0))));
        }
        ChartData::Line { points, .. } => {
            let color = color32(palette(1));
            plot_ui.line(Line::new(name.clone(), points.clone()).color(color).width(2.0));
            plot_ui.points(Points::new(name, points.clone()).radius(3.0).color(color));
        }
        ChartData::Pie(slices) => {
            for (i, (slice, (start, end))) in slices.iter().zip(wedge_angles(slices)).enumerate() {
                let color = color32(palette(i));
                // Pieces of at most a quarter turn stay convex
                let pieces = ((end - start) / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
                for p in 0..pieces {
                    let from = start + (end - start) * p as f64 / pieces as f64;
                    let to = start + (end - start) * (p + 1) as f64 / pieces as f64;
                    let outline: Vec<[f64; 2]> =
                        wedge_outline(from, to).into_iter().map(|(x, y)| [x, y]).collect();
                    plot_ui.polygon(
                        Polygon::new(slice.label.clone(), PlotPoints::from(outline))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = (start + end) / 2.0;
                plot_ui.text(
                    Text::new("", PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()), slice.percent_label())
                        .color(Color32::BLACK),
                );
                plot_ui.text(Text::new(
                    "",
                    PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                    slice.label.clone(),
                ));
            }
        }
        ChartData::Scatter(points) => {
            plot_ui.points(
                Points::new(name, points.clone())
                    .radius(3.0)
                    .color(color32(palette(4))),
            );
        }
        ChartData::Histogram(hist) => {
            let width = hist.bin_width();
            let bars = hist
                .edges
                .windows(2)
                .zip(&hist.counts)
                .map(|(edge, &count)| {
                    Bar::new((edge[0] + edge[1]) / 2.0, count as f64)
                        .width(width)
                        .stroke(Stroke::new(1.0, Color32::BLACK))
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(name, bars).color(color32(palette(2))));
        }
        ChartData::Boxplot(summary) => {
            let color = color32(palette(0));
            let elem = BoxElem::new(
                1.0,
                BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                ),
            )
            .box_width(0.5)
            .whisker_width(0.25);
            plot_ui.box_plot(BoxPlot::new(name.clone(), vec![elem]).color(color));

            if !summary.outliers.is_empty() {
                let outliers: Vec<[f64; 2]> = summary.outliers.iter().map(|&v| [1.0, v]).collect();
                plot_ui.points(
                    Points::new(format!("{} outliers", name), outliers)
                        .radius(4.0)
                        .filled(false)
                        .color(color),
                );
            }
        }
        ChartData::Heatmap { columns, values } => {
            let n = columns.len() as f64;
            for (row, line) in values.iter().enumerate() {
                // Row 0 at the top
                let top = n - row as f64;
                for (col, &value) in line.iter().enumerate() {
                    let left = col as f64;
                    let cell = vec![
                        [left, top - 1.0],
                        [left + 1.0, top - 1.0],
                        [left + 1.0, top],
                        [left, top],
                    ];
                    plot_ui.polygon(
                        Polygon::new("", PlotPoints::from(cell))
                            .fill_color(color32(diverging_color(value)))
                            .stroke(Stroke::new(0.5, Color32::WHITE)),
                    );
                    let text_color = if value.abs() > 0.6 {
                        Color32::WHITE
                    } else {
                        Color32::BLACK
                    };
                    plot_ui.text(
                        Text::new("", PlotPoint::new(left + 0.5, top - 0.5), annotation(value))
                            .color(text_color),
                    );
                }
            }
        }
    });
}
