use eframe::egui::{Align2, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Text,
};

use crate::charts::Sex;
use crate::charts::bar::BarFigure;
use crate::charts::boxplot::{BoxFigure, BoxSeries};
use crate::charts::facet::FacetFigure;
use crate::charts::scatter::ScatterFigure;

const GROUP_SPAN: f64 = 0.8;

// ---------------------------------------------------------------------------
// Interactive grouped bar chart
// ---------------------------------------------------------------------------

/// Grouped (side-by-side) bars, one colour per group, each labelled with its count.
pub fn bar_chart(ui: &mut Ui, figure: &BarFigure) {
    let n_groups = figure.groups.len().max(1) as f64;
    let width = GROUP_SPAN / n_groups;
    let categories = figure.categories.clone();

    Plot::new("interactive_bar")
        .height(figure.height)
        .legend(Legend::default())
        .x_axis_label(figure.x_label)
        .y_axis_label("count")
        .include_y(0.0)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| category_label(&categories, mark.value))
        .show(ui, |plot_ui| {
            for (gi, group) in figure.groups.iter().enumerate() {
                let offset = (gi as f64 - (n_groups - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = group
                    .bars
                    .iter()
                    .map(|b| {
                        Bar::new(b.category as f64 + offset, b.count as f64)
                            .width(width * 0.95)
                            .name(&figure.categories[b.category])
                            .fill(group.color)
                    })
                    .collect();

                let chart = BarChart::new(bars)
                    .name(&group.label)
                    .color(group.color)
                    .element_formatter(Box::new(|bar, _chart| format!("{:.0}", bar.value)));
                plot_ui.bar_chart(chart);

                for b in &group.bars {
                    let label = Text::new(
                        PlotPoint::new(b.category as f64 + offset, b.count as f64),
                        b.count.to_string(),
                    )
                    .anchor(Align2::CENTER_BOTTOM);
                    plot_ui.text(label);
                }
            }
        });
}

/// Axis tick text for categorical x positions; blank between categories.
fn category_label(categories: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scatter with trend lines
// ---------------------------------------------------------------------------

pub fn scatter_plot(ui: &mut Ui, figure: &ScatterFigure) {
    let hover = figure.clone();

    Plot::new("prestige_income_scatter")
        .height(500.0)
        .legend(Legend::default())
        .x_axis_label(figure.x_label)
        .y_axis_label(figure.y_label)
        .allow_scroll(false)
        .label_formatter(move |name, value| {
            match hover.find_point(name, value.x, value.y) {
                Some((series, point)) => format!(
                    "sex={}\n{}={}\n{}={}\neducation={}\nsocioeconomic_index={}",
                    series.sex.label(),
                    hover.x_label,
                    point.x,
                    hover.y_label,
                    point.y,
                    optional(point.education),
                    optional(point.socioeconomic_index),
                ),
                None if name.is_empty() => String::new(),
                None => format!("{name}\n{:.2}, {:.2}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            for series in &figure.series {
                let points: PlotPoints = series.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.sex.label())
                        .color(series.color)
                        .radius(2.5),
                );

                if let Some(trend) = &series.trend {
                    let line = Line::new(PlotPoints::from(trend.endpoints().to_vec()))
                        .name(format!("{} OLS (R² = {:.3})", series.sex.label(), trend.r_squared))
                        .color(series.color)
                        .width(2.0);
                    plot_ui.line(line);
                }
            }
        });
}

fn optional(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "–".to_string())
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// One box per sex along a categorical x axis.
pub fn box_plot(ui: &mut Ui, id: &str, figure: &BoxFigure, height: f32) {
    let mut plot = Plot::new(id)
        .height(height)
        .y_axis_label(figure.y_label)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| sex_tick(mark.value));
    if figure.show_legend {
        plot = plot.legend(Legend::default());
    }
    plot.show(ui, |plot_ui| {
        for series in &figure.boxes {
            let (boxes, outliers) = box_items(series);
            plot_ui.box_plot(boxes);
            if let Some(points) = outliers {
                plot_ui.points(points);
            }
        }
    });
}

/// Faceted box plots, wrapped into `figure.columns` columns, ascending by bin.
pub fn facet_grid(ui: &mut Ui, figure: &FacetFigure) {
    let rows = figure.rows().max(1);
    let panel_height = figure.height / rows as f32 - 30.0;
    let (y_min, y_max) = facet_y_range(figure);

    for row in figure.panels.chunks(figure.columns) {
        ui.columns(figure.columns, |cols: &mut [Ui]| {
            for (ui, panel) in cols.iter_mut().zip(row) {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(&panel.title);
                });
                Plot::new(("facet", panel.bin.index))
                    .height(panel_height)
                    .y_axis_label(figure.y_label)
                    .include_y(y_min)
                    .include_y(y_max)
                    .include_x(-0.5)
                    .include_x(1.5)
                    .allow_scroll(false)
                    .x_axis_formatter(|mark, _range| sex_tick(mark.value))
                    .show(ui, |plot_ui| {
                        for series in &panel.boxes {
                            let (boxes, outliers) = box_items(series);
                            plot_ui.box_plot(boxes);
                            if let Some(points) = outliers {
                                plot_ui.points(points);
                            }
                        }
                    });
            }
        });
    }
}

/// Shared y range so panels compare at a glance.
fn facet_y_range(figure: &FacetFigure) -> (f64, f64) {
    let values = figure.panels.iter().flat_map(|p| &p.boxes).flat_map(|b| {
        let low = b.outliers.first().copied().unwrap_or(b.stats.lower_whisker);
        let high = b.outliers.last().copied().unwrap_or(b.stats.upper_whisker);
        [low.min(b.stats.lower_whisker), high.max(b.stats.upper_whisker)]
    });
    values.fold((0.0, 0.0), |(lo, hi), v| (f64::min(lo, v), f64::max(hi, v)))
}

fn sex_position(sex: Sex) -> f64 {
    match sex {
        Sex::Men => 0.0,
        Sex::Women => 1.0,
    }
}

fn sex_tick(value: f64) -> String {
    Sex::ALL
        .into_iter()
        .find(|s| (sex_position(*s) - value).abs() < 1e-6)
        .map(|s| s.label().to_string())
        .unwrap_or_default()
}

fn box_items(series: &BoxSeries) -> (BoxPlot, Option<Points>) {
    let x = sex_position(series.sex);
    let s = series.stats;
    let elem = BoxElem::new(
        x,
        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
    )
    .name(series.sex.label())
    .box_width(0.5)
    .whisker_width(0.25)
    .fill(series.color.gamma_multiply(0.3))
    .stroke(Stroke::new(1.5, series.color));

    let boxes = BoxPlot::new(vec![elem])
        .name(series.sex.label())
        .color(series.color);

    let outliers = (!series.outliers.is_empty()).then(|| {
        let points: PlotPoints = series.outliers.iter().map(|v| [x, *v]).collect();
        Points::new(points)
            .color(series.color)
            .radius(2.0)
            .shape(egui_plot::MarkerShape::Circle)
    });

    (boxes, outliers)
}
