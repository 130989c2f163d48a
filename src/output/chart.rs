//! Mass budget chart rendering.
//!
//! A plain line chart: elapsed hours on the x axis, oil mass per compartment
//! on the y axis, legend in the upper right, title carrying the oil name and
//! the maximum emulsion density reached.

use image::{Rgb, RgbImage};

use crate::simulation::RunResult;

use super::font;
use super::raster::Canvas;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const TEXT: Rgb<u8> = Rgb([30, 30, 30]);

const SERIES_COLORS: [Rgb<u8>; 4] = [
    Rgb([20, 20, 20]),    // surface
    Rgb([31, 119, 180]),  // submerged
    Rgb([44, 160, 44]),   // biodegraded
    Rgb([255, 127, 14]),  // evaporated
];
const SERIES_LABELS: [&str; 4] = ["SURFACE", "SUBMERGED", "BIODEGRADED", "EVAPORATED"];

const MARGIN_LEFT: i64 = 70;
const MARGIN_RIGHT: i64 = 20;
const MARGIN_TOP: i64 = 30;
const MARGIN_BOTTOM: i64 = 40;

/// Render the oil budget chart.
pub(crate) fn render_budget_chart(result: &RunResult, width: u32, height: u32) -> RgbImage {
    let mut canvas = Canvas::new(width, height, BACKGROUND);
    let hours = result.elapsed_hours();
    let budget = &result.budget;

    let series: [&[f64]; 4] = [
        &budget.mass_surface,
        &budget.mass_submerged,
        &budget.mass_biodegraded,
        &budget.mass_evaporated,
    ];

    let x_max = hours.last().copied().unwrap_or(1.0).max(1e-9);
    let y_max = series
        .iter()
        .flat_map(|s| s.iter().copied())
        .fold(0.0_f64, f64::max)
        .max(1e-9);

    let plot_w = width as i64 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height as i64 - MARGIN_TOP - MARGIN_BOTTOM;

    let to_px = |hour: f64, mass: f64| -> (i64, i64) {
        let x = MARGIN_LEFT + ((hour / x_max) * plot_w as f64).round() as i64;
        let y = MARGIN_TOP + plot_h - ((mass / y_max) * plot_h as f64).round() as i64;
        (x, y)
    };

    // Grid and tick labels.
    let n_ticks = 5;
    for k in 0..=n_ticks {
        let frac = k as f64 / n_ticks as f64;

        let (x, _) = to_px(frac * x_max, 0.0);
        canvas.draw_line(x, MARGIN_TOP, x, MARGIN_TOP + plot_h, GRID);
        let label = format_tick(frac * x_max);
        canvas.draw_text(
            x - font::text_width(&label) as i64 / 2,
            MARGIN_TOP + plot_h + 6,
            &label,
            TEXT,
        );

        let (_, y) = to_px(0.0, frac * y_max);
        canvas.draw_line(MARGIN_LEFT, y, MARGIN_LEFT + plot_w, y, GRID);
        let label = format_tick(frac * y_max);
        canvas.draw_text(
            MARGIN_LEFT - font::text_width(&label) as i64 - 6,
            y - 3,
            &label,
            TEXT,
        );
    }

    // Axes.
    canvas.draw_line(
        MARGIN_LEFT,
        MARGIN_TOP + plot_h,
        MARGIN_LEFT + plot_w,
        MARGIN_TOP + plot_h,
        AXIS,
    );
    canvas.draw_line(MARGIN_LEFT, MARGIN_TOP, MARGIN_LEFT, MARGIN_TOP + plot_h, AXIS);

    // Series.
    for (values, color) in series.iter().zip(SERIES_COLORS.iter()) {
        let mut prev: Option<(i64, i64)> = None;
        for (hour, mass) in hours.iter().zip(values.iter()) {
            let (x, y) = to_px(*hour, *mass);
            if let Some((px, py)) = prev {
                canvas.draw_line(px, py, x, y, *color);
                canvas.draw_line(px, py + 1, x, y + 1, *color);
            }
            prev = Some((x, y));
        }
    }

    // Title: oil name and max density.
    let title = format!("{}, {:.1} KG/M3", result.oil_name(), budget.max_density());
    let tx = (width as i64 - font::text_width(&title) as i64) / 2;
    canvas.draw_text(tx.max(2), 8, &title, TEXT);

    // Axis captions.
    canvas.draw_text(
        MARGIN_LEFT + plot_w / 2 - font::text_width("TIME (HOURS)") as i64 / 2,
        height as i64 - 16,
        "TIME (HOURS)",
        TEXT,
    );
    canvas.draw_text(4, MARGIN_TOP - 12, "MASS OIL (KG)", TEXT);

    // Legend, upper right of the plot area.
    let legend_x = MARGIN_LEFT + plot_w - 130;
    let mut legend_y = MARGIN_TOP + 8;
    for (label, color) in SERIES_LABELS.iter().zip(SERIES_COLORS.iter()) {
        canvas.fill_rect(legend_x, legend_y + 2, legend_x + 12, legend_y + 5, *color);
        canvas.draw_text(legend_x + 18, legend_y, label, TEXT);
        legend_y += font::GLYPH_HEIGHT as i64 + 5;
    }

    canvas.into_image()
}

/// Compact tick label: integers below 1000, otherwise short scientific-ish.
fn format_tick(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value >= 10_000.0 {
        format!("{:.0}K", value / 1000.0)
    } else if value >= 100.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::ensemble::SeedSpec;
    use crate::env::{UniformFlowProvider, Variable};
    use crate::simulation::{OilDriftSimulation, RunParams};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    #[test]
    fn test_chart_renders() {
        let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let mut config = DriftConfig::default();
        config
            .set("environment:fallback:sea_surface_wave_significant_height", 1.0)
            .unwrap();
        let mut sim = OilDriftSimulation::new(config);
        sim.register_provider(
            Arc::new(UniformFlowProvider::new(0.2, 0.0, 5.0, 0.0)),
            &Variable::MANDATORY,
        )
        .unwrap();
        sim.seed_elements(
            SeedSpec::new(89.5, 21.5, start, "GENERIC MEDIUM CRUDE").with_number(20),
        )
        .unwrap();
        let result = sim.run(RunParams::new(start + Duration::hours(6))).unwrap();

        let image = render_budget_chart(&result, 640, 400);
        assert_eq!(image.dimensions(), (640, 400));

        // Title and axes must have put ink on the canvas
        let inked = image.pixels().filter(|p| **p != BACKGROUND).count();
        assert!(inked > 500);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(50.5), "50.5");
        assert_eq!(format_tick(250.0), "250");
        assert_eq!(format_tick(1_350_000.0), "1350K");
    }
}
