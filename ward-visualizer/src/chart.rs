use anyhow::{anyhow, Result};
use plotters::prelude::*;
use std::path::Path;
use ward_common::Trajectory;

pub const TITLE: &str = "Hospital Ward Strain Model";
pub const X_LABEL: &str = "Time (days)";
pub const Y_LABEL: &str = "Number of Patients";
pub const CURRENT_LABEL: &str = "Current Patients";
pub const WAITING_LABEL: &str = "Waiting Patients";

const FONT: &str = "sans-serif";
// Characters per line of the error panel
const WRAP_WIDTH: usize = 90;

fn draw_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("Chart drawing failed: {}", e)
}

/// Vertical axis range covering both series, with headroom above the peak.
/// Negative values (the model does not clamp) stay visible.
pub fn y_range(trajectory: &Trajectory) -> (f64, f64) {
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    for s in trajectory {
        lo = lo.min(s.current).min(s.waiting);
        hi = hi.max(s.current).max(s.waiting);
    }
    if hi <= lo {
        hi = lo + 1.0;
    }
    (lo, hi + 0.05 * (hi - lo))
}

/// Horizontal axis range: the time span of the trajectory.
pub fn x_range(trajectory: &Trajectory) -> (f64, f64) {
    match (trajectory.first(), trajectory.last()) {
        (Some(first), Some(last)) if last.time > first.time => (first.time, last.time),
        (Some(first), _) => (first.time, first.time + 1.0),
        _ => (0.0, 1.0),
    }
}

/// Draws both series against the shared time axis into a PNG at `path`.
pub fn render_chart(trajectory: &Trajectory, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let (x_min, x_max) = x_range(trajectory);
    let (y_min, y_max) = y_range(trajectory);

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, (FONT, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()
        .map_err(draw_error)?;

    chart
        .draw_series(LineSeries::new(
            trajectory.samples().iter().map(|s| (s.time, s.current)),
            BLUE.stroke_width(2),
        ))
        .map_err(draw_error)?
        .label(CURRENT_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(LineSeries::new(
            trajectory.samples().iter().map(|s| (s.time, s.waiting)),
            RED.stroke_width(2),
        ))
        .map_err(draw_error)?
        .label(WAITING_LABEL)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_error)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Renders a message panel in place of the chart.
pub fn render_error(message: &str, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;
    let body = root.titled(TITLE, (FONT, 28)).map_err(draw_error)?;

    let style = (FONT, 18).into_font().color(&RED);
    for (i, line) in wrap_message(message, WRAP_WIDTH).iter().enumerate() {
        body.draw_text(line, &style, (20, 20 + 24 * i as i32))
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Splits `message` into lines of at most `width` characters on word boundaries.
pub fn wrap_message(message: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in message.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use ward_common::{Parameters, Sample, State};
    use ward_engine::simulate;

    fn scratch_png(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ward-chart-{}-{}.png", name, std::process::id()))
    }

    fn assert_written_and_remove(path: &Path) {
        let len = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let _ = fs::remove_file(path);
        assert!(len > 0, "{} was not written", path.display());
    }

    fn trajectory(points: &[(f64, f64, f64)]) -> Trajectory {
        Trajectory::new(
            points
                .iter()
                .map(|&(time, current, waiting)| Sample { time, current, waiting })
                .collect(),
        )
    }

    #[test]
    fn y_range_covers_both_series_with_headroom() {
        let t = trajectory(&[(0.0, 50.0, 25.0), (1.0, 60.0, 200.0)]);
        let (lo, hi) = y_range(&t);
        assert_eq!(lo, 0.0);
        assert!(hi > 200.0);
    }

    #[test]
    fn y_range_keeps_negative_values_visible() {
        let t = trajectory(&[(0.0, 5.0, -3.0), (1.0, 4.0, -1.0)]);
        let (lo, _) = y_range(&t);
        assert_eq!(lo, -3.0);
    }

    #[test]
    fn flat_zero_series_gets_a_non_empty_range() {
        let t = trajectory(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let (lo, hi) = y_range(&t);
        assert!(hi > lo);
    }

    #[test]
    fn x_range_spans_sample_times() {
        let t = trajectory(&[(0.0, 1.0, 1.0), (50.0, 1.0, 1.0)]);
        assert_eq!(x_range(&t), (0.0, 50.0));
        assert_eq!(x_range(&Trajectory::new(Vec::new())), (0.0, 1.0));
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_message("domain error: capacity must be a positive finite number", 20);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), "domain error: capacity must be a positive finite number");
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_message("a verylongwordthatdoesnotfit b", 5);
        assert_eq!(lines, vec!["a", "verylongwordthatdoesnotfit", "b"]);
    }

    #[test]
    fn renders_a_simulated_trajectory() {
        let t = simulate(State::default(), &Parameters::default(), 50).unwrap();
        let path = scratch_png("trajectory");
        render_chart(&t, &path, (640, 480)).unwrap();
        assert_written_and_remove(&path);
    }

    #[test]
    fn renders_an_error_panel() {
        let err = simulate(State::default(), &Parameters { capacity: 0.0, ..Parameters::default() }, 50)
            .unwrap_err();
        let path = scratch_png("error");
        render_error(&err.to_string(), &path, (640, 480)).unwrap();
        assert_written_and_remove(&path);
    }
}
