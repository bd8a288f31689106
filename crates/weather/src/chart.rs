use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols,
    widgets::{Axis, Chart, Dataset, GraphType, Widget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 72,
            height: 12,
        }
    }
}

/// Draw one hourly series as a line chart and return it as plain text.
/// Gaps (`None`) are skipped.
pub fn render(values: &[Option<f64>], size: ChartSize) -> String {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(hour, v)| v.map(|v| (hour as f64, v)))
        .collect();

    let (low, high) = y_bounds(&points);
    let last_hour = values.len().saturating_sub(1).max(1);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .bounds([0.0, last_hour as f64])
                .labels(["0h".to_string(), format!("{}h", last_hour / 2), format!("{}h", last_hour)]),
        )
        .y_axis(
            Axis::default()
                .bounds([low, high])
                .labels([
                    format!("{:.1}", low),
                    format!("{:.1}", (low + high) / 2.0),
                    format!("{:.1}", high),
                ]),
        );

    let area = Rect::new(0, 0, size.width, size.height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);
    buffer_to_text(&buffer)
}

fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let (low, high) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });

    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    // A flat line still needs a non-empty range
    if high - low < f64::EPSILON {
        return (low - 1.0, high + 1.0);
    }
    (low, high)
}

fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
