// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::pair_grid::config::PairGridConfig;
use crate::pair_grid::histogram::{Bin, histogram, max_count};
use crate::pair_grid::layout::GridLayout;
use crate::pair_grid::scale::{LinearScale, extent, format_tick};
use crate::svg::{class_list, escape_xml_attr, escape_xml_text, format_number};

const PAIR_GRID_STYLES: &str = r#"
.nerviz-pair-grid text {
  fill: #000000;
  font-size: 14px;
  font-family: "Open Sans", "Arial", sans-serif;
}

.nerviz-pair-grid g.axis path.domain,
.nerviz-pair-grid g.axis .tick line {
  fill: none;
  stroke: #777777;
  stroke-opacity: 0.5;
  stroke-width: 1.5;
  stroke-linecap: round;
}

.nerviz-pair-grid g.axis .tick text {
  font-size: 11px;
  fill: #777777;
}

.nerviz-pair-grid rect.subplot-hover-background {
  fill-opacity: 0;
}

.nerviz-pair-grid g.data circle {
  fill: #333333;
}

.nerviz-pair-grid g.data rect {
  fill: #9aa5b1;
}

.nerviz-pair-grid g.row-label text,
.nerviz-pair-grid g.column-label text {
  fill: #777777;
}

.nerviz-pair-grid g.row-label.highlighted text,
.nerviz-pair-grid g.column-label.highlighted text {
  fill: #000000;
}

.nerviz-pair-grid g.unhighlighted {
  opacity: 0.25;
}
"#;

/// One sampled variable: its header label and its draws.
#[derive(Clone, Copy, Debug)]
pub struct Series<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
}

/// Highlight state of a rendered grid.  Cells are `(column, row)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GridHighlight {
    /// Emphasize one subplot and dim the rest.
    pub index: Option<(usize, usize)>,
    /// Subplot under the pointer; its row and column labels are emphasized.
    pub hovered: Option<(usize, usize)>,
}

/// Each variable's own x scale and the y scale used when it is on the
/// y axis of a scatter cell.
struct Axes {
    x: LinearScale,
    y: LinearScale,
}

fn domain_of(values: &[f64]) -> (f64, f64) {
    extent(values).unwrap_or((0.0, 0.0))
}

fn render_x_axis(
    svg: &mut String,
    layout: &GridLayout,
    config: &PairGridConfig,
    scale: &LinearScale,
    column: usize,
    row: usize,
) {
    let (x, y) = layout.origin(column, row);
    svg.push_str(&format!(
        "<g class=\"axis x-axis\" transform=\"translate({} {})\">",
        format_number(x),
        format_number(y + layout.subplot_height)
    ));
    svg.push_str(&format!(
        "<path class=\"domain\" d=\"M{},0H{}\"></path>",
        format_number(-config.subplot_padding / 2.0),
        format_number(layout.subplot_width)
    ));
    if layout.is_last_row(row) {
        let spacing = config.tick_size + config.tick_padding;
        for value in tick_values(scale) {
            svg.push_str(&format!(
                "<g class=\"tick\" transform=\"translate({},0)\"><line y2=\"{}\"></line><text y=\"{}\" dy=\"0.71em\" text-anchor=\"middle\">{}</text></g>",
                format_number(scale.apply(value)),
                format_number(config.tick_size),
                format_number(spacing),
                format_tick(value)
            ));
        }
    }
    svg.push_str("</g>");
}

fn render_y_axis(
    svg: &mut String,
    layout: &GridLayout,
    config: &PairGridConfig,
    scale: &LinearScale,
    column: usize,
    row: usize,
) {
    let (x, y) = layout.origin(column, row);
    svg.push_str(&format!(
        "<g class=\"axis y-axis\" transform=\"translate({} {})\">",
        format_number(x),
        format_number(y)
    ));
    svg.push_str(&format!(
        "<path class=\"domain\" d=\"M0,{}V0\"></path>",
        format_number(layout.subplot_height + config.subplot_padding / 2.0)
    ));
    if column == 0 {
        let spacing = config.tick_size + config.tick_padding;
        for value in tick_values(scale) {
            svg.push_str(&format!(
                "<g class=\"tick\" transform=\"translate(0,{})\"><line x2=\"{}\"></line><text x=\"{}\" dy=\"0.32em\" text-anchor=\"end\">{}</text></g>",
                format_number(scale.apply(value)),
                format_number(-config.tick_size),
                format_number(-spacing),
                format_tick(value)
            ));
        }
    }
    svg.push_str("</g>");
}

/// Ticks sit only at the ends of the domain.
fn tick_values(scale: &LinearScale) -> Vec<f64> {
    let (lo, hi) = scale.domain();
    if lo == hi { vec![lo] } else { vec![lo, hi] }
}

fn render_scatter(
    svg: &mut String,
    config: &PairGridConfig,
    x: (&[f64], &LinearScale),
    y: (&[f64], &LinearScale),
    origin: (f64, f64),
) {
    svg.push_str(&format!(
        "<g class=\"data\" transform=\"translate({} {})\">",
        format_number(origin.0),
        format_number(origin.1)
    ));
    for (xv, yv) in x.0.iter().zip(y.0.iter()) {
        if !xv.is_finite() || !yv.is_finite() {
            continue;
        }
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"></circle>",
            format_number(x.1.apply(*xv)),
            format_number(y.1.apply(*yv)),
            format_number(config.point_radius)
        ));
    }
    svg.push_str("</g>");
}

fn render_histogram(
    svg: &mut String,
    bins: &[Bin],
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    origin: (f64, f64),
) {
    svg.push_str(&format!(
        "<g class=\"data\" transform=\"translate({} {})\">",
        format_number(origin.0),
        format_number(origin.1)
    ));
    // bars rise from the bottom of the plotting range
    let baseline = y_scale.range().0;
    for bin in bins {
        let top = y_scale.apply(bin.count as f64);
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"></rect>",
            format_number(x_scale.apply(bin.x0)),
            format_number(top - 1.0),
            format_number((x_scale.apply(bin.x1) - x_scale.apply(bin.x0) - 1.0).abs()),
            format_number((baseline - top).abs()),
        ));
    }
    svg.push_str("</g>");
}

fn render_label(svg: &mut String, class: &str, transform: &str, label: &str) {
    svg.push_str(&format!(
        "<g class=\"{class}\" transform=\"{transform}\"><text text-anchor=\"middle\">{}</text></g>",
        escape_xml_text(label)
    ));
}

/// Draw a `k` by `k` grid for `series`: scatterplots off the diagonal,
/// histograms on it.  Subplot `(column, row)` plots `series[column]`
/// against `series[row]` and carries the class `subplot-{column}-{row}`.
pub fn render_pair_grid(
    series: &[Series<'_>],
    layout: &GridLayout,
    config: &PairGridConfig,
    highlight: &GridHighlight,
    title: Option<&str>,
) -> String {
    let (x_range, y_range) = (layout.x_range(), layout.y_range());
    let axes: Vec<Axes> = series
        .iter()
        .map(|s| {
            let domain = domain_of(s.values);
            Axes {
                x: LinearScale::new(domain, x_range).rounded(),
                y: LinearScale::new(domain, y_range).rounded(),
            }
        })
        .collect();

    // every histogram shares one count scale so bar heights compare
    let n_bins = layout.bin_count(config);
    let histograms: Vec<Vec<Bin>> = series
        .iter()
        .map(|s| histogram(s.values, domain_of(s.values), n_bins))
        .collect();
    let max_bin = max_count(histograms.iter().map(Vec::as_slice));
    let hist_y = LinearScale::new((0.0, max_bin as f64), y_range);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"nerviz-pair-grid\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\"",
        w = format_number(layout.width),
        h = format_number(layout.height)
    ));
    if let Some(title) = title {
        svg.push_str(&format!(" aria-label=\"{}\"", escape_xml_attr(title)));
    }
    svg.push('>');
    svg.push_str("<style>\n");
    svg.push_str(PAIR_GRID_STYLES);
    svg.push_str("\n</style>\n");

    let k = series.len();
    for (column, x_series) in series.iter().enumerate() {
        for (row, y_series) in series.iter().enumerate() {
            let selected = highlight.index.map(|index| index == (column, row));
            let name = format!("subplot-{column}-{row}");
            let class = class_list(&[
                (name.as_str(), true),
                ("highlighted", selected == Some(true)),
                ("unhighlighted", selected == Some(false)),
            ]);
            svg.push_str(&format!("<g class=\"{class}\">"));

            let area = layout.hover_area(column, row);
            svg.push_str(&format!(
                "<rect class=\"subplot-hover-background\" transform=\"translate({} {})\" width=\"{}\" height=\"{}\"></rect>",
                format_number(area.x),
                format_number(area.y),
                format_number(area.width),
                format_number(area.height)
            ));

            render_x_axis(&mut svg, layout, config, &axes[column].x, column, row);
            render_y_axis(&mut svg, layout, config, &axes[row].y, column, row);

            if column == 0 {
                let (x, y) = layout.row_label_anchor(row);
                let class = class_list(&[
                    ("row-label", true),
                    ("highlighted", highlight.hovered.is_some_and(|(_, r)| r == row)),
                ]);
                let transform = format!(
                    "translate({} {}) rotate(-90)",
                    format_number(x),
                    format_number(y)
                );
                render_label(&mut svg, &class, &transform, y_series.label);
            }
            if row + 1 == k {
                let (x, y) = layout.column_label_anchor(column);
                let class = class_list(&[
                    ("column-label", true),
                    ("highlighted", highlight.hovered.is_some_and(|(c, _)| c == column)),
                ]);
                let transform = format!("translate({} {})", format_number(x), format_number(y));
                render_label(&mut svg, &class, &transform, x_series.label);
            }

            let origin = layout.origin(column, row);
            if column == row {
                let x_scale = LinearScale::new(domain_of(x_series.values), x_range);
                render_histogram(
                    &mut svg,
                    &histograms[column],
                    &x_scale,
                    &hist_y,
                    origin,
                );
            } else {
                render_scatter(
                    &mut svg,
                    config,
                    (x_series.values, &axes[column].x),
                    (y_series.values, &axes[row].y),
                    origin,
                );
            }

            svg.push_str("</g>");
        }
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(series: &[Series<'_>], highlight: &GridHighlight) -> String {
        let config = PairGridConfig::default();
        let layout = GridLayout::new(&config, 600.0, 400.0, series.len());
        render_pair_grid(series, &layout, &config, highlight, Some("Sampled population"))
    }

    #[test]
    fn test_grid_structure() {
        let a = [0.0, 1.0, 2.0, 3.0];
        let b = [10.0, 12.0, 11.0, 13.0];
        let series = [
            Series {
                label: "Rain",
                values: &a,
            },
            Series {
                label: "Wet",
                values: &b,
            },
        ];
        let svg = grid(&series, &GridHighlight::default());

        assert!(svg.contains("viewBox=\"0 0 600 400\""));
        assert!(svg.contains("aria-label=\"Sampled population\""));
        for class in ["subplot-0-0", "subplot-0-1", "subplot-1-0", "subplot-1-1"] {
            assert!(svg.contains(&format!("<g class=\"{class}\">")), "{class}");
        }
        // two scatter cells of four points each
        assert_eq!(svg.matches("<circle ").count(), 8);
        assert_eq!(svg.matches("r=\"1.5\"").count(), 8);
        // row labels on the first column, column labels on the last row
        assert_eq!(svg.matches("class=\"row-label\"").count(), 2);
        assert_eq!(svg.matches("class=\"column-label\"").count(), 2);
        assert!(svg.contains("rotate(-90)\"><text text-anchor=\"middle\">Wet</text>"));
        // ticks show only the domain ends
        assert!(svg.contains(">0.0</text>"));
        assert!(svg.contains(">3.0</text>"));
        assert!(svg.contains(">10.0</text>"));
        assert!(svg.contains(">13.0</text>"));
        assert!(!svg.contains(">1.0</text>"));
    }

    #[test]
    fn test_histograms_share_scale() {
        // first variable piles every draw into one bin, second spreads out
        let a = [5.0, 5.0, 5.0, 5.0];
        let b = [0.0, 1.0, 2.0, 3.0];
        let series = [
            Series {
                label: "A",
                values: &a,
            },
            Series {
                label: "B",
                values: &b,
            },
        ];
        let config = PairGridConfig::default();
        let layout = GridLayout::new(&config, 600.0, 400.0, 2);
        let svg = render_pair_grid(&series, &layout, &config, &GridHighlight::default(), None);
        assert!(!svg.contains("aria-label"));

        // the tallest bar reaches the top of the plotting range
        let full = layout.subplot_height - 2.0 * config.subplot_padding;
        assert!(svg.contains(&format!("height=\"{}\"", format_number(full))));
        // a single draw is a quarter of that
        assert!(svg.contains(&format!("height=\"{}\"", format_number(full / 4.0))));
    }

    #[test]
    fn test_highlight_classes() {
        let a = [0.0, 1.0];
        let b = [1.0, 0.0];
        let series = [
            Series {
                label: "A",
                values: &a,
            },
            Series {
                label: "B",
                values: &b,
            },
        ];
        let svg = grid(
            &series,
            &GridHighlight {
                index: Some((1, 0)),
                hovered: Some((1, 0)),
            },
        );
        assert!(svg.contains("<g class=\"subplot-1-0 highlighted\">"));
        assert!(svg.contains("<g class=\"subplot-0-0 unhighlighted\">"));
        assert!(svg.contains("<g class=\"subplot-1-1 unhighlighted\">"));
        // hovering column 1, row 0 lights row 0's label and column 1's label
        assert!(svg.contains("<g class=\"row-label highlighted\" transform=\"translate(12 "));
        assert_eq!(svg.matches("row-label highlighted").count(), 1);
        assert_eq!(svg.matches("column-label highlighted").count(), 1);
    }
}
