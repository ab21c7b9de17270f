//! # In-memory sky chart
//!
//! [`SkyChart`] is a [`PlotTarget`] that records every primitive it is given and
//! renders the scene as SVG through the [`SvgChart`] display adaptor.
//!
//! ## Quick example
//!
//! ```rust
//! use stackclub::plotting::chart::SkyChart;
//! use stackclub::plotting::overlay_run1_1p_regions;
//!
//! let mut chart = SkyChart::new();
//! overlay_run1_1p_regions(&mut chart).unwrap();
//! chart.set_limits((60.5, 50.0), (-33.5, -25.5));
//!
//! let svg = chart.to_svg(800, 600);
//! assert!(svg.starts_with("<svg"));
//! ```
use std::fmt;

use crate::constants::Degree;
use crate::plotting::{bounds, PathStyle, PlotTarget, SkyPath, TextStyle};
use crate::skymap::SkyPoint;

/// Recording [`PlotTarget`].
#[derive(Debug, Clone, Default)]
pub struct SkyChart {
    paths: Vec<(SkyPath, PathStyle)>,
    texts: Vec<(SkyPoint, String, TextStyle)>,
    xlim: Option<(Degree, Degree)>,
    ylim: Option<(Degree, Degree)>,
    xlabel: String,
    ylabel: String,
    title: String,
    grid: bool,
}

impl SkyChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded paths with their style, in drawing order.
    pub fn paths(&self) -> &[(SkyPath, PathStyle)] {
        &self.paths
    }

    /// Recorded text annotations, in drawing order.
    pub fn texts(&self) -> &[(SkyPoint, String, TextStyle)] {
        &self.texts
    }

    pub fn xlabel(&self) -> &str {
        &self.xlabel
    }

    pub fn ylabel(&self) -> &str {
        &self.ylabel
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    /// Set both axis ranges at once: `(left, right)` and `(bottom, top)`.
    pub fn set_limits(&mut self, x: (Degree, Degree), y: (Degree, Degree)) {
        self.xlim = Some(x);
        self.ylim = Some(y);
    }

    /// Axis ranges used for rendering: the explicit limits, or the data extent
    /// with RA mirrored when none were set.
    pub fn view(&self) -> Option<((Degree, Degree), (Degree, Degree))> {
        let vertices = || self.paths.iter().flat_map(|(p, _)| p.vertices.iter());
        let x = match self.xlim {
            Some(x) => x,
            None => {
                let (min, max) = bounds(vertices().map(|v| v.ra))?;
                (max, min)
            }
        };
        let y = match self.ylim {
            Some(y) => y,
            None => bounds(vertices().map(|v| v.dec))?,
        };
        Some((x, y))
    }

    /// SVG display adaptor of `width` × `height` pixels.
    pub fn svg(&self, width: u32, height: u32) -> SvgChart<'_> {
        SvgChart {
            chart: self,
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn to_svg(&self, width: u32, height: u32) -> String {
        self.svg(width, height).to_string()
    }
}

impl PlotTarget for SkyChart {
    fn add_path(&mut self, path: &SkyPath, style: &PathStyle) {
        self.paths.push((path.clone(), style.clone()));
    }

    fn add_text(&mut self, at: SkyPoint, text: &str, style: &TextStyle) {
        self.texts.push((at, text.to_string(), style.clone()));
    }

    fn set_xlim(&mut self, left: Degree, right: Degree) {
        self.xlim = Some((left, right));
    }

    fn set_ylim(&mut self, bottom: Degree, top: Degree) {
        self.ylim = Some((bottom, top));
    }

    fn xlim(&self) -> Option<(Degree, Degree)> {
        self.xlim
    }

    fn ylim(&self) -> Option<(Degree, Degree)> {
        self.ylim
    }

    fn set_xlabel(&mut self, label: &str) {
        self.xlabel = label.to_string();
    }

    fn set_ylabel(&mut self, label: &str) {
        self.ylabel = label.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_grid(&mut self, on: bool) {
        self.grid = on;
    }
}

/// Borrowing SVG renderer of a [`SkyChart`], used with `{}`.
pub struct SvgChart<'a> {
    chart: &'a SkyChart,
    width: f64,
    height: f64,
}

/// Linear map from the chart view onto the canvas. Works for mirrored axes.
struct Frame {
    x: (Degree, Degree),
    y: (Degree, Degree),
    width: f64,
    height: f64,
}

impl Frame {
    fn project(&self, p: &SkyPoint) -> (f64, f64) {
        let sx = span(self.x);
        let sy = span(self.y);
        // `+ 0.0` turns a mirrored-axis -0.0 into 0.0
        (
            (p.ra - self.x.0) / sx * self.width + 0.0,
            self.height - (p.dec - self.y.0) / sy * self.height + 0.0,
        )
    }
}

fn span((a, b): (f64, f64)) -> f64 {
    let s = b - a;
    if s.abs() < f64::EPSILON {
        1.0
    } else {
        s
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl SvgChart<'_> {
    fn write_path(
        &self,
        f: &mut fmt::Formatter<'_>,
        frame: &Frame,
        path: &SkyPath,
        style: &PathStyle,
    ) -> fmt::Result {
        // the closing vertex is implied by Z
        let n = if path.closed {
            path.len().saturating_sub(1)
        } else {
            path.len()
        };
        let mut d = String::new();
        for (i, v) in path.vertices.iter().take(n).enumerate() {
            let (x, y) = frame.project(v);
            d.push_str(&format!("{}{x:.2},{y:.2} ", if i == 0 { "M" } else { "L" }));
        }
        if path.closed {
            d.push('Z');
        }

        let fill = if path.closed && style.fill_alpha > 0.0 {
            format!(r#"fill="{}" fill-opacity="{}""#, escape(&style.color), style.fill_alpha)
        } else {
            r#"fill="none""#.to_string()
        };
        writeln!(
            f,
            r#"  <path d="{}" stroke="{}" stroke-width="{}" {fill}/>"#,
            d.trim_end(),
            escape(&style.color),
            style.line_width,
        )
    }

    fn write_legend(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labelled = self
            .chart
            .paths
            .iter()
            .filter_map(|(_, s)| s.label.as_deref().map(|l| (l, &s.color)));
        for (i, (label, color)) in labelled.enumerate() {
            let y = 20.0 + 16.0 * i as f64;
            writeln!(
                f,
                r#"  <line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="{c}"/><text x="{xt}" y="{yt}" font-size="11">{l}</text>"#,
                x0 = self.width - 150.0,
                x1 = self.width - 130.0,
                xt = self.width - 125.0,
                yt = y + 4.0,
                c = escape(color),
                l = escape(label),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SvgChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;

        if !self.chart.title.is_empty() {
            writeln!(
                f,
                r#"  <title>{}</title>"#,
                escape(&self.chart.title)
            )?;
        }

        if let Some((x, y)) = self.chart.view() {
            let frame = Frame {
                x,
                y,
                width: self.width,
                height: self.height,
            };
            for (path, style) in &self.chart.paths {
                self.write_path(f, &frame, path, style)?;
            }
            for (at, text, style) in &self.chart.texts {
                let (px, py) = frame.project(at);
                writeln!(
                    f,
                    r#"  <text x="{px:.2}" y="{py:.2}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
                    style.size,
                    escape(&style.color),
                    escape(text)
                )?;
            }
            self.write_legend(f)?;
        }

        if !self.chart.xlabel.is_empty() {
            writeln!(
                f,
                r#"  <text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                self.width / 2.0,
                self.height - 4.0,
                escape(&self.chart.xlabel)
            )?;
        }
        if !self.chart.ylabel.is_empty() {
            writeln!(
                f,
                r#"  <text x="12" y="{y}" text-anchor="middle" transform="rotate(-90 12 {y})">{}</text>"#,
                escape(&self.chart.ylabel),
                y = self.height / 2.0
            )?;
        }

        write!(f, "</svg>")
    }
}
