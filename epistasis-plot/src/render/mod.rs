//! Draws a [`Figure`] scene graph onto a plotters drawing area.
//!
//! Axis decoration (ticks, labels, titles) goes through plotters'
//! `ChartBuilder`; artists are mapped to pixels here and drawn on the root
//! area so dashes, caps and markers follow the figure's dpi.

pub mod svg;

pub use svg::{render_to_file, render_to_string};

use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, warn};

use epistasis_core::color::{cycle_color, Color};
use epistasis_core::figure::{
    format_tick, nice_step, Artist, Axes, BarSeries, CellGrid, Figure, LineStyle, Marker, Projection, Style,
    MAX_TICKS,
};
use epistasis_core::model::ErrorBounds;
use epistasis_core::stats::finite_range;

use crate::config::PlotConfig;
use crate::error::PlotError;

pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

fn rgba(c: Color) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.opacity())
}

type Px = (f64, f64);

fn ipx(p: Px) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

/// Widens a degenerate or non-finite range so it can be mapped.
fn usable_range((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

// ─── Pixel geometry ──────────────────────────────────────────────────

/// Data limits of a 2D panel and the pixel rectangle they map onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Frame {
    pub fn map(&self, x: f64, y: f64) -> Px {
        let fx = (x - self.xlim.0) / (self.xlim.1 - self.xlim.0);
        let fy = (y - self.ylim.0) / (self.ylim.1 - self.ylim.0);
        (
            self.left + fx * (self.right - self.left),
            self.bottom - fy * (self.bottom - self.top),
        )
    }

    /// Liang-Barsky clipping of a pixel segment to the frame.
    pub fn clip(&self, p0: Px, p1: Px) -> Option<(Px, Px)> {
        let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        let edges = [
            (-dx, p0.0 - self.left),
            (dx, self.right - p0.0),
            (-dy, p0.1 - self.top),
            (dy, self.bottom - p0.1),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
        Some(((p0.0 + t0 * dx, p0.1 + t0 * dy), (p0.0 + t1 * dx, p0.1 + t1 * dy)))
    }

    pub fn contains(&self, p: Px) -> bool {
        p.0 >= self.left - 0.5 && p.0 <= self.right + 0.5 && p.1 >= self.top - 0.5 && p.1 <= self.bottom + 0.5
    }

    /// Pixel rectangle of a data rectangle, clamped to the frame.
    pub fn rect(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> Option<(Px, Px)> {
        let (a, b) = (self.map(x0, y0), self.map(x1, y1));
        let left = a.0.min(b.0).max(self.left);
        let right = a.0.max(b.0).min(self.right);
        let top = a.1.min(b.1).max(self.top);
        let bottom = a.1.max(b.1).min(self.bottom);
        (left < right && top < bottom).then_some(((left, top), (right, bottom)))
    }
}

/// On/off dash lengths in units of the line width, matplotlib's scaled
/// dash patterns.
fn dash_pattern(line: LineStyle) -> &'static [f64] {
    match line {
        LineStyle::Dashed => &[3.7, 1.6],
        LineStyle::Dotted => &[1.0, 1.65],
        LineStyle::DashDot => &[6.4, 1.6, 1.0, 1.6],
        LineStyle::Solid | LineStyle::None => &[],
    }
}

/// Splits a polyline into the "on" pieces of a dash pattern given in
/// pixels. The pattern phase carries across vertices.
pub(crate) fn dash_segments(points: &[Px], pattern: &[f64]) -> Vec<(Px, Px)> {
    let mut out = Vec::new();
    if pattern.is_empty() || pattern.iter().all(|d| *d <= 0.0) {
        return points.windows(2).map(|w| (w[0], w[1])).collect();
    }
    let mut idx = 0;
    let mut left = pattern[0];
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        let mut pos = 0.0;
        while pos < len {
            let step = left.min(len - pos);
            if idx % 2 == 0 {
                let t0 = pos / len;
                let t1 = (pos + step) / len;
                out.push((
                    (a.0 + t0 * (b.0 - a.0), a.1 + t0 * (b.1 - a.1)),
                    (a.0 + t1 * (b.0 - a.0), a.1 + t1 * (b.1 - a.1)),
                ));
            }
            pos += step;
            left -= step;
            if left <= 1e-9 {
                idx = (idx + 1) % pattern.len();
                left = pattern[idx].max(1e-3);
            }
        }
    }
    out
}

// ─── Painter ─────────────────────────────────────────────────────────

/// Draws primitives in absolute pixels at a fixed points-to-pixels scale.
struct Painter<'a, DB: DrawingBackend> {
    root: &'a DrawingArea<DB, Shift>,
    /// Pixels per point.
    scale: f64,
    font: &'a str,
}

impl<'a, DB: DrawingBackend> Painter<'a, DB> {
    fn pt(&self, points: f64) -> f64 {
        points * self.scale
    }

    fn stroke(&self, color: Color, width_pt: f64) -> ShapeStyle {
        ShapeStyle {
            color: rgba(color),
            filled: false,
            stroke_width: self.pt(width_pt).round().max(1.0) as u32,
        }
    }

    fn fill(&self, color: Color) -> ShapeStyle {
        ShapeStyle {
            color: rgba(color),
            filled: true,
            stroke_width: 0,
        }
    }

    fn segment(&self, a: Px, b: Px, style: ShapeStyle) -> Result<(), PlotError> {
        self.root
            .draw(&PathElement::new(vec![ipx(a), ipx(b)], style))
            .map_err(render_err)
    }

    /// Polyline in data space, split at non-finite points, dashed and
    /// clipped to `frame`.
    fn polyline(&self, frame: &Frame, xs: &[f64], ys: &[f64], style: &Style) -> Result<(), PlotError> {
        if !style.draws_line() {
            return Ok(());
        }
        let shape = self.stroke(style.color, style.line_width);
        let pattern: Vec<f64> = dash_pattern(style.line)
            .iter()
            .map(|d| self.pt(d * style.line_width))
            .collect();
        let mut run: Vec<Px> = Vec::new();
        let points = xs.iter().zip(ys).map(|(&x, &y)| (x.is_finite() && y.is_finite()).then(|| frame.map(x, y)));
        for point in points.chain(std::iter::once(None)) {
            match point {
                Some(p) => run.push(p),
                None => {
                    for (a, b) in dash_segments(&run, &pattern) {
                        if let Some((a, b)) = frame.clip(a, b) {
                            self.segment(a, b, shape)?;
                        }
                    }
                    run.clear();
                }
            }
        }
        Ok(())
    }

    fn marker(&self, at: Px, marker: Marker, size_pt: f64, color: Color) -> Result<(), PlotError> {
        let r = (self.pt(size_pt) / 2.0).max(1.0);
        let (x, y) = ipx(at);
        let ri = r.round() as i32;
        let fill = self.fill(color);
        let line = self.stroke(color, 1.0);
        let drawn = match marker {
            Marker::None => return Ok(()),
            Marker::Point => self.root.draw(&Circle::new((x, y), (r / 2.0).round().max(1.0) as i32, fill)),
            Marker::Circle => self.root.draw(&Circle::new((x, y), ri, fill)),
            Marker::Square => self.root.draw(&Rectangle::new([(x - ri, y - ri), (x + ri, y + ri)], fill)),
            Marker::Triangle => self.root.draw(&Polygon::new(
                vec![(x, y - ri), (x - ri, y + ri), (x + ri, y + ri)],
                fill,
            )),
            Marker::Cross => self
                .root
                .draw(&PathElement::new(vec![(x - ri, y - ri), (x + ri, y + ri)], line))
                .and_then(|_| {
                    self.root
                        .draw(&PathElement::new(vec![(x - ri, y + ri), (x + ri, y - ri)], line))
                }),
            Marker::Plus => self
                .root
                .draw(&PathElement::new(vec![(x - ri, y), (x + ri, y)], line))
                .and_then(|_| self.root.draw(&PathElement::new(vec![(x, y - ri), (x, y + ri)], line))),
            Marker::Star => {
                let vertices: Vec<(i32, i32)> = (0..10)
                    .map(|k| {
                        let radius = if k % 2 == 0 { r } else { r * 0.4 };
                        let angle = std::f64::consts::PI * (k as f64 / 5.0 - 0.5);
                        ipx((at.0 + radius * angle.cos(), at.1 + radius * angle.sin()))
                    })
                    .collect();
                self.root.draw(&Polygon::new(vertices, fill))
            }
        };
        drawn.map_err(render_err)
    }

    fn markers(&self, frame: &Frame, xs: &[f64], ys: &[f64], style: &Style) -> Result<(), PlotError> {
        if !style.draws_markers() {
            return Ok(());
        }
        for (&x, &y) in xs.iter().zip(ys) {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            let p = frame.map(x, y);
            if frame.contains(p) {
                self.marker(p, style.marker, style.marker_size, style.color)?;
            }
        }
        Ok(())
    }

    /// Vertical error bar with caps `cap_pt` points to either side.
    fn error_bar(
        &self,
        frame: &Frame,
        x: f64,
        lo: f64,
        hi: f64,
        cap_pt: f64,
        color: Color,
        width_pt: f64,
    ) -> Result<(), PlotError> {
        if !(x.is_finite() && lo.is_finite() && hi.is_finite()) {
            return Ok(());
        }
        let style = self.stroke(color, width_pt);
        let (a, b) = (frame.map(x, lo), frame.map(x, hi));
        if let Some((a, b)) = frame.clip(a, b) {
            self.segment(a, b, style)?;
        }
        if cap_pt > 0.0 {
            let half = self.pt(cap_pt);
            for end in [a, b] {
                if frame.contains(end) {
                    self.segment((end.0 - half, end.1), (end.0 + half, end.1), style)?;
                }
            }
        }
        Ok(())
    }

    fn text(&self, at: Px, text: &str, size_pt: f64, color: Color) -> Result<(), PlotError> {
        let style = (self.font, self.pt(size_pt))
            .into_font()
            .color(&rgba(color))
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        self.root
            .draw(&Text::new(text.to_string(), ipx(at), style))
            .map_err(render_err)
    }

    // ─── Artists ──────────────────────────────────────────────────

    fn artist(&self, frame: &Frame, artist: &Artist) -> Result<(), PlotError> {
        match artist {
            Artist::Line { xs, ys, style } => {
                self.polyline(frame, xs, ys, style)?;
                self.markers(frame, xs, ys, style)
            }
            Artist::Bars(bars) => self.bars(frame, bars),
            Artist::ErrorBars {
                xs,
                ys,
                yerr,
                style,
                capsize,
            } => self.error_bars(frame, xs, ys, yerr, style, *capsize),
            Artist::HLine { y, xmin, xmax, style } => self.polyline(frame, &[*xmin, *xmax], &[*y, *y], style),
            Artist::Segment { x, y, style } => self.polyline(frame, &[x.0, x.1], &[y.0, y.1], style),
            Artist::Stem { xs, ys, stem, baseline } => {
                for (&x, &y) in xs.iter().zip(ys) {
                    self.polyline(frame, &[x, x], &[0.0, y], stem)?;
                }
                self.markers(frame, xs, ys, stem)?;
                if let (Some(style), Some((lo, hi))) = (baseline, finite_range(xs)) {
                    self.polyline(frame, &[lo, hi], &[0.0, 0.0], style)?;
                }
                Ok(())
            }
            Artist::Text {
                x,
                y,
                text,
                size,
                color,
            } => self.text(frame.map(*x, *y), text, *size, *color),
            Artist::Cells(grid) => self.cells(frame, grid),
            Artist::Line3D { .. } | Artist::Scatter3D { .. } | Artist::Arrow3D { .. } => {
                warn!("3D artist on a 2D panel is not drawn");
                Ok(())
            }
        }
    }

    fn bars(&self, frame: &Frame, bars: &BarSeries) -> Result<(), PlotError> {
        let half = bars.width / 2.0;
        for (i, (&x, &h)) in bars.x.iter().zip(&bars.heights).enumerate() {
            if !(x.is_finite() && h.is_finite()) {
                continue;
            }
            let color = bars.colors.get(i).copied().unwrap_or_else(|| cycle_color(0));
            if let Some((a, b)) = frame.rect(x - half, x + half, 0.0, h) {
                self.root
                    .draw(&Rectangle::new([ipx(a), ipx(b)], self.fill(color)))
                    .map_err(render_err)?;
                if let Some(edge) = bars.edge {
                    self.root
                        .draw(&Rectangle::new([ipx(a), ipx(b)], self.stroke(edge, 1.0)))
                        .map_err(render_err)?;
                }
            }
            if let Some(err) = &bars.yerr {
                let (lo, hi) = (err.lower.get(i).copied(), err.upper.get(i).copied());
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    self.error_bar(frame, x, h - lo, h + hi, bars.capsize, bars.ecolor, 1.0)?;
                }
            }
        }
        Ok(())
    }

    fn error_bars(
        &self,
        frame: &Frame,
        xs: &[f64],
        ys: &[f64],
        yerr: &ErrorBounds,
        style: &Style,
        capsize: f64,
    ) -> Result<(), PlotError> {
        self.polyline(frame, xs, ys, style)?;
        for (i, (&x, &y)) in xs.iter().zip(ys).enumerate() {
            if let (Some(lo), Some(hi)) = (yerr.lower.get(i), yerr.upper.get(i)) {
                self.error_bar(frame, x, y - lo, y + hi, capsize, style.color, style.line_width)?;
            }
        }
        self.markers(frame, xs, ys, style)
    }

    fn cells(&self, frame: &Frame, grid: &CellGrid) -> Result<(), PlotError> {
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let Some(color) = grid.get(row, col) else {
                    continue;
                };
                let (x0, x1, y0, y1) = grid.cell_rect(row, col);
                if let Some((a, b)) = frame.rect(x0, x1, y0, y1) {
                    self.root
                        .draw(&Rectangle::new([ipx(a), ipx(b)], self.fill(color)))
                        .map_err(render_err)?;
                }
            }
        }
        Ok(())
    }
}

// ─── Panels ──────────────────────────────────────────────────────────

fn draw_panel_2d<DB: DrawingBackend>(
    painter: &Painter<'_, DB>,
    area: &DrawingArea<DB, Shift>,
    ax: &Axes,
) -> Result<(), PlotError> {
    let xlim = usable_range(ax.effective_xlim());
    let ylim = usable_range(ax.effective_ylim());
    let show_x = ax.axis_on && ax.x_axis_visible;
    let show_y = ax.axis_on && ax.y_axis_visible;
    let font = painter.font;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(painter.pt(8.0).round() as u32)
        .x_label_area_size(if show_x { painter.pt(30.0).round() as u32 } else { 0 })
        .y_label_area_size(if show_y { painter.pt(45.0).round() as u32 } else { 0 });
    if let Some(title) = &ax.title {
        builder.caption(title, (font, painter.pt(ax.title_size)).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(xlim.0..xlim.1, ylim.0..ylim.1)
        .map_err(render_err)?;

    if ax.axis_on {
        let xstep = nice_step(xlim.1 - xlim.0, MAX_TICKS);
        let ystep = nice_step(ylim.1 - ylim.0, MAX_TICKS);
        let xfmt = |v: &f64| format_tick(*v, xstep);
        let yfmt = |v: &f64| format_tick(*v, ystep);
        let frame_color = if ax.frame_on && (ax.spines.left || ax.spines.bottom) {
            Color::BLACK
        } else {
            Color::TRANSPARENT
        };
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(MAX_TICKS)
            .y_labels(MAX_TICKS)
            .x_label_formatter(&xfmt)
            .y_label_formatter(&yfmt)
            .label_style((font, painter.pt(10.0)).into_font())
            .axis_desc_style((font, painter.pt(ax.xlabel_size)).into_font())
            .axis_style(painter.stroke(frame_color, 0.8));
        if let Some(label) = &ax.xlabel {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &ax.ylabel {
            mesh.y_desc(label.as_str());
        }
        if !show_x {
            mesh.disable_x_axis();
        }
        if !show_y {
            mesh.disable_y_axis();
        }
        mesh.draw().map_err(render_err)?;
    }

    let (px, py) = chart.plotting_area().get_pixel_range();
    let frame = Frame {
        xlim,
        ylim,
        left: px.start as f64,
        right: (px.end - 1) as f64,
        top: py.start as f64,
        bottom: (py.end - 1) as f64,
    };

    for artist in ax.artists() {
        painter.artist(&frame, artist)?;
    }

    if ax.axis_on && ax.frame_on {
        let edge = painter.stroke(Color::BLACK, 0.8);
        if ax.spines.top {
            painter.segment((frame.left, frame.top), (frame.right, frame.top), edge)?;
        }
        if ax.spines.right {
            painter.segment((frame.right, frame.top), (frame.right, frame.bottom), edge)?;
        }
    }
    Ok(())
}

fn draw_panel_3d<DB: DrawingBackend>(
    painter: &Painter<'_, DB>,
    area: &DrawingArea<DB, Shift>,
    ax: &Axes,
) -> Result<(), PlotError> {
    let [xl, yl, zl] = ax.effective_limits3d().map(usable_range);
    let mut builder = ChartBuilder::on(area);
    builder.margin(painter.pt(14.0).round() as u32);
    if let Some(title) = &ax.title {
        builder.caption(title, (painter.font, painter.pt(ax.title_size)).into_font());
    }
    let mut chart = builder
        .build_cartesian_3d(xl.0..xl.1, zl.0..zl.1, yl.0..yl.1)
        .map_err(render_err)?;
    let (yaw, pitch) = (ax.view.azimuth.to_radians(), ax.view.elevation.to_radians());
    chart.with_projection(|mut pb| {
        pb.yaw = yaw;
        pb.pitch = pitch;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    if ax.axis_on {
        chart
            .configure_axes()
            .label_style((painter.font, painter.pt(8.0)).into_font())
            .draw()
            .map_err(render_err)?;
    }

    // plotters puts the second coordinate on the vertical axis.
    let to3 = |p: &[f64; 3]| (p[0], p[2], p[1]);
    for artist in ax.artists() {
        match artist {
            Artist::Line3D { points, style } => {
                chart
                    .draw_series(LineSeries::new(
                        points.iter().map(to3),
                        painter.stroke(style.color, style.line_width),
                    ))
                    .map_err(render_err)?;
            }
            Artist::Scatter3D { points, colors, size } => {
                let radius = (size.sqrt() / 2.0 * painter.scale).round().max(1.0) as i32;
                chart
                    .draw_series(points.iter().enumerate().map(|(i, p)| {
                        let color = match colors.len() {
                            0 => cycle_color(i),
                            n => colors[i % n],
                        };
                        Circle::new(to3(p), radius, painter.fill(color))
                    }))
                    .map_err(render_err)?;
            }
            Artist::Arrow3D { from, to, color, width } => {
                let style = painter.stroke(*color, *width);
                let coords = chart.as_coord_spec();
                let a = coords.translate(&to3(from));
                let b = coords.translate(&to3(to));
                painter
                    .root
                    .draw(&PathElement::new(vec![a, b], style))
                    .map_err(render_err)?;
                arrow_head(painter, a, b, *color)?;
            }
            other => {
                debug!(?other, "2D artist on a 3D panel is not drawn");
            }
        }
    }
    Ok(())
}

fn arrow_head<DB: DrawingBackend>(
    painter: &Painter<'_, DB>,
    from: (i32, i32),
    to: (i32, i32),
    color: Color,
) -> Result<(), PlotError> {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return Ok(());
    }
    let (ux, uy) = (dx / len, dy / len);
    let size = painter.pt(6.0).min(len / 2.0);
    let tip = (to.0 as f64, to.1 as f64);
    let base = (tip.0 - ux * size, tip.1 - uy * size);
    let left = (base.0 - uy * size / 2.0, base.1 + ux * size / 2.0);
    let right = (base.0 + uy * size / 2.0, base.1 - ux * size / 2.0);
    painter
        .root
        .draw(&Polygon::new(vec![ipx(tip), ipx(left), ipx(right)], painter.fill(color)))
        .map_err(render_err)
}

/// Draws every panel of `figure` onto `root`, which must span the whole
/// figure at `dpi`.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    config: &PlotConfig,
    dpi: u32,
) -> Result<(), PlotError> {
    root.fill(&rgba(config.background)).map_err(render_err)?;
    let painter = Painter {
        root,
        scale: dpi as f64 / 72.0,
        font: &config.font_family,
    };

    let fractions = figure.panel_fractions();
    let (_, height) = root.dim_in_pixel();
    let mut rest = root.clone();
    let mut areas = Vec::with_capacity(figure.panels.len());
    for (i, fraction) in fractions.iter().enumerate() {
        if i + 1 == fractions.len() {
            areas.push(rest.clone());
            break;
        }
        let h = (fraction * height as f64).round() as i32;
        let (top, bottom) = rest.split_vertically(h);
        areas.push(top);
        rest = bottom;
    }

    for (ax, area) in figure.panels.iter().zip(&areas) {
        match ax.projection {
            Projection::Cartesian2d => draw_panel_2d(&painter, area, ax)?,
            Projection::Cartesian3d => draw_panel_3d(&painter, area, ax)?,
        }
    }
    debug!(panels = areas.len(), dpi, "figure drawn");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            xlim: (0.0, 10.0),
            ylim: (0.0, 10.0),
            left: 0.0,
            right: 100.0,
            top: 0.0,
            bottom: 100.0,
        }
    }

    #[test]
    fn frame_maps_with_y_down() {
        let f = frame();
        assert_eq!(f.map(0.0, 0.0), (0.0, 100.0));
        assert_eq!(f.map(10.0, 10.0), (100.0, 0.0));
        assert_eq!(f.map(5.0, 2.5), (50.0, 75.0));
    }

    #[test]
    fn clip_trims_to_frame() {
        let f = frame();
        let (a, b) = f.clip((-50.0, 50.0), (150.0, 50.0)).unwrap();
        assert_eq!(a, (0.0, 50.0));
        assert_eq!(b, (100.0, 50.0));
        assert!(f.clip((-10.0, -10.0), (-5.0, 200.0)).is_none());
        let inside = f.clip((10.0, 10.0), (20.0, 20.0)).unwrap();
        assert_eq!(inside, ((10.0, 10.0), (20.0, 20.0)));
    }

    #[test]
    fn rect_is_clamped() {
        let f = frame();
        let (a, b) = f.rect(-1.0, 5.0, 0.0, 20.0).unwrap();
        assert_eq!(a, (0.0, 0.0));
        assert_eq!(b, (50.0, 100.0));
        assert!(f.rect(11.0, 12.0, 0.0, 1.0).is_none());
    }

    #[test]
    fn dashes_cover_pattern_fraction() {
        let segs = dash_segments(&[(0.0, 0.0), (100.0, 0.0)], &[6.0, 4.0]);
        assert_eq!(segs.len(), 10);
        let on: f64 = segs.iter().map(|(a, b)| b.0 - a.0).sum();
        assert!((on - 60.0).abs() < 1e-9);
        assert_eq!(segs[1].0, (10.0, 0.0));
    }

    #[test]
    fn dash_phase_carries_across_vertices() {
        let segs = dash_segments(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)], &[4.0, 2.0]);
        assert_eq!(segs[0], ((0.0, 0.0), (3.0, 0.0)));
        assert_eq!(segs[1], ((3.0, 0.0), (3.0, 1.0)));
    }

    #[test]
    fn solid_lines_are_not_split() {
        let pts = [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(dash_segments(&pts, &[]).len(), 2);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(usable_range((1.0, 1.0)), (0.5, 1.5));
        assert_eq!(usable_range((f64::NAN, 1.0)), (0.0, 1.0));
        assert_eq!(usable_range((0.0, 2.0)), (0.0, 2.0));
    }
}
