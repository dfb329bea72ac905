//! 2D drawing seam and a recording implementation of it.
//!
//! `Canvas` mirrors the small subset of a browser 2D context the demo uses.
//! `DrawList` records every call; `DrawList::primitives` resolves the record
//! into styled geometry that a front end can paint and tests can inspect.

use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn set_stroke_style(&mut self, color: Color);
    fn set_fill_style(&mut self, color: Color);
    fn set_line_width(&mut self, width: f32);
    fn set_line_dash(&mut self, segments: &[f32]);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);

    fn begin_path(&mut self);
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect { x: f32, y: f32, w: f32, h: f32 },
    StrokeStyle(Color),
    FillStyle(Color),
    LineWidth(f32),
    LineDash(Vec<f32>),
    Font(String),
    TextAlign(TextAlign),
    StrokeRect { x: f32, y: f32, w: f32, h: f32 },
    FillRect { x: f32, y: f32, w: f32, h: f32 },
    BeginPath,
    Arc { cx: f32, cy: f32, radius: f32, start: f32, end: f32 },
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Fill,
    Stroke,
    FillText { text: String, x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(f32, f32),
    LineTo(f32, f32),
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        end: f32,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Returns `(cx, cy, radius)` when the path is a single full-turn arc.
    pub fn as_circle(&self) -> Option<(f32, f32, f32)> {
        match self.segments.as_slice() {
            [PathSegment::Arc {
                cx,
                cy,
                radius,
                start,
                end,
            }]
            | [PathSegment::Arc {
                cx,
                cy,
                radius,
                start,
                end,
            }, PathSegment::Close] => ((end - start).abs() >= TAU - 1e-4).then_some((*cx, *cy, *radius)),
            _ => None,
        }
    }

    /// Vertices of the path with arcs sampled every `arc_step` radians.
    pub fn flatten(&self, arc_step: f32) -> Vec<(f32, f32)> {
        let step = arc_step.max(0.01);
        let mut points = Vec::new();
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(x, y) | PathSegment::LineTo(x, y) => points.push((x, y)),
                PathSegment::Arc {
                    cx,
                    cy,
                    radius,
                    start,
                    end,
                } => {
                    let sweep = end - start;
                    let samples = ((sweep.abs() / step).ceil() as usize).max(1);
                    for i in 0..=samples {
                        let angle = start + sweep * (i as f32 / samples as f32);
                        points.push((cx + radius * angle.cos(), cy + radius * angle.sin()));
                    }
                }
                PathSegment::Close => {}
            }
        }
        points
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Close))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke {
        color: Color,
        width: f32,
        dash: Vec<f32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        paint: Paint,
    },
    Path {
        path: Path,
        paint: Paint,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Resolves the recorded commands into styled primitives. Styles persist
    /// between draws and `begin_path` resets the current path. A full clear
    /// restarts the record, so style state also starts over from the context
    /// defaults; callers set every style they rely on after clearing.
    pub fn primitives(&self) -> Vec<Primitive> {
        let mut state = PaintState::default();
        let mut path = Path::default();
        let mut out = Vec::new();

        for command in &self.commands {
            match command {
                DrawCommand::ClearRect { .. } => out.clear(),
                DrawCommand::StrokeStyle(color) => state.stroke = *color,
                DrawCommand::FillStyle(color) => state.fill = *color,
                DrawCommand::LineWidth(width) => state.line_width = *width,
                DrawCommand::LineDash(dash) => state.dash = dash.clone(),
                DrawCommand::Font(font) => state.font_size = font_px(font),
                DrawCommand::TextAlign(align) => state.align = *align,
                DrawCommand::StrokeRect { x, y, w, h } => out.push(Primitive::Rect {
                    x: *x,
                    y: *y,
                    w: *w,
                    h: *h,
                    paint: state.stroke_paint(),
                }),
                DrawCommand::FillRect { x, y, w, h } => out.push(Primitive::Rect {
                    x: *x,
                    y: *y,
                    w: *w,
                    h: *h,
                    paint: Paint::Fill(state.fill),
                }),
                DrawCommand::BeginPath => path = Path::default(),
                DrawCommand::Arc {
                    cx,
                    cy,
                    radius,
                    start,
                    end,
                } => path.segments.push(PathSegment::Arc {
                    cx: *cx,
                    cy: *cy,
                    radius: *radius,
                    start: *start,
                    end: *end,
                }),
                DrawCommand::MoveTo { x, y } => path.segments.push(PathSegment::MoveTo(*x, *y)),
                DrawCommand::LineTo { x, y } => path.segments.push(PathSegment::LineTo(*x, *y)),
                DrawCommand::ClosePath => path.segments.push(PathSegment::Close),
                DrawCommand::Fill => out.push(Primitive::Path {
                    path: path.clone(),
                    paint: Paint::Fill(state.fill),
                }),
                DrawCommand::Stroke => out.push(Primitive::Path {
                    path: path.clone(),
                    paint: state.stroke_paint(),
                }),
                DrawCommand::FillText { text, x, y } => out.push(Primitive::Text {
                    text: text.clone(),
                    x: *x,
                    y: *y,
                    size: state.font_size,
                    color: state.fill,
                    align: state.align,
                }),
            }
        }

        out
    }

    fn covers_canvas(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x <= 0.0 && y <= 0.0 && x + w >= self.width && y + h >= self.height
    }
}

impl Canvas for DrawList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        // Partial clears are not needed by the demo; a full clear restarts the record.
        if self.covers_canvas(x, y, w, h) {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::ClearRect { x, y, w, h });
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeStyle(color));
    }

    fn set_fill_style(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillStyle(color));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f32]) {
        self.commands.push(DrawCommand::LineDash(segments.to_vec()));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.commands.push(DrawCommand::TextAlign(align));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::StrokeRect { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32) {
        self.commands.push(DrawCommand::Arc {
            cx,
            cy,
            radius,
            start: start_angle,
            end: end_angle,
        });
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[derive(Debug, Clone)]
struct PaintState {
    stroke: Color,
    fill: Color,
    line_width: f32,
    dash: Vec<f32>,
    font_size: f32,
    align: TextAlign,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::BLACK,
            line_width: 1.0,
            dash: Vec::new(),
            font_size: 10.0,
            align: TextAlign::Start,
        }
    }
}

impl PaintState {
    fn stroke_paint(&self) -> Paint {
        Paint::Stroke {
            color: self.stroke,
            width: self.line_width,
            dash: self.dash.clone(),
        }
    }
}

/// Pixel size out of a CSS font shorthand such as `16px Arial, sans-serif`.
pub fn font_px(font: &str) -> f32 {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px")?.parse::<f32>().ok())
        .unwrap_or(10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_persist_across_primitives() {
        let mut list = DrawList::new(200, 200);
        list.set_fill_style(Color::rgb(1, 2, 3));
        list.fill_rect(0.0, 0.0, 10.0, 10.0);
        list.fill_rect(10.0, 10.0, 10.0, 10.0);

        let prims = list.primitives();
        assert_eq!(prims.len(), 2);
        assert!(prims
            .iter()
            .all(|p| matches!(p, Primitive::Rect { paint: Paint::Fill(c), .. } if *c == Color::rgb(1, 2, 3))));
    }

    #[test]
    fn full_clear_discards_previous_drawing() {
        let mut list = DrawList::new(200, 200);
        list.stroke_rect(20.0, 20.0, 160.0, 160.0);
        list.clear_rect(0.0, 0.0, 200.0, 200.0);
        list.fill_rect(0.0, 0.0, 5.0, 5.0);

        assert_eq!(list.commands().len(), 2);
        assert_eq!(list.primitives().len(), 1);
    }

    #[test]
    fn full_arc_resolves_to_circle() {
        let mut list = DrawList::new(200, 200);
        list.begin_path();
        list.arc(100.0, 100.0, 60.0, 0.0, TAU);
        list.stroke();

        let prims = list.primitives();
        let Primitive::Path { path, .. } = &prims[0] else {
            panic!("expected path primitive");
        };
        assert_eq!(path.as_circle(), Some((100.0, 100.0, 60.0)));
    }

    #[test]
    fn flatten_keeps_polygon_vertices() {
        let path = Path {
            segments: vec![
                PathSegment::MoveTo(0.0, 0.0),
                PathSegment::LineTo(10.0, 0.0),
                PathSegment::LineTo(0.0, 10.0),
                PathSegment::Close,
            ],
        };
        assert_eq!(path.flatten(0.1), vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(path.is_closed());
        assert_eq!(path.as_circle(), None);
    }

    #[test]
    fn parses_font_pixel_size() {
        assert_eq!(font_px("16px Arial, sans-serif"), 16.0);
        assert_eq!(font_px("bold 12px serif"), 12.0);
        assert_eq!(font_px("serif"), 10.0);
    }
}
