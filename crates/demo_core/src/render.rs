//! Shape glyphs and the empty-canvas placeholder.

use std::f32::consts::TAU;

use shared::domain::ShapeName;

use crate::canvas::{Canvas, Color, TextAlign};

pub const PLACEHOLDER_STROKE: Color = Color::rgb(0xcc, 0xcc, 0xcc);
pub const PLACEHOLDER_TEXT: Color = Color::rgb(0x99, 0x99, 0x99);
pub const PLACEHOLDER_FONT: &str = "16px Arial, sans-serif";
pub const PLACEHOLDER_PROMPT: &str = "Select a shape";
pub const PLACEHOLDER_DASH: [f32; 2] = [5.0, 5.0];
pub const PLACEHOLDER_LINE_WIDTH: f32 = 1.0;

pub const GLYPH_STROKE: Color = Color::rgb(0x21, 0x80, 0x87);
pub const GLYPH_FILL: Color = Color::rgba(33, 128, 135, 0.2);
pub const GLYPH_LINE_WIDTH: f32 = 3.0;

pub const CIRCLE_RADIUS: f32 = 60.0;
pub const SQUARE_SIZE: f32 = 100.0;
pub const TRIANGLE_HALF_WIDTH: f32 = 60.0;
pub const RECTANGLE_SIZE: (f32, f32) = (120.0, 70.0);

fn clear(canvas: &mut dyn Canvas) {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.clear_rect(0.0, 0.0, w, h);
}

pub fn draw_placeholder(canvas: &mut dyn Canvas) {
    clear(canvas);

    canvas.set_stroke_style(PLACEHOLDER_STROKE);
    canvas.set_line_width(PLACEHOLDER_LINE_WIDTH);
    canvas.set_line_dash(&PLACEHOLDER_DASH);
    canvas.stroke_rect(20.0, 20.0, 160.0, 160.0);
    canvas.set_line_dash(&[]);

    canvas.set_fill_style(PLACEHOLDER_TEXT);
    canvas.set_font(PLACEHOLDER_FONT);
    canvas.set_text_align(TextAlign::Center);
    let (cx, cy) = (canvas.width() / 2.0, canvas.height() / 2.0);
    canvas.fill_text(PLACEHOLDER_PROMPT, cx, cy);
}

pub fn draw_shape(canvas: &mut dyn Canvas, shape: ShapeName) {
    clear(canvas);

    canvas.set_stroke_style(GLYPH_STROKE);
    canvas.set_fill_style(GLYPH_FILL);
    canvas.set_line_width(GLYPH_LINE_WIDTH);

    let (cx, cy) = (canvas.width() / 2.0, canvas.height() / 2.0);

    match shape {
        ShapeName::Circle => {
            canvas.begin_path();
            canvas.arc(cx, cy, CIRCLE_RADIUS, 0.0, TAU);
            canvas.fill();
            canvas.stroke();
        }
        ShapeName::Square => {
            let x = cx - SQUARE_SIZE / 2.0;
            let y = cy - SQUARE_SIZE / 2.0;
            canvas.fill_rect(x, y, SQUARE_SIZE, SQUARE_SIZE);
            canvas.stroke_rect(x, y, SQUARE_SIZE, SQUARE_SIZE);
        }
        ShapeName::Triangle => {
            canvas.begin_path();
            canvas.move_to(cx, cy - 60.0);
            canvas.line_to(cx - TRIANGLE_HALF_WIDTH, cy + 40.0);
            canvas.line_to(cx + TRIANGLE_HALF_WIDTH, cy + 40.0);
            canvas.close_path();
            canvas.fill();
            canvas.stroke();
        }
        ShapeName::Rectangle => {
            let (w, h) = RECTANGLE_SIZE;
            let x = cx - w / 2.0;
            let y = cy - h / 2.0;
            canvas.fill_rect(x, y, w, h);
            canvas.stroke_rect(x, y, w, h);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList, Paint, PathSegment, Primitive};

    fn render(shape: Option<ShapeName>) -> Vec<Primitive> {
        let mut list = DrawList::new(200, 200);
        match shape {
            Some(shape) => draw_shape(&mut list, shape),
            None => draw_placeholder(&mut list),
        }
        list.primitives()
    }

    fn glyph_fill() -> Paint {
        Paint::Fill(GLYPH_FILL)
    }

    fn glyph_stroke() -> Paint {
        Paint::Stroke {
            color: GLYPH_STROKE,
            width: GLYPH_LINE_WIDTH,
            dash: Vec::new(),
        }
    }

    #[test]
    fn circle_is_a_single_filled_and_stroked_disc() {
        let prims = render(Some(ShapeName::Circle));
        assert_eq!(prims.len(), 2);
        for (prim, paint) in prims.iter().zip([glyph_fill(), glyph_stroke()]) {
            let Primitive::Path { path, paint: actual } = prim else {
                panic!("expected path, got {prim:?}");
            };
            assert_eq!(path.as_circle(), Some((100.0, 100.0, 60.0)));
            assert_eq!(*actual, paint);
        }
    }

    #[test]
    fn square_is_a_centered_hundred_pixel_rect() {
        let prims = render(Some(ShapeName::Square));
        assert_eq!(
            prims,
            vec![
                Primitive::Rect { x: 50.0, y: 50.0, w: 100.0, h: 100.0, paint: glyph_fill() },
                Primitive::Rect { x: 50.0, y: 50.0, w: 100.0, h: 100.0, paint: glyph_stroke() },
            ]
        );
    }

    #[test]
    fn triangle_is_a_closed_three_point_path() {
        let prims = render(Some(ShapeName::Triangle));
        assert_eq!(prims.len(), 2);
        let Primitive::Path { path, .. } = &prims[0] else {
            panic!("expected path");
        };
        assert_eq!(
            path.segments,
            vec![
                PathSegment::MoveTo(100.0, 40.0),
                PathSegment::LineTo(40.0, 140.0),
                PathSegment::LineTo(160.0, 140.0),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn rectangle_is_wider_than_tall() {
        let prims = render(Some(ShapeName::Rectangle));
        assert_eq!(
            prims[1],
            Primitive::Rect { x: 40.0, y: 65.0, w: 120.0, h: 70.0, paint: glyph_stroke() }
        );
    }

    #[test]
    fn placeholder_is_dashed_frame_with_prompt() {
        let prims = render(None);
        assert_eq!(prims.len(), 2);
        assert_eq!(
            prims[0],
            Primitive::Rect {
                x: 20.0,
                y: 20.0,
                w: 160.0,
                h: 160.0,
                paint: Paint::Stroke {
                    color: PLACEHOLDER_STROKE,
                    width: PLACEHOLDER_LINE_WIDTH,
                    dash: PLACEHOLDER_DASH.to_vec(),
                },
            }
        );
        assert!(matches!(
            &prims[1],
            Primitive::Text { text, x, y, size, align: TextAlign::Center, .. }
                if text == PLACEHOLDER_PROMPT && *x == 100.0 && *y == 100.0 && *size == 16.0
        ));
    }

    #[test]
    fn placeholder_after_glyph_sets_its_own_line_width() {
        let mut fresh = DrawList::new(200, 200);
        draw_placeholder(&mut fresh);

        let mut list = DrawList::new(200, 200);
        draw_shape(&mut list, ShapeName::Square);
        draw_placeholder(&mut list);

        assert_eq!(list.commands(), fresh.commands());
        assert!(list
            .commands()
            .contains(&DrawCommand::LineWidth(PLACEHOLDER_LINE_WIDTH)));
        let Primitive::Rect { paint: Paint::Stroke { width, .. }, .. } = &list.primitives()[0] else {
            panic!("expected a stroked frame");
        };
        assert_eq!(*width, PLACEHOLDER_LINE_WIDTH);
    }

    #[test]
    fn drawing_is_idempotent() {
        for shape in ShapeName::ALL {
            let mut list = DrawList::new(200, 200);
            draw_shape(&mut list, shape);
            let first = list.commands().to_vec();
            draw_shape(&mut list, shape);
            assert_eq!(list.commands(), first.as_slice());
        }
    }
}
