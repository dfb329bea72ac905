use crossbeam_channel::{Receiver, Sender};
use demo_core::{
    canvas::{Canvas, Color, DrawList, Paint, Primitive, TextAlign},
    surface::Element,
    AnalyzeOutcome, Document, SharedSurface, Surface,
};
use eframe::egui;
use shared::{
    domain::{ShapeName, Strategy},
    protocol::{attrs, classes, ids, COMPARISON_SLOTS},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiEvent},
    orchestration::dispatch_backend_command,
};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x21, 0x80, 0x87);
const WARN: egui::Color32 = egui::Color32::from_rgb(0xe6, 0x81, 0x61);
const PASS: egui::Color32 = egui::Color32::from_rgb(0x2e, 0x9e, 0x5b);
const IDLE_NODE: egui::Color32 = egui::Color32::from_rgb(0x5e, 0x52, 0x40);
const TRACK: egui::Color32 = egui::Color32::from_gray(60);

pub struct DemoApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    surface: SharedSurface<Document>,
    status: String,
    notice: Option<String>,
    last_error: Option<UiError>,
    analyzing: bool,
}

impl DemoApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        surface: SharedSurface<Document>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            surface,
            status: "Starting demo backend...".to_string(),
            notice: None,
            last_error: None,
            analyzing: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Notice(message) => self.notice = Some(message),
                UiEvent::ShapeSelected(shape) => {
                    self.last_error = None;
                    self.status = format!("Selected {shape}; press Analyze Shape");
                }
                UiEvent::AnalysisFinished(outcome) => {
                    self.analyzing = false;
                    if let AnalyzeOutcome::Completed {
                        rule_based,
                        network_style,
                    } = outcome
                    {
                        self.status = format!(
                            "{}: {}% / {}: {}%",
                            Strategy::RuleBased.label(),
                            rule_based.confidence,
                            Strategy::NetworkStyle.label(),
                            network_style.confidence
                        );
                    }
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), category = ?err.category(), "{}", err.message());
                    self.status = err.status_line();
                    self.last_error = Some(err);
                }
            }
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        if cmd == BackendCommand::Analyze {
            self.analyzing = true;
        }
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    /// Copies the document so painting never holds the surface lock.
    fn snapshot(&self) -> Option<Document> {
        self.surface.lock().ok().map(|doc| doc.clone())
    }

    fn show_shape_selector(&mut self, ui: &mut egui::Ui, doc: &Document) {
        ui.horizontal(|ui| {
            for shape in ShapeName::ALL {
                let Some(button) = doc
                    .query_attr(attrs::DATA_SHAPE, shape.as_str())
                    .first()
                    .and_then(|&node| doc.node(node))
                else {
                    continue;
                };
                let label = egui::RichText::new(&button.text).size(16.0);
                if ui
                    .selectable_label(button.has_class(classes::SELECTED), label)
                    .clicked()
                {
                    self.send(BackendCommand::SelectShape(shape));
                }
            }
        });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, doc: &Document) {
        ui.horizontal(|ui| {
            if let Some(trigger) = doc.get(ids::ANALYZE_BUTTON) {
                let button = egui::Button::new(egui::RichText::new(&trigger.text).strong())
                    .fill(ACCENT.gamma_multiply(0.6));
                if ui.add_enabled(!trigger.disabled, button).clicked() {
                    self.send(BackendCommand::Analyze);
                }
            }
            for (id, cmd) in [
                (ids::RESET_BUTTON, BackendCommand::Reset),
                (ids::COMPARE_ALL_BUTTON, BackendCommand::CompareAll),
            ] {
                if let Some(button) = doc.get(id) {
                    if ui
                        .add_enabled(!button.disabled, egui::Button::new(button.text.as_str()))
                        .clicked()
                    {
                        self.send(cmd);
                    }
                }
            }
        });
    }

    fn show_results(&self, ui: &mut egui::Ui, doc: &Document) {
        let opacity = doc
            .get(ids::ANALYSIS_RESULTS)
            .and_then(|results| results.style("opacity"))
            .and_then(|value| value.parse::<f32>().ok())
            .unwrap_or(1.0);

        ui.scope(|ui| {
            ui.set_opacity(opacity);
            ui.columns(2, |columns| {
                show_rule_panel(&mut columns[0], doc);
                show_network_panel(&mut columns[1], doc);
            });
        });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Compare All Shapes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.label(notice);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.notice = None;
                }
            });
        if !open {
            self.notice = None;
        }
    }
}

fn show_processing(ui: &mut egui::Ui, doc: &Document, id: &str) {
    let Some(indicator) = doc.get(id) else {
        return;
    };
    if indicator.has_class(classes::ACTIVE) {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new(&indicator.text).italics());
        });
    }
}

fn show_meter(ui: &mut egui::Ui, doc: &Document, fill_id: &str, text_id: &str) {
    let fraction = doc
        .get(fill_id)
        .and_then(|fill| fill.style("width"))
        .and_then(parse_percent)
        .unwrap_or(0.0);
    let text = doc.text(text_id).unwrap_or("0%");

    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(180.0, 12.0), egui::Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, egui::CornerRadius::same(6), TRACK);
        let mut fill = rect;
        fill.set_width(rect.width() * fraction);
        painter.rect_filled(fill, egui::CornerRadius::same(6), ACCENT);
        ui.label(egui::RichText::new(text).strong());
    });
}

fn show_rule_panel(ui: &mut egui::Ui, doc: &Document) {
    ui.heading(Strategy::RuleBased.label());
    show_processing(ui, doc, ids::TOPDOWN_PROCESSING);
    for step in doc.children(ids::RULE_STEPS) {
        if !step.has_class(classes::SHOW) {
            continue;
        }
        let color = if step.has_class(classes::PASSED) {
            PASS
        } else if step.has_class(classes::CHECKING) {
            WARN
        } else {
            ui.visuals().text_color()
        };
        ui.label(egui::RichText::new(&step.text).color(color));
    }
    ui.add_space(6.0);
    show_meter(ui, doc, ids::TOPDOWN_CONFIDENCE, ids::TOPDOWN_PERCENTAGE);
}

fn node_color(node: &Element) -> egui::Color32 {
    if node.has_class(classes::ACTIVE) {
        ACCENT
    } else if node.has_class(classes::PROCESSING) {
        WARN
    } else {
        IDLE_NODE
    }
}

fn show_network_panel(ui: &mut egui::Ui, doc: &Document) {
    ui.heading(Strategy::NetworkStyle.label());
    show_processing(ui, doc, ids::BOTTOMUP_PROCESSING);

    if doc.has_class(ids::NETWORK_VIZ, classes::ACTIVE) {
        for (layer, label) in [
            (ids::INPUT_NODES, "Input"),
            (ids::HIDDEN_NODES, "Hidden"),
            (ids::OUTPUT_NODES, "Output"),
        ] {
            ui.horizontal(|ui| {
                ui.add_sized([52.0, 18.0], egui::Label::new(egui::RichText::new(label).small()));
                for node in doc.children(layer) {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 7.0, node_color(node));
                    if let Some(title) = &node.title {
                        response.on_hover_text(title);
                    }
                }
            });
        }
    }
    ui.add_space(6.0);
    show_meter(ui, doc, ids::BOTTOMUP_CONFIDENCE, ids::BOTTOMUP_PERCENTAGE);
}

fn show_comparison(ui: &mut egui::Ui, doc: &Document) {
    let active = doc.has_class(ids::RESULTS_COMPARISON, classes::ACTIVE);
    let stroke = if active {
        egui::Stroke::new(2.0, ACCENT)
    } else {
        egui::Stroke::new(1.0, TRACK)
    };

    egui::Frame::NONE
        .stroke(stroke)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Results Comparison").strong());
            let value = |slot: &str| doc.text(slot).unwrap_or_default().to_string();
            egui::Grid::new("results-comparison")
                .num_columns(4)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.label("");
                    ui.strong("Shape");
                    ui.strong("Confidence");
                    ui.strong("Reasoning");
                    ui.end_row();

                    let (rule, network) = COMPARISON_SLOTS.split_at(3);
                    for (strategy, slots) in [
                        (Strategy::RuleBased, rule),
                        (Strategy::NetworkStyle, network),
                    ] {
                        ui.label(strategy.label());
                        for slot in slots {
                            ui.label(value(slot));
                        }
                        ui.end_row();
                    }
                });
        });
}

fn parse_percent(value: &str) -> Option<f32> {
    let number = value.trim().strip_suffix('%')?.trim().parse::<f32>().ok()?;
    Some((number / 100.0).clamp(0.0, 1.0))
}

fn to_color32(color: Color) -> egui::Color32 {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

fn stroke_shapes(points: Vec<egui::Pos2>, closed: bool, paint: &Paint) -> Vec<egui::Shape> {
    let Paint::Stroke { color, width, dash } = paint else {
        return Vec::new();
    };
    let stroke = egui::Stroke::new(*width, to_color32(*color));
    let mut points = points;
    if closed {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }
    match dash.as_slice() {
        [dash_len, gap_len, ..] => egui::Shape::dashed_line(&points, stroke, *dash_len, *gap_len),
        _ => vec![egui::Shape::line(points, stroke)],
    }
}

/// Replays the canvas record into `rect`, scaling canvas units to points.
fn paint_draw_list(painter: &egui::Painter, rect: egui::Rect, list: &DrawList) {
    let scale = egui::vec2(rect.width() / list.width(), rect.height() / list.height());
    let to_screen = |x: f32, y: f32| rect.min + egui::vec2(x * scale.x, y * scale.y);

    for primitive in list.primitives() {
        match &primitive {
            Primitive::Rect { x, y, w, h, paint } => {
                let area = egui::Rect::from_min_max(to_screen(*x, *y), to_screen(x + w, y + h));
                match paint {
                    Paint::Fill(color) => {
                        painter.rect_filled(area, egui::CornerRadius::ZERO, to_color32(*color));
                    }
                    Paint::Stroke { .. } => {
                        let corners = vec![
                            area.left_top(),
                            area.right_top(),
                            area.right_bottom(),
                            area.left_bottom(),
                        ];
                        painter.extend(stroke_shapes(corners, true, paint));
                    }
                }
            }
            Primitive::Path { path, paint } => {
                let points: Vec<egui::Pos2> = path
                    .flatten(0.1)
                    .into_iter()
                    .map(|(x, y)| to_screen(x, y))
                    .collect();
                match paint {
                    Paint::Fill(color) => {
                        painter.add(egui::Shape::convex_polygon(
                            points,
                            to_color32(*color),
                            egui::Stroke::NONE,
                        ));
                    }
                    Paint::Stroke { .. } => {
                        painter.extend(stroke_shapes(points, path.is_closed(), paint));
                    }
                }
            }
            Primitive::Text {
                text,
                x,
                y,
                size,
                color,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Center => egui::Align2::CENTER_BOTTOM,
                    TextAlign::Start => egui::Align2::LEFT_BOTTOM,
                };
                painter.text(
                    to_screen(*x, *y),
                    anchor,
                    text,
                    egui::FontId::proportional(size * scale.y),
                    to_color32(*color),
                );
            }
        }
    }
}

fn show_canvas(ui: &mut egui::Ui, doc: &Document) {
    let Some(list) = doc.canvas(ids::SHAPE_CANVAS) else {
        return;
    };
    let size = egui::vec2(list.width(), list.height());
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    painter.rect_filled(response.rect, egui::CornerRadius::same(8), egui::Color32::WHITE);
    paint_draw_list(&painter, response.rect, list);
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let text = egui::RichText::new(&self.status).small();
            if self.last_error.is_some() {
                ui.label(text.color(ui.visuals().error_fg_color));
            } else {
                ui.label(text.weak());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(doc) = self.snapshot() else {
                ui.label("Demo surface unavailable");
                return;
            };
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Top-Down vs Bottom-Up Shape Recognition");
                ui.add_space(8.0);
                self.show_shape_selector(ui, &doc);
                ui.add_space(8.0);
                show_canvas(ui, &doc);
                ui.add_space(8.0);
                self.show_controls(ui, &doc);
                ui.separator();
                self.show_results(ui, &doc);
                ui.add_space(12.0);
                show_comparison(ui, &doc);
            });
        });

        self.show_notice(ctx);

        if self.analyzing {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
