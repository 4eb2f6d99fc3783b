//! Paginating renderer for composed documents using printpdf.
//!
//! Blocks are flattened into units (single text lines, header cards, gaps)
//! and placed top to bottom; a unit that does not fit below the cursor
//! starts a new page. Lists and paragraphs therefore split line by line.

use super::compose::{Block, Document};
use super::metrics::{glyph_width, text_width};
use crate::error::ExportError;
use crate::export::markup::Inline;
use printpdf::path::PaintMode;
use printpdf::*;
use std::io::BufWriter;

/// Portrait US letter, in points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
/// Half an inch on every side.
const MARGIN: f32 = 36.0;
const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const MM_PER_PT: f32 = 25.4 / 72.0;

const FONT_SIZE_TITLE: f32 = 18.0;
const FONT_SIZE_BODY: f32 = 10.0;
const FONT_SIZE_FOOTER: f32 = 8.0;
const LEADING_TITLE: f32 = 22.0;
const LEADING_BODY: f32 = 12.0;
const LEADING_MINI_HEADER: f32 = 14.0;
const LEADING_FOOTER: f32 = 10.0;

const CARD_PADDING_X: f32 = 6.0;
const CARD_PADDING_Y: f32 = 4.0;
const CARD_BORDER: f32 = 0.25;
const KEY_COLUMN_WIDTH: f32 = 150.0;
const BULLET_INDENT: f32 = 6.0;
const BULLET_TEXT_INDENT: f32 = 18.0;
const BULLET: &str = "\u{2022}";

fn mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_PT)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    text: String,
    bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    runs: Vec<Run>,
    size: f32,
    leading: f32,
    indent: f32,
    align: Align,
    grey: bool,
    bullet: bool,
}

impl Line {
    fn body(runs: Vec<Run>) -> Self {
        Self {
            runs,
            size: FONT_SIZE_BODY,
            leading: LEADING_BODY,
            indent: 0.0,
            align: Align::Left,
            grey: false,
            bullet: false,
        }
    }

    fn width(&self) -> f32 {
        self.runs
            .iter()
            .map(|run| text_width(&run.text, self.size, run.bold))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Unit {
    Line(Line),
    Card(Vec<Line>),
    KeyValue { key: String, value: String },
    Gap(f32),
}

impl Unit {
    fn height(&self) -> f32 {
        match self {
            Unit::Line(line) => line.leading,
            Unit::Card(lines) => {
                lines.iter().map(|l| l.leading).sum::<f32>() + 2.0 * CARD_PADDING_Y
            }
            Unit::KeyValue { .. } => LEADING_MINI_HEADER,
            Unit::Gap(height) => *height,
        }
    }
}

/// Greedy word wrap of inline spans to `max_width` points.
fn wrap(spans: &[Inline], size: f32, max_width: f32) -> Vec<Vec<Run>> {
    let mut lines: Vec<Vec<Run>> = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    let mut width = 0.0;

    for span in spans {
        let (text, bold) = match span {
            Inline::LineBreak => {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
                continue;
            }
            Inline::Text { text, bold } => (text.as_str(), *bold),
        };

        for word in text.split_inclusive(' ') {
            let mut word = word.to_string();
            let mut word_width = text_width(&word, size, bold);

            if width + word_width > max_width && width > 0.0 {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
                word = word.trim_start().to_string();
                word_width = text_width(&word, size, bold);
            }

            // A single word wider than the frame is broken by characters.
            while word_width > max_width {
                let split = fitting_prefix(&word, size, bold, max_width);
                let tail = word.split_off(split);
                lines.push(vec![Run { text: word, bold }]);
                word = tail;
                word_width = text_width(&word, size, bold);
            }

            push_run(&mut current, &word, bold);
            width += word_width;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the longest prefix of `word` that fits in `max_width`,
/// never less than one character.
fn fitting_prefix(word: &str, size: f32, bold: bool, max_width: f32) -> usize {
    let mut units = 0u32;
    let mut end = 0;
    for (idx, c) in word.char_indices() {
        units += u32::from(glyph_width(c, bold));
        if units as f32 * size / 1000.0 > max_width && idx > 0 {
            break;
        }
        end = idx + c.len_utf8();
    }
    end
}

fn push_run(runs: &mut Vec<Run>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.bold == bold => last.text.push_str(text),
        _ => runs.push(Run {
            text: text.to_string(),
            bold,
        }),
    }
}

/// Flatten blocks into placeable units.
fn layout(blocks: &[Block]) -> Vec<Unit> {
    let mut units = Vec::new();

    for block in blocks {
        match block {
            Block::Title(title) => {
                let spans = [Inline::bold(title.as_str())];
                for runs in wrap(&spans, FONT_SIZE_TITLE, FRAME_WIDTH) {
                    units.push(Unit::Line(Line {
                        size: FONT_SIZE_TITLE,
                        leading: LEADING_TITLE,
                        align: Align::Center,
                        ..Line::body(runs)
                    }));
                }
            }
            Block::Paragraph(spans) => {
                for runs in wrap(spans, FONT_SIZE_BODY, FRAME_WIDTH) {
                    units.push(Unit::Line(Line::body(runs)));
                }
            }
            Block::HeaderCard(spans) => {
                let inner = FRAME_WIDTH - 2.0 * CARD_PADDING_X;
                let lines = wrap(spans, FONT_SIZE_BODY, inner)
                    .into_iter()
                    .map(Line::body)
                    .collect();
                units.push(Unit::Card(lines));
            }
            Block::KeyValueTable(rows) => {
                for (key, value) in rows {
                    units.push(Unit::KeyValue {
                        key: key.clone(),
                        value: value.clone(),
                    });
                }
            }
            Block::MiniHeader(title) => {
                units.push(Unit::Line(Line {
                    leading: LEADING_MINI_HEADER,
                    ..Line::body(vec![Run {
                        text: title.clone(),
                        bold: true,
                    }])
                }));
            }
            Block::BulletList(items) => {
                let inner = FRAME_WIDTH - BULLET_TEXT_INDENT;
                for item in items {
                    let spans = [Inline::text(item.as_str())];
                    for (idx, runs) in wrap(&spans, FONT_SIZE_BODY, inner).into_iter().enumerate() {
                        units.push(Unit::Line(Line {
                            indent: BULLET_TEXT_INDENT,
                            bullet: idx == 0,
                            ..Line::body(runs)
                        }));
                    }
                }
            }
            Block::Spacer(height) => units.push(Unit::Gap(*height)),
            Block::Footer(spans) => {
                for runs in wrap(spans, FONT_SIZE_FOOTER, FRAME_WIDTH) {
                    units.push(Unit::Line(Line {
                        size: FONT_SIZE_FOOTER,
                        leading: LEADING_FOOTER,
                        align: Align::Center,
                        grey: true,
                        ..Line::body(runs)
                    }));
                }
            }
        }
    }

    units
}

/// Where the next unit goes.
struct Step {
    new_page: bool,
    /// Top edge to draw at, `None` when the unit is dropped.
    top: Option<f32>,
}

/// Vertical flow over fixed-size pages, in points from the bottom.
struct Flow {
    cursor: f32,
    pages: usize,
}

impl Flow {
    fn new() -> Self {
        Self {
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
        }
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= PAGE_HEIGHT - MARGIN
    }

    fn break_page(&mut self) {
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn advance(&mut self, unit: &Unit) -> Step {
        let height = unit.height();

        if let Unit::Gap(_) = unit {
            // Gaps never carry over to the top of a fresh page.
            if self.at_page_top() {
                return Step { new_page: false, top: None };
            }
            if self.cursor - height < MARGIN {
                self.break_page();
                return Step { new_page: true, top: None };
            }
            self.cursor -= height;
            return Step { new_page: false, top: None };
        }

        let new_page = self.cursor - height < MARGIN && !self.at_page_top();
        if new_page {
            self.break_page();
        }
        let top = self.cursor;
        self.cursor -= height;
        Step { new_page, top: Some(top) }
    }
}

/// Page writer for the units of one document.
struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    flow: Flow,
}

impl Canvas {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            flow: Flow::new(),
        })
    }

    fn place(&mut self, unit: &Unit) {
        let step = self.flow.advance(unit);
        if step.new_page {
            let (page, layer) = self.doc.add_page(
                mm(PAGE_WIDTH),
                mm(PAGE_HEIGHT),
                format!("Page {}", self.flow.pages),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
        }

        let Some(top) = step.top else { return };
        match unit {
            Unit::Line(line) => self.draw_line(line, MARGIN, top),
            Unit::Card(lines) => self.draw_card(lines, top, unit.height()),
            Unit::KeyValue { key, value } => self.draw_key_value(key, value, top),
            Unit::Gap(_) => {}
        }
    }

    fn draw_line(&self, line: &Line, left: f32, top: f32) {
        let frame = FRAME_WIDTH - (left - MARGIN) * 2.0;
        let mut x = match line.align {
            Align::Left => left + line.indent,
            Align::Center => left + ((frame - line.width()) / 2.0).max(0.0),
        };
        let baseline = top - line.leading + (line.leading - line.size) / 2.0 + line.size * 0.2;

        self.layer
            .set_fill_color(if line.grey { rgb(128, 128, 128) } else { rgb(0, 0, 0) });

        if line.bullet {
            self.layer.use_text(
                BULLET,
                line.size,
                mm(left + BULLET_INDENT),
                mm(baseline),
                &self.regular,
            );
        }

        for run in &line.runs {
            let font = if run.bold { &self.bold } else { &self.regular };
            self.layer
                .use_text(run.text.as_str(), line.size, mm(x), mm(baseline), font);
            x += text_width(&run.text, line.size, run.bold);
        }
    }

    fn draw_card(&self, lines: &[Line], top: f32, height: f32) {
        let bottom = top - height;
        self.layer.set_fill_color(rgb(245, 245, 245));
        self.layer.set_outline_color(rgb(128, 128, 128));
        self.layer.set_outline_thickness(CARD_BORDER);
        self.layer.add_rect(
            Rect::new(
                mm(MARGIN),
                mm(bottom),
                mm(MARGIN + FRAME_WIDTH),
                mm(top),
            )
            .with_mode(PaintMode::FillStroke),
        );

        let mut top = top - CARD_PADDING_Y;
        for line in lines {
            self.draw_line(line, MARGIN + CARD_PADDING_X, top);
            top -= line.leading;
        }
    }

    fn draw_key_value(&self, key: &str, value: &str, top: f32) {
        let key_line = Line {
            leading: LEADING_MINI_HEADER,
            ..Line::body(vec![Run {
                text: key.to_string(),
                bold: false,
            }])
        };
        let value_line = Line {
            indent: KEY_COLUMN_WIDTH,
            ..key_line.clone()
        };
        let value_line = Line {
            runs: vec![Run {
                text: value.to_string(),
                bold: true,
            }],
            ..value_line
        };
        self.draw_line(&key_line, MARGIN, top);
        self.draw_line(&value_line, MARGIN, top);
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf)?;
        buf.into_inner()
            .map_err(|err| ExportError::Layout(err.to_string()))
    }
}

/// Render a composed document to PDF bytes.
pub fn render(document: &Document) -> Result<Vec<u8>, ExportError> {
    let mut canvas = Canvas::new(&document.title)?;
    for unit in layout(&document.blocks) {
        canvas.place(&unit);
    }
    tracing::debug!(pages = canvas.flow.pages, title = %document.title, "rendered PDF");
    canvas.finish()
}

/// Number of pages `document` would occupy.
pub fn page_count(document: &Document) -> usize {
    let mut flow = Flow::new();
    for unit in layout(&document.blocks) {
        flow.advance(&unit);
    }
    flow.pages
}
