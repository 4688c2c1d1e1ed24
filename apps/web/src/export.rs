//! Result image export.
//!
//! The result card is laid out as a list of draw operations (pure, testable
//! natively) and replayed on an off-screen canvas at 2x density. The PNG is
//! handed to the browser as a download; nothing goes to the server.

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use crate::models::NegotiableItem;
use crate::summary::{format_amount, ItemRowModel, Totals};

pub const EXPORT_FILENAME: &str = "result.png";
/// Device pixels per CSS pixel in the exported bitmap.
pub const EXPORT_SCALE: f64 = 2.0;
/// Pause before capture so the last render has been painted.
pub const SETTLE_DELAY_MS: u32 = 100;

const CARD_WIDTH: f64 = 480.0;
const PADDING: f64 = 24.0;
const SUMMARY_HEIGHT: f64 = 124.0;
const ROW_GAP: f64 = 12.0;
const ROW_BASE_HEIGHT: f64 = 52.0;
const REASON_LINE_HEIGHT: f64 = 16.0;
/// Reason wrap width, in half-width character units.
const REASON_WRAP_UNITS: usize = 42;
const NAME_LINE_HEIGHT: f64 = 18.0;
/// Name wrap width, in half-width character units. Keeps names left of the
/// price column (about 140px at 14px text).
const NAME_WRAP_UNITS: usize = 34;
const FOOTER_HEIGHT: f64 = 40.0;

const FONT_FAMILY: &str = "\"Hiragino Sans\", \"Noto Sans JP\", sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_canvas(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &'static str,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        /// Pixel size.
        size: f64,
        bold: bool,
        color: &'static str,
        align: Align,
        strike: bool,
    },
}

impl DrawOp {
    fn text(x: f64, y: f64, text: impl Into<String>, size: f64, color: &'static str) -> Self {
        DrawOp::Text {
            x,
            y,
            text: text.into(),
            size,
            bold: false,
            color,
            align: Align::Left,
            strike: false,
        }
    }

    fn bold(mut self) -> Self {
        if let DrawOp::Text { bold, .. } = &mut self {
            *bold = true;
        }
        self
    }

    fn aligned(mut self, to: Align) -> Self {
        if let DrawOp::Text { align, .. } = &mut self {
            *align = to;
        }
        self
    }

    fn struck(mut self) -> Self {
        if let DrawOp::Text { strike, .. } = &mut self {
            *strike = true;
        }
        self
    }
}

/// Card size in CSS pixels plus the operations that paint it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLayout {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

/// Lays out the result card: summary block, one row per item, footer.
pub fn layout_result(items: &[NegotiableItem]) -> ExportLayout {
    let totals = Totals::from_items(items);
    let inner_width = CARD_WIDTH - PADDING * 2.0;
    let center = CARD_WIDTH / 2.0;
    let right = CARD_WIDTH - PADDING - 12.0;
    let mut ops = Vec::new();

    ops.push(DrawOp::Rect {
        x: PADDING,
        y: PADDING,
        width: inner_width,
        height: SUMMARY_HEIGHT,
        color: "#0f172a",
    });
    ops.push(DrawOp::text(center, PADDING + 28.0, "TOTAL REDUCTION", 11.0, "#94a3b8").bold().aligned(Align::Center));
    ops.push(
        DrawOp::text(center, PADDING + 78.0, format!("▼ {}円", format_amount(totals.diff)), 40.0, "#ffffff")
            .bold()
            .aligned(Align::Center),
    );
    ops.push(
        DrawOp::text(
            center,
            PADDING + 106.0,
            totals.breakdown(),
            11.0,
            "#64748b",
        )
        .aligned(Align::Center),
    );

    let mut y = PADDING + SUMMARY_HEIGHT + 24.0;
    for item in items {
        let row = ItemRowModel::new(item);
        let reason_lines = row
            .reason
            .as_deref()
            .map(|r| wrap_units(r, REASON_WRAP_UNITS))
            .unwrap_or_default();
        let name_lines = wrap_units(&row.name, NAME_WRAP_UNITS);
        let extra_name_height = NAME_LINE_HEIGHT * name_lines.len().saturating_sub(1) as f64;
        let height =
            ROW_BASE_HEIGHT + extra_name_height + REASON_LINE_HEIGHT * reason_lines.len() as f64;

        let (background, badge_color) = if row.overpriced {
            ("#fef2f2", "#dc2626")
        } else {
            ("#f8fafc", "#059669")
        };
        ops.push(DrawOp::Rect {
            x: PADDING,
            y,
            width: inner_width,
            height,
            color: background,
        });
        ops.push(DrawOp::text(PADDING + 14.0, y + 24.0, row.badge, 12.0, badge_color).bold());
        for (i, line) in name_lines.into_iter().enumerate() {
            ops.push(
                DrawOp::text(PADDING + 36.0, y + 24.0 + NAME_LINE_HEIGHT * i as f64, line, 14.0, "#334155")
                    .bold(),
            );
        }

        for (i, line) in reason_lines.into_iter().enumerate() {
            ops.push(DrawOp::text(
                PADDING + 36.0,
                y + 44.0 + extra_name_height + REASON_LINE_HEIGHT * i as f64,
                line,
                11.0,
                "#dc2626",
            ));
        }

        if let Some(current) = row.struck_current {
            ops.push(DrawOp::text(right, y + 18.0, current, 11.0, "#94a3b8").aligned(Align::Right).struck());
        }
        ops.push(
            DrawOp::text(right, y + 36.0, format!("{}円", row.target), 14.0, "#334155")
                .bold()
                .aligned(Align::Right),
        );

        y += height + ROW_GAP;
    }

    ops.push(DrawOp::text(center, y + 20.0, "Powered by Gemini AI", 10.0, "#cbd5e1").aligned(Align::Center));

    ExportLayout {
        width: CARD_WIDTH,
        height: y + FOOTER_HEIGHT,
        ops,
    }
}

/// Greedy wrap where full-width characters count as two units.
fn wrap_units(text: &str, max_units: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut used = 0;

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(std::mem::take(&mut line));
            used = 0;
            continue;
        }
        let units = char_units(ch);
        if used + units > max_units && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            used = 0;
        }
        line.push(ch);
        used += units;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn char_units(ch: char) -> usize {
    if ch.is_ascii() {
        1
    } else {
        2
    }
}

/// Waits for the settle delay, renders the card to PNG and downloads it.
pub async fn export_result_image(items: &[NegotiableItem]) -> Result<(), JsValue> {
    TimeoutFuture::new(SETTLE_DELAY_MS).await;

    let layout = layout_result(items);
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width((layout.width * EXPORT_SCALE).ceil() as u32);
    canvas.set_height((layout.height * EXPORT_SCALE).ceil() as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context is not available"))?
        .dyn_into()?;
    ctx.scale(EXPORT_SCALE, EXPORT_SCALE)?;

    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, layout.width, layout.height);
    for op in &layout.ops {
        paint(&ctx, op)?;
    }

    let data_url = canvas.to_data_url_with_type("image/png")?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&data_url);
    anchor.set_download(EXPORT_FILENAME);
    anchor.click();

    web_sys::console::log_1(&format!("[Export] Saved {EXPORT_FILENAME} ({} rows)", items.len()).into());
    Ok(())
}

fn paint(ctx: &CanvasRenderingContext2d, op: &DrawOp) -> Result<(), JsValue> {
    match op {
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            color,
        } => {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(*x, *y, *width, *height);
        }
        DrawOp::Text {
            x,
            y,
            text,
            size,
            bold,
            color,
            align,
            strike,
        } => {
            let weight = if *bold { "bold " } else { "" };
            ctx.set_font(&format!("{weight}{size}px {FONT_FAMILY}"));
            ctx.set_text_align(align.as_canvas());
            ctx.set_fill_style_str(color);
            ctx.fill_text(text, *x, *y)?;

            if *strike {
                let width = ctx.measure_text(text)?.width();
                let start = match align {
                    Align::Left => *x,
                    Align::Center => *x - width / 2.0,
                    Align::Right => *x - width,
                };
                let mid = *y - size * 0.35;
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(start, mid);
                ctx.line_to(start + width, mid);
                ctx.stroke();
            }
        }
    }
    Ok(())
}
