//! PDF page writer
//!
//! Consumes layout blocks in order and places them top to bottom, opening a
//! new page whenever the next line would cross the bottom margin. Text uses
//! the two standard Helvetica faces, so no font program is embedded.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use super::config::RenderConfig;
use super::layout::{wrap_text, Line};
use super::metrics::to_winansi;
use crate::document::{Align, Block, BlockKind, FontWeight, TextStyle};
use crate::types::{Result, VaultError};

const CATALOG_ID: i32 = 1;
const PAGE_TREE_ID: i32 = 2;
const REGULAR_FONT_ID: i32 = 3;
const BOLD_FONT_ID: i32 = 4;
const INFO_ID: i32 = 5;
const FIRST_FREE_ID: i32 = 6;

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

const LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Left inset of list detail lines
const DETAIL_INDENT: f32 = 15.0;
const PRODUCER: &str = "Legacy Vault";

/// Finished document
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// A line ready to be placed on a page
struct PlacedLine {
    text: String,
    width: f32,
    font_size: f32,
    weight: FontWeight,
    align: Align,
    underline: bool,
    indent: f32,
    ends_paragraph: bool,
    /// Extra vertical gap after this line, in points
    gap_after: f32,
}

struct PageCanvas {
    page_ref: Ref,
    content_ref: Ref,
    content: Content,
}

pub struct PdfRenderer {
    pdf: Pdf,
    config: RenderConfig,
    pages: Vec<Ref>,
    current: Option<PageCanvas>,
    /// Top of the next line, measured from the page bottom
    cursor_y: f32,
    next_ref: i32,
    /// Lines of keep-with-next blocks waiting for the block that follows
    held: Vec<PlacedLine>,
}

impl PdfRenderer {
    pub fn new(config: RenderConfig, title: &str) -> Result<Self> {
        config.validate()?;

        let mut pdf = Pdf::new();
        pdf.catalog(Ref::new(CATALOG_ID))
            .pages(Ref::new(PAGE_TREE_ID));
        pdf.type1_font(Ref::new(REGULAR_FONT_ID))
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(Ref::new(BOLD_FONT_ID))
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.document_info(Ref::new(INFO_ID))
            .title(TextStr(title))
            .producer(TextStr(PRODUCER));

        Ok(Self {
            pdf,
            config,
            pages: Vec::new(),
            current: None,
            cursor_y: 0.0,
            next_ref: FIRST_FREE_ID,
            held: Vec::new(),
        })
    }

    /// Lay out and draw one block.
    pub fn write_block(&mut self, block: &Block) -> Result<()> {
        check_style(&block.style)?;
        let mut lines = self.layout_block(block)?;
        if let Some(last) = lines.last_mut() {
            last.gap_after += block.space_after.max(0.0) * block.style.font_size * LINE_HEIGHT_FACTOR;
        }

        if block.keep_with_next {
            self.held.extend(lines);
            return Ok(());
        }

        self.release_held(lines.first())?;
        for line in &lines {
            self.place_line(line)?;
        }
        Ok(())
    }

    /// Close the last page and serialize the document.
    pub fn finish(mut self) -> Result<RenderedDocument> {
        if let Err(e) = self.release_held(None) {
            self.abort();
            return Err(e);
        }
        if self.current.is_none() && self.pages.is_empty() {
            self.start_page();
        }
        self.flush_page();

        self.pdf
            .pages(Ref::new(PAGE_TREE_ID))
            .kids(self.pages.iter().copied())
            .count(self.pages.len() as i32);

        let page_count = self.pages.len();
        Ok(RenderedDocument {
            bytes: self.pdf.finish(),
            page_count,
        })
    }

    /// Drop a partially written document.
    pub fn abort(self) {
        let pages = self.pages.len() + usize::from(self.current.is_some());
        debug!(pages, "Discarding partially rendered document");
    }

    /// Place held lines, first moving to a new page if they would not fit
    /// together with `next` on the current one.
    fn release_held(&mut self, next: Option<&PlacedLine>) -> Result<()> {
        if self.held.is_empty() {
            return Ok(());
        }
        let held = std::mem::take(&mut self.held);

        let group_height: f32 = held
            .iter()
            .map(|l| l.font_size * LINE_HEIGHT_FACTOR + l.gap_after)
            .sum::<f32>()
            + next.map_or(0.0, |l| l.font_size * LINE_HEIGHT_FACTOR);
        let page_top = self.config.page_size.dimensions().1 - self.config.margin;
        let at_page_top = self.cursor_y >= page_top;

        if self.current.is_some()
            && !at_page_top
            && group_height <= self.config.content_height()
            && self.cursor_y - group_height < self.config.margin
        {
            self.flush_page();
            self.start_page();
        }

        for line in &held {
            self.place_line(line)?;
        }
        Ok(())
    }

    fn layout_block(&self, block: &Block) -> Result<Vec<PlacedLine>> {
        let style = &block.style;
        let width = self.config.content_width();
        let mut placed = Vec::new();

        match &block.kind {
            BlockKind::Heading(text) | BlockKind::Paragraph(text) => {
                check_text(text)?;
                push_wrapped(&mut placed, text, style, 0.0, width);
            }
            BlockKind::KeyValue(entries) => {
                for (key, value) in entries {
                    let text = format!("{}: {}", key, value);
                    check_text(&text)?;
                    push_wrapped(&mut placed, &text, style, 0.0, width);
                }
            }
            BlockKind::NumberedList { items, detail_size } => {
                check_font_size(*detail_size)?;
                let detail_style = TextStyle {
                    font_size: *detail_size,
                    weight: FontWeight::Regular,
                    align: Align::Left,
                    underline: false,
                };
                let item_gap = 0.5 * style.font_size * LINE_HEIGHT_FACTOR;

                for (index, item) in items.iter().enumerate() {
                    let primary = format!("{}. {}", index + 1, item.primary);
                    check_text(&primary)?;
                    push_wrapped(&mut placed, &primary, style, 0.0, width);

                    for detail in &item.details {
                        check_text(detail)?;
                        push_wrapped(
                            &mut placed,
                            detail,
                            &detail_style,
                            DETAIL_INDENT,
                            width - DETAIL_INDENT,
                        );
                    }

                    if let Some(last) = placed.last_mut() {
                        last.gap_after += item_gap;
                    }
                }
            }
        }

        Ok(placed)
    }

    fn place_line(&mut self, line: &PlacedLine) -> Result<()> {
        let line_height = line.font_size * LINE_HEIGHT_FACTOR;
        if line_height > self.config.content_height() {
            return Err(VaultError::Render(format!(
                "font size {} does not fit on the page",
                line.font_size
            )));
        }

        if self.current.is_none() || self.cursor_y - line_height < self.config.margin {
            self.flush_page();
            self.start_page();
        }

        let margin = self.config.margin;
        let available = self.config.content_width() - line.indent;
        let baseline = self.cursor_y - line.font_size;
        let x = match line.align {
            Align::Center => margin + line.indent + ((available - line.width) / 2.0).max(0.0),
            Align::Left | Align::Justify => margin + line.indent,
        };
        let word_spacing = match line.align {
            Align::Justify if !line.ends_paragraph => {
                let gaps = line.text.matches(' ').count();
                if gaps > 0 {
                    ((available - line.width) / gaps as f32).max(0.0)
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };
        let font = match line.weight {
            FontWeight::Regular => REGULAR_FONT,
            FontWeight::Bold => BOLD_FONT,
        };
        let encoded = to_winansi(&line.text);

        if let Some(canvas) = self.current.as_mut() {
            let content = &mut canvas.content;
            if !encoded.is_empty() {
                content.begin_text();
                content.set_font(font, line.font_size);
                if word_spacing > 0.0 {
                    content.set_word_spacing(word_spacing);
                }
                content.next_line(x, baseline);
                content.show(Str(&encoded));
                if word_spacing > 0.0 {
                    content.set_word_spacing(0.0);
                }
                content.end_text();
            }

            if line.underline && line.width > 0.0 {
                let rule_y = baseline - line.font_size * 0.15;
                content.set_line_width((line.font_size / 20.0).max(0.5));
                content.move_to(x, rule_y);
                content.line_to(x + line.width, rule_y);
                content.stroke();
            }
        }

        self.cursor_y -= line_height + line.gap_after;
        Ok(())
    }

    fn start_page(&mut self) {
        let page_ref = self.alloc_ref();
        let content_ref = self.alloc_ref();
        self.current = Some(PageCanvas {
            page_ref,
            content_ref,
            content: Content::new(),
        });
        self.cursor_y = self.config.page_size.dimensions().1 - self.config.margin;
    }

    fn flush_page(&mut self) {
        let Some(canvas) = self.current.take() else {
            return;
        };

        let bytes = canvas.content.finish();
        self.pdf.stream(canvas.content_ref, &bytes);

        let (width, height) = self.config.page_size.dimensions();
        let mut page = self.pdf.page(canvas.page_ref);
        page.media_box(Rect::new(0.0, 0.0, width, height));
        page.parent(Ref::new(PAGE_TREE_ID));
        page.contents(canvas.content_ref);
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            fonts.pair(REGULAR_FONT, Ref::new(REGULAR_FONT_ID));
            fonts.pair(BOLD_FONT, Ref::new(BOLD_FONT_ID));
        }
        page.finish();

        self.pages.push(canvas.page_ref);
    }

    fn alloc_ref(&mut self) -> Ref {
        let id = Ref::new(self.next_ref);
        self.next_ref += 1;
        id
    }
}

fn push_wrapped(
    out: &mut Vec<PlacedLine>,
    text: &str,
    style: &TextStyle,
    indent: f32,
    width: f32,
) {
    for Line {
        text,
        width: line_width,
        ends_paragraph,
    } in wrap_text(text, style.weight, style.font_size, width)
    {
        out.push(PlacedLine {
            text,
            width: line_width,
            font_size: style.font_size,
            weight: style.weight,
            align: style.align,
            underline: style.underline,
            indent,
            ends_paragraph,
            gap_after: 0.0,
        });
    }
}

fn check_style(style: &TextStyle) -> Result<()> {
    check_font_size(style.font_size)
}

fn check_font_size(size: f32) -> Result<()> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(VaultError::Render(format!("invalid font size {}", size)))
    }
}

fn check_text(text: &str) -> Result<()> {
    match text
        .chars()
        .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        Some(c) => Err(VaultError::Render(format!(
            "unsupported control character U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}
