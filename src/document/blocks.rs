//! Layout blocks
//!
//! A block is a styled unit of content with no notion of pages. The renderer
//! decides where each one lands.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Justify,
}

/// Rendering hints carried by every block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub weight: FontWeight,
    pub align: Align,
    pub underline: bool,
}

impl TextStyle {
    pub fn regular(font_size: f32) -> Self {
        Self {
            font_size,
            weight: FontWeight::Regular,
            align: Align::Left,
            underline: false,
        }
    }

    pub fn bold(font_size: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::regular(font_size)
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// One entry of a numbered list: a main line plus smaller detail lines
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub primary: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading(String),
    Paragraph(String),
    /// `Key: value` lines
    KeyValue(Vec<(String, String)>),
    /// Items are numbered from 1 by the renderer
    NumberedList {
        items: Vec<ListItem>,
        detail_size: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub style: TextStyle,
    /// Vertical gap after the block, in lines of the block's font size
    pub space_after: f32,
    /// Never end a page with this block; it moves to the next page with the
    /// first line of the block that follows.
    pub keep_with_next: bool,
}

impl Block {
    pub fn heading(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            kind: BlockKind::Heading(text.into()),
            style,
            space_after: 1.0,
            keep_with_next: true,
        }
    }

    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            kind: BlockKind::Paragraph(text.into()),
            style,
            space_after: 1.0,
            keep_with_next: false,
        }
    }

    pub fn key_value(entries: Vec<(String, String)>, style: TextStyle) -> Self {
        Self {
            kind: BlockKind::KeyValue(entries),
            style,
            space_after: 1.0,
            keep_with_next: false,
        }
    }

    pub fn numbered_list(items: Vec<ListItem>, style: TextStyle, detail_size: f32) -> Self {
        Self {
            kind: BlockKind::NumberedList { items, detail_size },
            style,
            space_after: 1.0,
            keep_with_next: false,
        }
    }

    pub fn space_after(mut self, lines: f32) -> Self {
        self.space_after = lines;
        self
    }

    /// Heading text, if this block is a heading
    pub fn heading_text(&self) -> Option<&str> {
        match &self.kind {
            BlockKind::Heading(text) => Some(text),
            _ => None,
        }
    }

    /// All text lines this block will print, in order, without numbering
    pub fn text_lines(&self) -> Vec<String> {
        match &self.kind {
            BlockKind::Heading(text) | BlockKind::Paragraph(text) => vec![text.clone()],
            BlockKind::KeyValue(entries) => entries
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect(),
            BlockKind::NumberedList { items, .. } => items
                .iter()
                .flat_map(|item| std::iter::once(item.primary.clone()).chain(item.details.clone()))
                .collect(),
        }
    }
}
