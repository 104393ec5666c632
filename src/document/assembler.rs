//! Document assembly
//!
//! Turns a fully loaded record into an ordered list of layout blocks. Pure
//! functions: the only time-dependent input is the explicit `generated_on`
//! date, so identical inputs give identical blocks.

use chrono::NaiveDate;

use super::blocks::{Align, Block, ListItem, TextStyle};
use super::format::{format_date, format_date_range, format_kes_amount, format_percentage};
use crate::models::{MemorialDocument, WillDocument};

pub const WILL_HEADING: &str = "LAST WILL AND TESTAMENT";
pub const BENEFICIARIES_HEADING: &str = "Beneficiaries";
pub const ASSETS_HEADING: &str = "Assets";
pub const WITNESSES_HEADING: &str = "Witnesses";
pub const BIOGRAPHY_HEADING: &str = "Biography";

const ENTRY_SIZE: f32 = 12.0;
const DETAIL_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 16.0;

pub fn assemble_will(will: &WillDocument, generated_on: NaiveDate) -> Vec<Block> {
    let mut blocks = vec![
        Block::heading(WILL_HEADING, TextStyle::bold(20.0).aligned(Align::Center)),
        Block::key_value(
            vec![
                ("Title".to_string(), will.title.clone()),
                ("Executor".to_string(), will.executor.clone()),
                ("Date".to_string(), format_date(generated_on)),
            ],
            TextStyle::regular(ENTRY_SIZE),
        ),
    ];

    if !will.beneficiaries.is_empty() {
        let items = will
            .beneficiaries
            .iter()
            .map(|b| ListItem {
                primary: format!(
                    "{} ({}) - {}%",
                    b.name,
                    b.relationship,
                    format_percentage(b.percentage)
                ),
                details: vec![
                    format!("Email: {}, Phone: {}", b.email, b.phone),
                    format!("Address: {}", b.address),
                ],
            })
            .collect();
        push_section(&mut blocks, BENEFICIARIES_HEADING, items);
    }

    if !will.assets.is_empty() {
        let items = will
            .assets
            .iter()
            .map(|a| ListItem {
                primary: format!("{} ({})", a.name, a.asset_type),
                details: vec![
                    format!("Value: KES {}", format_kes_amount(a.value)),
                    format!(
                        "Location: {}",
                        a.location
                            .as_deref()
                            .filter(|l| !l.trim().is_empty())
                            .unwrap_or("N/A")
                    ),
                ],
            })
            .collect();
        push_section(&mut blocks, ASSETS_HEADING, items);
    }

    if !will.witnesses.is_empty() {
        let items = will
            .witnesses
            .iter()
            .map(|w| ListItem {
                primary: w.name.clone(),
                details: vec![format!("ID Number: {}", w.id_number)],
            })
            .collect();
        push_section(&mut blocks, WITNESSES_HEADING, items);
    }

    blocks
}

fn push_section(blocks: &mut Vec<Block>, heading: &str, items: Vec<ListItem>) {
    blocks.push(Block::heading(heading, TextStyle::regular(SECTION_SIZE).underlined()).space_after(0.5));
    blocks.push(Block::numbered_list(items, TextStyle::regular(ENTRY_SIZE), DETAIL_SIZE));
}

pub fn assemble_memorial(memorial: &MemorialDocument) -> Vec<Block> {
    let mut blocks = vec![
        Block::heading(
            memorial.title.clone(),
            TextStyle::bold(24.0).aligned(Align::Center),
        ),
        Block::heading(
            memorial.name.clone(),
            TextStyle::bold(18.0).aligned(Align::Center),
        ),
    ];

    if let Some(range) = format_date_range(memorial.birth_date, memorial.death_date) {
        blocks.push(
            Block::paragraph(range, TextStyle::regular(12.0).aligned(Align::Center)).space_after(2.0),
        );
    }

    if let Some(biography) = memorial
        .biography
        .as_deref()
        .filter(|b| !b.trim().is_empty())
    {
        blocks.push(
            Block::heading(BIOGRAPHY_HEADING, TextStyle::bold(14.0).underlined()).space_after(0.5),
        );
        blocks.push(Block::paragraph(
            biography,
            TextStyle::regular(11.0).aligned(Align::Justify),
        ));
    }

    blocks
}
