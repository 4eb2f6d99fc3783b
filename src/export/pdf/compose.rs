//! Report layout as a flat sequence of blocks.
//!
//! Composition is pure: it decides *what* goes on the page and in which
//! order. Measuring, wrapping and page breaks belong to the renderer.

use crate::export::markup::{Inline, parse_inline, split_to_items, strip_markup};
use crate::report::{AuditRow, CostProfileRow, format_currency};
use chrono::NaiveDateTime;

pub const AUDIT_TITLE: &str = "AWS FinOps Dashboard (Audit Report)";
pub const COST_TITLE: &str = "AWS FinOps Dashboard (Cost Report)";
pub const AUDIT_COVERAGE_NOTE: &str = "Note: This report lists untagged EC2, RDS, Lambda, ELBv2 only.";

/// One layout element. Spacer heights are in points.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Paragraph(Vec<Inline>),
    HeaderCard(Vec<Inline>),
    KeyValueTable(Vec<(String, String)>),
    MiniHeader(String),
    BulletList(Vec<String>),
    Spacer(f32),
    Footer(Vec<Inline>),
}

/// A composed report, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: vec![Block::Title(title.to_string())],
        }
    }

    fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    fn section(&mut self, title: &str, items: Vec<String>) {
        self.push(Block::MiniHeader(title.to_string()));
        self.push(Block::BulletList(items));
    }

    /// Bullet items of the section titled `title`, if present.
    pub fn section_items(&self, title: &str) -> Option<&[String]> {
        self.blocks
            .windows(2)
            .find_map(|pair| match pair {
                [Block::MiniHeader(t), Block::BulletList(items)] if t == title => {
                    Some(items.as_slice())
                }
                _ => None,
            })
    }
}

fn header_card(profile: &str, account_id: &str) -> Block {
    Block::HeaderCard(parse_inline(&format!(
        "<b>Profile:</b> {}    <b>Account:</b> {}",
        strip_markup(profile),
        strip_markup(account_id)
    )))
}

fn footer(prefix: &str, generated_at: NaiveDateTime) -> Block {
    Block::Footer(parse_inline(&format!(
        "{prefix} is generated using AWS FinOps Dashboard (CLI) \u{a9} 2025 on {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )))
}

/// Lay out an audit report: one card and five finding lists per row.
pub fn compose_audit(rows: &[AuditRow], generated_at: NaiveDateTime) -> Document {
    let mut doc = Document::new(AUDIT_TITLE);
    doc.push(Block::Spacer(8.0));

    for (idx, row) in rows.iter().enumerate() {
        doc.push(header_card(&row.profile, &row.account_id));
        doc.push(Block::Spacer(6.0));

        for (title, field) in row.sections() {
            doc.section(title, split_to_items(field));
            doc.push(Block::Spacer(6.0));
        }

        if idx + 1 < rows.len() {
            doc.push(Block::Spacer(10.0));
        }
    }

    doc.push(Block::Spacer(8.0));
    doc.push(Block::Footer(vec![Inline::text(AUDIT_COVERAGE_NOTE)]));
    doc.push(footer("This audit report", generated_at));
    doc
}

/// Lay out a cost report for the given period labels.
pub fn compose_cost(
    rows: &[CostProfileRow],
    previous_period: &str,
    current_period: &str,
    generated_at: NaiveDateTime,
) -> Document {
    let mut doc = Document::new(COST_TITLE);
    doc.push(Block::Spacer(10.0));
    doc.push(Block::Paragraph(parse_inline(&format!(
        "<b>Previous Period:</b> {}<br/><b>Current Period:</b> {}",
        strip_markup(previous_period),
        strip_markup(current_period)
    ))));
    doc.push(Block::Spacer(6.0));

    for (idx, row) in rows.iter().enumerate() {
        doc.push(header_card(&row.profile, &row.account_id));
        doc.push(Block::Spacer(6.0));

        doc.push(Block::KeyValueTable(vec![
            ("Previous Period Cost".to_string(), format_currency(row.last_month)),
            ("Current Period Cost".to_string(), format_currency(row.current_month)),
        ]));
        doc.push(Block::Spacer(6.0));

        let services = row
            .services_by_cost()
            .into_iter()
            .map(|(name, cost)| format!("{}: {}", strip_markup(name), format_currency(cost)))
            .collect();
        doc.section("Cost By Service", services);
        doc.push(Block::Spacer(6.0));

        let budgets: Vec<String> = row
            .budget_info
            .iter()
            .map(|line| strip_markup(line))
            .filter(|line| !line.trim().is_empty())
            .collect();
        let budgets = if budgets.is_empty() {
            vec!["No budgets".to_string()]
        } else {
            budgets
        };
        doc.section("Budget Status", budgets);
        doc.push(Block::Spacer(6.0));

        let instances: Vec<String> = row
            .active_ec2_states()
            .map(|(state, count)| format!("{}: {}", strip_markup(state), count))
            .collect();
        let instances = if instances.is_empty() {
            vec!["No instances".to_string()]
        } else {
            instances
        };
        doc.section("EC2 Instances", instances);

        if idx + 1 < rows.len() {
            doc.push(Block::Spacer(14.0));
        }
    }

    doc.push(Block::Spacer(8.0));
    doc.push(footer("This report", generated_at));
    doc
}
