//! Manuscript size and print-cost estimation.

use serde::{Deserialize, Serialize};

/// 원고지 billing unit: 200 characters per manuscript page.
const CHARS_PER_MANUSCRIPT_PAGE: usize = 200;
/// Rough printed-page density.
const CHARS_PER_BOOK_PAGE: usize = 500;

/// Print cost band per book page, in thousands of currency units.
const COST_PER_PAGE_LOW: u64 = 30;
const COST_PER_PAGE_HIGH: u64 = 50;
const COST_UNIT: u64 = 1_000;

/// Publishing tier by manuscript length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishingCategory {
    ShortStory,
    Novella,
    Novel,
}

impl PublishingCategory {
    /// Tier by 200-character manuscript pages.
    fn from_manuscript_pages(pages: usize) -> Self {
        if pages <= 200 {
            PublishingCategory::ShortStory
        } else if pages <= 600 {
            PublishingCategory::Novella
        } else {
            PublishingCategory::Novel
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PublishingCategory::ShortStory => "short story",
            PublishingCategory::Novella => "novella",
            PublishingCategory::Novel => "novel",
        }
    }
}

/// An estimated cost band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    pub min: u64,
    pub max: u64,
}

impl CostRange {
    /// Thousands-separated range for display.
    pub fn display(&self) -> String {
        format!("{} - {}", group_digits(self.min), group_digits(self.max))
    }
}

/// Derived, read-only size and cost figures for a manuscript. Never
/// persisted; recomputed from the text on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptInfo {
    /// Non-whitespace character count
    pub total_chars: usize,
    /// 200-character 원고지 pages
    pub manuscript_pages: usize,
    /// Estimated printed pages at 500 characters per page
    pub estimated_book_pages: usize,
    pub publishing_category: PublishingCategory,
    pub estimated_print_cost: CostRange,
}

pub fn manuscript_info(text: &str) -> ManuscriptInfo {
    let total_chars = text.chars().filter(|c| !c.is_whitespace()).count();
    let manuscript_pages = total_chars.div_ceil(CHARS_PER_MANUSCRIPT_PAGE);
    let estimated_book_pages = total_chars.div_ceil(CHARS_PER_BOOK_PAGE);
    ManuscriptInfo {
        total_chars,
        manuscript_pages,
        estimated_book_pages,
        publishing_category: PublishingCategory::from_manuscript_pages(manuscript_pages),
        estimated_print_cost: CostRange {
            min: estimated_book_pages as u64 * COST_PER_PAGE_LOW * COST_UNIT,
            max: estimated_book_pages as u64 * COST_PER_PAGE_HIGH * COST_UNIT,
        },
    }
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
