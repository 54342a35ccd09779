//! Page trimming: drops the header block and footer line.
//!
//! Trimming depends only on a page's position in the document, never on
//! its content, so layout changes are confined to [`LayoutConfig`].

use crate::models::config::LayoutConfig;

/// Where a page sits in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    /// The document has exactly one page.
    Only,
    First,
    Interior,
    Last,
}

impl PagePosition {
    /// Position of the page at `index` (zero-based) among `count` pages.
    pub fn of(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 0 | 1) => Self::Only,
            (0, _) => Self::First,
            (i, n) if i + 1 >= n => Self::Last,
            _ => Self::Interior,
        }
    }
}

/// Lines to drop from each end of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimPlan {
    pub head: usize,
    pub tail: usize,
}

impl TrimPlan {
    /// Apply the plan. Drop counts saturate at the page length.
    pub fn apply<'a, T>(&self, lines: &'a [T]) -> &'a [T] {
        let head = self.head.min(lines.len());
        let rest = &lines[head..];
        let tail = self.tail.min(rest.len());
        &rest[..rest.len() - tail]
    }

    /// Number of lines the plan removes from a page of `len` lines.
    pub fn dropped(&self, len: usize) -> usize {
        let head = self.head.min(len);
        head + self.tail.min(len - head)
    }
}

/// Computes trim plans from the layout configuration.
#[derive(Debug, Clone, Default)]
pub struct PageTrimmer {
    layout: LayoutConfig,
}

impl PageTrimmer {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn plan(&self, index: usize, count: usize) -> TrimPlan {
        trim_plan(PagePosition::of(index, count), &self.layout)
    }
}

/// The trim rules.
///
/// A single-page document keeps its footer unless
/// `trim_single_page_footer` is set.
pub fn trim_plan(position: PagePosition, layout: &LayoutConfig) -> TrimPlan {
    match position {
        PagePosition::Only => TrimPlan {
            head: layout.header_lines,
            tail: if layout.trim_single_page_footer {
                layout.footer_lines
            } else {
                0
            },
        },
        PagePosition::First => TrimPlan {
            head: layout.header_lines,
            tail: 0,
        },
        PagePosition::Interior => TrimPlan::default(),
        PagePosition::Last => TrimPlan {
            head: 0,
            tail: layout.footer_lines,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_position() {
        assert_eq!(PagePosition::of(0, 1), PagePosition::Only);
        assert_eq!(PagePosition::of(0, 3), PagePosition::First);
        assert_eq!(PagePosition::of(1, 3), PagePosition::Interior);
        assert_eq!(PagePosition::of(2, 3), PagePosition::Last);
        assert_eq!(PagePosition::of(1, 2), PagePosition::Last);
    }

    #[test]
    fn test_default_plans() {
        let trimmer = PageTrimmer::default();

        assert_eq!(trimmer.plan(0, 1), TrimPlan { head: 3, tail: 0 });
        assert_eq!(trimmer.plan(0, 2), TrimPlan { head: 3, tail: 0 });
        assert_eq!(trimmer.plan(1, 3), TrimPlan { head: 0, tail: 0 });
        assert_eq!(trimmer.plan(1, 2), TrimPlan { head: 0, tail: 1 });
    }

    #[test]
    fn test_single_page_footer_policy() {
        let trimmer = PageTrimmer::new(LayoutConfig {
            trim_single_page_footer: true,
            ..LayoutConfig::default()
        });
        assert_eq!(trimmer.plan(0, 1), TrimPlan { head: 3, tail: 1 });
    }

    #[test]
    fn test_apply_saturates() {
        let lines = ["a", "b"];
        let plan = TrimPlan { head: 3, tail: 1 };
        assert!(plan.apply(&lines).is_empty());
        assert_eq!(plan.dropped(lines.len()), 2);

        let lines = ["h1", "h2", "h3", "row", "footer"];
        let plan = TrimPlan { head: 3, tail: 1 };
        assert_eq!(plan.apply(&lines), &["row"]);
        assert_eq!(plan.dropped(lines.len()), 4);
    }
}
