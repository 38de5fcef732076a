//! Assembly statistics.

use serde::{Deserialize, Serialize};

/// Counters collected while assembling one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    /// Sections emitted, nested ones included
    pub section_count: u32,

    /// Paragraph nodes emitted, table cell content included
    pub paragraph_count: u32,

    /// Headings emitted
    pub heading_count: u32,

    /// Lists emitted
    pub list_count: u32,

    /// List items emitted, generated ones included
    pub list_item_count: u32,

    /// Tables emitted
    pub table_count: u32,

    /// Table rows emitted, header rows included
    pub row_count: u32,

    /// Table rows generated from data
    pub generated_row_count: u32,

    /// Images passed through
    pub image_count: u32,

    /// Placeholders substituted with a value
    pub resolved_count: u32,

    /// Placeholders replaced by an error marker
    pub unresolved_count: u32,
}

impl AssemblyStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment section count.
    pub fn add_section(&mut self) {
        self.section_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment list count and add its items.
    pub fn add_list(&mut self, items: usize) {
        self.list_count += 1;
        self.list_item_count += items as u32;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Count a table row.
    pub fn add_row(&mut self, generated: bool) {
        self.row_count += 1;
        if generated {
            self.generated_row_count += 1;
        }
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Count a placeholder outcome.
    pub fn add_placeholder(&mut self, resolved: bool) {
        if resolved {
            self.resolved_count += 1;
        } else {
            self.unresolved_count += 1;
        }
    }

    /// Total placeholders met.
    pub fn placeholder_count(&self) -> u32 {
        self.resolved_count + self.unresolved_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &AssemblyStats) {
        self.section_count += other.section_count;
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.list_count += other.list_count;
        self.list_item_count += other.list_item_count;
        self.table_count += other.table_count;
        self.row_count += other.row_count;
        self.generated_row_count += other.generated_row_count;
        self.image_count += other.image_count;
        self.resolved_count += other.resolved_count;
        self.unresolved_count += other.unresolved_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_stats_counters() {
        let mut stats = AssemblyStats::new();
        stats.add_list(3);
        stats.add_row(false);
        stats.add_row(true);
        stats.add_placeholder(true);
        stats.add_placeholder(false);

        assert_eq!(stats.list_item_count, 3);
        assert_eq!(stats.row_count, 2);
        assert_eq!(stats.generated_row_count, 1);
        assert_eq!(stats.placeholder_count(), 2);
    }

    #[test]
    fn test_assembly_stats_merge() {
        let mut stats1 = AssemblyStats {
            paragraph_count: 5,
            table_count: 2,
            ..Default::default()
        };
        let stats2 = AssemblyStats {
            paragraph_count: 3,
            table_count: 1,
            image_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.table_count, 3);
        assert_eq!(stats1.image_count, 4);
    }
}
