use super::super::transactions::{Direction, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineRole {
    /// Carried in from the previous period.
    Opening,
    /// Sum of postings for the line.
    Movement,
    /// Carried forward; closes the removal side.
    EndBalance,
    Total,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LineSpec {
    pub line: u8,
    pub label: &'static str,
    pub role: LineRole,
}

const fn opening(line: u8, label: &'static str) -> LineSpec {
    LineSpec {
        line,
        label,
        role: LineRole::Opening,
    }
}

const fn movement(line: u8, label: &'static str) -> LineSpec {
    LineSpec {
        line,
        label,
        role: LineRole::Movement,
    }
}

const fn end_balance(line: u8, label: &'static str) -> LineSpec {
    LineSpec {
        line,
        label,
        role: LineRole::EndBalance,
    }
}

const fn total(line: u8, label: &'static str) -> LineSpec {
    LineSpec {
        line,
        label,
        role: LineRole::Total,
    }
}

// Part I, Section A: bulk wines.
const BULK_ADDITIONS: &[LineSpec] = &[
    opening(1, "On hand beginning of period"),
    movement(2, "Produced by fermentation"),
    movement(3, "Produced by sweetening"),
    movement(4, "Produced by addition of wine spirits"),
    movement(5, "Produced by blending"),
    movement(6, "Produced by amelioration"),
    movement(7, "Received in bond"),
    movement(8, "Bottled wine dumped to bulk"),
    movement(9, "Inventory gains"),
    movement(10, "Other additions"),
    total(11, "Total"),
];

const BULK_REMOVALS: &[LineSpec] = &[
    movement(13, "Bottled"),
    movement(14, "Removed taxpaid"),
    movement(15, "Transfers in bond"),
    movement(16, "Removed for distilling material"),
    movement(17, "Removed to vinegar plant"),
    movement(18, "Used for sweetening"),
    movement(19, "Used for addition of wine spirits"),
    movement(20, "Used for blending"),
    movement(21, "Used for amelioration"),
    movement(22, "Used for effervescent wine"),
    movement(23, "Used for testing"),
    movement(24, "Other removals"),
    movement(29, "Inventory losses"),
    end_balance(30, "On hand end of period"),
    total(31, "Total"),
];

// Part I, Section B: bottled wines.
const BOTTLED_ADDITIONS: &[LineSpec] = &[
    opening(1, "On hand beginning of period"),
    movement(2, "Bottled"),
    movement(3, "Received in bond"),
    movement(4, "Taxpaid wine returned to bond"),
    movement(5, "Other additions"),
    total(6, "Total"),
];

const BOTTLED_REMOVALS: &[LineSpec] = &[
    movement(8, "Removed taxpaid"),
    movement(9, "Transferred in bond"),
    movement(10, "Dumped to bulk"),
    movement(11, "Used for tasting"),
    movement(12, "Removed for export"),
    movement(13, "Removed for family use"),
    movement(14, "Used for testing"),
    movement(15, "Other removals"),
    movement(16, "Breakage"),
    movement(17, "Inventory shortage"),
    end_balance(18, "On hand end of period"),
    total(19, "Total"),
];

pub(crate) fn schema(section: Section, direction: Direction) -> &'static [LineSpec] {
    match (section, direction) {
        (Section::Bulk, Direction::Addition) => BULK_ADDITIONS,
        (Section::Bulk, Direction::Removal) => BULK_REMOVALS,
        (Section::Bottled, Direction::Addition) => BOTTLED_ADDITIONS,
        (Section::Bottled, Direction::Removal) => BOTTLED_REMOVALS,
    }
}

/// Bulk lines counted as production in the summary.
pub(crate) const BULK_PRODUCTION_LINES: &[u8] = &[2, 3, 4, 5, 6];
/// Bottled line counted as production in the summary.
pub(crate) const BOTTLED_PRODUCTION_LINES: &[u8] = &[2];
