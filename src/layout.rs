//! Label grid layout.
//!
//! Packs fixed-size label cells into the usable area of an A4 page: as many
//! columns and rows as fit, grid centered horizontally, records assigned
//! left-to-right then top-to-bottom then page-by-page. All arithmetic is in
//! millimeters until the final placement, which is in PDF points.

use crate::record::Record;
use crate::{Error, Result};
use clap::ValueEnum;

// A4 dimensions in mm
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;

// Points per mm
pub(crate) const PT_PER_MM: f32 = 2.834645;

/// The two built-in fonts used on labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica regular.
    Helvetica,
    /// Helvetica bold.
    HelveticaBold,
}

impl Font {
    /// PDF base font name for the Type1 font dictionary.
    #[must_use]
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the content stream selects the font by.
    #[must_use]
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Helvetica => "F1",
            Self::HelveticaBold => "F2",
        }
    }
}

/// Font and size for one label text line.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Which font to use.
    pub font: Font,
    /// Font size in points.
    pub size: f32,
}

/// Everything a layout mode fixes: cell size, text insets, line gap, and
/// the styles for the two text lines. Pure data, no behavior branching.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Label cell width in mm.
    pub cell_width_mm: f32,
    /// Label cell height in mm.
    pub cell_height_mm: f32,
    /// Left text inset inside the cell, mm.
    pub inset_left_mm: f32,
    /// Right text inset inside the cell, mm.
    pub inset_right_mm: f32,
    /// Top text inset inside the cell, mm.
    pub inset_top_mm: f32,
    /// Bottom text inset inside the cell, mm.
    pub inset_bottom_mm: f32,
    /// Gap between the heading and body lines, points.
    pub line_gap_pt: f32,
    /// Style for the magazine-name line.
    pub heading: TextStyle,
    /// Style for the edition/year line.
    pub body: TextStyle,
}

/// Named layout mode. Exactly one is active per run; it selects the cell
/// configuration and the per-mode file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutMode {
    /// Compact cells for clipping labels.
    Clippings,
    /// Full-size cells for whole-magazine labels.
    Magazines,
}

impl LayoutMode {
    /// The cell configuration for this mode.
    #[must_use]
    pub fn config(self) -> LayoutConfig {
        match self {
            Self::Clippings => LayoutConfig {
                cell_width_mm: 65.0,
                cell_height_mm: 17.0,
                inset_left_mm: 3.0,
                inset_right_mm: 3.0,
                inset_top_mm: 2.5,
                inset_bottom_mm: 2.5,
                line_gap_pt: 2.0,
                heading: TextStyle {
                    font: Font::HelveticaBold,
                    size: 10.0,
                },
                body: TextStyle {
                    font: Font::Helvetica,
                    size: 9.0,
                },
            },
            Self::Magazines => LayoutConfig {
                cell_width_mm: 90.0,
                cell_height_mm: 40.0,
                inset_left_mm: 5.0,
                inset_right_mm: 5.0,
                inset_top_mm: 4.0,
                inset_bottom_mm: 4.0,
                line_gap_pt: 4.0,
                heading: TextStyle {
                    font: Font::HelveticaBold,
                    size: 14.0,
                },
                body: TextStyle {
                    font: Font::Helvetica,
                    size: 12.0,
                },
            },
        }
    }

    /// Mode name as it appears in file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clippings => "clippings",
            Self::Magazines => "magazines",
        }
    }

    /// Output document name for this mode.
    #[must_use]
    pub fn output_filename(self) -> String {
        format!("labels_{}.pdf", self.as_str())
    }

    /// Seen-set file name for this mode. One file per mode, so the same
    /// magazine is tracked independently in each layout context.
    #[must_use]
    pub fn seen_set_filename(self) -> String {
        format!("printed_{}.hashes", self.as_str())
    }
}

/// Page size and fixed page margins, in mm.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    /// Page width, mm.
    pub width_mm: f32,
    /// Page height, mm.
    pub height_mm: f32,
    /// Left page margin, mm.
    pub margin_left_mm: f32,
    /// Right page margin, mm.
    pub margin_right_mm: f32,
    /// Top page margin, mm.
    pub margin_top_mm: f32,
    /// Bottom page margin, mm.
    pub margin_bottom_mm: f32,
}

impl PageGeometry {
    /// A4 portrait with the standard label-sheet margins.
    #[must_use]
    pub fn a4() -> Self {
        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            margin_left_mm: 7.0,
            margin_right_mm: 7.0,
            margin_top_mm: 14.0,
            margin_bottom_mm: 14.0,
        }
    }

    /// Page width in points.
    #[must_use]
    pub fn width_pt(&self) -> f32 {
        self.width_mm * PT_PER_MM
    }

    /// Page height in points.
    #[must_use]
    pub fn height_pt(&self) -> f32 {
        self.height_mm * PT_PER_MM
    }
}

/// One label's rectangle on a page, in PDF points with the origin at the
/// page's bottom-left corner. `(x, y)` is the cell's bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge, pt.
    pub x: f32,
    /// Bottom edge, pt.
    pub y: f32,
    /// Width, pt.
    pub w: f32,
    /// Height, pt.
    pub h: f32,
}

/// One cell: where to draw it and the two text lines it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Cell rectangle.
    pub rect: Rect,
    /// Line 1, the magazine name.
    pub heading: String,
    /// Line 2, `Edition/Year`.
    pub body: String,
}

/// Computed grid for one configuration on one page geometry.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    /// Columns per page.
    pub cols: usize,
    /// Rows per page.
    pub rows_per_page: usize,
    // Top-left corner of the grid, pt
    origin_x_pt: f32,
    origin_top_pt: f32,
    cell_w_pt: f32,
    cell_h_pt: f32,
}

impl Grid {
    /// Fits the grid into the page's usable area.
    ///
    /// `cols` and `rows_per_page` are the floor of usable extent over cell
    /// extent; the grid footprint is centered horizontally and hangs from
    /// the top page margin. A cell larger than the usable area is a
    /// configuration error.
    pub fn compute(config: &LayoutConfig, page: &PageGeometry) -> Result<Self> {
        let usable_w_mm = page.width_mm - page.margin_left_mm - page.margin_right_mm;
        let usable_h_mm = page.height_mm - page.margin_top_mm - page.margin_bottom_mm;

        let cols = (usable_w_mm / config.cell_width_mm) as usize;
        let rows_per_page = (usable_h_mm / config.cell_height_mm) as usize;
        if cols == 0 || rows_per_page == 0 {
            return Err(Error::Config(format!(
                "cell {}x{}mm does not fit the usable page area {}x{}mm",
                config.cell_width_mm, config.cell_height_mm, usable_w_mm, usable_h_mm
            )));
        }

        // Center the grid footprint within the usable width
        let grid_w_mm = cols as f32 * config.cell_width_mm;
        let origin_x_mm = page.margin_left_mm + (usable_w_mm - grid_w_mm) / 2.0;

        Ok(Self {
            cols,
            rows_per_page,
            origin_x_pt: origin_x_mm * PT_PER_MM,
            origin_top_pt: (page.height_mm - page.margin_top_mm) * PT_PER_MM,
            cell_w_pt: config.cell_width_mm * PT_PER_MM,
            cell_h_pt: config.cell_height_mm * PT_PER_MM,
        })
    }

    /// Labels per page.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cols * self.rows_per_page
    }

    /// Rectangle for the `i`-th record (0-based, in input order).
    #[must_use]
    pub fn cell_rect(&self, index: usize) -> Rect {
        let col = index % self.cols;
        let row = (index / self.cols) % self.rows_per_page;

        let x = self.origin_x_pt + col as f32 * self.cell_w_pt;
        // Rows grow downward; PDF y grows upward, so the cell bottom is
        // one cell height below its top edge.
        let top = self.origin_top_pt - row as f32 * self.cell_h_pt;
        Rect {
            x,
            y: top - self.cell_h_pt,
            w: self.cell_w_pt,
            h: self.cell_h_pt,
        }
    }
}

/// Lays out `records` as pages of placements.
///
/// Record `i` goes to column `i % cols`, row `(i / cols) % rows_per_page`,
/// page `i / (cols * rows_per_page)`. Deterministic: two runs with the same
/// input and configuration produce identical placements.
pub fn layout(
    records: &[Record],
    config: &LayoutConfig,
    page: &PageGeometry,
) -> Result<Vec<Vec<Placement>>> {
    let grid = Grid::compute(config, page)?;
    let per_page = grid.capacity();

    let mut pages: Vec<Vec<Placement>> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if i % per_page == 0 {
            pages.push(Vec::with_capacity(per_page.min(records.len() - i)));
        }
        let placement = Placement {
            rect: grid.cell_rect(i),
            heading: record.magazine.clone(),
            body: record.edition_line(),
        };
        pages
            .last_mut()
            .expect("page pushed above")
            .push(placement);
    }

    tracing::debug!(
        cols = grid.cols,
        rows_per_page = grid.rows_per_page,
        pages = pages.len(),
        "computed label grid"
    );
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3 columns x 8 rows: usable 96x96mm, 32x12mm cells
    fn grid_3x8() -> (LayoutConfig, PageGeometry) {
        let mut config = LayoutMode::Clippings.config();
        config.cell_width_mm = 32.0;
        config.cell_height_mm = 12.0;
        let page = PageGeometry {
            width_mm: 100.0,
            height_mm: 100.0,
            margin_left_mm: 2.0,
            margin_right_mm: 2.0,
            margin_top_mm: 2.0,
            margin_bottom_mm: 2.0,
        };
        (config, page)
    }

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!("Mag {i}"), i.to_string(), "2024"))
            .collect()
    }

    #[test]
    fn test_grid_dimensions() {
        let (config, page) = grid_3x8();
        let grid = Grid::compute(&config, &page).unwrap();
        assert_eq!(grid.cols, 3);
        assert_eq!(grid.rows_per_page, 8);
        assert_eq!(grid.capacity(), 24);
    }

    #[test]
    fn test_25_records_fill_two_pages() {
        let (config, page) = grid_3x8();
        let pages = layout(&records(25), &config, &page).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 24);
        assert_eq!(pages[1].len(), 1);
    }

    #[test]
    fn test_record_23_is_last_cell_of_page_one() {
        let (config, page) = grid_3x8();
        let grid = Grid::compute(&config, &page).unwrap();
        let rect = grid.cell_rect(23);
        // col 2, row 7
        let expected_x = grid.cell_rect(2).x;
        let expected_y = grid.cell_rect(21).y;
        assert_eq!(rect.x, expected_x);
        assert_eq!(rect.y, expected_y);
    }

    #[test]
    fn test_record_24_restarts_at_top_left() {
        let (config, page) = grid_3x8();
        let grid = Grid::compute(&config, &page).unwrap();
        // Same cell position as record 0, on the next page
        assert_eq!(grid.cell_rect(24), grid.cell_rect(0));
    }

    #[test]
    fn test_grid_is_centered_horizontally() {
        let (config, page) = grid_3x8();
        let grid = Grid::compute(&config, &page).unwrap();
        let first = grid.cell_rect(0);
        let last_col = grid.cell_rect(2);
        let left_gap = first.x - page.margin_left_mm * PT_PER_MM;
        let right_gap = (page.width_mm - page.margin_right_mm) * PT_PER_MM
            - (last_col.x + last_col.w);
        assert!((left_gap - right_gap).abs() < 0.01);
    }

    #[test]
    fn test_cells_hang_from_top_margin() {
        let (config, page) = grid_3x8();
        let grid = Grid::compute(&config, &page).unwrap();
        let first = grid.cell_rect(0);
        let top = (page.height_mm - page.margin_top_mm) * PT_PER_MM;
        assert!((first.y + first.h - top).abs() < 0.01);
    }

    #[test]
    fn test_oversized_cell_is_config_error() {
        let (mut config, page) = grid_3x8();
        config.cell_width_mm = 500.0;
        let err = Grid::compute(&config, &page).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_both_modes_fit_a4() {
        let page = PageGeometry::a4();
        for mode in [LayoutMode::Clippings, LayoutMode::Magazines] {
            let grid = Grid::compute(&mode.config(), &page).unwrap();
            assert!(grid.cols >= 1, "{:?} has no columns", mode);
            assert!(grid.rows_per_page >= 1, "{:?} has no rows", mode);
        }
    }

    #[test]
    fn test_clippings_grid_on_a4() {
        let grid = Grid::compute(&LayoutMode::Clippings.config(), &PageGeometry::a4()).unwrap();
        // 196mm usable width / 65mm cells, 269mm usable height / 17mm cells
        assert_eq!(grid.cols, 3);
        assert_eq!(grid.rows_per_page, 15);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let (config, page) = grid_3x8();
        let input = records(10);
        let a = layout(&input, &config, &page).unwrap();
        let b = layout(&input, &config, &page).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_placement_text_lines() {
        let (config, page) = grid_3x8();
        let input = vec![Record::new("Vogue", "12", "2023")];
        let pages = layout(&input, &config, &page).unwrap();
        assert_eq!(pages[0][0].heading, "Vogue");
        assert_eq!(pages[0][0].body, "12/2023");
    }

    #[test]
    fn test_mode_filenames() {
        assert_eq!(LayoutMode::Clippings.output_filename(), "labels_clippings.pdf");
        assert_eq!(
            LayoutMode::Magazines.seen_set_filename(),
            "printed_magazines.hashes"
        );
    }
}
