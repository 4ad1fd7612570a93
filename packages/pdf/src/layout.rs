//! Pagination of the case table.
//!
//! Cells are wrapped to their column width, rows are stacked from the top of
//! each page and the header row is repeated on every page. A row that would
//! cross the bottom margin moves to the next page; a row too tall for any
//! page is split between pages line by line.

use cause_list_models::{COLUMN_HEADERS, CaseRecord};

use crate::text::{Face, wrap};

/// Column widths of the reference layout, in inches. Scaled to fill the
/// printable width.
const COLUMN_INCHES: [f32; 4] = [0.6, 3.2, 3.5, 2.8];

const POINTS_PER_INCH: f32 = 72.0;

/// Page and table measurements, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Page width.
    pub page_width: f32,
    /// Page height.
    pub page_height: f32,
    /// Margin on every side.
    pub margin: f32,
    /// Body and header font size.
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    /// Left and right cell padding.
    pub pad_x: f32,
    /// Top and bottom cell padding.
    pub pad_y: f32,
    /// Title font size.
    pub title_size: f32,
    /// Space between the title and the table.
    pub title_gap: f32,
}

impl Geometry {
    /// Landscape A4 with the report's default styling.
    #[must_use]
    pub const fn landscape_a4() -> Self {
        Self {
            page_width: 842.0,
            page_height: 595.0,
            margin: 30.0,
            font_size: 9.0,
            leading: 11.0,
            pad_x: 6.0,
            pad_y: 4.0,
            title_size: 18.0,
            title_gap: 12.0,
        }
    }

    /// Column widths scaled to the printable width.
    #[must_use]
    pub fn column_widths(&self) -> [f32; 4] {
        let base: f32 = COLUMN_INCHES.iter().sum::<f32>() * POINTS_PER_INCH;
        let scale = (self.page_width - 2.0 * self.margin) / base;
        COLUMN_INCHES.map(|inches| inches * POINTS_PER_INCH * scale)
    }

    /// Height of the title block on the first page.
    #[must_use]
    pub fn title_height(&self) -> f32 {
        self.title_size * 1.2 + self.title_gap
    }

    /// Y coordinate where the table starts on a page.
    #[must_use]
    pub fn table_top(&self, first_page: bool) -> f32 {
        let top = self.page_height - self.margin;
        if first_page {
            top - self.title_height()
        } else {
            top
        }
    }

    /// Lowest y coordinate a row may reach.
    #[must_use]
    pub const fn table_bottom(&self) -> f32 {
        self.margin
    }

    /// Height of a row holding `lines` lines of text.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn row_height(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.leading + 2.0 * self.pad_y
    }

    /// Whole text lines that fit in `height`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn lines_fitting(&self, height: f32) -> usize {
        let room = (height - 2.0 * self.pad_y) / self.leading;
        if room < 1.0 { 0 } else { room.floor() as usize }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::landscape_a4()
    }
}

/// How a row is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    /// Bold header on dark background.
    Header,
    /// Body row on white.
    Even,
    /// Body row on light grey.
    Odd,
}

/// A row positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRow {
    /// Fill and font.
    pub style: RowStyle,
    /// Y coordinate of the row's top edge.
    pub top: f32,
    /// Row height.
    pub height: f32,
    /// Wrapped lines per cell.
    pub cells: Vec<Vec<String>>,
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Whether the report title is drawn on this page.
    pub has_title: bool,
    /// Rows from top to bottom, header first.
    pub rows: Vec<PlacedRow>,
}

impl Page {
    /// Rows other than the repeated header.
    pub fn body_rows(&self) -> impl Iterator<Item = &PlacedRow> {
        self.rows.iter().filter(|r| r.style != RowStyle::Header)
    }
}

/// Lays out `records` into pages. Always returns at least one page.
#[must_use]
pub fn paginate(records: &[CaseRecord], geometry: &Geometry) -> Vec<Page> {
    let widths = geometry.column_widths();
    let wrap_cells = |cells: &[String], face: Face| -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(widths)
            .map(|(text, width)| wrap(text, face, geometry.font_size, width - 2.0 * geometry.pad_x))
            .collect()
    };

    let header_cells = wrap_cells(&COLUMN_HEADERS.map(str::to_owned), Face::Bold);
    let mut pager = Pager::new(geometry, header_cells);

    for (index, record) in records.iter().enumerate() {
        let style = if index % 2 == 0 {
            RowStyle::Even
        } else {
            RowStyle::Odd
        };
        pager.place(style, wrap_cells(&record.cells(), Face::Regular));
    }

    pager.finish()
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(0)
}

/// Running state of [`paginate`].
struct Pager<'a> {
    geometry: &'a Geometry,
    header: Vec<Vec<String>>,
    pages: Vec<Page>,
    page: Page,
    y: f32,
}

impl<'a> Pager<'a> {
    fn new(geometry: &'a Geometry, header: Vec<Vec<String>>) -> Self {
        let mut pager = Self {
            geometry,
            header,
            pages: Vec::new(),
            page: Page {
                has_title: true,
                rows: Vec::new(),
            },
            y: geometry.table_top(true),
        };
        pager.push_header();
        pager
    }

    fn push_header(&mut self) {
        let cells = self.header.clone();
        self.push(RowStyle::Header, cells);
    }

    fn push(&mut self, style: RowStyle, cells: Vec<Vec<String>>) {
        let height = self.geometry.row_height(line_count(&cells));
        self.page.rows.push(PlacedRow {
            style,
            top: self.y,
            height,
            cells,
        });
        self.y -= height;
    }

    fn new_page(&mut self) {
        let finished = std::mem::replace(
            &mut self.page,
            Page {
                has_title: false,
                rows: Vec::new(),
            },
        );
        self.pages.push(finished);
        self.y = self.geometry.table_top(false);
        self.push_header();
    }

    fn place(&mut self, style: RowStyle, mut cells: Vec<Vec<String>>) {
        let bottom = self.geometry.table_bottom();
        let header_height = self.geometry.row_height(line_count(&self.header));
        let fresh_room = self.geometry.table_top(false) - header_height - bottom;

        loop {
            let height = self.geometry.row_height(line_count(&cells));
            if self.y - height >= bottom {
                self.push(style, cells);
                return;
            }

            let room = self.geometry.lines_fitting(self.y - bottom);
            let page_has_body = self.page.body_rows().next().is_some();

            if page_has_body && (height <= fresh_room || room == 0) {
                self.new_page();
                continue;
            }

            let take = room.max(1);
            let rest: Vec<Vec<String>> = cells
                .iter_mut()
                .map(|lines| lines.split_off(take.min(lines.len())))
                .collect();

            self.push(style, cells);
            if line_count(&rest) == 0 {
                return;
            }

            log::debug!("Splitting a tall row across pages");
            self.new_page();
            cells = rest;
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.page);
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(serial: u32, party: &str) -> CaseRecord {
        CaseRecord {
            serial: Some(serial),
            case_info: format!("CC/{serial}/2024"),
            party_name: party.to_owned(),
            advocates: "Adv".to_owned(),
        }
    }

    #[test]
    fn columns_fill_printable_width() {
        let geometry = Geometry::landscape_a4();
        let total: f32 = geometry.column_widths().iter().sum();
        assert!((total - 782.0).abs() < 0.01, "{total}");
    }

    #[test]
    fn empty_report_is_one_header_only_page() {
        let pages = paginate(&[], &Geometry::default());

        assert_eq!(pages.len(), 1);
        assert!(pages[0].has_title);
        assert_eq!(pages[0].rows.len(), 1);
        assert_eq!(pages[0].rows[0].style, RowStyle::Header);
        assert_eq!(pages[0].rows[0].cells[0], vec!["Sr No".to_owned()]);
    }

    #[test]
    fn many_rows_paginate_with_repeated_header() {
        let records: Vec<CaseRecord> = (1..=100).map(|n| record(n, "A versus B")).collect();
        let geometry = Geometry::default();
        let pages = paginate(&records, &geometry);

        assert!(pages.len() > 1);
        let body: usize = pages.iter().map(|p| p.body_rows().count()).sum();
        assert_eq!(body, 100);

        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.has_title, i == 0);
            assert_eq!(page.rows[0].style, RowStyle::Header);
            for row in &page.rows {
                assert!(row.top - row.height >= geometry.table_bottom() - 1e-3);
            }
        }
    }

    #[test]
    fn body_rows_alternate_styles() {
        let records = [record(1, "a"), record(2, "b"), record(3, "c")];
        let pages = paginate(&records, &Geometry::default());
        let styles: Vec<RowStyle> = pages[0].body_rows().map(|r| r.style).collect();
        assert_eq!(styles, vec![RowStyle::Even, RowStyle::Odd, RowStyle::Even]);
    }

    #[test]
    fn oversized_row_is_split_across_pages() {
        let party = "Petitioner ".repeat(2000);
        let pages = paginate(&[record(1, &party)], &Geometry::default());

        assert!(pages.len() > 1);
        let party_lines: usize = pages
            .iter()
            .flat_map(Page::body_rows)
            .map(|row| row.cells[2].len())
            .sum();
        let expected = wrap(
            party.trim(),
            Face::Regular,
            9.0,
            Geometry::default().column_widths()[2] - 12.0,
        )
        .len();
        assert_eq!(party_lines, expected);
        // The serial stays with the first slice only.
        assert_eq!(pages[1].body_rows().next().unwrap().cells[0], Vec::<String>::new());
    }
}
