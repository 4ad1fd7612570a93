//! PDF assembly with `lopdf`.
//!
//! Turns laid-out [`Page`]s into content streams: row fills first, then the
//! grid, then text, so text is never covered by a later fill.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::layout::{Geometry, Page, PlacedRow, RowStyle};
use crate::text::{Face, encode_win_ansi, text_width};
use crate::{RenderError, ReportOptions};

type Rgb = (f32, f32, f32);

/// `#003366`
const HEADER_FILL: Rgb = (0.0, 0.2, 0.4);
/// `whitesmoke`
const HEADER_TEXT: Rgb = (0.961, 0.961, 0.961);
/// `#f3f3f3`
const ODD_FILL: Rgb = (0.953, 0.953, 0.953);
const EVEN_FILL: Rgb = (1.0, 1.0, 1.0);
const GRID: Rgb = (0.502, 0.502, 0.502);
const GRID_WIDTH: f32 = 0.25;
const BODY_TEXT: Rgb = (0.0, 0.0, 0.0);
const FOOTER_SIZE: f32 = 8.0;

/// Builds the complete document and serializes it.
pub fn build(
    pages: &[Page],
    geometry: &Geometry,
    options: &ReportOptions,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [Face::Regular, Face::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);

    for (index, page) in pages.iter().enumerate() {
        let mut painter = Painter::default();
        if page.has_title {
            painter.title(&options.title, geometry);
        }
        painter.table(page, geometry);
        painter.footer(&format!("Page {} of {total}", index + 1), geometry);

        let content = Content {
            operations: painter.ops,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = i64::try_from(total).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                geometry.page_width.into(),
                geometry.page_height.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = info(&mut doc, options);
    doc.trailer.set("Info", info_id);

    if options.compress {
        doc.compress();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}

fn info(doc: &mut Document, options: &ReportOptions) -> ObjectId {
    let created = options.generated_at.format("D:%Y%m%d%H%M%SZ").to_string();
    doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(&options.title), StringFormat::Literal),
        "Producer" => Object::string_literal(concat!("cause_list ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(created),
    })
}

/// Accumulates content stream operations for one page.
#[derive(Default)]
struct Painter {
    ops: Vec<Operation>,
}

impl Painter {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn fill_color(&mut self, (r, g, b): Rgb) {
        self.op("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn stroke_color(&mut self, (r, g, b): Rgb) {
        self.op("RG", vec![r.into(), g.into(), b.into()]);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.op("re", vec![x.into(), y.into(), width.into(), height.into()]);
    }

    fn text(&mut self, face: Face, size: f32, x: f32, y: f32, text: &str) {
        self.op("BT", vec![]);
        self.op("Tf", vec![face.resource().into(), size.into()]);
        self.op("Td", vec![x.into(), y.into()]);
        self.op(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.op("ET", vec![]);
    }

    fn title(&mut self, title: &str, geometry: &Geometry) {
        let width = text_width(title, Face::Bold, geometry.title_size);
        let x = ((geometry.page_width - width) / 2.0).max(geometry.margin);
        let y = geometry.page_height - geometry.margin - geometry.title_size;
        self.fill_color(BODY_TEXT);
        self.text(Face::Bold, geometry.title_size, x, y, title);
    }

    fn footer(&mut self, label: &str, geometry: &Geometry) {
        let width = text_width(label, Face::Regular, FOOTER_SIZE);
        let x = (geometry.page_width - width) / 2.0;
        let y = geometry.margin / 2.0;
        self.fill_color(BODY_TEXT);
        self.text(Face::Regular, FOOTER_SIZE, x, y, label);
    }

    fn table(&mut self, page: &Page, geometry: &Geometry) {
        let widths = geometry.column_widths();
        let table_width: f32 = widths.iter().sum();
        let left = geometry.margin;

        for row in &page.rows {
            self.fill_color(match row.style {
                RowStyle::Header => HEADER_FILL,
                RowStyle::Even => EVEN_FILL,
                RowStyle::Odd => ODD_FILL,
            });
            self.rect(left, row.top - row.height, table_width, row.height);
            self.op("f", vec![]);
        }

        self.stroke_color(GRID);
        self.op("w", vec![GRID_WIDTH.into()]);
        for row in &page.rows {
            let mut x = left;
            for width in widths {
                self.rect(x, row.top - row.height, width, row.height);
                x += width;
            }
        }
        self.op("S", vec![]);

        for row in &page.rows {
            self.row_text(row, &widths, geometry);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn row_text(&mut self, row: &PlacedRow, widths: &[f32; 4], geometry: &Geometry) {
        let (face, color) = match row.style {
            RowStyle::Header => (Face::Bold, HEADER_TEXT),
            RowStyle::Even | RowStyle::Odd => (Face::Regular, BODY_TEXT),
        };
        self.fill_color(color);

        let mut x = geometry.margin;
        for (lines, width) in row.cells.iter().zip(widths) {
            for (i, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = row.top
                    - geometry.pad_y
                    - geometry.font_size
                    - i as f32 * geometry.leading;
                self.text(face, geometry.font_size, x + geometry.pad_x, baseline, line);
            }
            x += width;
        }
    }
}
