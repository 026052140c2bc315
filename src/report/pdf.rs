use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("no se pudo codificar la imagen del gráfico: {0}")]
    Image(#[from] image::ImageError),

    #[error("no se pudo construir el PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("no se pudo escribir el PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Page geometry of the report, in PDF points from the bottom-left corner.
#[derive(Debug, Clone)]
pub struct PdfLayout {
    pub page_width: i64,
    pub page_height: i64,
    pub font_size: i64,
    pub title: String,
    pub title_pos: (i64, i64),
    /// Lower-left corner of the chart.
    pub image_pos: (i64, i64),
    pub image_size: (i64, i64),
    pub heading: String,
    pub heading_pos: (i64, i64),
    /// Vertical distance between prediction lines.
    pub line_step: i64,
    pub max_predictions: usize,
}

impl Default for PdfLayout {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 595,
            page_height: 842,
            font_size: 12,
            title: "Informe de Análisis de Datos".to_string(),
            title_pos: (100, 750),
            image_pos: (50, 450),
            image_size: (500, 250),
            heading: "Predicciones:".to_string(),
            heading_pos: (100, 400),
            line_step: 20,
            max_predictions: 10,
        }
    }
}

/// `Predicción N: V` for the first `limit` predictions, N starting at 1.
pub fn prediction_lines(predictions: &[f64], limit: usize) -> Vec<String> {
    predictions
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, p)| format!("Predicción {}: {p:.2}", i + 1))
        .collect()
}

/// Write the one-page report: title, chart, and the leading predictions.
/// Any existing file at `path` is replaced.
pub fn write_report(
    path: &Path,
    chart: &RgbImage,
    predictions: &[f64],
    layout: &PdfLayout,
) -> Result<(), PdfError> {
    let mut jpeg = Vec::new();
    chart.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(chart.width()),
            "Height" => i64::from(chart.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let content = Content {
        operations: page_operations(predictions, layout),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(layout.page_width),
            Object::Integer(layout.page_height),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1_i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path)?;
    Ok(())
}

fn page_operations(predictions: &[f64], layout: &PdfLayout) -> Vec<Operation> {
    let mut ops = Vec::new();

    text(&mut ops, &layout.title, layout.title_pos, layout.font_size);

    let (x, y) = layout.image_pos;
    let (w, h) = layout.image_size;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            Object::Integer(w),
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(h),
            Object::Integer(x),
            Object::Integer(y),
        ],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]));
    ops.push(Operation::new("Q", vec![]));

    text(&mut ops, &layout.heading, layout.heading_pos, layout.font_size);

    let (hx, hy) = layout.heading_pos;
    for (i, line) in prediction_lines(predictions, layout.max_predictions)
        .iter()
        .enumerate()
    {
        let y = hy - (i as i64 + 1) * layout.line_step;
        text(&mut ops, line, (hx, y), layout.font_size);
    }

    ops
}

fn text(ops: &mut Vec<Operation>, s: &str, (x, y): (i64, i64), size: i64) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(b"F1".to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(s), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

/// Encode for the standard-14 fonts' WinAnsi encoding, which agrees with
/// Latin-1 for every character the report uses.  Others become `?`.
fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c as u32 {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}
