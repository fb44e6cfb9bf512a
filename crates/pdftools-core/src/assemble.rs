//! Build an image-only PDF from page rasters
//!
//! The output document is constructed from scratch: one page per JPEG, the
//! page sized to the image's pixel dimensions and the image painted over the
//! whole page. Nothing from the source document's object graph is carried
//! over, so no text or vector content can survive underneath a cover.

use std::io::Cursor;

use crate::error::PdfToolsError;
use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// A JPEG ready to be embedded without re-encoding
#[derive(Debug)]
pub struct JpegPage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub gray: bool,
}

impl JpegPage {
    /// Read dimensions and color model from the JPEG header
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, PdfToolsError> {
        let decoder = JpegDecoder::new(Cursor::new(data.as_slice()))
            .map_err(|e| PdfToolsError::ImageError(e.to_string()))?;

        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(PdfToolsError::ImageError(format!(
                "Image has zero size ({}x{})",
                width, height
            )));
        }
        let gray = matches!(decoder.color_type(), ColorType::L8 | ColorType::L16);

        Ok(Self {
            data,
            width,
            height,
            gray,
        })
    }

    fn color_space(&self) -> &'static str {
        if self.gray {
            "DeviceGray"
        } else {
            "DeviceRGB"
        }
    }
}

/// Assemble a new PDF with one full-page image per JPEG, in the given order
pub fn assemble_from_jpegs(images: Vec<Vec<u8>>) -> Result<Vec<u8>, PdfToolsError> {
    if images.is_empty() {
        return Err(PdfToolsError::NoPages);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(images.len());

    for (index, bytes) in images.into_iter().enumerate() {
        let page = JpegPage::from_bytes(bytes).map_err(|e| {
            PdfToolsError::ImageError(format!("Page {}: {}", index + 1, e))
        })?;
        let (width, height) = (page.width as i64, page.height as i64);

        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => page.color_space(),
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let image_id =
            doc.add_object(Stream::new(image_dict, page.data).with_compression(false));

        let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q", width, height);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => Object::Reference(image_id),
                },
            },
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(|e| {
        PdfToolsError::OperationError(format!("Failed to save assembled PDF: {}", e))
    })?;

    Ok(buffer)
}
