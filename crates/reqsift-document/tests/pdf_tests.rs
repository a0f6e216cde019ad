//! Text extraction from generated PDF fixtures

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use reqsift_document::DocumentReader;
use reqsift_domain::traits::TextExtractor;
use std::io::Write;

/// Build a PDF with one line of Helvetica text per page
fn create_test_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(font_id),
        },
    });

    let mut page_ids = Vec::new();
    for line in lines {
        let content = format!("BT /F1 12 Tf 50 700 Td ({}) Tj ET", line);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        page_ids.push(Object::Reference(page_id));
    }

    let count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_pdf_pages_are_concatenated_in_order() {
    let pdf = create_test_pdf(&["FirstPageRequirement", "SecondPageRequirement"]);

    let text = DocumentReader::pdf_text(&pdf).unwrap();

    let first = text.find("FirstPageRequirement").expect("first page text");
    let second = text.find("SecondPageRequirement").expect("second page text");
    assert!(first < second);
}

#[test]
fn test_pdf_file_by_path() {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(&create_test_pdf(&["PerformanceSection"])).unwrap();

    let text = DocumentReader::new().extract_text(file.path()).unwrap();
    assert!(text.contains("PerformanceSection"));
}
