//! Invoice rendering as a pure function of an order.
//!
//! The output is a single-page A4 PDF using the standard Helvetica font, so no font
//! embedding is needed. Transport (headers, streaming) stays in the route layer.

use rust_decimal::Decimal;

use crate::models::OrderDetail;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl InvoiceDocument {
    pub const CONTENT_TYPE: &'static str = "application/pdf";

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }
}

pub fn invoice_file_name(order_id: i64) -> String {
    format!("invoice_order_{order_id}.pdf")
}

pub fn render_invoice(order: &OrderDetail) -> InvoiceDocument {
    let unit_price = if order.quantity > 0 {
        (order.total_price / Decimal::from(order.quantity)).round_dp(2)
    } else {
        order.total_price
    };

    let lines = [
        format!("Order ID: {}", order.id),
        format!("Vendor: {}", order.vendor_name),
        format!("Product: {}", order.product_name),
        format!("Quantity: {}", order.quantity),
        format!("Unit price: INR {unit_price}"),
        format!("Total: INR {}", order.total_price),
        format!("Date: {}", order.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
    ];

    let mut content = String::new();
    let title_x = PAGE_WIDTH / 2 - 30;
    content.push_str(&format!(
        "BT /F1 18 Tf {title_x} {} Td (Invoice) Tj ET\n",
        PAGE_HEIGHT - MARGIN - 18
    ));
    let mut y = PAGE_HEIGHT - MARGIN - 60;
    for line in &lines {
        content.push_str(&format!(
            "BT /F1 12 Tf {MARGIN} {y} Td ({}) Tj ET\n",
            pdf_text(line)
        ));
        y -= 20;
    }

    InvoiceDocument {
        file_name: invoice_file_name(order.id),
        bytes: assemble_pdf(&content),
    }
}

/// Escapes PDF string delimiters and replaces anything Helvetica's standard encoding
/// cannot show.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}

fn assemble_pdf(content: &str) -> Vec<u8> {
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", index + 1));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!(
        "xref\n0 {}\n0000000000 65535 f \n",
        objects.len() + 1
    ));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));

    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn order() -> OrderDetail {
        OrderDetail {
            id: 17,
            vendor_id: 2,
            product_id: 5,
            product_name: "Ferris Mug (large)".into(),
            vendor_name: "Asha Stores".into(),
            quantity: 3,
            total_price: Decimal::from_str("59.97").unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 0).unwrap(),
        }
    }

    fn as_text(doc: &InvoiceDocument) -> String {
        String::from_utf8(doc.bytes.clone()).unwrap()
    }

    #[test]
    fn renders_order_fields() {
        let doc = render_invoice(&order());
        let text = as_text(&doc);

        assert_eq!(doc.file_name, "invoice_order_17.pdf");
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("Td (Invoice) Tj ET\n"));
        assert!(text.contains("trailer\n<< /Size 6 /Root 1 0 R >>"));
        assert!(text.contains("(Order ID: 17)"));
        assert!(text.contains("(Vendor: Asha Stores)"));
        assert!(text.contains("(Product: Ferris Mug \\(large\\))"));
        assert!(text.contains("(Quantity: 3)"));
        assert!(text.contains("(Unit price: INR 19.99)"));
        assert!(text.contains("(Total: INR 59.97)"));
        assert!(text.contains("(Date: 2025-03-09 14:05:00 UTC)"));
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(render_invoice(&order()), render_invoice(&order()));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let text = as_text(&render_invoice(&order()));
        let xref_at: usize = text
            .lines()
            .skip_while(|line| *line != "startxref")
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        assert!(text[xref_at..].starts_with("xref"));

        let entries: Vec<usize> = text[xref_at..]
            .lines()
            .skip(3)
            .take(5)
            .map(|line| line[..10].parse().unwrap())
            .collect();
        for (index, offset) in entries.into_iter().enumerate() {
            assert!(text[offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn replaces_unprintable_text() {
        assert_eq!(pdf_text("₹ 5 \\ ok"), "? 5 \\\\ ok");
    }

    #[test]
    fn disposition_names_the_file() {
        let doc = render_invoice(&order());
        assert_eq!(
            doc.content_disposition(),
            "attachment; filename=\"invoice_order_17.pdf\""
        );
    }
}
