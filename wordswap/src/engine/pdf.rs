//! PDF find/replace.
//!
//! The document is rewritten in place: each page's content stream is decoded
//! and the string operands of the text-showing operators (`Tj`, `'`, `"`,
//! `TJ`) are edited, then the stream is re-encoded. Object and page structure,
//! fonts, and positioning operators are untouched, so the output stays a valid
//! PDF with the original layout.
//!
//! Text encoding is handled in two tiers. Operands carrying a UTF-16BE
//! byte-order mark are decoded and re-encoded as UTF-16BE, where any
//! replacement is representable. All other operands are treated as single-byte
//! text: untouched bytes round-trip exactly, and replacement characters must
//! fit in a single byte or the substitution is rejected as unrepresentable.
//!
//! A match never spans two text-showing operands; text a writer split across
//! operands (e.g. for kerning) will not be found.

use lopdf::{Document, Object};

use super::{DocumentFormat, EngineError, ReplaceOutcome};

/// Operators whose string operands carry visible text.
const TEXT_SHOWING_OPERATORS: [&str; 4] = ["Tj", "'", "\"", "TJ"];

fn corrupt(message: impl Into<String>) -> EngineError {
    EngineError::Corrupt {
        format: DocumentFormat::Pdf,
        message: message.into(),
    }
}

// `save_to` reports std::io::Error while the content-stream APIs report
// lopdf::Error, so this stays generic over the source.
fn serialize_err(err: impl std::fmt::Display) -> EngineError {
    EngineError::Serialize {
        format: DocumentFormat::Pdf,
        message: err.to_string(),
    }
}

pub fn replace(bytes: &[u8], find: &str, replace_with: &str) -> Result<ReplaceOutcome, EngineError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| corrupt(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(corrupt("document is encrypted"));
    }

    let pages = doc.get_pages();
    let mut replacements = 0usize;

    for (page_number, page_id) in pages {
        let mut content = doc
            .get_and_decode_page_content(page_id)
            .map_err(|e| corrupt(format!("page {page_number}: {e}")))?;

        let mut page_replacements = 0usize;
        for operation in &mut content.operations {
            if !TEXT_SHOWING_OPERATORS.contains(&operation.operator.as_str()) {
                continue;
            }
            for operand in &mut operation.operands {
                page_replacements += rewrite_operand(operand, find, replace_with)?;
            }
        }

        if page_replacements > 0 {
            let encoded = content.encode().map_err(serialize_err)?;
            doc.change_page_content(page_id, encoded).map_err(serialize_err)?;
            replacements += page_replacements;
        }
    }

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(serialize_err)?;

    Ok(ReplaceOutcome { bytes: out, replacements })
}

/// Rewrite a single operand, recursing into `TJ` arrays. Returns the number of
/// occurrences replaced.
fn rewrite_operand(operand: &mut Object, find: &str, replace_with: &str) -> Result<usize, EngineError> {
    match operand {
        Object::String(bytes, _) => rewrite_text(bytes, find, replace_with),
        Object::Array(elements) => {
            let mut count = 0;
            for element in elements {
                count += rewrite_operand(element, find, replace_with)?;
            }
            Ok(count)
        }
        _ => Ok(0),
    }
}

fn rewrite_text(bytes: &mut Vec<u8>, find: &str, replace_with: &str) -> Result<usize, EngineError> {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        rewrite_utf16(bytes, find, replace_with)
    } else {
        rewrite_single_byte(bytes, find, replace_with)
    }
}

/// UTF-16BE string operand (leading BOM). Any replacement is representable.
fn rewrite_utf16(bytes: &mut Vec<u8>, find: &str, replace_with: &str) -> Result<usize, EngineError> {
    let payload = &bytes[2..];
    if payload.len() % 2 != 0 {
        return Err(corrupt("UTF-16 string has an odd byte length"));
    }
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    let text: String = char::decode_utf16(units.into_iter())
        .collect::<Result<String, _>>()
        .map_err(|_| corrupt("invalid UTF-16 text in string operand"))?;

    let count = text.matches(find).count();
    if count == 0 {
        return Ok(0);
    }

    let replaced = text.replace(find, replace_with);
    let mut encoded = vec![0xFE, 0xFF];
    for unit in replaced.encode_utf16() {
        encoded.extend_from_slice(&unit.to_be_bytes());
    }
    *bytes = encoded;
    Ok(count)
}

/// Single-byte string operand. Bytes map one-to-one onto the first Unicode
/// block, so untouched text round-trips exactly; replacement characters above
/// U+00FF cannot be encoded and fail the substitution.
fn rewrite_single_byte(bytes: &mut Vec<u8>, find: &str, replace_with: &str) -> Result<usize, EngineError> {
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let count = text.matches(find).count();
    if count == 0 {
        return Ok(0);
    }

    let replaced = text.replace(find, replace_with);
    let mut encoded = Vec::with_capacity(replaced.len());
    for ch in replaced.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(EngineError::Unrepresentable {
                message: format!("character '{ch}' does not fit the document's single-byte text encoding"),
            });
        }
        encoded.push(code as u8);
    }
    *bytes = encoded;
    Ok(count)
}
