//! CSV find/replace.
//!
//! Substitution is applied per field, after quoting has been resolved, so a
//! find string containing a comma still matches inside a quoted field and the
//! rewritten output is re-quoted correctly. The first row is treated like any
//! other row; the engine has no notion of headers. Ragged rows (rows with
//! differing field counts) pass through unchanged.
//!
//! Line terminators are normalized to `\n` and quoting is re-applied minimally
//! on output; the row/column structure itself is always preserved.

use csv::{ReaderBuilder, WriterBuilder};

use super::{DocumentFormat, EngineError, ReplaceOutcome};

fn corrupt(err: csv::Error) -> EngineError {
    EngineError::Corrupt {
        format: DocumentFormat::Csv,
        message: err.to_string(),
    }
}

pub fn replace(bytes: &[u8], find: &str, replace_with: &str) -> Result<ReplaceOutcome, EngineError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    let mut replacements = 0usize;
    for record in reader.records() {
        let record = record.map_err(corrupt)?;
        let rewritten: Vec<String> = record
            .iter()
            .map(|field| {
                replacements += field.matches(find).count();
                field.replace(find, replace_with)
            })
            .collect();
        writer.write_record(&rewritten).map_err(|e| EngineError::Serialize {
            format: DocumentFormat::Csv,
            message: e.to_string(),
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| EngineError::Serialize {
        format: DocumentFormat::Csv,
        message: e.to_string(),
    })?;

    Ok(ReplaceOutcome { bytes, replacements })
}
