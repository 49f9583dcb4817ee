//! CSV export of stored items.
//!
//! Column order is fixed so spreadsheets built on earlier exports keep
//! working: `id,url,title,description,tags,added_by,added_at,file_id,
//! file_name,file_type`.

use crate::capture::format_tags;
use crate::model::item::{Item, ItemId};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub const EXPORT_FILE_NAME: &str = "items_export.csv";

const EXPORT_HEADER: [&str; 10] = [
    "id",
    "url",
    "title",
    "description",
    "tags",
    "added_by",
    "added_at",
    "file_id",
    "file_name",
    "file_type",
];

#[derive(Debug)]
pub enum ExportError {
    Csv(csv::Error),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv export failed: {err}"),
            Self::Io(err) => write!(f, "export write failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: ItemId,
    url: Option<&'a str>,
    title: &'a str,
    description: &'a str,
    tags: String,
    added_by: Option<i64>,
    added_at: &'a str,
    file_id: Option<&'a str>,
    file_name: Option<&'a str>,
    file_type: Option<&'a str>,
}

impl<'a> From<&'a Item> for ExportRow<'a> {
    fn from(item: &'a Item) -> Self {
        let file = item.file.as_ref();
        Self {
            id: item.id,
            url: item.url.as_deref(),
            title: &item.title,
            description: &item.description,
            tags: format_tags(&item.tags),
            added_by: item.added_by,
            added_at: &item.added_at,
            file_id: file.map(|f| f.file_id.as_str()),
            file_name: file.and_then(|f| f.file_name.as_deref()),
            file_type: file.and_then(|f| f.mime_type.as_deref()),
        }
    }
}

/// Writes `items` as CSV with a header row. Returns the number of rows.
pub fn write_items_csv<W: Write>(items: &[Item], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for item in items {
        csv_writer.serialize(ExportRow::from(item))?;
    }
    csv_writer.flush()?;
    Ok(items.len())
}

/// Renders the export into memory, for sending as a document.
pub fn items_csv_bytes(items: &[Item]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    write_items_csv(items, &mut buffer)?;
    Ok(buffer)
}
