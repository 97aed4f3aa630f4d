//! HTTP handlers for the Closet domain

pub mod events;
pub mod items;
pub mod outfits;

use axum::extract::Multipart;
use wardrobe_common::{Error, Result};

use crate::domain::entities::UploadFile;

/// Collect the file parts named `field_name`; other parts are ignored.
pub(crate) async fn read_files(mut multipart: Multipart, field_name: &str) -> Result<Vec<UploadFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(e.body_text()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;

        files.push(UploadFile::new(&filename, content_type, bytes.to_vec()));
    }

    Ok(files)
}
