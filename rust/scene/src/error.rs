// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the conversion pipeline.

use std::path::PathBuf;

use crate::types::Category;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting detections into viewer files.
///
/// Unknown class ids and unrecognised labels are not errors: they are either
/// dropped or bucketed as furniture depending on the profile.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A detection in the batch is malformed. The whole batch is rejected.
    #[error("invalid detection at index {index}: {reason}")]
    InvalidInput { index: usize, reason: String },

    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON for the expected schema.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The output directory could not be created.
    #[error("cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category file could not be written.
    #[error("cannot write {category} file {}: {source}", path.display())]
    Write {
        category: Category,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A category could not be encoded as JSON.
    #[error("cannot encode {category} records: {source}")]
    Encode {
        category: Category,
        #[source]
        source: serde_json::Error,
    },

    /// Legacy wall records could not be encoded as JSON.
    #[error("cannot encode legacy wall records: {0}")]
    EncodeLegacy(#[source] serde_json::Error),

    /// A legacy wall file could not be written.
    #[error("cannot write legacy wall file {}: {source}", path.display())]
    WriteLegacy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
