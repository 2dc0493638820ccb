// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing scene bundles as the viewer's JSON asset files.
//!
//! One file per category (`walls.json`, `doors.json`, `windows.json`,
//! `furniture.json`), each a pretty-printed JSON array with 2-space indent and
//! no trailing newline. Existing files are overwritten.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{Category, SceneBundle};

/// Render one category of `bundle` exactly as it is written to disk.
pub fn render(bundle: &SceneBundle, category: Category) -> Result<String> {
    serde_json::to_string_pretty(bundle.records(category))
        .map_err(|source| Error::Encode { category, source })
}

/// Write all four category files of `bundle` into `output_dir`.
///
/// The directory is created if missing. Files are written one after another;
/// each file is replaced atomically, but a failure does not roll back the
/// files already written. Returns the written paths in category order.
pub fn serialize(bundle: &SceneBundle, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|source| Error::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let path = output_dir.join(category.file_name());
        let json = render(bundle, category)?;

        write_replace(&path, json.as_bytes()).map_err(|source| Error::Write {
            category,
            path: path.clone(),
            source,
        })?;

        tracing::info!(
            category = %category,
            records = bundle.records(category).len(),
            path = %path.display(),
            "Wrote category file"
        );
        written.push(path);
    }

    Ok(written)
}

/// Replace `path` with `data`, via a sibling temporary file and rename.
pub(crate) fn write_replace(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
