use crate::errors::AppResult;
use std::fs;
use std::io;
use std::path::Path;
use zip::ZipWriter;
use zip::write::FileOptions;

/// Write `src` as the single entry `entry_name` of a new deflated zip at `dest`.
pub fn zip_single_file(src: &Path, dest: &Path, entry_name: &str) -> AppResult<()> {
    let file = fs::File::create(dest)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(entry_name, options)
        .map_err(io::Error::other)?;

    let mut f = fs::File::open(src)?;
    io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(io::Error::other)?;

    Ok(())
}
