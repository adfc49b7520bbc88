use std::path::Path;

use crate::Error;

/// Read a raw byte image. No container parsing happens here; the catalogs
/// interpret the bytes as-is.
pub fn load_image(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|err| Error::Io(path.to_path_buf(), err))
}
