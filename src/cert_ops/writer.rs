//! Container file output

use crate::utils::CertFileError;
use std::io::Write;
use std::path::Path;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "cert_chain_no_key.p12";

/// Owner read/write, everyone else read
pub const DEFAULT_MODE: u32 = 0o644;

/// Write `data` as the full contents of `path`, creating or truncating it.
///
/// On Unix a newly created file gets `mode` (minus the process umask).
/// An existing file keeps its permissions.
pub fn write_container(path: &Path, data: &[u8], mode: u32) -> Result<(), CertFileError> {
    let write_error = |e: std::io::Error| CertFileError::FileWriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options.open(path).map_err(write_error)?;
    file.write_all(data).map_err(write_error)?;
    file.sync_all().map_err(write_error)?;

    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote PKCS#12 file");
    Ok(())
}
