//! Reading possibly compressed log files.
//!
//! The compression is picked from the file name suffix:
//! `.tar.gz` (exactly one member), `.gz`, `.bz2`, `.xz`; anything else is read as-is.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use xz2::read::XzDecoder;

/// Extensions of compressed logs understood by [`read_log_bytes`].
pub const COMPRESSED_EXTENSIONS: &[&str] = &["gz", "tgz", "bz2", "xz"];

/// Read the raw bytes of a log, decompressing by suffix.
pub fn read_log_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return read_single_member_tar(GzDecoder::new(File::open(path)?));
    }

    let mut out = Vec::new();
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => GzDecoder::new(File::open(path)?).read_to_end(&mut out)?,
        Some("bz2") => BzDecoder::new(File::open(path)?).read_to_end(&mut out)?,
        Some("xz") => XzDecoder::new(File::open(path)?).read_to_end(&mut out)?,
        _ => return fs::read(path),
    };
    Ok(out)
}

fn read_single_member_tar<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());

    let mut archive = tar::Archive::new(reader);
    let mut entries = archive.entries()?;

    let mut out = Vec::new();
    {
        let mut first = entries
            .next()
            .ok_or_else(|| invalid("tar archive must contain exactly one file"))??;
        if !first.header().entry_type().is_file() {
            return Err(invalid("could not extract file from tar archive"));
        }
        first.read_to_end(&mut out)?;
    }

    if entries.next().is_some() {
        return Err(invalid("tar archive must contain exactly one file"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::tempdir;

    const LOG: &[u8] = b"2024-01-01 10:00:00 ERROR boom\n";

    fn write_tar_gz(path: &Path, members: &[(&str, &[u8])]) {
        let enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(enc);
        for (name, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn plain_file_is_read_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, LOG).unwrap();
        assert_eq!(read_log_bytes(&path).unwrap(), LOG);
    }

    #[test]
    fn gzip_is_decompressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(LOG).unwrap();
        enc.finish().unwrap();

        assert_eq!(read_log_bytes(&path).unwrap(), LOG);
    }

    #[test]
    fn bzip2_is_decompressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log.bz2");
        let mut enc =
            bzip2::write::BzEncoder::new(File::create(&path).unwrap(), bzip2::Compression::default());
        enc.write_all(LOG).unwrap();
        enc.finish().unwrap();

        assert_eq!(read_log_bytes(&path).unwrap(), LOG);
    }

    #[test]
    fn xz_is_decompressed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log.xz");
        let mut enc = xz2::write::XzEncoder::new(File::create(&path).unwrap(), 6);
        enc.write_all(LOG).unwrap();
        enc.finish().unwrap();

        assert_eq!(read_log_bytes(&path).unwrap(), LOG);
    }

    #[test]
    fn tar_gz_with_one_member_is_extracted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.tar.gz");
        write_tar_gz(&path, &[("app.log", LOG)]);

        assert_eq!(read_log_bytes(&path).unwrap(), LOG);
    }

    #[test]
    fn tar_gz_with_several_members_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs.tar.gz");
        write_tar_gz(&path, &[("a.log", LOG), ("b.log", LOG)]);

        let err = read_log_bytes(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("exactly one file"), "{err}");
    }

    #[test]
    fn corrupt_gzip_is_an_error_not_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log.gz");
        fs::write(&path, LOG).unwrap();
        assert!(read_log_bytes(&path).is_err());
    }
}
