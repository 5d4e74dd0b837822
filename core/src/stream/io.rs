// ## Normalized input for source-backed collaborators

use std::io::Read;
use std::path::PathBuf;
use bytes::Bytes;

use crate::types::HarnessError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Bytes),
}

impl std::fmt::Debug for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Reader(_) => f.write_str("InputSource::Reader(..)"),
            InputSource::File(p) => write!(f, "InputSource::File({})", p.display()),
            InputSource::Memory(b) => write!(f, "InputSource::Memory({} bytes)", b.len()),
        }
    }
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, HarnessError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => {
            if !p.exists() {
                return Err(HarnessError::SourceNotFound(p.display().to_string()));
            }
            Box::new(std::fs::File::open(p)?)
        }
        InputSource::Memory(b) => Box::new(std::io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
/// Anything short of `buf.len()` means the reader hit EOF.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<usize, HarnessError> {
    let mut off = 0;

    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(HarnessError::Io(e)),
        }
    }

    Ok(off)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_or_eof_reports_short_tail() {
        let mut r = open_input(InputSource::Memory(Bytes::from_static(b"abcde"))).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 2);
        assert_eq!(read_exact_or_eof(&mut r, &mut buf).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_source_not_found() {
        assert!(matches!(
            open_input(InputSource::File("/nonexistent/clip.yuv".into())),
            Err(HarnessError::SourceNotFound(_))
        ));
    }
}
