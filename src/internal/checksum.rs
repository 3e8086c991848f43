use crate::internal::error::Result;
use log::debug;
use sha2::{Digest, Sha256};
use std::io::{self, Read, Seek, SeekFrom};

// ========================================================================= //

const CHUNK_SIZE: usize = 64 * 1024;
const BYTES_PER_MEGABYTE: f64 = (1024 * 1024) as f64;

// ========================================================================= //

/// Integrity checksums and size of a package file.
#[derive(Clone, Debug, PartialEq)]
pub struct Checksums {
    sha256: String,
    md5: String,
    size_mb: f64,
}

impl Checksums {
    /// Reads the first `length` bytes of the source once, feeding both
    /// digests from the same buffer.  A source that ends early is hashed up
    /// to where it ends.
    pub fn compute<R: Read + Seek>(
        mut reader: R,
        length: u64,
    ) -> Result<Checksums> {
        reader.seek(SeekFrom::Start(0))?;
        let mut reader = reader.take(length);
        let mut sha256 = Sha256::new();
        let mut md5 = md5::Context::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let count = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => count,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {
                    continue;
                }
                Err(error) => return Err(error.into()),
            };
            sha256.update(&buffer[..count]);
            md5.consume(&buffer[..count]);
            total += count as u64;
        }
        if total < length {
            debug!("Source ended after {total} of {length} bytes");
        }
        Ok(Checksums {
            sha256: hex::encode(sha256.finalize()),
            md5: format!("{:x}", md5.compute()),
            size_mb: length as f64 / BYTES_PER_MEGABYTE,
        })
    }

    /// Returns the lowercase hex SHA-256 digest.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Returns the lowercase hex MD5 digest.
    pub fn md5(&self) -> &str {
        &self.md5
    }

    /// Returns the size of the source in megabytes (2^20 bytes).
    pub fn size_mb(&self) -> f64 {
        self.size_mb
    }
}

// ========================================================================= //


// ========================================================================= //
