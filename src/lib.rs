//! A library for extracting product metadata from [Windows
//! Installer](https://en.wikipedia.org/wiki/Windows_Installer) (MSI) files.
//!
//! An MSI file consists of a relational database stored within a [Compound
//! File Binary](https://en.wikipedia.org/wiki/Compound_File_Binary_Format)
//! file.  This crate decodes just enough of that database (the string pool,
//! the column schemas, and the `Property`, `File` and `Feature` tables) to
//! describe the package: its product code, name, version and publisher, the
//! commands to install and uninstall it, the architecture it targets, and
//! checksums of the file itself.  No installer engine is involved.
//!
//! # Example
//!
//! ```no_run
//! let metadata = msi_metadata::extract_path(
//!     "installer.msi",
//!     msi_metadata::ExtractOptions::default(),
//! )?;
//! println!("{:?} {:?}", metadata.product_name(), metadata.product_version());
//! # Ok::<(), msi_metadata::Error>(())
//! ```

#![warn(missing_docs)]

mod internal;

pub use internal::checksum::Checksums;
pub use internal::codepage::CodePage;
pub use internal::column::{Column, ColumnType};
pub use internal::error::{Error, Result};
pub use internal::metadata::{Architecture, ExtractOptions, MsiMetadata};
pub use internal::package::Package;
pub use internal::property::{Properties, PropertyMap};
pub use internal::stream::Streams;
pub use internal::streamname::{
    decode as decode_stream_name, encode as encode_stream_name,
};
pub use internal::stringpool::{StringPool, StringRef};
pub use internal::table::Table;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

// ========================================================================= //

/// Opens an existing MSI file at the given path.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Package<fs::File>> {
    Package::open(fs::File::open(path)?)
}

/// Extracts the metadata of the MSI package read from `inner`.
///
/// The whole source is hashed first, then parsed as a package.  Extraction
/// either succeeds completely or returns the first error encountered.
pub fn extract<F: Read + Seek>(
    mut inner: F,
    options: ExtractOptions,
) -> Result<MsiMetadata> {
    let length = inner.seek(SeekFrom::End(0))?;
    let checksums = Checksums::compute(&mut inner, length)?;
    inner.rewind()?;
    let mut package = Package::open(inner)?;
    package.metadata(options, &checksums)
}

/// Extracts the metadata of the MSI file at the given path.
pub fn extract_path<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<MsiMetadata> {
    extract(fs::File::open(path)?, options)
}

// ========================================================================= //
