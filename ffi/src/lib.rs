//! A basic foreign function interface (FFI) for extracting the product
//! metadata of [Windows
//! Installer](https://en.wikipedia.org/wiki/Windows_Installer) (MSI) files,
//! built on top of the `msi-metadata` crate.

#![warn(missing_docs)]

use msi_metadata::{ExtractOptions, MsiMetadata};
use safer_ffi::prelude::*;
use std::io;

// ========================================================================= //

trait MsiMetadataInfoDefault {
    fn default() -> Self;
}

/// Metadata of an MSI file.  When extraction fails, `error` describes why
/// and every other field is empty.
#[derive_ReprC]
#[repr(C)]
pub struct MsiMetadataInfo {
    /// Empty on success, otherwise a description of the failure.
    error: repr_c::String,

    /// The product code, a braced GUID.
    product_code: repr_c::String,
    /// The product version.
    product_version: repr_c::String,
    /// The product name.
    product_name: repr_c::String,
    /// The manufacturer of the product.
    publisher: repr_c::String,
    /// The upgrade code, a braced GUID.
    upgrade_code: repr_c::String,
    /// The numeric language identifier of the product.
    language: repr_c::String,
    /// Always "Application" on success.
    package_type: repr_c::String,
    /// The default installation directory, if the package names one.
    install_location: repr_c::String,
    /// A command line that installs the package silently.
    install_command: repr_c::String,
    /// A command line that uninstalls the product silently.
    uninstall_command: repr_c::String,
    /// One of "x64", "x86", "ARM64" or "Unknown".
    architecture: repr_c::String,
    /// The minimum Windows Installer version required.
    min_os_version: repr_c::String,
    /// The size of the MSI file in mebibytes.
    size_mb: f64,
    /// The lowercase hex SHA-256 digest of the MSI file.
    sha256: repr_c::String,
    /// The lowercase hex MD5 digest of the MSI file.
    md5: repr_c::String,

    /// The long names of the files the package installs.
    files: repr_c::Vec<repr_c::String>,
    /// The identifiers of the package's features.
    required_features: repr_c::Vec<repr_c::String>,
}

impl MsiMetadataInfoDefault for MsiMetadataInfo {
    fn default() -> Self {
        Self {
            error: "".into(),

            product_code: "".into(),
            product_version: "".into(),
            product_name: "".into(),
            publisher: "".into(),
            upgrade_code: "".into(),
            language: "".into(),
            package_type: "".into(),
            install_location: "".into(),
            install_command: "".into(),
            uninstall_command: "".into(),
            architecture: "".into(),
            min_os_version: "".into(),
            size_mb: 0.0,
            sha256: "".into(),
            md5: "".into(),

            files: repr_c::Vec::EMPTY,
            required_features: repr_c::Vec::EMPTY,
        }
    }
}

impl From<MsiMetadata> for MsiMetadataInfo {
    fn from(metadata: MsiMetadata) -> Self {
        Self {
            error: "".into(),

            product_code: text(metadata.product_code()),
            product_version: text(metadata.product_version()),
            product_name: text(metadata.product_name()),
            publisher: text(metadata.publisher()),
            upgrade_code: text(metadata.upgrade_code()),
            language: text(metadata.language()),
            package_type: text(metadata.package_type()),
            install_location: text(metadata.install_location()),
            install_command: text(metadata.install_command()),
            uninstall_command: text(metadata.uninstall_command()),
            architecture: metadata.architecture().as_str().to_string().into(),
            min_os_version: text(metadata.min_os_version()),
            size_mb: metadata.size_mb(),
            sha256: text(metadata.sha256()),
            md5: text(metadata.md5()),

            files: list(metadata.files()),
            required_features: list(metadata.required_features()),
        }
    }
}

fn text(value: Option<&str>) -> repr_c::String {
    value.unwrap_or_default().to_string().into()
}

fn list(values: Option<&[String]>) -> repr_c::Vec<repr_c::String> {
    let values: Vec<repr_c::String> = values
        .unwrap_or_default()
        .iter()
        .map(|value| value.clone().into())
        .collect();
    values.into()
}

// ========================================================================= //

/// Extracts the metadata of the MSI file at the given path.  The file and
/// feature lists are only read when requested.
#[ffi_export]
fn get_metadata(
    path: char_p::Ref<'_>,
    include_files: bool,
    include_features: bool,
) -> MsiMetadataInfo {
    let options = ExtractOptions::new()
        .files(include_files)
        .features(include_features);
    match msi_metadata::extract_path(path.to_str(), options) {
        Ok(metadata) => metadata.into(),
        Err(error) => MsiMetadataInfo {
            error: error.to_string().into(),
            ..MsiMetadataInfo::default()
        },
    }
}

/// Frees the memory of the given MsiMetadataInfo.
#[ffi_export]
fn free_metadata(info: MsiMetadataInfo) {
    drop(info);
}

/// Gets the `Property` table of the MSI file at the given path, as a list of
/// `[name, value]` pairs in name order.  Returns an empty list if the file
/// cannot be read.
#[ffi_export]
fn get_properties(
    path: char_p::Ref<'_>,
) -> repr_c::Vec<repr_c::Vec<repr_c::String>> {
    let properties = msi_metadata::open(path.to_str())
        .and_then(|mut package| package.properties());
    let properties = match properties {
        Ok(properties) => properties,
        Err(_) => return repr_c::Vec::EMPTY,
    };
    let rows: Vec<repr_c::Vec<repr_c::String>> = properties
        .iter()
        .map(|(name, value)| {
            let row: Vec<repr_c::String> =
                vec![name.to_string().into(), value.into_owned().into()];
            row.into()
        })
        .collect();
    rows.into()
}

/// Frees the memory of the get_properties result.
#[ffi_export]
fn free_properties(properties: repr_c::Vec<repr_c::Vec<repr_c::String>>) {
    drop(properties);
}

/// Generate headers/bindings for the exported functions.
pub fn generate_headers(lang: &str, filename: String) -> io::Result<()> {
    let file_extension;
    let language = match lang.to_lowercase().as_str() {
        "c" => {
            println!("Selected language: C");
            file_extension = "h";
            safer_ffi::headers::Language::C
        }
        "cs" | "c#" | "csharp" => {
            println!("Selected language: CSharp (C#)");
            file_extension = "cs";
            safer_ffi::headers::Language::CSharp
        }
        "py" | "python" => {
            println!("Selected language: Python (py)");
            file_extension = "cffi";
            safer_ffi::headers::Language::Python
        }
        _ => {
            println!("Unsupported language: {lang}");
            println!("Defaulting to C language.");
            file_extension = "h";
            safer_ffi::headers::Language::C
        }
    };
    let filename = if filename.is_empty() {
        println!("No filename specified.");
        println!("Defaulting to msi_metadata.{file_extension}");
        format!("msi_metadata.{file_extension}")
    } else if filename.ends_with(&format!(".{file_extension}")) {
        filename
    } else {
        format!("{filename}.{file_extension}")
    };
    safer_ffi::headers::builder()
        .with_language(language)
        .to_file(filename)?
        .generate()
}

// ========================================================================= //


// ========================================================================= //
