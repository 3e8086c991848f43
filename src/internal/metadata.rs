use crate::internal::checksum::Checksums;
use crate::internal::codepage::CodePage;
use crate::internal::property::PropertyMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ========================================================================= //

const PACKAGE_TYPE: &str = "Application";

const PROPERTY_INSTALL_LOCATION: &str = "TARGETDIR";
const PROPERTY_LANGUAGE: &str = "ProductLanguage";
const PROPERTY_MANUFACTURER: &str = "Manufacturer";
const PROPERTY_MIN_VERSION: &str = "MinVersion";
const PROPERTY_PRODUCT_CODE: &str = "ProductCode";
const PROPERTY_PRODUCT_NAME: &str = "ProductName";
const PROPERTY_PRODUCT_VERSION: &str = "ProductVersion";
const PROPERTY_TEMPLATE: &str = "Template";
const PROPERTY_UPGRADE_CODE: &str = "UpgradeCode";

// ========================================================================= //

/// The hardware architecture a package targets.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Architecture {
    /// 64-bit x86 (AMD64 / Intel64).
    #[serde(rename = "x64")]
    X64,
    /// 32-bit x86.
    #[serde(rename = "x86")]
    X86,
    /// 64-bit ARM.
    #[serde(rename = "ARM64")]
    Arm64,
    /// None of the above could be determined.
    Unknown,
}

impl Architecture {
    /// Infers the architecture from a template string such as
    /// `"Intel64;1033"`.  The first matching rule wins, so a template naming
    /// both `Intel64` and `Intel` is `X64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use msi_metadata::Architecture::{self, Unknown, X64, X86};
    /// assert_eq!(Architecture::from_template("x64;1033"), X64);
    /// assert_eq!(Architecture::from_template("Intel;1033"), X86);
    /// assert_eq!(Architecture::from_template(";1033"), Unknown);
    /// ```
    pub fn from_template(template: &str) -> Architecture {
        if template.contains("x64") || template.contains("Intel64") {
            Architecture::X64
        } else if template.contains("Intel") {
            Architecture::X86
        } else if template.contains("Arm64") {
            Architecture::Arm64
        } else {
            Architecture::Unknown
        }
    }

    /// Returns the conventional name for this architecture.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Arm64 => "ARM64",
            Architecture::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ========================================================================= //

/// Options controlling which optional lists are extracted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtractOptions {
    files: bool,
    features: bool,
}

impl ExtractOptions {
    /// Creates options that request both the file list and the feature list.
    pub fn new() -> ExtractOptions {
        ExtractOptions { files: true, features: true }
    }

    /// Sets whether the `File` table is read.
    pub fn files(mut self, files: bool) -> ExtractOptions {
        self.files = files;
        self
    }

    /// Sets whether the `Feature` table is read.
    pub fn features(mut self, features: bool) -> ExtractOptions {
        self.features = features;
        self
    }

    /// Returns true if the file list is requested.
    pub fn wants_files(&self) -> bool {
        self.files
    }

    /// Returns true if the feature list is requested.
    pub fn wants_features(&self) -> bool {
        self.features
    }
}

impl Default for ExtractOptions {
    fn default() -> ExtractOptions {
        ExtractOptions::new()
    }
}

// ========================================================================= //

/// Metadata describing an MSI package.
///
/// Text fields that are absent from the package (or present but empty) are
/// `None`.  The optional lists are `None` only when they were not requested;
/// a requested list with no entries is `Some` of an empty vector.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MsiMetadata {
    product_code: Option<String>,
    product_version: Option<String>,
    product_name: Option<String>,
    publisher: Option<String>,
    upgrade_code: Option<String>,
    language: Option<String>,
    package_type: Option<String>,
    install_location: Option<String>,
    install_command: Option<String>,
    uninstall_command: Option<String>,
    architecture: Architecture,
    #[serde(rename = "minOSVersion")]
    min_os_version: Option<String>,
    #[serde(rename = "sizeMB")]
    size_mb: f64,
    sha256: Option<String>,
    md5: Option<String>,
    transform_paths: Vec<String>,
    properties: BTreeMap<String, String>,
    files: Option<Vec<String>>,
    required_features: Option<Vec<String>>,
}

impl MsiMetadata {
    /// Builds the metadata record from a package's properties, the optional
    /// file and feature lists, and the checksums of the package file.
    pub fn build(
        properties: &PropertyMap,
        files: Option<Vec<String>>,
        required_features: Option<Vec<String>>,
        checksums: &Checksums,
    ) -> MsiMetadata {
        let lookup = |name: &str| {
            properties
                .get(name)
                .and_then(|value| non_empty(value.trim().to_string()))
        };
        let product_code = lookup(PROPERTY_PRODUCT_CODE);
        let install_command = product_code
            .as_ref()
            .map(|code| format!("msiexec /i {code} /quiet"));
        let uninstall_command = product_code
            .as_ref()
            .map(|code| format!("msiexec /x {code} /quiet"));
        let architecture = lookup(PROPERTY_TEMPLATE)
            .map_or(Architecture::Unknown, |template| {
                Architecture::from_template(&template)
            });
        MsiMetadata {
            product_version: lookup(PROPERTY_PRODUCT_VERSION),
            product_name: properties
                .get_raw(PROPERTY_PRODUCT_NAME)
                .and_then(|bytes| non_empty(decode_product_name(bytes))),
            publisher: lookup(PROPERTY_MANUFACTURER),
            upgrade_code: lookup(PROPERTY_UPGRADE_CODE),
            language: lookup(PROPERTY_LANGUAGE),
            package_type: Some(PACKAGE_TYPE.to_string()),
            install_location: lookup(PROPERTY_INSTALL_LOCATION),
            install_command,
            uninstall_command,
            architecture,
            min_os_version: lookup(PROPERTY_MIN_VERSION),
            size_mb: checksums.size_mb(),
            sha256: non_empty(checksums.sha256().to_string()),
            md5: non_empty(checksums.md5().to_string()),
            transform_paths: Vec::new(),
            properties: properties.to_string_map(),
            files,
            required_features,
            product_code,
        }
    }

    /// Returns the package's product code (a braced GUID string).
    pub fn product_code(&self) -> Option<&str> {
        self.product_code.as_deref()
    }

    /// Parses the product code as a UUID, if it is a well-formed braced GUID.
    pub fn product_uuid(&self) -> Option<Uuid> {
        let code = self.product_code.as_deref()?;
        let inner = code.strip_prefix('{')?.strip_suffix('}')?;
        Uuid::parse_str(inner).ok()
    }

    /// Returns the product version string.
    pub fn product_version(&self) -> Option<&str> {
        self.product_version.as_deref()
    }

    /// Returns the product name.
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    /// Returns the publisher (the `Manufacturer` property).
    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    /// Returns the upgrade code.
    pub fn upgrade_code(&self) -> Option<&str> {
        self.upgrade_code.as_deref()
    }

    /// Returns the product language (a decimal language ID).
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns the package type.  Always `"Application"`.
    pub fn package_type(&self) -> Option<&str> {
        self.package_type.as_deref()
    }

    /// Returns the default install location (the `TARGETDIR` property).
    pub fn install_location(&self) -> Option<&str> {
        self.install_location.as_deref()
    }

    /// Returns a quiet install command line, if the product code is known.
    pub fn install_command(&self) -> Option<&str> {
        self.install_command.as_deref()
    }

    /// Returns a quiet uninstall command line, if the product code is known.
    pub fn uninstall_command(&self) -> Option<&str> {
        self.uninstall_command.as_deref()
    }

    /// Returns the target architecture.
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Returns the minimum OS version (the `MinVersion` property).
    pub fn min_os_version(&self) -> Option<&str> {
        self.min_os_version.as_deref()
    }

    /// Returns the package file's size in megabytes.
    pub fn size_mb(&self) -> f64 {
        self.size_mb
    }

    /// Returns the SHA-256 digest of the package file, as lowercase hex.
    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    /// Returns the MD5 digest of the package file, as lowercase hex.
    pub fn md5(&self) -> Option<&str> {
        self.md5.as_deref()
    }

    /// Returns the paths of transforms applied to the package.  Always empty.
    pub fn transform_paths(&self) -> &[String] {
        &self.transform_paths
    }

    /// Returns every property in the package.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns the names of the files the package installs, if requested.
    pub fn files(&self) -> Option<&[String]> {
        self.files.as_deref()
    }

    /// Returns the identifiers of the package's features, if requested.
    pub fn required_features(&self) -> Option<&[String]> {
        self.required_features.as_deref()
    }
}

// ========================================================================= //

fn non_empty(string: String) -> Option<String> {
    if string.is_empty() {
        None
    } else {
        Some(string)
    }
}

/// Some packages store the product name as Windows-1252 even when the rest
/// of the string pool is UTF-8.
fn decode_product_name(bytes: &[u8]) -> String {
    let string = match std::str::from_utf8(bytes) {
        Ok(string) => string.to_string(),
        Err(_) => match CodePage::Windows1252.decode_strict(bytes) {
            Some(string) => string.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    };
    string.trim().to_string()
}

// ========================================================================= //


// ========================================================================= //
