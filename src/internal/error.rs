use std::io;
use thiserror::Error;

// ========================================================================= //

/// An error encountered while extracting metadata from an MSI package.
///
/// Every variant is fatal: extraction either produces a complete
/// [`MsiMetadata`](crate::MsiMetadata) record or returns one of these.
/// String references that point outside the string pool are not errors;
/// the affected value is treated as absent.
#[derive(Debug, Error)]
pub enum Error {
    /// The byte source is not a valid compound document, or one of its
    /// streams could not be opened.
    #[error("Invalid compound document: {0}")]
    Container(#[source] io::Error),

    /// One of the tables every MSI package must contain is absent.
    #[error("Required table {0:?} does not exist")]
    MissingTable(String),

    /// A table's data or schema does not have the expected shape.
    #[error("Malformed {table} table: {message}")]
    MalformedTable {
        /// The logical name of the table (e.g. `"_StringPool"`).
        table: String,
        /// What was wrong with it.
        message: String,
    },

    /// An underlying read failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for metadata extraction.
pub type Result<T> = std::result::Result<T, Error>;

// ========================================================================= //

#[cfg(test)]
mod tests {
    use super::Error;
    use std::io;

    #[test]
    fn display_messages() {
        let error = Error::MissingTable("Property".to_string());
        assert_eq!(
            error.to_string(),
            "Required table \"Property\" does not exist"
        );
        let error = Error::MalformedTable {
            table: "_Columns".to_string(),
            message: "row width is zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed _Columns table: row width is zero"
        );
    }

    #[test]
    fn io_errors_convert() {
        let error: Error =
            io::Error::new(io::ErrorKind::UnexpectedEof, "short read").into();
        assert!(matches!(error, Error::Io(_)));
    }
}

// ========================================================================= //
