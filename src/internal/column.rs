use crate::internal::stringpool::StringRef;
use crate::internal::value::ValueRef;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Read};

// ========================================================================= //

// Constants for the _Columns table's Type column bitfield:
const COL_TYPE_MASK: u16 = 0x0fff;
const COL_CATEGORY_MASK: u16 = 0x0f00;
const COL_STRING_BIT: u16 = 0x0800;
const COL_NULLABLE_BIT: u16 = 0x1000;
const COL_PRIMARY_KEY_BIT: u16 = 0x2000;

const TYPE_LONG: u16 = 0x0104;
const TYPE_SHORT: u16 = 0x0502;
const TYPE_BINARY: u16 = 0x0900;
const TYPE_STRING: u16 = 0x0d00;
const TYPE_STRING_LOCALIZED: u16 = 0x0f00;

// ========================================================================= //

/// A database column data type, as derived from the column's attribute
/// bitfield in the `_Columns` table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnType {
    /// A 32-bit integer.
    Long,
    /// A 16-bit integer.
    Short,
    /// A reference to a binary stream (stored as a string-pool index naming
    /// the stream).
    Binary,
    /// A string.
    String,
    /// A string that may be translated per language.
    StringLocalized,
    /// Any other derived type value.
    Unknown(u16),
}

impl ColumnType {
    /// Derives the column type from a raw attribute bitfield.  Integer types
    /// keep the low bits (which carry the field width); string types are
    /// distinguished by category bits alone.
    pub fn from_bitfield(attributes: u16) -> ColumnType {
        let category = attributes & COL_CATEGORY_MASK;
        let derived = if category < COL_STRING_BIT {
            attributes & COL_TYPE_MASK
        } else {
            category
        };
        match derived {
            TYPE_LONG => ColumnType::Long,
            TYPE_SHORT => ColumnType::Short,
            TYPE_BINARY => ColumnType::Binary,
            TYPE_STRING => ColumnType::String,
            TYPE_STRING_LOCALIZED => ColumnType::StringLocalized,
            other => ColumnType::Unknown(other),
        }
    }

    /// Returns true for column types whose cells are string-pool indices.
    pub fn is_string(&self) -> bool {
        matches!(
            *self,
            ColumnType::Binary
                | ColumnType::String
                | ColumnType::StringLocalized
        )
    }

    /// Returns the number of bytes one cell of this type occupies, or `None`
    /// if the type is not recognized.
    pub(crate) fn width(&self, long_string_refs: bool) -> Option<u64> {
        match *self {
            ColumnType::Long => Some(4),
            ColumnType::Short => Some(2),
            ColumnType::Binary
            | ColumnType::String
            | ColumnType::StringLocalized => {
                Some(if long_string_refs { 3 } else { 2 })
            }
            ColumnType::Unknown(_) => None,
        }
    }

    pub(crate) fn read_value<R: Read>(
        &self,
        reader: &mut R,
        long_string_refs: bool,
    ) -> io::Result<ValueRef> {
        match *self {
            ColumnType::Short => match reader.read_i16::<LittleEndian>()? {
                0 => Ok(ValueRef::Null),
                number => Ok(ValueRef::Int((number ^ -0x8000) as i32)),
            },
            ColumnType::Long => match reader.read_i32::<LittleEndian>()? {
                0 => Ok(ValueRef::Null),
                number => Ok(ValueRef::Int(number ^ -0x8000_0000)),
            },
            ColumnType::Binary
            | ColumnType::String
            | ColumnType::StringLocalized => {
                match StringRef::read(reader, long_string_refs)? {
                    Some(string_ref) => Ok(ValueRef::Str(string_ref)),
                    None => Ok(ValueRef::Null),
                }
            }
            ColumnType::Unknown(bits) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Cannot read a column of unknown type {bits:#06x}"),
            )),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ColumnType::Long => formatter.write_str("LONG"),
            ColumnType::Short => formatter.write_str("SHORT"),
            ColumnType::Binary => formatter.write_str("OBJECT"),
            ColumnType::String => formatter.write_str("CHAR"),
            ColumnType::StringLocalized => {
                formatter.write_str("CHAR LOCALIZABLE")
            }
            ColumnType::Unknown(bits) => {
                write!(formatter, "UNKNOWN({bits:#06x})")
            }
        }
    }
}

// ========================================================================= //

/// A database column descriptor, as listed in the `_Columns` table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
    ordinal: i32,
    name: String,
    attributes: u16,
}

impl Column {
    pub(crate) fn new(ordinal: i32, name: String, attributes: u16) -> Column {
        Column { ordinal, name, attributes }
    }

    /// Returns the 1-based position of this column within its table.
    pub fn ordinal(&self) -> i32 {
        self.ordinal
    }

    /// Returns the name of the column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw attribute bitfield for this column.
    pub fn attributes(&self) -> u16 {
        self.attributes
    }

    /// Returns the type of data stored in the column.
    pub fn coltype(&self) -> ColumnType {
        ColumnType::from_bitfield(self.attributes)
    }

    /// Returns true if values in this column can be null.
    pub fn is_nullable(&self) -> bool {
        (self.attributes & COL_NULLABLE_BIT) != 0
    }

    /// Returns true if this is a primary key column.
    pub fn is_primary_key(&self) -> bool {
        (self.attributes & COL_PRIMARY_KEY_BIT) != 0
    }
}

// ========================================================================= //


// ========================================================================= //
