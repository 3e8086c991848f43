use crate::internal::codepage::CodePage;
use crate::internal::error::Result;
use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};
use std::borrow::Cow;
use std::io::{self, Read};

// ========================================================================= //

const LONG_STRING_REFS_BIT: u32 = 0x8000_0000;

const STRING_POOL_TABLE: &str = "_StringPool";
const STRING_DATA_TABLE: &str = "_StringData";

// ========================================================================= //

/// A reference to a string in the string pool.  String references are
/// 1-based; a stored value of zero means "no value" and is never represented
/// by a `StringRef`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StringRef(u32);

impl StringRef {
    /// Creates a reference from its stored number, or `None` if the number is
    /// zero.
    pub fn new(number: u32) -> Option<StringRef> {
        if number == 0 {
            None
        } else {
            Some(StringRef(number))
        }
    }

    /// Reads a serialized `StringRef`.  The `long_string_refs` argument
    /// specifies whether to read three bytes (if true) or two (if false).
    pub(crate) fn read<R: Read>(
        reader: &mut R,
        long_string_refs: bool,
    ) -> io::Result<Option<StringRef>> {
        let mut number = reader.read_u16::<LittleEndian>()? as u32;
        if long_string_refs {
            number |= (reader.read_u8()? as u32) << 16;
        }
        Ok(StringRef::new(number))
    }

    /// Returns the stored (1-based) number of this reference.
    pub fn number(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        debug_assert!(self.0 > 0);
        (self.0 - 1) as usize
    }
}

// ========================================================================= //

/// The string pool for an MSI package: every string used by any table,
/// stored once and referred to by index.
#[derive(Clone, Debug)]
pub struct StringPool {
    codepage: CodePage,
    long_string_refs: bool,
    strings: Vec<(Vec<u8>, u16)>,
}

impl StringPool {
    /// Decodes a string pool from the contents of the `_StringPool` stream
    /// (entry lengths and refcounts) and the `_StringData` stream (the
    /// concatenated string bytes).
    pub(crate) fn read<P: Read, D: Read>(
        mut pool: P,
        mut data: D,
    ) -> Result<StringPool> {
        let codepage_id = match pool.read_u32::<LittleEndian>() {
            Ok(codepage_id) => codepage_id,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                malformed!(STRING_POOL_TABLE, "stream ends before its header");
            }
            Err(error) => return Err(error.into()),
        };
        let long_string_refs = (codepage_id & LONG_STRING_REFS_BIT) != 0;
        let codepage_id = (codepage_id & !LONG_STRING_REFS_BIT) as i32;
        let codepage = CodePage::from_id(codepage_id).unwrap_or_else(|| {
            warn!(
                "Unknown codepage for string pool ({codepage_id}), \
                 falling back to {:?}",
                CodePage::default()
            );
            CodePage::default()
        });

        let mut strings = Vec::<(Vec<u8>, u16)>::new();
        loop {
            let size = match pool.read_u16::<LittleEndian>() {
                Ok(size) => size as u32,
                Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(error) => return Err(error.into()),
            };
            let refcount = read_pool_field(&mut pool, strings.len())?;
            let length = if size == 0 && refcount != 0 {
                match pool.read_u32::<LittleEndian>() {
                    Ok(length) => length,
                    Err(error)
                        if error.kind() == io::ErrorKind::UnexpectedEof =>
                    {
                        malformed!(
                            STRING_POOL_TABLE,
                            "entry {} is missing its long length",
                            strings.len() + 1
                        );
                    }
                    Err(error) => return Err(error.into()),
                }
            } else {
                size
            };
            // The length is untrusted, so only allocate what the data holds.
            let mut buffer = Vec::new();
            (&mut data).take(length as u64).read_to_end(&mut buffer)?;
            if buffer.len() != length as usize {
                malformed!(
                    STRING_DATA_TABLE,
                    "stream ends before entry {} ({} bytes)",
                    strings.len() + 1,
                    length
                );
            }
            strings.push((buffer, refcount));
        }
        debug!(
            "Decoded {} strings from string pool (codepage {}, long refs: {})",
            strings.len(),
            codepage.id(),
            long_string_refs
        );
        Ok(StringPool { codepage, long_string_refs, strings })
    }

    /// Gets the code page declared for the string data.
    pub fn codepage(&self) -> CodePage {
        self.codepage
    }

    /// Returns true if string references are serialized with three bytes
    /// instead of two.
    pub fn long_string_refs(&self) -> bool {
        self.long_string_refs
    }

    /// Returns the number of strings in the pool (including empty entries).
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if the pool holds no strings.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Returns the raw bytes of the referenced string, or `None` if the
    /// reference is past the end of the pool.
    pub fn get_bytes(&self, string_ref: StringRef) -> Option<&[u8]> {
        match self.strings.get(string_ref.index()) {
            Some((bytes, _)) => Some(bytes.as_slice()),
            None => {
                debug!(
                    "String ref {} is out of range (pool has {} entries)",
                    string_ref.number(),
                    self.strings.len()
                );
                None
            }
        }
    }

    /// Returns the referenced string as text, or `None` if the reference is
    /// past the end of the pool.  Bytes that are valid UTF-8 are used as-is;
    /// anything else is decoded with the pool's code page.
    pub fn get(&self, string_ref: StringRef) -> Option<Cow<'_, str>> {
        self.get_bytes(string_ref).map(|bytes| self.decode(bytes))
    }

    /// Returns the pool's refcount for the given string reference.
    pub fn refcount(&self, string_ref: StringRef) -> u16 {
        self.strings.get(string_ref.index()).map_or(0, |&(_, count)| count)
    }

    pub(crate) fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match std::str::from_utf8(bytes) {
            Ok(string) => Cow::Borrowed(string),
            Err(_) => self.codepage.decode(bytes),
        }
    }
}

fn read_pool_field<R: Read>(reader: &mut R, entry: usize) -> Result<u16> {
    match reader.read_u16::<LittleEndian>() {
        Ok(value) => Ok(value),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
            malformed!(
                STRING_POOL_TABLE,
                "entry {} is missing its refcount",
                entry + 1
            );
        }
        Err(error) => Err(error.into()),
    }
}

// ========================================================================= //


// ========================================================================= //
