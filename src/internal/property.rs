use crate::internal::codepage::CodePage;
use crate::internal::column::ColumnType;
use crate::internal::error::{Error, Result};
use crate::internal::stringpool::StringPool;
use crate::internal::table::Table;
use log::debug;
use std::borrow::Cow;
use std::collections::{btree_map, BTreeMap};

// ========================================================================= //

pub(crate) const PROPERTY_TABLE_NAME: &str = "Property";

const EXPECTED_COLUMN_TYPES: [ColumnType; 2] =
    [ColumnType::String, ColumnType::StringLocalized];

// ========================================================================= //

/// The contents of a package's `Property` table: a map from property name to
/// property value.
///
/// Values are kept as the bytes stored in the string pool, so that callers
/// who know better than the package's declared code page can re-decode them.
#[derive(Clone, Debug, Default)]
pub struct PropertyMap {
    codepage: CodePage,
    values: BTreeMap<String, Vec<u8>>,
}

impl PropertyMap {
    /// Decodes the `Property` table.  The table must have exactly two
    /// columns, a string key and a localizable string value.  Rows whose key
    /// or value does not resolve through the string pool are skipped.
    pub(crate) fn read(
        table: &Table,
        data: &[u8],
        string_pool: &StringPool,
    ) -> Result<PropertyMap> {
        let coltypes: Vec<ColumnType> =
            table.columns().iter().map(|column| column.coltype()).collect();
        if coltypes != EXPECTED_COLUMN_TYPES {
            return Err(Error::MalformedTable {
                table: table.name().to_string(),
                message: format!(
                    "expected columns of type [CHAR, CHAR LOCALIZABLE], \
                     found [{}]",
                    coltypes
                        .iter()
                        .map(ColumnType::to_string)
                        .collect::<Vec<String>>()
                        .join(", ")
                ),
            });
        }
        let mut values = BTreeMap::new();
        let mut skipped = 0;
        for row in table.read_rows(data)? {
            let key = row[0].to_text(string_pool);
            let value = row[1].to_bytes(string_pool);
            match (key, value) {
                (Some(key), Some(value)) => {
                    values.insert(key.into_owned(), value.to_vec());
                }
                _ => skipped += 1,
            }
        }
        debug!(
            "Read {} properties ({} rows skipped)",
            values.len(),
            skipped
        );
        Ok(PropertyMap { codepage: string_pool.codepage(), values })
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if the named property is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the value of the named property as text.  Property names are
    /// case-sensitive.
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        self.values.get(name).map(|bytes| self.decode(bytes))
    }

    /// Returns the undecoded bytes of the named property's value.
    pub fn get_raw(&self, name: &str) -> Option<&[u8]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Returns an iterator over the property names and their text values,
    /// in name order.
    pub fn iter(&self) -> Properties<'_> {
        Properties { map: self, inner: self.values.iter() }
    }

    /// Returns the properties as plain strings.
    pub fn to_string_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.into_owned()))
            .collect()
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match std::str::from_utf8(bytes) {
            Ok(string) => Cow::Borrowed(string),
            Err(_) => self.codepage.decode(bytes),
        }
    }
}

impl<S: Into<String>, V: Into<Vec<u8>>> FromIterator<(S, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> PropertyMap {
        PropertyMap {
            codepage: CodePage::default(),
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

// ========================================================================= //

/// An iterator over the entries of a [`PropertyMap`].
pub struct Properties<'a> {
    map: &'a PropertyMap,
    inner: btree_map::Iter<'a, String, Vec<u8>>,
}

impl<'a> Iterator for Properties<'a> {
    type Item = (&'a str, Cow<'a, str>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, bytes)| (name.as_str(), self.map.decode(bytes)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for Properties<'a> {}

// ========================================================================= //


// ========================================================================= //
