use crate::internal::checksum::Checksums;
use crate::internal::error::{Error, Result};
use crate::internal::metadata::{ExtractOptions, MsiMetadata};
use crate::internal::property::{PropertyMap, PROPERTY_TABLE_NAME};
use crate::internal::stream::Streams;
use crate::internal::streamname;
use crate::internal::stringpool::StringPool;
use crate::internal::table::{ColumnsTable, Table, COLUMNS_TABLE_NAME};
use log::debug;
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::PathBuf;

// ========================================================================= //

const TABLE_STREAM_PREFIX: &str = "Table.";

const STRING_DATA_TABLE_NAME: &str = "_StringData";
const STRING_POOL_TABLE_NAME: &str = "_StringPool";

const FILE_TABLE_NAME: &str = "File";
const FILE_NAME_COLUMN: &str = "FileName";
const FEATURE_TABLE_NAME: &str = "Feature";
const FEATURE_COLUMN: &str = "Feature";

// ========================================================================= //

/// An MSI package file, backed by an underlying reader (such as a
/// [`File`](https://doc.rust-lang.org/std/fs/struct.File.html) or
/// [`Cursor`](https://doc.rust-lang.org/std/io/struct.Cursor.html)).
///
/// Opening a package decodes its string pool and column schemas up front;
/// the tables themselves are read on demand.
pub struct Package<F> {
    comp: cfb::CompoundFile<F>,
    streams: BTreeMap<String, PathBuf>,
    string_pool: StringPool,
    columns: ColumnsTable,
}

impl<F> Package<F> {
    /// Consumes the `Package` object, returning the underlying reader.
    pub fn into_inner(self) -> F {
        self.comp.into_inner()
    }

    /// Returns the string pool shared by the package's tables.
    pub fn string_pool(&self) -> &StringPool {
        &self.string_pool
    }

    /// Returns an iterator over the decoded names of every stream in the
    /// package (tables included, as `"Table.<name>"`).
    pub fn streams(&self) -> Streams<'_> {
        Streams::new(self.streams.keys())
    }

    /// Returns true if the package has a stream holding the named table.
    pub fn has_table(&self, table_name: &str) -> bool {
        self.streams.contains_key(&table_stream_name(table_name))
    }

    /// Returns the schema of the named table, or `None` if the package's
    /// `_Columns` table has no columns for it.
    pub fn table_schema(&self, table_name: &str) -> Option<Table> {
        self.columns.get_table(table_name)
    }
}

impl<F: Read + Seek> Package<F> {
    /// Opens an existing MSI file, using the underlying reader.  Fails if the
    /// reader is not a compound document, or if the document lacks any of
    /// the tables every MSI package has.
    pub fn open(inner: F) -> Result<Package<F>> {
        let mut comp =
            cfb::CompoundFile::open(inner).map_err(Error::Container)?;
        let streams: BTreeMap<String, PathBuf> = comp
            .read_root_storage()
            .filter(|entry| entry.is_stream())
            .map(|entry| {
                (streamname::decode(entry.name()), entry.path().to_path_buf())
            })
            .collect();
        debug!("Found {} streams", streams.len());
        for table_name in [
            STRING_DATA_TABLE_NAME,
            STRING_POOL_TABLE_NAME,
            COLUMNS_TABLE_NAME,
            PROPERTY_TABLE_NAME,
        ] {
            if !streams.contains_key(&table_stream_name(table_name)) {
                missing_table!(table_name);
            }
        }
        let pool =
            read_required_table(&mut comp, &streams, STRING_POOL_TABLE_NAME)?;
        let data =
            read_required_table(&mut comp, &streams, STRING_DATA_TABLE_NAME)?;
        let string_pool = StringPool::read(pool.as_slice(), data.as_slice())?;
        let columns =
            read_required_table(&mut comp, &streams, COLUMNS_TABLE_NAME)?;
        let columns = ColumnsTable::read(&columns, &string_pool)?;
        Ok(Package { comp, streams, string_pool, columns })
    }

    /// Reads the package's `Property` table.
    pub fn properties(&mut self) -> Result<PropertyMap> {
        let table = match self.table_schema(PROPERTY_TABLE_NAME) {
            Some(table) => table,
            None => missing_table!(PROPERTY_TABLE_NAME),
        };
        let data = read_required_table(
            &mut self.comp,
            &self.streams,
            PROPERTY_TABLE_NAME,
        )?;
        PropertyMap::read(&table, &data, &self.string_pool)
    }

    /// Returns the names of the files listed in the package's `File` table,
    /// or an empty list if the package has no such table.  Names stored in
    /// `short|long` form are reduced to their long form.
    ///
    /// The table is decoded column-major like every other table, with each
    /// cell sized by its column type (the `FileSize` column is four bytes
    /// wide), rather than as rows of fixed two-byte cells.
    pub fn files(&mut self) -> Result<Vec<String>> {
        let names =
            self.read_string_column(FILE_TABLE_NAME, FILE_NAME_COLUMN)?;
        Ok(names
            .iter()
            .filter_map(|name| name.rsplit('|').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Returns the identifiers listed in the package's `Feature` table, or
    /// an empty list if the package has no such table.  The table is decoded
    /// the same way as in [`files`](Package::files).
    pub fn features(&mut self) -> Result<Vec<String>> {
        self.read_string_column(FEATURE_TABLE_NAME, FEATURE_COLUMN)
    }

    /// Builds the package's metadata record.  The checksums describe the
    /// file the package was read from.
    pub fn metadata(
        &mut self,
        options: ExtractOptions,
        checksums: &Checksums,
    ) -> Result<MsiMetadata> {
        let properties = self.properties()?;
        let files =
            if options.wants_files() { Some(self.files()?) } else { None };
        let features = if options.wants_features() {
            Some(self.features()?)
        } else {
            None
        };
        Ok(MsiMetadata::build(&properties, files, features, checksums))
    }

    fn read_string_column(
        &mut self,
        table_name: &str,
        column_name: &str,
    ) -> Result<Vec<String>> {
        let table = match self.table_schema(table_name) {
            Some(table) => table,
            None => {
                debug!("No schema for optional {table_name} table");
                return Ok(Vec::new());
            }
        };
        let data = read_table(&mut self.comp, &self.streams, table_name)?;
        let data = match data {
            Some(data) => data,
            None => {
                debug!("No stream for optional {table_name} table");
                return Ok(Vec::new());
            }
        };
        table.read_string_column(&data, column_name, &self.string_pool)
    }
}

fn read_required_table<F: Read + Seek>(
    comp: &mut cfb::CompoundFile<F>,
    streams: &BTreeMap<String, PathBuf>,
    table_name: &str,
) -> Result<Vec<u8>> {
    match read_table(comp, streams, table_name)? {
        Some(data) => Ok(data),
        None => missing_table!(table_name),
    }
}

fn read_table<F: Read + Seek>(
    comp: &mut cfb::CompoundFile<F>,
    streams: &BTreeMap<String, PathBuf>,
    table_name: &str,
) -> Result<Option<Vec<u8>>> {
    let path = match streams.get(&table_stream_name(table_name)) {
        Some(path) => path,
        None => return Ok(None),
    };
    let mut stream = comp.open_stream(path).map_err(Error::Container)?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data)?;
    debug!("Read {} bytes from {} table", data.len(), table_name);
    Ok(Some(data))
}

fn table_stream_name(table_name: &str) -> String {
    format!("{TABLE_STREAM_PREFIX}{table_name}")
}

// ========================================================================= //

#[cfg(test)]
mod tests {
    use super::table_stream_name;

    #[test]
    fn table_stream_names() {
        assert_eq!(table_stream_name("Property"), "Table.Property");
        assert_eq!(table_stream_name("_StringPool"), "Table._StringPool");
    }
}

// ========================================================================= //
