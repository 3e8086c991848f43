use crate::internal::column::Column;
use crate::internal::error::{Error, Result};
use crate::internal::stringpool::StringPool;
use crate::internal::value::ValueRef;
use log::{debug, warn};

// ========================================================================= //

pub(crate) const COLUMNS_TABLE_NAME: &str = "_Columns";

// Attribute bitfields for the bootstrap schema of the _Columns table itself.
const COLUMNS_TABLE_STRING: u16 = 0x2d40;
const COLUMNS_TABLE_SHORT: u16 = 0x2502;

// ========================================================================= //

/// The schema of a database table: its name and its ordered columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    long_string_refs: bool,
}

impl Table {
    /// Creates a new table object with the given name and columns.  The
    /// `long_string_refs` argument indicates the size of any encoded string
    /// refs.
    pub(crate) fn new(
        name: String,
        columns: Vec<Column>,
        long_string_refs: bool,
    ) -> Table {
        Table { name, columns, long_string_refs }
    }

    /// Returns the name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the list of columns in this table.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column with the given name, if any.
    pub fn get_column(&self, column_name: &str) -> Option<&Column> {
        self.index_for_column_name(column_name)
            .map(|index| &self.columns[index])
    }

    pub(crate) fn index_for_column_name(
        &self,
        column_name: &str,
    ) -> Option<usize> {
        self.columns.iter().position(|column| column.name() == column_name)
    }

    /// Returns the number of bytes one row occupies in the table's stream.
    pub(crate) fn row_size(&self) -> Result<u64> {
        let mut row_size = 0;
        for column in self.columns.iter() {
            match column.coltype().width(self.long_string_refs) {
                Some(width) => row_size += width,
                None => {
                    return self.malformed(format!(
                        "column {:?} has unsupported type {}",
                        column.name(),
                        column.coltype()
                    ));
                }
            }
        }
        if row_size == 0 {
            return self.malformed("table has no columns");
        }
        Ok(row_size)
    }

    /// Parses the table's stream data into rows.  Tables are stored
    /// column-major: every row's value for the first column, then every
    /// row's value for the second column, and so on.
    pub(crate) fn read_rows(&self, data: &[u8]) -> Result<Vec<Vec<ValueRef>>> {
        let row_size = self.row_size()?;
        let data_length = data.len() as u64;
        let num_rows = (data_length / row_size) as usize;
        if data_length % row_size != 0 {
            warn!(
                "Ignoring {} trailing bytes in {} table",
                data_length % row_size,
                self.name
            );
        }
        let mut reader = data;
        let mut rows =
            vec![Vec::<ValueRef>::with_capacity(self.columns.len()); num_rows];
        for column in self.columns.iter() {
            let coltype = column.coltype();
            for row in rows.iter_mut() {
                let value = coltype
                    .read_value(&mut reader, self.long_string_refs)
                    .or_else(|error| self.malformed(error.to_string()))?;
                row.push(value);
            }
        }
        debug!("Read {} rows from {} table", num_rows, self.name);
        Ok(rows)
    }

    /// Reads one string column of the table and returns its non-empty values.
    /// Returns an empty list if the table has no such column.
    pub(crate) fn read_string_column(
        &self,
        data: &[u8],
        column_name: &str,
        string_pool: &StringPool,
    ) -> Result<Vec<String>> {
        let index = match self.index_for_column_name(column_name) {
            Some(index) => index,
            None => {
                debug!("{} table has no {} column", self.name, column_name);
                return Ok(Vec::new());
            }
        };
        let rows = self.read_rows(data)?;
        Ok(rows
            .iter()
            .filter_map(|row| row[index].to_text(string_pool))
            .filter(|text| !text.is_empty())
            .map(|text| text.into_owned())
            .collect())
    }

    fn malformed<T, S: Into<String>>(&self, message: S) -> Result<T> {
        Err(Error::MalformedTable {
            table: self.name.clone(),
            message: message.into(),
        })
    }
}

// ========================================================================= //

/// The decoded contents of the `_Columns` table, from which the schema of
/// every other table is looked up.
#[derive(Clone, Debug)]
pub(crate) struct ColumnsTable {
    entries: Vec<(String, Column)>,
    long_string_refs: bool,
}

impl ColumnsTable {
    fn schema(long_string_refs: bool) -> Table {
        Table::new(
            COLUMNS_TABLE_NAME.to_string(),
            vec![
                Column::new(1, "Table".to_string(), COLUMNS_TABLE_STRING),
                Column::new(2, "Number".to_string(), COLUMNS_TABLE_SHORT),
                Column::new(3, "Name".to_string(), COLUMNS_TABLE_STRING),
                Column::new(4, "Type".to_string(), COLUMNS_TABLE_SHORT),
            ],
            long_string_refs,
        )
    }

    pub(crate) fn read(
        data: &[u8],
        string_pool: &StringPool,
    ) -> Result<ColumnsTable> {
        let long_string_refs = string_pool.long_string_refs();
        let rows = ColumnsTable::schema(long_string_refs).read_rows(data)?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            let table_name = match row[0].to_text(string_pool) {
                Some(name) => name.into_owned(),
                None => continue,
            };
            let column_name = match row[2].to_text(string_pool) {
                Some(name) => name.into_owned(),
                None => continue,
            };
            let ordinal = match row[1] {
                ValueRef::Int(number) => number,
                _ => 0,
            };
            let attributes = match row[3] {
                ValueRef::Int(bits) => bits as u16,
                _ => 0,
            };
            let column = Column::new(ordinal, column_name, attributes);
            entries.push((table_name, column));
        }
        Ok(ColumnsTable { entries, long_string_refs })
    }

    /// Returns the schema of the named table, or `None` if no column belongs
    /// to it.
    pub(crate) fn get_table(&self, table_name: &str) -> Option<Table> {
        let columns: Vec<Column> = self
            .entries
            .iter()
            .filter(|(name, _)| name == table_name)
            .map(|(_, column)| column.clone())
            .collect();
        if columns.is_empty() {
            None
        } else {
            debug!("{} table has {} columns", table_name, columns.len());
            Some(Table::new(
                table_name.to_string(),
                columns,
                self.long_string_refs,
            ))
        }
    }
}

// ========================================================================= //


// ========================================================================= //
