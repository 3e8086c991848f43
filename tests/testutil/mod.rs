#![allow(dead_code, unused_macros)]

use byteorder::{LittleEndian, WriteBytesExt};
use msi_metadata::encode_stream_name;
use std::collections::HashSet;
use std::io::{Cursor, Write};

// ========================================================================= //

macro_rules! assert_error {
    ($e:expr, $p:pat, $d:expr) => {
        let description = $d;
        match $e {
            Ok(_) => panic!(
                "Expected {} error, but result was Ok",
                stringify!($p)
            ),
            Err(error) => {
                if !matches!(error, $p) {
                    panic!(
                        "Expected {} error, but result was {:?}",
                        stringify!($p),
                        error
                    );
                }
                if error.to_string() != description {
                    panic!(
                        "Expected error with description {:?}, but \
                         result had description {:?}",
                        description,
                        error.to_string()
                    );
                }
            }
        }
    };
}

// ========================================================================= //

pub const PRODUCT_CODE: &str = "{34AB5C53-9B30-4E14-AEF0-2C1C7BA826C0}";
pub const UPGRADE_CODE: &str = "{6E1A2B3C-4D5E-4F60-8172-93A4B5C6D7E8}";

pub const STRING: u16 = 0x0d48;
pub const KEY_STRING: u16 = 0x2d48;
pub const STRING_LOCALIZED: u16 = 0x0fff;
pub const NULLABLE_STRING: u16 = 0x1d48;
pub const SHORT: u16 = 0x0502;
pub const LONG: u16 = 0x0104;

/// One cell of a fixture table row.
#[derive(Clone, Debug)]
pub enum Cell {
    Null,
    Int(i32),
    Str(String),
    /// A string given as bytes in the package's code page.
    Bytes(Vec<u8>),
    /// A raw string-pool index, which need not be valid.
    Ref(u16),
}

impl From<&str> for Cell {
    fn from(string: &str) -> Cell {
        Cell::Str(string.to_string())
    }
}

impl From<i32> for Cell {
    fn from(number: i32) -> Cell {
        Cell::Int(number)
    }
}

struct FixtureTable {
    name: String,
    columns: Vec<(String, u16)>,
    rows: Vec<Vec<Cell>>,
}

/// Builds an in-memory MSI package with hand-chosen tables.
pub struct PackageBuilder {
    codepage: u32,
    strings: Vec<Vec<u8>>,
    tables: Vec<FixtureTable>,
    omitted_streams: HashSet<String>,
    raw_streams: Vec<(String, Vec<u8>)>,
}

impl PackageBuilder {
    pub fn new() -> PackageBuilder {
        PackageBuilder {
            codepage: 65001,
            strings: Vec::new(),
            tables: Vec::new(),
            omitted_streams: HashSet::new(),
            raw_streams: Vec::new(),
        }
    }

    /// A package with the usual Property, File and Feature tables.
    pub fn standard() -> PackageBuilder {
        let mut builder = PackageBuilder::new();
        builder.table(
            "Property",
            &[("Property", KEY_STRING), ("Value", STRING_LOCALIZED)],
            vec![
                row(&["ProductCode", PRODUCT_CODE]),
                row(&["ProductName", "Frobnicator"]),
                row(&["ProductVersion", "2.5.1"]),
                row(&["Manufacturer", "Acme Widgets"]),
                row(&["UpgradeCode", UPGRADE_CODE]),
                row(&["ProductLanguage", "1033"]),
                row(&["Template", "Intel64;1033"]),
                row(&["ALLUSERS", "1"]),
            ],
        );
        builder.table(
            "File",
            &[
                ("File", KEY_STRING),
                ("Component_", STRING),
                ("FileName", STRING_LOCALIZED),
                ("FileSize", LONG),
                ("Version", NULLABLE_STRING),
                ("Language", NULLABLE_STRING),
                ("Attributes", SHORT | 0x1000),
                ("Sequence", SHORT),
            ],
            vec![
                vec![
                    "frob.exe".into(),
                    "MainComponent".into(),
                    "FROB.EXE|frob.exe".into(),
                    Cell::Int(123456),
                    "2.5.1.0".into(),
                    Cell::Null,
                    Cell::Int(512),
                    Cell::Int(1),
                ],
                vec![
                    "readme".into(),
                    "MainComponent".into(),
                    "README.txt".into(),
                    Cell::Int(2048),
                    Cell::Null,
                    Cell::Null,
                    Cell::Null,
                    Cell::Int(2),
                ],
            ],
        );
        builder.table(
            "Feature",
            &[
                ("Feature", KEY_STRING),
                ("Feature_Parent", NULLABLE_STRING),
                ("Title", NULLABLE_STRING | 0x0200),
                ("Display", SHORT | 0x1000),
                ("Level", SHORT),
            ],
            vec![
                vec![
                    "Complete".into(),
                    Cell::Null,
                    "Everything".into(),
                    Cell::Int(1),
                    Cell::Int(1),
                ],
                vec![
                    "Docs".into(),
                    "Complete".into(),
                    "Documentation".into(),
                    Cell::Int(2),
                    Cell::Int(3),
                ],
            ],
        );
        builder
    }

    /// Sets the string pool header; bit 31 selects 3-byte string refs.
    pub fn codepage(&mut self, codepage: u32) -> &mut PackageBuilder {
        self.codepage = codepage;
        self
    }

    pub fn table(
        &mut self,
        name: &str,
        columns: &[(&str, u16)],
        rows: Vec<Vec<Cell>>,
    ) -> &mut PackageBuilder {
        self.tables.retain(|table| table.name != name);
        self.tables.push(FixtureTable {
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|&(name, attributes)| (name.to_string(), attributes))
                .collect(),
            rows,
        });
        self
    }

    /// Adds a row to an existing fixture table.
    pub fn push_row(
        &mut self,
        name: &str,
        cells: Vec<Cell>,
    ) -> &mut PackageBuilder {
        let table = self
            .tables
            .iter_mut()
            .find(|table| table.name == name)
            .expect("no such fixture table");
        table.rows.push(cells);
        self
    }

    /// Keeps the table's schema in `_Columns` but leaves out its stream.
    pub fn omit_stream(&mut self, table_name: &str) -> &mut PackageBuilder {
        self.omitted_streams.insert(table_name.to_string());
        self
    }

    /// Removes a table entirely, schema and stream.
    pub fn remove_table(&mut self, table_name: &str) -> &mut PackageBuilder {
        self.tables.retain(|table| table.name != table_name);
        self
    }

    /// Adds a stream with the given (already decoded) table name and raw
    /// contents, replacing whatever the builder would have generated.
    pub fn raw_table_stream(
        &mut self,
        table_name: &str,
        data: Vec<u8>,
    ) -> &mut PackageBuilder {
        self.omitted_streams.insert(table_name.to_string());
        self.raw_streams.push((encode_stream_name(table_name, true), data));
        self
    }

    /// Adds a non-table stream.
    pub fn binary_stream(
        &mut self,
        name: &str,
        data: Vec<u8>,
    ) -> &mut PackageBuilder {
        self.raw_streams.push((encode_stream_name(name, false), data));
        self
    }

    pub fn build(&mut self) -> Vec<u8> {
        let mut streams = Vec::<(String, Vec<u8>)>::new();
        let tables = std::mem::take(&mut self.tables);

        let mut columns_table = FixtureTable {
            name: "_Columns".to_string(),
            columns: vec![
                ("Table".to_string(), KEY_STRING),
                ("Number".to_string(), SHORT | 0x2000),
                ("Name".to_string(), STRING),
                ("Type".to_string(), SHORT),
            ],
            rows: Vec::new(),
        };
        for table in tables.iter() {
            for (index, (column_name, attributes)) in
                table.columns.iter().enumerate()
            {
                columns_table.rows.push(vec![
                    table.name.as_str().into(),
                    Cell::Int(index as i32 + 1),
                    column_name.as_str().into(),
                    Cell::Int(*attributes as i32),
                ]);
            }
        }
        let columns_data = self.table_data(&columns_table);
        streams.push(("_Columns".to_string(), columns_data));
        for table in tables.iter() {
            if !self.omitted_streams.contains(&table.name) {
                let data = self.table_data(table);
                streams.push((table.name.clone(), data));
            }
        }
        self.tables = tables;

        let mut pool = Vec::<u8>::new();
        pool.write_u32::<LittleEndian>(self.codepage).unwrap();
        let mut data = Vec::<u8>::new();
        for string in self.strings.iter() {
            pool.write_u16::<LittleEndian>(string.len() as u16).unwrap();
            pool.write_u16::<LittleEndian>(1).unwrap();
            data.extend_from_slice(string);
        }
        streams.push(("_StringPool".to_string(), pool));
        streams.push(("_StringData".to_string(), data));

        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new()))
            .expect("create");
        for (name, data) in streams.iter() {
            if self.omitted_streams.contains(name) {
                continue;
            }
            let stream_name = encode_stream_name(name, true);
            let mut stream = comp.create_stream(&stream_name).expect("stream");
            stream.write_all(data).expect("write");
        }
        for (stream_name, data) in self.raw_streams.iter() {
            let mut stream = comp.create_stream(stream_name).expect("stream");
            stream.write_all(data).expect("write");
        }
        comp.flush().expect("flush");
        comp.into_inner().into_inner()
    }

    /// Interns a string, returning its 1-based index in the pool.
    pub fn intern(&mut self, bytes: &[u8]) -> u16 {
        if let Some(index) = self.strings.iter().position(|s| s == bytes) {
            return index as u16 + 1;
        }
        self.strings.push(bytes.to_vec());
        self.strings.len() as u16
    }

    fn table_data(&mut self, table: &FixtureTable) -> Vec<u8> {
        let long_string_refs = (self.codepage & 0x8000_0000) != 0;
        let mut data = Vec::<u8>::new();
        for (index, (_, attributes)) in table.columns.iter().enumerate() {
            let is_string = (attributes & 0x0800) != 0;
            let is_long = !is_string && (attributes & 0x00ff) == 4;
            for row in table.rows.iter() {
                let cell = &row[index];
                if is_string {
                    let string_ref = match cell {
                        Cell::Null => 0,
                        Cell::Str(string) => self.intern(string.as_bytes()),
                        Cell::Bytes(bytes) => self.intern(bytes),
                        Cell::Ref(number) => *number,
                        Cell::Int(_) => panic!("int in string column"),
                    };
                    data.write_u16::<LittleEndian>(string_ref).unwrap();
                    if long_string_refs {
                        data.write_u8(0).unwrap();
                    }
                } else if is_long {
                    let value = match cell {
                        Cell::Null => 0,
                        Cell::Int(number) => (*number as u32) ^ 0x8000_0000,
                        _ => panic!("non-int in integer column"),
                    };
                    data.write_u32::<LittleEndian>(value).unwrap();
                } else {
                    let value = match cell {
                        Cell::Null => 0,
                        Cell::Int(number) => (*number as u16) ^ 0x8000,
                        _ => panic!("non-int in integer column"),
                    };
                    data.write_u16::<LittleEndian>(value).unwrap();
                }
            }
        }
        data
    }
}

pub fn row(cells: &[&str]) -> Vec<Cell> {
    cells.iter().map(|&cell| Cell::from(cell)).collect()
}

// ========================================================================= //
