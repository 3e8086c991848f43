mod testutil;

use msi_metadata::{decode_stream_name, encode_stream_name, Package};
use std::io::Cursor;
use testutil::PackageBuilder;

// ========================================================================= //

#[test]
fn list_streams() {
    let mut builder = PackageBuilder::standard();
    builder.binary_stream("Icon.ico", vec![0; 16]);
    builder.binary_stream("Binary.CustomAction_1", b"MZ".to_vec());
    let package = Package::open(Cursor::new(builder.build())).unwrap();
    let streams: Vec<&str> = package.streams().collect();
    assert_eq!(
        streams,
        vec![
            "Binary.CustomAction_1",
            "Icon.ico",
            "Table.Feature",
            "Table.File",
            "Table.Property",
            "Table._Columns",
            "Table._StringData",
            "Table._StringPool",
        ]
    );
    assert_eq!(package.streams().len(), 8);
}

#[test]
fn unencoded_stream_names_pass_through() {
    assert_eq!(
        decode_stream_name("\u{5}SummaryInformation"),
        "\u{5}SummaryInformation"
    );
    assert_eq!(decode_stream_name("Plain"), "Plain");
}

#[test]
fn stream_names_round_trip() {
    for name in ["_StringPool", "Property", "InstallExecuteSequence"] {
        let encoded = encode_stream_name(name, true);
        assert!(encoded.starts_with('\u{4840}'));
        assert_eq!(decode_stream_name(&encoded), format!("Table.{name}"));
    }
    let encoded = encode_stream_name("Icon.ico", false);
    assert_eq!(decode_stream_name(&encoded), "Icon.ico");
}

#[test]
fn into_inner_returns_the_source() {
    let bytes = PackageBuilder::standard().build();
    let package = Package::open(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(package.into_inner().into_inner(), bytes);
}

// ========================================================================= //
