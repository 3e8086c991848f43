use std::char;

// ========================================================================= //

const TABLE_PREFIX: char = '\u{4840}';
const TABLE_PREFIX_DECODED: &str = "Table.";

// ========================================================================= //

/// Decodes an obfuscated compound-document entry name into the logical name
/// used by the MSI format.
///
/// Tables come back prefixed with `"Table."`, so the stream holding the
/// Property table decodes to `"Table.Property"`.  Characters outside the
/// encoded ranges pass through unchanged.
///
/// # Examples
///
/// ```
/// let name = "\u{4840}\u{3b3f}\u{43f2}\u{4438}\u{45b1}";
/// assert_eq!(msi_metadata::decode_stream_name(name), "Table._Columns");
/// ```
pub fn decode(name: &str) -> String {
    let mut output = String::new();
    for chr in name.chars() {
        let value = chr as u32;
        if (0x3800..0x4800).contains(&value) {
            let value = value - 0x3800;
            output.push(from_b64(value & 0x3f));
            output.push(from_b64(value >> 6));
        } else if (0x4800..0x4840).contains(&value) {
            output.push(from_b64(value - 0x4800));
        } else if chr == TABLE_PREFIX {
            output.push_str(TABLE_PREFIX_DECODED);
        } else {
            output.push(chr);
        }
    }
    output
}

/// Encodes a logical name into the obfuscated form stored in the compound
/// document's directory.  If `is_table` is true, the name is marked as a
/// table.
pub fn encode(name: &str, is_table: bool) -> String {
    let mut output = String::new();
    if is_table {
        output.push(TABLE_PREFIX);
    }
    let mut chars = name.chars().peekable();
    while let Some(ch1) = chars.next() {
        if let Some(value1) = to_b64(ch1) {
            if let Some(value2) = chars.peek().copied().and_then(to_b64) {
                let encoded = 0x3800 + (value2 << 6) + value1;
                output.extend(char::from_u32(encoded));
                chars.next();
                continue;
            }
            output.extend(char::from_u32(0x4800 + value1));
        } else {
            output.push(ch1);
        }
    }
    output
}

// ========================================================================= //

fn from_b64(value: u32) -> char {
    match value {
        0..=9 => (b'0' + value as u8) as char,
        10..=35 => (b'A' + (value - 10) as u8) as char,
        36..=61 => (b'a' + (value - 36) as u8) as char,
        62 => '.',
        _ => '_',
    }
}

fn to_b64(ch: char) -> Option<u32> {
    if ch.is_ascii_digit() {
        Some(ch as u32 - '0' as u32)
    } else if ch.is_ascii_uppercase() {
        Some(10 + ch as u32 - 'A' as u32)
    } else if ch.is_ascii_lowercase() {
        Some(36 + ch as u32 - 'a' as u32)
    } else if ch == '.' {
        Some(62)
    } else if ch == '_' {
        Some(63)
    } else {
        None
    }
}

// ========================================================================= //


// ========================================================================= //
