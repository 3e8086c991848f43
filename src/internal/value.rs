use crate::internal::stringpool::{StringPool, StringRef};
use std::borrow::Cow;

// ========================================================================= //

/// An indirect value from one cell in a database table row.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueRef {
    /// A null value.
    Null,
    /// An integer value.
    Int(i32),
    /// A string value.
    Str(StringRef),
}

impl ValueRef {
    /// Returns the string reference, if this is a string value.
    pub fn string_ref(&self) -> Option<StringRef> {
        match *self {
            ValueRef::Str(string_ref) => Some(string_ref),
            ValueRef::Null | ValueRef::Int(_) => None,
        }
    }

    /// Resolves a string value through the string pool.  Returns `None` for
    /// null and integer values, and for references past the end of the pool.
    pub fn to_text<'a>(
        &self,
        string_pool: &'a StringPool,
    ) -> Option<Cow<'a, str>> {
        self.string_ref().and_then(|string_ref| string_pool.get(string_ref))
    }

    /// Like `to_text`, but returns the undecoded bytes.
    pub fn to_bytes<'a>(
        &self,
        string_pool: &'a StringPool,
    ) -> Option<&'a [u8]> {
        self.string_ref()
            .and_then(|string_ref| string_pool.get_bytes(string_ref))
    }
}

// ========================================================================= //

#[cfg(test)]
mod tests {
    use super::ValueRef;
    use crate::internal::stringpool::{StringPool, StringRef};

    #[test]
    fn resolve_value_refs() {
        let pool: &[u8] = b"\xe9\xfd\x00\x00\x03\x00\x01\x00";
        let string_pool = StringPool::read(pool, &b"Foo"[..]).unwrap();
        let foo = ValueRef::Str(StringRef::new(1).unwrap());
        assert_eq!(foo.to_text(&string_pool).unwrap(), "Foo");
        assert_eq!(foo.to_bytes(&string_pool), Some(&b"Foo"[..]));
        let missing = ValueRef::Str(StringRef::new(2).unwrap());
        assert_eq!(missing.to_text(&string_pool), None);
        assert_eq!(ValueRef::Null.to_text(&string_pool), None);
        assert_eq!(ValueRef::Int(3).to_text(&string_pool), None);
    }
}

// ========================================================================= //
