use std::collections::btree_map;
use std::path::PathBuf;

// ========================================================================= //

/// An iterator over the decoded names of the streams in a package.
///
/// Names are returned in sorted order.  Table streams appear as
/// `"Table.<name>"`; other streams (embedded binaries, summary information)
/// appear under their own decoded names.
pub struct Streams<'a> {
    names: btree_map::Keys<'a, String, PathBuf>,
}

impl<'a> Streams<'a> {
    pub(crate) fn new(
        names: btree_map::Keys<'a, String, PathBuf>,
    ) -> Streams<'a> {
        Streams { names }
    }
}

impl<'a> Iterator for Streams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.names.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

impl<'a> ExactSizeIterator for Streams<'a> {}

// ========================================================================= //
