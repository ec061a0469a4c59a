//! # Document Locations
//!
//! A [`Location`] is the position of a value inside the document being
//! validated. Each recursive descent creates a child location that borrows
//! its parent, so a validation call never mutates shared state and the
//! dotted path is only rendered when an error is actually raised.

use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Key(&'a str),
    Index(usize),
}

/// Position of a value relative to the document root.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    parent: Option<&'a Location<'a>>,
    segment: Segment<'a>,
}

impl Location<'static> {
    /// The document root. Renders as an empty path.
    pub const ROOT: Location<'static> = Location {
        parent: None,
        segment: Segment::Root,
    };
}

impl<'a> Location<'a> {
    /// Location of the map item `key` below `self`.
    pub fn key(&'a self, key: &'a str) -> Location<'a> {
        Location {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    /// Location of the `index`-th list element below `self`.
    pub fn index(&'a self, index: usize) -> Location<'a> {
        Location {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    /// Number of segments between the root and this location.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self;
        while let Some(parent) = cursor.parent {
            depth += 1;
            cursor = parent;
        }
        depth
    }

    /// Render the dotted path, e.g. `library.books.items[2].title`.
    pub fn render(&self) -> String {
        let mut segments = Vec::with_capacity(self.depth());
        let mut cursor = Some(self);
        while let Some(location) = cursor {
            match location.segment {
                Segment::Root => {}
                Segment::Key(key) => segments.push(key.to_string()),
                Segment::Index(index) => segments.push(format!("items[{index}]")),
            }
            cursor = location.parent;
        }
        segments.reverse();
        segments.join(".")
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
