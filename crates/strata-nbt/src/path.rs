//! Dotted-path addressing into a tag tree.
//!
//! A path is a `.`-separated list of segments. Inside a compound a segment
//! names a child; inside a list it is a base-10 index. `Data.Player.Inventory.0.id`
//! walks four containers and lands on the `id` of the first inventory entry.

use crate::tag::{ListTag, Tag};
use std::collections::HashMap;
use strata_common::{Result, StrataError};

fn not_found(path: &str) -> StrataError {
    StrataError::PathNotFound(path.to_owned())
}

fn parse_index(segment: &str, path: &str) -> Result<usize> {
    segment.parse::<usize>().map_err(|_| not_found(path))
}

fn child<'a>(tag: &'a Tag, segment: &str, path: &str) -> Result<&'a Tag> {
    match tag {
        Tag::Compound(map) => map.get(segment).ok_or_else(|| not_found(path)),
        Tag::List(list) => {
            let index = parse_index(segment, path)?;
            list.get(index).ok_or(StrataError::IndexOutOfRange {
                index,
                len: list.len(),
            })
        }
        _ => Err(not_found(path)),
    }
}

fn child_mut<'a>(tag: &'a mut Tag, segment: &str, path: &str) -> Result<&'a mut Tag> {
    match tag {
        Tag::Compound(map) => map.get_mut(segment).ok_or_else(|| not_found(path)),
        Tag::List(list) => {
            let index = parse_index(segment, path)?;
            let len = list.len();
            list.get_mut(index)
                .ok_or(StrataError::IndexOutOfRange { index, len })
        }
        _ => Err(not_found(path)),
    }
}

fn wrong_kind(expected: &'static str, found: &Tag) -> StrataError {
    StrataError::WrongTagKind {
        expected,
        found: found.kind().name(),
    }
}

impl Tag {
    pub fn get_tag(&self, path: &str) -> Result<&Tag> {
        let mut current = self;
        for segment in path.split('.') {
            current = child(current, segment, path)?;
        }
        Ok(current)
    }

    pub fn get_tag_mut(&mut self, path: &str) -> Result<&mut Tag> {
        let mut current = self;
        for segment in path.split('.') {
            current = child_mut(current, segment, path)?;
        }
        Ok(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_tag(path).is_ok()
    }

    /// Binds `value` at `path`. Compound keys are inserted or overwritten;
    /// list slots must already exist and keep the list's element kind.
    pub fn set_tag(&mut self, path: &str, value: Tag) -> Result<()> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (self.get_tag_mut(parent)?, last),
            None => (self, path),
        };
        match parent {
            Tag::Compound(map) => {
                map.insert(last.to_owned(), value);
                Ok(())
            }
            Tag::List(list) => {
                let index = parse_index(last, path)?;
                list.set(index, value).map(|_| ())
            }
            _ => Err(not_found(path)),
        }
    }

    /// Removes and returns the compound child or list element at `path`.
    pub fn remove_tag(&mut self, path: &str) -> Result<Tag> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (self.get_tag_mut(parent)?, last),
            None => (self, path),
        };
        match parent {
            Tag::Compound(map) => map.remove(last).ok_or_else(|| not_found(path)),
            Tag::List(list) => {
                let index = parse_index(last, path)?;
                list.remove(index)
            }
            _ => Err(not_found(path)),
        }
    }

    pub fn get_byte(&self, path: &str) -> Result<i8> {
        let tag = self.get_tag(path)?;
        tag.as_i8().ok_or_else(|| wrong_kind("Byte", tag))
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        Ok(self.get_byte(path)? != 0)
    }

    pub fn get_short(&self, path: &str) -> Result<i16> {
        let tag = self.get_tag(path)?;
        tag.as_i16().ok_or_else(|| wrong_kind("Short", tag))
    }

    pub fn get_int(&self, path: &str) -> Result<i32> {
        let tag = self.get_tag(path)?;
        tag.as_i32().ok_or_else(|| wrong_kind("Int", tag))
    }

    pub fn get_long(&self, path: &str) -> Result<i64> {
        let tag = self.get_tag(path)?;
        tag.as_i64().ok_or_else(|| wrong_kind("Long", tag))
    }

    pub fn get_float(&self, path: &str) -> Result<f32> {
        let tag = self.get_tag(path)?;
        tag.as_f32().ok_or_else(|| wrong_kind("Float", tag))
    }

    pub fn get_double(&self, path: &str) -> Result<f64> {
        let tag = self.get_tag(path)?;
        tag.as_f64().ok_or_else(|| wrong_kind("Double", tag))
    }

    pub fn get_string(&self, path: &str) -> Result<&str> {
        let tag = self.get_tag(path)?;
        tag.as_string().ok_or_else(|| wrong_kind("String", tag))
    }

    pub fn get_byte_array(&self, path: &str) -> Result<&[i8]> {
        let tag = self.get_tag(path)?;
        tag.as_byte_array().ok_or_else(|| wrong_kind("ByteArray", tag))
    }

    pub fn get_int_array(&self, path: &str) -> Result<&[i32]> {
        let tag = self.get_tag(path)?;
        tag.as_int_array().ok_or_else(|| wrong_kind("IntArray", tag))
    }

    pub fn get_long_array(&self, path: &str) -> Result<&[i64]> {
        let tag = self.get_tag(path)?;
        tag.as_long_array().ok_or_else(|| wrong_kind("LongArray", tag))
    }

    pub fn get_list(&self, path: &str) -> Result<&ListTag> {
        let tag = self.get_tag(path)?;
        tag.as_list().ok_or_else(|| wrong_kind("List", tag))
    }

    pub fn get_compound(&self, path: &str) -> Result<&HashMap<String, Tag>> {
        let tag = self.get_tag(path)?;
        tag.as_compound().ok_or_else(|| wrong_kind("Compound", tag))
    }

    pub fn set_byte(&mut self, path: &str, value: i8) -> Result<()> {
        self.set_tag(path, Tag::Byte(value))
    }

    pub fn set_bool(&mut self, path: &str, value: bool) -> Result<()> {
        self.set_tag(path, Tag::bool(value))
    }

    pub fn set_short(&mut self, path: &str, value: i16) -> Result<()> {
        self.set_tag(path, Tag::Short(value))
    }

    pub fn set_int(&mut self, path: &str, value: i32) -> Result<()> {
        self.set_tag(path, Tag::Int(value))
    }

    pub fn set_long(&mut self, path: &str, value: i64) -> Result<()> {
        self.set_tag(path, Tag::Long(value))
    }

    pub fn set_float(&mut self, path: &str, value: f32) -> Result<()> {
        self.set_tag(path, Tag::Float(value))
    }

    pub fn set_double(&mut self, path: &str, value: f64) -> Result<()> {
        self.set_tag(path, Tag::Double(value))
    }

    pub fn set_string(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        self.set_tag(path, Tag::String(value.into()))
    }

    pub fn set_long_array(&mut self, path: &str, value: Vec<i64>) -> Result<()> {
        self.set_tag(path, Tag::LongArray(value))
    }
}
