use std::collections::HashMap;
use std::slice;
use strata_common::{Result, StrataError};

/// Wire discriminant of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn from_id(id: u8) -> Result<Self> {
        Ok(match id {
            0 => TagKind::End,
            1 => TagKind::Byte,
            2 => TagKind::Short,
            3 => TagKind::Int,
            4 => TagKind::Long,
            5 => TagKind::Float,
            6 => TagKind::Double,
            7 => TagKind::ByteArray,
            8 => TagKind::String,
            9 => TagKind::List,
            10 => TagKind::Compound,
            11 => TagKind::IntArray,
            12 => TagKind::LongArray,
            other => return Err(StrataError::InvalidTagKind(other)),
        })
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "End",
            TagKind::Byte => "Byte",
            TagKind::Short => "Short",
            TagKind::Int => "Int",
            TagKind::Long => "Long",
            TagKind::Float => "Float",
            TagKind::Double => "Double",
            TagKind::ByteArray => "ByteArray",
            TagKind::String => "String",
            TagKind::List => "List",
            TagKind::Compound => "Compound",
            TagKind::IntArray => "IntArray",
            TagKind::LongArray => "LongArray",
        }
    }
}

/// A value of the binary tag format. `End` only exists on the wire and has
/// no value form; see [`TagKind::End`].
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(ListTag),
    Compound(HashMap<String, Tag>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::String(_) => TagKind::String,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
        }
    }

    pub fn string(value: impl Into<String>) -> Tag {
        Tag::String(value.into())
    }

    /// Booleans are stored as a byte, `1` or `0`.
    pub fn bool(value: bool) -> Tag {
        Tag::Byte(value as i8)
    }

    pub fn empty_compound() -> Tag {
        Tag::Compound(HashMap::new())
    }

    pub fn empty_list(element_kind: TagKind) -> Tag {
        Tag::List(ListTag::new(element_kind))
    }

    pub fn as_compound(&self) -> Option<&HashMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut HashMap<String, Tag>> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListTag> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListTag> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Tag::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tag::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Tag::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Tag::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(v) => Some(v),
            _ => None,
        }
    }
}

/// An ordered, homogeneous sequence of nameless tags.
///
/// The element kind is fixed at construction. `push` and `set` reject tags
/// of any other kind and leave the list untouched when they do.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTag {
    element_kind: TagKind,
    items: Vec<Tag>,
}

impl ListTag {
    pub fn new(element_kind: TagKind) -> Self {
        ListTag {
            element_kind,
            items: Vec::new(),
        }
    }

    /// Builds a list from existing tags, checking each one.
    pub fn from_tags(element_kind: TagKind, items: Vec<Tag>) -> Result<Self> {
        for tag in &items {
            check_kind(element_kind, tag)?;
        }
        Ok(ListTag {
            element_kind,
            items,
        })
    }

    pub(crate) fn from_decoded(element_kind: TagKind, items: Vec<Tag>) -> Self {
        ListTag {
            element_kind,
            items,
        }
    }

    pub fn element_kind(&self) -> TagKind {
        self.element_kind
    }

    pub fn push(&mut self, tag: Tag) -> Result<()> {
        check_kind(self.element_kind, &tag)?;
        self.items.push(tag);
        Ok(())
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, tag: Tag) -> Result<Tag> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(StrataError::IndexOutOfRange { index, len })?;
        check_kind(self.element_kind, &tag)?;
        Ok(std::mem::replace(slot, tag))
    }

    pub fn remove(&mut self, index: usize) -> Result<Tag> {
        if index >= self.items.len() {
            return Err(StrataError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    /// In-place access. Replacing the element with a different kind is caught
    /// when the list is encoded.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<Tag> {
        self.items
    }
}

impl<'a> IntoIterator for &'a ListTag {
    type Item = &'a Tag;
    type IntoIter = slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

pub(crate) fn check_kind(expected: TagKind, tag: &Tag) -> Result<()> {
    if tag.kind() != expected {
        return Err(StrataError::ListKindMismatch {
            expected: expected.name(),
            found: tag.kind().name(),
        });
    }
    Ok(())
}
