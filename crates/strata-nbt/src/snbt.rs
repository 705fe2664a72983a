//! Stringified rendering (`{Data:{allowCommands:1b}}`).

use crate::tag::{ListTag, Tag};
use std::fmt::{self, Display, Formatter, Write};

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn write_quoted(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    f.write_char('"')
}

fn write_array<T: Display>(f: &mut Formatter<'_>, prefix: &str, values: &[T]) -> fmt::Result {
    write!(f, "[{};", prefix)?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{}", value)?;
    }
    f.write_char(']')
}

impl Display for ListTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                f.write_char(',')?;
            }
            write!(f, "{}", item)?;
        }
        f.write_char(']')
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Byte(v) => write!(f, "{}b", v),
            Tag::Short(v) => write!(f, "{}s", v),
            Tag::Int(v) => write!(f, "{}", v),
            Tag::Long(v) => write!(f, "{}L", v),
            Tag::Float(v) => write!(f, "{}f", v),
            Tag::Double(v) => write!(f, "{}d", v),
            Tag::String(v) => write_quoted(f, v),
            Tag::ByteArray(v) => write_array(f, "B", v),
            Tag::IntArray(v) => write_array(f, "I", v),
            Tag::LongArray(v) => write_array(f, "L", v),
            Tag::List(list) => write!(f, "{}", list),
            Tag::Compound(map) => {
                // Sorted so equal compounds always render the same way.
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                f.write_char('{')?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    if is_bare_key(key) {
                        f.write_str(key)?;
                    } else {
                        write_quoted(f, key)?;
                    }
                    write!(f, ":{}", map[key])?;
                }
                f.write_char('}')
            }
        }
    }
}
