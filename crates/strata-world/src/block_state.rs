use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use strata_common::{Result, StrataError};
use strata_nbt::{ListTag, Tag, TagKind};

pub const AIR: &str = "minecraft:air";

/// A block name plus its property assignments, e.g.
/// `minecraft:oak_stairs[facing=north,half=bottom]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        BlockState {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn air() -> Self {
        BlockState::new(AIR)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is_air(&self) -> bool {
        matches!(
            self.name.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air"
        )
    }

    /// Reads a palette entry: `{Name: "...", Properties: {key: "value"}}`.
    pub fn from_tag(tag: &Tag) -> Result<Self> {
        let name = tag.get_string("Name")?.to_owned();
        let mut properties = BTreeMap::new();
        if tag.contains("Properties") {
            for (key, value) in tag.get_compound("Properties")? {
                let value = value.as_string().ok_or_else(|| StrataError::WrongTagKind {
                    expected: TagKind::String.name(),
                    found: value.kind().name(),
                })?;
                properties.insert(key.clone(), value.to_owned());
            }
        }
        Ok(BlockState { name, properties })
    }

    pub fn to_tag(&self) -> Tag {
        let mut compound = HashMap::new();
        compound.insert("Name".to_string(), Tag::string(self.name.clone()));
        if !self.properties.is_empty() {
            let properties = self
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), Tag::string(v.clone())))
                .collect();
            compound.insert("Properties".to_string(), Tag::Compound(properties));
        }
        Tag::Compound(compound)
    }

    /// Palette list as stored under `block_states.palette`.
    pub fn palette_to_tag(palette: &[BlockState]) -> Result<Tag> {
        let entries = palette.iter().map(BlockState::to_tag).collect();
        Ok(Tag::List(ListTag::from_tags(TagKind::Compound, entries)?))
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.properties.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("]")
    }
}

impl FromStr for BlockState {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        let Some((name, rest)) = s.split_once('[') else {
            return Ok(BlockState::new(s));
        };
        let body = rest.strip_suffix(']').ok_or_else(|| {
            StrataError::InvalidData(format!("unterminated property list in {:?}", s))
        })?;
        let mut state = BlockState::new(name);
        for pair in body.split(',').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StrataError::InvalidData(format!("property {:?} has no value in {:?}", pair, s))
            })?;
            state.properties.insert(key.to_owned(), value.to_owned());
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_display_orders_properties() {
        let state = BlockState::new("minecraft:oak_stairs")
            .with_property("half", "bottom")
            .with_property("facing", "north");
        assert_eq!(state.to_string(), "minecraft:oak_stairs[facing=north,half=bottom]");
        assert_eq!(BlockState::air().to_string(), "minecraft:air");
    }

    #[test]
    fn test_parse() {
        let state: BlockState = "minecraft:lever[powered=true,face=wall]".parse().unwrap();
        assert_eq!(state.name, "minecraft:lever");
        assert_eq!(state.property("powered"), Some("true"));
        assert_eq!(state.property("face"), Some("wall"));
        assert_eq!(state.to_string().parse::<BlockState>().unwrap(), state);

        assert_eq!("minecraft:stone".parse::<BlockState>().unwrap(), BlockState::new("minecraft:stone"));
        assert_matches!("minecraft:lever[powered".parse::<BlockState>(), Err(StrataError::InvalidData(_)));
        assert_matches!("minecraft:lever[powered]".parse::<BlockState>(), Err(StrataError::InvalidData(_)));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = BlockState::new("x").with_property("a", "1").with_property("b", "2");
        let b = BlockState::new("x").with_property("b", "2").with_property("a", "1");
        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert_ne!(b, BlockState::new("x").with_property("a", "1"));
    }

    #[test]
    fn test_tag_conversion() {
        let state = BlockState::new("minecraft:water").with_property("level", "0");
        let tag = state.to_tag();
        assert_eq!(tag.get_string("Name").unwrap(), "minecraft:water");
        assert_eq!(tag.get_string("Properties.level").unwrap(), "0");
        assert_eq!(BlockState::from_tag(&tag).unwrap(), state);

        let bare = BlockState::air().to_tag();
        assert!(!bare.contains("Properties"));

        let mut bad = tag.clone();
        bad.set_int("Properties.level", 0).unwrap();
        assert_matches!(BlockState::from_tag(&bad), Err(StrataError::WrongTagKind { .. }));
        assert_matches!(
            BlockState::from_tag(&Tag::empty_compound()),
            Err(StrataError::PathNotFound(_))
        );
    }

    #[test]
    fn test_serde() {
        let state: BlockState = serde_json::from_str(r#"{"name":"minecraft:stone"}"#).unwrap();
        assert_eq!(state, BlockState::new("minecraft:stone"));
    }

    #[test]
    fn test_is_air() {
        assert!(BlockState::air().is_air());
        assert!(BlockState::new("minecraft:cave_air").is_air());
        assert!(!BlockState::new("minecraft:bedrock").is_air());
    }
}
