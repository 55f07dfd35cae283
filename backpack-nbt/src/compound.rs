use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::tag::NbtTag;
use crate::{get_nbt_string, take_u8, Error, END_ID};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NbtCompound {
    pub child_tags: Vec<(String, NbtTag)>,
}

impl NbtCompound {
    pub fn new() -> NbtCompound {
        NbtCompound {
            child_tags: Vec::new(),
        }
    }

    pub fn deserialize_content(bytes: &mut impl Buf) -> Result<NbtCompound, Error> {
        let mut compound = NbtCompound::new();

        loop {
            let tag_id = take_u8(bytes)?;
            if tag_id == END_ID {
                break;
            }

            let name = get_nbt_string(bytes)?;
            let tag = NbtTag::deserialize_data(bytes, tag_id)?;
            compound.put(name, tag);
        }

        Ok(compound)
    }

    pub fn serialize_content(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        for (name, tag) in &self.child_tags {
            bytes.put_u8(tag.get_type_id());
            bytes.put(NbtTag::String(name.clone()).serialize_data());
            bytes.put(tag.serialize_data());
        }
        bytes.put_u8(END_ID);
        bytes.freeze()
    }

    pub fn put(&mut self, name: String, value: impl Into<NbtTag>) {
        if !self.child_tags.iter().any(|(key, _)| key == &name) {
            self.child_tags.push((name, value.into()));
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        for (key, value) in &self.child_tags {
            if key.as_str() == name {
                return Some(value);
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.child_tags.is_empty()
    }

    pub fn get_byte(&self, name: &str) -> Option<i8> {
        self.get(name).and_then(|tag| tag.extract_byte())
    }

    pub fn get_short(&self, name: &str) -> Option<i16> {
        self.get(name).and_then(|tag| tag.extract_short())
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|tag| tag.extract_int())
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|tag| tag.extract_long())
    }

    pub fn get_string(&self, name: &str) -> Option<&String> {
        self.get(name).and_then(|tag| tag.extract_string())
    }

    pub fn get_list(&self, name: &str) -> Option<&Vec<NbtTag>> {
        self.get(name).and_then(|tag| tag.extract_list())
    }

    pub fn get_compound(&self, name: &str) -> Option<&NbtCompound> {
        self.get(name).and_then(|tag| tag.extract_compound())
    }
}
