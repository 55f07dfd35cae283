use bytes::{Buf, BufMut, Bytes, BytesMut};
use compound::NbtCompound;
use tag::NbtTag;
use thiserror::Error;

pub mod compound;
pub mod tag;

pub const END_ID: u8 = 0;
pub const BYTE_ID: u8 = 1;
pub const SHORT_ID: u8 = 2;
pub const INT_ID: u8 = 3;
pub const LONG_ID: u8 = 4;
pub const STRING_ID: u8 = 8;
pub const LIST_ID: u8 = 9;
pub const COMPOUND_ID: u8 = 10;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The root tag of the record is not a compound tag. Received tag id: {0}")]
    NoRootCompound(u8),
    #[error("Encountered an unknown NBT tag id {0}.")]
    UnknownTagId(u8),
    #[error("Failed to Cesu 8 Decode")]
    Cesu8DecodingError,
    #[error("Record ended in the middle of a tag")]
    Incomplete,
}

/// A named root compound, the outermost shape of every persisted record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nbt {
    pub name: String,
    pub root_tag: NbtCompound,
}

impl Nbt {
    pub fn new(name: String, tag: NbtCompound) -> Self {
        Nbt {
            name,
            root_tag: tag,
        }
    }

    pub fn read(bytes: &mut impl Buf) -> Result<Nbt, Error> {
        let tag_type_id = take_u8(bytes)?;

        if tag_type_id != COMPOUND_ID {
            return Err(Error::NoRootCompound(tag_type_id));
        }

        Ok(Nbt {
            name: get_nbt_string(bytes)?,
            root_tag: NbtCompound::deserialize_content(bytes)?,
        })
    }

    pub fn write(&self) -> Bytes {
        let mut bytes = BytesMut::new();
        bytes.put_u8(COMPOUND_ID);
        bytes.put(NbtTag::String(self.name.clone()).serialize_data());
        bytes.put(self.root_tag.serialize_content());
        bytes.freeze()
    }
}

// Strings are stored in Java's modified UTF-8, length-prefixed with a u16.
pub fn get_nbt_string(bytes: &mut impl Buf) -> Result<String, Error> {
    let len = take_u16(bytes)? as usize;
    if bytes.remaining() < len {
        return Err(Error::Incomplete);
    }
    let string_bytes = bytes.copy_to_bytes(len);
    let string = cesu8::from_java_cesu8(&string_bytes).map_err(|_| Error::Cesu8DecodingError)?;
    Ok(string.to_string())
}

pub(crate) fn take_u8(bytes: &mut impl Buf) -> Result<u8, Error> {
    if bytes.remaining() < 1 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_u8())
}

pub(crate) fn take_u16(bytes: &mut impl Buf) -> Result<u16, Error> {
    if bytes.remaining() < 2 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_u16())
}

pub(crate) fn take_i8(bytes: &mut impl Buf) -> Result<i8, Error> {
    if bytes.remaining() < 1 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_i8())
}

pub(crate) fn take_i16(bytes: &mut impl Buf) -> Result<i16, Error> {
    if bytes.remaining() < 2 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_i16())
}

pub(crate) fn take_i32(bytes: &mut impl Buf) -> Result<i32, Error> {
    if bytes.remaining() < 4 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_i32())
}

pub(crate) fn take_i64(bytes: &mut impl Buf) -> Result<i64, Error> {
    if bytes.remaining() < 8 {
        return Err(Error::Incomplete);
    }
    Ok(bytes.get_i64())
}
