//! World save format. A save is a small binary envelope, a magic and a version, followed
//! by the zlib-compressed JSON document of the world. Chunk arrays are run-length
//! encoded in the document.

use std::collections::BTreeMap;
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Serialize, Deserialize};
use thiserror::Error;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use glam::IVec3;

use crate::block_entity::BlockEntity;
use crate::worldgen::TerrainKind;
use crate::world::Dimension;

pub mod rle;
pub mod store;

pub use store::{KeyValueStore, MemoryStore, DirStore, DEFAULT_MAX_ENTRY_SIZE};


/// Magic bytes at the start of every save.
pub const MAGIC: [u8; 4] = *b"VXSW";
/// Current version of the save format.
pub const VERSION: u16 = 1;
/// Maximum size of the decompressed JSON document.
pub const MAX_DOCUMENT_SIZE: u64 = 256 * 1024 * 1024;
/// Prefix of the store key of each save slot.
pub const KEY_PREFIX: &str = "worldSave_";


/// Get the store key of the given save slot.
pub fn slot_key(slot: &str) -> String {
    format!("{KEY_PREFIX}{slot}")
}


/// The whole world document, as stored in a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    pub seed: i64,
    pub dimension: Dimension,
    #[serde(default)]
    pub terrain: TerrainKind,
    pub chunks: Vec<ChunkDocument>,
    /// Block entities mapped to their position key, see [`pos_key`].
    #[serde(rename = "blockEntities", default)]
    pub block_entities: BTreeMap<String, BlockEntity>,
}

/// A single chunk of the world document, each array is run-length encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkDocument {
    pub cx: i32,
    pub cz: i32,
    pub blocks: Vec<u8>,
    pub metadata: Vec<u8>,
    pub light: Vec<u8>,
}


/// Format the position key of a block entity, `x,y,z`.
pub fn pos_key(pos: IVec3) -> String {
    format!("{},{},{}", pos.x, pos.y, pos.z)
}

/// Parse the position key of a block entity.
pub fn parse_pos_key(key: &str) -> Option<IVec3> {
    let mut parts = key.split(',').map(|part| part.trim().parse::<i32>());
    let x = parts.next()?.ok()?;
    let y = parts.next()?.ok()?;
    let z = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(IVec3::new(x, y, z))
}


/// Encode the document into its binary envelope.
pub fn encode_document(doc: &WorldDocument) -> Result<Vec<u8>, SaveError> {

    let mut data = Vec::new();
    data.write_all(&MAGIC)?;
    data.write_u16::<BigEndian>(VERSION)?;

    let mut encoder = ZlibEncoder::new(data, Compression::default());
    serde_json::to_writer(&mut encoder, doc)?;
    Ok(encoder.finish()?)

}

/// Decode a document from its binary envelope.
pub fn decode_document(data: &[u8]) -> Result<WorldDocument, LoadError> {
    decode_document_with_limit(data, MAX_DOCUMENT_SIZE)
}

/// Decode a document from its binary envelope, failing if the decompressed document is
/// larger than the given size.
pub fn decode_document_with_limit(data: &[u8], max_size: u64) -> Result<WorldDocument, LoadError> {

    let mut reader = data;

    let mut magic = [0; 4];
    reader.read_exact(&mut magic).map_err(|_| LoadError::BadMagic)?;
    if magic != MAGIC {
        return Err(LoadError::BadMagic);
    }

    let version = reader.read_u16::<BigEndian>().map_err(|_| LoadError::BadMagic)?;
    if version != VERSION {
        return Err(LoadError::UnsupportedVersion(version));
    }

    let mut json = Vec::new();
    ZlibDecoder::new(reader)
        .take(max_size.saturating_add(1))
        .read_to_end(&mut json)
        .map_err(LoadError::Decompress)?;

    if json.len() as u64 > max_size {
        return Err(LoadError::Malformed(format!("document exceeds {max_size} bytes once decompressed")));
    }

    Ok(serde_json::from_slice(&json)?)

}


/// Errors when saving a world.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("The encoded save is {size} bytes, the store accepts at most {max} bytes.")]
    TooLarge {
        size: usize,
        max: usize,
    },
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode the world document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors when loading a world, the world is left untouched on any error.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No save found for slot {0}.")]
    Missing(String),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("The save has no valid magic header.")]
    BadMagic,
    #[error("The save version {0} is not supported.")]
    UnsupportedVersion(u16),
    #[error("Failed to decompress the save: {0}")]
    Decompress(#[source] io::Error),
    #[error("Failed to decode the world document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("The world document is malformed: {0}")]
    Malformed(String),
}


#[cfg(test)]
mod tests {

    use crate::block_entity::CropBlockEntity;

    use super::*;

    fn sample() -> WorldDocument {
        let mut block_entities = BTreeMap::new();
        block_entities.insert(pos_key(IVec3::new(-3, 64, 17)), BlockEntity::Crop(CropBlockEntity { stage: 3 }));
        WorldDocument {
            seed: -42,
            dimension: Dimension::Nether,
            terrain: TerrainKind::Default,
            chunks: vec![ChunkDocument {
                cx: -1,
                cz: 1,
                blocks: rle::encode(&[1, 1, 1, 0]),
                metadata: rle::encode(&[0; 4]),
                light: rle::encode(&[15, 14, 0, 0]),
            }],
            block_entities,
        }
    }

    #[test]
    fn envelope() {

        let data = encode_document(&sample()).unwrap();
        assert_eq!(&data[..4], b"VXSW");
        assert_eq!(&data[4..6], &[0, 1]);
        assert_eq!(decode_document(&data).unwrap(), sample());

        let mut bad = data.clone();
        bad[0] = b'X';
        assert!(matches!(decode_document(&bad), Err(LoadError::BadMagic)));
        assert!(matches!(decode_document(&data[..3]), Err(LoadError::BadMagic)));

        let mut bad = data.clone();
        bad[5] = 9;
        assert!(matches!(decode_document(&bad), Err(LoadError::UnsupportedVersion(9))));

        let mut bad = data[..6].to_vec();
        bad.extend_from_slice(b"not zlib at all");
        assert!(matches!(decode_document(&bad), Err(LoadError::Decompress(_))));

    }

    #[test]
    fn document_size_limit() {

        let data = encode_document(&sample()).unwrap();
        assert!(decode_document_with_limit(&data, 4096).is_ok());
        assert!(matches!(decode_document_with_limit(&data, 16), Err(LoadError::Malformed(_))));

        // A few bytes of zlib expanding to megabytes of zeros.
        let mut bomb = Vec::new();
        bomb.extend_from_slice(&MAGIC);
        bomb.extend_from_slice(&VERSION.to_be_bytes());
        let mut encoder = ZlibEncoder::new(bomb, Compression::best());
        encoder.write_all(&vec![0; 4 * 1024 * 1024]).unwrap();
        let bomb = encoder.finish().unwrap();
        assert!(bomb.len() < 64 * 1024);
        assert!(matches!(decode_document_with_limit(&bomb, 1024 * 1024), Err(LoadError::Malformed(_))));

    }

    #[test]
    fn document_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dimension"], "nether");
        assert_eq!(json["blockEntities"]["-3,64,17"]["type"], "crop");
        assert_eq!(parse_pos_key("-3,64,17"), Some(IVec3::new(-3, 64, 17)));
        assert_eq!(parse_pos_key("1,2"), None);
        assert_eq!(parse_pos_key("1,2,3,4"), None);
        assert_eq!(parse_pos_key("a,2,3"), None);
    }

}
