//! Saving and loading the whole world to a key-value store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use glam::IVec3;
use tracing::{info, warn, instrument};

use crate::save::{self, rle, KeyValueStore, WorldDocument, ChunkDocument, SaveError, LoadError};
use crate::chunk::{Chunk, calc_chunk_pos, calc_local_pos, CHUNK_SIZE};
use crate::worldgen::TerrainGenerator;
use crate::block_entity::BlockEntity;
use crate::block;

use super::light::MAX_LIGHT;
use super::{World, Event, ChunkEvent};


impl World {

    /// Save the whole world in the given slot of the store, returning the size of the
    /// encoded save. Every chunk is clean after a successful save.
    #[instrument(skip(self, store))]
    pub fn save_world(&mut self, slot: &str, store: &mut dyn KeyValueStore) -> Result<usize, SaveError> {

        let mut keys = self.chunks.keys().copied().collect::<Vec<_>>();
        keys.sort_unstable();

        let mut chunks = Vec::with_capacity(keys.len());
        let mut block_entities = BTreeMap::new();

        for (cx, cz) in keys {
            let Some(chunk) = self.chunks.get(&(cx, cz)) else { continue };
            chunks.push(ChunkDocument {
                cx,
                cz,
                blocks: rle::encode(chunk.blocks()),
                metadata: rle::encode(chunk.metadata()),
                light: rle::encode(chunk.light()),
            });
            for (pos, block_entity) in chunk.iter_block_entities() {
                block_entities.insert(save::pos_key(pos), block_entity.clone());
            }
        }

        let doc = WorldDocument {
            seed: self.seed,
            dimension: self.dimension,
            terrain: self.terrain,
            chunks,
            block_entities,
        };

        let data = save::encode_document(&doc)?;
        if let Some(max) = store.max_entry_size() {
            if data.len() > max {
                return Err(SaveError::TooLarge { size: data.len(), max });
            }
        }

        store.set(&save::slot_key(slot), &data)?;

        for chunk in self.chunks.values_mut() {
            chunk.set_dirty(false);
        }

        info!("saved {} chunks and {} block entities, {} bytes", doc.chunks.len(), doc.block_entities.len(), data.len());
        Ok(data.len())

    }

    /// Load the whole world from the given slot of the store, replacing every chunk. The
    /// save is fully decoded before anything is replaced, so the world is unchanged on
    /// error. Pending writes and frontiers are discarded, the light stored in the save
    /// is trusted.
    #[instrument(skip(self, store))]
    pub fn load_world(&mut self, slot: &str, store: &dyn KeyValueStore) -> Result<(), LoadError> {

        let data = store.get(&save::slot_key(slot))?
            .ok_or_else(|| LoadError::Missing(slot.to_string()))?;

        let doc = save::decode_document(&data)?;
        let chunks = self.decode_chunks(&doc)?;

        self.seed = doc.seed;
        self.dimension = doc.dimension;
        self.terrain = doc.terrain;
        self.generator = Arc::new(TerrainGenerator::new(doc.seed, doc.dimension, doc.terrain));
        self.chunks = chunks;
        self.pending_writes.clear();
        self.light_frontier.clear();
        self.light_removals.clear();
        self.fluid_frontier.clear();
        self.redstone_frontier.clear();

        let mut keys = self.chunks.keys().copied().collect::<Vec<_>>();
        keys.sort_unstable();
        for (cx, cz) in keys {
            self.push_event(Event::Chunk { cx, cz, inner: ChunkEvent::Loaded });
        }

        info!("loaded {} chunks, seed: {}, dimension: {:?}", self.chunks.len(), self.seed, self.dimension);
        Ok(())

    }

    /// Decode every chunk of the document, and attach block entities to them.
    fn decode_chunks(&self, doc: &WorldDocument) -> Result<HashMap<(i32, i32), Box<Chunk>>, LoadError> {

        let mut chunks = HashMap::with_capacity(doc.chunks.len());

        for chunk_doc in &doc.chunks {

            let (cx, cz) = (chunk_doc.cx, chunk_doc.cz);
            let malformed = |what: &str, err: rle::RleError| {
                LoadError::Malformed(format!("chunk {cx}/{cz} {what}: {err}"))
            };

            let mut blocks = rle::decode(&chunk_doc.blocks, CHUNK_SIZE).map_err(|e| malformed("blocks", e))?;
            let mut metadata = rle::decode(&chunk_doc.metadata, CHUNK_SIZE).map_err(|e| malformed("metadata", e))?;
            let mut light = rle::decode(&chunk_doc.light, CHUNK_SIZE).map_err(|e| malformed("light", e))?;

            let mut unknown = 0usize;
            for index in 0..CHUNK_SIZE {
                if !self.registry.is_known(blocks[index]) {
                    blocks[index] = block::AIR;
                    metadata[index] = 0;
                    unknown += 1;
                }
                light[index] = light[index].min(MAX_LIGHT);
            }

            if unknown != 0 {
                warn!("chunk {cx}/{cz} has {unknown} unknown blocks, replaced by air");
            }

            let chunk = Chunk::from_arrays(&blocks, &metadata, &light)
                .ok_or_else(|| LoadError::Malformed(format!("chunk {cx}/{cz} has invalid arrays")))?;

            if chunks.insert((cx, cz), chunk).is_some() {
                return Err(LoadError::Malformed(format!("chunk {cx}/{cz} is duplicated")));
            }

        }

        for (key, block_entity) in &doc.block_entities {

            let pos = save::parse_pos_key(key)
                .ok_or_else(|| LoadError::Malformed(format!("invalid block entity position {key:?}")))?;

            let Some(chunk) = calc_chunk_pos(pos).and_then(|cpos| chunks.get_mut(&cpos)) else {
                warn!("dropped block entity at {pos}, its chunk is not in the save");
                continue;
            };

            let (id, _) = chunk.get_block(pos);
            if self.registry.get_entity_kind(id) != Some(block_entity.kind()) {
                warn!("dropped block entity {:?} at {pos}, the block is {}", block_entity.kind(), block::name(id));
                continue;
            }

            chunk.set_block_entity(pos, block_entity.clone());

        }

        // Every block that requires a block entity has one.
        for (&(cx, cz), chunk) in chunks.iter_mut() {
            let origin = IVec3::new(cx * 16, 0, cz * 16);
            for index in 0..CHUNK_SIZE {
                if let Some(kind) = self.registry.get_entity_kind(chunk.blocks()[index]) {
                    let pos = origin + calc_local_pos(index);
                    if chunk.get_block_entity(pos).is_none() {
                        chunk.set_block_entity(pos, BlockEntity::new(kind));
                    }
                }
            }
            chunk.set_dirty(false);
        }

        Ok(chunks)

    }

}


#[cfg(test)]
mod tests {

    use crate::world::test_util::flat_world;
    use crate::save::{MemoryStore, encode_document};
    use crate::block_entity::chest::ChestBlockEntity;
    use crate::block_entity::{ItemStack, CropBlockEntity};
    use crate::world::Dimension;

    use super::*;

    #[test]
    fn round_trip() {

        let mut world = flat_world();
        let chest = IVec3::new(3, 5, -7);
        let torch = IVec3::new(0, 10, 0);

        world.set_block(chest, block::CHEST, 0);
        let mut chest_entity = ChestBlockEntity::default();
        assert!(chest_entity.push(ItemStack::new_block(block::COBBLESTONE, 32)).is_ok());
        assert!(world.set_block_entity(chest, BlockEntity::Chest(chest_entity.clone())));
        world.set_block(torch, block::TORCH, 0);
        world.settle(100);

        let mut store = MemoryStore::new();
        world.save_world("main", &mut store).unwrap();
        assert!(store.contains("worldSave_main"));
        assert!(world.iter_chunks().all(|(_, chunk)| !chunk.is_dirty()));

        let mut loaded = flat_world();
        loaded.set_block(IVec3::new(1, 1, 1), block::GLASS, 0);
        loaded.load_world("main", &store).unwrap();

        assert_eq!(loaded.get_chunk_count(), world.get_chunk_count());
        assert_eq!(loaded.get_block(IVec3::new(1, 1, 1)), block::DIRT);
        assert_eq!(loaded.get_block(chest), block::CHEST);
        assert_eq!(loaded.get_block_entity(chest), Some(&BlockEntity::Chest(chest_entity)));
        assert_eq!(loaded.get_light(torch + IVec3::X), 14);
        assert!(loaded.is_quiescent());

        for ((cx, cz), chunk) in world.iter_chunks() {
            let other = loaded.get_chunk(cx, cz).unwrap();
            assert_eq!(chunk.blocks(), other.blocks());
            assert_eq!(chunk.metadata(), other.metadata());
            assert_eq!(chunk.light(), other.light());
        }

    }

    #[test]
    fn missing_and_malformed() {

        let mut world = flat_world();
        let store = MemoryStore::new();
        assert!(matches!(world.load_world("nope", &store), Err(LoadError::Missing(_))));

        let mut store = MemoryStore::new();
        let doc = WorldDocument {
            seed: 5,
            dimension: Dimension::Nether,
            terrain: Default::default(),
            chunks: vec![ChunkDocument {
                cx: 0,
                cz: 0,
                blocks: rle::encode(&[block::STONE; 100]),
                metadata: rle::encode(&[0; CHUNK_SIZE]),
                light: rle::encode(&[0; CHUNK_SIZE]),
            }],
            block_entities: BTreeMap::new(),
        };
        store.set("worldSave_bad", &encode_document(&doc).unwrap()).unwrap();
        store.set("worldSave_garbage", b"VXSW\x00\x01garbage").unwrap();

        world.set_block(IVec3::new(0, 20, 0), block::GLASS, 0);
        assert!(matches!(world.load_world("bad", &store), Err(LoadError::Malformed(_))));
        assert!(matches!(world.load_world("garbage", &store), Err(LoadError::Decompress(_))));

        // Unchanged on failure.
        assert_eq!(world.get_dimension(), Dimension::Overworld);
        assert_eq!(world.get_block(IVec3::new(0, 20, 0)), block::GLASS);
        assert_eq!(world.get_chunk_count(), 9);

    }

    #[test]
    fn unknown_blocks_and_entities() {

        let mut blocks = vec![block::AIR; CHUNK_SIZE];
        blocks[0] = 200;
        blocks[1] = block::WHEAT;
        blocks[2] = block::STONE;
        let mut metadata = vec![0; CHUNK_SIZE];
        metadata[0] = 9;

        let mut block_entities = BTreeMap::new();
        // The position of the stone block.
        block_entities.insert("0,2,0".to_string(), BlockEntity::Crop(CropBlockEntity { stage: 2 }));

        let doc = WorldDocument {
            seed: 5,
            dimension: Dimension::Overworld,
            terrain: Default::default(),
            chunks: vec![ChunkDocument {
                cx: 0,
                cz: 0,
                blocks: rle::encode(&blocks),
                metadata: rle::encode(&metadata),
                light: rle::encode(&[0; CHUNK_SIZE]),
            }],
            block_entities,
        };

        let mut store = MemoryStore::new();
        store.set("worldSave_0", &encode_document(&doc).unwrap()).unwrap();

        let mut world = flat_world();
        world.load_world("0", &store).unwrap();

        assert_eq!(world.get_seed(), 5);
        assert_eq!(world.get_chunk_count(), 1);
        assert_eq!(world.get_block_and_metadata(IVec3::new(0, 0, 0)), Some((block::AIR, 0)));
        assert_eq!(world.get_block_entity(IVec3::new(0, 2, 0)), None);
        assert_eq!(world.get_block_entity(IVec3::new(0, 1, 0)), Some(&BlockEntity::Crop(CropBlockEntity::default())));

    }

    #[test]
    fn too_large() {

        let mut world = flat_world();
        world.set_block(IVec3::new(0, 20, 0), block::GLASS, 0);

        let mut store = MemoryStore::with_max_entry_size(64);
        assert!(matches!(world.save_world("main", &mut store), Err(SaveError::TooLarge { max: 64, .. })));
        assert!(!store.contains("worldSave_main"));
        assert!(world.get_chunk(0, 0).unwrap().is_dirty());

    }

}
