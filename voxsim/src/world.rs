//! Data structure for storing a world (overworld or nether) at runtime.

use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::mem;

use glam::IVec3;

use serde::{Serialize, Deserialize};
use tracing::{debug, trace, warn, instrument};

use crate::chunk::{Chunk, calc_chunk_pos, calc_local_pos, CHUNK_SIZE, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::worldgen::{TerrainGenerator, TerrainKind};
use crate::block_entity::BlockEntity;
use crate::block::BlockRegistry;
use crate::util::{Face, XZ_MIN, XZ_MAX};
use crate::block;


// Following modules are order by order of importance, last modules depends on first ones.
pub mod frontier;
pub mod observer;
pub mod power;
pub mod light;
pub mod fluid;
pub mod redstone;
pub mod save;

use frontier::Frontier;
use observer::WorldObserver;
use light::LightReseed;


/// Configuration of a world, given at creation.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// The seed used by the terrain generator.
    pub seed: i64,
    /// The dimension, which selects the terrain generator and some fluid rules.
    pub dimension: Dimension,
    /// The terrain preset for the dimension.
    pub terrain: TerrainKind,
    /// The policy used to re-seed light after a light source has been removed.
    pub light_reseed: LightReseed,
    /// Maximum number of positions each engine evaluates in a single tick, the remaining
    /// positions are kept for the next ticks.
    pub max_updates_per_tick: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            dimension: Dimension::Overworld,
            terrain: TerrainKind::Default,
            light_reseed: LightReseed::ResetBox,
            max_updates_per_tick: 1 << 16,
        }
    }
}


/// Range of the chunk coordinates, on both axes, that a world can generate.
pub const CHUNK_COORD_RANGE: RangeInclusive<i32> = (XZ_MIN >> 4)..=(XZ_MAX >> 4);


/// # Components
///
/// This data structure stores chunks, which are the storage for block, metadata, light
/// and block entities of a 16x16 column in the world with a height of 128. A chunk is
/// created by generating it on first access to its coordinate, once generated a chunk
/// stays until explicitly unloaded. Chunks can only be generated with coordinates in
/// [`CHUNK_COORD_RANGE`], so that every block position fits in a [`PackedPos`](crate::util::PackedPos).
///
/// Writes aimed at a chunk that is not yet generated are kept as pending writes, and are
/// applied in order when that chunk gets generated. This is how structures can overflow
/// in neighbor chunks.
///
/// # Logic
///
/// Three engines keep derived state consistent with the blocks: light, fluid and
/// redstone. Each engine has a frontier of positions whose derived value may not be in
/// equilibrium, every block change enqueues relevant positions in the frontiers and
/// each [`World::tick`] drains a snapshot of every frontier, in order fluid, redstone
/// and light. Positions written while a frontier is drained wait for the next tick.
///
/// # Events
///
/// This structure also allows listening for events within it through a queue of
/// [`Event`], events listening is disabled by default but can be enabled by swapping
/// a `Vec<Event>` into the world using the [`World::swap_events`]. Observers can also
/// be registered to be called synchronously after each committed change.
///
/// # Naming convention
///
/// Methods provided on this structure should follow a naming convention depending on the
/// action that will apply to the world:
/// - Methods that don't alter the world and return values should be prefixed by `get_`,
///   getters that returns mutable reference should be suffixed with `_mut`;
/// - Getter methods that return booleans should prefer `can_`, `has_` or `is_` prefixes;
/// - Methods that alter the world by running a logic tick should start with `tick_`;
/// - Methods that iterate over some world objects should start with `iter_`;
/// - Methods that re-evaluate a single position for an engine start with `update_`;
/// - All other methods should use a proper verb, preferably composed of one-word to
///   reduce possible meanings (e.g. are `generate_`, `schedule_`, `insert_` or
///   `remove_`).
pub struct World {
    /// When enabled, this contains the list of events that happened in the world since
    /// it was last swapped. This swap behavior is really useful in order to avoid
    /// borrowing issues, by temporarily taking ownership of events, the caller can get
    /// a mutable reference to that world at the same time.
    events: Option<Vec<Event>>,
    /// Observers called after each event.
    observers: Vec<Box<dyn WorldObserver>>,
    /// The block properties, shared with other worlds.
    registry: Arc<BlockRegistry>,
    /// The terrain generator, derived from seed, dimension and terrain kind. It's shared
    /// so that it can be used while the world is mutably borrowed for populating.
    generator: Arc<TerrainGenerator>,
    /// The seed of the terrain generator.
    seed: i64,
    /// The dimension.
    dimension: Dimension,
    /// The terrain preset.
    terrain: TerrainKind,
    /// Light re-seed policy.
    light_reseed: LightReseed,
    /// Maximum frontier positions evaluated per engine and tick.
    max_updates_per_tick: usize,
    /// The world time, increasing on each tick.
    time: u64,
    /// The mapping of world chunks.
    chunks: HashMap<(i32, i32), Box<Chunk>>,
    /// Writes for chunks that are not yet generated, in insertion order.
    pending_writes: HashMap<(i32, i32), Vec<PendingWrite>>,
    /// Positions where light may increase.
    light_frontier: Frontier,
    /// Positions where a light decrease happened, the light around must be reset.
    light_removals: Frontier,
    /// Positions where a fluid may flow or change level.
    fluid_frontier: Frontier,
    /// Positions where a redstone component may change its state.
    redstone_frontier: Frontier,
    /// Positions written while a frontier is being drained, these are evaluated again
    /// on the next tick only.
    drain_writes: Option<HashSet<IVec3>>,
}

impl World {

    /// Create a new world with no chunks and no events queue by default, so events are
    /// disabled.
    pub fn new(registry: Arc<BlockRegistry>, config: WorldConfig) -> Self {
        Self {
            events: None,
            observers: Vec::new(),
            generator: Arc::new(TerrainGenerator::new(config.seed, config.dimension, config.terrain)),
            registry,
            seed: config.seed,
            dimension: config.dimension,
            terrain: config.terrain,
            light_reseed: config.light_reseed,
            max_updates_per_tick: config.max_updates_per_tick.max(1),
            time: 0,
            chunks: HashMap::new(),
            pending_writes: HashMap::new(),
            light_frontier: Frontier::new(),
            light_removals: Frontier::new(),
            fluid_frontier: Frontier::new(),
            redstone_frontier: Frontier::new(),
            drain_writes: None,
        }
    }

    /// This function can be used to swap in a new events queue and return the previous
    /// one if relevant. Giving *None* events queue disable events registration using
    /// the [`World::push_event`] method. Swapping out the events is the only way of
    /// reading them afterward.
    pub fn swap_events(&mut self, events: Option<Vec<Event>>) -> Option<Vec<Event>> {
        mem::replace(&mut self.events, events)
    }

    /// Return true if this world has an internal events queue.
    pub fn has_events(&self) -> bool {
        self.events.is_some()
    }

    /// Register an observer that will be called synchronously for every event.
    pub fn add_observer(&mut self, observer: impl WorldObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Push an event in this world, the event is given to every observer and then
    /// pushed in the events queue, if enabled.
    #[inline]
    pub fn push_event(&mut self, event: Event) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
        if let Some(events) = &mut self.events {
            events.push(event);
        }
    }

    /// Get the block registry used by this world.
    pub fn get_registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Get the seed used to generate this world.
    pub fn get_seed(&self) -> i64 {
        self.seed
    }

    /// Get the dimension of this world.
    pub fn get_dimension(&self) -> Dimension {
        self.dimension
    }

    /// Get the terrain preset of this world.
    pub fn get_terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Get the world time, in ticks.
    pub fn get_time(&self) -> u64 {
        self.time
    }

    // =================== //
    //        CHUNKS       //
    // =================== //

    /// Return true if a chunk is generated at the given chunk coordinates.
    pub fn contains_chunk(&self, cx: i32, cz: i32) -> bool {
        self.chunks.contains_key(&(cx, cz))
    }

    /// Get a reference to a chunk, if generated.
    pub fn get_chunk(&self, cx: i32, cz: i32) -> Option<&Chunk> {
        self.chunks.get(&(cx, cz)).map(|c| &**c)
    }

    /// Get a mutable reference to a chunk, if generated. This is internal because all
    /// block writes must go through [`World::set_block`].
    fn get_chunk_mut(&mut self, cx: i32, cz: i32) -> Option<&mut Chunk> {
        self.chunks.get_mut(&(cx, cz)).map(|c| &mut **c)
    }

    /// Get the number of generated chunks.
    pub fn get_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterate over all generated chunks, in no particular order.
    pub fn iter_chunks(&self) -> impl Iterator<Item = ((i32, i32), &Chunk)> + '_ {
        self.chunks.iter().map(|(&pos, chunk)| (pos, &**chunk))
    }

    /// Generate the chunk at the given coordinates if not already generated, returning
    /// true if it has been generated by this call.
    ///
    /// The terrain is generated, then the chunk is populated with structures, then the
    /// pending writes for the chunk are applied and finally the frontiers are seeded
    /// with every light emitter, fluid and redstone component of the chunk, and with
    /// the cells on both sides of its borders with loaded neighbor chunks.
    #[instrument(skip(self))]
    pub fn generate_chunk(&mut self, cx: i32, cz: i32) -> bool {

        if self.chunks.contains_key(&(cx, cz)) {
            return false;
        }

        if !CHUNK_COORD_RANGE.contains(&cx) || !CHUNK_COORD_RANGE.contains(&cz) {
            warn!("chunk out of the world range");
            return false;
        }

        let generator = Arc::clone(&self.generator);

        let mut chunk = Chunk::new();
        generator.generate(cx, cz, &mut chunk);
        chunk.set_dirty(true);
        self.chunks.insert((cx, cz), chunk);

        generator.populate(cx, cz, self);

        if let Some(writes) = self.pending_writes.remove(&(cx, cz)) {
            debug!("applying {} pending writes", writes.len());
            for write in writes {
                self.set_block_inner(write.pos, write.id, write.metadata);
            }
        }

        self.seed_frontiers(cx, cz);
        self.seed_borders(cx, cz);
        self.push_event(Event::Chunk { cx, cz, inner: ChunkEvent::Generated });

        true

    }

    /// Generate all chunks in the given inclusive range of chunk coordinates.
    pub fn generate_chunks_in(&mut self, min_cx: i32, min_cz: i32, max_cx: i32, max_cz: i32) -> usize {
        ChunkRange::new(min_cx, min_cz, max_cx, max_cz)
            .filter(|&(cx, cz)| self.generate_chunk(cx, cz))
            .count()
    }

    /// Unload every chunk that is farther than the given radius (in chunks) from the
    /// center chunk. Unloaded chunks are returned with their block entities and dirty
    /// flag so that the caller can flush them. Frontier positions in these chunks are
    /// discarded, pending writes are kept.
    pub fn unload_far_chunks(&mut self, center_cx: i32, center_cz: i32, radius: i32) -> Vec<((i32, i32), Box<Chunk>)> {

        let far = self.chunks.keys()
            .copied()
            .filter(|&(cx, cz)| (cx - center_cx).abs() > radius || (cz - center_cz).abs() > radius)
            .collect::<Vec<_>>();

        let mut unloaded = Vec::with_capacity(far.len());
        for (cx, cz) in far {
            if let Some(chunk) = self.chunks.remove(&(cx, cz)) {
                self.push_event(Event::Chunk { cx, cz, inner: ChunkEvent::Unloaded });
                unloaded.push(((cx, cz), chunk));
            }
        }

        if !unloaded.is_empty() {
            let chunks = &self.chunks;
            let loaded = |pos: IVec3| calc_chunk_pos(pos).is_some_and(|key| chunks.contains_key(&key));
            self.light_frontier.retain(loaded);
            self.light_removals.retain(loaded);
            self.fluid_frontier.retain(loaded);
            self.redstone_frontier.retain(loaded);
            debug!("unloaded {} chunks", unloaded.len());
        }

        unloaded

    }

    /// Seed every frontier with the relevant blocks of the given chunk.
    fn seed_frontiers(&mut self, cx: i32, cz: i32) {

        let Some(chunk) = self.chunks.get(&(cx, cz)) else { return };
        let origin = IVec3::new(cx * 16, 0, cz * 16);

        for index in 0..CHUNK_SIZE {
            let id = chunk.blocks()[index];
            if id == block::AIR {
                continue;
            }
            let props = self.registry.get(id);
            let pos = origin + calc_local_pos(index);
            if props.light_emission > 0 {
                self.light_frontier.insert(pos);
            }
            if props.liquid {
                self.fluid_frontier.insert(pos);
            }
            if props.redstone.is_some() {
                self.redstone_frontier.insert(pos);
            }
        }

        trace!("seeded frontiers, light: {}, fluid: {}, redstone: {}",
            self.light_frontier.len(), self.fluid_frontier.len(), self.redstone_frontier.len());

    }

    /// Seed the frontiers along the borders between the given chunk and its loaded
    /// neighbors. Light, fluids and power stopped at the edge of a neighbor while this
    /// chunk was not generated can then cross it.
    fn seed_borders(&mut self, cx: i32, cz: i32) {

        let origin = IVec3::new(cx * 16, 0, cz * 16);
        let last = CHUNK_WIDTH as i32 - 1;

        for face in Face::HORIZONTAL {

            let delta = face.delta();
            if !self.chunks.contains_key(&(cx + delta.x, cz + delta.z)) {
                continue;
            }

            for i in 0..CHUNK_WIDTH as i32 {

                let edge = origin + match face {
                    Face::NegX => IVec3::new(0, 0, i),
                    Face::PosX => IVec3::new(last, 0, i),
                    Face::NegZ => IVec3::new(i, 0, 0),
                    _ => IVec3::new(i, 0, last),
                };

                for y in 0..CHUNK_HEIGHT as i32 {

                    let inner = edge + IVec3::new(0, y, 0);

                    // Light is pulled, so the inner cell takes it from the neighbor.
                    if self.get_light(inner + delta) > 1 && !self.registry.is_opaque(self.get_block(inner)) {
                        self.light_frontier.insert(inner);
                    }

                    // Wires can be fed through a conductive block, two cells away.
                    for dist in 1..=2 {
                        let outer = inner + delta * dist;
                        let Some((id, _)) = self.get_block_and_metadata(outer) else { continue };
                        let props = self.registry.get(id);
                        if dist == 1 && props.liquid {
                            self.fluid_frontier.insert(outer);
                        }
                        if props.redstone.is_some() {
                            self.redstone_frontier.insert(outer);
                        }
                    }

                }

            }

        }

    }

    /// Get the total number of pending writes for chunks that are not yet generated.
    pub fn get_pending_writes_count(&self) -> usize {
        self.pending_writes.values().map(Vec::len).sum()
    }

    /// Return true if some writes are pending for the given chunk.
    pub fn has_pending_writes(&self, cx: i32, cz: i32) -> bool {
        self.pending_writes.contains_key(&(cx, cz))
    }

    // =================== //
    //        BLOCKS       //
    // =================== //

    /// Get block at given position in the world, air if the chunk is not generated.
    #[inline]
    pub fn get_block(&self, pos: IVec3) -> u8 {
        self.get_block_and_metadata(pos).map(|(id, _)| id).unwrap_or(block::AIR)
    }

    /// Get block and metadata at given position in the world, if the chunk is not
    /// generated, none is returned.
    #[inline]
    pub fn get_block_and_metadata(&self, pos: IVec3) -> Option<(u8, u8)> {
        let (cx, cz) = calc_chunk_pos(pos)?;
        let chunk = self.chunks.get(&(cx, cz))?;
        Some(chunk.get_block(pos))
    }

    /// Return true if the block at the position has the given id, false if unloaded.
    #[inline]
    pub fn is_block(&self, pos: IVec3, id: u8) -> bool {
        matches!(self.get_block_and_metadata(pos), Some((block_id, _)) if block_id == id)
    }

    /// Return true if the block at the position stops light, false if unloaded.
    #[inline]
    pub fn is_block_opaque(&self, pos: IVec3) -> bool {
        self.get_block_and_metadata(pos).is_some_and(|(id, _)| self.registry.is_opaque(id))
    }

    /// Get block metadata at given position in the world, 0 if the chunk is not
    /// generated.
    #[inline]
    pub fn get_metadata(&self, pos: IVec3) -> u8 {
        self.get_block_and_metadata(pos).map(|(_, metadata)| metadata).unwrap_or(0)
    }

    /// Get the light level at given position, 0 if the chunk is not generated.
    #[inline]
    pub fn get_light(&self, pos: IVec3) -> u8 {
        let Some((cx, cz)) = calc_chunk_pos(pos) else { return 0 };
        self.chunks.get(&(cx, cz)).map(|chunk| chunk.get_light(pos)).unwrap_or(0)
    }

    /// Get the Y coordinate of the highest non-air block in the given column, none if
    /// the column is empty or its chunk is not generated.
    pub fn get_highest_block_y(&self, x: i32, z: i32) -> Option<i32> {
        let pos = IVec3::new(x, 0, z);
        let (cx, cz) = calc_chunk_pos(pos)?;
        self.chunks.get(&(cx, cz))?.get_highest_block_y(pos)
    }

    /// Set block and metadata at given position in the world. If the chunk is not yet
    /// generated the write is kept pending until the chunk gets generated and false is
    /// returned, writes with an invalid Y coordinate are ignored and also return false.
    ///
    /// Any block entity at the position is removed, and a default block entity is
    /// created if the new block requires one. Positions around are enqueued in each
    /// engine's frontier for which the change is relevant.
    pub fn set_block(&mut self, pos: IVec3, id: u8, metadata: u8) -> bool {

        let Some((cx, cz)) = calc_chunk_pos(pos) else {
            trace!("ignored write at invalid position {pos}");
            return false;
        };

        if !self.chunks.contains_key(&(cx, cz)) {
            self.pending_writes.entry((cx, cz))
                .or_default()
                .push(PendingWrite { pos, id, metadata });
            return false;
        }

        self.set_block_inner(pos, id, metadata).is_some()

    }

    /// Set the metadata of the block at the given position, returning false if the chunk
    /// is not generated. The block's engine is notified like with [`World::set_block`].
    pub fn set_metadata(&mut self, pos: IVec3, metadata: u8) -> bool {
        self.set_metadata_inner(pos, metadata).is_some()
    }

    /// Internal function to set a block in a generated chunk, returning the previous
    /// block and metadata. None is returned if the chunk is not generated.
    pub(crate) fn set_block_inner(&mut self, pos: IVec3, id: u8, metadata: u8) -> Option<(u8, u8)> {

        let (cx, cz) = calc_chunk_pos(pos)?;
        let entity_kind = self.registry.get_entity_kind(id);
        let chunk = self.get_chunk_mut(cx, cz)?;

        let (prev_id, prev_metadata) = chunk.get_block(pos);
        let prev_entity = chunk.remove_block_entity(pos);
        chunk.set_block(pos, id, metadata);
        if let Some(kind) = entity_kind {
            chunk.set_block_entity(pos, BlockEntity::new(kind));
        }

        if prev_entity.is_some() {
            self.push_event(Event::BlockEntity { pos, inner: BlockEntityEvent::Remove });
        }

        self.push_event(Event::Block {
            pos,
            inner: BlockEvent::Set {
                id,
                metadata,
                prev_id,
                prev_metadata,
            }
        });

        if entity_kind.is_some() {
            self.push_event(Event::BlockEntity { pos, inner: BlockEntityEvent::Set });
        }

        if let Some(writes) = &mut self.drain_writes {
            writes.insert(pos);
        }

        self.schedule_block_change(pos, prev_id, id);
        Some((prev_id, prev_metadata))

    }

    /// Internal function to set the metadata of a block in a generated chunk, returning
    /// the previous metadata.
    pub(crate) fn set_metadata_inner(&mut self, pos: IVec3, metadata: u8) -> Option<u8> {

        let (cx, cz) = calc_chunk_pos(pos)?;
        let chunk = self.get_chunk_mut(cx, cz)?;

        let (id, prev_metadata) = chunk.get_block(pos);
        chunk.set_metadata(pos, metadata);

        self.push_event(Event::Block {
            pos,
            inner: BlockEvent::Metadata {
                metadata,
                prev_metadata,
            }
        });

        if let Some(writes) = &mut self.drain_writes {
            writes.insert(pos);
        }

        self.schedule_block_change(pos, id, id);
        Some(prev_metadata)

    }

    /// Enqueue the position, and positions around, in frontiers of engines that are
    /// affected by a change from the previous block to the new one.
    fn schedule_block_change(&mut self, pos: IVec3, prev_id: u8, id: u8) {

        let prev = *self.registry.get(prev_id);
        let new = *self.registry.get(id);

        let prev_opaque = prev.solid && prev.opaque;
        let new_opaque = new.solid && new.opaque;

        if prev.light_emission != new.light_emission || prev_opaque != new_opaque {
            // An opaque block only needs to remove the light passing through it.
            if new.light_emission < prev.light_emission || (new_opaque && !prev_opaque && self.get_light(pos) > 0) {
                self.light_removals.insert(pos);
            }
            self.light_frontier.insert_around(pos);
        }

        if prev.liquid || new.liquid || prev.solid != new.solid {
            self.fluid_frontier.insert_around(pos);
        }

        if prev.redstone.is_some() || new.redstone.is_some()
        || prev.conductive != new.conductive || prev.solid != new.solid {
            // A component may be mounted on a neighbor block, so we go two blocks away.
            self.redstone_frontier.insert_diamond(pos, 2);
        }

    }

    // =================== //
    //    BLOCK ENTITIES   //
    // =================== //

    /// Get a block entity at the given position, none if absent or not generated.
    pub fn get_block_entity(&self, pos: IVec3) -> Option<&BlockEntity> {
        let (cx, cz) = calc_chunk_pos(pos)?;
        self.chunks.get(&(cx, cz))?.get_block_entity(pos)
    }

    /// Get a mutable block entity at the given position.
    pub fn get_block_entity_mut(&mut self, pos: IVec3) -> Option<&mut BlockEntity> {
        let (cx, cz) = calc_chunk_pos(pos)?;
        self.get_chunk_mut(cx, cz)?.get_block_entity_mut(pos)
    }

    /// Set the block entity at the given position, this never alters the block. The
    /// block entity is rejected, and false returned, if the chunk is not generated or
    /// if the block at this position doesn't accept this kind of block entity.
    pub fn set_block_entity(&mut self, pos: IVec3, block_entity: BlockEntity) -> bool {

        let Some((cx, cz)) = calc_chunk_pos(pos) else { return false };
        let registry = Arc::clone(&self.registry);
        let Some(chunk) = self.get_chunk_mut(cx, cz) else { return false };

        let (id, _) = chunk.get_block(pos);
        if registry.get_entity_kind(id) != Some(block_entity.kind()) {
            trace!("rejected block entity {:?} for block {}", block_entity.kind(), block::name(id));
            return false;
        }

        chunk.set_block_entity(pos, block_entity);
        self.push_event(Event::BlockEntity { pos, inner: BlockEntityEvent::Set });
        true

    }

    /// Remove the block entity at the given position, this never alters the block.
    pub fn remove_block_entity(&mut self, pos: IVec3) -> Option<BlockEntity> {
        let (cx, cz) = calc_chunk_pos(pos)?;
        let prev = self.get_chunk_mut(cx, cz)?.remove_block_entity(pos)?;
        self.push_event(Event::BlockEntity { pos, inner: BlockEntityEvent::Remove });
        Some(prev)
    }

    /// Iterate over all block entities of all generated chunks.
    pub fn iter_block_entities(&self) -> impl Iterator<Item = (IVec3, &BlockEntity)> + '_ {
        self.chunks.values().flat_map(|chunk| chunk.iter_block_entities())
    }

    // =================== //
    //        TICKING      //
    // =================== //

    /// Tick the world, this drains each engine's frontier in order fluid, redstone and
    /// light.
    #[instrument(skip_all)]
    pub fn tick(&mut self) {
        self.time += 1;
        self.tick_fluid();
        self.tick_redstone();
        self.tick_light();
    }

    /// Return true if no engine has remaining work.
    pub fn is_quiescent(&self) -> bool {
        self.fluid_frontier.is_empty()
            && self.redstone_frontier.is_empty()
            && self.light_frontier.is_empty()
            && self.light_removals.is_empty()
    }

    /// Tick the world until all engines are quiescent, or until the given number of
    /// ticks. Returns the number of ticks that run.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && !self.is_quiescent() {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Start recording positions written by an engine while it drains its frontier.
    fn begin_drain(&mut self) {
        self.drain_writes = Some(HashSet::new());
    }

    /// Return true if the position has been written since the drain started.
    fn is_drain_written(&self, pos: IVec3) -> bool {
        self.drain_writes.as_ref().is_some_and(|writes| writes.contains(&pos))
    }

    fn end_drain(&mut self) {
        self.drain_writes = None;
    }

    /// Get the number of positions waiting in the fluid, redstone and light frontiers.
    pub fn get_frontier_lens(&self) -> (usize, usize, usize) {
        (self.fluid_frontier.len(), self.redstone_frontier.len(), self.light_frontier.len())
    }

}


/// Types of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// The overworld dimension.
    Overworld,
    /// The nether dimension, lava flows faster there.
    Nether,
}

/// A write aimed at a chunk that is not yet generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    pub pos: IVec3,
    pub id: u8,
    pub metadata: u8,
}

/// An event that happened in the world.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An event with a block.
    Block {
        /// The position of the block.
        pos: IVec3,
        /// Inner block event.
        inner: BlockEvent,
    },
    /// The light level of a block has changed.
    Light {
        pos: IVec3,
        level: u8,
    },
    /// An event with a block entity.
    BlockEntity {
        /// The block entity position.
        pos: IVec3,
        /// Inner block entity event.
        inner: BlockEntityEvent,
    },
    /// An event with a whole chunk.
    Chunk {
        cx: i32,
        cz: i32,
        inner: ChunkEvent,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockEvent {
    /// A block has been changed in the world.
    Set {
        /// The new block id.
        id: u8,
        /// The new block metadata.
        metadata: u8,
        /// Previous block id.
        prev_id: u8,
        /// Previous block metadata.
        prev_metadata: u8,
    },
    /// Only the metadata of a block has been changed.
    Metadata {
        metadata: u8,
        prev_metadata: u8,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockEntityEvent {
    /// The block entity has been set at its position.
    Set,
    /// The block entity has been removed at its position.
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkEvent {
    /// The chunk has been generated.
    Generated,
    /// The chunk has been loaded from a save.
    Loaded,
    /// The chunk has been unloaded.
    Unloaded,
}


/// Internal iterator of chunk coordinates, both start and end are inclusive.
struct ChunkRange {
    cx: i32,
    cz: i32,
    start_cx: i32,
    end_cx: i32,
    end_cz: i32,
}

impl ChunkRange {

    // Construct a chunk range iterator, note that both start and end are included in the
    // range.
    #[inline]
    fn new(start_cx: i32, start_cz: i32, end_cx: i32, end_cz: i32) -> Self {
        Self {
            cx: start_cx,
            cz: start_cz,
            start_cx,
            end_cx,
            end_cz,
        }
    }

}

impl FusedIterator for ChunkRange {}
impl Iterator for ChunkRange {

    type Item = (i32, i32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {

        if self.cx > self.end_cx || self.cz > self.end_cz {
            return None;
        }

        let ret = (self.cx, self.cz);

        self.cx += 1;
        if self.cx > self.end_cx {
            self.cx = self.start_cx;
            self.cz += 1;
        }

        Some(ret)

    }

}




#[cfg(test)]
mod tests {

    use super::*;
    use super::test_util::flat_world;

    use crate::block_entity::{BlockEntityKind, CropBlockEntity};
    use crate::block_entity::sign::SignBlockEntity;

    #[test]
    fn chunk_range() {

        assert_eq!(ChunkRange::new(0, 0, 0, 0).collect::<Vec<_>>(), [(0, 0)]);
        assert_eq!(ChunkRange::new(0, 0, 1, 0).collect::<Vec<_>>(), [(0, 0), (1, 0)]);
        assert_eq!(ChunkRange::new(0, 0, 1, 1).collect::<Vec<_>>(), [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(ChunkRange::new(0, 0, -1, 0).collect::<Vec<_>>(), []);
        assert_eq!(ChunkRange::new(0, 0, 0, -1).collect::<Vec<_>>(), []);
        assert_eq!(ChunkRange::new(0, 0, -1, -1).collect::<Vec<_>>(), []);

    }

    #[test]
    fn world_range() {
        let mut world = World::new(Arc::new(BlockRegistry::standard()), WorldConfig {
            terrain: TerrainKind::Flat,
            ..Default::default()
        });
        let max = *CHUNK_COORD_RANGE.end();
        let min = *CHUNK_COORD_RANGE.start();
        assert!(!world.generate_chunk(max + 1, 0));
        assert!(!world.generate_chunk(0, min - 1));
        assert!(world.generate_chunk(max, min));
        assert!(world.set_block(IVec3::new(max * 16 + 15, 10, min * 16), block::STONE, 0));
        assert_eq!(world.get_block(IVec3::new(max * 16 + 15, 10, min * 16)), block::STONE);
    }

    #[test]
    fn unloaded_reads() {
        let world = World::new(Arc::new(BlockRegistry::standard()), WorldConfig::default());
        let pos = IVec3::new(100, 64, -100);
        assert_eq!(world.get_block(pos), block::AIR);
        assert_eq!(world.get_block_and_metadata(pos), None);
        assert_eq!(world.get_metadata(pos), 0);
        assert_eq!(world.get_light(pos), 0);
        assert_eq!(world.get_block_entity(pos), None);
        assert_eq!(world.get_highest_block_y(100, -100), None);
        assert_eq!(world.get_block(IVec3::new(0, -5, 0)), block::AIR);
    }

    #[test]
    fn set_and_get() {

        let mut world = flat_world();
        let pos = IVec3::new(3, 20, -4);

        assert!(world.set_block(pos, block::WOOL, 5));
        assert_eq!(world.get_block(pos), block::WOOL);
        assert_eq!(world.get_metadata(pos), 5);
        assert!(world.set_metadata(pos, 9));
        assert_eq!(world.get_block_and_metadata(pos), Some((block::WOOL, 9)));
        assert_eq!(world.get_highest_block_y(3, -4), Some(20));
        assert_eq!(world.get_highest_block_y(7, 7), Some(4));

        // Invalid Y is ignored and never queued.
        assert!(!world.set_block(IVec3::new(0, 128, 0), block::STONE, 0));
        assert_eq!(world.get_pending_writes_count(), 0);

    }

    #[test]
    fn pending_writes() {

        let mut world = flat_world();
        let pos = IVec3::new(40, 30, 41);
        let other = IVec3::new(42, 31, 40);

        assert!(!world.set_block(pos, block::GLASS, 0));
        assert!(!world.set_block(other, block::STONE, 0));
        assert!(!world.set_block(pos, block::BRICK, 0));
        assert_eq!(world.get_block(pos), block::AIR);
        assert!(world.has_pending_writes(2, 2));
        assert_eq!(world.get_pending_writes_count(), 3);

        assert!(world.generate_chunk(2, 2));
        assert!(!world.has_pending_writes(2, 2));
        assert_eq!(world.get_pending_writes_count(), 0);

        // Applied in insertion order, so the last write wins.
        assert_eq!(world.get_block(pos), block::BRICK);
        assert_eq!(world.get_block(other), block::STONE);

        // Generating again is a no-op.
        assert!(!world.generate_chunk(2, 2));
        assert_eq!(world.get_block(pos), block::BRICK);

    }

    #[test]
    fn block_entities_follow_blocks() {

        let mut world = flat_world();
        let pos = IVec3::new(1, 5, 1);

        // A crop block gets its default record.
        world.set_block(pos, block::WHEAT, 0);
        assert_eq!(world.get_block_entity(pos).map(BlockEntity::kind), Some(BlockEntityKind::Crop));

        // Wrong kind is rejected, matching kind is accepted.
        assert!(!world.set_block_entity(pos, BlockEntity::Sign(SignBlockEntity::default())));
        assert!(world.set_block_entity(pos, BlockEntity::Crop(CropBlockEntity { stage: 7 })));
        assert_eq!(world.get_block_entity(pos), Some(&BlockEntity::Crop(CropBlockEntity { stage: 7 })));

        // Replacing the block removes the record.
        world.set_block(pos, block::AIR, 0);
        assert_eq!(world.get_block_entity(pos), None);
        assert!(!world.set_block_entity(pos, BlockEntity::Crop(CropBlockEntity::default())));

        // Removing the record doesn't alter the block.
        world.set_block(pos, block::JUKEBOX, 0);
        assert!(world.remove_block_entity(pos).is_some());
        assert_eq!(world.get_block(pos), block::JUKEBOX);

    }

    #[test]
    fn events_and_observers() {

        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counter(Arc<AtomicUsize>);
        impl WorldObserver for Counter {
            fn notify(&mut self, event: &Event) {
                if let Event::Block { inner: BlockEvent::Set { .. }, .. } = event {
                    self.0.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        let mut world = flat_world();
        let count = Arc::new(AtomicUsize::new(0));
        world.add_observer(Counter(Arc::clone(&count)));
        world.swap_events(Some(Vec::new()));

        let pos = IVec3::new(0, 10, 0);
        world.set_block(pos, block::STONE, 0);

        let events = world.swap_events(None).unwrap();
        assert_eq!(events, [Event::Block {
            pos,
            inner: BlockEvent::Set { id: block::STONE, metadata: 0, prev_id: block::AIR, prev_metadata: 0 },
        }]);
        assert_eq!(count.load(Ordering::Relaxed), 1);

    }

    #[test]
    fn unload_far() {

        let mut world = flat_world();
        world.set_block(IVec3::new(20, 10, 0), block::WATER, 8);

        let unloaded = world.unload_far_chunks(-1, -1, 1);
        let mut coords = unloaded.iter().map(|(pos, _)| *pos).collect::<Vec<_>>();
        coords.sort();
        assert_eq!(coords, [(-1, 1), (0, 1), (1, -1), (1, 0), (1, 1)]);
        assert!(unloaded.iter().all(|(_, chunk)| chunk.is_dirty()));
        assert!(!world.contains_chunk(1, 0));

        // The water was in an unloaded chunk, nothing is left to do.
        world.settle(100);
        assert!(world.is_quiescent());

    }


    #[test]
    fn light_and_fluid_cross_into_new_chunk() {

        let mut world = flat_world();
        world.set_block(IVec3::new(31, 64, 0), block::TORCH, 0);
        world.set_block(IVec3::new(31, 5, 8), block::WATER, 0);
        world.settle(100);
        assert!(!world.contains_chunk(2, 0));

        assert!(world.generate_chunk(2, 0));
        world.settle(100);
        assert!(world.is_quiescent());

        assert_eq!(world.get_light(IVec3::new(32, 64, 0)), 14);
        assert_eq!(world.get_light(IVec3::new(33, 64, 0)), 13);
        assert_eq!(world.get_block_and_metadata(IVec3::new(32, 5, 8)), Some((block::WATER, 7)));
        assert_eq!(world.get_block_and_metadata(IVec3::new(33, 5, 8)), Some((block::WATER, 6)));

    }

}
