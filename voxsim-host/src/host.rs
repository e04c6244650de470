//! The host running a single world at a fixed tick rate.

use std::time::{Duration, Instant};
use std::sync::Arc;
use std::io;

use crossbeam_channel::{Receiver, unbounded};
use tracing::{debug, info, warn, error};

use voxsim::block::BlockRegistry;
use voxsim::save::DirStore;
use voxsim::world::{World, Event, ChunkEvent};
use voxsim::world::observer::ChannelObserver;

use crate::config;


/// Target tick duration. Currently 20 TPS, so 50 ms/tick.
const TICK_DURATION: Duration = Duration::from_millis(50);
/// Interval in ticks between two statistics logs.
const STATS_INTERVAL: u64 = 200;


/// This structure owns the world, its save store and a receiver of the world events
/// used to keep statistics.
pub struct Host {
    world: World,
    store: DirStore,
    slot: String,
    events: Receiver<Event>,
    stats: EventStats,
}

/// Counters of received world events since the last statistics log.
#[derive(Debug, Default)]
struct EventStats {
    blocks: usize,
    lights: usize,
    block_entities: usize,
    chunks: usize,
}

impl Host {

    /// Create the host, its world is empty until [`Self::load_or_generate`].
    pub fn new() -> io::Result<Self> {

        let (sender, events) = unbounded();
        let mut world = World::new(Arc::new(BlockRegistry::standard()), config::world_config());
        world.add_observer(ChannelObserver::new(sender));

        let store = DirStore::open(config::save_dir())?;
        info!("save store in {}", config::save_dir().display());

        Ok(Self {
            world,
            store,
            slot: config::slot().to_string(),
            events,
            stats: EventStats::default(),
        })

    }

    /// Load the world from its save slot, or generate a new one if it fails. Chunks in
    /// the configured radius are then generated if missing.
    pub fn load_or_generate(&mut self) {

        match self.world.load_world(&self.slot, &self.store) {
            Ok(()) => info!("loaded world from slot {}", self.slot),
            Err(e) => warn!("cannot load slot {}, generating a new world: {e}", self.slot),
        }

        let radius = config::radius();
        let start = Instant::now();
        let count = self.world.generate_chunks_in(-radius, -radius, radius, radius);
        info!("generated {count} chunks in {:?}, seed: {}", start.elapsed(), self.world.get_seed());

    }

    /// Save the world in its slot.
    pub fn stop(&mut self) {
        match self.world.save_world(&self.slot, &mut self.store) {
            Ok(size) => info!("saved world in slot {}, {size} bytes", self.slot),
            Err(e) => error!("failed to save world in slot {}: {e}", self.slot),
        }
    }

    /// Run a single tick on the world. This function also waits for this function to
    /// approximately last for 50 ms (20 TPS), there is no sleep of the tick was too
    /// long, in such case a warning is logged.
    pub fn tick_padded(&mut self) {

        let start = Instant::now();
        self.tick();
        let elapsed = start.elapsed();

        if let Some(missing) = TICK_DURATION.checked_sub(elapsed) {
            std::thread::sleep(missing);
        } else {
            warn!("tick too long {:?}, expected {:?}", elapsed, TICK_DURATION);
        }

    }

    /// Run a single tick on the world and consume its events.
    pub fn tick(&mut self) {

        self.world.tick();

        for event in self.events.try_iter() {
            match event {
                Event::Block { .. } => self.stats.blocks += 1,
                Event::Light { .. } => self.stats.lights += 1,
                Event::BlockEntity { .. } => self.stats.block_entities += 1,
                Event::Chunk { inner: ChunkEvent::Generated | ChunkEvent::Loaded, .. } => self.stats.chunks += 1,
                Event::Chunk { inner: ChunkEvent::Unloaded, .. } => {}
            }
        }

        if self.world.get_time() % STATS_INTERVAL == 0 {
            let (fluid, redstone, light) = self.world.get_frontier_lens();
            debug!("time: {}, events: {:?}, frontiers: fluid {fluid}, redstone {redstone}, light {light}",
                self.world.get_time(), self.stats);
            self.stats = EventStats::default();
        }

    }

}
