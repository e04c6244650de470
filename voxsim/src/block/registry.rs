//! Immutable table of block properties, indexed by block id. The registry is built once
//! and shared by reference with the world and its engines.

use crate::block_entity::BlockEntityKind;
use crate::block;


/// The role of a block in redstone circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedstoneKind {
    /// Redstone wire, its metadata is its power level.
    Wire,
    /// A redstone torch, lit or not, its metadata is the face it's mounted to.
    Torch { lit: bool },
    /// A redstone lamp, lit or not.
    Lamp { lit: bool },
    /// A lever, its metadata is the face it's mounted to and an active bit.
    Lever,
}

/// Properties of a single block type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockProps {
    /// False for ids that are not registered, such blocks are treated as air when loaded.
    pub known: bool,
    /// Solid blocks stop fluids and cannot be replaced by them.
    pub solid: bool,
    /// Opaque blocks stop light, only relevant if the block is also solid.
    pub opaque: bool,
    /// Liquid blocks are handled by the fluid engine.
    pub liquid: bool,
    /// Breaking hardness, unused by the engines but exposed to gameplay code.
    pub hardness: f32,
    /// Light level emitted by this block, from 0 to 15.
    pub light_emission: u8,
    /// Conductive blocks can be powered and relay strong power to wires.
    pub conductive: bool,
    /// Role of the block in redstone circuits, if any.
    pub redstone: Option<RedstoneKind>,
    /// Kind of block entity this block requires, if any.
    pub entity: Option<BlockEntityKind>,
}

impl BlockProps {

    /// Properties of unregistered ids, which are also the properties of air.
    pub const UNKNOWN: Self = Self {
        known: false,
        solid: false,
        opaque: false,
        liquid: false,
        hardness: 0.0,
        light_emission: 0,
        conductive: false,
        redstone: None,
        entity: None,
    };

    /// A full opaque and conductive cube.
    pub const fn cube(hardness: f32) -> Self {
        Self { known: true, solid: true, opaque: true, conductive: true, hardness, ..Self::UNKNOWN }
    }

    /// A solid block that lets light through, such as glass or leaves.
    pub const fn transparent(hardness: f32) -> Self {
        Self { known: true, solid: true, hardness, ..Self::UNKNOWN }
    }

    /// A non-solid block that fluids can wash away.
    pub const fn passable(hardness: f32) -> Self {
        Self { known: true, hardness, ..Self::UNKNOWN }
    }

    /// A liquid block.
    pub const fn liquid() -> Self {
        Self { known: true, liquid: true, hardness: 100.0, ..Self::UNKNOWN }
    }

    pub const fn with_emission(self, light_emission: u8) -> Self {
        Self { light_emission, ..self }
    }

    pub const fn with_redstone(self, kind: RedstoneKind) -> Self {
        Self { redstone: Some(kind), ..self }
    }

    pub const fn with_entity(self, kind: BlockEntityKind) -> Self {
        Self { entity: Some(kind), ..self }
    }

}


/// The block registry, mapping every possible block id to its properties.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    props: Box<[BlockProps; 256]>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl BlockRegistry {

    /// Create a registry where only air is registered.
    pub fn new() -> Self {
        let mut props = Box::new([BlockProps::UNKNOWN; 256]);
        props[block::AIR as usize] = BlockProps { known: true, ..BlockProps::UNKNOWN };
        Self { props }
    }

    /// Create the registry of all blocks defined in the [`block`] module.
    pub fn standard() -> Self {

        use BlockEntityKind as E;
        use RedstoneKind as R;

        let mut reg = Self::new();

        reg.register(block::STONE, BlockProps::cube(1.5));
        reg.register(block::GRASS, BlockProps::cube(0.6));
        reg.register(block::DIRT, BlockProps::cube(0.5));
        reg.register(block::COBBLESTONE, BlockProps::cube(2.0));
        reg.register(block::PLANKS, BlockProps::cube(2.0));
        reg.register(block::BEDROCK, BlockProps::cube(-1.0));
        reg.register(block::WATER, BlockProps::liquid());
        reg.register(block::LAVA, BlockProps::liquid().with_emission(15));
        reg.register(block::SAND, BlockProps::cube(0.5));
        reg.register(block::GRAVEL, BlockProps::cube(0.6));
        reg.register(block::GOLD_ORE, BlockProps::cube(3.0));
        reg.register(block::IRON_ORE, BlockProps::cube(3.0));
        reg.register(block::COAL_ORE, BlockProps::cube(3.0));
        reg.register(block::DIAMOND_ORE, BlockProps::cube(3.0));
        reg.register(block::LOG, BlockProps::cube(2.0));
        reg.register(block::LEAVES, BlockProps::transparent(0.2));
        reg.register(block::SPRUCE_LOG, BlockProps::cube(2.0));
        reg.register(block::SPRUCE_LEAVES, BlockProps::transparent(0.2));
        reg.register(block::GLASS, BlockProps::transparent(0.3));
        reg.register(block::SANDSTONE, BlockProps::cube(0.8));
        reg.register(block::CACTUS, BlockProps::transparent(0.4));
        reg.register(block::SNOW, BlockProps::cube(0.2));
        reg.register(block::ICE, BlockProps::transparent(0.5));
        reg.register(block::OBSIDIAN, BlockProps::cube(10.0));
        reg.register(block::BRICK, BlockProps::cube(2.0));
        reg.register(block::WOOL, BlockProps::cube(0.8));
        reg.register(block::TALL_GRASS, BlockProps::passable(0.0));
        reg.register(block::TORCH, BlockProps::passable(0.0).with_emission(15));
        reg.register(block::REDSTONE_WIRE, BlockProps::passable(0.0).with_redstone(R::Wire));
        reg.register(block::REDSTONE_TORCH, BlockProps::passable(0.0).with_emission(7).with_redstone(R::Torch { lit: true }));
        reg.register(block::REDSTONE_TORCH_OFF, BlockProps::passable(0.0).with_redstone(R::Torch { lit: false }));
        reg.register(block::REDSTONE_LAMP, BlockProps::cube(0.3).with_redstone(R::Lamp { lit: false }));
        reg.register(block::REDSTONE_LAMP_LIT, BlockProps::cube(0.3).with_emission(15).with_redstone(R::Lamp { lit: true }));
        reg.register(block::LEVER, BlockProps::passable(0.5).with_redstone(R::Lever));
        reg.register(block::CHEST, BlockProps::transparent(2.5).with_entity(E::Chest));
        reg.register(block::SIGN, BlockProps::passable(1.0).with_entity(E::Sign));
        reg.register(block::JUKEBOX, BlockProps::cube(2.0).with_entity(E::Jukebox));
        reg.register(block::BREWING_STAND, BlockProps::transparent(0.5).with_emission(1).with_entity(E::BrewingStand));
        reg.register(block::FARMLAND, BlockProps::cube(0.6));
        reg.register(block::WHEAT, BlockProps::passable(0.0).with_entity(E::Crop));
        reg.register(block::CARROTS, BlockProps::passable(0.0).with_entity(E::Crop));
        reg.register(block::POTATOES, BlockProps::passable(0.0).with_entity(E::Crop));
        reg.register(block::NETHERRACK, BlockProps::cube(0.4));
        reg.register(block::SOUL_SAND, BlockProps::cube(0.5));
        reg.register(block::GLOWSTONE, BlockProps::transparent(0.3).with_emission(15));
        reg.register(block::QUARTZ_ORE, BlockProps::cube(3.0));

        reg

    }

    /// Register or replace the properties of the given block id.
    pub fn register(&mut self, id: u8, props: BlockProps) {
        self.props[id as usize] = BlockProps { known: true, ..props };
    }

    /// Get the properties of a block, unknown ids have the properties of air.
    #[inline]
    pub fn get(&self, id: u8) -> &BlockProps {
        &self.props[id as usize]
    }

    #[inline]
    pub fn is_known(&self, id: u8) -> bool {
        self.props[id as usize].known
    }

    #[inline]
    pub fn is_solid(&self, id: u8) -> bool {
        self.props[id as usize].solid
    }

    /// Return true if the block stops light, it must be both solid and opaque.
    #[inline]
    pub fn is_opaque(&self, id: u8) -> bool {
        let props = &self.props[id as usize];
        props.solid && props.opaque
    }

    #[inline]
    pub fn is_liquid(&self, id: u8) -> bool {
        self.props[id as usize].liquid
    }

    #[inline]
    pub fn is_conductive(&self, id: u8) -> bool {
        self.props[id as usize].conductive
    }

    #[inline]
    pub fn get_light_emission(&self, id: u8) -> u8 {
        self.props[id as usize].light_emission
    }

    #[inline]
    pub fn get_redstone(&self, id: u8) -> Option<RedstoneKind> {
        self.props[id as usize].redstone
    }

    #[inline]
    pub fn get_entity_kind(&self, id: u8) -> Option<BlockEntityKind> {
        self.props[id as usize].entity
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn standard_registry() {

        let reg = BlockRegistry::standard();

        assert!(reg.is_known(block::AIR));
        assert!(!reg.is_known(200));
        assert!(!reg.is_solid(200));

        assert!(reg.is_opaque(block::STONE));
        assert!(!reg.is_opaque(block::GLASS));
        assert!(reg.is_solid(block::GLASS));
        assert!(!reg.is_solid(block::TORCH));
        assert!(reg.is_liquid(block::LAVA));
        assert_eq!(reg.get_light_emission(block::TORCH), 15);
        assert_eq!(reg.get_redstone(block::REDSTONE_LAMP_LIT), Some(RedstoneKind::Lamp { lit: true }));
        assert_eq!(reg.get_entity_kind(block::WHEAT), Some(BlockEntityKind::Crop));

        // Every named block is registered.
        for id in 0..=255u8 {
            assert_eq!(reg.is_known(id), !block::name(id).is_empty(), "block {id}");
        }

    }

}
