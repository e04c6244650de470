//! Block enumeration and functions to query their metadata state.

// Block properties.
pub mod registry;

// Block specific functions for their metadata.
pub mod fluid;
pub mod torch;
pub mod lever;
pub mod wire;

pub use registry::{BlockRegistry, BlockProps, RedstoneKind};


/// Internal macro to easily define blocks registry.
macro_rules! blocks {
    (
        $($ident:ident / $id:literal : $name:literal),* $(,)?
    ) => {

        static NAMES: [&'static str; 256] = {
            let mut arr = [""; 256];
            $(arr[$id as usize] = $name;)*
            arr
        };

        $(pub const $ident: u8 = $id;)*

    };
}

blocks! {
    AIR/0:                  "air",
    STONE/1:                "stone",
    GRASS/2:                "grass",
    DIRT/3:                 "dirt",
    COBBLESTONE/4:          "cobblestone",
    PLANKS/5:               "planks",
    BEDROCK/6:              "bedrock",
    WATER/7:                "water",
    LAVA/8:                 "lava",
    SAND/9:                 "sand",
    GRAVEL/10:              "gravel",
    GOLD_ORE/11:            "gold_ore",
    IRON_ORE/12:            "iron_ore",
    COAL_ORE/13:            "coal_ore",
    DIAMOND_ORE/14:         "diamond_ore",
    LOG/15:                 "log",
    LEAVES/16:              "leaves",
    SPRUCE_LOG/17:          "spruce_log",
    SPRUCE_LEAVES/18:       "spruce_leaves",
    GLASS/19:               "glass",
    SANDSTONE/20:           "sandstone",
    CACTUS/21:              "cactus",
    SNOW/22:                "snow",
    ICE/23:                 "ice",
    OBSIDIAN/24:            "obsidian",
    BRICK/25:               "brick",
    WOOL/26:                "wool",
    TALL_GRASS/27:          "tall_grass",
    TORCH/28:               "torch",
    REDSTONE_WIRE/29:       "redstone_wire",
    REDSTONE_TORCH/30:      "redstone_torch",
    REDSTONE_TORCH_OFF/31:  "redstone_torch_off",
    REDSTONE_LAMP/32:       "redstone_lamp",
    REDSTONE_LAMP_LIT/33:   "redstone_lamp_lit",
    LEVER/34:               "lever",
    CHEST/35:               "chest",
    SIGN/36:                "sign",
    JUKEBOX/37:             "jukebox",
    BREWING_STAND/38:       "brewing_stand",
    FARMLAND/39:            "farmland",
    WHEAT/40:               "wheat",
    CARROTS/41:             "carrots",
    POTATOES/42:            "potatoes",
    NETHERRACK/43:          "netherrack",
    SOUL_SAND/44:           "soul_sand",
    GLOWSTONE/45:           "glowstone",
    QUARTZ_ORE/46:          "quartz_ore",
}

/// Find a block name from its id, empty for ids that are not defined.
#[inline]
pub const fn name(id: u8) -> &'static str {
    NAMES[id as usize]
}

/// Find a block id from its name.
pub fn from_name(name: &str) -> Option<u8> {
    if name.is_empty() {
        return None;
    }
    NAMES.iter()
        .position(|&n| n == name)
        .map(|n| n as u8)
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn names() {
        assert_eq!(name(REDSTONE_LAMP_LIT), "redstone_lamp_lit");
        assert_eq!(from_name("glowstone"), Some(GLOWSTONE));
        assert_eq!(from_name(""), None);
        assert_eq!(from_name("unobtainium"), None);
    }

}
