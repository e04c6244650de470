//! Perlin and octaves noise generators.

use glam::{DVec3, DVec2};

use super::JavaRandom;


/// A 3D/2D Perlin noise generator.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    /// All permutations used by Perlin noise algorithm, the second half mirrors the
    /// first one so that lookups never need to wrap.
    permutations: Box<[u16; 512]>,
    /// Offset applied to all position given to the generator.
    offset: DVec3,
}

impl PerlinNoise {

    /// Create a new perlin noise initialized with the given RNG.
    pub fn new(rand: &mut JavaRandom) -> Self {

        let offset = rand.next_dvec3() * 256.0;
        let mut permutations = Box::new(std::array::from_fn::<u16, 512, _>(|i| {
            if i < 256 { i as u16 } else { 0 }
        }));

        for index in 0usize..256 {
            let swap_index = rand.next_int_bounded(256 - index as i32) as usize + index;
            permutations.swap(index, swap_index);
            permutations[index + 256] = permutations[index];
        }

        Self {
            permutations,
            offset,
        }

    }

    /// Get the noise value at given 3D coordinates, roughly in range -1.0..1.0.
    pub fn gen_3d_point(&self, pos: DVec3) -> f64 {

        let mut pos = pos + self.offset;
        let pos_floor = pos.floor();
        pos -= pos_floor;
        let factor = pos * pos * pos * (pos * (pos * 6.0 - 15.0) + 10.0);

        let pos_int = pos_floor.as_ivec3();
        let x_index = (pos_int.x & 255) as usize;
        let y_index = (pos_int.y & 255) as usize;
        let z_index = (pos_int.z & 255) as usize;

        let perm = &self.permutations;
        let a = perm[x_index] as usize + y_index;
        let a0 = perm[a] as usize + z_index;
        let a1 = perm[a + 1] as usize + z_index;
        let b = perm[x_index + 1] as usize + y_index;
        let b0 = perm[b] as usize + z_index;
        let b1 = perm[b + 1] as usize + z_index;

        let corner = |index: usize, dx: f64, dy: f64, dz: f64| {
            grad(perm[index], pos - DVec3::new(dx, dy, dz))
        };

        let near = lerp(factor.y,
            lerp(factor.x, corner(a0, 0.0, 0.0, 0.0), corner(b0, 1.0, 0.0, 0.0)),
            lerp(factor.x, corner(a1, 0.0, 1.0, 0.0), corner(b1, 1.0, 1.0, 0.0)));

        let far = lerp(factor.y,
            lerp(factor.x, corner(a0 + 1, 0.0, 0.0, 1.0), corner(b0 + 1, 1.0, 0.0, 1.0)),
            lerp(factor.x, corner(a1 + 1, 0.0, 1.0, 1.0), corner(b1 + 1, 1.0, 1.0, 1.0)));

        lerp(factor.z, near, far)

    }

    /// Get the noise value at given 2D coordinates.
    pub fn gen_2d_point(&self, pos: DVec2) -> f64 {
        self.gen_3d_point(pos.extend(0.0))
    }

}

#[inline]
fn lerp(factor: f64, from: f64, to: f64) -> f64 {
    from + factor * (to - from)
}

#[inline]
fn grad(value: u16, pos: DVec3) -> f64 {
    let value = value & 15;
    let a = if value < 8 { pos.x } else { pos.y };
    let b = if value < 4 { pos.y } else if value != 12 && value != 14 { pos.z } else { pos.x };
    (if value & 1 == 0 { a } else { -a }) + (if value & 2 == 0 { b } else { -b })
}


/// A Perlin-based octave noise generator, each octave samples at half the frequency
/// and twice the amplitude of the previous one.
#[derive(Debug, Clone)]
pub struct OctaveNoise {
    /// Collection of generators for the different octaves.
    generators: Box<[PerlinNoise]>
}

impl OctaveNoise {

    /// Create a new Perlin-based octaves noise generator.
    pub fn new(rand: &mut JavaRandom, octaves: usize) -> Self {
        Self {
            generators: (0..octaves)
                .map(move |_| PerlinNoise::new(rand))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Get the noise value at given 3D coordinates.
    pub fn gen_3d_point(&self, pos: DVec3) -> f64 {
        let mut ret = 0.0;
        let mut freq = 1.0;
        for generator in &self.generators[..] {
            ret += generator.gen_3d_point(pos * freq) / freq;
            freq /= 2.0;
        }
        ret
    }

    /// Get the noise value at given 2D coordinates.
    pub fn gen_2d_point(&self, pos: DVec2) -> f64 {
        let mut ret = 0.0;
        let mut freq = 1.0;
        for generator in &self.generators[..] {
            ret += generator.gen_2d_point(pos * freq) / freq;
            freq /= 2.0;
        }
        ret
    }

}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn deterministic_and_bounded() {

        let a = PerlinNoise::new(&mut JavaRandom::new(1234));
        let b = PerlinNoise::new(&mut JavaRandom::new(1234));

        for i in 0..64 {
            let pos = DVec3::new(i as f64 * 0.37, i as f64 * 0.11, i as f64 * -0.53);
            let value = a.gen_3d_point(pos);
            assert_eq!(value, b.gen_3d_point(pos));
            assert!(value.abs() <= 2.0);
        }

    }

}
