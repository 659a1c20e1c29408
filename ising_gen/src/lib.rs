//! Russell - Rust Scientific Library (isingZ lineage)
//!
//! `ising_gen`: random coupling-lattice generators, external to the
//! Pfaffian core (spec.md §1b) but present so `ising_cli` can produce an
//! interaction lattice standalone, without a separately run tool.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::io::Write;

/// One record of the coupling-lattice file format (spec.md §6): the
/// east-going and south-going bonds of a single spin.
#[derive(Clone, Copy, Debug)]
pub struct CouplingRecord {
    pub x: usize,
    pub y: usize,
    pub dir: Dir,
    pub j: f64,
}

/// The two directions a generator ever emits a record for: east/south
/// records from each spin are enough to cover every edge of the torus
/// exactly once (grounded on `generator_random_bond/main.cc`, which
/// only ever writes `E`/`S` lines).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    E,
    S,
}

impl Dir {
    fn as_str(self) -> &'static str {
        match self {
            Dir::E => "E",
            Dir::S => "S",
        }
    }
}

/// A seeded coupling generator (spec.md §1b; grounded on
/// `generator_random_bond/main.cc`).
pub enum CouplingGenerator {
    /// Sets `J = -1` with probability `probability`, else `J = +1`, for
    /// every E and S bond independently.
    UniformFlip { probability: f64, seed: u64 },
    /// Draws a per-bond flip probability from `Normal(probability,
    /// stddev)` clamped to `[1e-4, 0.5 - 1e-10]`, then sets
    /// `J = sign * 0.5 * ln((1-p)/p)`.
    GaussianNoise {
        probability: f64,
        stddev: f64,
        seed: u64,
    },
}

impl CouplingGenerator {
    /// Generates every E/S coupling record for an `lx`x`ly` torus, in
    /// row-major `(y, x)` order matching the original's nested loop.
    pub fn generate(&self, lx: usize, ly: usize) -> Vec<CouplingRecord> {
        let mut rng = self.rng();
        let mut records = Vec::with_capacity(lx * ly * 2);
        for y in 0..ly {
            for x in 0..lx {
                let (j_e, j_s) = self.sample_pair(&mut rng);
                records.push(CouplingRecord { x, y, dir: Dir::E, j: j_e });
                records.push(CouplingRecord { x, y, dir: Dir::S, j: j_s });
            }
        }
        records
    }

    /// Generates and writes the lattice file directly, in the exact
    /// textual layout `Sample::from_reader` expects (spec.md §6).
    pub fn write_lattice_file<W: Write>(
        &self,
        mut w: W,
        lx: usize,
        ly: usize,
    ) -> Result<(), std::io::Error> {
        writeln!(w, "{} {}", lx, ly)?;
        let mut rng = self.rng();
        for y in 0..ly {
            for x in 0..lx {
                let (j_e, j_s) = self.sample_pair(&mut rng);
                writeln!(w, "{}\t{}\t{}\t{}", x, y, Dir::E.as_str(), j_e)?;
                writeln!(w, "{}\t{}\t{}\t{}", x, y, Dir::S.as_str(), j_s)?;
            }
        }
        Ok(())
    }

    fn rng(&self) -> ChaCha8Rng {
        let seed = match self {
            CouplingGenerator::UniformFlip { seed, .. } => *seed,
            CouplingGenerator::GaussianNoise { seed, .. } => *seed,
        };
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn sample_pair(&self, rng: &mut ChaCha8Rng) -> (f64, f64) {
        match self {
            CouplingGenerator::UniformFlip { probability, .. } => {
                let j_e = if rng.gen::<f64>() < *probability { -1.0 } else { 1.0 };
                let j_s = if rng.gen::<f64>() < *probability { -1.0 } else { 1.0 };
                (j_e, j_s)
            }
            CouplingGenerator::GaussianNoise {
                probability,
                stddev,
                ..
            } => {
                let normal = Normal::new(*probability, *stddev)
                    .expect("stddev must be finite and positive");
                let prob_e = clamp_probability(normal.sample(rng));
                let prob_s = clamp_probability(normal.sample(rng));
                let flip_e = if rng.gen::<f64>() < prob_e { -1.0 } else { 1.0 };
                let flip_s = if rng.gen::<f64>() < prob_s { -1.0 } else { 1.0 };
                let j_e = flip_e * 0.5 * ((1.0 - prob_e) / prob_e).ln();
                let j_s = flip_s * 0.5 * ((1.0 - prob_s) / prob_s).ln();
                (j_e, j_s)
            }
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    p.max(1e-4).min(0.5 - 1e-10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_flip_only_emits_plus_or_minus_one() {
        let gen = CouplingGenerator::UniformFlip {
            probability: 0.3,
            seed: 7,
        };
        let records = gen.generate(3, 3);
        assert_eq!(records.len(), 3 * 3 * 2);
        for r in &records {
            assert!(r.j == 1.0 || r.j == -1.0);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_lattice() {
        let a = CouplingGenerator::UniformFlip {
            probability: 0.5,
            seed: 123,
        }
        .generate(4, 4);
        let b = CouplingGenerator::UniformFlip {
            probability: 0.5,
            seed: 123,
        }
        .generate(4, 4);
        for (ra, rb) in a.iter().zip(b.iter()) {
            assert_eq!(ra.j, rb.j);
        }
    }

    #[test]
    fn gaussian_noise_clamps_extreme_probabilities() {
        let gen = CouplingGenerator::GaussianNoise {
            probability: 0.5,
            stddev: 10.0,
            seed: 1,
        };
        let records = gen.generate(2, 2);
        for r in &records {
            assert!(r.j.is_finite());
        }
    }

    #[test]
    fn write_lattice_file_round_trips_header() {
        let gen = CouplingGenerator::UniformFlip {
            probability: 0.1,
            seed: 9,
        };
        let mut buf = Vec::new();
        gen.write_lattice_file(&mut buf, 2, 3).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "2 3");
        assert_eq!(text.lines().count(), 1 + 2 * 3 * 2);
    }
}
