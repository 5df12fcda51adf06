use crate::error::{EngineError, EngineResult};
use particle_life_common::GainTable;
use rand::distr::Uniform;
use rand::prelude::*;

/// Square table of signed force gains between group colors.
///
/// `gain(a, b)` is the gain applied to particles of `a` pulled by particles of `b`;
/// it is independent of `gain(b, a)`. Every stored color has a complete row and
/// column: entries only come into existence together with their color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionMatrix {
    colors: Vec<String>,
    // Row-major, colors.len() x colors.len().
    gains: Vec<f64>,
}

impl InteractionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn contains(&self, color: &str) -> bool {
        self.index_of(color).is_some()
    }

    fn index_of(&self, color: &str) -> Option<usize> {
        self.colors.iter().position(|c| c == color)
    }

    pub fn gain(&self, from: &str, to: &str) -> Option<f64> {
        let i = self.index_of(from)?;
        let j = self.index_of(to)?;
        Some(self.gains[i * self.len() + j])
    }

    pub fn set_gain(&mut self, from: &str, to: &str, gain: f64) -> EngineResult<()> {
        let n = self.len();
        match (self.index_of(from), self.index_of(to)) {
            (Some(i), Some(j)) => {
                self.gains[i * n + j] = gain;
                Ok(())
            }
            _ => Err(EngineError::InvariantViolation(format!(
                "no interaction entry for pair ({}, {})",
                from, to
            ))),
        }
    }

    /// Adds a row and column for `color`, drawing each new entry from `fill`.
    /// The new row is filled first (including the self pair), then the new column.
    pub fn insert_color(&mut self, color: &str, mut fill: impl FnMut() -> f64) -> EngineResult<()> {
        if self.contains(color) {
            return Err(EngineError::InvariantViolation(format!(
                "group color '{}' already has interaction entries",
                color
            )));
        }
        let n = self.len();
        let m = n + 1;
        let mut gains = vec![0.0; m * m];
        for i in 0..n {
            gains[i * m..i * m + n].copy_from_slice(&self.gains[i * n..(i + 1) * n]);
        }
        for j in 0..m {
            gains[n * m + j] = fill();
        }
        for i in 0..n {
            gains[i * m + n] = fill();
        }
        self.colors.push(color.to_string());
        self.gains = gains;
        Ok(())
    }

    /// Replaces the whole table with fresh gains drawn uniformly from `[min_g, max_g]`
    /// for every ordered pair of `colors`.
    pub fn randomize<R: Rng>(
        colors: &[String],
        min_g: f64,
        max_g: f64,
        rng: &mut R,
    ) -> EngineResult<Self> {
        let dist = gain_distribution(min_g, max_g)?;
        let n = colors.len();
        let gains = (0..n * n).map(|_| rng.sample(&dist)).collect();
        Ok(InteractionMatrix { colors: colors.to_vec(), gains })
    }

    /// Gain by row/column index. Indices follow insertion order of the colors.
    pub fn gain_at(&self, from: usize, to: usize) -> f64 {
        self.gains[from * self.len() + to]
    }

    /// Deep copy into the snapshot representation.
    pub fn to_table(&self) -> GainTable {
        let n = self.len();
        self.colors
            .iter()
            .enumerate()
            .map(|(i, from)| {
                let row = self
                    .colors
                    .iter()
                    .enumerate()
                    .map(|(j, to)| (to.clone(), self.gains[i * n + j]))
                    .collect();
                (from.clone(), row)
            })
            .collect()
    }

    /// Builds a matrix for `colors` from a snapshot table. Every ordered pair must be present.
    pub fn from_table(colors: &[String], table: &GainTable) -> EngineResult<Self> {
        let n = colors.len();
        let mut gains = Vec::with_capacity(n * n);
        for from in colors {
            let row = table.get(from).ok_or_else(|| {
                EngineError::InvariantViolation(format!("missing interaction row for '{}'", from))
            })?;
            for to in colors {
                let gain = row.get(to).ok_or_else(|| {
                    EngineError::InvariantViolation(format!("missing interaction entry ({}, {})", from, to))
                })?;
                gains.push(*gain);
            }
        }
        Ok(InteractionMatrix { colors: colors.to_vec(), gains })
    }

    pub fn clear(&mut self) {
        self.colors.clear();
        self.gains.clear();
    }
}

pub(crate) fn gain_distribution(min_g: f64, max_g: f64) -> EngineResult<Uniform<f64>> {
    Uniform::new_inclusive(min_g, max_g)
        .map_err(|e| EngineError::InvalidConfig(format!("gain range [{}, {}]: {}", min_g, max_g, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn gains_are_directional() {
        let mut m = InteractionMatrix::new();
        m.insert_color("red", || 0.0).unwrap();
        m.insert_color("blue", || 0.0).unwrap();
        m.set_gain("red", "blue", 0.25).unwrap();
        m.set_gain("blue", "red", -0.1).unwrap();
        assert_eq!(m.gain("red", "blue"), Some(0.25));
        assert_eq!(m.gain("blue", "red"), Some(-0.1));
        assert_eq!(m.gain("red", "green"), None);
        assert!(m.set_gain("red", "green", 1.0).is_err());
    }

    #[test]
    fn insert_color_keeps_existing_entries() {
        let mut m = InteractionMatrix::new();
        m.insert_color("a", || 1.0).unwrap();
        m.insert_color("b", || 2.0).unwrap();
        let mut next = 10.0;
        m.insert_color("c", || {
            next += 1.0;
            next
        })
        .unwrap();
        assert_eq!(m.gain("a", "a"), Some(1.0));
        assert_eq!(m.gain("a", "b"), Some(2.0));
        assert_eq!(m.gain("b", "b"), Some(2.0));
        // Row of c first, then column of c.
        assert_eq!(m.gain("c", "a"), Some(11.0));
        assert_eq!(m.gain("c", "c"), Some(13.0));
        assert_eq!(m.gain("a", "c"), Some(14.0));
        assert_eq!(m.gain("b", "c"), Some(15.0));
        assert!(m.insert_color("a", || 0.0).is_err());
    }

    #[test]
    fn randomize_stays_in_range_and_covers_all_pairs() {
        let mut rng = StdRng::seed_from_u64(7);
        let names = colors(&["a", "b", "c"]);
        let m = InteractionMatrix::randomize(&names, -0.3, 0.3, &mut rng).unwrap();
        for from in &names {
            for to in &names {
                let g = m.gain(from, to).unwrap();
                assert!((-0.3..=0.3).contains(&g));
            }
        }
        assert!(InteractionMatrix::randomize(&names, 1.0, -1.0, &mut rng).is_err());
    }

    #[test]
    fn gain_at_follows_insertion_order() {
        let mut m = InteractionMatrix::new();
        m.insert_color("a", || 0.5).unwrap();
        m.insert_color("b", || -0.5).unwrap();
        m.set_gain("b", "a", 0.75).unwrap();
        assert_eq!(m.gain_at(0, 0), 0.5);
        assert_eq!(m.gain_at(0, 1), -0.5);
        assert_eq!(m.gain_at(1, 0), 0.75);
        assert_eq!(m.colors(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn table_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let names = colors(&["x", "y"]);
        let m = InteractionMatrix::randomize(&names, -1.0, 1.0, &mut rng).unwrap();
        let restored = InteractionMatrix::from_table(&names, &m.to_table()).unwrap();
        assert_eq!(restored, m);

        let mut table = m.to_table();
        table.get_mut("x").unwrap().remove("y");
        assert!(InteractionMatrix::from_table(&names, &table).is_err());
    }
}
