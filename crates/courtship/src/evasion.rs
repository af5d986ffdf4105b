use rand::Rng;
use rand::rngs::StdRng;

/// Signed layout offset of the decline control from its resting place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Half-extents of the box the decline control may jump within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(max_x: f64, max_y: f64) -> Self {
        Self { max_x, max_y }
    }

    pub fn contains(&self, offset: Offset) -> bool {
        offset.x.abs() <= self.max_x && offset.y.abs() <= self.max_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provocation {
    /// The control jumped away.
    Dodged,
    /// The miss counter hit the threshold and was cleared.
    Exhausted,
}

/// Bounded random repositioning of the decline control. Every provocation
/// resamples the offset; nothing is remembered between jumps except the
/// miss count.
#[derive(Debug)]
pub struct EvasionController {
    position: Offset,
    misses: u32,
    threshold: u32,
    bounds: Bounds,
    rng: StdRng,
}

impl EvasionController {
    pub fn new(bounds: Bounds, threshold: u32, rng: StdRng) -> Self {
        Self {
            position: Offset::default(),
            misses: 0,
            threshold: threshold.max(1),
            bounds,
            rng,
        }
    }

    pub fn position(&self) -> Offset {
        self.position
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn reconfigure(&mut self, bounds: Bounds, threshold: u32) {
        self.bounds = bounds;
        self.threshold = threshold.max(1);
        self.misses = self.misses.min(self.threshold - 1);
    }

    pub fn provoke(&mut self) -> Provocation {
        self.misses += 1;
        self.position = Offset::new(
            self.rng.gen_range(-self.bounds.max_x..=self.bounds.max_x),
            self.rng.gen_range(-self.bounds.max_y..=self.bounds.max_y),
        );

        if self.misses >= self.threshold {
            self.misses = 0;
            Provocation::Exhausted
        } else {
            Provocation::Dodged
        }
    }

    pub fn reset_position(&mut self) {
        self.position = Offset::default();
    }

    pub fn reset(&mut self) {
        self.reset_position();
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn controller(threshold: u32) -> EvasionController {
        EvasionController::new(
            Bounds::new(110.0, 55.0),
            threshold,
            StdRng::seed_from_u64(7),
        )
    }

    #[test]
    fn test_counter_cycles_through_threshold() {
        let mut evasion = controller(5);

        for round in 0..3 {
            for expected in 1..5 {
                assert_eq!(evasion.provoke(), Provocation::Dodged, "round {round}");
                assert_eq!(evasion.misses(), expected);
            }
            assert_eq!(evasion.provoke(), Provocation::Exhausted);
            assert_eq!(evasion.misses(), 0);
        }
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let mut evasion = controller(5);
        let bounds = evasion.bounds();

        let positions: Vec<Offset> = (0..200)
            .map(|_| {
                evasion.provoke();
                evasion.position()
            })
            .collect();

        assert!(positions.iter().all(|p| bounds.contains(*p)));
        // resampled every call, so a long run cannot sit still
        assert!(positions.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_zero_bounds_pin_the_control() {
        let mut evasion = EvasionController::new(Bounds::new(0.0, 0.0), 2, StdRng::seed_from_u64(1));
        evasion.provoke();
        assert_eq!(evasion.position(), Offset::default());
    }

    #[test]
    fn test_threshold_of_one_exhausts_immediately() {
        let mut evasion = controller(1);
        assert_eq!(evasion.provoke(), Provocation::Exhausted);
        assert_eq!(evasion.misses(), 0);
    }

    #[test]
    fn test_reset_clears_counter_and_position() {
        let mut evasion = controller(5);
        evasion.provoke();
        evasion.provoke();

        evasion.reset();
        assert_eq!(evasion.misses(), 0);
        assert_eq!(evasion.position(), Offset::default());
    }
}
