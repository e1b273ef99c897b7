//! Mask patterns and penalty scoring.

use rayon::prelude::*;
use tracing::{debug, trace};

use super::matrix::Grid;
use super::tables::QrCodeEcc;

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// All eight masks in ascending order.
    pub fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Mask)
    }

    /// Whether the data module at column `x`, row `y` is inverted by this mask.
    pub fn invert(self, x: usize, y: usize) -> bool {
        match self.0 {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (x / 3 + y / 2) % 2 == 0,
            5 => ((x * y) % 2) + ((x * y) % 3) == 0,
            6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
            7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

/// Breakdown of the four penalty rules for one masked grid.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Penalty {
    /// Runs of five or more same-coloured modules in a row or column.
    pub runs: i32,
    /// 2x2 blocks of one colour.
    pub blocks: i32,
    /// Finder-like 1:1:3:1:1 patterns with light space on one side.
    pub finder_like: i32,
    /// Deviation of the dark proportion from 50%.
    pub balance: i32,
}

impl Penalty {
    pub fn total(&self) -> i32 {
        self.runs + self.blocks + self.finder_like + self.balance
    }
}

/// Scores `grid` as it would be printed.
pub fn get_penalty_score(grid: &Grid) -> Penalty {
    let size: usize = grid.size();
    let mut penalty = Penalty::default();

    // Rows, then columns, through the same run scanner
    for transpose in [false, true] {
        for a in 0..size {
            let module = |b: usize| {
                if transpose {
                    grid.is_dark(a, b)
                } else {
                    grid.is_dark(b, a)
                }
            };
            let mut runcolor = false;
            let mut runlen: i32 = 0;
            let mut runhistory = FinderPenalty::new(size);
            for b in 0..size {
                if module(b) == runcolor {
                    runlen += 1;
                    if runlen == 5 {
                        penalty.runs += PENALTY_N1;
                    } else if runlen > 5 {
                        penalty.runs += 1;
                    }
                } else {
                    runhistory.add_history(runlen);
                    if !runcolor {
                        penalty.finder_like += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = module(b);
                    runlen = 1;
                }
            }
            penalty.finder_like += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
        }
    }

    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color: bool = grid.is_dark(x, y);
            if color == grid.is_dark(x + 1, y)
                && color == grid.is_dark(x, y + 1)
                && color == grid.is_dark(x + 1, y + 1)
            {
                penalty.blocks += PENALTY_N2;
            }
        }
    }

    let dark = grid.dark_count() as i32;
    let total = (size * size) as i32;
    // Smallest k such that the dark ratio lies within (50 ± 5(k+1))%
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    penalty.balance = k * PENALTY_N4;
    penalty
}

/// Tries every mask on a copy of `grid` and returns the one with the lowest
/// penalty; ties go to the lowest mask number.
///
/// Trials are independent and run in parallel. `grid` must already hold its
/// codewords and be unmasked.
pub fn select_mask(grid: &Grid, ecl: QrCodeEcc) -> Mask {
    // Real trials always score below the reduction identity
    let (penalty, mask) = Mask::all()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|mask| {
            let mut trial = grid.clone();
            trial.apply_mask(mask);
            trial.draw_format_bits(ecl, mask);
            let penalty = get_penalty_score(&trial);
            trace!(mask = mask.value(), ?penalty, "mask trial");
            (penalty.total(), mask)
        })
        .reduce(|| (i32::MAX, Mask::new(7)), |a, b| a.min(b));
    debug!(mask = mask.value(), penalty, "selected mask");
    mask
}

/// Tracks the last seven run lengths of a row or column to spot
/// finder-like 1:1:3:1:1 patterns.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: usize) -> Self {
        Self {
            qr_size: size as i32,
            run_history: [0; 7],
        }
    }

    // The light border outside the symbol counts toward the first run.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = currentrunlength;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qrcode::tables::Version;

    fn filled_grid() -> Grid {
        let mut grid = Grid::new(Version::MIN);
        let data: Vec<u8> = (0..26u8).map(|i| i.wrapping_mul(37)).collect();
        grid.draw_codewords(&data);
        grid
    }

    #[test]
    fn test_mask_predicates() {
        assert!(Mask::new(0).invert(0, 0));
        assert!(!Mask::new(0).invert(1, 0));
        assert!(Mask::new(1).invert(5, 2));
        assert!(Mask::new(2).invert(3, 1));
        assert!(Mask::new(3).invert(1, 2));
        assert!(Mask::new(4).invert(0, 1) && !Mask::new(4).invert(3, 0));
        assert!(Mask::new(5).invert(0, 7));
        assert!(Mask::new(6).invert(1, 1) && !Mask::new(6).invert(1, 5));
        assert!(Mask::new(7).invert(0, 0));
    }

    #[test]
    #[should_panic(expected = "Mask value out of range")]
    fn test_mask_out_of_range() {
        let _ = Mask::new(8);
    }

    #[test]
    fn test_balance_penalty() {
        let mut grid = filled_grid();
        grid.draw_format_bits(QrCodeEcc::Low, Mask::new(0));
        let dark = grid.dark_count() as f64 / (21.0 * 21.0);
        let penalty = get_penalty_score(&grid);
        let deviation = ((dark - 0.5).abs() * 100.0 / 5.0).floor() as i32;
        assert_eq!(penalty.balance, deviation * PENALTY_N4);
    }

    #[test]
    fn test_finder_patterns_are_penalized() {
        // Each finder contributes at least one row and one column match
        let grid = Grid::new(Version::MIN);
        assert!(get_penalty_score(&grid).finder_like >= 3 * 2 * PENALTY_N3);
    }

    #[test]
    fn test_run_history_counts_isolated_pattern() {
        // light(4) dark light dark*3 light dark light(4)
        let mut fp = FinderPenalty::new(21);
        fp.add_history(4);
        for len in [1, 1, 3, 1, 1] {
            fp.add_history(len);
        }
        assert_eq!(fp.terminate_and_count(false, 4), 2);
    }

    #[test]
    fn test_select_mask_picks_an_evaluated_trial() {
        // The winner is a real trial, never the reduction identity
        let grid = filled_grid();
        let chosen = select_mask(&grid, QrCodeEcc::Low);
        let mut trial = grid.clone();
        trial.apply_mask(chosen);
        trial.draw_format_bits(QrCodeEcc::Low, chosen);
        assert!(get_penalty_score(&trial).total() < i32::MAX);
    }

    #[test]
    fn test_select_mask_is_deterministic() {
        let grid = filled_grid();
        let first = select_mask(&grid, QrCodeEcc::Low);
        for _ in 0..4 {
            assert_eq!(select_mask(&grid, QrCodeEcc::Low), first);
        }
    }

    #[test]
    fn test_select_mask_minimizes_penalty() {
        let grid = filled_grid();
        let chosen = select_mask(&grid, QrCodeEcc::Low);
        let score = |mask: Mask| {
            let mut trial = grid.clone();
            trial.apply_mask(mask);
            trial.draw_format_bits(QrCodeEcc::Low, mask);
            get_penalty_score(&trial).total()
        };
        let best = score(chosen);
        for mask in Mask::all() {
            let s = score(mask);
            assert!(best < s || (best == s && chosen <= mask), "mask {:?}", mask);
        }
    }
}
