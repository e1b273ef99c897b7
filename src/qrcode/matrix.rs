//! Module grid: function patterns, codeword placement and format information.

use super::bits::get_bit;
use super::mask::Mask;
use super::tables::{QrCodeEcc, Version};

/// State of one cell of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Module {
    /// Not yet assigned.
    Empty,
    /// Finder, separator, timing, alignment, format area or the dark module.
    /// Never touched by data placement or masking.
    Function(bool),
    /// A codeword bit (or a remainder bit).
    Data(bool),
}

impl Module {
    pub fn is_dark(self) -> bool {
        matches!(self, Module::Function(true) | Module::Data(true))
    }
}

/// A square grid of modules, indexed by `(x, y)` with `(0, 0)` at the top left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    modules: Vec<Module>,
}

impl Grid {
    /// Creates the grid for `version` with every function module in place.
    ///
    /// Format areas are reserved as light modules until
    /// [`draw_format_bits`](Self::draw_format_bits) fills them in.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut result = Self {
            size,
            modules: vec![Module::Empty; size * size],
        };
        let last = size as i32 - 1;
        result.draw_finder_pattern(3, 3);
        result.draw_finder_pattern(last - 3, 3);
        result.draw_finder_pattern(3, last - 3);
        result.draw_timing_patterns();
        if let Some(pos) = version.alignment_center() {
            result.draw_alignment_pattern(pos, pos);
        }
        result.reserve_format_areas();
        result
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Module {
        self.modules[self.index(x, y)]
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_dark()
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Module::Function(_))
    }

    /// Number of dark modules in the whole grid.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_dark()).count()
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.size && y < self.size, "Module out of range");
        y * self.size + x
    }

    fn set_function(&mut self, x: usize, y: usize, isdark: bool) {
        let index = self.index(x, y);
        self.modules[index] = Module::Function(isdark);
    }

    fn set_function_unbounded(&mut self, x: i32, y: i32, isdark: bool) {
        let range = 0..self.size as i32;
        if range.contains(&x) && range.contains(&y) {
            self.set_function(x as usize, y as usize, isdark);
        }
    }

    /// Draws a 7x7 finder pattern centred at `(x, y)` together with its
    /// light separator ring; parts outside the grid are clipped.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist: i32 = dx.abs().max(dy.abs());
                self.set_function_unbounded(x + dx, y + dy, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.size - 8 {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }
    }

    /// Draws a 5x5 alignment pattern centred at `(x, y)`.
    fn draw_alignment_pattern(&mut self, x: usize, y: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let dist: i32 = dx.abs().max(dy.abs());
                self.set_function((x as i32 + dx) as usize, (y as i32 + dy) as usize, dist != 1);
            }
        }
    }

    fn reserve_format_areas(&mut self) {
        for (x, y) in format_positions(self.size).into_iter().flatten() {
            self.set_function(x, y, false);
        }
        self.set_function(8, self.size - 8, true);
    }

    /// Writes both copies of the format information for `ecl` and `mask`.
    pub fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        let bits = u32::from(format_bits(ecl, mask));
        for copy in format_positions(self.size) {
            for (i, (x, y)) in copy.into_iter().enumerate() {
                self.set_function(x, y, get_bit(bits, i as u8));
            }
        }
    }

    /// Reads the 15-bit format word back from the first copy.
    pub fn read_format_bits(&self) -> u16 {
        let [first, _] = format_positions(self.size);
        first
            .into_iter()
            .enumerate()
            .filter(|&(_, (x, y))| self.is_dark(x, y))
            .fold(0u16, |acc, (i, _)| acc | (1 << i))
    }

    /// Places codeword bits, most significant bit first, along
    /// [`placement_order`], skipping function modules.
    ///
    /// Data modules left over once every bit is placed are light. Returns the
    /// number of such remainder modules.
    ///
    /// # Panics
    ///
    /// Panics if there are more bits than data modules or if a data module
    /// is visited twice.
    pub fn draw_codewords(&mut self, data: &[u8]) -> usize {
        let totalbits: usize = data.len() * 8;
        let mut i: usize = 0;
        for (x, y) in placement_order(self.size) {
            let index = self.index(x, y);
            match self.modules[index] {
                Module::Function(_) => continue,
                Module::Data(_) => panic!("Data module ({}, {}) visited twice", x, y),
                Module::Empty => {
                    let isdark = i < totalbits && get_bit(data[i >> 3].into(), 7 - ((i as u8) & 7));
                    self.modules[index] = Module::Data(isdark);
                    i += 1;
                }
            }
        }
        assert!(i >= totalbits, "Too many codewords for the data region");
        debug_assert!(self.modules.iter().all(|&m| m != Module::Empty));
        i - totalbits
    }

    /// Inverts every data module for which the mask predicate holds.
    ///
    /// Applying the same mask twice restores the original grid.
    pub fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let index = y * self.size + x;
                if let Module::Data(isdark) = self.modules[index] {
                    self.modules[index] = Module::Data(isdark ^ mask.invert(x, y));
                }
            }
        }
    }
}

/// Coordinates of both format information copies; entry `i` of each copy
/// holds bit `i` of the 15-bit format word.
fn format_positions(size: usize) -> [[(usize, usize); 15]; 2] {
    let mut first = [(0, 0); 15];
    let mut second = [(0, 0); 15];
    for i in 0..6 {
        first[i] = (8, i);
    }
    first[6] = (8, 7);
    first[7] = (8, 8);
    first[8] = (7, 8);
    for i in 9..15 {
        first[i] = (14 - i, 8);
    }
    for i in 0..8 {
        second[i] = (size - 1 - i, 8);
    }
    for i in 8..15 {
        second[i] = (8, size - 15 + i);
    }
    [first, second]
}

/// The 15-bit format word: ECC level and mask, a BCH(15,5) remainder, and
/// the fixed XOR mask 0x5412.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u16 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    (((data << 10) | rem) ^ 0x5412) as u16
}

/// Iterator over grid coordinates in codeword placement order.
///
/// Columns are walked in pairs from the right edge, right column before left
/// within each row, alternating upward and downward per pair. The vertical
/// timing column 6 is skipped entirely. Function modules are included; the
/// consumer filters them out.
#[derive(Clone, Debug)]
pub struct PlacementOrder {
    size: i32,
    right: i32,
    vert: i32,
    j: i32,
}

pub fn placement_order(size: usize) -> PlacementOrder {
    PlacementOrder {
        size: size as i32,
        right: size as i32 - 1,
        vert: 0,
        j: 0,
    }
}

impl Iterator for PlacementOrder {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.right == 6 {
            self.right = 5;
        }
        if self.right < 1 {
            return None;
        }
        let x = self.right - self.j;
        let upward: bool = ((self.right + 1) & 2) == 0;
        let y = if upward { self.size - 1 - self.vert } else { self.vert };

        self.j += 1;
        if self.j == 2 {
            self.j = 0;
            self.vert += 1;
            if self.vert == self.size {
                self.vert = 0;
                self.right -= 2;
            }
        }
        Some((x as usize, y as usize))
    }
}
