//! Packed cell representation.
//!
//! One byte per cell:
//! - bit 0: alive flag
//! - bits 1-4: live neighbour count, stored in units of `COUNT_UNIT` so the
//!   counter never carries into the alive bit
//! - bits 5-7: unused

pub const ALIVE_BIT: u8 = 0x01;
pub const COUNT_UNIT: u8 = 0x02;
pub const COUNT_MASK: u8 = 0x1E;

pub const DEAD_CHAR: char = '.';
pub const LIVE_CHAR: char = 'x';

/// Externally visible state of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    Dead,
    Alive,
}

impl CellState {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == CellState::Alive
    }
}

impl From<bool> for CellState {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive {
            CellState::Alive
        } else {
            CellState::Dead
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Cell(u8);

impl Cell {
    pub const DEAD: Cell = Cell(0);

    #[inline(always)]
    pub const fn from_bits(bits: u8) -> Self {
        Cell(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Dead with no live neighbours; the stepper skips these.
    #[inline(always)]
    pub const fn is_quiet(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_alive(self) -> bool {
        self.0 & ALIVE_BIT != 0
    }

    #[inline(always)]
    pub const fn neighbor_count(self) -> u8 {
        (self.0 & COUNT_MASK) >> 1
    }

    #[inline(always)]
    pub fn set_alive(&mut self) {
        self.0 |= ALIVE_BIT;
    }

    #[inline(always)]
    pub fn clear_alive(&mut self) {
        self.0 &= !ALIVE_BIT;
    }

    #[inline(always)]
    pub fn add_neighbor(&mut self) {
        debug_assert!(self.neighbor_count() < 15, "neighbour count overflow");
        self.0 += COUNT_UNIT;
    }

    #[inline(always)]
    pub fn remove_neighbor(&mut self) {
        debug_assert!(self.neighbor_count() > 0, "neighbour count underflow");
        self.0 -= COUNT_UNIT;
    }

    #[inline]
    pub fn state(self) -> CellState {
        CellState::from(self.is_alive())
    }
}
