//! Transition table for B3/S23.
//!
//! Indexed by the low five bits of a packed cell (alive bit plus count), so
//! the per-cell rule is a single load.

use super::cell::Cell;

const BIRTH_NEIGHBORS: u8 = 3;
const SURVIVE_MIN: u8 = 2;
const SURVIVE_MAX: u8 = 3;
const TABLE_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Keep,
    Birth,
    Death,
}

pub static RULES: RuleTable = RuleTable::new();

pub struct RuleTable {
    table: [Transition; TABLE_LEN],
}

impl RuleTable {
    pub const fn new() -> Self {
        let mut table = [Transition::Keep; TABLE_LEN];
        let mut bits = 0;
        while bits < TABLE_LEN {
            table[bits] = output_for(Cell::from_bits(bits as u8));
            bits += 1;
        }
        Self { table }
    }

    #[inline(always)]
    pub fn lookup(&self, cell: Cell) -> Transition {
        self.table[(cell.bits() as usize) & (TABLE_LEN - 1)]
    }
}

const fn output_for(cell: Cell) -> Transition {
    let count = cell.neighbor_count();
    if cell.is_alive() {
        if count < SURVIVE_MIN || count > SURVIVE_MAX {
            Transition::Death
        } else {
            Transition::Keep
        }
    } else if count == BIRTH_NEIGHBORS {
        Transition::Birth
    } else {
        Transition::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::{RULES, Transition};
    use crate::torus::cell::Cell;

    fn packed(alive: bool, count: u8) -> Cell {
        Cell::from_bits((count << 1) | alive as u8)
    }

    #[test]
    fn rule_table_matches_reference() {
        for count in 0..=8u8 {
            let dead = RULES.lookup(packed(false, count));
            let expected_dead = if count == 3 {
                Transition::Birth
            } else {
                Transition::Keep
            };
            assert_eq!(dead, expected_dead, "dead cell with {count} neighbours");

            let alive = RULES.lookup(packed(true, count));
            let expected_alive = if count == 2 || count == 3 {
                Transition::Keep
            } else {
                Transition::Death
            };
            assert_eq!(alive, expected_alive, "live cell with {count} neighbours");
        }
    }

    #[test]
    fn quiet_cell_keeps() {
        assert_eq!(RULES.lookup(Cell::DEAD), Transition::Keep);
    }
}
