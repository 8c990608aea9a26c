use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A single instruction's transition over the machine state
pub type Operation = fn(op: &dyn Opcode, state: &State) -> State;

/// Selects the Operation for a given instruction word
///
/// The top nibble picks the family. Within a family the 0x0 group is told
/// apart by the exact word, the 0x8 group by its low nibble, and the
/// 0xE/0xF groups (a single switch in this machine) by their low byte.
/// Anything unrecognized is a no-op rather than an error.
pub fn from_op(op: &dyn Opcode) -> Operation {
    match op.op() {
        0x0 => match op.word() {
            0x00E0 => clr,
            0x00EE => rts,
            // legacy machine call, taken as a plain jump
            _ => jump,
        },
        0x1 => jump,
        0x2 => call,
        0x3 => ske,
        0x4 => skne,
        0x5 => skre,
        0x6 => load,
        0x7 => add,
        0x8 => match op.n() {
            0x0 => mv,
            0x1 => or,
            0x2 => and,
            0x3 => xor,
            0x4 => addr,
            0x5 => sub,
            0x6 => shr,
            0x7 => subn,
            0xE => shl,
            _ => noop,
        },
        0x9 => skrne,
        0xA => loadi,
        0xB => jumpi,
        0xC => rand,
        0xD => draw,
        0xE | 0xF => match op.kk() {
            0x07 | 0x0A | 0x15 | 0x18 | 0x1E => addi,
            0x29 | 0x33 => bcd,
            0x55 => stor,
            0x65 => read,
            _ => noop,
        },
        // op() is a 4-bit field
        _ => unreachable!(),
    }
}
