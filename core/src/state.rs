use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PIXEL_OFF, PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};

/// A snapshot of the machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter; every write is masked to 12 bits
///
/// Pointer
/// - (sp) an 8-bit stack pointer; slot arithmetic wraps modulo 16
///
/// Timers
/// - 2 8-bit timers (delay & sound); nothing in this machine writes or
///   decrements them
///
/// ## Memory
/// - 16 return-address slots for subroutine calls
/// - 4096 bytes of addressable memory
///     - [0x000, 0x050) holds the sprite font
///     - programs are loaded at 0x200
/// - 64x32 byte frame buffer, one byte per pixel (0x00 dark, 0xFF lit)
///
/// ## Control
/// - (running) halt flag; only the embedding driver ever clears it
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub running: bool,
}

impl State {
    pub fn new() -> Self {
        // 0x000 - 0x050 is reserved for the sprite font
        let mut memory = [0; MEMORY_SIZE];
        memory[0..80].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            running: true,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// The FrameBuffer is indexed as [y][x]; pixels are 0x00 (dark) or 0xFF (lit)
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bakes_in_sprite_font() {
        let state = State::new();
        assert_eq!(state.memory[0..80], SPRITE_SHEET);
        assert!(state.memory[80..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_new_starts_at_program_start() {
        let state = State::new();
        assert_eq!(state.pc, 0x200);
        assert_eq!(state.sp, 0x0);
        assert!(state.running);
    }
}
