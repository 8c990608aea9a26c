use std::io::{Error, ErrorKind, Read};

use crate::constants::{ADDR_MASK, MEMORY_SIZE, PROGRAM_START};
use crate::instruction;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// An interpreter for the Chip-8 virtual machine.
///
/// Owns the machine state and supplies interfaces for:
/// - loading a program image
/// - advancing execution one instruction at a time
/// - halting from the embedding driver
/// - inspecting the frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    program_end: u16,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            program_end: PROGRAM_START,
        }
    }

    /// Copy a program image into memory at the load address.
    ///
    /// The image is a raw instruction stream: it is read to EOF with no
    /// header and no validation, and must fit in the address space above
    /// the load offset.
    ///
    /// # Arguments
    /// * `reader` a reader over the program image
    pub fn load_program(&mut self, reader: &mut dyn Read) -> Result<(), Error> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;

        let start = PROGRAM_START as usize;
        if image.len() > MEMORY_SIZE - start {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "program image larger than addressable memory",
            ));
        }
        self.state.memory[start..start + image.len()].copy_from_slice(&image);
        self.program_end = (start + image.len()) as u16;
        Ok(())
    }

    /// Perform one fetch-decode-execute step.
    ///
    /// The program counter is advanced past the instruction before the
    /// operation runs, so jumps and calls see (and may overwrite) the
    /// address of the next instruction.
    pub fn step(&mut self) {
        let op = self.fetch();
        self.state.pc = (self.state.pc + 0x2) & ADDR_MASK;
        let operation = instruction::from_op(&op);
        self.state = operation(&op, &self.state);
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing
    /// the draw flag
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Drops the running flag; the interpreter itself never calls this
    pub fn halt(&mut self) {
        self.state.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// True once the program counter has run past the loaded image
    pub fn reached_end(&self) -> bool {
        self.state.pc >= self.program_end
    }

    /// Gets the instruction word pointed at by the pc.
    /// Memory is stored as bytes, but instructions are 16 bits so two
    /// subsequent bytes are combined big-endian. The second byte of a
    /// fetch at the very top of memory wraps around to address zero.
    fn fetch(&self) -> u16 {
        let left = u16::from(self.state.memory[self.state.pc as usize]);
        let right = u16::from(self.state.memory[((self.state.pc + 0x1) & ADDR_MASK) as usize]);
        left << 8 | right
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PIXEL_OFF;

    #[test]
    fn test_fetch_combines_bytes() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch(), 0xAABB);
    }

    #[test]
    fn test_fetch_wraps_second_byte_at_top_of_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        chip8.state.memory[0xFFF] = 0xAB;
        chip8.state.memory[0x000] = 0xCD;
        assert_eq!(chip8.fetch(), 0xABCD);
    }

    #[test]
    fn test_step_advances_pc_before_dispatch() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x00, 0xE0]);
        chip8.step();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_step_wraps_pc_at_top_of_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFE;
        // 0x00E0 so the operation leaves the counter alone
        chip8.state.memory[0xFFE..0x1000].copy_from_slice(&[0x00, 0xE0]);
        chip8.step();
        assert_eq!(chip8.state.pc, 0x000);
    }

    #[test]
    fn test_call_pushes_the_advanced_pc() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x22, 0x08]);
        chip8.step();
        assert_eq!(chip8.state.pc, 0x208);
        assert_eq!(chip8.state.sp, 0x1);
        assert_eq!(chip8.state.stack[0x1], 0x202);
    }

    #[test]
    fn test_call_then_ret_resumes_after_the_call() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x22, 0x08]);
        chip8.state.memory[0x208..0x20A].copy_from_slice(&[0x00, 0xEE]);
        chip8.step();
        chip8.step();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.sp, 0x0);
    }

    #[test]
    fn test_load_program_copies_image_at_load_address() {
        let mut chip8 = Chip8::new();
        let mut image: &[u8] = &[0x00, 0xE0, 0x60, 0x0A];
        chip8.load_program(&mut image).unwrap();
        assert_eq!(chip8.state.memory[0x200..0x204], [0x00, 0xE0, 0x60, 0x0A]);
        assert_eq!(chip8.program_end, 0x204);
    }

    #[test]
    fn test_load_program_rejects_oversized_image() {
        let mut chip8 = Chip8::new();
        let image = vec![0u8; MEMORY_SIZE - PROGRAM_START as usize + 1];
        assert!(chip8.load_program(&mut image.as_slice()).is_err());
    }

    #[test]
    fn test_load_program_accepts_a_full_image() {
        let mut chip8 = Chip8::new();
        let image = vec![0xAAu8; MEMORY_SIZE - PROGRAM_START as usize];
        chip8.load_program(&mut image.as_slice()).unwrap();
        assert_eq!(chip8.program_end, MEMORY_SIZE as u16);
    }

    #[test]
    fn test_reached_end_tracks_the_loaded_image() {
        let mut chip8 = Chip8::new();
        let mut image: &[u8] = &[0x00, 0xE0];
        chip8.load_program(&mut image).unwrap();
        assert!(!chip8.reached_end());
        chip8.step();
        assert!(chip8.reached_end());
    }

    #[test]
    fn test_halt_drops_the_running_flag() {
        let mut chip8 = Chip8::new();
        assert!(chip8.is_running());
        chip8.halt();
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_get_frame_is_gated_by_the_draw_flag() {
        let mut chip8 = Chip8::new();
        assert!(chip8.get_frame().is_none());
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0x00, 0xE0]);
        chip8.step();
        assert!(chip8.get_frame().is_some());
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_three_step_startup_scenario() {
        // clear the screen, set V0, point I at the byte after the image
        let mut chip8 = Chip8::new();
        let mut image: &[u8] = &[0x00, 0xE0, 0x60, 0x0A, 0xA2, 0x02, 0xF0, 0x0B];
        chip8.load_program(&mut image).unwrap();
        chip8.step();
        chip8.step();
        chip8.step();
        assert_eq!(chip8.state.v[0x0], 10);
        assert_eq!(chip8.state.i, 0x202);
        assert_eq!(chip8.state.pc, 518);
        assert!(chip8
            .state
            .frame_buffer
            .iter()
            .all(|row| row.iter().all(|&px| px == PIXEL_OFF)));
    }
}
