use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use ocho_core::{Chip8, CLOCK_SPEED};
use ocho_display::Display;

pub fn run(image: PathBuf) {
    let mut chip8: Chip8 = Chip8::new();

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().unwrap();
    let mut display: Display = Display::new(&sdl);
    let mut events = sdl.event_pump().unwrap();

    // Load the program image
    let file = match File::open(&image) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("unable to open {}: {}", image.display(), e);
            std::process::exit(1);
        }
    };
    let mut reader = BufReader::new(file);
    match chip8.load_program(&mut reader) {
        Ok(()) => println!("successfully loaded program image"),
        Err(e) => {
            eprintln!("unable to load {}: {}", image.display(), e);
            std::process::exit(1);
        }
    };

    // Set initial timing
    let cycle_time: Duration = Duration::new(0, CLOCK_SPEED as u32);
    let mut last_cycle: Instant = Instant::now();

    'event: loop {
        // If the interpreter produced a fresh frame, render it
        if let Some(frame) = chip8.get_frame() {
            display.render(&frame);
        }

        // The interpreter has no notion of quitting; window close and
        // Escape both halt it from out here
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => chip8.halt(),
                _ => continue,
            };
        }
        if !chip8.is_running() {
            break 'event;
        }

        chip8.step();

        // Execution also stops once the counter runs past the loaded code
        if chip8.reached_end() {
            break 'event;
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }
}
