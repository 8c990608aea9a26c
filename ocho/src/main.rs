use std::path::PathBuf;

use getopts::Options;

mod run;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] IMAGE", program);
    print!("{}", opts.usage(&brief));
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help text");
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return;
    }
    if matches.free.is_empty() {
        print_usage(&program, &opts);
        std::process::exit(1);
    }

    run::run(PathBuf::from(&matches.free[0]));
}
