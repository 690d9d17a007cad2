extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tPrint Debug: {}\n\tInfile: {}\n\tOutfile: {}",
        verbosity_filter(args.occurrences_of("verbose")),
        args.is_present("print-debug"),
        args.value_of("INPUT").unwrap_or("None"),
        args.value_of("OUTPUT").unwrap_or("None")
    );

    // Both positionals are required, clap has already rejected anything else.
    let ipath = Path::new(args.value_of("INPUT").unwrap_or_default());
    let opath = Path::new(args.value_of("OUTPUT").unwrap_or_default());

    let ifile = match File::open(&ipath) {
        Err(err) => {
            error!("fatal: unable to open input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    let tokens = match assembler::lexer::tokenize(Box::new(ifile)) {
        Err(err) => {
            error!("fatal: unable to read input file `{}`: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(tokens) => tokens,
    };

    let assembly = match assembler::codegen::assemble(tokens) {
        Err(err) => {
            error!("fatal: {}: {}", ipath.display(), err);
            std::process::exit(1);
        },
        Ok(assembly) => assembly,
    };

    if args.is_present("print-debug") {
        print_debug(&assembly);
    }

    // The output file is only touched once the whole program has assembled.
    let mut ofile = match File::create(&opath) {
        Err(err) => {
            error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        },
        Ok(file) => file,
    };

    if let Err(err) = ofile.write_all(assembly.to_hack().as_bytes()) {
        error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
        std::process::exit(1);
    }

    info!("Wrote {} word(s) to `{}`.", assembly.listing.len(), opath.display());
}

fn print_debug(assembly: &assembler::codegen::Assembly) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for entry in assembly.listing.iter() {
        grid.add(Cell::from(format!("{:05}:", entry.address)));
        grid.add(Cell::from(entry.source.text.clone()));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(entry.instruction.to_word()));
    }

    println!("{}", grid.fit_into_columns(4));

    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    for (name, addr) in assembly.symbols.user_symbols() {
        grid.add(Cell::from(format!("{}:", name)));
        grid.add(Cell::from(format!("{}", addr)));
    }

    println!("Symbols:\n{}", grid.fit_into_columns(2));
}

fn verbosity_filter(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the Hack assembly (.asm) file to read")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("OUTPUT")
            .help("Sets the binary (.hack) file to write")
            .required(true)
            .multiple(false)
            .index(2))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .long("print-debug")
            .takes_value(false)
            .help("prints the listing and symbol table alongside the assembly to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(verbosity_filter(verbosity))
        .chain(std::io::stdout())
        .apply().ok();
}
