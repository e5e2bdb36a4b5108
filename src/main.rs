
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use assembler::{Assembly, Error};

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tPrint Debug: {}\n\tOutfile: {}\n\tInfile: {}",
        level_filter(args.occurrences_of("verbose")),
        args.is_present("print-debug"),
        args.value_of("output").unwrap_or("stdout"),
        args.value_of("INPUT").unwrap_or("stdin")
    );

    if let Err(err) = run(&args) {
        error!("fatal: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &ArgMatches) -> Result<(), Error> {
    let source = read_source(args.value_of("INPUT"))?;
    let asm = assembler::assemble_program(&source)?;

    if args.is_present("print-debug") {
        print_listing(&asm);
    }

    match args.value_of("output") {
        Some(filename) => {
            let opath = Path::new(filename);
            let ofile = File::create(&opath)
                .map_err(|err| Error::Io(format!("unable to open output file `{}`", opath.display()), err))?;
            write_words(ofile, &asm.words)
                .map_err(|err| Error::Io(format!("unable to write to output file `{}`", opath.display()), err))
        }
        // The listing already went to stdout.
        None if args.is_present("print-debug") => Ok(()),
        None => {
            let stdout = io::stdout();
            write_words(stdout.lock(), &asm.words)
                .map_err(|err| Error::Io("unable to write to stdout".to_owned(), err))
        }
    }
}

/// Reads the whole source, from the named file or from stdin.
fn read_source(input: Option<&str>) -> Result<String, Error> {
    let mut source = String::new();
    match input {
        Some(ifile) => {
            let ipath = Path::new(ifile);
            let mut file = File::open(&ipath)
                .map_err(|err| Error::Io(format!("unable to open input file `{}`", ipath.display()), err))?;
            file.read_to_string(&mut source)
                .map_err(|err| Error::Io(format!("unable to read input file `{}`", ipath.display()), err))?;
        }
        None => {
            io::stdin().read_to_string(&mut source)
                .map_err(|err| Error::Io("unable to read stdin".to_owned(), err))?;
        }
    }
    Ok(source)
}

fn write_words<W: Write>(mut out: W, words: &[String]) -> io::Result<()> {
    for word in words.iter() {
        writeln!(out, "{}", word)?;
    }
    out.flush()
}

fn print_listing(asm: &Assembly) {
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });

    // Words line up with the commands that emit them.
    let mut words = asm.words.iter();
    let mut idx = 0;
    for cmd in asm.program.iter() {
        if cmd.is_instruction() {
            grid.add(Cell::from(format!("0x{:04X}:", idx)));
            grid.add(Cell::from(format!("{}", cmd)));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(words.next().cloned().unwrap_or_default()));
            idx += 1;
        } else {
            grid.add(Cell::from(String::new()));
            grid.add(Cell::from(format!("{}", cmd)));
            grid.add(Cell::from(String::new()));
            grid.add(Cell::from(String::new()));
        }
    }
    println!("{}", grid.fit_into_columns(4));

    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });
    for (symbol, addr) in asm.symbols.iter() {
        grid.add(Cell::from(symbol.to_string()));
        grid.add(Cell::from(format!("0x{:04X}", addr)));
    }
    println!("{}", grid.fit_into_columns(2));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("hasm"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use, reads stdin if absent")
            .required(false)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile instead of STDOUT"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints a listing and the symbol table to STDOUT"))
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
        .level(level_filter(verbosity))
        // Instructions go to stdout, so logs must not.
        .chain(std::io::stderr())
        .apply().ok();
}

/// Maps the number of `-v` flags to a log level.
fn level_filter(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
