use once_cell::sync::Lazy;
use std::path::PathBuf;

macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

const HELP: &str = "OVERVIEW: Microcontroller decompilation tool

USAGE: husk [options] <IMAGE>

OPTIONS:
  -H, --help          Print usage information
  -A, --arch <NAME>   Instruction set to decode: i8051 (default) or thumb
  -P, --pseudo        Print decompiled pseudo-C instead of a disassembly
  -O, --offset <HEX>  Address of the image's first byte";

const ABBRV: &[&str] = &["-H", "-A", "-P", "-O"];
const NAMES: &[&str] = &["--help", "--arch", "--pseudo", "--offset"];

pub static ARGS: Lazy<Cli> = Lazy::new(Cli::parse);

#[derive(Debug, Clone)]
pub struct Cli {
    /// Catalog to decode against.
    pub arch: String,

    /// Render pseudo-C instead of disassembly lines.
    pub pseudo: bool,

    /// Address the image is loaded at.
    pub offset: u64,

    /// Path to the raw image being decoded.
    pub path: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        let mut cli = Cli {
            arch: String::from("i8051"),
            pseudo: false,
            offset: 0,
            path: None,
        };

        let mut args = std::env::args().skip(1).peekable();

        if args.peek().is_none() {
            exit!(0 => "{HELP}");
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-H" | "--help" => exit!(0 => "{HELP}"),
                "-P" | "--pseudo" => cli.pseudo = true,
                "-A" | "--arch" => match args.next() {
                    Some(name) => cli.arch = name,
                    None => exit!(1 => "Missing architecture name.\n\n{HELP}"),
                },
                "-O" | "--offset" => {
                    let Some(value) = args.next() else {
                        exit!(1 => "Missing start offset.\n\n{HELP}");
                    };

                    match u64::from_str_radix(value.trim_start_matches("0x"), 16) {
                        Ok(offset) => cli.offset = offset,
                        Err(..) => exit!(1 => "Start offset must be a hex address."),
                    }
                }
                unknown if unknown.starts_with('-') => {
                    let mut distance = u32::MAX;
                    let mut best_guess = "";
                    for &name in NAMES.iter().chain(ABBRV) {
                        let d = triple_accel::levenshtein_exp(unknown.as_bytes(), name.as_bytes());
                        if d < distance {
                            distance = d;
                            best_guess = name;
                        }
                    }

                    // A guess that's less than 3 `steps` away from a correct arg.
                    if distance < 4 {
                        exit!(1 => "Unknown cmd arg '{unknown}' did you mean '{best_guess}'?")
                    } else {
                        exit!(1 => "Unknown cmd arg '{unknown}' was entered.");
                    }
                }
                path => cli.path = Some(PathBuf::from(path)),
            }
        }

        cli.validate_args();
        cli
    }

    fn validate_args(&mut self) {
        if self.path.is_none() {
            exit!(1 => "Missing path to an image.\n\n{HELP}");
        }
    }
}
