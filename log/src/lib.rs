//! Terminal diagnostics for the binary. The library crates never log.

/// Time a given expression.
#[macro_export]
macro_rules! time {
    ($e:expr) => {{
        let now = std::time::Instant::now();
        let result = $e;
        eprintln!(
            "[timing] {}:{} took {:?}.",
            std::file!(),
            std::line!(),
            now.elapsed()
        );
        result
    }};
}

#[macro_export]
macro_rules! exit {
    ($code:expr => $($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit($code);
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        eprint!("[error] ");
        eprintln!($($arg)*);
    }};
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {{
        eprint!("[warning] ");
        eprintln!($($arg)*);
    }};
}
