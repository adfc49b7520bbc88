use std::fmt;

impl fmt::Debug for super::Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, err) => {
                f.write_fmt(format_args!("Failed to read '{}': {err}.", path.display()))
            }
            Self::UnknownArchitecture(name) => {
                f.write_fmt(format_args!("Unsupported architecture: '{name}'."))
            }
        }
    }
}

impl fmt::Display for super::Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for super::Error {}
