//! Traits for format-agnostic parsing and serialization of message resources.

use std::{
    fs::File,
    io::{BufRead, BufWriter, Cursor, ErrorKind, Read, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing message resources from/to one file.
///
/// `source_name` is only used to label errors (usually the file path).
///
/// # Example
///
/// ```rust,no_run
/// use message_format::traits::Parser;
/// let format = message_format::formats::properties::Format::read_from("en.properties")?;
/// format.write_to("en_copy.properties")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// The file handle is closed before this returns. A byte order mark is
    /// honored (UTF-16 files with a BOM are decoded); otherwise the content
    /// must be UTF-8 or the file is reported as malformed.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let decoded = {
            let file = File::open(path)?;
            let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
                .bom_override(true)
                .build(file);
            let mut decoded = String::new();
            decoder
                .read_to_string(&mut decoded)
                .map_err(|e| match e.kind() {
                    ErrorKind::InvalidData => {
                        Error::malformed_resource(&source_name, 0, "content is not valid UTF-8")
                    }
                    _ => Error::Io(e),
                })?;
            decoded
        };

        Self::from_reader(Cursor::new(decoded), &source_name)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str, source_name: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s), source_name)
    }
}
