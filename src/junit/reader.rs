use std::{
    collections::TryReserveError,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use quick_xml::{
    errors::IllFormedError,
    events::{BytesStart, Event},
    Reader,
};
use thiserror::Error;

pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Initial capacity of the event buffer shared by every file parsed with one reader.
    pub read_buffer_capacity: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("could not allocate a {capacity} byte read buffer")]
    ParserInit {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("could not open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed report {}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("document has no root element")]
    NoRootElement,
}

/// Receives the structural events of one XML document, in document order.
///
/// An error returned from [`ContentHandler::start_element`] aborts the document.
pub trait ContentHandler {
    fn start_element(&mut self, element: &BytesStart<'_>) -> Result<(), quick_xml::Error>;
    fn end_element(&mut self);
    fn characters(&mut self, text: &str);
}

/// Streaming reader reused across report files.
///
/// Self-closing elements are reported as a start immediately followed by an end. Text and
/// CDATA sections are both delivered through [`ContentHandler::characters`], whitespace
/// included. A document that ends before its root element is closed, or that has no root
/// element at all, is an error.
#[derive(Debug)]
pub struct ReportReader {
    buf: Vec<u8>,
}

impl ReportReader {
    pub fn new(options: ParserOptions) -> Result<Self, ReportError> {
        let mut buf = Vec::new();
        buf.try_reserve(options.read_buffer_capacity)
            .map_err(|source| ReportError::ParserInit {
                capacity: options.read_buffer_capacity,
                source,
            })?;
        Ok(Self { buf })
    }

    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn parse_file<H: ContentHandler>(
        &mut self,
        path: &Path,
        handler: &mut H,
    ) -> Result<(), ReportError> {
        let file = File::open(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(BufReader::new(file), handler)
            .map_err(|source| ReportError::Xml {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse<R: BufRead, H: ContentHandler>(
        &mut self,
        xml: R,
        handler: &mut H,
    ) -> Result<(), DocumentError> {
        let mut reader = Reader::from_reader(xml);
        let mut open_elements: Vec<String> = Vec::new();
        let mut seen_root = false;

        loop {
            match reader.read_event_into(&mut self.buf)? {
                Event::Eof => break,
                Event::Start(e) => {
                    seen_root = true;
                    open_elements.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    handler.start_element(&e)?;
                }
                Event::End(_) => {
                    open_elements.pop();
                    handler.end_element();
                }
                Event::Empty(e) => {
                    seen_root = true;
                    handler.start_element(&e)?;
                    handler.end_element();
                }
                Event::Text(e) => handler.characters(&e.unescape()?),
                Event::CData(e) => handler.characters(&String::from_utf8_lossy(&e)),
                _ => (),
            }
            self.buf.clear();
        }

        if let Some(unclosed) = open_elements.pop() {
            return Err(quick_xml::Error::from(IllFormedError::MissingEndTag(unclosed)).into());
        }
        if !seen_root {
            return Err(DocumentError::NoRootElement);
        }
        Ok(())
    }
}
