use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::config::EncoderConfig;
use super::error::DecodeError;

// Constants
pub const DAV_URN: &[u8] = b"DAV:";
pub const SABRE_URN: &[u8] = b"http://sabredav.org/ns";

// IO traits
pub trait IWrite: Write {}
impl<T: Write> IWrite for T {}
pub trait IRead: BufRead {}
impl<T: BufRead> IRead for T {}

// Serialization/Deserialization traits
pub trait QWrite {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), quick_xml::Error>;
}
pub trait QRead<T> {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<T, DecodeError>;
}

// The representation of an XML node in Rust
pub trait Node<T>: QRead<T> + QWrite + std::fmt::Debug + PartialEq + Clone {}
impl<T: QRead<T> + QWrite + std::fmt::Debug + PartialEq + Clone> Node<T> for T {}

// ---------------

/// Transform a Rust object into an XML stream of characters
pub struct Writer<T: IWrite> {
    pub q: quick_xml::writer::Writer<T>,
    pub ns_to_apply: Vec<(String, String)>,
}
impl<T: IWrite> Writer<T> {
    /// Both the `D:` and `s:` prefixes are declared on the first element written.
    pub fn new(inner: T, config: &EncoderConfig) -> Self {
        let q = match config.indent {
            0 => quick_xml::writer::Writer::new(inner),
            n => quick_xml::writer::Writer::new_with_indent(inner, b' ', n),
        };
        let ns_to_apply = vec![
            ("xmlns:D".into(), "DAV:".into()),
            ("xmlns:s".into(), "http://sabredav.org/ns".into()),
        ];
        Self { q, ns_to_apply }
    }

    pub fn into_inner(self) -> T {
        self.q.into_inner()
    }

    pub fn write_declaration(&mut self) -> Result<(), quick_xml::Error> {
        let decl = BytesDecl::new("1.0", Some("utf-8"), None);
        self.q.write_event(Event::Decl(decl))
    }

    pub fn create_dav_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("D", name)
    }
    pub fn create_sabre_element(&mut self, name: &str) -> BytesStart<'static> {
        self.create_ns_element("s", name)
    }

    fn create_ns_element(&mut self, ns: &str, name: &str) -> BytesStart<'static> {
        let mut start = BytesStart::new(format!("{}:{}", ns, name));
        self.apply_ns(&mut start);
        start
    }

    /// Attach the pending namespace declarations, if any, to this element.
    pub fn apply_ns(&mut self, start: &mut BytesStart<'static>) {
        if !self.ns_to_apply.is_empty() {
            start.extend_attributes(
                self.ns_to_apply
                    .iter()
                    .map(|(k, n)| (k.as_str(), n.as_str())),
            );
            self.ns_to_apply.clear()
        }
    }

    /// Write `<start>text</start>`
    pub fn text_element(
        &mut self,
        start: BytesStart<'static>,
        text: &str,
    ) -> Result<(), quick_xml::Error> {
        let end = start.to_end().into_owned();
        self.q.write_event(Event::Start(start))?;
        self.q.write_event(Event::Text(BytesText::new(text)))?;
        self.q.write_event(Event::End(end))
    }
}

/// Transform an XML stream of characters into a Rust object
pub struct Reader<T: IRead> {
    pub rdr: NsReader<T>,
    cur: Event<'static>,
    parents: Vec<Event<'static>>,
    buf: Vec<u8>,
}
impl<T: IRead> Reader<T> {
    pub fn new(mut rdr: NsReader<T>) -> Result<Self, DecodeError> {
        let mut buf: Vec<u8> = vec![];
        let cur = rdr.read_event_into(&mut buf)?.into_owned();
        let parents = vec![];
        buf.clear();
        Ok(Self {
            cur,
            parents,
            rdr,
            buf,
        })
    }

    /// read one more tag
    /// do not expose it publicly
    fn next(&mut self) -> Result<Event<'static>, DecodeError> {
        let evt = self.rdr.read_event_into(&mut self.buf)?.into_owned();
        self.buf.clear();
        Ok(std::mem::replace(&mut self.cur, evt))
    }

    /// skip a node at current level
    pub fn skip(&mut self) -> Result<Event<'static>, DecodeError> {
        match &self.cur {
            Event::Start(b) => {
                tracing::trace!(node=?b.name(), "skipping unknown node");
                let _span = self.rdr.read_to_end_into(b.to_end().name(), &mut self.buf)?;
                self.buf.clear();
                self.next()
            }
            Event::End(_) => Err(DecodeError::WrongToken),
            Event::Eof => Err(DecodeError::Eof),
            _ => self.next(),
        }
    }

    /// check if this is the desired tag
    fn is_tag(&self, ns: &[u8], key: &str) -> bool {
        match self.current_name() {
            Some((ResolveResult::Bound(v), local)) => local == key && v.into_inner() == ns,
            _ => false,
        }
    }

    /// check the local name only, whatever the namespace
    fn is_local_tag(&self, key: &str) -> bool {
        matches!(self.current_name(), Some((_, local)) if local == key)
    }

    fn current_name(&self) -> Option<(ResolveResult<'_>, String)> {
        let qname = match self.peek() {
            Event::Start(bs) | Event::Empty(bs) => bs.name(),
            Event::End(be) => be.name(),
            _ => return None,
        };

        let (extr_ns, local) = self.rdr.resolve_element(qname);
        let local = std::str::from_utf8(local.into_inner()).ok()?.to_string();
        Some((extr_ns, local))
    }

    /// Namespace URI and local name of the element under the cursor
    pub fn element_name(&self) -> Option<(Option<String>, String)> {
        let (ns, local) = self.current_name()?;
        let ns = match ns {
            ResolveResult::Bound(v) => {
                Some(String::from_utf8_lossy(v.into_inner()).into_owned())
            }
            _ => None,
        };
        Some((ns, local))
    }

    pub fn parent_has_child(&self) -> bool {
        matches!(self.parents.last(), Some(Event::Start(_)) | None)
    }

    fn ensure_parent_has_child(&self) -> Result<(), DecodeError> {
        match self.parent_has_child() {
            true => Ok(()),
            false => Err(DecodeError::Recoverable),
        }
    }

    pub fn peek(&self) -> &Event<'static> {
        &self.cur
    }

    /// Text content of the opened element, empty for a self-closed one.
    pub fn tag_string(&mut self) -> Result<String, DecodeError> {
        let mut acc = String::new();
        if !self.parent_has_child() {
            return Ok(acc);
        }

        loop {
            match self.peek() {
                Event::CData(unescaped) => {
                    acc.push_str(std::str::from_utf8(unescaped.as_ref())?);
                    self.next()?
                }
                Event::Text(escaped) => {
                    acc.push_str(escaped.unescape()?.as_ref());
                    self.next()?
                }
                Event::End(_) | Event::Start(_) | Event::Empty(_) => return Ok(acc),
                Event::Eof => return Err(DecodeError::Eof),
                _ => self.next()?,
            };
        }
    }

    pub fn maybe_read<N: Node<N>>(
        &mut self,
        t: &mut Option<N>,
        dirty: &mut bool,
    ) -> Result<(), DecodeError> {
        if !self.parent_has_child() {
            return Ok(());
        }

        match N::qread(self) {
            Ok(v) => {
                *t = Some(v);
                *dirty = true;
                Ok(())
            }
            Err(DecodeError::Recoverable) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn maybe_push<N: Node<N>>(
        &mut self,
        t: &mut Vec<N>,
        dirty: &mut bool,
    ) -> Result<(), DecodeError> {
        if !self.parent_has_child() {
            return Ok(());
        }

        match N::qread(self) {
            Ok(v) => {
                t.push(v);
                *dirty = true;
                Ok(())
            }
            Err(DecodeError::Recoverable) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn find<N: Node<N>>(&mut self) -> Result<N, DecodeError> {
        self.ensure_parent_has_child()?;

        loop {
            // Try parse
            match N::qread(self) {
                Err(DecodeError::Recoverable) => (),
                otherwise => return otherwise,
            }

            // If recovered, skip the element
            self.skip()?;
        }
    }

    pub fn collect<N: Node<N>>(&mut self) -> Result<Vec<N>, DecodeError> {
        let mut acc = Vec::new();
        if !self.parent_has_child() {
            return Ok(acc);
        }

        loop {
            match N::qread(self) {
                Err(DecodeError::Recoverable) => match self.peek() {
                    Event::End(_) => return Ok(acc),
                    _ => {
                        self.skip()?;
                    }
                },
                Ok(v) => acc.push(v),
                Err(e) => return Err(e),
            }
        }
    }

    /// Loop over the children of the opened element until its end tag,
    /// skipping the ones `step` did not consume.
    pub fn children(
        &mut self,
        mut step: impl FnMut(&mut Self) -> Result<bool, DecodeError>,
    ) -> Result<(), DecodeError> {
        if !self.parent_has_child() {
            return Ok(());
        }

        loop {
            let dirty = step(self)?;
            if !dirty {
                match self.peek() {
                    Event::End(_) => return Ok(()),
                    _ => {
                        self.skip()?;
                    }
                };
            }
        }
    }

    pub fn open(&mut self, ns: &[u8], key: &str) -> Result<Event<'static>, DecodeError> {
        let matched = self.is_tag(ns, key);
        self.open_if(matched)
    }

    /// Open an element matched on its local name, whatever its namespace
    pub fn open_local(&mut self, key: &str) -> Result<Event<'static>, DecodeError> {
        let matched = self.is_local_tag(key);
        self.open_if(matched)
    }

    /// Open the element under the cursor, whatever its name
    pub fn open_any(&mut self) -> Result<Event<'static>, DecodeError> {
        self.open_if(true)
    }

    fn open_if(&mut self, matched: bool) -> Result<Event<'static>, DecodeError> {
        let evt = match self.peek() {
            // an empty node is opened without moving the cursor,
            // close() will move past it
            Event::Empty(_) if matched => self.cur.clone(),
            Event::Start(_) if matched => self.next()?,
            _ => return Err(DecodeError::Recoverable),
        };

        self.parents.push(evt.clone());
        Ok(evt)
    }

    pub fn maybe_open(
        &mut self,
        ns: &[u8],
        key: &str,
    ) -> Result<Option<Event<'static>>, DecodeError> {
        match self.open(ns, key) {
            Ok(v) => Ok(Some(v)),
            Err(DecodeError::Recoverable) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn maybe_open_local(&mut self, key: &str) -> Result<Option<Event<'static>>, DecodeError> {
        match self.open_local(key) {
            Ok(v) => Ok(Some(v)),
            Err(DecodeError::Recoverable) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // find stop tag
    pub fn close(&mut self) -> Result<Event<'static>, DecodeError> {
        // Handle the empty case
        if !self.parent_has_child() {
            self.parents.pop();
            return self.next();
        }

        // Handle the start/end case
        loop {
            match self.peek() {
                Event::End(_) => {
                    self.parents.pop();
                    return self.next();
                }
                _ => self.skip()?,
            };
        }
    }
}
