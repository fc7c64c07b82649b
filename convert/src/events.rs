//! Tag events read from XSD text.
//!
//! The builder only needs start tags with their attributes and end tags.
//! [`TagEvents`] pulls those out of a `quick-xml` reader: names are reduced
//! to their local part, namespace declarations are dropped, self-closing
//! tags become a start/end pair, and text, comments, CDATA, DOCTYPE and
//! processing instructions are skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{ConvertError, Result};

/// An opening tag and its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One structural event of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Start(StartTag),
    End(String),
}

/// Pull iterator over the tag events of an XML string.
///
/// Stops after the first error. Input that ends while tags are still open
/// is an error too.
///
/// # Examples
///
/// ```
/// use xsd2json_convert::events::{TagEvent, TagEvents};
///
/// let xml = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///   <xs:element name="doc" type="xs:string"/>
/// </xs:schema>"#;
///
/// let events: Vec<TagEvent> = TagEvents::new(xml).collect::<Result<_, _>>().unwrap();
/// assert_eq!(events.len(), 4);
/// assert!(matches!(&events[1], TagEvent::Start(tag) if tag.attr("name") == Some("doc")));
/// assert_eq!(events[2], TagEvent::End("element".to_string()));
/// ```
pub struct TagEvents<'a> {
    reader: Reader<&'a [u8]>,
    pending_end: Option<String>,
    // Start tags not yet closed.
    depth: usize,
    finished: bool,
}

impl<'a> TagEvents<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
            pending_end: None,
            depth: 0,
            finished: false,
        }
    }

    fn fail(&mut self, message: String) -> ConvertError {
        self.fail_at(self.reader.error_position() as u64, message)
    }

    fn fail_at(&mut self, position: u64, message: String) -> ConvertError {
        self.finished = true;
        ConvertError::Xml { position, message }
    }

    fn start_tag(&mut self, start: &BytesStart<'_>) -> Result<StartTag> {
        let mut tag = StartTag::new(lossy(start.local_name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.fail(err.to_string()))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|err| self.fail(err.to_string()))?;
            tag.attributes
                .push((lossy(attr.key.local_name().as_ref()), value.into_owned()));
        }
        Ok(tag)
    }
}

impl Iterator for TagEvents<'_> {
    type Item = Result<TagEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending_end.take() {
            return Some(Ok(TagEvent::End(name)));
        }
        if self.finished {
            return None;
        }
        loop {
            match self.reader.read_event() {
                Ok(Event::Start(start)) => {
                    self.depth += 1;
                    return Some(self.start_tag(&start).map(TagEvent::Start));
                }
                Ok(Event::Empty(start)) => {
                    let tag = self.start_tag(&start).map(|tag| {
                        self.pending_end = Some(tag.name.clone());
                        TagEvent::Start(tag)
                    });
                    return Some(tag);
                }
                Ok(Event::End(end)) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Some(Ok(TagEvent::End(lossy(end.local_name().as_ref()))));
                }
                Ok(Event::Eof) if self.depth > 0 => {
                    let position = self.reader.buffer_position() as u64;
                    let message =
                        format!("unexpected end of input: {} unclosed tag(s)", self.depth);
                    return Some(Err(self.fail_at(position, message)));
                }
                Ok(Event::Eof) => {
                    self.finished = true;
                    return None;
                }
                Ok(_) => continue,
                Err(err) => return Some(Err(self.fail(err.to_string()))),
            }
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
