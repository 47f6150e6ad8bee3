//! Response parsing into a generic tree.
//!
//! # Shape
//! - The root element is unwrapped; its children become top-level keys
//! - An element with child elements becomes an object
//! - A leaf element becomes its trimmed text (CDATA included); empty → `""`
//! - Repeated sibling names become an array, a single occurrence does not
//! - Attributes land under `@attributes`
//! - Text of an element that is also an object (attributes or child
//!   elements) is kept, trimmed, under `#text`
//!
//! The single-vs-array ambiguity is deliberately left in place for the
//! response adapters to resolve.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Key holding the text of an element that is rendered as an object.
pub const TEXT_KEY: &str = "#text";

/// Errors raised while decoding a response body.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("response body is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed XML: {0}")]
    Malformed(&'static str),
}

/// An element being assembled while its children are read.
struct Frame {
    name: String,
    attributes: Option<Map<String, Value>>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, CodecError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();

        let mut attributes = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.insert(key, Value::String(value));
        }

        Ok(Self {
            name,
            attributes: (!attributes.is_empty()).then_some(attributes),
            children: Map::new(),
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.children.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.children.insert(name, value);
            }
        }
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();

        if self.attributes.is_none() && self.children.is_empty() {
            return Value::String(text.to_string());
        }

        let mut object = Map::new();
        if let Some(attributes) = self.attributes {
            object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
        }
        object.extend(self.children);
        if !text.is_empty() {
            object.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
        Value::Object(object)
    }
}

/// Parse an XML response body.
///
/// # Errors
/// Returns [`CodecError`] if the body is not a single well-formed XML document.
pub fn parse_response(body: &[u8]) -> Result<Value, CodecError> {
    let xml = std::str::from_utf8(body)?;
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(CodecError::Malformed("multiple root elements"));
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(CodecError::Malformed("multiple root elements"));
                }
                let frame = Frame::open(&start)?;
                finish(frame, &mut stack, &mut root);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or(CodecError::Malformed("closing tag without opening tag"))?;
                finish(frame, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                push_text(&mut stack, std::str::from_utf8(&bytes)?)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::Malformed("unclosed element at end of document"));
    }

    root.ok_or(CodecError::Malformed("document has no root element"))
}

fn finish(frame: Frame, stack: &mut [Frame], root: &mut Option<Value>) {
    let name = frame.name.clone();
    let value = frame.into_value();
    match stack.last_mut() {
        Some(parent) => parent.add_child(name, value),
        None => *root = Some(value),
    }
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(CodecError::Malformed("text outside the root element")),
    }
}
