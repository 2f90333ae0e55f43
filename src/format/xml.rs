//! Event-level codec between markup-tag documents and the value tree.
//!
//! Elements with child elements become objects, repeated sibling tags fold
//! into arrays, and element text becomes a string. The root element is a
//! wrapper: `decode` returns its content and `encode` adds it back.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use crate::error::BoxError;

pub(super) fn decode(text: &str) -> Result<Value, BoxError> {
    let mut reader = Reader::from_str(text);
    loop {
        match reader.read_event()? {
            Event::Start(_) => return read_element(&mut reader),
            Event::Empty(_) => return Ok(Value::Object(Map::new())),
            Event::Text(t) => {
                if !t.unescape()?.trim().is_empty() {
                    return Err("text outside of a root element".into());
                }
            }
            Event::Eof => return Err("document has no root element".into()),
            // declaration, comments, doctype
            _ => {}
        }
    }
}

/// Read the content of the element whose `Start` tag was just consumed,
/// up to and including its `End` tag.
fn read_element(reader: &mut Reader<&[u8]>) -> Result<Value, BoxError> {
    let mut children: Vec<(String, Value)> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let child = read_element(reader)?;
                children.push((name, child));
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                children.push((name, Value::String(String::new())));
            }
            Event::Text(t) => {
                let unescaped = t.unescape()?;
                let trimmed = unescaped.trim();
                if !trimmed.is_empty() {
                    text.push_str(trimmed);
                }
            }
            Event::CData(data) => {
                text.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Event::End(_) => break,
            Event::Eof => return Err("unexpected end of document inside an element".into()),
            _ => {}
        }
    }

    if children.is_empty() {
        return Ok(Value::String(text));
    }

    let mut map = Map::with_capacity(children.len());
    for (name, value) in children {
        match map.get_mut(&name) {
            // repeated sibling tags fold into an array, in document order
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(name, value);
            }
        }
    }
    Ok(Value::Object(map))
}

pub(super) fn encode(root: &str, value: &Value) -> Result<String, BoxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, root, value)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), BoxError> {
    match value {
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        // arrays render as repeated sibling tags under the parent
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::String(s) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(s)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        scalar => {
            let rendered = scalar.to_string();
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&rendered)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}
