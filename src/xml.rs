use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::ThemeError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Ordered 0..n child elements with the given local name. Every traversal
    /// site goes through this so single-vs-repeated cardinality never matters.
    pub fn sequence<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&Element> {
        self.sequence(name).next()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.find(name)
            .map(|child| child.text.trim())
            .filter(|text| !text.is_empty())
    }
}

pub fn parse(xml: &str) -> Result<Element, ThemeError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|err| ThemeError::CapabilitiesParse(err.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&value);
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(ThemeError::CapabilitiesParse(err.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(parse_error("unexpected end of document"));
    }
    root.ok_or_else(|| parse_error("empty document"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, ThemeError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| ThemeError::CapabilitiesParse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| ThemeError::CapabilitiesParse(err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ThemeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(parse_error("multiple root elements"));
    }
    *root = Some(element);
    Ok(())
}

fn parse_error(message: &str) -> ThemeError {
    ThemeError::CapabilitiesParse(message.to_string())
}
