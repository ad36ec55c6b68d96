use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlTreeError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("document has no root element")]
    NoRoot,
    #[error("unexpected closing tag")]
    Unbalanced,
}

/// A node of the generic tree. Leaves without children or attributes collapse
/// to `Scalar`, anything with structure becomes `Compound`.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Scalar(Option<String>),
    Compound(XmlElement),
}

/// Children in document order. Attributes are stored as entries prefixed with `@`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub entries: Vec<(String, XmlValue)>,
    pub text: Option<String>,
}

impl XmlValue {
    pub fn is_compound(&self) -> bool {
        matches!(self, XmlValue::Compound(_))
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Compound(el) => Some(el),
            XmlValue::Scalar(_) => None,
        }
    }

    /// Text content; for compound values this is the text mixed between children.
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlValue::Scalar(text) => text.as_deref(),
            XmlValue::Compound(el) => el.text.as_deref(),
        }
    }
}

impl XmlElement {
    /// First entry with the given name. Repeated names are kept but only the
    /// first is reachable here.
    pub fn get(&self, name: &str) -> Option<&XmlValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Child elements, skipping `@attribute` entries.
    pub fn children(&self) -> impl Iterator<Item = (&str, &XmlValue)> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .map(|(key, value)| (key.as_str(), value))
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    fn into_value(self) -> XmlValue {
        if self.entries.is_empty() {
            XmlValue::Scalar(self.text)
        } else {
            XmlValue::Compound(self)
        }
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<(String, XmlElement), XmlTreeError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::default();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr.unescape_value()?.into_owned();
        element.entries.push((key, XmlValue::Scalar(Some(value))));
    }
    Ok((name, element))
}

/// Parses a whole document into `(root_name, root_value)`.
pub fn parse_document(xml: &str) -> Result<(String, XmlValue), XmlTreeError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<(String, XmlElement)> = Vec::new();
    let mut root: Option<(String, XmlValue)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let (name, element) = open_element(&start)?;
                attach(&mut stack, &mut root, name, element.into_value());
            }
            Event::Text(text) => {
                if let Some((_, parent)) = stack.last_mut() {
                    parent.push_text(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some((_, parent)) = stack.last_mut() {
                    parent.push_text(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let (name, element) = stack.pop().ok_or(XmlTreeError::Unbalanced)?;
                attach(&mut stack, &mut root, name, element.into_value());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlTreeError::Unbalanced);
    }
    root.ok_or(XmlTreeError::NoRoot)
}

fn attach(
    stack: &mut [(String, XmlElement)],
    root: &mut Option<(String, XmlValue)>,
    name: String,
    value: XmlValue,
) {
    match stack.last_mut() {
        Some((_, parent)) => parent.entries.push((name, value)),
        None => {
            if root.is_none() {
                *root = Some((name, value));
            }
        }
    }
}
