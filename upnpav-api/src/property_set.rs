//! Flat property sets decoded from UPnP event documents
//!
//! Two document shapes carry state variables:
//!
//! * the GENA event body, one `<e:property>` per variable:
//!   ```xml
//!   <e:propertyset xmlns:e="urn:schemas-upnp-org:event-1-0">
//!     <e:property><LastChange>...escaped document...</LastChange></e:property>
//!   </e:propertyset>
//!   ```
//! * the LastChange document embedded in the variable above, one element
//!   per variable with the value in a `val` attribute:
//!   ```xml
//!   <Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/">
//!     <InstanceID val="0">
//!       <TransportState val="PLAYING"/>
//!     </InstanceID>
//!   </Event>
//!   ```

use std::collections::HashMap;

use tracing::error;
use xmltree::{Element, XMLNode};

use crate::{ApiError, Result};

/// Property name to raw string value; keys are unique, order is irrelevant
pub type PropertySet = HashMap<String, String>;

/// A decoded LastChange document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastChange {
    /// Every variable that carried a `val` attribute, plus `InstanceID`
    pub properties: PropertySet,
    /// Variable elements that had no `val` attribute and were skipped
    pub malformed: Vec<String>,
}

/// Decode a GENA `propertyset` body into a property set
pub fn parse_event_body(xml: &str) -> Result<PropertySet> {
    let root = parse_root(xml)?;
    if root.name != "propertyset" {
        return Err(ApiError::ParseError(format!(
            "expected propertyset, found {}",
            root.name
        )));
    }

    let mut properties = PropertySet::new();
    for property in child_elements(&root).filter(|e| e.name == "property") {
        for variable in child_elements(property) {
            let value = variable.get_text().map(|t| t.into_owned()).unwrap_or_default();
            properties.insert(variable.name.clone(), value);
        }
    }
    Ok(properties)
}

/// Decode the LastChange document carried inside an event
///
/// A document that is not well-formed XML, or whose root is not `Event`, is
/// an error: the whole notification must then be dropped. Individual
/// variables without a `val` attribute are only reported in
/// [`LastChange::malformed`].
pub fn decode_last_change(xml: &str) -> Result<LastChange> {
    let root = parse_root(xml)?;
    if root.name != "Event" {
        return Err(ApiError::ParseError(format!(
            "LastChange root is {}, expected Event",
            root.name
        )));
    }

    let mut decoded = LastChange::default();
    for instance in child_elements(&root).filter(|e| e.name == "InstanceID") {
        if let Some(id) = instance.attributes.get("val") {
            decoded.properties.insert("InstanceID".to_string(), id.clone());
        }
        for variable in child_elements(instance) {
            match variable.attributes.get("val") {
                Some(value) => {
                    decoded.properties.insert(variable.name.clone(), value.clone());
                }
                None => {
                    error!(variable = %variable.name, "LastChange variable without val attribute");
                    decoded.malformed.push(variable.name.clone());
                }
            }
        }
    }
    Ok(decoded)
}

fn parse_root(xml: &str) -> Result<Element> {
    Element::parse(xml.trim().as_bytes())
        .map_err(|e| ApiError::ParseError(format!("bad property document: {}", e)))
}

pub(crate) fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}
