use quick_xml::events::{BytesStart, Event};
use quick_xml::Error as QError;

use super::types::*;
use super::xml::{IWrite, QWrite, Writer, DAV_URN};

// --- XML ROOTS

/// PROPFIND RESPONSE, PROPPATCH RESPONSE, COPY RESPONSE, MOVE RESPONSE
/// DELETE RESPONSE,
impl QWrite for Multistatus {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("multistatus");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        for response in self.responses.iter() {
            response.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

/// Error response, `status` and `status_code` belong to the HTTP layer
impl QWrite for Error {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("error");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(exception) = &self.exception {
            let elem = xml.create_sabre_element("exception");
            xml.text_element(elem, exception)?;
        }
        if let Some(message) = &self.message {
            let elem = xml.create_sabre_element("message");
            xml.text_element(elem, message)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for PropValue {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = match self.namespace.as_deref() {
            Some(ns) if ns.as_bytes() == DAV_URN => xml.create_dav_element(&self.name),
            Some(ns) => {
                let mut start = BytesStart::new(self.name.clone());
                xml.apply_ns(&mut start);
                start.push_attribute(("xmlns", ns));
                start
            }
            None => {
                let mut start = BytesStart::new(self.name.clone());
                xml.apply_ns(&mut start);
                start
            }
        };
        xml.text_element(start, &self.value)
    }
}

// --- XML inner elements

impl QWrite for Response {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("response");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        Href(self.href.clone()).qwrite(xml)?;
        PropStat::from(&self.props).qwrite(xml)?;
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for PropStat {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("propstat");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        if let Some(prop) = &self.prop {
            prop.qwrite(xml)?;
        }
        if let Some(status) = &self.status {
            status.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for PropList {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("prop");
        let end = start.to_end();

        xml.q.write_event(Event::Start(start.clone()))?;
        for property in self.0.iter() {
            property.qwrite(xml)?;
        }
        xml.q.write_event(Event::End(end))
    }
}

impl QWrite for Property {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        match self {
            Self::DisplayName(name) => {
                let start = xml.create_dav_element("displayname");
                xml.text_element(start, name)
            }
            Self::ResourceType(many_types) => {
                let start = xml.create_dav_element("resourcetype");
                if many_types.is_empty() {
                    return xml.q.write_event(Event::Empty(start));
                }

                let end = start.to_end();
                xml.q.write_event(Event::Start(start.clone()))?;
                for restype in many_types.iter() {
                    restype.qwrite(xml)?;
                }
                xml.q.write_event(Event::End(end))
            }
            Self::GetContentLength(size) => {
                let start = xml.create_dav_element("getcontentlength");
                xml.text_element(start, &size.to_string())
            }
            Self::GetLastModified(modified) => {
                let start = xml.create_dav_element("getlastmodified");
                xml.text_element(start, &modified.encode())
            }
        }
    }
}

impl QWrite for ResourceType {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        match self {
            Self::Collection => {
                let empty_tag = xml.create_dav_element("collection");
                xml.q.write_event(Event::Empty(empty_tag))
            }
        }
    }
}

impl QWrite for Status {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("status");
        xml.text_element(start, &self.0)
    }
}

impl QWrite for Href {
    fn qwrite(&self, xml: &mut Writer<impl IWrite>) -> Result<(), QError> {
        let start = xml.create_dav_element("href");
        xml.text_element(start, &self.0)
    }
}
