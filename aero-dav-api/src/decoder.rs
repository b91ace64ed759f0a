use super::error::DecodeError;
use super::time::Time;
use super::types::*;
use super::xml::{IRead, QRead, Reader, DAV_URN};

// ---- ROOT ----

/// Generic response
impl QRead<Multistatus> for Multistatus {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "multistatus")?;
        let responses = xml.collect::<Response>()?;
        xml.close()?;
        Ok(Multistatus { responses })
    }
}

/// Error response, matched on local names only as vendors
/// put their own elements in it.
impl QRead<Error> for Error {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open_local("error")?;
        let (mut exception, mut message) = (None, None);

        xml.children(|xml| {
            if xml.maybe_open_local("exception")?.is_some() {
                exception = Some(xml.tag_string()?);
                xml.close()?;
                return Ok(true);
            }
            if xml.maybe_open_local("message")?.is_some() {
                message = Some(xml.tag_string()?);
                xml.close()?;
                return Ok(true);
            }
            Ok(false)
        })?;

        xml.close()?;
        Ok(Error {
            exception,
            message,
            ..Error::default()
        })
    }
}

/// Any single element, reduced to its name and text
impl QRead<PropValue> for PropValue {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        let (namespace, name) = xml.element_name().ok_or(DecodeError::Recoverable)?;
        xml.open_any()?;
        let value = xml.tag_string()?;
        xml.close()?;
        Ok(PropValue {
            namespace,
            name,
            value,
        })
    }
}

// ---- INNER XML ----

impl QRead<Response> for Response {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "response")?;
        let mut href = None;
        let mut propstat = Vec::new();

        xml.children(|xml| {
            let mut dirty = false;
            xml.maybe_read::<Href>(&mut href, &mut dirty)?;
            xml.maybe_push::<PropStat>(&mut propstat, &mut dirty)?;
            Ok(dirty)
        })?;

        xml.close()?;
        let mut props = Prop::default();
        for ps in propstat {
            props.merge(ps);
        }
        Ok(Response {
            href: href.map(|Href(v)| v).unwrap_or_default(),
            props,
        })
    }
}

impl QRead<PropStat> for PropStat {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "propstat")?;
        let (mut prop, mut status) = (None, None);

        xml.children(|xml| {
            let mut dirty = false;
            xml.maybe_read::<PropList>(&mut prop, &mut dirty)?;
            xml.maybe_read::<Status>(&mut status, &mut dirty)?;
            Ok(dirty)
        })?;

        xml.close()?;
        Ok(PropStat { prop, status })
    }
}

impl QRead<PropList> for PropList {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "prop")?;
        let acc = xml.collect::<Property>()?;
        xml.close()?;
        Ok(PropList(acc))
    }
}

impl QRead<Property> for Property {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        if xml.maybe_open(DAV_URN, "displayname")?.is_some() {
            let name = xml.tag_string()?;
            xml.close()?;
            return Ok(Property::DisplayName(name));
        } else if xml.maybe_open(DAV_URN, "resourcetype")?.is_some() {
            let acc = xml.collect::<ResourceType>()?;
            xml.close()?;
            return Ok(Property::ResourceType(acc));
        } else if xml.maybe_open(DAV_URN, "getcontentlength")?.is_some() {
            let txt = xml.tag_string()?;
            let size = match txt.trim() {
                "" => 0,
                v => v.parse::<i64>()?,
            };
            xml.close()?;
            return Ok(Property::GetContentLength(size));
        } else if xml.maybe_open(DAV_URN, "getlastmodified")?.is_some() {
            let datestr = xml.tag_string()?;
            xml.close()?;
            return Ok(Property::GetLastModified(Time::decode(&datestr)?));
        }

        // Not a property we care about, the caller skips it
        Err(DecodeError::Recoverable)
    }
}

impl QRead<ResourceType> for ResourceType {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "collection")?;
        xml.close()?;
        Ok(ResourceType::Collection)
    }
}

impl QRead<Status> for Status {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "status")?;
        let fullcode = xml.tag_string()?;
        xml.close()?;
        Ok(Status(fullcode))
    }
}

impl QRead<Href> for Href {
    fn qread(xml: &mut Reader<impl IRead>) -> Result<Self, DecodeError> {
        xml.open(DAV_URN, "href")?;
        let url = xml.tag_string()?;
        xml.close()?;
        Ok(Href(url))
    }
}
