use std::fmt;

use super::status;
use super::time::Time;

// ---- Documents ----

/// The body of a `207 Multi-Status` response
///
/// <!ELEMENT multistatus (response*, responsedescription?) >
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Multistatus {
    pub responses: Vec<Response>,
}

/// One resource of a multistatus
///
/// <!ELEMENT response (href, propstat+, responsedescription?) >
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Response {
    pub href: String,
    pub props: Prop,
}

/// What we know about a resource, all the `propstat` blocks of a
/// response folded together.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Prop {
    /// Raw status line, eg. `HTTP/1.1 200 OK`
    pub status: String,
    pub name: Option<String>,
    pub is_collection: bool,
    /// 0 when the server did not send `getcontentlength`
    pub size: i64,
    pub modified: Option<Time>,
}

impl Prop {
    pub fn status_ok(&self) -> bool {
        status::status_ok(&self.status)
    }

    pub fn status_code(&self) -> Option<http::StatusCode> {
        status::parse_status_line(&self.status)?.status_code()
    }

    /// Fold one more `propstat` in, later blocks win
    pub(crate) fn merge(&mut self, propstat: PropStat) {
        if let Some(Status(status)) = propstat.status {
            self.status = status;
        }

        let Some(PropList(properties)) = propstat.prop else {
            return;
        };
        for property in properties {
            match property {
                Property::DisplayName(name) => self.name = Some(name),
                Property::ResourceType(rt) => {
                    self.is_collection |= rt.contains(&ResourceType::Collection)
                }
                Property::GetContentLength(size) => self.size = size,
                Property::GetLastModified(modified) => self.modified = Some(modified),
            }
        }
    }
}

/// An error document as sent by SabreDAV based servers (Nextcloud, ownCloud...)
///
/// ```xml
/// <d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
///   <s:exception>Sabre\DAV\Exception\NotFound</s:exception>
///   <s:message>File with name Photo could not be located</s:message>
/// </d:error>
/// ```
///
/// `status` and `status_code` come from the HTTP response line,
/// they are never read from nor written to XML.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Error {
    pub exception: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub status_code: u16,
}

impl Error {
    /// Build the error of a failed request from its status and body.
    /// A body that is not an error document is kept as the message.
    pub fn from_response(status: http::StatusCode, body: &[u8]) -> Self {
        let mut err = match crate::decode_error(body) {
            Ok(err) => err,
            Err(e) => {
                tracing::debug!(err=?e, code=status.as_u16(), "body is not a DAV error document");
                let txt = String::from_utf8_lossy(body).trim().to_string();
                Self {
                    message: (!txt.is_empty()).then_some(txt),
                    ..Self::default()
                }
            }
        };

        err.status = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_str(), reason),
            None => status.as_str().to_string(),
        };
        err.status_code = status.as_u16();
        err
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        match (non_empty(&self.message), non_empty(&self.exception)) {
            (Some(message), _) => write!(f, "{}", message),
            (None, Some(exception)) => write!(f, "{}", exception),
            (None, None) if !self.status.is_empty() => write!(f, "{}", self.status),
            _ => write!(f, "Webdav Error"),
        }
    }
}

impl std::error::Error for Error {}

/// A tagged name and value, ie. any property reduced to its text
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PropValue {
    /// Namespace URI, `None` when the element is not in a namespace
    pub namespace: Option<String>,
    pub name: String,
    pub value: String,
}

// ---- Elements ----

/// <!ELEMENT href (#PCDATA)>
#[derive(Debug, PartialEq, Clone)]
pub struct Href(pub String);

/// <!ELEMENT propstat (prop, status, error?, responsedescription?) >
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PropStat {
    pub prop: Option<PropList>,
    pub status: Option<Status>,
}

impl From<&Prop> for PropStat {
    fn from(value: &Prop) -> Self {
        let mut properties = Vec::new();
        if let Some(name) = &value.name {
            properties.push(Property::DisplayName(name.clone()));
        }
        if value.is_collection {
            properties.push(Property::ResourceType(vec![ResourceType::Collection]));
        }
        if value.size != 0 {
            properties.push(Property::GetContentLength(value.size));
        }
        if let Some(modified) = value.modified {
            properties.push(Property::GetLastModified(modified));
        }

        Self {
            prop: Some(PropList(properties)),
            status: Some(Status(value.status.clone())),
        }
    }
}

/// The `prop` element of a `propstat`, only the properties we know of are kept
#[derive(Debug, PartialEq, Clone, Default)]
pub struct PropList(pub Vec<Property>);

#[derive(Debug, PartialEq, Clone)]
pub enum Property {
    /// <!ELEMENT displayname (#PCDATA) >
    DisplayName(String),
    /// <!ELEMENT resourcetype ANY >
    ResourceType(Vec<ResourceType>),
    /// <!ELEMENT getcontentlength (#PCDATA) >
    GetContentLength(i64),
    /// <!ELEMENT getlastmodified (#PCDATA) >
    GetLastModified(Time),
}

#[derive(Debug, PartialEq, Clone)]
pub enum ResourceType {
    Collection,
}

/// <!ELEMENT status (#PCDATA) >
#[derive(Debug, PartialEq, Clone)]
pub struct Status(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str, exception: &str, status: &str) -> Error {
        Error {
            message: Some(message.into()),
            exception: Some(exception.into()),
            status: status.into(),
            status_code: 0,
        }
    }

    #[test]
    fn error_display_priority() {
        assert_eq!(error("msg", "exc", "404 Not Found").to_string(), "msg");
        assert_eq!(error("", "exc", "404 Not Found").to_string(), "exc");
        assert_eq!(error("", "", "404 Not Found").to_string(), "404 Not Found");
        assert_eq!(error("", "", "").to_string(), "Webdav Error");
        assert_eq!(Error::default().to_string(), "Webdav Error");
    }

    #[test]
    fn error_from_xml_response() {
        let body = br#"<?xml version="1.0" encoding="utf-8"?>
<d:error xmlns:d="DAV:" xmlns:s="http://sabredav.org/ns">
  <s:exception>Sabre\DAV\Exception\NotFound</s:exception>
  <s:message>File with name Photo could not be located</s:message>
</d:error>"#;
        let err = Error::from_response(http::StatusCode::NOT_FOUND, body);
        assert_eq!(
            err,
            Error {
                exception: Some(r"Sabre\DAV\Exception\NotFound".into()),
                message: Some("File with name Photo could not be located".into()),
                status: "404 Not Found".into(),
                status_code: 404,
            }
        );
        assert_eq!(err.to_string(), "File with name Photo could not be located");
    }

    #[test]
    fn error_from_plain_text_response() {
        let err = Error::from_response(
            http::StatusCode::FORBIDDEN,
            b"  Access to this folder is denied\n",
        );
        assert_eq!(err.message.as_deref(), Some("Access to this folder is denied"));
        assert_eq!(err.exception, None);
        assert_eq!(err.status, "403 Forbidden");
        assert_eq!(err.status_code, 403);
    }

    #[test]
    fn error_from_empty_response() {
        let err = Error::from_response(http::StatusCode::BAD_GATEWAY, b"");
        assert_eq!(err.message, None);
        assert_eq!(err.to_string(), "502 Bad Gateway");
    }

    #[test]
    fn merge_propstats() {
        let mut prop = Prop::default();
        prop.merge(PropStat {
            prop: Some(PropList(vec![
                Property::DisplayName("a".into()),
                Property::ResourceType(vec![ResourceType::Collection]),
            ])),
            status: Some(Status("HTTP/1.1 200 OK".into())),
        });
        prop.merge(PropStat {
            prop: Some(PropList(vec![Property::ResourceType(vec![])])),
            status: Some(Status("HTTP/1.1 404 Not Found".into())),
        });

        assert_eq!(prop.name.as_deref(), Some("a"));
        assert!(prop.is_collection);
        assert_eq!(prop.status, "HTTP/1.1 404 Not Found");
        assert_eq!(prop.status_code(), Some(http::StatusCode::NOT_FOUND));
        assert!(!prop.status_ok());
    }

    #[test]
    fn propstat_from_prop_omits_empty_fields() {
        let propstat = PropStat::from(&Prop {
            status: "HTTP/1.1 200 OK".into(),
            ..Prop::default()
        });
        assert_eq!(
            propstat,
            PropStat {
                prop: Some(PropList(vec![])),
                status: Some(Status("HTTP/1.1 200 OK".into())),
            }
        );
    }
}
