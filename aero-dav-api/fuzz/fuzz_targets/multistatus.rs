#![no_main]

use libfuzzer_sys::arbitrary;
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use aero_dav_api::{decode_multistatus, encode_multistatus};

const TOKENS: [&str; 31] = [
    "0",
    "1",
    "-1",
    "4525",
    "utf-8",
    "DAV:",
    "D",
    "xmlns:D",
    "http://sabredav.org/ns",
    "HTTP/1.1 200 OK",
    "HTTP/1.1 404 Not Found",
    "HTTP/1.1",
    "garbage",
    "Wed, 27 Sep 2017 14:28:34 GMT",
    "Mon, 12 Jan 1998 09:25:56 GMT",
    "1997-12-01T18:27:21-08:00",
    "/remote.php/webdav/",
    "a &amp; b",
    "collection",
    "displayname",
    "error",
    "exception",
    "getcontentlength",
    "getlastmodified",
    "href",
    "message",
    "multistatus",
    "prop",
    "propstat",
    "resourcetype",
    "response",
];

#[derive(Arbitrary)]
enum Token {
    Known(usize),
}
impl Token {
    fn serialize(&self) -> String {
        match self {
            Self::Known(i) => TOKENS[i % TOKENS.len()].to_string(),
        }
    }
}

#[derive(Arbitrary)]
struct Tag {
    name: Token,
    attr: Option<(Token, Token)>,
}
impl Tag {
    fn start(&self) -> String {
        let mut acc = String::from("D:");
        acc.push_str(self.name.serialize().as_str());

        if let Some((k, v)) = &self.attr {
            acc.push(' ');
            acc.push_str(k.serialize().as_str());
            acc.push_str("=\"");
            acc.push_str(v.serialize().as_str());
            acc.push('"');
        }
        acc
    }
    fn end(&self) -> String {
        format!("D:{}", self.name.serialize())
    }
}

#[derive(Arbitrary)]
enum XmlNode {
    Node(Tag, Vec<Self>),
    Number(i64),
    Text(Token),
}
impl std::fmt::Debug for XmlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
impl XmlNode {
    fn serialize(&self) -> String {
        match self {
            Self::Node(tag, children) => match children.is_empty() {
                true => format!("<{}/>", tag.start()),
                false => format!(
                    "<{}>{}</{}>",
                    tag.start(),
                    children.iter().map(|v| v.serialize()).collect::<String>(),
                    tag.end()
                ),
            },
            Self::Number(v) => format!("{}", v),
            Self::Text(v) => v.serialize(),
        }
    }
}

fuzz_target!(|nodes: XmlNode| {
    let gen = format!(
        "<D:multistatus xmlns:D=\"DAV:\">{}</D:multistatus>",
        nodes.serialize()
    );

    // 1. Only inputs that decode are interesting, failing is fine, crashing is not
    let reference = match decode_multistatus(gen.as_bytes()) {
        Err(_) => return,
        Ok(m) => m,
    };

    // 2. Re-serialize the input
    let my_serialization = encode_multistatus(&reference).expect("xml serialization");

    // 3. De-serialize my serialization
    let comparison = decode_multistatus(my_serialization.as_slice()).expect("Deserialize again");

    // 4. Both the first decoding and last decoding must be identical
    assert_eq!(reference, comparison);
});
