use serde::{Deserialize, Serialize};

/// How documents are serialized.
///
/// Meant to be embedded in the configuration file of the program hosting
/// the WebDAV client, eg. under a `[webdav.encoder]` TOML section.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Spaces per nesting level, 0 writes everything on a single line
    #[serde(default)]
    pub indent: usize,

    #[serde(default = "default_xml_declaration")]
    pub xml_declaration: bool,
}

fn default_xml_declaration() -> bool {
    true
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            indent: 0,
            xml_declaration: default_xml_declaration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let config: EncoderConfig = toml::from_str("").unwrap();
        assert_eq!(config, EncoderConfig::default());
        assert!(config.xml_declaration);
        assert_eq!(config.indent, 0);
    }

    #[test]
    fn explicit_values() {
        let config: EncoderConfig = toml::from_str(
            r#"
indent = 4
xml_declaration = false
"#,
        )
        .unwrap();
        assert_eq!(
            config,
            EncoderConfig {
                indent: 4,
                xml_declaration: false
            }
        );
    }
}
