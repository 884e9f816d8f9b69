use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CompressorError, Result};
use crate::minifier::{Minifier, MinifierRef};

/// Block-level tags used by the `min` surrounding-spaces preset.
pub const BLOCK_TAGS_MIN: &[&str] = &["html", "head", "body", "br", "p"];

/// Extra tags added on top of [`BLOCK_TAGS_MIN`] by the `max` preset.
pub const BLOCK_TAGS_MAX_EXTRA: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "center", "dl", "fieldset", "form",
    "frame", "frameset", "hr", "noframes", "ol", "table", "tbody", "tr", "td", "th", "tfoot",
    "thead", "ul",
];

/// Which tags get whitespace stripped around their boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SurroundingSpaces {
    Min,
    Max,
    All,
    Tags(Vec<String>),
}

impl SurroundingSpaces {
    /// Tag names covered by this setting, `None` meaning every tag.
    pub fn tag_names(&self) -> Option<Vec<String>> {
        let owned = |tags: &[&str]| tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        match self {
            Self::Min => Some(owned(BLOCK_TAGS_MIN)),
            Self::Max => {
                let mut tags = owned(BLOCK_TAGS_MIN);
                tags.extend(owned(BLOCK_TAGS_MAX_EXTRA));
                Some(tags)
            }
            Self::All => None,
            Self::Tags(tags) => Some(tags.clone()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Self::Tags(tags) = self {
            if tags.is_empty() {
                return Err(CompressorError::InvalidConfig(
                    "remove_surrounding_spaces: tag list is empty".into(),
                ));
            }
            if let Some(bad) = tags.iter().find(|t| !is_tag_name(t)) {
                return Err(CompressorError::InvalidConfig(format!(
                    "remove_surrounding_spaces: `{bad}` is not a tag name"
                )));
            }
        }
        Ok(())
    }
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl FromStr for SurroundingSpaces {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self> {
        let value = match s.trim().to_ascii_lowercase().as_str() {
            "min" => Self::Min,
            "max" => Self::Max,
            "all" => Self::All,
            list => Self::Tags(
                list.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        };
        value.validate()?;
        Ok(value)
    }
}

impl TryFrom<String> for SurroundingSpaces {
    type Error = CompressorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SurroundingSpaces> for String {
    fn from(value: SurroundingSpaces) -> Self {
        value.to_string()
    }
}

impl fmt::Display for SurroundingSpaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("min"),
            Self::Max => f.write_str("max"),
            Self::All => f.write_str("all"),
            Self::Tags(tags) => f.write_str(&tags.join(",")),
        }
    }
}

/// Options controlling which compression passes run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressorConfig {
    /// Master switch. When off, `compress` returns its input unchanged.
    pub enabled: bool,
    pub remove_comments: bool,
    pub remove_multi_spaces: bool,
    pub remove_intertag_spaces: bool,
    pub remove_quotes: bool,
    pub compress_javascript: bool,
    pub compress_css: bool,
    /// Falls back to the built-in minifier when unset.
    #[serde(skip)]
    pub javascript_compressor: Option<MinifierRef>,
    #[serde(skip)]
    pub css_compressor: Option<MinifierRef>,
    pub simple_doctype: bool,
    pub remove_script_attributes: bool,
    pub remove_style_attributes: bool,
    pub remove_link_attributes: bool,
    pub remove_form_attributes: bool,
    pub remove_input_attributes: bool,
    pub remove_javascript_protocol: bool,
    pub remove_http_protocol: bool,
    pub remove_https_protocol: bool,
    pub preserve_line_breaks: bool,
    pub remove_surrounding_spaces: Option<SurroundingSpaces>,
    pub simple_boolean_attributes: bool,
    /// Regions matching any of these are passed through byte-for-byte.
    #[serde(with = "pattern_list")]
    pub preserve_patterns: Vec<Regex>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remove_comments: false,
            remove_multi_spaces: true,
            remove_intertag_spaces: false,
            remove_quotes: false,
            compress_javascript: false,
            compress_css: false,
            javascript_compressor: None,
            css_compressor: None,
            simple_doctype: false,
            remove_script_attributes: false,
            remove_style_attributes: false,
            remove_link_attributes: false,
            remove_form_attributes: false,
            remove_input_attributes: false,
            remove_javascript_protocol: false,
            remove_http_protocol: false,
            remove_https_protocol: false,
            preserve_line_breaks: false,
            remove_surrounding_spaces: None,
            simple_boolean_attributes: false,
            preserve_patterns: Vec::new(),
        }
    }
}

impl CompressorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that leaves every document untouched.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Load from JSON. Unknown keys and invalid patterns are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_javascript_compressor<M: Minifier + 'static>(mut self, minifier: M) -> Self {
        self.javascript_compressor = Some(MinifierRef::new(minifier));
        self.compress_javascript = true;
        self
    }

    pub fn with_css_compressor<M: Minifier + 'static>(mut self, minifier: M) -> Self {
        self.css_compressor = Some(MinifierRef::new(minifier));
        self.compress_css = true;
        self
    }

    pub fn with_preserve_pattern(mut self, pattern: Regex) -> Self {
        self.preserve_patterns.push(pattern);
        self
    }

    /// Compile and add a preserve pattern from source.
    pub fn try_with_preserve_pattern(self, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|source| CompressorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.with_preserve_pattern(re))
    }

    pub fn with_surrounding_spaces(mut self, spaces: SurroundingSpaces) -> Self {
        self.remove_surrounding_spaces = Some(spaces);
        self
    }

    /// Reject option values that cannot be honoured.
    pub fn validate(&self) -> Result<()> {
        if let Some(spaces) = &self.remove_surrounding_spaces {
            spaces.validate()?;
        }
        if let Some(empty) = self.preserve_patterns.iter().find(|re| re.is_match("")) {
            return Err(CompressorError::InvalidConfig(format!(
                "preserve pattern `{}` matches the empty string",
                empty.as_str()
            )));
        }
        Ok(())
    }
}

/// Serialises compiled patterns as their source strings.
mod pattern_list {
    use regex::Regex;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(patterns: &[Regex], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(patterns.iter().map(Regex::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Regex>, D::Error> {
        let sources = Vec::<String>::deserialize(deserializer)?;
        sources
            .iter()
            .map(|s| Regex::new(s).map_err(|e| D::Error::custom(format!("invalid preserve pattern `{s}`: {e}"))))
            .collect()
    }
}
