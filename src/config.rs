//! Configure the minifier.
//!
//! [`Options`] is the effective configuration of a run. [`PartialOptions`]
//! carries overrides, either loaded from a configuration file or supplied at
//! call time, and is merged on top of an [`Options`] value to produce a new
//! one.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file extension is not recognized.
    #[error("unsupported configuration file extension {extension:?}")]
    UnknownExtension {
        /// File extension, if any.
        extension: Option<String>,
    },
    /// Error loading a configuration file.
    #[error("failed to load configuration from {path:?}")]
    Load {
        /// Configuration file path.
        path: PathBuf,
        /// Source error.
        source: anyhow::Error,
    },
    /// An override is not of the form `NAME=true|false`.
    #[error("invalid option override `{0}`, expected NAME=true or NAME=false")]
    InvalidOverride(String),
    /// An override names an unknown option.
    #[error(transparent)]
    UnknownOption(#[from] serde_json::Error),
}

/// Minifier options.
///
/// The default value enables every safe transformation; see each field for
/// its default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// Drop comments, except conditional comments (default: `true`).
    pub remove_comments: bool,

    /// Strip `<!--` / `-->` guards from `<script>` and `<style>` bodies
    /// (default: `true`).
    pub remove_comments_from_cdata: bool,

    /// Strip commented `<![CDATA[` / `]]>` guards from `<script>` and
    /// `<style>` bodies (default: `true`).
    pub remove_cdata_sections_from_cdata: bool,

    /// Trim and collapse whitespace in text (default: `true`).
    pub collapse_whitespace: bool,

    /// Write `checked="checked"` as `checked` (default: `true`).
    pub collapse_boolean_attributes: bool,

    /// Omit quotes around simple attribute values (default: `true`).
    pub remove_attribute_quotes: bool,

    /// Drop attributes set to their default value (default: `true`).
    pub remove_redundant_attributes: bool,

    /// Replace the document type by `<!DOCTYPE html>` (default: `true`).
    pub use_short_doctype: bool,

    /// Drop commonly empty attributes when their value is blank
    /// (default: `true`).
    pub remove_empty_attributes: bool,

    /// Omit closing tags of `tbody`, `thead`, `tfoot`, `tr` and `option`
    /// (default: `true`).
    pub remove_optional_tags: bool,

    /// Drop elements without content (default: `false`).
    pub remove_empty_elements: bool,

    /// Drop `type="text/javascript"` on `<script>` (default: `false`).
    pub remove_script_type_attributes: bool,

    /// Drop `type="text/css"` on `<style>` and `<link>` (default: `false`).
    pub remove_style_link_type_attributes: bool,

    /// Minify `<script>` bodies with the script minifier (default: `true`).
    pub minify_embedded_script: bool,

    /// Minify `<style>` bodies with the style minifier (default: `true`).
    pub minify_embedded_style: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_comments: true,
            remove_comments_from_cdata: true,
            remove_cdata_sections_from_cdata: true,
            collapse_whitespace: true,
            collapse_boolean_attributes: true,
            remove_attribute_quotes: true,
            remove_redundant_attributes: true,
            use_short_doctype: true,
            remove_empty_attributes: true,
            remove_optional_tags: true,
            remove_empty_elements: false,
            remove_script_type_attributes: false,
            remove_style_link_type_attributes: false,
            minify_embedded_script: true,
            minify_embedded_style: true,
        }
    }
}

impl Options {
    /// Return a copy of these options with `overrides` applied.
    pub fn merge(self, overrides: &PartialOptions) -> Self {
        let pick = |value: Option<bool>, current: bool| value.unwrap_or(current);

        Self {
            remove_comments: pick(overrides.remove_comments, self.remove_comments),
            remove_comments_from_cdata: pick(
                overrides.remove_comments_from_cdata,
                self.remove_comments_from_cdata,
            ),
            remove_cdata_sections_from_cdata: pick(
                overrides.remove_cdata_sections_from_cdata,
                self.remove_cdata_sections_from_cdata,
            ),
            collapse_whitespace: pick(overrides.collapse_whitespace, self.collapse_whitespace),
            collapse_boolean_attributes: pick(
                overrides.collapse_boolean_attributes,
                self.collapse_boolean_attributes,
            ),
            remove_attribute_quotes: pick(
                overrides.remove_attribute_quotes,
                self.remove_attribute_quotes,
            ),
            remove_redundant_attributes: pick(
                overrides.remove_redundant_attributes,
                self.remove_redundant_attributes,
            ),
            use_short_doctype: pick(overrides.use_short_doctype, self.use_short_doctype),
            remove_empty_attributes: pick(
                overrides.remove_empty_attributes,
                self.remove_empty_attributes,
            ),
            remove_optional_tags: pick(overrides.remove_optional_tags, self.remove_optional_tags),
            remove_empty_elements: pick(
                overrides.remove_empty_elements,
                self.remove_empty_elements,
            ),
            remove_script_type_attributes: pick(
                overrides.remove_script_type_attributes,
                self.remove_script_type_attributes,
            ),
            remove_style_link_type_attributes: pick(
                overrides.remove_style_link_type_attributes,
                self.remove_style_link_type_attributes,
            ),
            minify_embedded_script: pick(
                overrides.minify_embedded_script,
                self.minify_embedded_script,
            ),
            minify_embedded_style: pick(
                overrides.minify_embedded_style,
                self.minify_embedded_style,
            ),
        }
    }
}

/// Option overrides.
///
/// Field names are deserialized in camel case (e.g. `removeEmptyElements`),
/// unknown names are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialOptions {
    /// Overrides [`Options::remove_comments`].
    pub remove_comments: Option<bool>,
    /// Overrides [`Options::remove_comments_from_cdata`].
    #[serde(rename = "removeCommentsFromCDATA")]
    pub remove_comments_from_cdata: Option<bool>,
    /// Overrides [`Options::remove_cdata_sections_from_cdata`].
    #[serde(rename = "removeCDATASectionsFromCDATA")]
    pub remove_cdata_sections_from_cdata: Option<bool>,
    /// Overrides [`Options::collapse_whitespace`].
    pub collapse_whitespace: Option<bool>,
    /// Overrides [`Options::collapse_boolean_attributes`].
    pub collapse_boolean_attributes: Option<bool>,
    /// Overrides [`Options::remove_attribute_quotes`].
    pub remove_attribute_quotes: Option<bool>,
    /// Overrides [`Options::remove_redundant_attributes`].
    pub remove_redundant_attributes: Option<bool>,
    /// Overrides [`Options::use_short_doctype`].
    pub use_short_doctype: Option<bool>,
    /// Overrides [`Options::remove_empty_attributes`].
    pub remove_empty_attributes: Option<bool>,
    /// Overrides [`Options::remove_optional_tags`].
    pub remove_optional_tags: Option<bool>,
    /// Overrides [`Options::remove_empty_elements`].
    pub remove_empty_elements: Option<bool>,
    /// Overrides [`Options::remove_script_type_attributes`].
    pub remove_script_type_attributes: Option<bool>,
    /// Overrides [`Options::remove_style_link_type_attributes`].
    pub remove_style_link_type_attributes: Option<bool>,
    /// Overrides [`Options::minify_embedded_script`].
    pub minify_embedded_script: Option<bool>,
    /// Overrides [`Options::minify_embedded_style`].
    pub minify_embedded_style: Option<bool>,
}

/// Supported configuration file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path.extension().and_then(|extension| extension.to_str());

        match extension {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnknownExtension {
                extension: extension.map(ToOwned::to_owned),
            }),
        }
    }

    fn read_str(self, content: &str) -> anyhow::Result<PartialOptions> {
        Ok(match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
            Self::Yaml => serde_yaml::from_str(content)?,
        })
    }
}

impl PartialOptions {
    /// Load overrides from a JSON, TOML or YAML file.
    ///
    /// The format is determined by the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;

        tracing::debug!("Loading options from {:?}", path);

        std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| format.read_str(&content))
            .map_err(|source| ConfigError::Load {
                path: path.to_owned(),
                source,
            })
    }

    /// Parse overrides of the form `NAME=true` or `NAME=false`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut object = serde_json::Map::new();

        for pair in pairs {
            let pair = pair.as_ref();
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidOverride(pair.to_owned()))?;
            let value: bool = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride(pair.to_owned()))?;
            object.insert(name.trim().to_owned(), value.into());
        }

        Ok(serde_json::from_value(object.into())?)
    }

    /// Combine two sets of overrides, `other` taking precedence.
    pub fn or(self, other: Self) -> Self {
        Self {
            remove_comments: other.remove_comments.or(self.remove_comments),
            remove_comments_from_cdata: other
                .remove_comments_from_cdata
                .or(self.remove_comments_from_cdata),
            remove_cdata_sections_from_cdata: other
                .remove_cdata_sections_from_cdata
                .or(self.remove_cdata_sections_from_cdata),
            collapse_whitespace: other.collapse_whitespace.or(self.collapse_whitespace),
            collapse_boolean_attributes: other
                .collapse_boolean_attributes
                .or(self.collapse_boolean_attributes),
            remove_attribute_quotes: other
                .remove_attribute_quotes
                .or(self.remove_attribute_quotes),
            remove_redundant_attributes: other
                .remove_redundant_attributes
                .or(self.remove_redundant_attributes),
            use_short_doctype: other.use_short_doctype.or(self.use_short_doctype),
            remove_empty_attributes: other
                .remove_empty_attributes
                .or(self.remove_empty_attributes),
            remove_optional_tags: other.remove_optional_tags.or(self.remove_optional_tags),
            remove_empty_elements: other.remove_empty_elements.or(self.remove_empty_elements),
            remove_script_type_attributes: other
                .remove_script_type_attributes
                .or(self.remove_script_type_attributes),
            remove_style_link_type_attributes: other
                .remove_style_link_type_attributes
                .or(self.remove_style_link_type_attributes),
            minify_embedded_script: other.minify_embedded_script.or(self.minify_embedded_script),
            minify_embedded_style: other.minify_embedded_style.or(self.minify_embedded_style),
        }
    }
}
