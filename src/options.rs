//! Configuration options for writing and reading object graphs.
//!
//! This module provides:
//!
//! - [`Options`]: every formatting and parsing knob, with builder methods
//! - [`TagMode`]: how member tags appear on the wire
//!
//! Formatting knobs (`indent`, `field_separator`) only change whitespace; a
//! reader never depends on them. The remaining knobs change what is written
//! or how strictly input is checked.
//!
//! ## Examples
//!
//! ```rust
//! use serde_graph::{Options, TagMode};
//!
//! let options = Options::new()
//!     .with_indent("")
//!     .with_field_separator(" ")
//!     .with_tag_mode(TagMode::Aliases);
//! assert_eq!(options.indent, "");
//! ```
//!
//! `Options` is itself serde-compatible, so hosts can keep it in their own
//! configuration files:
//!
//! ```rust
//! use serde_graph::Options;
//!
//! let options: Options = serde_json::from_str(r#"{ "enum_as_string": true }"#).unwrap();
//! assert!(options.enum_as_string);
//! assert_eq!(options.indent, "\t");
//! ```

use serde::{Deserialize, Serialize};

/// Wire form of member tags.
///
/// - **Names**: the member's declared name
/// - **Aliases**: short per-type aliases (`a`, `b`, ... `Z`, `aa`, ...)
/// - **Ids**: process-unique ids drawn from the registry (`AAAB`, `AAAC`, ...)
///
/// # Examples
///
/// ```rust
/// use serde_graph::TagMode;
///
/// assert_eq!(TagMode::default(), TagMode::Names);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagMode {
    #[default]
    Names,
    Aliases,
    Ids,
}

/// Configuration options shared by [`Writer`](crate::Writer) and [`Reader`](crate::Reader).
///
/// # Examples
///
/// ```rust
/// use serde_graph::Options;
///
/// let options = Options::new()
///     .with_int64_as_string(true)
///     .with_save_root_class(true);
/// assert!(options.int64_as_string);
/// assert!(options.save_root_class);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub tag_mode: TagMode,
    pub indent: String,
    pub field_separator: String,
    pub enum_as_string: bool,
    pub int64_as_string: bool,
    pub save_root_class: bool,
    pub allow_empty_types: bool,
    pub ignore_compact: bool,
    pub ignore_new_fields: bool,
    pub report_error_position: bool,
    pub date_format: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            tag_mode: TagMode::default(),
            indent: "\t".to_string(),
            field_separator: "\n".to_string(),
            enum_as_string: false,
            int64_as_string: false,
            save_root_class: false,
            allow_empty_types: false,
            ignore_compact: false,
            ignore_new_fields: false,
            report_error_position: true,
            date_format: None,
        }
    }
}

impl Options {
    /// Creates default options (tab indent, newline separator, names as tags).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::Options;
    ///
    /// let options = Options::new();
    /// assert_eq!(options.field_separator, "\n");
    /// assert!(options.report_error_position);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options producing single-line output (`{"X":1,"Y":2}`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::Options;
    ///
    /// let options = Options::compact();
    /// assert!(options.indent.is_empty());
    /// assert!(options.field_separator.is_empty());
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        Options {
            indent: String::new(),
            field_separator: String::new(),
            ..Default::default()
        }
    }

    /// Sets the tag mode used for both writing and reading.
    #[must_use]
    pub fn with_tag_mode(mut self, tag_mode: TagMode) -> Self {
        self.tag_mode = tag_mode;
        self
    }

    /// Sets the string repeated once per nesting level before each member.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the whitespace emitted after `{`, `[` and each `,`.
    #[must_use]
    pub fn with_field_separator(mut self, separator: impl Into<String>) -> Self {
        self.field_separator = separator.into();
        self
    }

    /// Writes enums by name instead of by ordinal.
    #[must_use]
    pub fn with_enum_as_string(mut self, enabled: bool) -> Self {
        self.enum_as_string = enabled;
        self
    }

    /// Quotes 64-bit integers.
    #[must_use]
    pub fn with_int64_as_string(mut self, enabled: bool) -> Self {
        self.int64_as_string = enabled;
        self
    }

    /// Writes the class key of the top-level record.
    #[must_use]
    pub fn with_save_root_class(mut self, enabled: bool) -> Self {
        self.save_root_class = enabled;
        self
    }

    /// Accepts records that declare no members.
    #[must_use]
    pub fn with_allow_empty_types(mut self, enabled: bool) -> Self {
        self.allow_empty_types = enabled;
        self
    }

    /// Renders compact records as named objects.
    #[must_use]
    pub fn with_ignore_compact(mut self, enabled: bool) -> Self {
        self.ignore_compact = enabled;
        self
    }

    /// Skips unknown tags instead of failing.
    #[must_use]
    pub fn with_ignore_new_fields(mut self, enabled: bool) -> Self {
        self.ignore_new_fields = enabled;
        self
    }

    /// Includes the character position in reader errors.
    #[must_use]
    pub fn with_report_error_position(mut self, enabled: bool) -> Self {
        self.report_error_position = enabled;
        self
    }

    /// Overrides the date pattern (a `chrono` strftime pattern).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::Options;
    ///
    /// let options = Options::new().with_date_format("%Y");
    /// assert_eq!(options.date_format.as_deref(), Some("%Y"));
    /// ```
    #[must_use]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }
}
