//! Minify HTML code.
//!
//! [`HtmlMinifier`] parses a document with [`lol_html`] into a sequence of
//! [`Event`]s, then replays them through a fresh engine which decides, per
//! element and per attribute, what can be dropped, rewritten or collapsed.
//!
//! Output goes through a staging buffer shared by every nesting level. A
//! closing tag either commits the whole buffer, or discards the
//! opening tag of its element when that element turned out to be empty. An
//! element counts as empty only if no text and no other opening tag came
//! after its own opening tag: a parent whose children were all removed is
//! kept.

pub(crate) mod attribute;
pub(crate) mod comment;
pub(crate) mod embedded;
pub(crate) mod stage;
pub(crate) mod whitespace;

use std::mem::take;

use lol_html::errors::RewritingError;
use thiserror::Error;

pub use self::{
    comment::{COMMENT_CLOSE, COMMENT_OPEN},
    embedded::{Collaborators, EmbeddedMinifier, Fallback},
};
use self::{
    embedded::is_embedded,
    stage::OutputStage,
    whitespace::{collapse_whitespace, trim_whitespace, WhitespaceStacks},
};
use crate::{
    config::{Options, PartialOptions},
    event::{Attribute, Event},
};

/// List of errors for this module.
#[derive(Debug, Error)]
pub enum MinifyHtmlError {
    /// The document is empty.
    #[error("invalid value specified for minification, expected a non-empty document")]
    InvalidInput,
    /// Error parsing HTML.
    #[error(transparent)]
    LolHtmlRewriting(#[from] RewritingError),
}

/// HTML minifier.
pub struct HtmlMinifier {
    /// Options used by every run.
    options: Options,
    /// Minifiers for `<script>` and `<style>` bodies.
    collaborators: Collaborators,
}

impl HtmlMinifier {
    /// Create a HTML minifier with default options.
    ///
    /// Embedded scripts and style sheets are minified with the minifiers
    /// enabled by the `js` and `css` features.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a HTML minifier with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            collaborators: Collaborators {
                script: crate::util::minify::script_minifier(),
                style: crate::util::minify::style_minifier(),
            },
        }
    }

    /// Replace the minifier of `<script>` bodies.
    pub fn with_script_minifier(mut self, minifier: impl EmbeddedMinifier + 'static) -> Self {
        self.collaborators.script = Some(Box::new(minifier));
        self
    }

    /// Replace the minifier of `<style>` bodies.
    pub fn with_style_minifier(mut self, minifier: impl EmbeddedMinifier + 'static) -> Self {
        self.collaborators.style = Some(Box::new(minifier));
        self
    }

    /// Remove both embedded minifiers; bodies are then kept as they are.
    pub fn without_embedded_minifiers(mut self) -> Self {
        self.collaborators = Collaborators::default();
        self
    }

    /// Options used by [`HtmlMinifier::minify`].
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Minify a HTML string.
    pub fn minify(&self, input: impl AsRef<str>) -> Result<String, MinifyHtmlError> {
        self.minify_with(input, &PartialOptions::default())
    }

    /// Minify a HTML string, overriding some options for this call only.
    pub fn minify_with(
        &self,
        input: impl AsRef<str>,
        overrides: &PartialOptions,
    ) -> Result<String, MinifyHtmlError> {
        let input = input.as_ref();

        if input.is_empty() {
            return Err(MinifyHtmlError::InvalidInput);
        }

        let events = crate::parse::events(input)?;
        let output = self.run(self.options.merge(overrides), events);

        tracing::debug!(
            "Minified {} bytes into {} bytes",
            input.len(),
            output.len()
        );

        Ok(output)
    }

    /// Minify a document given as a sequence of events.
    pub fn minify_events<I>(&self, events: I) -> String
    where
        I: IntoIterator<Item = Event>,
    {
        self.run(self.options, events)
    }

    fn run<I>(&self, options: Options, events: I) -> String
    where
        I: IntoIterator<Item = Event>,
    {
        let mut engine = Engine::new(options, &self.collaborators);

        for event in events {
            engine.dispatch(event);
        }

        engine.finish()
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Closing tags that can be omitted.
fn is_optional_tag(tag: &str) -> bool {
    matches!(tag, "tbody" | "thead" | "tfoot" | "tr" | "option")
}

/// State of a single minification run.
///
/// An engine is consumed by [`Engine::finish`]; every run starts from a fresh
/// one.
pub(crate) struct Engine<'m> {
    options: Options,
    collaborators: &'m Collaborators,
    stacks: WhitespaceStacks,
    stage: OutputStage,
    /// Most recently opened element, cleared when an element closes.
    current_tag: String,
    current_attributes: Vec<Attribute>,
    /// Text chunks not yet written to the stage.
    pending_text: String,
    /// Whether the current element received text since it was opened.
    has_text: bool,
}

impl<'m> Engine<'m> {
    pub(crate) fn new(options: Options, collaborators: &'m Collaborators) -> Self {
        Self {
            options,
            collaborators,
            stacks: WhitespaceStacks::default(),
            stage: OutputStage::default(),
            current_tag: String::new(),
            current_attributes: Vec::new(),
            pending_text: String::new(),
            has_text: false,
        }
    }

    pub(crate) fn dispatch(&mut self, event: Event) {
        match event {
            Event::Doctype(doctype) => self.doctype(&doctype),
            Event::Open { tag, attributes } => self.open(&tag, attributes),
            Event::Text(text) => self.text(&text),
            Event::Comment(text) => self.comment(&text),
            Event::Close(tag) => self.close(&tag),
        }
    }

    fn doctype(&mut self, doctype: &str) {
        // Leading whitespace is not content.
        if trim_whitespace(&self.pending_text).is_empty() {
            self.pending_text.clear();
        }

        if !self.stage.is_blank() || !self.pending_text.is_empty() {
            tracing::warn!("Ignoring document type declared after content: {:?}", doctype);
            return;
        }

        if self.options.use_short_doctype {
            self.stage.push("<!DOCTYPE html>");
        } else {
            self.stage
                .push(collapse_whitespace(trim_whitespace(doctype)).into_owned());
        }
    }

    fn open(&mut self, tag: &str, attributes: Vec<Attribute>) {
        self.settle_text(false);

        let tag = tag.to_ascii_lowercase();

        self.stacks.enter(&tag);

        self.stage.push_tag_start();
        self.stage.push(tag.as_str());
        for attribute in &attributes {
            let fragment = attribute::normalize(&self.options, &tag, attribute, &attributes);
            if !fragment.is_empty() {
                self.stage.push(fragment);
            }
        }
        self.stage.push(">");

        self.current_tag = tag;
        self.current_attributes = attributes;
        self.has_text = false;
    }

    fn text(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    fn comment(&mut self, text: &str) {
        self.settle_text(false);

        let fragment = comment::process(&self.options, text);
        if !fragment.is_empty() {
            self.stage.push(fragment);
        }
    }

    fn close(&mut self, tag: &str) {
        let tag = tag.to_ascii_lowercase();
        let closes_current = tag == self.current_tag;

        self.settle_text(closes_current);
        self.stacks.leave(&tag);

        let is_empty = closes_current && !self.has_text;

        if self.options.remove_empty_elements
            && is_empty
            && tag != "textarea"
            && self.stage.discard_last_element()
        {
            tracing::trace!("Removed empty <{}>", tag);
        } else if self.options.remove_optional_tags && is_optional_tag(&tag) {
            tracing::trace!("Omitted </{}>", tag);
        } else {
            self.stage.push(format!("</{tag}>"));
            self.stage.flush();
        }

        self.current_tag.clear();
        self.current_attributes.clear();
        self.has_text = false;
    }

    /// Write pending text to the stage.
    ///
    /// When `closing` is set, the current element is being closed and its
    /// whole body is available for embedded minification.
    fn settle_text(&mut self, closing: bool) {
        if self.pending_text.is_empty() {
            return;
        }

        let mut text = take(&mut self.pending_text);

        // Guards may straddle chunk boundaries, strip them from the whole body.
        if is_embedded(&self.current_tag) {
            text = embedded::strip_guards(&self.options, &self.current_tag, &text);
        }

        if self.options.collapse_whitespace {
            if self.stacks.can_trim(&self.current_tag) {
                text = trim_whitespace(&text).to_owned();
            }
            if self.stacks.can_collapse(&self.current_tag) {
                text = collapse_whitespace(&text).into_owned();
            }
        }

        if closing && is_embedded(&self.current_tag) {
            text = embedded::minify(
                &self.options,
                self.collaborators,
                &self.current_tag,
                &self.current_attributes,
                text,
            );
        }

        if text.is_empty() {
            return;
        }

        self.has_text = true;

        if self.stacks.is_verbatim() {
            self.stage.push_verbatim(text);
        } else {
            self.stage.push(text);
        }
    }

    /// Write the remaining text and assemble the output.
    pub(crate) fn finish(mut self) -> String {
        self.settle_text(false);
        self.stage.finish()
    }
}
