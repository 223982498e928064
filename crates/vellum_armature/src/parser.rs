//! HTML tree builder.
//!
//! Consumes tokenizer callbacks and writes nodes into a [`Document`]. Parsing
//! is lenient: problems are collected as [`ParseError`]s next to the tree
//! instead of aborting, much like a browser's `innerHTML`.

use std::borrow::Cow;

use vellum_carton::{is_void_tag, String};
use vellum_relief::{Attribute, Document, DomResult, NodeId};

use crate::errors::{ErrorCode, ParseError, Position};
use crate::tokenizer::{Callbacks, QuoteType, Tokenizer};

/// Tree builder state
pub struct Parser<'a, 'd> {
    /// Target document
    doc: &'d mut Document,
    /// Source text
    source: &'a str,
    /// Node receiving top-level content
    container: NodeId,
    /// Open elements, innermost last
    stack: Vec<OpenElement>,
    /// Element whose start tag is being read
    current_element: Option<CurrentElement>,
    /// Attribute being read
    current_attr: Option<CurrentAttribute>,
    /// Contiguous text range not yet turned into a node
    pending_text: Option<(usize, usize)>,
    /// Errors collected during parsing
    errors: Vec<ParseError>,
}

/// Stack entry for an element waiting for its end tag
#[derive(Debug)]
struct OpenElement {
    node: NodeId,
    tag: String,
    start: usize,
}

/// Start tag being read
struct CurrentElement {
    tag: String,
    tag_start: usize,
    is_self_closing: bool,
    attributes: Vec<Attribute>,
}

/// Attribute being read
struct CurrentAttribute {
    name: String,
    name_start: usize,
    value_start: Option<usize>,
    value_end: Option<usize>,
}

impl<'a, 'd> Parser<'a, 'd> {
    /// Create a parser that appends top-level nodes under `container`
    pub fn new(doc: &'d mut Document, container: NodeId, source: &'a str) -> Self {
        Self {
            doc,
            source,
            container,
            stack: Vec::new(),
            current_element: None,
            current_attr: None,
            pending_text: None,
            errors: Vec::new(),
        }
    }

    /// Parse the source and return the collected errors
    pub fn parse(mut self) -> Vec<ParseError> {
        let source = self.source;
        let mut tokenizer = Tokenizer::new(source, ParserCallbacks { parser: &mut self });
        tokenizer.tokenize();

        self.flush_text();
        self.handle_unclosed_elements();
        self.errors
    }

    fn get_source(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }

    fn error(&mut self, code: ErrorCode, offset: usize) {
        self.errors
            .push(ParseError::new(code, Position::at(self.source, offset)));
    }

    /// Node that receives the next child
    fn current_parent(&self) -> NodeId {
        self.stack.last().map_or(self.container, |open| open.node)
    }

    fn append(&mut self, child: NodeId) {
        let parent = self.current_parent();
        // Both nodes were created by this parser, so the link cannot fail
        if let Err(err) = self.doc.append_child(parent, child) {
            tracing::error!(%err, "parser produced an invalid tree link");
        }
    }

    /// Report elements still open at end of input
    fn handle_unclosed_elements(&mut self) {
        while let Some(open) = self.stack.pop() {
            self.error(ErrorCode::MissingEndTag, open.start);
        }
    }

    /// Turn buffered text into a node
    fn flush_text(&mut self) {
        let Some((start, end)) = self.pending_text.take() else {
            return;
        };
        let content = decode(self.get_source(start, end));
        let node = self.doc.create_text(&*content);
        self.append(node);
    }

    fn on_text_impl(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        match self.pending_text {
            Some((pending_start, pending_end)) if pending_end == start => {
                self.pending_text = Some((pending_start, end));
            }
            _ => {
                self.flush_text();
                self.pending_text = Some((start, end));
            }
        }
    }

    fn on_open_tag_name_impl(&mut self, start: usize, end: usize) {
        self.flush_text();
        self.current_element = Some(CurrentElement {
            tag: self.get_source(start, end).into(),
            tag_start: start,
            is_self_closing: false,
            attributes: Vec::new(),
        });
    }

    fn on_open_tag_end_impl(&mut self, _end: usize) {
        let Some(current) = self.current_element.take() else {
            return;
        };

        let node = self.doc.create_element(current.tag.clone());
        for attr in current.attributes {
            if let Err(err) = self.doc.set_attribute(node, attr.name, attr.value) {
                tracing::error!(%err, "parser produced an invalid attribute");
            }
        }
        self.append(node);

        if !current.is_self_closing && !is_void_tag(&current.tag) {
            self.stack.push(OpenElement {
                node,
                tag: current.tag,
                // Include the `<`
                start: current.tag_start - 1,
            });
        }
    }

    fn on_self_closing_tag_impl(&mut self, end: usize) {
        if let Some(ref mut current) = self.current_element {
            current.is_self_closing = true;
        }
        self.on_open_tag_end_impl(end);
    }

    fn on_close_tag_impl(&mut self, start: usize, end: usize) {
        self.flush_text();
        let tag = self.get_source(start, end);

        let Some(i) = self
            .stack
            .iter()
            .rposition(|open| open.tag.eq_ignore_ascii_case(tag))
        else {
            // Void end tags like `</br>` are silently dropped
            if !is_void_tag(tag) {
                self.error(ErrorCode::InvalidEndTag, start.saturating_sub(2));
            }
            return;
        };

        // Everything opened after the match is implicitly closed
        let unclosed: Vec<usize> = self.stack.drain(i..).skip(1).map(|o| o.start).collect();
        for offset in unclosed.into_iter().rev() {
            self.error(ErrorCode::MissingEndTag, offset);
        }
    }

    fn on_attrib_name_impl(&mut self, start: usize, end: usize) {
        self.current_attr = Some(CurrentAttribute {
            name: self.get_source(start, end).into(),
            name_start: start,
            value_start: None,
            value_end: None,
        });
    }

    fn on_attrib_data_impl(&mut self, start: usize, end: usize) {
        if let Some(ref mut attr) = self.current_attr {
            if attr.value_start.is_none() {
                attr.value_start = Some(start);
            }
            attr.value_end = Some(end);
        }
    }

    fn on_attrib_end_impl(&mut self, _quote: QuoteType, _end: usize) {
        let Some(attr) = self.current_attr.take() else {
            return;
        };

        // Boolean attributes and `x=""` both carry an empty value in the DOM
        let value: String = match (attr.value_start, attr.value_end) {
            (Some(start), Some(end)) => String::from(&*decode(self.get_source(start, end))),
            _ => String::default(),
        };

        let duplicate = self.current_element.as_ref().is_some_and(|current| {
            current
                .attributes
                .iter()
                .any(|existing| existing.name.eq_ignore_ascii_case(&attr.name))
        });
        if duplicate {
            self.error(ErrorCode::DuplicateAttribute, attr.name_start);
            return;
        }

        if let Some(ref mut current) = self.current_element {
            current.attributes.push(Attribute::new(attr.name, value));
        }
    }

    fn on_comment_impl(&mut self, start: usize, end: usize) {
        self.flush_text();
        let node = self.doc.create_comment(self.get_source(start, end));
        self.append(node);
    }
}

/// Decode character references in text or attribute values
fn decode(raw: &str) -> Cow<'_, str> {
    if raw.contains('&') {
        htmlize::unescape(raw)
    } else {
        Cow::Borrowed(raw)
    }
}

/// Wrapper struct for implementing Callbacks
struct ParserCallbacks<'p, 'a, 'd> {
    parser: &'p mut Parser<'a, 'd>,
}

impl Callbacks for ParserCallbacks<'_, '_, '_> {
    fn on_text(&mut self, start: usize, end: usize) {
        self.parser.on_text_impl(start, end);
    }

    fn on_open_tag_name(&mut self, start: usize, end: usize) {
        self.parser.on_open_tag_name_impl(start, end);
    }

    fn on_open_tag_end(&mut self, end: usize) {
        self.parser.on_open_tag_end_impl(end);
    }

    fn on_self_closing_tag(&mut self, end: usize) {
        self.parser.on_self_closing_tag_impl(end);
    }

    fn on_close_tag(&mut self, start: usize, end: usize) {
        self.parser.on_close_tag_impl(start, end);
    }

    fn on_attrib_name(&mut self, start: usize, end: usize) {
        self.parser.on_attrib_name_impl(start, end);
    }

    fn on_attrib_data(&mut self, start: usize, end: usize) {
        self.parser.on_attrib_data_impl(start, end);
    }

    fn on_attrib_end(&mut self, quote: QuoteType, end: usize) {
        self.parser.on_attrib_end_impl(quote, end);
    }

    fn on_comment(&mut self, start: usize, end: usize) {
        self.parser.on_comment_impl(start, end);
    }

    fn on_end(&mut self) {
        // End of input
    }

    fn on_error(&mut self, code: ErrorCode, index: usize) {
        self.parser.error(code, index);
    }
}

/// Parse markup and append the resulting nodes under `parent`
pub fn parse_into(doc: &mut Document, parent: NodeId, source: &str) -> DomResult<Vec<ParseError>> {
    doc.node(parent)?;
    Ok(Parser::new(doc, parent, source).parse())
}

/// Parse markup into a detached fragment
pub fn parse_fragment(doc: &mut Document, source: &str) -> (NodeId, Vec<ParseError>) {
    let fragment = doc.create_fragment();
    let errors = Parser::new(doc, fragment, source).parse();
    (fragment, errors)
}

/// Parse markup into a fresh document
pub fn parse_document(source: &str) -> (Document, Vec<ParseError>) {
    let mut doc = Document::new();
    let root = doc.root();
    let errors = Parser::new(&mut doc, root, source).parse();
    (doc, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_relief::NodeType;

    fn roundtrip(source: &str) -> std::string::String {
        let (doc, errors) = parse_document(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        doc.inner_html(doc.root()).unwrap()
    }

    #[test]
    fn test_parse_simple_element() {
        let (doc, errors) = parse_document("<div></div>");
        assert!(errors.is_empty());
        let children = doc.children(doc.root()).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.tag(children[0]), Some("div"));
    }

    #[test]
    fn test_parse_nested_with_text() {
        insta::assert_snapshot!(
            roundtrip("<div><span>hello</span> world</div>"),
            @"<div><span>hello</span> world</div>"
        );
    }

    #[test]
    fn test_directive_attributes_preserved() {
        let (doc, errors) = parse_document(r#"<input v-model="user.name"><b v-on:click="go">x</b>"#);
        assert!(errors.is_empty());
        let input = doc.query_selector("input").unwrap();
        let b = doc.query_selector("b").unwrap();
        assert_eq!(doc.get_attribute(input, "v-model"), Some("user.name"));
        assert_eq!(doc.get_attribute(b, "v-on:click"), Some("go"));
    }

    #[test]
    fn test_interpolation_stays_one_text_node() {
        let (doc, _) = parse_document("<p>{{a}}-{{b}}</p>");
        let p = doc.query_selector("p").unwrap();
        let children = doc.children(p).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_type(children[0]).unwrap(), NodeType::Text);
        assert_eq!(doc.text_content(p).unwrap(), "{{a}}-{{b}}");
    }

    #[test]
    fn test_stray_lt_merges_into_one_text_node() {
        let (doc, _) = parse_document("<p>a < b</p>");
        let p = doc.query_selector("p").unwrap();
        assert_eq!(doc.children(p).unwrap().len(), 1);
        assert_eq!(doc.text_content(p).unwrap(), "a < b");
    }

    #[test]
    fn test_entities_decoded() {
        let (doc, _) = parse_document(r#"<p title="a &amp; b">x &lt; y</p>"#);
        let p = doc.query_selector("p").unwrap();
        assert_eq!(doc.get_attribute(p, "title"), Some("a & b"));
        assert_eq!(doc.text_content(p).unwrap(), "x < y");
    }

    #[test]
    fn test_void_and_self_closing() {
        insta::assert_snapshot!(
            roundtrip("<div><br><input disabled/><span/>after</div>"),
            @r#"<div><br><input disabled=""><span></span>after</div>"#
        );
    }

    #[test]
    fn test_comment_node() {
        let (doc, _) = parse_document("<!-- note --><p></p>");
        let first = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.node_type(first).unwrap(), NodeType::Comment);
    }

    #[test]
    fn test_error_missing_end_tag() {
        let (doc, errors) = parse_document("<div><span>x");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == ErrorCode::MissingEndTag));
        // Content is kept despite the errors
        assert_eq!(doc.text_content(doc.root()).unwrap(), "x");
    }

    #[test]
    fn test_error_invalid_end_tag() {
        let (_, errors) = parse_document("<div></p></div>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::InvalidEndTag);
        assert_eq!(errors[0].position.column, 6);
    }

    #[test]
    fn test_implicitly_closed_element() {
        let (doc, errors) = parse_document("<div><span>x</div>");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::MissingEndTag);
        assert_eq!(doc.inner_html(doc.root()).unwrap(), "<div><span>x</span></div>");
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let (doc, errors) = parse_document(r#"<div id="a" id="b"></div>"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::DuplicateAttribute);
        let div = doc.query_selector("div").unwrap();
        assert_eq!(doc.get_attribute(div, "id"), Some("a"));
    }

    #[test]
    fn test_parse_fragment_is_detached() {
        let mut doc = Document::new();
        let (fragment, errors) = parse_fragment(&mut doc, "<b>1</b><i>2</i>");
        assert!(errors.is_empty());
        assert_eq!(doc.children(fragment).unwrap().len(), 2);
        assert!(doc.children(doc.root()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_into_unknown_parent() {
        let mut doc = Document::new();
        let (other, _) = parse_document("<p></p><p></p><p></p>");
        let foreign = other.descendants(other.root())[2];
        assert!(parse_into(&mut doc, foreign, "<b></b>").is_err());
    }
}
