//! Tolerant HTML fragment parser.
//!
//! Understands what the page renderer emits and what a hand-written page
//! shell contains: start/end tags, quoted and bare attributes, void elements,
//! raw-text `script`/`style` bodies, comments, doctype and character
//! references. Anything it does not recognise as a tag becomes text.
//! Unclosed elements are closed at the end of input; stray end tags are
//! ignored.

/// Elements that never have children.
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose body is kept verbatim.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Character references longer than this are not looked up.
const MAX_REFERENCE_LEN: usize = 32;

/// A parsed node, detached from any document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedNode {
    /// An element with lowercased tag and attribute names.
    Element {
        /// Tag name
        tag: String,
        /// Attributes in source order; the first occurrence of a name wins
        attributes: Vec<(String, String)>,
        /// Child nodes
        children: Vec<Self>,
    },
    /// Decoded text.
    Text(String),
}

/// Returns `true` for elements that cannot have children.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Returns `true` for elements whose body is not parsed as markup.
#[must_use]
pub fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

/// Parses `html` into a forest of nodes.
#[must_use]
pub fn parse_fragment(html: &str) -> Vec<ParsedNode> {
    let mut cursor = Cursor::new(html);
    let mut builder = TreeBuilder::default();

    while !cursor.is_eof() {
        if cursor.starts_with("<!--") {
            cursor.skip_past("-->");
        } else if cursor.starts_with("<!") || cursor.starts_with("<?") {
            let doctype = cursor
                .rest()
                .get(..9)
                .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
            cursor.skip_past(">");
            if doctype {
                // Serialization writes its own separator after the doctype.
                cursor.eat_while(char::is_whitespace);
            }
        } else if cursor.starts_with("</") && cursor.nth_is_alpha(2) {
            cursor.advance(2);
            let name = cursor
                .eat_while(|c| c != '>' && !c.is_whitespace())
                .to_ascii_lowercase();
            cursor.skip_past(">");
            builder.close(&name);
        } else if cursor.starts_with("<") && cursor.nth_is_alpha(1) {
            let tag = parse_start_tag(&mut cursor);
            let raw = is_raw_text_element(&tag.name) && !tag.self_closing;
            let name = tag.name.clone();
            builder.start(tag);
            if raw {
                let body = cursor.eat_until_ci(&format!("</{name}"));
                builder.text(body.to_string());
            }
        } else {
            let text = cursor.eat_text();
            builder.text(decode_entities(text));
        }
    }

    builder.finish()
}

/// Decodes character references (`&amp;`, `&#39;`, `&#x27;`, ...).
///
/// Unknown or malformed references are kept literally.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= MAX_REFERENCE_LEN)
            .and_then(|end| lookup_reference(&rest[1..=end]).map(|c| (c, end)));

        if let Some((c, end)) = decoded {
            out.push(c);
            rest = &rest[end + 2..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

fn lookup_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                digits.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

// ============================================================================
// Tokenizing
// ============================================================================

struct StartTag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

fn parse_start_tag(cursor: &mut Cursor<'_>) -> StartTag {
    cursor.advance(1);
    let name = cursor
        .eat_while(|c| !c.is_whitespace() && c != '>' && c != '/')
        .to_ascii_lowercase();
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        cursor.eat_while(char::is_whitespace);
        match cursor.peek() {
            None => break,
            Some('>') => {
                cursor.advance(1);
                break;
            }
            Some('/') => {
                cursor.advance(1);
                if cursor.peek() == Some('>') {
                    cursor.advance(1);
                    self_closing = true;
                    break;
                }
            }
            Some(_) => {
                let attr = cursor
                    .eat_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/')
                    .to_ascii_lowercase();
                if attr.is_empty() {
                    // Stray '=' with no name.
                    cursor.bump();
                    continue;
                }
                cursor.eat_while(char::is_whitespace);
                let value = if cursor.peek() == Some('=') {
                    cursor.advance(1);
                    cursor.eat_while(char::is_whitespace);
                    parse_attribute_value(cursor)
                } else {
                    String::new()
                };
                if !attributes.iter().any(|(existing, _)| *existing == attr) {
                    attributes.push((attr, value));
                }
            }
        }
    }

    StartTag {
        name,
        attributes,
        self_closing,
    }
}

fn parse_attribute_value(cursor: &mut Cursor<'_>) -> String {
    match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.advance(1);
            let raw = cursor.eat_while(|c| c != quote);
            cursor.bump();
            decode_entities(raw)
        }
        _ => decode_entities(cursor.eat_while(|c| !c.is_whitespace() && c != '>')),
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    const fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes of ASCII markup already matched by the caller.
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn nth_is_alpha(&self, n: usize) -> bool {
        self.rest()
            .as_bytes()
            .get(n)
            .is_some_and(u8::is_ascii_alphabetic)
    }

    fn eat_while(&mut self, mut accept: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    /// Consumes text up to (not including) the next `<` after the first char.
    fn eat_text(&mut self) -> &'a str {
        let rest = self.rest();
        let first = rest.chars().next().map_or(0, char::len_utf8);
        let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        self.pos += end;
        &rest[..end]
    }

    /// Consumes up to (not including) an ASCII-case-insensitive `needle`.
    fn eat_until_ci(&mut self, needle: &str) -> &'a str {
        let rest = self.rest();
        let end = rest
            .as_bytes()
            .windows(needle.len())
            .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_past(&mut self, needle: &str) {
        let rest = self.rest();
        self.pos += rest
            .find(needle)
            .map_or(rest.len(), |i| i + needle.len());
    }
}

// ============================================================================
// Tree Building
// ============================================================================

struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<ParsedNode>,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenElement>,
    roots: Vec<ParsedNode>,
}

impl TreeBuilder {
    fn children_mut(&mut self) -> &mut Vec<ParsedNode> {
        match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.roots,
        }
    }

    fn start(&mut self, tag: StartTag) {
        if tag.self_closing || is_void_element(&tag.name) {
            self.children_mut().push(ParsedNode::Element {
                tag: tag.name,
                attributes: tag.attributes,
                children: Vec::new(),
            });
        } else {
            self.stack.push(OpenElement {
                tag: tag.name,
                attributes: tag.attributes,
                children: Vec::new(),
            });
        }
    }

    fn close(&mut self, name: &str) {
        if let Some(idx) = self.stack.iter().rposition(|open| open.tag == name) {
            while self.stack.len() > idx {
                self.pop_one();
            }
        }
    }

    fn pop_one(&mut self) {
        if let Some(open) = self.stack.pop() {
            let node = ParsedNode::Element {
                tag: open.tag,
                attributes: open.attributes,
                children: open.children,
            };
            self.children_mut().push(node);
        }
    }

    fn text(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let children = self.children_mut();
        if let Some(ParsedNode::Text(previous)) = children.last_mut() {
            previous.push_str(&text);
        } else {
            children.push(ParsedNode::Text(text));
        }
    }

    fn finish(mut self) -> Vec<ParsedNode> {
        while !self.stack.is_empty() {
            self.pop_one();
        }
        self.roots
    }
}
