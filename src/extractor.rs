//! Markup scanning: class attributes and the inline `lazy-config` block

use crate::config::Config;
use crate::types::Element;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use serde::Serialize;
use serde_json::Value;
use std::ops::Range;

const CONFIG_SCRIPT_ID: &str = "lazy-config";

/// A line of the inline configuration block that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineConfigError {
    pub line: String,
    pub message: String,
}

/// Everything the generator needs from a markup document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedMarkup {
    /// Elements carrying a class attribute, in document order.
    pub elements: Vec<Element>,
    /// Text of the first `<script id="lazy-config">` block.
    pub inline_config: Option<String>,
}

/// Tokenize `markup` and collect class-bearing start tags and the inline
/// configuration block. Attribute values arrive with character references
/// decoded. Malformed markup is tokenized best effort, never reported.
pub fn scan_markup(markup: &str) -> ScannedMarkup {
    let mut tokenizer = Tokenizer::new(ScanSink::new(markup), TokenizerOpts::default());
    let mut queue = BufferQueue::new();

    // A start tag is emitted when its `>` is consumed, so feeding up to each
    // `>` tells the sink where the tag it receives ends.
    let mut chunk_start = 0;
    let boundaries = markup
        .match_indices('>')
        .map(|(idx, _)| idx + 1)
        .chain(std::iter::once(markup.len()));
    for boundary in boundaries {
        if boundary <= chunk_start {
            continue;
        }
        tokenizer.sink.chunk_end = boundary;
        queue.push_back(StrTendril::from(&markup[chunk_start..boundary]));
        let _ = tokenizer.feed(&mut queue);
        chunk_start = boundary;
    }
    tokenizer.end();

    let sink = tokenizer.sink;
    log::debug!("Scanned {} elements with class attributes", sink.elements.len());
    ScannedMarkup {
        elements: sink.elements,
        inline_config: sink.inline_config,
    }
}

struct ScanSink<'m> {
    markup: &'m str,
    /// End offset of the chunk being fed.
    chunk_end: usize,
    /// End offset of the last start tag seen.
    last_tag_end: usize,
    elements: Vec<Element>,
    config_block: Option<String>,
    inline_config: Option<String>,
}

impl<'m> ScanSink<'m> {
    fn new(markup: &'m str) -> Self {
        Self {
            markup,
            chunk_end: 0,
            last_tag_end: 0,
            elements: Vec::new(),
            config_block: None,
            inline_config: None,
        }
    }

    fn start_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name: &str = &tag.name;

        if name == "script"
            && self.inline_config.is_none()
            && self.config_block.is_none()
            && tag
                .attrs
                .iter()
                .any(|attr| &*attr.name.local == "id" && &*attr.value == CONFIG_SCRIPT_ID)
        {
            self.config_block = Some(String::new());
        }

        if let Some(class) = tag.attrs.iter().find(|attr| &*attr.name.local == "class") {
            let span = locate_class_value(self.markup, self.last_tag_end, self.chunk_end, name);
            if span.is_none() {
                log::debug!("No source span for <{}> ending at byte {}", name, self.chunk_end);
            }
            self.elements.push(Element::new(name, &class.value, span));
        }
        self.last_tag_end = self.chunk_end;

        match name {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }

    fn finish_config_block(&mut self) {
        if let Some(body) = self.config_block.take() {
            self.inline_config = Some(body);
        }
    }
}

impl<'m> TokenSink for ScanSink<'m> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(tag),
                TagKind::EndTag if &*tag.name == "script" => self.finish_config_block(),
                TagKind::EndTag => {}
            },
            Token::CharacterTokens(text) => {
                if let Some(body) = &mut self.config_block {
                    body.push_str(&text);
                }
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }

    fn end(&mut self) {
        self.finish_config_block();
    }
}

/// Byte range, quotes included, of the first `class` value of the `<name ...>`
/// start tag that ends at `end`. Searches backwards from `end` without
/// crossing `floor`.
fn locate_class_value(markup: &str, floor: usize, end: usize, name: &str) -> Option<Range<usize>> {
    let window = markup.get(floor..end)?;
    window
        .rmatch_indices('<')
        .filter_map(|(offset, _)| lex_start_tag(markup, floor + offset, end))
        .find(|tag| tag.name.eq_ignore_ascii_case(name))
        .and_then(|tag| tag.class_value)
}

struct LexedTag<'m> {
    name: &'m str,
    class_value: Option<Range<usize>>,
}

/// Lex the start tag at `start`; succeeds only if it closes exactly at `end`.
fn lex_start_tag(markup: &str, start: usize, end: usize) -> Option<LexedTag<'_>> {
    let bytes = markup.as_bytes().get(..end)?;
    let mut pos = start + 1;
    if !bytes.get(pos)?.is_ascii_alphabetic() {
        return None;
    }

    let name_start = pos;
    while pos < end && !is_tag_delimiter(bytes[pos]) {
        pos += 1;
    }
    let name = &markup[name_start..pos];

    let mut class_seen = false;
    let mut class_value = None;
    loop {
        while pos < end && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' if pos + 1 == end => return Some(LexedTag { name, class_value }),
            b'>' => return None,
            _ => {}
        }

        // An attribute name may start with `=`.
        let attr_start = pos;
        pos += 1;
        while pos < end && !is_tag_delimiter(bytes[pos]) && bytes[pos] != b'=' {
            pos += 1;
        }
        let attr_name = &markup[attr_start..pos];

        while pos < end && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        let mut value = None;
        if bytes.get(pos) == Some(&b'=') {
            pos += 1;
            while pos < end && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let value_start = pos;
            match bytes.get(pos) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let close = markup[pos + 1..end].find(quote as char)?;
                    pos += close + 2;
                }
                _ => {
                    while pos < end && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                        pos += 1;
                    }
                }
            }
            value = Some(value_start..pos);
        }

        if !class_seen && attr_name.eq_ignore_ascii_case("class") {
            class_seen = true;
            class_value = value;
        }
    }
}

fn is_tag_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'/' || byte == b'>'
}

/// Merge every line of an inline configuration block into `config`. Each
/// non-empty line must be a standalone JSON object; the others are reported
/// and skipped.
pub fn apply_inline_config(body: &str, config: &mut Config) -> Vec<InlineConfigError> {
    let mut errors = Vec::new();

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => config.merge_object(map),
            Ok(_) => errors.push(InlineConfigError {
                line: line.to_string(),
                message: "expected a JSON object".to_string(),
            }),
            Err(e) => errors.push(InlineConfigError {
                line: line.to_string(),
                message: e.to_string(),
            }),
        }
    }

    for error in &errors {
        log::warn!("Error parsing inline JSON: {}, in line: {}", error.message, error.line);
    }
    errors
}

/// Append synthetic classes to the class attributes they were generated for,
/// so the responsive rules apply to the document. The source text of each
/// attribute value is kept as written.
pub fn annotate_markup(markup: &str, elements: &[Element]) -> String {
    let mut changed: Vec<(&Element, Range<usize>)> = elements
        .iter()
        .filter(|el| !el.synthetic_classes().is_empty())
        .filter_map(|el| el.value_span.clone().map(|span| (el, span)))
        .collect();
    changed.sort_by_key(|(_, span)| span.start);

    let mut output = String::with_capacity(markup.len() + changed.len() * 32);
    let mut cursor = 0;
    for (el, span) in changed {
        if span.start < cursor {
            continue;
        }
        let Some(raw) = markup.get(span.clone()) else {
            continue;
        };

        let (quote, value) = match raw.chars().next() {
            Some(q @ ('"' | '\'')) => (q, &raw[1..raw.len() - 1]),
            _ if raw.contains('"') => ('\'', raw),
            _ => ('"', raw),
        };

        output.push_str(&markup[cursor..span.start]);
        output.push(quote);
        output.push_str(value.trim_end());
        for class in el.synthetic_classes() {
            output.push(' ');
            output.push_str(class);
        }
        output.push(quote);
        cursor = span.end;
    }
    output.push_str(&markup[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(markup: &str) -> Vec<Element> {
        scan_markup(markup).elements
    }

    #[test]
    fn test_scan_document_order() {
        let markup = r#"
<html>
  <body class="bg-gray-50">
    <div id="a" class="p-[4px]  c-red-500"><span>plain</span></div>
    <p class='hw-[10px,20px]'>x</p>
    <IMG CLASS=flex src="a.png">
  </body>
</html>"#;
        let elements = scan(markup);

        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].tag, "body");
        assert_eq!(elements[0].classes, vec!["bg-gray-50"]);
        assert_eq!(elements[1].classes, vec!["p-[4px]", "c-red-500"]);
        assert_eq!(elements[2].classes, vec!["hw-[10px,20px]"]);
        assert_eq!(elements[3].tag, "img");
        assert_eq!(elements[3].classes, vec!["flex"]);
    }

    #[test]
    fn test_value_span_covers_quotes() {
        let markup = r#"<p>x</p><div class="a b"></div><img class=c>"#;
        let elements = scan(markup);
        assert_eq!(&markup[elements[0].value_span.clone().unwrap()], "\"a b\"");
        assert_eq!(&markup[elements[1].value_span.clone().unwrap()], "c");
    }

    #[test]
    fn test_class_text_inside_other_attributes() {
        let markup = r#"<a title="set class=x here" class="c-red-500">x</a><b data-x='class="y"' class=z></b>"#;
        let elements = scan(markup);

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].classes, vec!["c-red-500"]);
        assert_eq!(&markup[elements[0].value_span.clone().unwrap()], "\"c-red-500\"");
        assert_eq!(elements[1].classes, vec!["z"]);
    }

    #[test]
    fn test_character_references_are_decoded() {
        let elements = scan(r#"<div class="bg-[url(&quot;a.png&quot;)] w-[1px]&#32;c-red-500"></div>"#);
        assert_eq!(elements[0].classes, vec![r#"bg-[url("a.png")]"#, "w-[1px]", "c-red-500"]);
    }

    #[test]
    fn test_duplicate_class_attribute_keeps_first() {
        let markup = r#"<p class="first" class="second"></p>"#;
        let elements = scan(markup);
        assert_eq!(elements[0].classes, vec!["first"]);
        assert_eq!(&markup[elements[0].value_span.clone().unwrap()], "\"first\"");
    }

    #[test]
    fn test_comments_and_raw_text_are_skipped() {
        let markup = r#"
<!-- <div class="commented"></div> -->
<script>const s = '<div class="in-script"></div>';</script>
<style class="styled">.x > y { color: red; }</style>
<textarea><b class="in-textarea"></b></textarea>
<div data-class="nope" class="real"></div>"#;
        let elements = scan(markup);

        let classes: Vec<_> = elements.iter().flat_map(|e| e.classes.clone()).collect();
        assert_eq!(classes, vec!["styled", "real"]);
    }

    #[test]
    fn test_malformed_markup_degrades() {
        assert!(scan("<div class=\"unterminated").is_empty());
        assert!(scan("<<<>>> <!-- never closed").is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_attribute_with_angle_bracket_in_quotes() {
        let markup = r#"<a title="1 > 0 <b class=q>" class="w-[1px]">x</a>"#;
        let elements = scan(markup);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].classes, vec!["w-[1px]"]);
        assert_eq!(&markup[elements[0].value_span.clone().unwrap()], "\"w-[1px]\"");
    }

    #[test]
    fn test_inline_config_lines() {
        let markup = r##"<script id="lazy-config">
{"gap-size": "16px"}
{not json}

{"gap-size": "24px", "accent": "#f00"}
[1, 2]
</script>"##;
        let body = scan_markup(markup).inline_config.unwrap();

        let mut config = Config::new();
        let errors = apply_inline_config(&body, &mut config);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, "{not json}");
        assert_eq!(errors[1].message, "expected a JSON object");
        assert_eq!(config.text("gap-size"), Some("24px"));
        assert_eq!(config.text("accent"), Some("#f00"));
    }

    #[test]
    fn test_inline_config_block_selection() {
        assert_eq!(scan_markup("<script>{}</script>").inline_config, None);
        assert_eq!(
            scan_markup(r#"<SCRIPT type="application/json" id='lazy-config'>{"a": "<b>"}</script>"#)
                .inline_config
                .as_deref(),
            Some(r#"{"a": "<b>"}"#)
        );

        let two_blocks = r#"<script id="lazy-config">{"a": "1"}</script><script id="lazy-config">{"a": "2"}</script>"#;
        assert_eq!(scan_markup(two_blocks).inline_config.as_deref(), Some(r#"{"a": "1"}"#));
    }

    #[test]
    fn test_annotate_markup() {
        let markup = r#"<div class="sm-(w-[50%])">a</div><p class=plain>b</p><i class=md-(p-[1px])></i>"#;
        let mut elements = scan(markup);
        elements[0].add_class("lazy-responsive-sm-0");
        elements[2].add_class("lazy-responsive-md-1");

        let annotated = annotate_markup(markup, &elements);
        assert_eq!(
            annotated,
            r#"<div class="sm-(w-[50%]) lazy-responsive-sm-0">a</div><p class=plain>b</p><i class="md-(p-[1px]) lazy-responsive-md-1"></i>"#
        );
    }

    #[test]
    fn test_annotate_keeps_source_entities() {
        let markup = r#"<div class='sm-(bg-[url(&quot;a.png&quot;)])'></div>"#;
        let mut elements = scan(markup);
        elements[0].add_class("lazy-responsive-sm-0");

        assert_eq!(
            annotate_markup(markup, &elements),
            r#"<div class='sm-(bg-[url(&quot;a.png&quot;)]) lazy-responsive-sm-0'></div>"#
        );
    }
}
