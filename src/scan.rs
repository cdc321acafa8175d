//! Token scanning over raw HTML bytes.
//!
//! The article pipeline never builds a DOM. Upstream markup is pushed through
//! a streaming [`lol_html`] rewriter whose handlers record every start tag,
//! end tag, text node and comment as a flat [`Token`] sequence, in document
//! order.
//! Rewritten output is discarded; the rewriter is only used as a tokenizer.
//!
//! Scanning never fails. If lol_html gives up on a document part way
//! through, the tokens produced so far are kept and the stream is closed
//! with [`Token::Eof`], exactly as if the input had been truncated there.

use lol_html::html_content::EndTag;
use lol_html::{EndTagHandler, HandlerResult, HtmlRewriter, Settings, doc_comments, doc_text, element};
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use tracing::warn;

/// One structural or text event from the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening tag. `name` is lowercase; attributes keep source order.
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// A closing tag matched against an open element.
    EndTag { name: String },
    /// A whole text node, untrimmed and still in its source encoding.
    Text { text: String },
    /// `<!-- ... -->`, without the delimiters.
    Comment { text: String },
    /// End of input. Always the last token of a finished scan.
    Eof,
}

impl Token {
    /// Returns `true` if this is a start tag named `tag`.
    pub fn is_start_of(&self, tag: &str) -> bool {
        matches!(self, Token::StartTag { name, .. } if name == tag)
    }
}

#[derive(Debug, Default)]
struct Collected {
    tokens: Vec<Token>,
    pending_text: String,
}

impl Collected {
    fn push(&mut self, token: Token) {
        self.flush_text();
        self.tokens.push(token);
    }

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = mem::take(&mut self.pending_text);
            self.tokens.push(Token::Text { text });
        }
    }
}

fn discard(_: &[u8]) {}

/// Incremental scanner: feed it byte chunks as they arrive, then call [`end`](Self::end).
pub struct TokenScanner {
    rewriter: Option<HtmlRewriter<'static, fn(&[u8])>>,
    collected: Rc<RefCell<Collected>>,
}

impl TokenScanner {
    pub fn new() -> Self {
        let collected = Rc::new(RefCell::new(Collected::default()));

        let on_element = Rc::clone(&collected);
        let on_text = Rc::clone(&collected);
        let on_comment = Rc::clone(&collected);

        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("*", move |el| {
                    let name = el.tag_name().to_ascii_lowercase();
                    let attributes = el
                        .attributes()
                        .iter()
                        .map(|attr| (attr.name(), attr.value()))
                        .collect();
                    on_element
                        .borrow_mut()
                        .push(Token::StartTag { name, attributes });

                    if let Some(handlers) = el.end_tag_handlers() {
                        let on_end = Rc::clone(&on_element);
                        let handler: EndTagHandler<'static> =
                            Box::new(move |end: &mut EndTag<'_>| -> HandlerResult {
                                let name = end.name().to_ascii_lowercase();
                                on_end.borrow_mut().push(Token::EndTag { name });
                                Ok(())
                            });
                        handlers.push(handler);
                    }
                    Ok(())
                })],
                document_content_handlers: vec![
                    doc_text!(move |chunk| {
                        let mut collected = on_text.borrow_mut();
                        collected.pending_text.push_str(chunk.as_str());
                        if chunk.last_in_text_node() {
                            collected.flush_text();
                        }
                        Ok(())
                    }),
                    doc_comments!(move |comment| {
                        let text = comment.text();
                        on_comment.borrow_mut().push(Token::Comment { text });
                        Ok(())
                    }),
                ],
                strict: false,
                ..Settings::default()
            },
            discard as fn(&[u8]),
        );

        Self {
            rewriter: Some(rewriter),
            collected,
        }
    }

    /// Feed the next chunk of markup. Chunk boundaries may fall anywhere,
    /// including inside a tag or a multi-byte character.
    pub fn write(&mut self, chunk: &[u8]) {
        let Some(rewriter) = self.rewriter.as_mut() else {
            return;
        };
        if let Err(e) = rewriter.write(chunk) {
            warn!(error = %e, "HTML scanner stopped early; keeping tokens seen so far");
            self.rewriter = None;
        }
    }

    /// Take the tokens completed so far, leaving the scanner running.
    pub fn drain(&mut self) -> Vec<Token> {
        mem::take(&mut self.collected.borrow_mut().tokens)
    }

    /// Finish the scan and return the remaining tokens, terminated by [`Token::Eof`].
    pub fn end(mut self) -> Vec<Token> {
        if let Some(rewriter) = self.rewriter.take()
            && let Err(e) = rewriter.end()
        {
            warn!(error = %e, "HTML scanner failed to flush at end of input");
        }
        let mut collected = self.collected.borrow_mut();
        collected.flush_text();
        let mut tokens = mem::take(&mut collected.tokens);
        tokens.push(Token::Eof);
        tokens
    }
}

impl Default for TokenScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a complete in-memory document.
pub fn tokenize(html: &[u8]) -> Vec<Token> {
    let mut scanner = TokenScanner::new();
    scanner.write(html);
    scanner.end()
}
