//! Article body extraction.
//!
//! The publisher's text-only pages wrap body prose in bare `<p>` tags, but
//! they wrap bylines, captions and pull-quotes the same way. A small state
//! machine over the token stream tells them apart using only tag identity
//! and the shape of the text that follows each paragraph marker:
//!
//! - the first non-empty block is a byline/dateline and is always dropped;
//! - a paragraph that opens into a `<blockquote>` is a quoted excerpt;
//! - any tag or comment between `<p>` and its text means the block is not
//!   plain prose;
//! - trimmed text shorter than [`MIN_PARAGRAPH_CHARS`] is noise.
//!
//! There is no element stack. The machine remembers its current [`State`]
//! and whether the first block has been consumed, nothing more, so malformed
//! or truncated markup just yields whatever was recognised before the end.

use crate::scan::{Token, TokenScanner};
use tracing::trace;

/// Trimmed paragraphs shorter than this many characters are discarded.
pub const MIN_PARAGRAPH_CHARS: usize = 6;

const PARAGRAPH: &str = "p";

/// The paragraphs that make up one article body, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub paragraphs: Vec<String>,
}

impl ExtractedArticle {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Where the extractor is in the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the next `<p>`.
    Seeking,
    /// Just saw `<p>`; the next token decides the paragraph's fate.
    PendingCapture,
    /// End of stream reached. Further tokens are ignored.
    Done,
}

/// What a single [`ArticleExtractor::step`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Token did not concern a paragraph.
    Ignored,
    /// A `<p>` was seen and the next token is pending.
    Opened,
    /// The pending paragraph was dropped.
    Discarded(Discard),
    /// A paragraph was appended to the article.
    Captured,
    Finished,
}

/// Why a pending paragraph was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    /// Another `<p>` arrived before any text.
    EmptyParagraph,
    /// The paragraph opened straight into a `<blockquote>`.
    Blockquote,
    /// Whitespace only.
    Blank,
    /// The first non-empty block of the page (byline/dateline).
    FirstBlock,
    /// Shorter than [`MIN_PARAGRAPH_CHARS`].
    TooShort,
    /// Some other tag or a comment came before the text.
    NotPlainText,
}

/// Streaming extractor. Feed it tokens with [`step`](Self::step) and collect
/// the result with [`finish`](Self::finish).
#[derive(Debug)]
pub struct ArticleExtractor {
    state: State,
    first_block_seen: bool,
    paragraphs: Vec<String>,
}

impl ArticleExtractor {
    pub fn new() -> Self {
        Self {
            state: State::Seeking,
            first_block_seen: false,
            paragraphs: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Advance the machine by one token.
    pub fn step(&mut self, token: &Token) -> Step {
        let step = match (self.state, token) {
            (State::Done, _) => Step::Finished,
            (_, Token::Eof) => {
                self.state = State::Done;
                Step::Finished
            }
            (State::Seeking, token) if token.is_start_of(PARAGRAPH) => {
                self.state = State::PendingCapture;
                Step::Opened
            }
            (State::Seeking, _) => Step::Ignored,
            (State::PendingCapture, token) => {
                self.state = State::Seeking;
                self.resolve_pending(token)
            }
        };
        trace!(?token, ?step, state = ?self.state, "extractor step");
        step
    }

    fn resolve_pending(&mut self, token: &Token) -> Step {
        match token {
            Token::StartTag { name, .. } if name == PARAGRAPH => {
                Step::Discarded(Discard::EmptyParagraph)
            }
            Token::StartTag { name, .. } if name == "blockquote" => {
                Step::Discarded(Discard::Blockquote)
            }
            Token::Text { text } => self.capture(text),
            _ => Step::Discarded(Discard::NotPlainText),
        }
    }

    fn capture(&mut self, text: &str) -> Step {
        let text = text.trim();
        if text.is_empty() {
            return Step::Discarded(Discard::Blank);
        }
        if !self.first_block_seen {
            self.first_block_seen = true;
            return Step::Discarded(Discard::FirstBlock);
        }
        if text.chars().count() < MIN_PARAGRAPH_CHARS {
            return Step::Discarded(Discard::TooShort);
        }
        self.paragraphs.push(text.to_string());
        Step::Captured
    }

    /// Stop and return everything captured so far.
    pub fn finish(self) -> ExtractedArticle {
        ExtractedArticle {
            paragraphs: self.paragraphs,
        }
    }
}

impl Default for ArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the extractor over a token stream. Scanning stops at the first [`Token::Eof`].
pub fn extract<'a, I>(tokens: I) -> ExtractedArticle
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut extractor = ArticleExtractor::new();
    for token in tokens {
        if extractor.step(token) == Step::Finished {
            break;
        }
    }
    extractor.finish()
}

/// Scan and extract a complete in-memory page.
pub fn extract_html(html: &[u8]) -> ExtractedArticle {
    let mut scanner = TokenScanner::new();
    scanner.write(html);
    extract(&scanner.end())
}
