//! Splitting text into provider-sized chunks.
//!
//! Translation and speech endpoints cap the number of characters per
//! request. Text is cut at sentence endings first, then at whitespace, and
//! only as a last resort inside a word. Limits count `char`s, not bytes, so
//! Tamil or CJK text is measured the way the providers measure it.

/// Characters that close a sentence in the scripts we expect to see
const SENTENCE_ENDINGS: &[char] = &['.', '!', '?', ';', '\n', '।', '。', '？', '！', '؟'];

/// Split `text` into chunks of at most `max_chars` characters
///
/// Text that already fits is returned untouched as a single chunk. Longer
/// text is cut into sentences that are packed into the same chunk while they
/// fit, separated by a single space. Whitespace-only input yields no chunks.
///
/// ```
/// use dubber_core::text::split_text;
///
/// let chunks = split_text("One. Two. Three.", 10);
/// assert_eq!(chunks, vec!["One. Two.", "Three."]);
/// ```
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);

    if text.trim().is_empty() {
        return Vec::new();
    }

    if char_len(text) <= max_chars {
        return vec![text.to_owned()];
    }

    let mut packer = Packer::new(max_chars);

    for sentence in text.split_inclusive(SENTENCE_ENDINGS).map(str::trim) {
        if sentence.is_empty() {
            continue;
        }

        if char_len(sentence) <= max_chars {
            packer.push(sentence);
            continue;
        }

        for word in sentence.split_whitespace() {
            for part in hard_wrap(word, max_chars) {
                packer.push(part);
            }
        }
    }

    packer.finish()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut a single word into slices of at most `max_chars` characters
fn hard_wrap(word: &str, max_chars: usize) -> impl Iterator<Item = &str> {
    let mut rest = word;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let cut = rest.char_indices().nth(max_chars).map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(cut);
        rest = tail;
        Some(head)
    })
}

struct Packer {
    max_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
}

impl Packer {
    const fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// Append a piece no longer than `max_chars`, starting a new chunk when it would overflow
    fn push(&mut self, piece: &str) {
        let len = char_len(piece);

        if !self.current.is_empty() && self.current_len + 1 + len > self.max_chars {
            self.flush();
        }

        if !self.current.is_empty() {
            self.current.push(' ');
            self.current_len += 1;
        }

        self.current.push_str(piece);
        self.current_len += len;
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current_len = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}
