//! Text normalization and segmentation.
//!
//! The segmenter turns normalized text into ordered, size-bounded chunks,
//! one per synthesis call. Chunking respects sentence boundaries and a
//! word limit; the single documented exception is a sentence that alone
//! exceeds the limit, which is force-split into fixed-size word windows.

/// Normalize raw extracted text for synthesis.
///
/// Joins words hyphenated across a line break (`fig-\nure` becomes
/// `figure`), normalizes CRLF line endings, and collapses all whitespace
/// runs to single spaces. Empty input yields an empty string.
pub fn preprocess(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace("\r\n", "\n");

    // Join hyphenated line-break words before whitespace collapse erases
    // the newline that marks them.
    let chars: Vec<char> = text.chars().collect();
    let mut joined = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '-'
            && i + 1 < chars.len()
            && chars[i + 1] == '\n'
            && joined.chars().last().is_some_and(char::is_alphanumeric)
            && chars.get(i + 2).copied().is_some_and(char::is_alphanumeric)
        {
            i += 2;
            continue;
        }
        joined.push(c);
        i += 1;
    }

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentence-like units at terminal punctuation
/// (`.` `!` `?`) followed by whitespace. The whitespace separator is
/// consumed; punctuation stays with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_some_and(u8::is_ascii_whitespace)
        {
            let sentence = text[start..=i].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            start = i;
            continue;
        }
        i += 1;
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Split `text` into ordered chunks of at most `word_limit` words.
///
/// Sentences are accumulated greedily into the current chunk while the
/// running word count stays within `word_limit`; a sentence that would
/// exceed the limit closes the current chunk and opens a new one. A
/// single sentence longer than `word_limit` is force-split into windows
/// of exactly `word_limit` words.
///
/// Guarantees: the output preserves the input word sequence verbatim, no
/// chunk is empty, and empty input yields an empty vec.
pub fn segment(text: &str, word_limit: usize) -> Vec<String> {
    let word_limit = word_limit.max(1);
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_words = 0;

    for sentence in split_sentences(text) {
        let sentence_words = word_count(sentence);

        if sentence_words > word_limit {
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
                current_words = 0;
            }
            let words: Vec<&str> = sentence.split_whitespace().collect();
            for window in words.chunks(word_limit) {
                chunks.push(window.join(" "));
            }
            continue;
        }

        if current_words + sentence_words > word_limit {
            chunks.push(current.join(" "));
            current = vec![sentence];
            current_words = sentence_words;
        } else {
            current.push(sentence);
            current_words += sentence_words;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}
