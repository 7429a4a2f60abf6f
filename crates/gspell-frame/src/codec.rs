use bytes::{BufMut, BytesMut};

/// Leading byte of every frame sent to the worker.
///
/// It tells the worker to treat the rest of the line as text, even when the
/// text would otherwise read like one of its commands.
pub const FRAME_PREFIX: u8 = b'^';

/// Offset of the reported word inside a response line (`& word ...`).
pub const WORD_OFFSET: usize = 2;

/// Encode one input line as a frame: `^` + line + guaranteed `\n`.
///
/// Wire format:
/// ```text
/// ┌─────┬──────────────────────┬────┐
/// │ '^' │ line text            │ \n │
/// └─────┴──────────────────────┴────┘
/// ```
pub fn encode_frame(line: &[u8], dst: &mut BytesMut) {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    dst.reserve(line.len() + 2);
    dst.put_u8(FRAME_PREFIX);
    dst.put_slice(line);
    dst.put_u8(b'\n');
}

/// Classification of one worker response line by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `*`: the word was found as is.
    Found,
    /// `+`: found after stripping affixes to a root.
    Root,
    /// `-`: accepted as a compound of known words.
    Compound,
    /// `&`: misspelled, close suggestions follow.
    NearMiss,
    /// `#`: misspelled, no suggestions.
    Miss,
    /// `?`: not found, but a guessed root/affix combination matches.
    Guess,
    /// Empty line: end of the response to one submitted line.
    Terminator,
    /// Anything else.
    Unrecognized,
}

impl ResponseKind {
    /// Classify a raw response line (terminator allowed).
    pub fn classify(line: &[u8]) -> Self {
        let line = strip_terminator(line);
        match line.first() {
            None => Self::Terminator,
            Some(b'*') => Self::Found,
            Some(b'+') => Self::Root,
            Some(b'-') => Self::Compound,
            Some(b'&') => Self::NearMiss,
            Some(b'#') => Self::Miss,
            Some(b'?') => Self::Guess,
            Some(_) => Self::Unrecognized,
        }
    }

    /// True for lines that mean "no problem with this word".
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Found | Self::Root | Self::Compound)
    }

    /// True for lines that carry a reportable word.
    pub fn is_misspelling(self) -> bool {
        matches!(self, Self::NearMiss | Self::Miss | Self::Guess)
    }

    /// Stable lowercase name, used in structured output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::Root => "root",
            Self::Compound => "compound",
            Self::NearMiss => "near-miss",
            Self::Miss => "miss",
            Self::Guess => "guess",
            Self::Terminator => "terminator",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A parsed misspelling line (`&`, `#` or `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling<'a> {
    pub kind: ResponseKind,
    /// The misspelled word as reported by the worker.
    pub word: &'a [u8],
    /// Character offset of the word in the submitted line, when present.
    pub offset: Option<usize>,
    /// Suggested replacements, in the worker's order.
    pub suggestions: Vec<&'a [u8]>,
}

/// Parse a misspelling line.
///
/// Accepted forms:
/// ```text
/// & <word> <count> <offset>: <s1>, <s2>, ...
/// ? <word> <count> <offset>: <s1>, <s2>, ...
/// # <word> <offset>
/// ```
/// Returns `None` for any other kind of line.
pub fn parse_misspelling(line: &[u8]) -> Option<Misspelling<'_>> {
    let kind = ResponseKind::classify(line);
    if !kind.is_misspelling() {
        return None;
    }

    let line = strip_terminator(line);
    let word = misspelled_word(line);
    let rest = line.get(WORD_OFFSET + word.len()..).unwrap_or_default();

    let (head, tail) = match rest.iter().position(|&b| b == b':') {
        Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
        None => (rest, None),
    };

    let offset = head
        .split(|&b| b == b' ')
        .filter(|field| !field.is_empty())
        .last()
        .and_then(|field| std::str::from_utf8(field).ok())
        .and_then(|field| field.parse().ok());

    let suggestions = tail
        .map(|tail| {
            tail.split(|&b| b == b',')
                .map(trim_spaces)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(Misspelling {
        kind,
        word,
        offset,
        suggestions,
    })
}

/// The token starting [`WORD_OFFSET`] bytes into `line` and ending before
/// the next space (or the end of the line).
pub fn misspelled_word(line: &[u8]) -> &[u8] {
    let line = strip_terminator(line);
    let rest = line.get(WORD_OFFSET..).unwrap_or_default();
    let end = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
    &rest[..end]
}

/// Version token embedded in the worker's startup banner: the first run
/// starting at a digit and ending before the next space.
pub fn banner_version(banner: &[u8]) -> &[u8] {
    let banner = strip_terminator(banner);
    let Some(start) = banner.iter().position(u8::is_ascii_digit) else {
        return &[];
    };
    let rest = &banner[start..];
    let end = rest.iter().position(|&b| b == b' ').unwrap_or(rest.len());
    &rest[..end]
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn trim_spaces(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != b' ').unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(start, |p| p + 1);
    &bytes[start..end]
}
