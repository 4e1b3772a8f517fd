//! Bracket-depth aware splitting and joining of value text.
//!
//! Splitting only happens at parenthesis depth zero and outside of quoted
//! strings, so arguments of nested function calls are never torn apart. The
//! exact separator text is returned alongside the parts so that joining them
//! back reproduces the input.

use bitflags::bitflags;

bitflags! {
    /// The set of characters a value may be split at.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Delimiters : u8 {
        /// Split at `,`.
        const COMMA = 1 << 0;
        /// Split at whitespace.
        const SPACE = 1 << 1;
        /// Split at `/`.
        const SLASH = 1 << 2;
    }
}

impl Delimiters {
    /// Delimiters used for functions that are not listed in the table.
    pub const DEFAULT: Delimiters = Delimiters::COMMA.union(Delimiters::SPACE);

    /// Look up the delimiters that separate the arguments of the named
    /// function. Vendor prefixes are ignored. An empty set means the
    /// arguments are never split.
    pub fn for_function(name: &str) -> Delimiters {
        let name = name.to_ascii_lowercase();
        let name = crate::classify::strip_vendor_prefix(&name);

        match name {
            "rgb" | "rgba" | "hsl" | "hsla" | "hwb" | "lab" | "lch" | "oklab" | "oklch"
            | "color" => Delimiters::all(),
            "linear-gradient"
            | "radial-gradient"
            | "conic-gradient"
            | "repeating-linear-gradient"
            | "repeating-radial-gradient"
            | "repeating-conic-gradient"
            | "color-mix"
            | "var" => Delimiters::COMMA,
            "calc" | "min" | "max" | "clamp" | "round" | "mod" | "rem" | "abs" | "sign"
            | "sqrt" | "pow" | "url" | "format" | "local" | "attr" | "image-set" => {
                Delimiters::empty()
            }
            _ => Delimiters::DEFAULT,
        }
    }

    /// Classify a separator returned by [`split_top_level`].
    pub fn of_separator(separator: &str) -> Delimiters {
        if separator.contains(',') {
            Delimiters::COMMA
        } else if separator.contains('/') {
            Delimiters::SLASH
        } else {
            Delimiters::SPACE
        }
    }

    fn accepts(&self, c: char) -> bool {
        match c {
            ',' => self.contains(Delimiters::COMMA),
            '/' => self.contains(Delimiters::SLASH),
            _ => false,
        }
    }
}

/// Split `text` at top level on any of the given delimiters. Returns the
/// trimmed parts and the exact separators between them, so that
/// `parts.len() == separators.len() + 1`.
///
/// Whitespace around a `,` or `/` belongs to the separator, and runs of
/// delimiters collapse into a single separator.
pub fn split_top_level(text: &str, delimiters: Delimiters) -> (Vec<String>, Vec<String>) {
    let text = text.trim();

    if delimiters.is_empty() {
        return (vec![text.to_string()], vec![]);
    }

    let chars = text.char_indices().collect::<Vec<_>>();

    let mut parts = vec![];
    let mut separators = vec![];

    let mut depth = 0_usize;
    let mut quote = None;
    let mut start = 0;
    let mut i = 0;

    while let Some(&(position, c)) = chars.get(i) {
        if let Some(q) = quote {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if let Some(end) = separator_end(&chars, i, delimiters) {
                    let end_position = chars.get(end).map_or(text.len(), |&(p, _)| p);
                    parts.push(text[start..position].to_string());
                    separators.push(text[position..end_position].to_string());
                    start = end_position;
                    i = end;
                    continue;
                }
            }
            _ => {}
        }

        i += 1;
    }

    parts.push(text[start..].to_string());

    (parts, separators)
}

/// If a separator starts at `from`, return the index one past its end.
fn separator_end(chars: &[(usize, char)], from: usize, delimiters: Delimiters) -> Option<usize> {
    let mut end = from;
    let mut found = false;

    while let Some(&(_, c)) = chars.get(end) {
        if c.is_whitespace() {
            found |= delimiters.contains(Delimiters::SPACE);
        } else if delimiters.accepts(c) {
            found = true;
        } else {
            break;
        }
        end += 1;
    }

    found.then_some(end)
}

/// Join parts back together with the given separators. If the number of
/// separators does not fit the number of parts, a single space is used
/// between all parts instead.
pub fn join_top_level(parts: &[impl AsRef<str>], separators: &[impl AsRef<str>]) -> String {
    if separators.len() + 1 != parts.len() {
        return parts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let mut result = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            result.push_str(separators[i - 1].as_ref());
        }
        result.push_str(part.as_ref());
    }
    result
}

/// Returns true if the trimmed text is a single function call: parenthesis
/// depth returns to zero exactly once, at the final character.
pub fn is_top_level_function_call(text: &str) -> bool {
    let text = text.trim();

    let mut depth = 0_usize;
    let mut closed = 0;
    let mut quote = None;
    let mut escaped = false;

    for (position, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
                if depth == 0 {
                    closed += 1;
                    if position + c.len_utf8() != text.len() {
                        return false;
                    }
                }
            }
            _ => {}
        }
    }

    closed == 1
}
