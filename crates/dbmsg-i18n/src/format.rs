//! Positional placeholder substitution

use std::borrow::Cow;

/// Replace `{0}`, `{1}`, ... in `pattern` with the matching argument.
///
/// Placeholders without an argument, and anything that is not a plain
/// `{digits}` group, are copied through unchanged.
pub fn fill_positional<'a>(pattern: &'a str, args: &[&str]) -> Cow<'a, str> {
    if args.is_empty() || !pattern.contains('{') {
        return Cow::Borrowed(pattern);
    }

    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let replaced = tail.find('}').and_then(|close| {
            let index = &tail[1..close];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let arg = index.parse::<usize>().ok().and_then(|i| args.get(i))?;
            Some((*arg, close))
        });

        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}
