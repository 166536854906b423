//! Sanitization of untrusted text before it is embedded in terminal markup.
//!
//! Message content comes straight from the user or the remote model and may
//! contain control characters or ANSI escape sequences. Emitting those into
//! the terminal would let a message re-style or corrupt the rest of the
//! screen, so the renderer passes every message through [`clean_text`] first.

const TAB_REPLACEMENT: &str = "    ";

/// Strip control characters and ANSI escape sequences from `input`.
///
/// Newlines survive, tabs become spaces, and everything printable (including
/// multi-byte characters and emoji) passes through untouched. CSI sequences
/// (`ESC [` ... final byte) and OSC sequences (`ESC ]` ... `BEL`/`ST`) are
/// removed wholesale rather than character by character so their parameter
/// bytes do not leak into the output.
pub fn clean_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // CSI: parameter and intermediate bytes, then one final byte
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // OSC: terminated by BEL or ESC \
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' {
                            if chars.peek() == Some(&'\\') {
                                chars.next();
                            }
                            break;
                        }
                    }
                }
                // Bare escape or a two-character sequence; drop the introducer
                // and let the next char be judged on its own.
                _ => {}
            },
            '\n' => out.push('\n'),
            '\t' => out.push_str(TAB_REPLACEMENT),
            // is_control covers both C0 and C1 ranges
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}
