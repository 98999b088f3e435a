//! Response body decoding.

pub use hfetch_config::BodyMode;

/// Turn raw body bytes into text.
///
/// Invalid UTF-8 sequences become U+FFFD. In [`BodyMode::JoinedLines`] the
/// body is read as lines terminated by `\n`, `\r\n` or a lone `\r`, and the
/// lines are concatenated with nothing in between. That is the same as
/// dropping every CR and LF byte, which is what this does; neither byte can
/// appear inside a multi-byte UTF-8 sequence.
pub fn decode_body(bytes: &[u8], mode: BodyMode) -> String {
    match mode {
        BodyMode::Raw => String::from_utf8_lossy(bytes).into_owned(),
        BodyMode::JoinedLines => {
            let joined: Vec<u8> = bytes
                .iter()
                .copied()
                .filter(|byte| !matches!(byte, b'\r' | b'\n'))
                .collect();
            match String::from_utf8(joined) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            }
        }
    }
}
