use encoding_rs::GBK;
use tracing::{debug, warn};

/// Decodes console output from a Windows command.
///
/// Chinese installations print in code page 936, so anything that is not
/// valid UTF-8 is decoded as GBK instead of being mangled.
pub fn decode_output(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = GBK.decode(bytes);
            if had_errors {
                warn!("console output is neither UTF-8 nor GBK, some characters were replaced");
            } else {
                debug!("decoded {} bytes of console output as GBK", bytes.len());
            }
            text.into_owned()
        }
    }
}
