use percent_encoding::{percent_encode, AsciiSet, CONTROLS};

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// `+` sign needed by the StreamHub API
const STREAMHUB_SET: &AsciiSet = &USERINFO.add(b'+').add(b'%');

/// `percent_encoding` crate recommends you to create your own set for
/// encoding. To be consistent in the whole codebase - we created a function
/// that can be used for encoding related stuff.
pub fn url_encode(data: &[u8]) -> String {
    percent_encode(data, STREAMHUB_SET).to_string()
}

/// Join list of encoded strings.
pub fn join_url_encoded(strings: &[&str], sep: &str) -> Option<String> {
    if strings.is_empty() {
        return None;
    }

    Some(
        strings
            .iter()
            .map(|val| url_encode(val.as_bytes()))
            .collect::<Vec<String>>()
            .join(sep),
    )
}

/// Serialize a channel list into the comma-separated path component the
/// history endpoints expect.
pub(crate) fn url_encoded_channels(channels: &[String]) -> String {
    join_url_encoded(
        channels
            .iter()
            .map(|channel| channel.as_str())
            .collect::<Vec<_>>()
            .as_slice(),
        ",",
    )
    .unwrap_or(",".into())
}

#[cfg(test)]
mod should {
    use super::*;

    #[test]
    fn encode_reserved_characters() {
        assert_eq!(url_encode(b"channel #1/a+b"), "channel%20%231%2Fa%2Bb");
    }

    #[test]
    fn join_channel_names() {
        let channels = ["chan1", "chan 2"];
        assert_eq!(
            join_url_encoded(&channels, ","),
            Some("chan1,chan%202".to_string())
        );
    }
}
