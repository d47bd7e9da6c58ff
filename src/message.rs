use std::collections::HashMap;

/// A raw message split into a lower-cased header map and a body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMessage {
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Field names that mark a block as a real header section.
const KNOWN_FIELDS: [&str; 16] = [
    "from",
    "to",
    "cc",
    "subject",
    "date",
    "sender",
    "reply-to",
    "return-path",
    "received",
    "message-id",
    "mime-version",
    "content-type",
    "content-transfer-encoding",
    "authentication-results",
    "dkim-signature",
    "delivered-to",
];

impl ParsedMessage {
    /// Parses an RFC 822 style message. Headers end at the first blank line;
    /// folded lines are joined with a space and repeated headers are
    /// concatenated. When the leading block is not a header section (a line
    /// that is not `Name: value`, or no recognised field name), the whole
    /// input is body.
    pub fn parse(raw: &str) -> Self {
        match Self::parse_header_block(raw) {
            Some(message) => message,
            None => ParsedMessage {
                headers: HashMap::new(),
                body: raw.to_string(),
            },
        }
    }

    fn parse_header_block(raw: &str) -> Option<Self> {
        let mut message = ParsedMessage::default();
        let mut in_headers = true;
        let mut last_header_key: Option<String> = None;

        for line in raw.lines() {
            if !in_headers {
                message.body.push_str(line);
                message.body.push('\n');
                continue;
            }

            if line.trim().is_empty() {
                in_headers = false;
                continue;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                let value = message.headers.get_mut(last_header_key.as_ref()?)?;
                value.push(' ');
                value.push_str(line.trim());
                continue;
            }

            let (key, value) = Self::split_header(line)?;
            last_header_key = Some(key.clone());
            if let Some(existing) = message.headers.get_mut(&key) {
                existing.push(' ');
                existing.push_str(&value);
            } else {
                message.headers.insert(key, value);
            }
        }

        let recognised = message
            .headers
            .keys()
            .any(|key| KNOWN_FIELDS.contains(&key.as_str()) || key.starts_with("x-"));
        if !recognised {
            log::debug!("No recognised header fields, treating input as body");
            return None;
        }

        Some(message)
    }

    /// RFC 5322 field name (printable ASCII except `:`), followed by a value
    /// that is not the rest of a URL.
    fn split_header(line: &str) -> Option<(String, String)> {
        let (key, value) = line.split_once(':')?;
        if key.is_empty() || !key.bytes().all(|b| (33..=126).contains(&b)) {
            return None;
        }
        if value.starts_with("//") {
            return None;
        }
        Some((key.to_lowercase(), value.trim().to_string()))
    }

    /// Parses a `Name: value` pair as given on the command line.
    pub fn parse_header_arg(arg: &str) -> Option<(String, String)> {
        Self::split_header(arg.trim())
    }
}
