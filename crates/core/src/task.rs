use crate::template::{self, ParamTable};
use serde::Deserialize;
use std::collections::HashMap;

/// HTTP methods a task is allowed to request.
pub const ALLOWED_METHODS: [&str; 3] = ["GET", "POST", "PUT"];

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot decode task payload")]
    Decode(#[source] serde_json::Error),
    #[error("method field isn't a valid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("cannot parse url pattern")]
    Template(#[from] template::Error),
}

/// One unit of delivery work pulled off the queue: an HTTP method, a url
/// pattern with `{name}` placeholders, and the number of data records the
/// producer promised to push for it.
///
/// `params` is populated once by [`Task::parse`] and read-only afterwards;
/// it never travels on the wire.
#[derive(Deserialize, Debug, Clone)]
pub struct Task {
    pub method: String,
    pub url: String,
    pub count: u32,
    #[serde(skip)]
    pub params: ParamTable,
}

impl Task {
    /// Decodes the wire form `{ "method": ..., "url": ..., "count": ... }`.
    pub fn decode(raw: &[u8]) -> Result<Task, Error> {
        serde_json::from_slice(raw).map_err(Error::Decode)
    }

    /// Checks the method against [`ALLOWED_METHODS`].
    pub fn validate(&self) -> Result<(), Error> {
        if ALLOWED_METHODS.contains(&self.method.as_str()) {
            Ok(())
        } else {
            Err(Error::InvalidMethod(self.method.clone()))
        }
    }

    /// Scans the url pattern into the task's param table.
    pub fn parse(&mut self, defaults: &HashMap<String, String>) -> Result<(), Error> {
        self.params = ParamTable::parse(&self.url, defaults)?;
        Ok(())
    }

    /// Substitutes one data record's values into the url pattern.
    pub fn fill(&self, values: &HashMap<String, String>) -> String {
        self.params.fill(&self.url, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reads_the_wire_format() {
        let raw = br#"{"method":"GET","url":"http://x.test/?a={a}","count":3}"#;
        let task = Task::decode(raw).unwrap();
        assert_eq!(task.method, "GET");
        assert_eq!(task.url, "http://x.test/?a={a}");
        assert_eq!(task.count, 3);
        assert!(task.params.is_empty());
    }

    #[test]
    fn decode_rejects_malformed_payload() {
        assert!(matches!(
            Task::decode(b"not json"),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_negative_count() {
        let raw = br#"{"method":"GET","url":"http://x.test/","count":-1}"#;
        assert!(matches!(Task::decode(raw), Err(Error::Decode(_))));
    }

    #[test]
    fn validate_accepts_the_allowed_methods() {
        for method in ALLOWED_METHODS {
            let task = Task {
                method: method.to_string(),
                url: "http://x.test/".to_string(),
                count: 0,
                params: Default::default(),
            };
            assert!(task.validate().is_ok());
        }
    }

    #[test]
    fn validate_rejects_patch() {
        let task = Task {
            method: "PATCH".to_string(),
            url: "http://x.test/".to_string(),
            count: 0,
            params: Default::default(),
        };
        assert!(matches!(task.validate(), Err(Error::InvalidMethod(m)) if m == "PATCH"));
    }

    #[test]
    fn parse_then_fill_uses_record_values() {
        let raw = br#"{"method":"GET","url":"http://x.test/?a={a}&b={b}","count":1}"#;
        let mut task = Task::decode(raw).unwrap();
        task.parse(&Default::default()).unwrap();

        let values = [("a".to_string(), "1 2".to_string())].into_iter().collect();
        assert_eq!(task.fill(&values), "http://x.test/?a=1+2&b=");
    }

    #[test]
    fn parse_surfaces_template_errors() {
        let raw = br#"{"method":"GET","url":"http://x.test/{p","count":1}"#;
        let mut task = Task::decode(raw).unwrap();
        assert!(matches!(
            task.parse(&Default::default()),
            Err(Error::Template(template::Error::InvalidParams()))
        ));
    }
}
