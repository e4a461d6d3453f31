use std::collections::HashMap;
use url::form_urlencoded;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("url placeholders aren't in '{{name}}' format")]
    InvalidParams(),
}

/// The set of `{name}` placeholders found in a url pattern, keyed by the
/// exact bracketed text, each with a default value to substitute when a
/// data record doesn't provide one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTable {
    params: HashMap<String, String>,
}

impl ParamTable {
    /// Scans `pattern` for `{name}` placeholders in a single pass.
    ///
    /// The scanner rejects a `{` inside an open placeholder, a `}` without
    /// an open `{`, an empty `{}`, and a `{` left unterminated at the end
    /// of the pattern. Duplicate placeholders collapse to one entry. The
    /// default for each entry comes from `defaults` keyed by the name
    /// without brackets, or the empty string when absent.
    pub fn parse(pattern: &str, defaults: &HashMap<String, String>) -> Result<ParamTable, Error> {
        let mut params = HashMap::new();
        let mut open: Option<String> = None;

        for c in pattern.chars() {
            match c {
                '{' => {
                    if open.is_some() {
                        return Err(Error::InvalidParams());
                    }
                    open = Some(String::new());
                }
                '}' => match open.take() {
                    Some(name) if !name.is_empty() => {
                        let default = defaults.get(&name).cloned().unwrap_or_default();
                        params.insert(format!("{{{}}}", name), default);
                    }
                    _ => return Err(Error::InvalidParams()),
                },
                c => {
                    if let Some(ref mut name) = open {
                        name.push(c);
                    }
                }
            }
        }

        if open.is_some() {
            return Err(Error::InvalidParams());
        }

        Ok(ParamTable { params })
    }

    /// Replaces every occurrence of each placeholder in `pattern` with the
    /// query-escaped value from `values`, falling back to the default
    /// recorded at parse time. Distinct bracketed substrings can't overlap,
    /// so iteration order doesn't affect the result.
    pub fn fill(&self, pattern: &str, values: &HashMap<String, String>) -> String {
        let mut filled = pattern.to_string();

        for (token, default) in &self.params {
            let name = &token[1..token.len() - 1];
            let value = values.get(name).unwrap_or(default);
            let escaped: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            filled = filled.replace(token.as_str(), &escaped);
        }

        filled
    }

    /// Iterates over the bracketed token texts.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Returns the default recorded for a bracketed token.
    pub fn default_for(&self, token: &str) -> Option<&str> {
        self.params.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_extracts_distinct_tokens() {
        let table = ParamTable::parse("http://x.test/?a={a}&b={b}", &HashMap::new()).unwrap();
        let tokens: HashSet<&str> = table.tokens().collect();
        assert_eq!(tokens, HashSet::from(["{a}", "{b}"]));
        assert_eq!(table.default_for("{a}"), Some(""));
        assert_eq!(table.default_for("{b}"), Some(""));
    }

    #[test]
    fn parse_collapses_duplicate_tokens() {
        let table = ParamTable::parse("/{id}/{id}/{id}", &HashMap::new()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn parse_applies_defaults_by_unbracketed_name() {
        let defaults = values(&[("mascot", "gopher")]);
        let table = ParamTable::parse("http://sample.test/data?title={mascot}", &defaults).unwrap();
        assert_eq!(table.default_for("{mascot}"), Some("gopher"));
    }

    #[test]
    fn parse_accepts_pattern_without_tokens() {
        let table = ParamTable::parse("http://x.test/plain", &HashMap::new()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn parse_rejects_unterminated_brace() {
        assert!(matches!(
            ParamTable::parse("http://x.test/{p", &HashMap::new()),
            Err(Error::InvalidParams())
        ));
    }

    #[test]
    fn parse_rejects_stray_closing_brace() {
        assert!(matches!(
            ParamTable::parse("http://x.test/p}", &HashMap::new()),
            Err(Error::InvalidParams())
        ));
    }

    #[test]
    fn parse_rejects_nested_braces() {
        assert!(matches!(
            ParamTable::parse("http://x.test/{{a}}", &HashMap::new()),
            Err(Error::InvalidParams())
        ));
    }

    #[test]
    fn parse_rejects_empty_token() {
        assert!(matches!(
            ParamTable::parse("http://x.test/{}", &HashMap::new()),
            Err(Error::InvalidParams())
        ));
    }

    #[test]
    fn fill_substitutes_values_and_defaults() {
        let pattern = "http://x.test/?a={a}&b={b}";
        let table = ParamTable::parse(pattern, &HashMap::new()).unwrap();
        let filled = table.fill(pattern, &values(&[("a", "1 2")]));
        assert_eq!(filled, "http://x.test/?a=1+2&b=");
    }

    #[test]
    fn fill_escapes_reserved_characters() {
        let pattern = "http://x.test/?q={q}";
        let table = ParamTable::parse(pattern, &HashMap::new()).unwrap();
        let filled = table.fill(pattern, &values(&[("q", "a&b=c")]));
        assert_eq!(filled, "http://x.test/?q=a%26b%3Dc");
    }

    #[test]
    fn fill_replaces_every_occurrence_of_a_token() {
        let pattern = "http://x.test/{id}/copy/{id}";
        let table = ParamTable::parse(pattern, &HashMap::new()).unwrap();
        let filled = table.fill(pattern, &values(&[("id", "7")]));
        assert_eq!(filled, "http://x.test/7/copy/7");
    }

    #[test]
    fn fill_is_pure() {
        let pattern = "http://x.test/?a={a}&b={b}";
        let table = ParamTable::parse(pattern, &values(&[("b", "z")])).unwrap();
        let input = values(&[("a", "1 2")]);
        let first = table.fill(pattern, &input);
        let second = table.fill(pattern, &input);
        assert_eq!(first, second);
        assert_eq!(first, "http://x.test/?a=1+2&b=z");
    }
}
