use std::collections::HashMap;

/// Maps string labels to dense integer keys and back.
///
/// Keys are assigned in first-seen order, starting at 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoder {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut encoder = LabelEncoder::default();
        for label in labels {
            if !encoder.index.contains_key(label) {
                encoder.index.insert(label.to_string(), encoder.labels.len());
                encoder.labels.push(label.to_string());
            }
        }
        encoder
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn decode(&self, key: usize) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Labels in key order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_first_appearance() {
        let enc = LabelEncoder::fit(["dog", "cat", "dog", "bird", "cat"]);
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.encode("dog"), Some(0));
        assert_eq!(enc.encode("cat"), Some(1));
        assert_eq!(enc.encode("bird"), Some(2));
        assert_eq!(enc.decode(2), Some("bird"));
        assert_eq!(enc.labels(), ["dog", "cat", "bird"]);
    }

    #[test]
    fn unknown_values_are_none() {
        let enc = LabelEncoder::fit(["cat"]);
        assert_eq!(enc.encode("fox"), None);
        assert_eq!(enc.decode(1), None);
    }
}
