/// Ordered outbound query parameters.
///
/// Absent and empty values are never stored, so a provider never sees
/// `symbol=` when the caller left the field out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`QueryParams::set`].
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.set(key, v);
        }
        self
    }

    /// Insert or replace `key`. Empty values remove the key instead.
    pub fn set(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        if value.is_empty() {
            self.remove(key);
            return;
        }
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(idx).1)
    }

    pub fn extend(&mut self, other: &QueryParams) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_missing_and_empty_values() {
        let params = QueryParams::new()
            .with("symbol", "AAPL")
            .with("exchange", "")
            .with_opt::<&str>("country", None)
            .with("outputsize", 30);
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("symbol", "AAPL"), ("outputsize", "30")]);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = QueryParams::new().with("q", "btc").with("symbol", "BTC");
        params.set("q", "bitcoin");
        params.remove("symbol");
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("q", "bitcoin")]);
    }
}
