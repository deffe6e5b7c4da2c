use im::Vector as ImVector;

use super::{format_value, RuntimeError, Value};

/// Keyword options passed alongside positional arguments.
///
/// Entries keep insertion order. Re-inserting a key replaces its value in
/// place, and [`Options::merge`] lets the later set win on conflicts. The
/// backing vector is persistent, so clones are cheap and never alias.
#[derive(Clone, Default)]
pub struct Options {
    entries: ImVector<(String, Value)>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: String, value: Value) {
        match self.entries.iter().position(|(name, _)| *name == key) {
            Some(index) => {
                self.entries.set(index, (key, value));
            }
            None => self.entries.push_back((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn merge(&self, later: &Options) -> Options {
        let mut out = self.clone();
        for (key, value) in later.entries.iter() {
            out.insert(key.clone(), value.clone());
        }
        out
    }

    pub fn reject_unknown(&self, ctx: &str, allowed: &[&str]) -> Result<(), RuntimeError> {
        match self.keys().find(|key| !allowed.contains(key)) {
            Some(key) => Err(RuntimeError::InvalidOption {
                ctx: ctx.to_string(),
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut out = Options::new();
        for (key, value) in iter {
            out.insert(key, value);
        }
        out
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key, format_value(value))))
            .finish()
    }
}
