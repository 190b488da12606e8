//! Controlled-form state: field name → string value. No validation.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormInput {
    initial: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl FormInput {
    /// Seeds the form from `(name, value)` pairs.
    pub fn new<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let initial: BTreeMap<String, String> = initial
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: initial.clone(),
            initial,
        }
    }

    /// Current value of `name`; unknown fields read as empty.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Restores every field to its seeded value and drops fields added since.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_set_reset() {
        let mut form = FormInput::new([("email", ""), ("password", "")]);
        assert_eq!(form.get("email"), "");

        form.set("email", "ada@example.com");
        form.set("note", "extra");
        assert_eq!(form.get("email"), "ada@example.com");
        assert_eq!(form.get("note"), "extra");
        assert_eq!(form.get("missing"), "");

        form.reset();
        assert_eq!(form.get("email"), "");
        assert_eq!(form.values().len(), 2);
    }
}
