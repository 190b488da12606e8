//! # Translations
//!
//! One TOML catalog per [`Language`], bundled at compile time from
//! `locales/{fr,en}.toml`. Nested tables are addressed with dotted keys
//! (`profile.errors.passwordMismatch`); a missing key renders as the key
//! itself. Placeholders use `{{name}}`.
//!
//! The chosen language is persisted in `localStorage` and mirrored on the
//! document's `lang` attribute.

use std::collections::HashMap;
use std::sync::OnceLock;

use dioxus::prelude::*;
use store::Language;

use crate::platform;

const STORAGE_KEY: &str = "i18nextLng";

const FR: &str = include_str!("../locales/fr.toml");
const EN: &str = include_str!("../locales/en.toml");

pub type Catalog = HashMap<String, String>;

/// Flattens a TOML document into dotted keys. Non-string leaves are ignored.
pub fn parse_catalog(source: &str) -> Result<Catalog, toml::de::Error> {
    fn walk(prefix: &str, table: &toml::Table, out: &mut Catalog) {
        for (key, value) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match value {
                toml::Value::String(s) => {
                    out.insert(path, s.clone());
                }
                toml::Value::Table(t) => walk(&path, t, out),
                _ => {}
            }
        }
    }

    let table: toml::Table = source.parse()?;
    let mut out = Catalog::new();
    walk("", &table, &mut out);
    Ok(out)
}

fn catalog(language: Language) -> &'static Catalog {
    static FR_CATALOG: OnceLock<Catalog> = OnceLock::new();
    static EN_CATALOG: OnceLock<Catalog> = OnceLock::new();

    let (cell, source) = match language {
        Language::Fr => (&FR_CATALOG, FR),
        Language::En => (&EN_CATALOG, EN),
    };
    cell.get_or_init(|| {
        parse_catalog(source).unwrap_or_else(|e| {
            tracing::error!(language = language.code(), error = %e, "invalid translation catalog");
            Catalog::new()
        })
    })
}

/// Looks up `key`, falling back to the key itself.
pub fn translate(language: Language, key: &str) -> String {
    catalog(language)
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Replaces every `{{name}}` in `template` with its value from `args`.
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{name}}}}}"), value)
    })
}

/// Handle to the current language. Copy it into closures freely.
#[derive(Clone, Copy, PartialEq)]
pub struct I18n {
    language: Signal<Language>,
}

impl I18n {
    pub fn language(&self) -> Language {
        (self.language)()
    }

    /// Switches the UI language and persists the choice.
    pub fn set_language(&self, language: Language) {
        let mut current = self.language;
        current.set(language);
        platform::save_setting(STORAGE_KEY, language.code());
        platform::set_document_lang(language.code());
    }

    pub fn t(&self, key: &str) -> String {
        translate(self.language(), key)
    }

    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        interpolate(&self.t(key), args)
    }
}

/// Initialize the language context - call once at app root.
pub fn use_i18n_provider() -> I18n {
    let language = use_signal(|| {
        let saved = platform::load_setting(STORAGE_KEY)
            .and_then(|code| Language::parse(&code))
            .unwrap_or_default();
        platform::set_document_lang(saved.code());
        saved
    });
    use_context_provider(|| I18n { language })
}

pub fn use_i18n() -> I18n {
    use_context::<I18n>()
}

/// Dropdown switching between the bundled languages.
#[component]
pub fn LanguageSwitcher() -> Element {
    let i18n = use_i18n();
    let current = i18n.language();

    rsx! {
        select {
            class: "language-switcher",
            aria_label: i18n.t("common.language"),
            value: current.code(),
            onchange: move |evt: FormEvent| {
                if let Some(language) = Language::parse(&evt.value()) {
                    i18n.set_language(language);
                }
            },
            for language in Language::ALL {
                option {
                    key: "{language.code()}",
                    value: language.code(),
                    selected: language == current,
                    "{language.native_name()}"
                }
            }
        }
    }
}
