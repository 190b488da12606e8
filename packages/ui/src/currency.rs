//! Display currency for the overview. Session-only: it is not persisted and
//! is not tied to the user's saved preferences.

use dioxus::prelude::*;
use store::Currency;

use crate::i18n::use_i18n;

#[derive(Clone, Copy, PartialEq)]
pub struct CurrencyContext {
    current: Signal<Currency>,
}

impl CurrencyContext {
    pub fn get(&self) -> Currency {
        (self.current)()
    }

    pub fn set(&self, currency: Currency) {
        let mut current = self.current;
        current.set(currency);
    }

    pub fn format(&self, amount: f64) -> String {
        self.get().format(amount)
    }
}

pub fn use_currency_provider() -> CurrencyContext {
    let current = use_signal(Currency::default);
    use_context_provider(|| CurrencyContext { current })
}

pub fn use_currency() -> CurrencyContext {
    use_context::<CurrencyContext>()
}

#[component]
pub fn CurrencySelector() -> Element {
    let currency = use_currency();
    let i18n = use_i18n();
    let current = currency.get();

    rsx! {
        select {
            class: "select",
            aria_label: i18n.t("dashboard.currency"),
            value: current.code(),
            onchange: move |evt: FormEvent| {
                if let Some(next) = Currency::parse(&evt.value()) {
                    currency.set(next);
                }
            },
            for choice in Currency::ALL {
                option {
                    key: "{choice.code()}",
                    value: choice.code(),
                    selected: choice == current,
                    "{choice.code()}"
                }
            }
        }
    }
}
