//! Overview page: a currency selector above a grid of summary cards.

use dioxus::prelude::*;

use crate::components::{Card, Skeleton};
use crate::currency::{use_currency, CurrencySelector};
use crate::i18n::use_i18n;
use crate::preferences::use_user_preferences;

struct Metric {
    title_key: &'static str,
    amount: f64,
    trend: f64,
}

const METRICS: [Metric; 4] = [
    Metric { title_key: "dashboard.cards.revenue", amount: 1250.0, trend: 12.5 },
    Metric { title_key: "dashboard.cards.expenses", amount: 834.2, trend: -4.3 },
    Metric { title_key: "dashboard.cards.savings", amount: 415.8, trend: 8.1 },
    Metric { title_key: "dashboard.cards.balance", amount: 4520.0, trend: 2.4 },
];

fn trend_label(trend: f64) -> String {
    if trend >= 0.0 {
        format!("+{trend:.1}%")
    } else {
        format!("{trend:.1}%")
    }
}

#[component]
pub fn OverviewView() -> Element {
    let i18n = use_i18n();
    let prefs = use_user_preferences();
    let saved = prefs.preferences.read().as_ref().map(|p| p.currency);

    rsx! {
        div {
            class: "overview",
            div {
                class: "overview-toolbar",
                label { class: "label", {i18n.t("dashboard.currency")} }
                CurrencySelector {}
                if (prefs.loading)() {
                    Skeleton { class: "skeleton-badge" }
                } else if let Some(currency) = saved {
                    span {
                        class: "badge",
                        title: i18n.t("dashboard.savedCurrency"),
                        "{currency.code()}"
                    }
                }
            }
            SectionCards {}
        }
    }
}

#[component]
fn SectionCards() -> Element {
    let i18n = use_i18n();
    let currency = use_currency();

    rsx! {
        div {
            class: "section-cards",
            for metric in METRICS.iter() {
                Card {
                    key: "{metric.title_key}",
                    title: i18n.t(metric.title_key),
                    p { class: "metric-value", {currency.format(metric.amount)} }
                    span {
                        class: if metric.trend >= 0.0 { "metric-trend metric-up" } else { "metric-trend metric-down" },
                        {trend_label(metric.trend)}
                    }
                }
            }
            Card {
                title: i18n.t("dashboard.cards.activity"),
                description: i18n.t("dashboard.cards.activityPending"),
                Skeleton { class: "skeleton-line" }
                Skeleton { class: "skeleton-line" }
                Skeleton { class: "skeleton-line skeleton-short" }
            }
        }
    }
}
