use dioxus::prelude::*;

#[component]
pub fn Label(#[props(default)] html_for: String, children: Element) -> Element {
    rsx! {
        label { class: "label", r#for: "{html_for}", {children} }
    }
}

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] value: String,
    #[props(default)] placeholder: String,
    #[props(default)] autocomplete: String,
    #[props(default)] required: bool,
    #[props(default)] disabled: bool,
    #[props(default)] class: String,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "input {class}",
            r#type: "{r#type}",
            value: "{value}",
            placeholder: "{placeholder}",
            autocomplete: "{autocomplete}",
            required,
            disabled,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

/// Label above its control.
#[component]
pub fn Field(id: String, label: String, children: Element) -> Element {
    rsx! {
        div {
            class: "field",
            Label { html_for: id, "{label}" }
            {children}
        }
    }
}

/// Inline error message.
#[component]
pub fn Alert(message: String, on_dismiss: Option<EventHandler<()>>) -> Element {
    rsx! {
        div {
            class: "alert alert-error",
            role: "alert",
            span { "{message}" }
            if let Some(handler) = on_dismiss {
                button {
                    class: "btn btn-ghost btn-sm",
                    onclick: move |_| handler.call(()),
                    "×"
                }
            }
        }
    }
}
