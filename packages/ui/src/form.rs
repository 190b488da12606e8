//! Controlled form state as a hook over [`store::FormInput`].

use dioxus::prelude::*;
use store::FormInput;

#[derive(Clone, Copy, PartialEq)]
pub struct FormHandle {
    state: Signal<FormInput>,
}

impl FormHandle {
    pub fn get(&self, field: &str) -> String {
        self.state.read().get(field).to_string()
    }

    pub fn set(&self, field: &str, value: impl Into<String>) {
        let mut state = self.state;
        state.write().set(field, value);
    }

    /// An `oninput` handler writing into `field`.
    pub fn on_change(&self, field: &'static str) -> impl FnMut(FormEvent) + 'static {
        let handle = *self;
        move |evt: FormEvent| handle.set(field, evt.value())
    }

    pub fn reset(&self) {
        let mut state = self.state;
        state.write().reset();
    }

    pub fn values(&self) -> FormInput {
        self.state.read().clone()
    }
}

/// Form state seeded from `initial` on first render.
pub fn use_form_input<const N: usize>(initial: [(&'static str, &'static str); N]) -> FormHandle {
    let state = use_signal(|| FormInput::new(initial));
    FormHandle { state }
}
