//! Toast notifications shared by every page

use leptos::prelude::*;

const TOAST_MILLIS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastMessage {
    id: u64,
    pub kind: ToastKind,
    pub text: String,
}

/// Handle provided as context by the app shell
#[derive(Debug, Clone, Copy)]
pub struct Toaster {
    current: RwSignal<Option<ToastMessage>>,
    next_id: RwSignal<u64>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            next_id: RwSignal::new(0),
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(ToastKind::Success, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(ToastKind::Error, text.into());
    }

    /// Replaces the toast on screen; each toast hides itself after three seconds
    fn show(&self, kind: ToastKind, text: String) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.current.set(Some(ToastMessage { id, kind, text }));

        let current = self.current;
        let handle = gloo_timers::callback::Timeout::new(TOAST_MILLIS, move || {
            current.update(|shown| {
                if shown.as_ref().is_some_and(|m| m.id == id) {
                    *shown = None;
                }
            });
        });
        handle.forget();
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().unwrap_or_else(|| {
        log::warn!("No toaster in context, toasts will not be shown");
        Toaster::new()
    })
}

#[component]
pub fn ToastView(toaster: Toaster) -> impl IntoView {
    view! {
        {move || {
            toaster.current.get().map(|message| {
                let class = match message.kind {
                    ToastKind::Success => "bg-green-50 border-green-200 text-green-800",
                    ToastKind::Error => "bg-red-50 border-red-200 text-red-800",
                };
                view! {
                    <div class=format!(
                        "fixed top-4 right-4 z-50 max-w-sm p-3 border rounded shadow text-sm {}",
                        class,
                    )>
                        {message.text}
                    </div>
                }
            })
        }}
    }
}
