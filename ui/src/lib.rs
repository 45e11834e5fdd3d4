use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

mod api;
mod components;
mod types;

use components::calls::{EditCall, NewCall};
use components::product_fields::ProductFieldsEditor;
use components::products::Products;
use components::toast::{ToastView, Toaster};

#[component]
pub fn App() -> impl IntoView {
    let toaster = Toaster::new();
    provide_context(toaster);

    view! {
        <Router>
            <div class="flex h-screen bg-gray-100">
                // Sidebar
                <div class="w-64 bg-gray-800 text-white p-4 flex flex-col">
                    <h1 class="text-2xl font-bold mb-8">"Dialdesk"</h1>
                    <nav class="space-y-1 flex-1">
                        <NavLink href="/" label="Products" />
                    </nav>
                    <div class="text-xs text-gray-500 mt-4">
                        "Call center dashboard"
                    </div>
                </div>

                // Main Content
                <div class="flex-1 overflow-y-auto">
                    <Routes fallback=|| "Not found.">
                        <Route path=path!("/") view=Products/>
                        <Route path=path!("/products/:id/fields") view=ProductFieldsEditor/>
                        <Route path=path!("/products/:id/calls/new") view=NewCall/>
                        <Route path=path!("/calls/:id/edit") view=EditCall/>
                    </Routes>
                </div>
            </div>
            <ToastView toaster=toaster />
        </Router>
    }
}

#[component]
fn NavLink(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="block p-2 hover:bg-gray-700 rounded transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("Console logger unavailable: {}", e);
    }
    leptos::mount::mount_to_body(App);
}
