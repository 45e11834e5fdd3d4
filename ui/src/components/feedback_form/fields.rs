//! Field Renderers
//!
//! One widget per field type. Text-like widgets write raw input and let the
//! value bag coerce it; number and date commit on change so a half-typed value
//! is never written back into the control.

use dialdesk_forms::{FieldDescriptor, FieldInput, FieldType, FieldValue};
use leptos::prelude::*;
use leptos::web_sys;
use wasm_bindgen::JsCast;

use super::file::{accept_attribute, file_hint, BrowserFile};
use super::ValueSource;

fn input_class(focus_ring: &str) -> String {
    format!(
        "w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 {}",
        focus_ring
    )
}

fn bound(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

// ============================================================================
// Field Control
// ============================================================================

/// The control for one field, picked by its type
#[component]
pub fn FieldControl(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    match field.field_type {
        FieldType::Text => view! { <TextInput field=field source=source focus_ring=focus_ring /> }.into_any(),
        FieldType::Textarea => {
            view! { <TextareaInput field=field source=source focus_ring=focus_ring /> }.into_any()
        }
        FieldType::Number => {
            view! { <NumberInput field=field source=source focus_ring=focus_ring /> }.into_any()
        }
        FieldType::Date => view! { <DateInput field=field source=source focus_ring=focus_ring /> }.into_any(),
        FieldType::Select => {
            view! { <SelectInput field=field source=source focus_ring=focus_ring /> }.into_any()
        }
        FieldType::Checkbox => view! { <CheckboxGroup field=field source=source /> }.into_any(),
        FieldType::File => view! { <FileInput field=field source=source /> }.into_any(),
    }
}

// ============================================================================
// Text, Textarea
// ============================================================================

#[component]
fn TextInput(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let placeholder = field.placeholder();
    let min_length = field.min_length.map(|n| n.to_string());
    let max_length = field.max_length.map(|n| n.to_string());
    let shown = field.clone();

    view! {
        <input
            type="text"
            class=input_class(focus_ring)
            placeholder=placeholder
            minlength=min_length
            maxlength=max_length
            prop:value=move || source.value(&shown).display()
            on:input=move |ev| source.apply(&field, FieldInput::Raw(event_target_value(&ev)))
        />
    }
}

#[component]
fn TextareaInput(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let placeholder = field.placeholder();
    let min_length = field.min_length.map(|n| n.to_string());
    let max_length = field.max_length.map(|n| n.to_string());
    let shown = field.clone();

    view! {
        <textarea
            rows="4"
            class=input_class(focus_ring)
            placeholder=placeholder
            minlength=min_length
            maxlength=max_length
            prop:value=move || source.value(&shown).display()
            on:input=move |ev| source.apply(&field, FieldInput::Raw(event_target_value(&ev)))
        ></textarea>
    }
}

// ============================================================================
// Number, Date
// ============================================================================

#[component]
fn NumberInput(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let placeholder = field.placeholder();
    let min = bound(field.min_value);
    let max = bound(field.max_value);
    let shown = field.clone();

    view! {
        <input
            type="number"
            step="any"
            class=input_class(focus_ring)
            placeholder=placeholder
            min=min
            max=max
            prop:value=move || source.value(&shown).display()
            on:change=move |ev| source.apply(&field, FieldInput::Raw(event_target_value(&ev)))
        />
    }
}

#[component]
fn DateInput(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let shown = field.clone();

    view! {
        <input
            type="date"
            class=input_class(focus_ring)
            prop:value=move || source.value(&shown).display()
            on:change=move |ev| source.apply(&field, FieldInput::Raw(event_target_value(&ev)))
        />
    }
}

// ============================================================================
// Select, Checkbox
// ============================================================================

#[component]
fn SelectInput(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let placeholder = field.placeholder();
    let options = field.options.clone();
    let shown = field.clone();
    let is_empty = move || source.value(&shown).is_empty();
    let changed = field.clone();

    view! {
        <select
            class=input_class(focus_ring)
            on:change=move |ev| source.apply(&changed, FieldInput::Raw(event_target_value(&ev)))
        >
            <option value="" prop:selected=is_empty>{placeholder}</option>
            {options
                .into_iter()
                .map(|option| {
                    let shown = field.clone();
                    let current = option.clone();
                    view! {
                        <option
                            value=option.clone()
                            prop:selected=move || source.value(&shown).display() == current
                        >
                            {option}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}

/// One checkbox per option; each toggle adds or removes only its option
#[component]
fn CheckboxGroup(field: FieldDescriptor, source: ValueSource) -> impl IntoView {
    let options = field.options.clone();

    view! {
        <div class="flex flex-wrap gap-x-4 gap-y-2">
            {options
                .into_iter()
                .map(|option| {
                    let shown = field.clone();
                    let toggled = field.clone();
                    let checked_option = option.clone();
                    let toggled_option = option.clone();
                    view! {
                        <label class="inline-flex items-center gap-2 text-sm text-gray-700">
                            <input
                                type="checkbox"
                                class="rounded border-gray-300"
                                prop:checked=move || source.value(&shown).is_checked(&checked_option)
                                on:change=move |ev| {
                                    source.apply(
                                        &toggled,
                                        FieldInput::Toggle {
                                            option: toggled_option.clone(),
                                            checked: event_target_checked(&ev),
                                        },
                                    )
                                }
                            />
                            {option}
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}

// ============================================================================
// File
// ============================================================================

/// File picker; a file stored earlier is listed as the current file
#[component]
fn FileInput(field: FieldDescriptor, source: ValueSource) -> impl IntoView {
    let accept = accept_attribute(&field);
    let hint = file_hint(&field);
    let shown = field.clone();

    let stored = move || match source.value(&shown) {
        FieldValue::File(slot) => slot.stored,
        _ => None,
    };

    let on_change = move |ev: web_sys::Event| {
        let chosen = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
            .map(BrowserFile::new);
        source.apply(&field, FieldInput::File(chosen));
    };

    view! {
        <div class="space-y-1">
            <input
                type="file"
                accept=accept
                class="block w-full text-sm text-gray-700 file:mr-3 file:px-3 file:py-1.5 file:rounded file:border-0 file:bg-gray-100 hover:file:bg-gray-200"
                on:change=on_change
            />
            {move || {
                stored()
                    .map(|file| {
                        view! {
                            <p class="text-xs text-gray-600">
                                "Current file: "
                                <a href=file.file_url class="text-blue-600 hover:underline" target="_blank">
                                    {file.file_name}
                                </a>
                            </p>
                        }
                    })
            }}
            {hint.map(|h| view! { <p class="text-xs text-gray-400">{h}</p> })}
        </div>
    }
}
