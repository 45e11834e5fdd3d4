//! Product feedback-field editor
//!
//! Edits a working copy of the product's schema. Each field is previewed with
//! the same control a call form renders; the schema is only sent to the server
//! when it passes the definition checks.

use dialdesk_forms::{FieldDescriptor, FieldType, SchemaDraft};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use std::str::FromStr;

use crate::api;
use crate::components::feedback_form::{focus_ring, DraftSignal, FieldControl, ValueSource};
use crate::components::toast::use_toaster;
use crate::types::Product;

// ============================================================================
// Panel form state
// ============================================================================

/// Text state of the add/edit panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldForm {
    pub name: String,
    pub field_type: FieldType,
    pub description: String,
    pub is_required: bool,
    /// Comma-separated
    pub options: String,
    pub min_length: String,
    pub max_length: String,
    pub min_value: String,
    pub max_value: String,
    /// Comma-separated
    pub allowed_extensions: String,
    pub max_file_size: String,
}

impl FieldForm {
    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Self {
        let text = |v: Option<String>| v.unwrap_or_default();
        Self {
            name: descriptor.name.clone(),
            field_type: descriptor.field_type,
            description: text(descriptor.description.clone()),
            is_required: descriptor.is_required,
            options: descriptor.options.join(", "),
            min_length: text(descriptor.min_length.map(|n| n.to_string())),
            max_length: text(descriptor.max_length.map(|n| n.to_string())),
            min_value: text(descriptor.min_value.map(|n| n.to_string())),
            max_value: text(descriptor.max_value.map(|n| n.to_string())),
            allowed_extensions: descriptor.allowed_extensions.join(", "),
            max_file_size: text(descriptor.max_file_size.clone()),
        }
    }

    /// Settings the type does not use are left out
    pub fn to_descriptor(&self) -> Result<FieldDescriptor, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Field name is required".to_string());
        }

        let mut descriptor = FieldDescriptor::new(name, self.field_type);
        descriptor.is_required = self.is_required;
        let description = self.description.trim();
        if !description.is_empty() {
            descriptor.description = Some(description.to_string());
        }

        if self.field_type.has_options() {
            descriptor.options = parse_list(&self.options);
        }
        if self.field_type.has_length() {
            descriptor.min_length = parse_optional("Min length", &self.min_length)?;
            descriptor.max_length = parse_optional("Max length", &self.max_length)?;
        }
        if self.field_type == FieldType::Number {
            descriptor.min_value = parse_optional("Min value", &self.min_value)?;
            descriptor.max_value = parse_optional("Max value", &self.max_value)?;
        }
        if self.field_type == FieldType::File {
            descriptor.allowed_extensions = parse_list(&self.allowed_extensions);
            let size = self.max_file_size.trim();
            if !size.is_empty() {
                descriptor.max_file_size = Some(size.to_string());
            }
        }

        Ok(descriptor)
    }
}

/// "Sold, Declined,, " -> ["Sold", "Declined"]
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_optional<T: FromStr>(label: &str, text: &str) -> Result<Option<T>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<T>()
        .map(Some)
        .map_err(|_| format!("{} must be a number, got '{}'", label, text))
}

// ============================================================================
// Page
// ============================================================================

/// `/products/:id/fields`
#[component]
pub fn ProductFieldsEditor() -> impl IntoView {
    let params = use_params_map();
    let product_id = move || params.read().get("id").unwrap_or_default();

    let product = LocalResource::new(move || {
        let id = product_id();
        async move { api::get_product(&id).await }
    });

    view! {
        <Suspense fallback=move || view! { <div class="p-6 text-gray-500">"Loading..."</div> }>
            {move || {
                product.get().map(|data| match data {
                    Ok(product) => view! { <FieldsEditor product=product /> }.into_any(),
                    Err(e) => view! { <div class="p-6 text-red-500">{e}</div> }.into_any(),
                })
            }}
        </Suspense>
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PanelTarget {
    New,
    Existing(u32),
}

#[component]
fn FieldsEditor(product: Product) -> impl IntoView {
    let toaster = use_toaster();
    let draft: DraftSignal = RwSignal::new_local(SchemaDraft::from_schema(&product.feedback_fields));
    // Rebuilt only when a definition changes, not on preview edits
    let rows = Memo::new(move |_| {
        draft.with(|d| {
            d.fields()
                .iter()
                .map(|f| (f.id, f.descriptor.clone()))
                .collect::<Vec<_>>()
        })
    });
    let panel = RwSignal::new(None::<PanelTarget>);
    let form = RwSignal::new(FieldForm::default());
    let (saving, set_saving) = signal(false);
    let product_id = product.id.clone();

    let open_new = move |_| {
        form.set(FieldForm::default());
        panel.set(Some(PanelTarget::New));
    };

    let open_edit = move |id: u32| {
        let existing = draft.with_untracked(|d| d.get(id).map(|f| FieldForm::from_descriptor(&f.descriptor)));
        if let Some(existing) = existing {
            form.set(existing);
            panel.set(Some(PanelTarget::Existing(id)));
        }
    };

    let apply_panel = move |_| {
        let descriptor = match form.with_untracked(|f| f.to_descriptor()) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                toaster.error(e);
                return;
            }
        };
        match panel.get_untracked() {
            Some(PanelTarget::New) => {
                draft.update(|d| {
                    d.add(descriptor);
                });
            }
            Some(PanelTarget::Existing(id)) => {
                draft.update(|d| {
                    d.update(id, descriptor);
                });
            }
            None => {}
        }
        panel.set(None);
    };

    let remove = move |id: u32| {
        draft.update(|d| {
            d.remove(id);
        });
        if panel.get_untracked() == Some(PanelTarget::Existing(id)) {
            panel.set(None);
        }
    };

    let save = move |_| {
        let schema = match draft.with_untracked(|d| d.to_schema()) {
            Ok(schema) => schema,
            Err(errors) => {
                let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
                toaster.error(message);
                return;
            }
        };

        set_saving.set(true);
        let product_id = product_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::update_product_fields(&product_id, &schema).await {
                Ok(saved) => {
                    toaster.success(format!("Saved {} feedback fields", saved.feedback_fields.len()));
                }
                Err(e) => {
                    log::error!("Failed to save feedback fields: {}", e);
                    toaster.error(e);
                }
            }
            set_saving.set(false);
        });
    };

    view! {
        <div class="p-6 max-w-4xl">
            <div class="flex justify-between items-center mb-6">
                <div>
                    <h2 class="text-2xl font-bold">"Feedback Fields"</h2>
                    <p class="text-gray-600 text-sm">{product.name.clone()}</p>
                </div>
                <div class="flex space-x-3">
                    <button
                        type="button"
                        class="px-4 py-2 border border-purple-500 text-purple-600 rounded hover:bg-purple-50"
                        on:click=open_new
                    >
                        "+ Add Field"
                    </button>
                    <button
                        type="button"
                        class="bg-purple-500 hover:bg-purple-600 text-white px-4 py-2 rounded disabled:opacity-50"
                        disabled=move || saving.get()
                        on:click=save
                    >
                        {move || if saving.get() { "Saving..." } else { "Save Fields" }}
                    </button>
                </div>
            </div>

            {move || panel.get().map(|target| view! {
                <FieldPanel
                    form=form
                    title=if target == PanelTarget::New { "New field" } else { "Edit field" }
                    on_apply=Callback::new(move |_| apply_panel(()))
                    on_cancel=Callback::new(move |_| panel.set(None))
                />
            })}

            <div class="space-y-4">
                {move || {
                    let rows = rows.get();
                    if rows.is_empty() {
                        return view! {
                            <div class="text-center py-12 bg-white rounded-lg shadow">
                                <p class="text-gray-500">"No feedback fields yet"</p>
                            </div>
                        }
                        .into_any();
                    }
                    rows.into_iter()
                        .map(|(id, descriptor)| {
                            view! {
                                <div class="bg-white rounded-lg shadow p-4">
                                    <div class="flex justify-between items-start mb-3">
                                        <div class="flex items-center gap-2">
                                            <span class="font-medium text-gray-900">{descriptor.name.clone()}</span>
                                            <span class="px-2 py-0.5 text-xs rounded bg-purple-100 text-purple-800">
                                                {descriptor.field_type.display_name()}
                                            </span>
                                            {descriptor.is_required.then(|| view! {
                                                <span class="px-2 py-0.5 text-xs rounded bg-red-100 text-red-700">"Required"</span>
                                            })}
                                        </div>
                                        <div class="flex space-x-2 text-sm">
                                            <button type="button" class="text-gray-500 hover:text-gray-900"
                                                on:click=move |_| draft.update(|d| { d.move_up(id); })>"↑"</button>
                                            <button type="button" class="text-gray-500 hover:text-gray-900"
                                                on:click=move |_| draft.update(|d| { d.move_down(id); })>"↓"</button>
                                            <button type="button" class="text-blue-600 hover:text-blue-900"
                                                on:click=move |_| open_edit(id)>"Edit"</button>
                                            <button type="button" class="text-red-600 hover:text-red-900"
                                                on:click=move |_| remove(id)>"Remove"</button>
                                        </div>
                                    </div>
                                    <FieldControl
                                        field=descriptor
                                        source=ValueSource::Preview { draft, id }
                                        focus_ring=focus_ring("purple")
                                    />
                                </div>
                            }
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </div>
    }
}

// ============================================================================
// Add / edit panel
// ============================================================================

#[component]
fn FieldPanel(
    form: RwSignal<FieldForm>,
    title: &'static str,
    on_apply: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let field_type = move || form.with(|f| f.field_type);

    view! {
        <div class="mb-6 bg-purple-50 border border-purple-200 rounded-lg p-4 space-y-4">
            <h3 class="text-lg font-semibold text-gray-800">{title}</h3>

            <div class="grid grid-cols-2 gap-4">
                <TextSetting label="Name" form=form
                    get=|f: &FieldForm| f.name.clone()
                    set=|f: &mut FieldForm, v| f.name = v />
                <div>
                    <label class="block text-sm font-medium text-gray-700 mb-1">"Type"</label>
                    <select
                        class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-purple-500"
                        on:change=move |ev| {
                            if let Some(t) = FieldType::parse(&event_target_value(&ev)) {
                                form.update(|f| f.field_type = t);
                            }
                        }
                    >
                        {FieldType::ALL
                            .into_iter()
                            .map(|t| view! {
                                <option value=t.as_str() prop:selected=move || field_type() == t>
                                    {t.display_name()}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
            </div>

            <TextSetting label="Description" form=form
                get=|f: &FieldForm| f.description.clone()
                set=|f: &mut FieldForm, v| f.description = v />

            <label class="inline-flex items-center gap-2 text-sm text-gray-700">
                <input
                    type="checkbox"
                    prop:checked=move || form.with(|f| f.is_required)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        form.update(|f| f.is_required = checked);
                    }
                />
                "Required"
            </label>

            {move || field_type().has_options().then(|| view! {
                <TextSetting label="Options (comma separated)" form=form
                    get=|f: &FieldForm| f.options.clone()
                    set=|f: &mut FieldForm, v| f.options = v />
            })}

            {move || field_type().has_length().then(|| view! {
                <div class="grid grid-cols-2 gap-4">
                    <TextSetting label="Min length" form=form
                        get=|f: &FieldForm| f.min_length.clone()
                        set=|f: &mut FieldForm, v| f.min_length = v />
                    <TextSetting label="Max length" form=form
                        get=|f: &FieldForm| f.max_length.clone()
                        set=|f: &mut FieldForm, v| f.max_length = v />
                </div>
            })}

            {move || (field_type() == FieldType::Number).then(|| view! {
                <div class="grid grid-cols-2 gap-4">
                    <TextSetting label="Min value" form=form
                        get=|f: &FieldForm| f.min_value.clone()
                        set=|f: &mut FieldForm, v| f.min_value = v />
                    <TextSetting label="Max value" form=form
                        get=|f: &FieldForm| f.max_value.clone()
                        set=|f: &mut FieldForm, v| f.max_value = v />
                </div>
            })}

            {move || (field_type() == FieldType::File).then(|| view! {
                <div class="grid grid-cols-2 gap-4">
                    <TextSetting label="Allowed extensions" form=form
                        get=|f: &FieldForm| f.allowed_extensions.clone()
                        set=|f: &mut FieldForm, v| f.allowed_extensions = v />
                    <TextSetting label="Max file size (e.g. 5MB)" form=form
                        get=|f: &FieldForm| f.max_file_size.clone()
                        set=|f: &mut FieldForm, v| f.max_file_size = v />
                </div>
            })}

            <div class="flex justify-end space-x-3">
                <button type="button" class="px-4 py-2 text-gray-700 hover:text-gray-900"
                    on:click=move |_| on_cancel.run(())>"Cancel"</button>
                <button type="button" class="bg-purple-500 hover:bg-purple-600 text-white px-4 py-2 rounded"
                    on:click=move |_| on_apply.run(())>"Apply"</button>
            </div>
        </div>
    }
}

#[component]
fn TextSetting(
    label: &'static str,
    form: RwSignal<FieldForm>,
    get: fn(&FieldForm) -> String,
    set: fn(&mut FieldForm, String),
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-1">{label}</label>
            <input
                type="text"
                class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-purple-500"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </div>
    }
}
