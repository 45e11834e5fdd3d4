//! Feedback field renderer
//!
//! Renders a product's feedback schema, in schema order, as one control per
//! field. Controls read and write a [`ValueSource`]: either the value bag of an
//! open call form or the preview values of the schema editor.

mod fields;
mod file;

use dialdesk_forms::{FieldDescriptor, FieldInput, FieldValue, SchemaDraft, ValueBag};
use leptos::prelude::*;

pub use fields::FieldControl;
pub use file::BrowserFile;

/// Values of an open call form; local because browser files are not `Send`
pub type FormBag = RwSignal<ValueBag<BrowserFile>, LocalStorage>;
pub type DraftSignal = RwSignal<SchemaDraft<BrowserFile>, LocalStorage>;

#[derive(Clone, Copy)]
pub enum ValueSource {
    Bag(FormBag),
    Preview { draft: DraftSignal, id: u32 },
}

impl ValueSource {
    /// Current value of `field`, tracked
    pub fn value(&self, field: &FieldDescriptor) -> FieldValue<BrowserFile> {
        match self {
            ValueSource::Bag(bag) => bag.with(|b| b.value_or_empty(field)),
            ValueSource::Preview { draft, id } => draft.with(|d| {
                d.get(*id)
                    .map(|f| f.value.clone())
                    .unwrap_or_else(|| FieldValue::empty(field.field_type))
            }),
        }
    }

    /// Apply widget input; refused edits leave the value as it was
    pub fn apply(&self, field: &FieldDescriptor, input: FieldInput<BrowserFile>) {
        let result = match self {
            ValueSource::Bag(bag) => bag.try_update(|b| b.edit(field, input)),
            ValueSource::Preview { draft, id } => draft.try_update(|d| d.edit_preview(*id, input)),
        };
        if let Some(Err(e)) = result {
            log::warn!("{}", e);
        }
    }
}

/// Tailwind focus ring for an accent colour
pub fn focus_ring(color: &str) -> &'static str {
    match color {
        "purple" => "focus:ring-purple-500",
        "green" => "focus:ring-green-500",
        _ => "focus:ring-blue-500",
    }
}

/// All feedback fields of a schema, bound to a call form's bag
#[component]
pub fn FeedbackFields(
    schema: Vec<FieldDescriptor>,
    bag: FormBag,
    #[prop(optional, into)] color: String,
) -> impl IntoView {
    let ring = focus_ring(&color);

    if schema.is_empty() {
        return view! {
            <p class="text-sm text-gray-500 italic">"This product has no feedback fields."</p>
        }
        .into_any();
    }

    view! {
        <div class="space-y-4">
            {schema
                .into_iter()
                .map(|field| view! { <FieldRow field=field source=ValueSource::Bag(bag) focus_ring=ring /> })
                .collect_view()}
        </div>
    }
    .into_any()
}

/// Label plus control for one field
#[component]
pub fn FieldRow(field: FieldDescriptor, source: ValueSource, focus_ring: &'static str) -> impl IntoView {
    let required = field.is_required;

    view! {
        <div>
            <label class="block text-sm font-medium text-gray-700 mb-1">
                {field.name.clone()}
                {required.then(|| view! { <span class="text-red-500">" *"</span> })}
            </label>
            <FieldControl field=field source=source focus_ring=focus_ring />
        </div>
    }
}
