//! Call logging form
//!
//! The contact and call status are always editable. Feedback fields are only
//! shown, required and submitted while the status is "completed"; moving to
//! any other status clears whatever was entered.

use dialdesk_forms::{CallStatus, Submission, ValueBag};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::api;
use crate::components::feedback_form::{BrowserFile, FeedbackFields, FormBag};
use crate::components::toast::use_toaster;
use crate::types::{CallRecord, Product};

/// `/products/:id/calls/new`
#[component]
pub fn NewCall() -> impl IntoView {
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
                    Ok(product) => view! { <CallForm product=product call=None /> }.into_any(),
                    Err(e) => view! { <div class="p-6 text-red-500">{e}</div> }.into_any(),
                })
            }}
        </Suspense>
    }
}

/// `/calls/:id/edit`
#[component]
pub fn EditCall() -> impl IntoView {
    let params = use_params_map();
    let call_id = move || params.read().get("id").unwrap_or_default();

    let data = LocalResource::new(move || {
        let id = call_id();
        async move {
            let call = api::get_call(&id).await?;
            let product = api::get_product(&call.product_id).await?;
            Ok::<_, String>((product, call))
        }
    });

    view! {
        <Suspense fallback=move || view! { <div class="p-6 text-gray-500">"Loading..."</div> }>
            {move || {
                data.get().map(|result| match result {
                    Ok((product, call)) => view! { <CallForm product=product call=Some(call) /> }.into_any(),
                    Err(e) => view! { <div class="p-6 text-red-500">{e}</div> }.into_any(),
                })
            }}
        </Suspense>
    }
}

/// Bag a form opens with: the record's feedback when it has any to show
fn initial_bag(product: &Product, call: Option<&CallRecord>) -> ValueBag<BrowserFile> {
    match call {
        Some(call) if call.status.requires_feedback() => {
            ValueBag::from_record(&product.feedback_fields, &call.feedback)
        }
        _ => ValueBag::for_schema(&product.feedback_fields),
    }
}

#[component]
fn CallForm(product: Product, call: Option<CallRecord>) -> impl IntoView {
    let toaster = use_toaster();
    let navigate = use_navigate();

    let call_id = call.as_ref().map(|c| c.id.clone());
    let is_edit = call_id.is_some();
    let (contact, set_contact) = signal(call.as_ref().map(|c| c.contact.clone()).unwrap_or_default());
    let (status, set_status) = signal(call.as_ref().map(|c| c.status).unwrap_or_default());
    let bag: FormBag = RwSignal::new_local(initial_bag(&product, call.as_ref()));
    let (saving, set_saving) = signal(false);

    let schema = StoredValue::new(product.feedback_fields.clone());
    let product_id = product.id.clone();
    let product_name = product.name.clone();

    let on_status_change = move |ev: leptos::ev::Event| {
        let Some(next) = CallStatus::parse(&event_target_value(&ev)) else {
            return;
        };
        set_status.set(next);
        if !next.requires_feedback() {
            bag.update(|b| b.clear());
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let contact_value = contact.get_untracked().trim().to_string();
        if contact_value.is_empty() {
            toaster.error("Contact is required");
            return;
        }

        let prepared = schema.with_value(|schema| {
            bag.with_untracked(|b| Submission::prepare(schema, b, status.get_untracked()))
        });
        let submission = match prepared {
            Ok(submission) => submission,
            Err(missing) => {
                toaster.error(missing.to_string());
                return;
            }
        };

        set_saving.set(true);
        let call_id = call_id.clone();
        let product_id = product_id.clone();
        let navigate = navigate.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match &call_id {
                Some(id) => api::update_call(id, &contact_value, &submission).await,
                None => api::create_call(&product_id, &contact_value, &submission).await,
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    log::info!("Saved call {} ({})", saved.id, saved.status);
                    toaster.success(if call_id.is_some() { "Call updated" } else { "Call logged" });
                    navigate("/", Default::default());
                }
                Err(e) => {
                    log::error!("Failed to save call: {}", e);
                    toaster.error(e);
                }
            }
        });
    };

    view! {
        <div class="p-6 max-w-3xl">
            <div class="mb-6">
                <h2 class="text-2xl font-bold">{if is_edit { "Edit Call" } else { "Log Call" }}</h2>
                <p class="text-gray-600 text-sm">{product_name}</p>
            </div>

            <form on:submit=on_submit class="space-y-6">
                <div class="bg-white rounded-lg shadow p-4 space-y-4">
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">
                            "Contact" <span class="text-red-500">" *"</span>
                        </label>
                        <input
                            type="text"
                            class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                            placeholder="Name or phone number"
                            prop:value=move || contact.get()
                            on:input=move |ev| set_contact.set(event_target_value(&ev))
                        />
                    </div>
                    <div>
                        <label class="block text-sm font-medium text-gray-700 mb-1">"Call status"</label>
                        <select
                            class="w-full px-3 py-2 border border-gray-300 rounded focus:outline-none focus:ring-2 focus:ring-blue-500"
                            on:change=on_status_change
                        >
                            {CallStatus::ALL
                                .into_iter()
                                .map(|option| {
                                    view! {
                                        <option
                                            value=option.as_str()
                                            prop:selected=move || status.get() == option
                                        >
                                            {option.display_name()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>

                {move || {
                    if status.get().requires_feedback() {
                        view! {
                            <div class="bg-white rounded-lg shadow p-4">
                                <h3 class="text-lg font-semibold text-gray-800 mb-4">"Feedback"</h3>
                                <FeedbackFields schema=schema.get_value() bag=bag color="blue" />
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="p-3 bg-blue-50 border border-blue-200 rounded text-blue-800 text-sm">
                                {format!(
                                    "Feedback is only collected for completed calls. A {} call is saved without feedback.",
                                    status.get().as_str(),
                                )}
                            </div>
                        }
                        .into_any()
                    }
                }}

                <div class="flex justify-end space-x-3">
                    <a href="/" class="px-4 py-2 text-gray-700 hover:text-gray-900">"Cancel"</a>
                    <button
                        type="submit"
                        class="bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded disabled:opacity-50"
                        disabled=move || saving.get()
                    >
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialdesk_forms::{FieldDescriptor, FieldType, ProductStatus};
    use serde_json::json;

    fn product() -> Product {
        Product {
            id: "loans".to_string(),
            name: "Personal loans".to_string(),
            description: None,
            status: ProductStatus::Active,
            feedback_fields: vec![FieldDescriptor::new("Notes", FieldType::Text)],
        }
    }

    fn call(status: CallStatus) -> CallRecord {
        CallRecord {
            id: "c1".to_string(),
            product_id: "loans".to_string(),
            contact: "Ada".to_string(),
            status,
            feedback: json!({"Notes": "Call back"}).as_object().cloned().unwrap(),
            made_on: "2026-03-01T09:30:00Z".to_string(),
        }
    }

    #[test]
    fn test_initial_bag_uses_completed_feedback() {
        let product = product();
        let bag = initial_bag(&product, Some(&call(CallStatus::Completed)));
        assert_eq!(bag.get("Notes").map(|v| v.display()), Some("Call back".to_string()));
    }

    #[test]
    fn test_initial_bag_is_empty_for_other_statuses() {
        let product = product();
        let bag = initial_bag(&product, Some(&call(CallStatus::Busy)));
        assert!(bag.is_empty_for(&product.feedback_fields[0]));

        let bag = initial_bag(&product, None);
        assert!(bag.is_empty_for(&product.feedback_fields[0]));
    }

    #[test]
    fn test_status_round_trip_keeps_stored_file() {
        let mut product = product();
        product.feedback_fields = vec![FieldDescriptor::new("Proof", FieldType::File).required()];
        let mut call = call(CallStatus::Completed);
        call.feedback = json!({"Proof": {"file_name": "p.pdf", "file_url": "/uploads/p.pdf"}})
            .as_object()
            .cloned()
            .unwrap();

        let mut bag = initial_bag(&product, Some(&call));
        // completed -> busy clears the entered values, busy -> completed keeps the bag
        bag.clear();

        let submission = Submission::prepare(&product.feedback_fields, &bag, CallStatus::Completed).unwrap();
        assert!(submission.files.is_empty());
        assert!(submission.feedback.is_empty());
        assert_eq!(bag.stored_file("Proof").map(|f| f.file_name.as_str()), Some("p.pdf"));
    }
}
