use leptos::prelude::*;

use crate::api;
use crate::types::{short_timestamp, CallRecord, Product};

#[component]
pub fn Products() -> impl IntoView {
    let products = LocalResource::new(|| async move { api::list_products().await });

    view! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <h2 class="text-2xl font-bold">"Products"</h2>
            </div>

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading..."</div> }>
                {move || {
                    products.get().map(|data| {
                        match data {
                            Ok(list) if !list.is_empty() => view! {
                                <div class="space-y-4">
                                    {list.into_iter().map(|product| {
                                        view! { <ProductCard product=product /> }
                                    }).collect::<Vec<_>>()}
                                </div>
                            }.into_any(),
                            Ok(_) => view! {
                                <div class="text-center py-12 bg-white rounded-lg shadow">
                                    <p class="text-gray-500">"No products configured"</p>
                                </div>
                            }.into_any(),
                            Err(e) => view! {
                                <div class="text-red-500">{format!("Failed to load products: {}", e)}</div>
                            }.into_any(),
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn ProductCard(product: Product) -> impl IntoView {
    let fields_count = product.feedback_fields.len();
    let active = product.is_active();
    let new_call_href = format!("/products/{}/calls/new", product.id);
    let fields_href = format!("/products/{}/fields", product.id);

    view! {
        <div class="bg-white rounded-lg shadow p-4 hover:shadow-md transition-shadow">
            <div class="flex justify-between items-start mb-2">
                <div>
                    <h3 class="font-bold text-lg text-gray-900">{product.name.clone()}</h3>
                    <p class="text-gray-600 text-sm">{product.description.clone().unwrap_or_default()}</p>
                </div>
                <div class="flex space-x-2">
                    <span class="px-2 py-1 text-xs rounded bg-blue-100 text-blue-800">
                        {format!("{} feedback fields", fields_count)}
                    </span>
                    {(!active).then(|| view! {
                        <span class="px-2 py-1 text-xs rounded bg-gray-100 text-gray-600">"Disabled"</span>
                    })}
                </div>
            </div>

            <RecentCalls product_id=product.id.clone() />

            <div class="flex justify-end space-x-3 mt-4">
                <a href=fields_href class="text-sm text-gray-600 hover:text-gray-900">"Feedback fields"</a>
                {active.then(|| view! {
                    <a href=new_call_href class="text-sm bg-blue-500 hover:bg-blue-600 text-white px-3 py-1 rounded">
                        "+ Log call"
                    </a>
                })}
            </div>
        </div>
    }
}

#[component]
fn RecentCalls(product_id: String) -> impl IntoView {
    let calls = LocalResource::new(move || {
        let product_id = product_id.clone();
        async move { api::list_calls(&product_id).await }
    });

    view! {
        <Suspense fallback=|| ()>
            {move || {
                calls.get().map(|data| match data {
                    Ok(list) if !list.is_empty() => view! {
                        <ul class="mt-3 divide-y divide-gray-100 border-t border-gray-100">
                            {list.into_iter().take(5).map(|call| view! { <CallRow call=call /> }).collect::<Vec<_>>()}
                        </ul>
                    }.into_any(),
                    Ok(_) => view! {
                        <p class="mt-3 text-sm text-gray-400">"No calls logged yet"</p>
                    }.into_any(),
                    Err(e) => view! {
                        <p class="mt-3 text-sm text-red-500">{e}</p>
                    }.into_any(),
                })
            }}
        </Suspense>
    }
}

#[component]
fn CallRow(call: CallRecord) -> impl IntoView {
    let badge = if call.status.requires_feedback() {
        "bg-green-100 text-green-800"
    } else {
        "bg-yellow-100 text-yellow-800"
    };
    let edit_href = format!("/calls/{}/edit", call.id);

    view! {
        <li class="py-2 flex justify-between items-center text-sm">
            <div class="flex items-center gap-3">
                <span class="font-medium text-gray-800">{call.contact.clone()}</span>
                <span class=format!("px-2 py-0.5 text-xs rounded {}", badge)>
                    {call.status.display_name()}
                </span>
                <span class="text-gray-400">{short_timestamp(&call.made_on)}</span>
            </div>
            <a href=edit_href class="text-blue-600 hover:text-blue-900">"Edit"</a>
        </li>
    }
}
