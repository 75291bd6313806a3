mod resource;

use proc_macro::TokenStream;

/// Derive macro for implementing the `Resource` trait on a row struct.
///
/// # Usage
///
/// ```ignore
/// use resource_browser::Resource;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize, Resource)]
/// #[resource(name = "products")]
/// pub struct Product {
///     #[resource(id)]
///     pub sku: String,
///     pub name: String,
///     pub status: String,
/// }
/// ```
///
/// - `#[resource(name = "...")]` sets the resource name used in endpoint
///   paths and log fields. If omitted, defaults to snake_case struct name + "s".
/// - `#[resource(id)]` marks the immutable identity field. If omitted,
///   defaults to a field named `id`. The field must implement `Display`.
#[proc_macro_derive(Resource, attributes(resource))]
pub fn derive_resource(input: TokenStream) -> TokenStream {
    resource::derive_resource(input)
}
