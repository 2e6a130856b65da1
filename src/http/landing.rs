//! Landing page.
//!
//! The catalog is fixed for the lifetime of the process, so the page is
//! rendered once at startup and served from memory.

use minijinja::{context, Environment};

use crate::config::CatalogConfig;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Render the landing page for `catalog`. Values are HTML-escaped.
pub fn render_landing(catalog: &CatalogConfig) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("index.html", INDEX_TEMPLATE)?;
    env.get_template("index.html")?.render(context! {
        suburbs => &catalog.suburbs,
        property_types => &catalog.property_types,
        default_suburb => &catalog.default_suburb,
        default_property_type => &catalog.default_property_type,
    })
}
