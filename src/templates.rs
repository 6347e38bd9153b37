// src/templates.rs
//! Page templates, compiled into the binary.
use handlebars::{Handlebars, TemplateError};

pub const LOGIN: &str = "login";
pub const HOME: &str = "home";
pub const NO_PRIVILEGES: &str = "no_privileges";
pub const CATALOG_LIST: &str = "catalog_list";
pub const CATALOG_FORM: &str = "catalog_form";
pub const SUBCATEGORY_LIST: &str = "subcategory_list";
pub const SUBCATEGORY_FORM: &str = "subcategory_form";
pub const PRODUCT_LIST: &str = "product_list";
pub const PRODUCT_FORM: &str = "product_form";
pub const CONFIRM_REMOVAL: &str = "confirm_removal";

const PARTIALS: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.hbs")),
    ("field_errors", include_str!("../templates/field_errors.hbs")),
];

const PAGES: &[(&str, &str)] = &[
    (LOGIN, include_str!("../templates/login.hbs")),
    (HOME, include_str!("../templates/home.hbs")),
    (NO_PRIVILEGES, include_str!("../templates/no_privileges.hbs")),
    (CATALOG_LIST, include_str!("../templates/catalog_list.hbs")),
    (CATALOG_FORM, include_str!("../templates/catalog_form.hbs")),
    (SUBCATEGORY_LIST, include_str!("../templates/subcategory_list.hbs")),
    (SUBCATEGORY_FORM, include_str!("../templates/subcategory_form.hbs")),
    (PRODUCT_LIST, include_str!("../templates/product_list.hbs")),
    (PRODUCT_FORM, include_str!("../templates/product_form.hbs")),
    (CONFIRM_REMOVAL, include_str!("../templates/confirm_removal.hbs")),
];

pub fn build() -> Result<Handlebars<'static>, TemplateError> {
    let mut registry = Handlebars::new();
    for (name, source) in PARTIALS {
        registry.register_partial(name, *source)?;
    }
    for (name, source) in PAGES {
        registry.register_template_string(name, *source)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_page_compiles_and_renders_with_layout() {
        let registry = build().unwrap();
        for (name, _) in PAGES {
            let html = registry
                .render(name, &json!({ "page_title": "Probe", "user": "clerk" }))
                .unwrap();
            assert!(html.contains("<title>Probe"), "{name} missing layout");
        }
    }

    #[test]
    fn field_errors_are_escaped() {
        let registry = build().unwrap();
        let html = registry
            .render(
                CATALOG_FORM,
                &json!({ "page_title": "New", "form": {}, "errors": { "description": ["<b>bad</b>"] } }),
            )
            .unwrap();
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }
}
