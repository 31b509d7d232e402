use backdrop_core::style::{ElementId, StyleSink};
use fnv::FnvHashMap;
use web_sys as web;

/// Writes custom properties on `<html>` and on registered elements.
pub struct CssVarSink {
    root: Option<web::HtmlElement>,
    elements: FnvHashMap<ElementId, web::HtmlElement>,
}

impl CssVarSink {
    pub fn new(document: &web::Document) -> Self {
        use wasm_bindgen::JsCast;
        let root = document
            .document_element()
            .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
        Self {
            root,
            elements: FnvHashMap::default(),
        }
    }

    pub fn register(&mut self, id: ElementId, el: web::HtmlElement) {
        self.elements.insert(id, el);
    }

    pub fn element(&self, id: ElementId) -> Option<&web::HtmlElement> {
        self.elements.get(&id)
    }
}

impl StyleSink for CssVarSink {
    fn set_root_var(&mut self, name: &str, value: &str) {
        if let Some(root) = &self.root {
            _ = root.style().set_property(name, value);
        }
    }

    fn set_element_var(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(el) = self.elements.get(&element) {
            _ = el.style().set_property(name, value);
        }
    }
}
