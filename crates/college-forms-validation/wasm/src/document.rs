//! `Document` implementation over the live DOM

use college_forms::{Document, ValidityState};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Fields the engine validates
const FIELD_SELECTOR: &str = "input, select, textarea";

/// The page's document, seen through the engine's `Document` seam
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

/// A form control, whichever element it is
enum Control {
    Input(HtmlInputElement),
    Select(HtmlSelectElement),
    TextArea(HtmlTextAreaElement),
}

impl Control {
    fn of(field: &HtmlElement) -> Option<Self> {
        if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
            return Some(Control::Input(input.clone()));
        }
        if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
            return Some(Control::Select(select.clone()));
        }
        field
            .dyn_ref::<HtmlTextAreaElement>()
            .map(|area| Control::TextArea(area.clone()))
    }

    fn form(&self) -> Option<HtmlFormElement> {
        match self {
            Control::Input(el) => el.form(),
            Control::Select(el) => el.form(),
            Control::TextArea(el) => el.form(),
        }
    }

    fn value(&self) -> String {
        match self {
            Control::Input(el) => el.value(),
            Control::Select(el) => el.value(),
            Control::TextArea(el) => el.value(),
        }
    }

    fn kind(&self) -> String {
        match self {
            Control::Input(el) => el.type_(),
            Control::Select(el) => el.type_(),
            Control::TextArea(el) => el.type_(),
        }
    }

    fn disabled(&self) -> bool {
        match self {
            Control::Input(el) => el.disabled(),
            Control::Select(el) => el.disabled(),
            Control::TextArea(el) => el.disabled(),
        }
    }

    fn validity(&self) -> web_sys::ValidityState {
        match self {
            Control::Input(el) => el.validity(),
            Control::Select(el) => el.validity(),
            Control::TextArea(el) => el.validity(),
        }
    }
}

/// Report a failed DOM call on the console instead of dropping it
fn warn_on_err<T>(result: Result<T, JsValue>, action: &str) {
    if let Err(err) = result {
        web_sys::console::warn_2(&format!("Validation could not {}:", action).into(), &err);
    }
}

/// Copy the browser's validity flags into the engine's type
fn native_validity(state: &web_sys::ValidityState) -> ValidityState {
    ValidityState {
        value_missing: state.value_missing(),
        type_mismatch: state.type_mismatch(),
        pattern_mismatch: state.pattern_mismatch(),
        too_long: state.too_long(),
        too_short: state.too_short(),
        range_underflow: state.range_underflow(),
        range_overflow: state.range_overflow(),
        step_mismatch: state.step_mismatch(),
        bad_input: state.bad_input(),
        custom_error: state.custom_error(),
    }
}

impl BrowserDocument {
    /// The document of the current window, if there is one
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    pub fn inner(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn form(&self, form_id: &str) -> Option<HtmlFormElement> {
        self.document
            .get_element_by_id(form_id)?
            .dyn_into::<HtmlFormElement>()
            .ok()
    }
}

impl Document for BrowserDocument {
    type Handle = HtmlElement;

    fn has_form(&self, form_id: &str) -> bool {
        self.form(form_id).is_some()
    }

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn form_id_of(&self, field: &HtmlElement) -> Option<String> {
        let id = Control::of(field)?.form()?.id();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    fn form_fields(&self, form_id: &str) -> Vec<HtmlElement> {
        let Some(form) = self.form(form_id) else {
            return Vec::new();
        };
        let Ok(list) = form.query_selector_all(FIELD_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn value(&self, field: &HtmlElement) -> String {
        Control::of(field).map(|c| c.value()).unwrap_or_default()
    }

    fn input_type(&self, field: &HtmlElement) -> String {
        Control::of(field).map(|c| c.kind()).unwrap_or_default()
    }

    fn is_disabled(&self, field: &HtmlElement) -> bool {
        Control::of(field).is_some_and(|c| c.disabled())
    }

    fn attribute(&self, field: &HtmlElement, name: &str) -> Option<String> {
        field.get_attribute(name)
    }

    fn validity(&self, field: &HtmlElement) -> ValidityState {
        Control::of(field)
            .map(|c| native_validity(&c.validity()))
            .unwrap_or_default()
    }

    fn has_class(&self, field: &HtmlElement, class: &str) -> bool {
        field.class_list().contains(class)
    }

    fn add_class(&mut self, field: &HtmlElement, class: &str) {
        // Fails for empty or whitespace-containing class names
        warn_on_err(field.class_list().add_1(class), &format!("add class '{}'", class));
    }

    fn remove_class(&mut self, field: &HtmlElement, class: &str) {
        warn_on_err(field.class_list().remove_1(class), &format!("remove class '{}'", class));
    }

    fn remove_feedback(&mut self, field: &HtmlElement, classes: &[&str]) {
        let Some(parent) = field.parent_element() else {
            return;
        };
        // The collection is live; snapshot it before removing
        let children = parent.children();
        let stale: Vec<web_sys::Element> = (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| {
                let list = child.class_list();
                classes.iter().any(|class| list.contains(class))
            })
            .collect();
        for child in stale {
            child.remove();
        }
    }

    fn append_feedback(&mut self, field: &HtmlElement, class: &str, text: &str) {
        let Some(parent) = field.parent_element() else {
            return;
        };
        let node = match self.document.create_element("div") {
            Ok(node) => node,
            Err(err) => {
                warn_on_err::<()>(Err(err), "create a feedback node");
                return;
            }
        };
        node.set_class_name(class);
        node.set_text_content(Some(text));
        warn_on_err(parent.append_child(&node), "append a feedback node");
    }

    fn focus(&mut self, field: &HtmlElement) {
        warn_on_err(field.focus(), "focus the first invalid field");
    }
}
