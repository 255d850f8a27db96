//! College Forms Validation WASM
//!
//! WebAssembly bindings for the college-forms field validation engine.
//! Exposes `init`, `validateForm`, `validateField` and `resetForm` to page
//! scripts and wires DOM listeners to the engine's trigger dispatch.

mod document;

pub use document::BrowserDocument;

use std::cell::RefCell;
use std::collections::HashMap;

use college_forms::{
    Document, EventOutcome, FieldTarget, FormEvent, FormValidator, FormsConfig, ValidationOptions,
    ValidationSettings,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement};

thread_local! {
    static VALIDATOR: RefCell<FormValidator<BrowserDocument>> = RefCell::new(FormValidator::new());
    static LISTENERS: RefCell<HashMap<String, Vec<Listener>>> = RefCell::new(HashMap::new());
}

/// An attached DOM listener; dropping it detaches it
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Bind the well-known forms once the DOM is ready
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let Some(doc) = BrowserDocument::current() else {
        return;
    };

    if doc.is_loading() {
        let ready = Closure::once_into_js(bind_known_forms);
        let _ = doc
            .inner()
            .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref());
    } else {
        bind_known_forms();
    }
}

/// Bind validation to a form
///
/// # Example (JavaScript)
/// ```javascript
/// init('collegeForm', { showValidFeedback: true, errorClass: 'has-error' });
/// ```
#[wasm_bindgen(js_name = init)]
pub fn init_form(form_id: &str, options: JsValue) -> bool {
    let options: ValidationOptions = if options.is_undefined() || options.is_null() {
        ValidationOptions::default()
    } else {
        match serde_wasm_bindgen::from_value(options) {
            Ok(options) => options,
            Err(err) => {
                web_sys::console::warn_1(&format!("Invalid validation options: {}", err).into());
                return false;
            }
        }
    };

    let Some(doc) = BrowserDocument::current() else {
        return false;
    };
    bind_form(&doc, form_id, options.merge_over(&ValidationSettings::default()))
}

/// Validate every field of a bound form
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(form_id: &str) -> bool {
    with_validator(false, |validator, doc| validator.validate_form(doc, form_id))
}

/// Validate one field, given as an element or an element id
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(field: JsValue) -> bool {
    with_validator(false, |validator, doc| {
        if let Some(id) = field.as_string() {
            validator.validate_field(doc, id.as_str())
        } else if let Some(element) = field.dyn_ref::<HtmlElement>() {
            validator.validate_field(doc, FieldTarget::Handle(element.clone()))
        } else {
            false
        }
    })
}

/// Clear validation classes and messages from a bound form
#[wasm_bindgen(js_name = resetForm)]
pub fn reset_form(form_id: &str) -> bool {
    with_validator(false, |validator, doc| validator.reset_form(doc, form_id).is_ok())
}

fn with_validator<T>(
    fallback: T,
    f: impl FnOnce(&FormValidator<BrowserDocument>, &mut BrowserDocument) -> T,
) -> T {
    let Some(mut doc) = BrowserDocument::current() else {
        return fallback;
    };
    VALIDATOR.with(|validator| f(&validator.borrow(), &mut doc))
}

fn dispatch(event: FormEvent<HtmlElement>) -> EventOutcome {
    with_validator(EventOutcome::default(), |validator, doc| {
        validator.handle_event(doc, event)
    })
}

fn bind_known_forms() {
    let Some(doc) = BrowserDocument::current() else {
        return;
    };
    let config = FormsConfig::default();
    for form_id in &config.auto_bind {
        if doc.has_form(form_id) {
            bind_form(&doc, form_id, config.settings_for(form_id));
        }
    }
}

/// Register the form with the engine and (re)attach its DOM listeners
///
/// Rebinding drops the previous listeners, so triggers never fire twice.
fn bind_form(doc: &BrowserDocument, form_id: &str, settings: ValidationSettings) -> bool {
    let bound = VALIDATOR.with(|validator| {
        validator
            .borrow_mut()
            .bind_with_settings(doc, form_id, settings.clone())
    });
    if bound.is_err() {
        return false;
    }

    match attach_listeners(doc, form_id, &settings) {
        Ok(listeners) => {
            LISTENERS.with(|all| all.borrow_mut().insert(form_id.to_string(), listeners));
            true
        }
        Err(err) => {
            web_sys::console::error_2(&"Failed to attach validation listeners:".into(), &err);
            LISTENERS.with(|all| all.borrow_mut().remove(form_id));
            VALIDATOR.with(|validator| validator.borrow_mut().unbind(form_id));
            false
        }
    }
}

fn attach_listeners(
    doc: &BrowserDocument,
    form_id: &str,
    settings: &ValidationSettings,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::new();

    if settings.validate_on_submit {
        let form = doc
            .form(form_id)
            .ok_or_else(|| JsValue::from_str("form is no longer in the document"))?;
        let id = form_id.to_string();
        listeners.push(Listener::attach(&form, "submit", move |event: Event| {
            let outcome = dispatch(FormEvent::Submit(id.clone()));
            if outcome.default_prevented {
                event.prevent_default();
            }
            if outcome.propagation_stopped {
                event.stop_propagation();
            }
        })?);
    }

    if !settings.listens_to_fields() {
        return Ok(listeners);
    }

    for field in doc.form_fields(form_id) {
        if settings.validate_on_change {
            let target = field.clone();
            listeners.push(Listener::attach(&field, "input", move |_| {
                dispatch(FormEvent::Input(target.clone()));
            })?);

            let target = field.clone();
            listeners.push(Listener::attach(&field, "change", move |_| {
                dispatch(FormEvent::Change(target.clone()));
            })?);
        }

        if settings.validate_on_blur {
            let target = field.clone();
            listeners.push(Listener::attach(&field, "blur", move |_| {
                dispatch(FormEvent::Blur(target.clone()));
            })?);
        }
    }

    Ok(listeners)
}
