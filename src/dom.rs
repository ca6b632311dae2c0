/// Browser bindings
///
/// `DomMount` draws into a live element through `web-sys`. `WasmDataTable` is the
/// JavaScript entry point: it builds the table from a config object, then attaches one
/// listener per event type to the mount element. The mount survives every redraw, so
/// the listeners are attached once and each event is routed through the bindings of the
/// latest full draw.

use crate::config::TableConfig;
use crate::datatable::DataTable;
use crate::events::{DomEvent, EventKind};
use crate::mount::{Document, Mount};
use crate::render::{
    TableMarkup, ACTIVE_CLASS, DATA_ROW_CLASS, PAGINATE_BUTTON_CLASS, PAGINATE_WRAPPER_CLASS,
};
use crate::view::PageTarget;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, HtmlSelectElement};

/// Attributes copied from an event target into a [`DomEvent`].
const BOUND_ATTRIBUTES: [&str; 4] = ["data-columnname", "data-issortable", "data-search", "data-page"];

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Mount element in the live document.
#[derive(Debug, Clone)]
pub struct DomMount {
    element: Element,
}

impl DomMount {
    pub fn new(element: Element) -> Self {
        DomMount { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn find(&self, selector: &str) -> Option<Element> {
        match self.element.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                log::warn!("querySelector({}) failed: {:?}", selector, e);
                None
            }
        }
    }
}

impl Mount for DomMount {
    fn replace_contents(&mut self, markup: &TableMarkup) {
        self.element.set_inner_html(&markup.to_html());
    }

    fn replace_rows(&mut self, rows: &[String]) {
        let old = match self.element.query_selector_all(&format!(".{}", DATA_ROW_CLASS)) {
            Ok(old) => old,
            Err(e) => {
                log::warn!("Failed to select data rows: {:?}", e);
                return;
            }
        };
        for i in 0..old.length() {
            if let Some(row) = old.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                row.remove();
            }
        }

        let Some(body) = self.find("tbody") else {
            log::warn!("rows redraw before the table was drawn; ignoring");
            return;
        };
        if let Err(e) = body.insert_adjacent_html("beforeend", &rows.concat()) {
            log::warn!("Failed to insert rows: {:?}", e);
        }
    }

    fn replace_pagination(&mut self, html: &str) {
        match self.find(&format!(".{}", PAGINATE_WRAPPER_CLASS)) {
            Some(wrapper) => wrapper.set_inner_html(html),
            None => log::warn!("pagination redraw before the table was drawn; ignoring"),
        }
    }

    fn set_page_active(&mut self, page: usize, active: bool) {
        let selector = format!(r#".{}[data-page="{}"]"#, PAGINATE_BUTTON_CLASS, page);
        if let Some(link) = self.find(&selector) {
            if let Err(e) = link.class_list().toggle_with_force(ACTIVE_CLASS, active) {
                log::warn!("Failed to mark page {}: {:?}", page, e);
            }
        }
    }
}

/// The page's `document`.
#[derive(Debug, Clone)]
pub struct DomDocument {
    document: web_sys::Document,
}

impl DomDocument {
    pub fn new(document: web_sys::Document) -> Self {
        DomDocument { document }
    }

    /// Document of the current window, if there is one.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }
}

impl Document for DomDocument {
    type Mount = DomMount;

    fn get_element_by_id(&self, id: &str) -> Option<DomMount> {
        self.document.get_element_by_id(id).map(DomMount::new)
    }
}

/// Reduce a browser event to what the bindings inspect.
///
/// Clicks may land on an element nested in a header cell or page link, so the nearest
/// such ancestor is used as the target.
fn dom_event(kind: EventKind, event: &Event) -> Option<DomEvent> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let target = match kind {
        EventKind::Click => target
            .closest(&format!("th, .{}", PAGINATE_BUTTON_CLASS))
            .ok()
            .flatten()?,
        EventKind::KeyUp | EventKind::Change => target,
    };

    let mut dom_event = DomEvent::new(kind, target.tag_name());
    for name in BOUND_ATTRIBUTES {
        if let Some(value) = target.get_attribute(name) {
            dom_event = dom_event.attr(name, value);
        }
    }
    let classes = target.class_list();
    for i in 0..classes.length() {
        if let Some(class) = classes.item(i) {
            dom_event = dom_event.class(class);
        }
    }
    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        dom_event = dom_event.value(input.value());
    } else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        dom_event = dom_event.value(select.value());
    }
    Some(dom_event)
}

type Listener = Closure<dyn FnMut(Event)>;

fn listen(
    element: &Element,
    kind: EventKind,
    table: Rc<RefCell<DataTable<DomMount>>>,
) -> Result<Listener, JsValue> {
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(dom_event) = dom_event(kind, &event) else {
            return;
        };
        let Ok(mut table) = table.try_borrow_mut() else {
            log::warn!("Table busy; dropping {} event", kind.as_str());
            return;
        };
        if let Err(e) = table.handle(&dom_event) {
            log::warn!("Failed to handle {} event: {}", kind.as_str(), e);
        }
    });
    element.add_event_listener_with_callback(kind.as_str(), listener.as_ref().unchecked_ref())?;
    Ok(listener)
}

/// Table widget exported to JavaScript.
#[wasm_bindgen]
pub struct WasmDataTable {
    table: Rc<RefCell<DataTable<DomMount>>>,
    element: Element,
    listeners: Vec<(EventKind, Listener)>,
}

#[wasm_bindgen]
impl WasmDataTable {
    /// Build the table from a config object and draw it into the element whose id is
    /// `config.selector`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmDataTable, JsValue> {
        let config: TableConfig = serde_wasm_bindgen::from_value(config).map_err(js_err)?;
        Self::mount(config)
    }

    #[wasm_bindgen(js_name = "fromJson")]
    pub fn from_json(json: &str) -> Result<WasmDataTable, JsValue> {
        let config = TableConfig::from_json(json).map_err(js_err)?;
        Self::mount(config)
    }

    pub fn draw(&self) {
        self.table.borrow_mut().draw();
    }

    pub fn filter(&self, value: &str, column: &str) -> Result<(), JsValue> {
        self.table.borrow_mut().filter(value, column).map_err(js_err)
    }

    /// Sort by `column`; returns `"ascending"` or `"descending"`.
    pub fn sort(&self, column: &str) -> Result<JsValue, JsValue> {
        let order = self.table.borrow_mut().sort(column).map_err(js_err)?;
        serde_wasm_bindgen::to_value(&order).map_err(js_err)
    }

    /// Navigate to a page number, `"next"` or `"previous"`. Returns false when the
    /// navigation was a no-op.
    #[wasm_bindgen(js_name = "showPage")]
    pub fn show_page(&self, target: &str) -> Result<bool, JsValue> {
        let target: PageTarget = target.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.table.borrow_mut().show_page(target).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "setPageSize")]
    pub fn set_page_size(&self, limit: usize) -> Result<(), JsValue> {
        self.table.borrow_mut().set_page_size(limit).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "currentPage")]
    pub fn current_page(&self) -> usize {
        self.table.borrow().current_page()
    }

    #[wasm_bindgen(js_name = "pageCount")]
    pub fn page_count(&self) -> usize {
        self.table.borrow().page_count()
    }
}

impl WasmDataTable {
    fn mount(config: TableConfig) -> Result<WasmDataTable, JsValue> {
        config.validate().map_err(js_err)?;
        let document =
            DomDocument::current().ok_or_else(|| JsValue::from_str("no document available"))?;
        let table = DataTable::mount_in(config, &document).map_err(js_err)?;
        let element = table.mount().element().clone();
        let table = Rc::new(RefCell::new(table));

        let mut listeners = Vec::new();
        for kind in [EventKind::Click, EventKind::KeyUp, EventKind::Change] {
            listeners.push((kind, listen(&element, kind, table.clone())?));
        }

        Ok(WasmDataTable {
            table,
            element,
            listeners,
        })
    }
}

impl Drop for WasmDataTable {
    fn drop(&mut self) {
        for (kind, listener) in self.listeners.drain(..) {
            let _ = self
                .element
                .remove_event_listener_with_callback(kind.as_str(), listener.as_ref().unchecked_ref());
        }
    }
}
