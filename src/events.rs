/// Event binding
///
/// After every full draw the controller runs [`EventBinder::bind`] to produce the
/// [`Bindings`] for the markup now in the mount. Bindings turn a raw [`DomEvent`] (kind plus
/// the target element's attributes) into a [`TableEvent`] the controller applies to the
/// model. Events that do not hit a bound element resolve to nothing.

use crate::error::{Result, TableError};
use crate::render::{LIMIT_SELECT_CLASS, PAGINATE_BUTTON_CLASS, SEARCH_INPUT_CLASS};
use crate::table::Schema;
use crate::view::PageTarget;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Interactions the table responds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TableEvent {
    /// Header click on a sortable column
    Sort { column: String },

    /// Keystroke in a filter input
    Filter { column: String, value: String },

    /// Click on a page, previous or next link
    ShowPage { target: PageTarget },

    /// New choice in the entries-per-page selector
    SetPageSize { limit: usize },
}

/// Parse a script of table events, one JSON object per line. Blank lines are skipped.
/// Each event is returned with its 1-based line number.
pub fn parse_event_script(script: &str) -> Result<Vec<(usize, TableEvent)>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map(|event| (i + 1, event))
                .map_err(|source| TableError::EventScript { line: i + 1, source })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    KeyUp,
    Change,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyUp => "keyup",
            EventKind::Change => "change",
        }
    }
}

/// A DOM event reduced to what the bindings inspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Lower-case tag name of the target element
    pub tag: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Current value of an input or select target
    #[serde(default)]
    pub value: Option<String>,
}

impl DomEvent {
    pub fn new(kind: EventKind, tag: impl Into<String>) -> Self {
        DomEvent {
            kind,
            tag: tag.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            value: None,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Click on the header cell of `column`.
    pub fn header_click(column: &str, sortable: bool) -> Self {
        DomEvent::new(EventKind::Click, "th")
            .attr("data-columnname", column)
            .attr("data-issortable", sortable.to_string())
    }

    /// Keystroke in the filter input of `column`, whose text is now `value`.
    pub fn filter_keyup(column: &str, value: &str) -> Self {
        DomEvent::new(EventKind::KeyUp, "input")
            .class(SEARCH_INPUT_CLASS)
            .attr("data-search", "true")
            .attr("data-columnname", column)
            .value(value)
    }

    /// Click on a pagination link.
    pub fn page_click(target: PageTarget) -> Self {
        DomEvent::new(EventKind::Click, "a")
            .class(PAGINATE_BUTTON_CLASS)
            .attr("data-page", target.to_string())
    }

    /// New selection in the entries-per-page selector.
    pub fn page_size_change(limit: usize) -> Self {
        DomEvent::new(EventKind::Change, "select")
            .class(LIMIT_SELECT_CLASS)
            .value(limit.to_string())
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Handlers attached for one drawn table.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    sortable: HashSet<String>,
    filterable: HashSet<String>,
    paginated: bool,
    /// Number of the bind pass that produced these bindings; 0 before the first draw
    generation: u64,
}

impl Bindings {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_paginated(&self) -> bool {
        self.paginated
    }

    pub fn sorts(&self, column: &str) -> bool {
        self.sortable.contains(column)
    }

    pub fn filters(&self, column: &str) -> bool {
        self.filterable.contains(column)
    }

    /// Map a DOM event to the table interaction it triggers, if any.
    pub fn resolve(&self, event: &DomEvent) -> Option<TableEvent> {
        match event.kind {
            EventKind::Click if event.tag == "th" => {
                if event.get_attribute("data-issortable") != Some("true") {
                    return None;
                }
                let column = event.get_attribute("data-columnname")?;
                self.sorts(column).then(|| TableEvent::Sort {
                    column: column.to_string(),
                })
            }
            EventKind::Click if self.paginated && event.has_class(PAGINATE_BUTTON_CLASS) => {
                let page = event.get_attribute("data-page")?;
                match page.parse::<PageTarget>() {
                    Ok(target) => Some(TableEvent::ShowPage { target }),
                    Err(e) => {
                        log::warn!("{}", e);
                        None
                    }
                }
            }
            EventKind::KeyUp if event.tag == "input" => {
                if event.get_attribute("data-search") != Some("true") {
                    return None;
                }
                let column = event.get_attribute("data-columnname")?;
                self.filters(column).then(|| TableEvent::Filter {
                    column: column.to_string(),
                    value: event.value.clone().unwrap_or_default(),
                })
            }
            EventKind::Change if self.paginated && event.has_class(LIMIT_SELECT_CLASS) => {
                let value = event.value.as_deref()?;
                match value.trim().parse::<usize>() {
                    Ok(limit) => Some(TableEvent::SetPageSize { limit }),
                    Err(_) => {
                        log::warn!("Unknown page size: '{}'", value);
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

/// Builds the bindings for the markup of a full draw.
pub struct EventBinder;

impl EventBinder {
    pub fn bind(schema: &Schema, paginated: bool, generation: u64) -> Bindings {
        let columns = schema.columns();
        Bindings {
            sortable: columns
                .iter()
                .filter(|c| c.is_sortable())
                .map(|c| c.key().to_string())
                .collect(),
            filterable: columns
                .iter()
                .filter(|c| c.is_filterable())
                .map(|c| c.key().to_string())
                .collect(),
            paginated,
            generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnDef, TypeInference};
    use crate::table::Dataset;

    fn bindings(paginated: bool) -> Bindings {
        let defs = vec![
            ColumnDef::new("Name", "name").sortable().filterable(),
            ColumnDef::new("Region", "region"),
        ];
        let schema = Schema::infer(defs, &Dataset::default(), TypeInference::FirstRow);
        EventBinder::bind(&schema, paginated, 1)
    }

    #[test]
    fn test_header_click() {
        let b = bindings(true);
        assert_eq!(
            b.resolve(&DomEvent::header_click("name", true)),
            Some(TableEvent::Sort {
                column: "name".to_string()
            })
        );
        assert_eq!(b.resolve(&DomEvent::header_click("region", false)), None);
        // Attribute says sortable, but the column was not bound as sortable.
        assert_eq!(b.resolve(&DomEvent::header_click("region", true)), None);
        assert_eq!(b.resolve(&DomEvent::header_click("capital", true)), None);
    }

    #[test]
    fn test_filter_keyup() {
        let b = bindings(false);
        assert_eq!(
            b.resolve(&DomEvent::filter_keyup("name", "nor")),
            Some(TableEvent::Filter {
                column: "name".to_string(),
                value: "nor".to_string()
            })
        );
        assert_eq!(b.resolve(&DomEvent::filter_keyup("region", "x")), None);

        let plain_input = DomEvent::new(EventKind::KeyUp, "input").attr("data-columnname", "name");
        assert_eq!(b.resolve(&plain_input), None);
    }

    #[test]
    fn test_pagination_events() {
        let b = bindings(true);
        assert_eq!(
            b.resolve(&DomEvent::page_click(PageTarget::Next)),
            Some(TableEvent::ShowPage {
                target: PageTarget::Next
            })
        );
        assert_eq!(
            b.resolve(&DomEvent::page_click(PageTarget::Page(3))),
            Some(TableEvent::ShowPage {
                target: PageTarget::Page(3)
            })
        );
        assert_eq!(
            b.resolve(&DomEvent::page_size_change(25)),
            Some(TableEvent::SetPageSize { limit: 25 })
        );

        let bogus = DomEvent::new(EventKind::Click, "a")
            .class(PAGINATE_BUTTON_CLASS)
            .attr("data-page", "last");
        assert_eq!(b.resolve(&bogus), None);
    }

    #[test]
    fn test_pagination_unbound_when_disabled() {
        let b = bindings(false);
        assert_eq!(b.resolve(&DomEvent::page_click(PageTarget::Next)), None);
        assert_eq!(b.resolve(&DomEvent::page_size_change(25)), None);
    }

    #[test]
    fn test_unbound_before_first_draw() {
        let b = Bindings::default();
        assert_eq!(b.generation(), 0);
        assert_eq!(b.resolve(&DomEvent::header_click("name", true)), None);
    }

    #[test]
    fn test_parse_event_script() {
        let script = "{\"type\": \"Sort\", \"column\": \"name\"}\n\n   \n{\"type\": \"SetPageSize\", \"limit\": 25}\n";
        let events = parse_event_script(script).unwrap();
        assert_eq!(
            events,
            vec![
                (
                    1,
                    TableEvent::Sort {
                        column: "name".to_string()
                    }
                ),
                (4, TableEvent::SetPageSize { limit: 25 }),
            ]
        );

        let err = parse_event_script("{\"type\": \"Sort\", \"column\": \"a\"}\n{\"type\": \"Jump\"}").unwrap_err();
        assert!(matches!(err, TableError::EventScript { line: 2, .. }));
        assert!(err.to_string().starts_with("event script line 2: "));
    }

    #[test]
    fn test_table_event_json() {
        let event: TableEvent =
            serde_json::from_str(r#"{"type": "Filter", "column": "name", "value": "a"}"#).unwrap();
        assert_eq!(
            event,
            TableEvent::Filter {
                column: "name".to_string(),
                value: "a".to_string()
            }
        );

        let event: TableEvent =
            serde_json::from_str(r#"{"type": "ShowPage", "target": {"page": 2}}"#).unwrap();
        assert_eq!(
            event,
            TableEvent::ShowPage {
                target: PageTarget::Page(2)
            }
        );

        let json = serde_json::to_string(&TableEvent::ShowPage {
            target: PageTarget::Next,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"ShowPage","target":"next"}"#);
    }
}
