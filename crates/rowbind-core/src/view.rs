#![allow(non_snake_case)]
//! Minimal row view tree.
//!
//! A `View` is what a bind function writes into. Hosts either render it
//! directly or use their own view type with the binder instead.

use std::rc::Rc;

pub type ViewId = u64;

pub type Callback = Rc<dyn Fn()>;

#[derive(Clone)]
pub enum ViewKind {
    Box,
    Row,
    Column,
    Text {
        text: String,
    },
    Checkbox {
        checked: bool,
        label: String,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text } => f.debug_struct("Text").field("text", text).finish(),
            ViewKind::Checkbox { checked, label, .. } => f
                .debug_struct("Checkbox")
                .field("checked", checked)
                .field("label", label)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub children: Vec<View>,
    pub on_click: Option<ClickHandler>,
}

/// Click handler attached to a whole row.
#[derive(Clone)]
pub struct ClickHandler(pub Callback);

impl std::fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<callback>")
    }
}

impl Default for View {
    fn default() -> Self {
        View::new(0, ViewKind::Box)
    }
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            children: vec![],
            on_click: None,
        }
    }
    pub fn with_id(mut self, id: ViewId) -> Self {
        self.id = id;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }
    pub fn on_click(mut self, f: impl Fn() + 'static) -> Self {
        self.on_click = Some(ClickHandler(Rc::new(f)));
        self
    }

    /// Invokes the row's click handler. Returns false if none is attached.
    pub fn click(&self) -> bool {
        match &self.on_click {
            Some(ClickHandler(f)) => {
                f();
                true
            }
            None => false,
        }
    }

    /// All text in depth-first order, checkbox labels included.
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            ViewKind::Text { text } => out.push(text),
            ViewKind::Checkbox { label, .. } => out.push(label),
            ViewKind::Box | ViewKind::Row | ViewKind::Column => {}
        }
        for c in &self.children {
            c.collect_texts(out);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(View::node_count).sum::<usize>()
    }
}

pub fn Row() -> View {
    View::new(0, ViewKind::Row)
}

pub fn Column() -> View {
    View::new(0, ViewKind::Column)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(0, ViewKind::Text { text: text.into() })
}

pub fn Checkbox(checked: bool, label: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Checkbox {
            checked,
            label: label.into(),
        },
    )
}
