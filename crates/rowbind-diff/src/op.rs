use std::fmt;

/// One step of an edit script.
///
/// Steps are sequential: positions refer to the list as left by the previous
/// step. `Move` takes the row out at `from` and puts it back so that it ends
/// up at `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListOp {
    Insert { position: usize, count: usize },
    Remove { position: usize, count: usize },
    Move { from: usize, to: usize },
    Change { position: usize, count: usize },
}

impl fmt::Display for ListOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ListOp::Insert { position, count } => write!(f, "ins({position},{count})"),
            ListOp::Remove { position, count } => write!(f, "rem({position},{count})"),
            ListOp::Move { from, to } => write!(f, "mov({from},{to})"),
            ListOp::Change { position, count } => write!(f, "chg({position},{count})"),
        }
    }
}

/// Receiver of edit-script steps, usually the display surface animating rows.
pub trait ListUpdateCallback {
    fn on_inserted(&mut self, position: usize, count: usize);
    fn on_removed(&mut self, position: usize, count: usize);
    fn on_moved(&mut self, from: usize, to: usize);
    fn on_changed(&mut self, position: usize, count: usize);
}

impl<L: ListUpdateCallback + ?Sized> ListUpdateCallback for &mut L {
    fn on_inserted(&mut self, position: usize, count: usize) {
        (**self).on_inserted(position, count)
    }
    fn on_removed(&mut self, position: usize, count: usize) {
        (**self).on_removed(position, count)
    }
    fn on_moved(&mut self, from: usize, to: usize) {
        (**self).on_moved(from, to)
    }
    fn on_changed(&mut self, position: usize, count: usize) {
        (**self).on_changed(position, count)
    }
}

impl ListOp {
    pub fn dispatch(self, cb: &mut impl ListUpdateCallback) {
        match self {
            ListOp::Insert { position, count } => cb.on_inserted(position, count),
            ListOp::Remove { position, count } => cb.on_removed(position, count),
            ListOp::Move { from, to } => cb.on_moved(from, to),
            ListOp::Change { position, count } => cb.on_changed(position, count),
        }
    }
}

/// Records dispatched steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpLog(pub Vec<ListOp>);

impl OpLog {
    pub fn script(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ListUpdateCallback for OpLog {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.0.push(ListOp::Insert { position, count });
    }
    fn on_removed(&mut self, position: usize, count: usize) {
        self.0.push(ListOp::Remove { position, count });
    }
    fn on_moved(&mut self, from: usize, to: usize) {
        self.0.push(ListOp::Move { from, to });
    }
    fn on_changed(&mut self, position: usize, count: usize) {
        self.0.push(ListOp::Change { position, count });
    }
}
