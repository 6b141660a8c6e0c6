use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rowbind_core::{Checkbox, LoadState, Logger, Row, Text, View, init_logging};
use rowbind_diff::KeyedCallback;
use rowbind_list::ListBinder;

#[derive(Clone, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    last_name: String,
    active: bool,
}

fn user(id: u32, name: &str, last_name: &str, active: bool) -> User {
    User {
        id,
        name: name.into(),
        last_name: last_name.into(),
        active,
    }
}

enum UiEvent {
    Users(LoadState<Vec<User>>),
    DiffReady,
    Done,
}

/// Stand-in for a network/database repository.
fn fetch_users(round: u32) -> Result<Vec<User>, String> {
    match round {
        0 => Ok(vec![
            user(1, "Ada", "Lovelace", true),
            user(2, "Alan", "Turing", false),
            user(3, "Grace", "Hopper", true),
        ]),
        1 => Ok(vec![
            user(3, "Grace", "Hopper", true),
            user(1, "Ada", "King", true),
            user(4, "Edsger", "Dijkstra", false),
        ]),
        _ => Err("connection reset".into()),
    }
}

// Moved rows are not rebound, so the row number is read at render time.
fn bind_user(user: &User, view: &mut View, _position: usize) {
    let status = if user.active { "active" } else { "inactive" };
    *view = Row()
        .with_id(user.id as u64)
        .child(Text(format!("{} {}", user.name, user.last_name)))
        .child(Checkbox(user.active, status));
}

fn render_lines(binder: &mut ListBinder<User, View>) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::with_capacity(binder.item_count());
    for position in 0..binder.item_count() {
        let line = binder.bind_row(position)?.texts().join(" | ");
        let row = binder.holder_at(position).map_or(position, |h| h.position);
        lines.push(format!("#{row} | {line}"));
    }
    Ok(lines)
}

fn render(binder: &mut ListBinder<User, View>) -> anyhow::Result<()> {
    for line in render_lines(binder)? {
        println!("  {line}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let logger = Logger::new("UserList");

    let (tx, rx) = mpsc::channel::<UiEvent>();

    let mut binder = {
        let waker = tx.clone();
        ListBinder::builder(
            KeyedCallback::new(|u: &User| u.id),
            |_view_type| Ok(View::default()),
            bind_user,
        )
        .on_row_activated(|u: &User| log::info!("selected {} {}", u.name, u.last_name))
        .on_result_ready(move || {
            let _ = waker.send(UiEvent::DiffReady);
        })
        .build()?
    };

    let repo = thread::spawn(move || {
        for round in 0..3 {
            let _ = tx.send(UiEvent::Users(LoadState::Loading));
            thread::sleep(Duration::from_millis(50));
            let _ = tx.send(UiEvent::Users(LoadState::from_result(fetch_users(round))));
            thread::sleep(Duration::from_millis(50));
        }
        let _ = tx.send(UiEvent::Done);
    });

    loop {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(UiEvent::Users(LoadState::Loading)) => logger.d("loading users"),
            Ok(UiEvent::Users(LoadState::Success(users))) => {
                logger.i(&format!("loaded {} users", users.len()));
                binder.submit_list(users)?;
            }
            Ok(UiEvent::Users(LoadState::Error(msg))) => {
                logger.e(&format!("load failed, keeping current list: {msg}"));
            }
            Ok(UiEvent::DiffReady) => {
                if binder.pump() {
                    println!("list v{}:", binder.version().get());
                    render(&mut binder)?;
                }
            }
            Ok(UiEvent::Done) => break,
            Err(e) => {
                logger.w(&format!("no events: {e}"));
                break;
            }
        }
    }

    if binder.wait_idle(Duration::from_secs(1)) && binder.pump() {
        render(&mut binder)?;
    }
    binder.on_row_activated(0);

    let stats = binder.stats();
    log::info!(
        "created {} views, {} binds, {} diffs applied",
        stats.views_created,
        stats.binds,
        stats.diffs_applied
    );

    if repo.join().is_err() {
        anyhow::bail!("repository thread panicked");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_binder(initial: Vec<User>) -> ListBinder<User, View> {
        ListBinder::builder(
            KeyedCallback::new(|u: &User| u.id),
            |_| Ok(View::default()),
            bind_user,
        )
        .initial_list(initial)
        .build()
        .unwrap()
    }

    #[test]
    fn test_row_numbers_follow_reorder() {
        let mut binder = user_binder(fetch_users(0).unwrap());
        assert_eq!(
            render_lines(&mut binder).unwrap(),
            vec![
                "#0 | Ada Lovelace | active",
                "#1 | Alan Turing | inactive",
                "#2 | Grace Hopper | active",
            ]
        );

        binder.submit_list(fetch_users(1).unwrap()).unwrap();
        assert!(binder.wait_idle(Duration::from_secs(5)));
        assert!(binder.pump());

        // Grace only moved, so she keeps her view but gets the new number.
        assert_eq!(
            render_lines(&mut binder).unwrap(),
            vec![
                "#0 | Grace Hopper | active",
                "#1 | Ada King | active",
                "#2 | Edsger Dijkstra | inactive",
            ]
        );
        assert_eq!(binder.stats().binds, 5);
    }
}
