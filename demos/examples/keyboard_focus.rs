// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focusable text fields, key capture, and the unclaimed-press focus policy.
//!
//! Clicking a field focuses it. Keys are routed into the focused field's subtree with
//! `process_key_press`; clicking bare desktop clears focus.
//!
//! Run:
//! - `cargo run -p understory_demos --example keyboard_focus`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use tracing_subscriber::EnvFilter;
use understory_control_tree::{
    ControlDesc, ControlFlags, ControlId, ControlTree, DispatchConfig, InputTarget, Key,
    MouseButtons, ScreenId, UnclaimedPress, UniRect,
};

struct TextField {
    text: Rc<RefCell<String>>,
}

impl InputTarget for TextField {
    fn on_key_pressed(&mut self, key: Key) -> bool {
        match char::from_u32(key.0) {
            Some(c) => {
                self.text.borrow_mut().push(c);
                true
            }
            None => false,
        }
    }
}

fn field(tree: &mut ControlTree, parent: ControlId, y: f64) -> (ControlId, Rc<RefCell<String>>) {
    let text = Rc::new(RefCell::new(String::new()));
    let id = tree
        .create_child(
            parent,
            ControlDesc::new(UniRect::absolute(20.0, y, 200.0, 24.0))
                .with_flags(ControlFlags::FOCUSABLE),
            TextField { text: text.clone() },
        )
        .unwrap();
    (id, text)
}

fn click(tree: &mut ControlTree, screen: ScreenId, at: Point) -> bool {
    tree.inject_mouse_move(screen, at).unwrap();
    let claimed = tree.inject_mouse_press(screen, MouseButtons::LEFT).unwrap();
    tree.inject_mouse_release(screen, MouseButtons::LEFT).unwrap();
    claimed
}

fn type_text(tree: &mut ControlTree, screen: ScreenId, text: &str) {
    let Some(focused) = tree.focused(screen) else {
        println!("  no focus, dropped {text:?}");
        return;
    };
    for c in text.chars() {
        let key = Key(u32::from(c));
        tree.process_key_press(focused, key, false).unwrap();
        tree.process_key_release(focused, key).unwrap();
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("understory_control_tree=debug")),
        )
        .init();

    let mut tree: ControlTree = ControlTree::new().with_config(DispatchConfig {
        unclaimed_press: UnclaimedPress::ClearFocus,
        ..DispatchConfig::default()
    });
    let screen = tree.create_screen(Size::new(640.0, 480.0));
    let desktop = tree.screen_root(screen).unwrap();
    let (name, name_text) = field(&mut tree, desktop, 20.0);
    let (email, email_text) = field(&mut tree, desktop, 60.0);

    println!("== Click name, type ==");
    assert!(click(&mut tree, screen, Point::new(30.0, 30.0)));
    assert_eq!(tree.focused(screen), Some(name));
    type_text(&mut tree, screen, "ada");

    println!("== Click email, type ==");
    assert!(click(&mut tree, screen, Point::new(30.0, 70.0)));
    assert_eq!(tree.focused(screen), Some(email));
    type_text(&mut tree, screen, "ada@example.com");

    println!("== Click desktop, type ==");
    assert!(!click(&mut tree, screen, Point::new(500.0, 400.0)));
    assert_eq!(tree.focused(screen), None);
    type_text(&mut tree, screen, "lost");

    println!("  name  = {:?}", name_text.borrow());
    println!("  email = {:?}", email_text.borrow());
    assert_eq!(name_text.borrow().as_str(), "ada");
    assert_eq!(email_text.borrow().as_str(), "ada@example.com");
}
