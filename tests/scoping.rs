//! End-to-end scoping behavior over the in-memory host.

use std::cell::Cell;
use std::rc::Rc;

use insular::{Child, DynamicValue, MemoryHost, MemoryNode, PropertyBag, ScopedRenderer};

fn setup() -> (MemoryHost, ScopedRenderer<MemoryHost>) {
    let host = MemoryHost::new();
    (host.clone(), ScopedRenderer::new(host))
}

fn paragraph(ui: &ScopedRenderer<MemoryHost>, text: &str) -> MemoryNode {
    ui.element("p", PropertyBag::new(), vec![Child::text(text)])
        .unwrap()
}

#[test]
fn blocked_render_produces_unscoped_markup() {
    let (_, ui) = setup();
    let view = ui.render(|t| paragraph(t, "foo"));
    assert_eq!(view.tag(), "p");
    assert!(view.class_names().is_empty());
    assert_eq!(view.text_content(), "foo");
}

#[test]
fn scoped_render_stamps_every_element() {
    let (_, ui) = setup();
    let view = ui.render_scoped("scope", |t| {
        let inner = paragraph(t, "bar");
        t.element(
            "div",
            PropertyBag::new(),
            vec![Child::text("foo"), Child::Node(inner)],
        )
        .unwrap()
    });

    assert!(view.has_class("scope"));
    assert!(view.child_elements()[0].has_class("scope"));
}

#[test]
fn scoped_render_with_local_style() {
    let (host, ui) = setup();
    let view = ui.render_scoped("scope", |t| {
        let view = paragraph(t, "foo");
        t.element(
            "style",
            PropertyBag::new().flag("local"),
            vec![Child::text("p {}")],
        );
        view
    });

    assert!(view.has_class("scope"));

    let style = host.style_element("scope-local").expect("style injected");
    assert!(style.has_class("scope"));
    assert!(style.text_content().contains("p.scope {"));
}

#[test]
fn scoped_render_with_global_style() {
    let (host, ui) = setup();
    ui.render_scoped("scope", |t| {
        t.element(
            "style",
            PropertyBag::new().flag("global"),
            vec![Child::text("p {}")],
        );
    });

    let style = host.style_element("scope-global").expect("style injected");
    assert!(style.has_class("scope"));
    assert_eq!(style.text_content(), "p {}");
}

#[test]
fn class_suffixed_styles_coexist() {
    let (host, ui) = setup();
    ui.render_scoped("scope", |t| {
        for class in ["dynamic", "dynamic2"] {
            t.element(
                "style",
                PropertyBag::new().flag("local").attr("class", class),
                vec![Child::text("p {}")],
            );
            t.element(
                "style",
                PropertyBag::new().flag("global").attr("class", class),
                vec![Child::text("p {}")],
            );
        }
        t.element(
            "style",
            PropertyBag::new().flag("local"),
            vec![Child::text("p {}")],
        );
    });

    for id in [
        "scope-local-dynamic",
        "scope-local-dynamic2",
        "scope-global-dynamic",
        "scope-global-dynamic2",
        "scope-local",
    ] {
        let style = host.style_element(id).unwrap_or_else(|| panic!("missing {id}"));
        assert!(style.has_class("scope"));
        if id.contains("local") {
            assert!(style.text_content().contains("p.scope {"));
        } else {
            assert_eq!(style.text_content(), "p {}");
        }
    }
}

#[test]
fn sibling_instances_share_one_style_node() {
    let (host, ui) = setup();
    for _ in 0..2 {
        ui.render_scoped("scope", |t| {
            t.element(
                "style",
                PropertyBag::new().flag("global"),
                vec![Child::text("p {}")],
            );
        });
    }

    let count = host
        .head_nodes()
        .iter()
        .filter(|node| node.id() == "scope-global")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn styles_are_collected_when_last_instance_disposes() {
    let (host, ui) = setup();
    let activations = 3;
    for _ in 0..activations {
        ui.render_scoped("scope", |t| {
            t.element(
                "style",
                PropertyBag::new().flag("local"),
                vec![Child::text("p {}")],
            );
        });
    }
    assert_eq!(ui.context().usage("scope"), activations);
    assert!(host.style_element("scope-local").is_some());

    // Tearing down all but one instance keeps the style alive.
    for _ in 0..activations - 1 {
        host.dispose_next();
        assert!(host.style_element("scope-local").is_some());
    }

    host.dispose_next();
    assert_eq!(ui.context().usage("scope"), 0);
    assert!(host.style_element("scope-local").is_none());
}

#[test]
fn redeclaring_after_collection_reinserts_the_style() {
    let (host, ui) = setup();
    let declare = |ui: &ScopedRenderer<MemoryHost>| {
        ui.render_scoped("scope", |t| {
            t.element(
                "style",
                PropertyBag::new().flag("local"),
                vec![Child::text("p {}")],
            );
        });
    };

    declare(&ui);
    host.dispose_all();
    assert!(host.style_element("scope-local").is_none());

    declare(&ui);
    assert!(host.style_element("scope-local").is_some());
}

#[test]
fn deferred_children_render_under_their_defining_scope() {
    let (_, ui) = setup();

    // Child content written under "caller"...
    let child = ui.render_scoped("caller", |t| {
        t.child_producer({
            let t = t.clone();
            move || {
                t.render_inherited(|t| {
                    t.element("span", PropertyBag::new(), vec![Child::text("bar")])
                        .unwrap()
                })
            }
        })
    });

    // ...handed to a component rendering under its own scope.
    let view = ui.render_scoped("component", |t| {
        t.element("p", PropertyBag::new(), vec![Child::Producer(child)])
            .unwrap()
    });

    assert!(view.has_class("component"));
    let span = &view.child_elements()[0];
    assert!(span.has_class("caller"));
    assert!(!span.has_class("component"));
}

#[test]
fn blocked_children_stay_unscoped_inside_scoped_parents() {
    let (_, ui) = setup();
    let view = ui.render_scoped("scope", |t| {
        let inner = t.render(|t| {
            t.element("span", PropertyBag::new(), vec![Child::text("bar")])
                .unwrap()
        });
        t.element(
            "p",
            PropertyBag::new(),
            vec![Child::text("foo"), Child::Node(inner)],
        )
        .unwrap()
    });

    assert!(view.has_class("scope"));
    assert!(view.child_elements()[0].class_names().is_empty());
}

#[test]
fn dynamic_class_keeps_tracking_its_producer() {
    let (_, ui) = setup();
    let flipped = Rc::new(Cell::new(false));
    let reader = Rc::clone(&flipped);
    let class = DynamicValue::new(move || {
        let name = if reader.get() { "b" } else { "a" };
        name.to_string()
    });

    let view = ui.render_scoped("scope", |t| {
        t.element("p", PropertyBag::new().dynamic("class", class), vec![])
            .unwrap()
    });

    assert_eq!(view.class_names(), vec!["a", "scope"]);
    flipped.set(true);
    assert_eq!(view.class_names(), vec!["b", "scope"]);
}

#[test]
fn dynamic_style_content_is_scoped_around_the_producer() {
    let (host, ui) = setup();
    let accent = DynamicValue::new(|| "red".to_string());
    ui.render_scoped("scope", |t| {
        t.element(
            "style",
            PropertyBag::new().flag("local"),
            vec![
                Child::text("p.note { color: "),
                Child::Dynamic(accent.clone()),
                Child::text(" }"),
            ],
        );
    });

    let style = host.style_element("scope-local").expect("style injected");
    assert_eq!(style.text_content(), "p.scope.note { color: red }");
}

#[test]
fn nested_scopes_restore_on_the_way_out() {
    let (_, ui) = setup();
    let view = ui.render_scoped("scope", |t| {
        let inner = t.render_scoped("inner-scope", |t| {
            t.element("span", PropertyBag::new(), vec![Child::text("bar")])
                .unwrap()
        });
        t.element(
            "p",
            PropertyBag::new(),
            vec![Child::text("foo"), Child::Node(inner)],
        )
        .unwrap()
    });

    assert!(view.has_class("scope"));
    let span = &view.child_elements()[0];
    assert!(span.has_class("inner-scope"));
    assert!(!span.has_class("scope"));
}
