//! Integration tests - a page from markup to ready callbacks
//!
//! Tests the complete workflow: HTML → Host → ready → query → mutate → events

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use zest::{Config, Event, Handler, Host, InsertPosition, NodeId, ReadyState};

const PAGE: &str = r#"
    <!DOCTYPE html>
    <html lang="en">
        <head><title>Todo</title></head>
        <body>
            <form id="add"><input name="title" type="text"><button>Add</button></form>
            <ul id="todos" class="list">
                <li class="todo">write tests</li>
                <li class="todo done">parse html</li>
            </ul>
        </body>
    </html>
"#;

fn page() -> Result<Host> {
    Ok(Host::from_html_with_config(
        PAGE,
        Config {
            url: "https://example.com/todo".to_string(),
            ..Config::default()
        },
    )?)
}

// ============================================================================
// FULL PIPELINE TESTS
// ============================================================================

#[test]
fn test_parsed_page_starts_loading() -> Result<()> {
    let host = page()?;
    assert_eq!(host.ready_state(), ReadyState::Loading);
    assert_eq!(host.document().title(), "Todo");
    assert_eq!(host.document().url(), "https://example.com/todo");
    assert_eq!(host.select("li.todo")?.len(), 2);
    Ok(())
}

#[test]
fn test_ready_then_wire_up_page() -> Result<()> {
    let host = page()?;
    let clicked = Rc::new(RefCell::new(Vec::<String>::new()));

    {
        let clicked = Rc::clone(&clicked);
        host.ready(move |host| {
            let Ok(list) = host.select("#todos") else { return };
            let clicked = Rc::clone(&clicked);
            let on_click = Handler::new(move |host, li, _| {
                clicked.borrow_mut().push(host.text_content(li));
                if let Ok(item) = host.select(li) {
                    item.toggle_class("done", None);
                }
            });
            let _ = list.delegate("li", "click", on_click);
        });
    }
    assert_eq!(host.listener_count(NodeId::ROOT, "DOMContentLoaded"), 1);

    host.finish_parsing();
    let first = host.select("li")?.get(0).unwrap_or(NodeId::NONE);
    host.dispatch_event(first, &mut Event::new("click"));

    assert_eq!(*clicked.borrow(), vec!["write tests".to_string()]);
    assert!(host.select("li")?.eq(0).has_class("done"));
    Ok(())
}

#[test]
fn test_build_list_items() -> Result<()> {
    let host = page()?;
    let list = host.select("#todos")?;

    list.append(r#"<li class="todo">ship it</li>"#)?
        .prepend(r#"<li class="todo urgent">fix bug</li>"#)?;
    list.before("<h1>Todos</h1>")?.after("<p>footer</p>")?;

    let items = host.select("#todos > li")?;
    assert_eq!(items.len(), 4);
    assert!(items.eq(0).has_class("urgent"));
    assert_eq!(host.select("h1 + ul")?.len(), 1);
    assert_eq!(host.select("ul + p")?.text(), "footer");

    items.remove_class(Some("todo")).add_class("item");
    assert_eq!(host.select(".todo")?.len(), 0);
    assert_eq!(host.select(".item.done")?.len(), 1);
    Ok(())
}

#[test]
fn test_insert_html_by_name() -> Result<()> {
    let host = page()?;
    let position: InsertPosition = "afterBegin".parse()?;
    host.select("form")?.insert_html(position, "<label>Title</label>")?;
    assert_eq!(host.select("form > :first-child")?.text(), "Title");
    Ok(())
}

#[test]
fn test_attributes_and_style() -> Result<()> {
    let host = page()?;
    let input = host.select("input")?;

    assert_eq!(input.attr("name").as_deref(), Some("title"));
    input.set_attr("placeholder", "What next?")?.set_attr("disabled", "")?;
    assert_eq!(host.select("input:disabled")?.len(), 1);
    input.remove_attr("disabled")?;
    assert_eq!(host.select("input:enabled")?.len(), 1);

    let list = host.select("ul")?;
    list.css("display:block")?.transition().opacity(0).apply()?;
    let style = list.attr("style").unwrap_or_default();
    assert!(style.starts_with("display:block;-webkit-transition:"));
    assert!(style.ends_with("opacity:0;"));
    Ok(())
}

#[test]
fn test_set_html_replaces_bound_items() -> Result<()> {
    let host = page()?;
    let hits = Rc::new(RefCell::new(0));
    let handler = {
        let hits = Rc::clone(&hits);
        Handler::new(move |_, _, _| *hits.borrow_mut() += 1)
    };

    host.select("li")?.bind("click", &handler);
    host.select("ul")?.set_html("<li>fresh</li>")?;
    host.select("li")?.trigger("click");
    assert_eq!(*hits.borrow(), 0, "listeners stay on the detached items");
    Ok(())
}

#[test]
fn test_window_events() -> Result<()> {
    let host = page()?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = |label: &'static str| {
        let seen = Rc::clone(&seen);
        Handler::new(move |_, _, event| seen.borrow_mut().push((label, event.event_type.to_string())))
    };

    let window = host.select(NodeId::WINDOW)?;
    window.bind("load", &record("window")).bind("click", &record("window"));

    host.select("button")?.trigger("click");
    host.finish_loading();
    host.unload();

    assert_eq!(
        *seen.borrow(),
        vec![("window", "click".to_string()), ("window", "load".to_string())]
    );
    assert_eq!(host.ready_state(), ReadyState::Complete);
    Ok(())
}
